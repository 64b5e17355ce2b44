//
// Copyright (c) rivermap contributors. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::core::feature::{Feature, FeatureAttr, FeatureAttrValType};
use crate::core::geom::GeometryType;
use crate::datasource::DatasourceType;
use crate::error::{Error, Result};
use geojson::GeoJson;
use std::fs;
use std::path::PathBuf;

/// GeoJSON file containing a FeatureCollection, a single Feature or a bare Geometry
pub struct GeoJsonDatasource {
    pub path: PathBuf,
}

impl GeoJsonDatasource {
    pub fn new<P: Into<PathBuf>>(path: P) -> GeoJsonDatasource {
        GeoJsonDatasource { path: path.into() }
    }

    fn parse(&self) -> Result<GeoJson> {
        let json = fs::read_to_string(&self.path).map_err(|e| Error::Io(e, self.path.clone()))?;
        json.parse::<GeoJson>()
            .map_err(|e| Error::GeoJson(e, self.path.clone()))
    }
}

fn fid(id: &Option<geojson::feature::Id>) -> Option<u64> {
    match id {
        Some(geojson::feature::Id::Number(n)) => n.as_u64(),
        Some(geojson::feature::Id::String(s)) => s.parse().ok(),
        None => None,
    }
}

/// Convert a GeoJSON feature. Features without geometry are skipped.
pub fn feature_from_geojson(feature: &geojson::Feature) -> Result<Option<Feature>> {
    let geometry = match &feature.geometry {
        Some(geom) => GeometryType::from_geojson(&geom.value)?,
        None => return Ok(None),
    };
    let attributes = feature
        .properties
        .iter()
        .flat_map(|props| props.iter())
        .filter_map(|(key, value)| {
            FeatureAttrValType::from_json(value).map(|value| FeatureAttr {
                key: key.clone(),
                value,
            })
        })
        .collect();
    Ok(Some(Feature {
        fid: fid(&feature.id),
        attributes,
        geometry,
    }))
}

impl DatasourceType for GeoJsonDatasource {
    fn info(&self) -> String {
        format!("GeoJSON {}", self.path.display())
    }
    /// GeoJSON (RFC 7946) is always WGS84
    fn srid(&self) -> Result<Option<i32>> {
        Ok(Some(4326))
    }
    fn retrieve_features<F>(&self, mut read: F) -> Result<u64>
    where
        F: FnMut(Feature),
    {
        let mut cnt = 0;
        let mut skipped = 0;
        match self.parse()? {
            GeoJson::FeatureCollection(fc) => {
                for feature in &fc.features {
                    match feature_from_geojson(feature)? {
                        Some(feat) => {
                            read(feat);
                            cnt += 1;
                        }
                        None => skipped += 1,
                    }
                }
            }
            GeoJson::Feature(feature) => {
                if let Some(feat) = feature_from_geojson(&feature)? {
                    read(feat);
                    cnt += 1;
                }
            }
            GeoJson::Geometry(geom) => {
                read(Feature::new(GeometryType::from_geojson(&geom.value)?));
                cnt += 1;
            }
        }
        if skipped > 0 {
            warn!("{}: skipped {} features without geometry", self.path.display(), skipped);
        }
        Ok(cnt)
    }
}
