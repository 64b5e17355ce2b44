//
// Copyright (c) rivermap contributors. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::core::config::{Config, DatasetCfg};
use crate::core::feature::{Feature, FeatureCollection};
use crate::core::geom::Extent;
use crate::datasource::DatasourceType;
use crate::error::{Error, Result};
use geo::Intersects;

/// Feature preprocessing applied while loading a dataset.
///
/// Every geometry is flattened to 2D first. Features outside `bbox` or
/// touching the `exclude` polygon are dropped, the remaining geometries
/// are simplified with `simplify` as tolerance.
#[derive(Default, Debug)]
pub struct DatasetFilter {
    pub bbox: Option<Extent>,
    pub exclude: Option<geo::Geometry<f64>>,
    pub simplify: Option<f64>,
}

impl DatasetFilter {
    /// Apply filter to a single feature, `None` if it is filtered out
    pub fn apply(&self, mut feature: Feature) -> Option<Feature> {
        feature.geometry = feature.geometry.drop_z();
        if let Some(bbox) = &self.bbox {
            match feature.geometry.bounding_extent() {
                Some(extent) if extent.intersects(bbox) => {}
                _ => return None,
            }
        }
        if let Some(exclude) = &self.exclude {
            if feature.geometry.to_geo().intersects(exclude) {
                return None;
            }
        }
        if let Some(tolerance) = self.simplify {
            feature.geometry = feature.geometry.simplify(tolerance);
        }
        Some(feature)
    }
}

impl<'a> Config<'a, DatasetCfg> for DatasetFilter {
    fn from_config(cfg: &DatasetCfg) -> Result<Self> {
        let exclude = match &cfg.exclude {
            Some(points) if points.len() < 3 => {
                return Err(Error::config(format!(
                    "{}: exclude polygon needs at least 3 points",
                    cfg.url
                )))
            }
            Some(points) => {
                let exterior: Vec<(f64, f64)> = points.iter().map(|p| (p[0], p[1])).collect();
                Some(geo::Geometry::Polygon(geo::Polygon::new(
                    exterior.into(),
                    vec![],
                )))
            }
            None => None,
        };
        if let Some(bbox) = &cfg.bbox {
            if bbox.minx > bbox.maxx || bbox.miny > bbox.maxy {
                return Err(Error::config(format!("{}: invalid bbox {:?}", cfg.url, bbox)));
            }
        }
        if cfg.simplify.map(|t| t < 0.0).unwrap_or(false) {
            return Err(Error::config(format!(
                "{}: simplify tolerance must not be negative",
                cfg.url
            )));
        }
        Ok(DatasetFilter {
            bbox: cfg.bbox,
            exclude,
            simplify: cfg.simplify,
        })
    }
    fn gen_config() -> String {
        let toml = r#"
#bbox = [-10.56, 51.39, -5.34, 55.43]
#exclude = [[-5.34, 55.43], [-5.85, 55.43], [-5.85, 55.23], [-5.34, 55.23]]
#simplify = 0.01
"#;
        toml.to_string()
    }
}

/// Read all features of a datasource into a collection
pub fn load_collection<D: DatasourceType>(
    ds: &D,
    name: &str,
    filter: &DatasetFilter,
) -> Result<FeatureCollection> {
    let mut collection = FeatureCollection::new(name);
    collection.srid = ds.srid()?;
    let read = ds.retrieve_features(|feature| {
        if let Some(feature) = filter.apply(feature) {
            collection.features.push(feature);
        }
    })?;
    info!(
        "{}: {} of {} features from {}",
        name,
        collection.len(),
        read,
        ds.info()
    );
    Ok(collection)
}
