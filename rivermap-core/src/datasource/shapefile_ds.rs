//
// Copyright (c) rivermap contributors. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::core::feature::{Feature, FeatureAttr, FeatureAttrValType};
use crate::core::geom::*;
use crate::datasource::DatasourceType;
use crate::error::{Error, Result};
use shapefile::dbase::{FieldValue, Record};
use shapefile::{PolygonRing, Shape, ShapeReader};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};

/// ESRI Shapefile, either plain `.shp` with sidecar files or packed in a zip archive
pub struct ShapefileDatasource {
    pub path: PathBuf,
    /// File stem of the shapefile inside a zip archive (Default: first `.shp` entry by name)
    pub layer: Option<String>,
}

impl ShapefileDatasource {
    pub fn new<P: Into<PathBuf>>(path: P, layer: Option<String>) -> ShapefileDatasource {
        ShapefileDatasource {
            path: path.into(),
            layer,
        }
    }

    fn is_zip(&self) -> bool {
        self.path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("zip"))
            .unwrap_or(false)
    }

    fn io_err(&self, e: std::io::Error) -> Error {
        Error::Io(e, self.path.clone())
    }

    /// Raw `.shp` and `.dbf` contents
    fn read_layer(&self) -> Result<(Vec<u8>, Vec<u8>)> {
        if self.is_zip() {
            self.read_zip_layer()
        } else {
            let shp = fs::read(&self.path).map_err(|e| self.io_err(e))?;
            let dbf_path = self.path.with_extension("dbf");
            let dbf = fs::read(&dbf_path).map_err(|e| Error::Io(e, dbf_path))?;
            Ok((shp, dbf))
        }
    }

    fn read_zip_layer(&self) -> Result<(Vec<u8>, Vec<u8>)> {
        let zip_err = |e| Error::Zip(e, self.path.clone());
        let file = File::open(&self.path).map_err(|e| self.io_err(e))?;
        let mut archive = zip::ZipArchive::new(file).map_err(zip_err)?;
        let names = entry_names(&archive);
        let shp_name = select_layer(&names, self.layer.as_deref())?;
        let dbf_name = sidecar(&names, &shp_name, "dbf").ok_or_else(|| {
            Error::config(format!("{}: missing dbf file for {}", self.path.display(), shp_name))
        })?;
        debug!("Reading {} from {}", shp_name, self.path.display());
        let mut shp = Vec::new();
        archive
            .by_name(&shp_name)
            .map_err(zip_err)?
            .read_to_end(&mut shp)
            .map_err(|e| self.io_err(e))?;
        let mut dbf = Vec::new();
        archive
            .by_name(&dbf_name)
            .map_err(zip_err)?
            .read_to_end(&mut dbf)
            .map_err(|e| self.io_err(e))?;
        Ok((shp, dbf))
    }

    /// Contents of the `.prj` sidecar, if any
    fn read_projection(&self) -> Result<Option<String>> {
        if !self.is_zip() {
            let prj_path = self.path.with_extension("prj");
            if !prj_path.exists() {
                return Ok(None);
            }
            let wkt = fs::read(&prj_path).map_err(|e| Error::Io(e, prj_path))?;
            return Ok(Some(String::from_utf8_lossy(&wkt).into_owned()));
        }
        let zip_err = |e| Error::Zip(e, self.path.clone());
        let file = File::open(&self.path).map_err(|e| self.io_err(e))?;
        let mut archive = zip::ZipArchive::new(file).map_err(zip_err)?;
        let names = entry_names(&archive);
        let shp_name = select_layer(&names, self.layer.as_deref())?;
        match sidecar(&names, &shp_name, "prj") {
            Some(prj_name) => {
                let mut wkt = Vec::new();
                archive
                    .by_name(&prj_name)
                    .map_err(zip_err)?
                    .read_to_end(&mut wkt)
                    .map_err(|e| self.io_err(e))?;
                Ok(Some(String::from_utf8_lossy(&wkt).into_owned()))
            }
            None => Ok(None),
        }
    }
}

/// EPSG code for a `.prj` WKT definition. Only geographic WGS84 is recognized.
pub fn projection_srid(wkt: &str) -> Option<i32> {
    let wkt = wkt.trim().to_uppercase();
    let wgs84 = ["WGS_1984", "WGS 84", "WGS84"]
        .iter()
        .any(|name| wkt.contains(name));
    if wkt.starts_with("GEOGCS") && wgs84 {
        Some(4326)
    } else {
        None
    }
}

/// Archive entries sorted by name
fn entry_names<R: Read + std::io::Seek>(archive: &zip::ZipArchive<R>) -> Vec<String> {
    let mut names: Vec<String> = archive.file_names().map(String::from).collect();
    names.sort();
    names
}

fn stem(name: &str) -> &str {
    Path::new(name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(name)
}

fn has_extension(name: &str, ext: &str) -> bool {
    Path::new(name)
        .extension()
        .map(|e| e.eq_ignore_ascii_case(ext))
        .unwrap_or(false)
}

/// Pick the `.shp` archive entry matching `layer`, or the first one
pub fn select_layer(names: &[String], layer: Option<&str>) -> Result<String> {
    let mut shapefiles = names.iter().filter(|name| has_extension(name, "shp"));
    let found = match layer {
        Some(layer) => shapefiles.find(|name| stem(name).eq_ignore_ascii_case(layer)),
        None => shapefiles.next(),
    };
    found.cloned().ok_or_else(|| match layer {
        Some(layer) => Error::config(format!("Layer '{}' not found in archive", layer)),
        None => Error::config("No shapefile found in archive"),
    })
}

/// Archive entry with the same path as `shp_name` but another extension
fn sidecar(names: &[String], shp_name: &str, ext: &str) -> Option<String> {
    let base = &shp_name[..shp_name.len() - 4];
    names
        .iter()
        .find(|name| {
            name.len() == shp_name.len()
                && name.starts_with(base)
                && has_extension(name, ext)
        })
        .cloned()
}

fn coords(points: &[shapefile::Point]) -> Vec<Coord> {
    points.iter().map(|p| Coord::new(p.x, p.y)).collect()
}

fn coords_m(points: &[shapefile::PointM]) -> Vec<Coord> {
    points.iter().map(|p| Coord::new(p.x, p.y)).collect()
}

fn coords_z(points: &[shapefile::PointZ]) -> Vec<Coord> {
    points.iter().map(|p| Coord::new_z(p.x, p.y, p.z)).collect()
}

fn lines(parts: Vec<Vec<Coord>>) -> GeometryType {
    let mut lines: Vec<LineString> = parts.into_iter().map(|points| LineString { points }).collect();
    if lines.len() == 1 {
        GeometryType::LineString(lines.remove(0))
    } else {
        GeometryType::MultiLineString(MultiLineString { lines })
    }
}

/// Group rings into polygons. Every outer ring starts a new polygon.
fn polygons(rings: Vec<(bool, Vec<Coord>)>) -> GeometryType {
    let mut polygons: Vec<Polygon> = Vec::new();
    for (outer, points) in rings {
        let ring = LinearRing { points };
        match polygons.last_mut() {
            Some(polygon) if !outer => polygon.interiors.push(ring),
            _ => polygons.push(Polygon {
                exterior: ring,
                interiors: Vec::new(),
            }),
        }
    }
    if polygons.len() == 1 {
        GeometryType::Polygon(polygons.remove(0))
    } else {
        GeometryType::MultiPolygon(MultiPolygon { polygons })
    }
}

fn ring<P>(ring: &PolygonRing<P>, conv: fn(&[P]) -> Vec<Coord>) -> (bool, Vec<Coord>) {
    match ring {
        PolygonRing::Outer(points) => (true, conv(points)),
        PolygonRing::Inner(points) => (false, conv(points)),
    }
}

/// Convert a shape record. Measures are ignored. Null shapes yield `None`.
pub fn shape_to_geometry(shape: Shape) -> Result<Option<GeometryType>> {
    let geom = match shape {
        Shape::NullShape => return Ok(None),
        Shape::Point(p) => GeometryType::Point(Coord::new(p.x, p.y)),
        Shape::PointM(p) => GeometryType::Point(Coord::new(p.x, p.y)),
        Shape::PointZ(p) => GeometryType::Point(Coord::new_z(p.x, p.y, p.z)),
        Shape::Polyline(l) => lines(l.parts().iter().map(|p| coords(p)).collect()),
        Shape::PolylineM(l) => lines(l.parts().iter().map(|p| coords_m(p)).collect()),
        Shape::PolylineZ(l) => lines(l.parts().iter().map(|p| coords_z(p)).collect()),
        Shape::Polygon(p) => polygons(p.rings().iter().map(|r| ring(r, coords)).collect()),
        Shape::PolygonM(p) => polygons(p.rings().iter().map(|r| ring(r, coords_m)).collect()),
        Shape::PolygonZ(p) => polygons(p.rings().iter().map(|r| ring(r, coords_z)).collect()),
        Shape::Multipoint(mp) => GeometryType::MultiPoint(MultiPoint {
            points: coords(mp.points()),
        }),
        Shape::MultipointM(mp) => GeometryType::MultiPoint(MultiPoint {
            points: coords_m(mp.points()),
        }),
        Shape::MultipointZ(mp) => GeometryType::MultiPoint(MultiPoint {
            points: coords_z(mp.points()),
        }),
        Shape::Multipatch(_) => return Err(Error::UnsupportedGeometry("Multipatch".to_string())),
    };
    Ok(Some(geom))
}

/// dBASE field value as attribute. Empty values have no representation.
pub fn field_value(value: FieldValue) -> Option<FeatureAttrValType> {
    match value {
        FieldValue::Character(Some(s)) => Some(FeatureAttrValType::String(s.trim().to_string())),
        FieldValue::Numeric(Some(v)) => Some(if v.fract() == 0.0 && v.abs() < i64::MAX as f64 {
            FeatureAttrValType::Int(v as i64)
        } else {
            FeatureAttrValType::Double(v)
        }),
        FieldValue::Float(Some(v)) => Some(FeatureAttrValType::Double(f64::from(v))),
        FieldValue::Double(v) => Some(FeatureAttrValType::Double(v)),
        FieldValue::Currency(v) => Some(FeatureAttrValType::Double(v)),
        FieldValue::Integer(v) => Some(FeatureAttrValType::Int(i64::from(v))),
        FieldValue::Logical(Some(b)) => Some(FeatureAttrValType::Bool(b)),
        FieldValue::Date(Some(d)) => Some(FeatureAttrValType::String(format!(
            "{:04}-{:02}-{:02}",
            d.year(),
            d.month(),
            d.day()
        ))),
        _ => None,
    }
}

fn attributes(record: Record) -> Vec<FeatureAttr> {
    let fields: HashMap<String, FieldValue> = record.into();
    let mut attributes: Vec<FeatureAttr> = fields
        .into_iter()
        .filter_map(|(key, value)| field_value(value).map(|value| FeatureAttr { key, value }))
        .collect();
    // Record fields are unordered
    attributes.sort_by(|a, b| a.key.cmp(&b.key));
    attributes
}

impl DatasourceType for ShapefileDatasource {
    fn info(&self) -> String {
        match &self.layer {
            Some(layer) => format!("Shapefile {} layer {}", self.path.display(), layer),
            None => format!("Shapefile {}", self.path.display()),
        }
    }
    fn srid(&self) -> Result<Option<i32>> {
        match self.read_projection()? {
            Some(wkt) => {
                let srid = projection_srid(&wkt);
                if srid.is_none() {
                    warn!(
                        "{}: coordinates are not WGS84 lon/lat and are not reprojected ({})",
                        self.info(),
                        wkt.trim()
                    );
                }
                Ok(srid)
            }
            None => {
                debug!("{}: no .prj file, assuming WGS84", self.info());
                Ok(None)
            }
        }
    }
    fn retrieve_features<F>(&self, mut read: F) -> Result<u64>
    where
        F: FnMut(Feature),
    {
        let shp_err = |e| Error::Shapefile(e, self.path.clone());
        let (shp, dbf) = self.read_layer()?;
        let shape_reader = ShapeReader::new(Cursor::new(shp)).map_err(shp_err)?;
        let dbase_reader = shapefile::dbase::Reader::new(Cursor::new(dbf))
            .map_err(|e| shp_err(shapefile::Error::from(e)))?;
        let mut reader = shapefile::Reader::new(shape_reader, dbase_reader);
        let mut cnt = 0;
        for (fid, result) in reader.iter_shapes_and_records().enumerate() {
            let (shape, record) = result.map_err(shp_err)?;
            if let Some(geometry) = shape_to_geometry(shape)? {
                read(Feature {
                    fid: Some(fid as u64),
                    attributes: attributes(record),
                    geometry,
                });
                cnt += 1;
            }
        }
        Ok(cnt)
    }
}
