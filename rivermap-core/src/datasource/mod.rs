//
// Copyright (c) rivermap contributors. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

pub mod datasource;
pub mod filter;
pub mod geojson_ds;
pub mod shapefile_ds;

#[cfg(test)]
mod geojson_ds_test;

pub use self::datasource::DatasourceType;
pub use self::filter::{load_collection, DatasetFilter};
pub use self::geojson_ds::GeoJsonDatasource;
pub use self::shapefile_ds::ShapefileDatasource;

use crate::core::feature::Feature;
use crate::error::{Error, Result};
use std::path::Path;

pub enum Datasource {
    GeoJson(GeoJsonDatasource),
    Shapefile(ShapefileDatasource),
}

impl Datasource {
    /// Open a local dataset. `format` overrides detection by file extension.
    pub fn from_path(path: &Path, format: Option<&str>, layer: Option<String>) -> Result<Datasource> {
        let format = match format {
            Some(format) => format.to_lowercase(),
            None => path
                .extension()
                .and_then(|ext| ext.to_str())
                .unwrap_or_default()
                .to_lowercase(),
        };
        match format.as_str() {
            "geojson" | "json" => Ok(Datasource::GeoJson(GeoJsonDatasource::new(path))),
            "shapefile" | "shp" | "zip" => {
                Ok(Datasource::Shapefile(ShapefileDatasource::new(path, layer)))
            }
            _ => Err(Error::config(format!(
                "Unsupported dataset format '{}' for {}",
                format,
                path.display()
            ))),
        }
    }
}

impl DatasourceType for Datasource {
    fn info(&self) -> String {
        match self {
            Datasource::GeoJson(ds) => ds.info(),
            Datasource::Shapefile(ds) => ds.info(),
        }
    }
    fn srid(&self) -> Result<Option<i32>> {
        match self {
            Datasource::GeoJson(ds) => ds.srid(),
            Datasource::Shapefile(ds) => ds.srid(),
        }
    }
    fn retrieve_features<F>(&self, read: F) -> Result<u64>
    where
        F: FnMut(Feature),
    {
        match self {
            Datasource::GeoJson(ds) => ds.retrieve_features(read),
            Datasource::Shapefile(ds) => ds.retrieve_features(read),
        }
    }
}
