//
// Copyright (c) rivermap contributors. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

//! Error types shared by all pipeline stages.

use std::io;
use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Dataset download failed (network error or non-2xx response)
    #[error("Fetching {url} failed: {reason}")]
    Fetch { url: String, reason: String },
    /// Geometry kind outside of the supported set
    #[error("Unsupported geometry type {0}")]
    UnsupportedGeometry(String),
    /// Invalid configuration or argument combination
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("IO error {1}: {0}")]
    Io(#[source] io::Error, PathBuf),
    #[error("Invalid GeoJSON in {1}: {0}")]
    GeoJson(#[source] geojson::Error, PathBuf),
    #[error("Shapefile error in {1}: {0}")]
    Shapefile(#[source] shapefile::Error, PathBuf),
    #[error("Zip archive error in {1}: {0}")]
    Zip(#[source] zip::result::ZipError, PathBuf),
    #[error("Template error: {0}")]
    Template(#[from] tera::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn config<S: Into<String>>(msg: S) -> Error {
        Error::Configuration(msg.into())
    }
}
