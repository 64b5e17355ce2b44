//
// Copyright (c) rivermap contributors. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::core::geom::Extent;
use crate::error::{Error, Result};
use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;
use std::env;
use std::fs::File;
use std::io::prelude::*;
use tera::{Context, Tera};
use toml::Value;

pub trait Config<'a, C: Deserialize<'a>>
where
    Self: std::marker::Sized,
{
    /// Read configuration
    fn from_config(config: &C) -> Result<Self>;
    /// Generate configuration template
    fn gen_config() -> String;
    /// Generate configuration template with runtime information
    fn gen_runtime_config(&self) -> String {
        Self::gen_config()
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct ApplicationCfg {
    pub service: ServiceCfg,
    #[serde(default)]
    pub palette: PaletteCfg,
    #[serde(default)]
    pub linewidth: LineWidthCfg,
    #[serde(default)]
    pub cache: CacheCfg,
    #[serde(rename = "map", default)]
    pub maps: Vec<MapCfg>,
    pub border: Option<BorderCfg>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ServiceCfg {
    /// Output directory for HTML artifacts
    #[serde(default = "default_outdir")]
    pub outdir: String,
    /// Render targets (deck, chart)
    #[serde(default = "default_renderers")]
    pub renderers: Vec<String>,
    #[serde(default = "default_chart_width")]
    pub chart_width: u32,
    #[serde(default = "default_chart_height")]
    pub chart_height: u32,
}

#[derive(Deserialize, Clone, Copy, PartialEq, Debug)]
#[serde(rename_all = "lowercase")]
pub enum PalettePolicyCfg {
    Cyclic,
    Slice,
}

impl Default for PalettePolicyCfg {
    fn default() -> Self {
        PalettePolicyCfg::Cyclic
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct PaletteCfg {
    /// Default colour scheme
    #[serde(default = "default_scheme")]
    pub scheme: String,
    #[serde(default)]
    pub policy: PalettePolicyCfg,
    /// First palette index used for basins with the slice policy
    #[serde(default = "default_slice_offset")]
    pub slice_offset: usize,
    /// Number of palette entries used for basins with the slice policy
    pub slice_count: Option<usize>,
}

impl Default for PaletteCfg {
    fn default() -> Self {
        PaletteCfg {
            scheme: default_scheme(),
            policy: PalettePolicyCfg::default(),
            slice_offset: default_slice_offset(),
            slice_count: None,
        }
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct LineWidthCfg {
    /// Power applied to the stream order
    #[serde(default = "default_exponent")]
    pub exponent: f64,
    /// Linear scaling (stream order / divisor) instead of power scaling
    pub divisor: Option<f64>,
    /// Multiplier applied by the path renderer
    #[serde(default = "default_width_scale")]
    pub width_scale: f64,
    #[serde(default = "default_width_min_pixels")]
    pub width_min_pixels: f64,
}

impl Default for LineWidthCfg {
    fn default() -> Self {
        LineWidthCfg {
            exponent: default_exponent(),
            divisor: None,
            width_scale: default_width_scale(),
            width_min_pixels: default_width_min_pixels(),
        }
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct CacheCfg {
    /// Download directory
    #[serde(default = "default_cache_dir")]
    pub dir: String,
    #[serde(default = "default_retries")]
    pub retries: u32,
    #[serde(default = "default_retry_delay")]
    pub retry_delay_ms: u64,
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    #[serde(default)]
    pub progress: bool,
}

impl Default for CacheCfg {
    fn default() -> Self {
        CacheCfg {
            dir: default_cache_dir(),
            retries: default_retries(),
            retry_delay_ms: default_retry_delay(),
            chunk_size: default_chunk_size(),
            progress: false,
        }
    }
}

#[derive(Deserialize, Clone, PartialEq, Debug)]
pub struct DatasetCfg {
    pub url: String,
    /// Local file name (Default: basename of url)
    pub filename: Option<String>,
    /// geojson or shapefile (Default: detected from file extension)
    pub format: Option<String>,
    /// Shapefile layer inside a zip archive
    pub layer: Option<String>,
    /// Keep features whose bounding box intersects minx, miny, maxx, maxy
    pub bbox: Option<Extent>,
    /// Drop features intersecting this polygon
    pub exclude: Option<Vec<[f64; 2]>>,
    /// Simplification tolerance in degrees
    pub simplify: Option<f64>,
}

impl DatasetCfg {
    /// Substitute runtime placeholders in url, filename and layer
    pub fn expand(&self, scheme: &str, level: u8) -> DatasetCfg {
        DatasetCfg {
            url: expand_placeholders(&self.url, scheme, level),
            filename: self
                .filename
                .as_ref()
                .map(|f| expand_placeholders(f, scheme, level)),
            layer: self
                .layer
                .as_ref()
                .map(|l| expand_placeholders(l, scheme, level)),
            ..self.clone()
        }
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct ViewCfg {
    pub latitude: f64,
    pub longitude: f64,
    pub zoom: f64,
}

impl Default for ViewCfg {
    fn default() -> Self {
        ViewCfg {
            latitude: 53.45,
            longitude: -6.49,
            zoom: 5.7,
        }
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct MapCfg {
    /// Hydro, NI or ROI
    pub name: String,
    /// Output file name without extension
    pub output: String,
    /// Attribute holding the Strahler order of a river
    pub stream_order_field: String,
    pub rivers: DatasetCfg,
    pub basins: DatasetCfg,
    pub lakes: Option<DatasetCfg>,
    #[serde(default)]
    pub view: ViewCfg,
}

#[derive(Deserialize, Clone, Debug)]
pub struct BorderCfg {
    pub output: String,
    /// Northern Ireland land area
    pub ni_area: DatasetCfg,
    /// Republic of Ireland area
    pub roi_area: DatasetCfg,
    /// Only keep rivers crossing the land border
    #[serde(default = "default_clip")]
    pub clip: bool,
    #[serde(default = "default_border_view")]
    pub view: ViewCfg,
}

pub fn default_outdir() -> String {
    ".".to_string()
}

pub fn default_renderers() -> Vec<String> {
    vec!["deck".to_string(), "chart".to_string()]
}

fn default_chart_width() -> u32 {
    1000
}

fn default_chart_height() -> u32 {
    1300
}

pub const DEFAULT_SCHEME: &str = "Derain";

fn default_scheme() -> String {
    DEFAULT_SCHEME.to_string()
}

fn default_slice_offset() -> usize {
    1
}

pub const DEFAULT_EXPONENT: f64 = 0.5;

fn default_exponent() -> f64 {
    DEFAULT_EXPONENT
}

fn default_width_scale() -> f64 {
    200.0
}

fn default_width_min_pixels() -> f64 {
    1.0
}

fn default_cache_dir() -> String {
    ".".to_string()
}

fn default_retries() -> u32 {
    2
}

fn default_retry_delay() -> u64 {
    1000
}

pub const DEFAULT_CHUNK_SIZE: usize = 8192;

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

fn default_clip() -> bool {
    true
}

fn default_border_view() -> ViewCfg {
    ViewCfg {
        latitude: 54.3,
        longitude: -7.2,
        zoom: 7.5,
    }
}

/// Replace `{scheme}`, `{level}` and `{level02}` (zero padded basin level)
pub fn expand_placeholders(template: &str, scheme: &str, level: u8) -> String {
    template
        .replace("{scheme}", scheme)
        .replace("{level02}", &format!("{:02}", level))
        .replace("{level}", &level.to_string())
}

pub const DEFAULT_CONFIG: &str = r#"
[service]
outdir = "."
renderers = ["deck", "chart"]

[palette]
scheme = "Derain"
policy = "cyclic"

[linewidth]
exponent = 0.5
width_scale = 200.0
width_min_pixels = 1.0

[[map]]
name = "Hydro"
output = "hydrorivers_hydrobasins-{scheme}-{level}"
stream_order_field = "ORD_STRA"

[map.rivers]
url = "https://data.hydrosheds.org/file/HydroRIVERS/HydroRIVERS_v10_eu_shp.zip"
layer = "HydroRIVERS_v10_eu"
bbox = [-10.56, 51.39, -5.34, 55.43]
# Scotland part of the bounding box
exclude = [[-5.34, 55.43], [-5.85, 55.43], [-5.85, 55.23], [-5.34, 55.23]]

[map.basins]
url = "https://data.hydrosheds.org/file/hydrobasins/standard/hybas_eu_lev01-12_v1c.zip"
layer = "hybas_eu_lev{level02}_v1c"
bbox = [-10.56, 51.39, -5.34, 55.43]
exclude = [[-5.34, 55.43], [-5.85, 55.43], [-5.85, 55.23], [-5.34, 55.23]]

[[map]]
name = "NI"
output = "ni_rivers_basins-{scheme}"
stream_order_field = "strahler"

[map.rivers]
url = "https://opendata-daerani.hub.arcgis.com/datasets/DAERANI::rivers-strahler-ranking.geojson"
filename = "NI_rivers_strahler.geojson"

[map.basins]
url = "https://opendata-daerani.hub.arcgis.com/datasets/DAERANI::river-basin-districts.geojson"
filename = "NI_river_basin_districts.geojson"

[map.view]
latitude = 54.78
longitude = -6.49
zoom = 7.0

[[map]]
name = "ROI"
output = "roi_rivers_basins-{scheme}-{level}"
stream_order_field = "ORDER_"

[map.rivers]
url = "http://gis.epa.ie/geoserver/EPA/ows?service=WFS&version=1.0.0&request=GetFeature&typeName=EPA:WATER_RIVNETROUTES&outputFormat=application%2Fjson&srsName=EPSG:4326"
filename = "ROI_river_network.geojson"

[map.basins]
url = "https://data.hydrosheds.org/file/hydrobasins/standard/hybas_eu_lev01-12_v1c.zip"
layer = "hybas_eu_lev{level02}_v1c"
bbox = [-10.56, 51.39, -5.99, 55.43]

[border]
output = "border_rivers-{scheme}-{level}"
clip = true

[border.ni_area]
url = "http://osni-spatialni.opendata.arcgis.com/datasets/159c80fe1ad54140b429f8799f624962_0.zip"
filename = "NI_land_area.zip"
simplify = 0.01

[border.roi_area]
url = "https://opendata.arcgis.com/api/v3/datasets/559bc3300384413aa0fe93f0772cb7f1_0/downloads/data?format=shp&spatialRefId=4326&where=1%3D1"
filename = "ROI_provinces.zip"
simplify = 0.01
"#;

/// Load and parse the config file into an config struct.
pub fn read_config<'a, T: Deserialize<'a>>(path: &str) -> Result<T> {
    let mut file = match File::open(path) {
        Ok(file) => file,
        Err(_) => {
            return Err(Error::config("Could not find config file!"));
        }
    };
    let mut config_toml = String::new();
    if let Err(err) = file.read_to_string(&mut config_toml) {
        return Err(Error::config(format!(
            "Error while reading config: [{}]",
            err
        )));
    };

    parse_config(config_toml, path)
}

/// Parse the configuration into an config struct.
pub fn parse_config<'a, T: Deserialize<'a>>(config_toml: String, path: &str) -> Result<T> {
    // Check for old ${var} expressions
    let re = Regex::new(r"\$\{([[:alnum:]]+)\}").map_err(|e| Error::config(e.to_string()))?;
    if re.is_match(&config_toml) {
        return Err(Error::config(
            "Replace old environment variable syntax ${VARNAME} with `{{env.VARNAME}}`",
        ));
    }

    // Parse template
    let mut tera = Tera::default();
    tera.add_raw_template(path, &config_toml)?;
    let mut context = Context::new();
    let env: HashMap<String, String> = env::vars().collect();
    context.insert("env", &env);
    let toml = tera.render(path, &context)?;

    toml.parse::<Value>()
        .and_then(|cfg| cfg.try_into::<T>())
        .map_err(|err| Error::config(format!("{} - {}", path, err)))
}
