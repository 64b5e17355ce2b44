//
// Copyright (c) rivermap contributors. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

//! HTML render targets

pub mod chart;
pub mod deck;

#[cfg(test)]
mod render_test;

pub use self::chart::ChartRenderer;
pub use self::deck::DeckRenderer;

use rivermap_core::core::config::{ApplicationCfg, ViewCfg};
use rivermap_core::core::feature::{FeatureAttrValType, FeatureCollection};
use rivermap_core::core::path::to_path;
use rivermap_core::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Nested path coordinates consumed by the path renderer
pub const PLOTSTRINGS_ATTR: &str = "plotstrings";

/// Everything shown on one map
pub struct MapLayers<'a> {
    pub title: String,
    pub rivers: &'a FeatureCollection,
    pub lakes: Option<&'a FeatureCollection>,
    pub view: &'a ViewCfg,
}

pub trait Renderer {
    fn name(&self) -> &'static str;
    /// Appended to the output base name, including the file extension
    fn suffix(&self) -> &'static str;
    fn render(&self, layers: &MapLayers) -> Result<String>;
}

/// Attach the path structure of every line feature as `plotstrings`
pub fn assign_paths(features: &mut FeatureCollection) -> Result<()> {
    for feature in features.features.iter_mut() {
        let path = to_path(&feature.geometry)?;
        feature.set_attr(PLOTSTRINGS_ATTR, FeatureAttrValType::Path(path));
    }
    Ok(())
}

/// JSON for embedding into a `<script>` element
pub(crate) fn script_json(value: &serde_json::Value) -> Result<String> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}

pub enum RenderTarget {
    Deck(DeckRenderer),
    Chart(ChartRenderer),
}

impl Renderer for RenderTarget {
    fn name(&self) -> &'static str {
        match self {
            RenderTarget::Deck(r) => r.name(),
            RenderTarget::Chart(r) => r.name(),
        }
    }
    fn suffix(&self) -> &'static str {
        match self {
            RenderTarget::Deck(r) => r.suffix(),
            RenderTarget::Chart(r) => r.suffix(),
        }
    }
    fn render(&self, layers: &MapLayers) -> Result<String> {
        match self {
            RenderTarget::Deck(r) => r.render(layers),
            RenderTarget::Chart(r) => r.render(layers),
        }
    }
}

impl RenderTarget {
    pub fn from_name(name: &str, config: &ApplicationCfg) -> Result<RenderTarget> {
        match name {
            "deck" => Ok(RenderTarget::Deck(DeckRenderer::new(&config.linewidth))),
            "chart" => Ok(RenderTarget::Chart(ChartRenderer::new(
                config.service.chart_width,
                config.service.chart_height,
            ))),
            _ => Err(Error::config(format!(
                "Unknown renderer '{}'. Available: deck, chart",
                name
            ))),
        }
    }

    /// Renderers listed in `service.renderers`
    pub fn from_config(config: &ApplicationCfg) -> Result<Vec<RenderTarget>> {
        if config.service.renderers.is_empty() {
            return Err(Error::config("No renderer configured"));
        }
        config
            .service
            .renderers
            .iter()
            .map(|name| RenderTarget::from_name(name, config))
            .collect()
    }
}

/// Render `layers` into `outdir/<basename><suffix>`
pub fn write_output<R: Renderer>(
    renderer: &R,
    layers: &MapLayers,
    outdir: &Path,
    basename: &str,
) -> Result<PathBuf> {
    let html = renderer.render(layers)?;
    fs::create_dir_all(outdir).map_err(|e| Error::Io(e, outdir.to_path_buf()))?;
    let path = outdir.join(format!("{}{}", basename, renderer.suffix()));
    fs::write(&path, html).map_err(|e| Error::Io(e, path.clone()))?;
    info!("{} map written to {}", renderer.name(), path.display());
    Ok(path)
}
