//
// Copyright (c) rivermap contributors. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::border::{border_crossing, combine};
use crate::colouring::{assign_basin_colours, join_colours, BasinIndex, PalettePolicy};
use crate::linewidth::{assign_line_widths, WidthScaling};
use crate::render::{assign_paths, write_output, MapLayers, RenderTarget};
use rivermap_core::cache::{DatasetCache, Fetcher};
use rivermap_core::core::config::{expand_placeholders, ApplicationCfg, DatasetCfg, MapCfg};
use rivermap_core::core::feature::FeatureCollection;
use rivermap_core::core::palette::{palette_names, Palette};
use rivermap_core::core::Config;
use rivermap_core::datasource::{load_collection, DatasetFilter, Datasource};
use rivermap_core::{Error, Result};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Instant;

/// Sub-maps selectable on the command line
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SubMap {
    Hydro,
    NI,
    ROI,
    Border,
}

impl SubMap {
    pub fn name(&self) -> &'static str {
        match self {
            SubMap::Hydro => "Hydro",
            SubMap::NI => "NI",
            SubMap::ROI => "ROI",
            SubMap::Border => "Border",
        }
    }

    /// Comma separated list like `Hydro,NI,ROI,Border`
    pub fn parse_list(list: &str) -> Result<Vec<SubMap>> {
        let mut maps = Vec::new();
        for name in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let map = name.parse::<SubMap>()?;
            if !maps.contains(&map) {
                maps.push(map);
            }
        }
        if maps.is_empty() {
            return Err(Error::config("No map selected"));
        }
        Ok(maps)
    }
}

impl FromStr for SubMap {
    type Err = Error;
    fn from_str(s: &str) -> Result<SubMap> {
        match s.to_lowercase().as_str() {
            "hydro" => Ok(SubMap::Hydro),
            "ni" => Ok(SubMap::NI),
            "roi" => Ok(SubMap::ROI),
            "border" => Ok(SubMap::Border),
            _ => Err(Error::config(format!(
                "Unknown map '{}'. Available: Hydro, NI, ROI, Border",
                s
            ))),
        }
    }
}

impl fmt::Display for SubMap {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Options of one run, built once from the command line
#[derive(Clone, Debug)]
pub struct RunOptions {
    /// Colour schemes, one artifact set per scheme
    pub schemes: Vec<String>,
    /// Sub-maps in processing order. Border is always rendered last.
    pub maps: Vec<SubMap>,
    /// HydroBASINS level (1-9)
    pub basin_level: u8,
    /// Exponent applied to the stream order
    pub strahler_power: f64,
}

impl RunOptions {
    pub fn validate(&self) -> Result<()> {
        if self.schemes.is_empty() {
            return Err(Error::config("No colour scheme selected"));
        }
        let catalog = palette_names();
        for scheme in &self.schemes {
            if !catalog.contains(&scheme.as_str()) {
                return Err(Error::config(format!(
                    "Unknown colour scheme '{}'. Available: {}",
                    scheme,
                    catalog.join(", ")
                )));
            }
        }
        if self.maps.is_empty() {
            return Err(Error::config("No map selected"));
        }
        if !(1..=9).contains(&self.basin_level) {
            return Err(Error::config(format!(
                "Basin level must be between 1 and 9, got {}",
                self.basin_level
            )));
        }
        if !self.strahler_power.is_finite() {
            return Err(Error::config(format!(
                "Invalid Strahler power {}",
                self.strahler_power
            )));
        }
        Ok(())
    }
}

/// Coloured layers of a sub-map
pub struct ColouredMap {
    pub rivers: FeatureCollection,
    pub lakes: Option<FeatureCollection>,
}

/// Per scheme state threaded through the pipeline stages
struct RunContext<'a> {
    scheme: &'a str,
    level: u8,
    palette: Palette,
    policy: PalettePolicy,
    scaling: WidthScaling,
}

/// River map service
pub struct MapService<F: Fetcher> {
    pub config: ApplicationCfg,
    pub cache: DatasetCache<F>,
    pub renderers: Vec<RenderTarget>,
    pub outdir: PathBuf,
}

impl<F: Fetcher> MapService<F> {
    pub fn new(config: ApplicationCfg, cache: DatasetCache<F>) -> Result<MapService<F>> {
        let renderers = RenderTarget::from_config(&config)?;
        let outdir = PathBuf::from(&config.service.outdir);
        Ok(MapService {
            config,
            cache,
            renderers,
            outdir,
        })
    }

    fn map_config(&self, map: SubMap) -> Result<&MapCfg> {
        self.config
            .maps
            .iter()
            .find(|m| m.name.eq_ignore_ascii_case(map.name()))
            .ok_or_else(|| Error::config(format!("No [[map]] configuration for '{}'", map)))
    }

    /// Download (if needed), read and filter a dataset
    pub fn load_dataset(
        &self,
        cfg: &DatasetCfg,
        name: &str,
        scheme: &str,
        level: u8,
    ) -> Result<FeatureCollection> {
        let cfg = cfg.expand(scheme, level);
        let path = self.cache.ensure_local(&cfg.url, cfg.filename.as_deref())?;
        let ds = Datasource::from_path(&path, cfg.format.as_deref(), cfg.layer.clone())?;
        let filter = DatasetFilter::from_config(&cfg)?;
        load_collection(&ds, name, &filter)
    }

    fn colour_map(&self, map: &MapCfg, ctx: &RunContext) -> Result<ColouredMap> {
        let mut basins = self.load_dataset(&map.basins, "basins", ctx.scheme, ctx.level)?;
        let colours = assign_basin_colours(&mut basins, &ctx.palette, &ctx.policy)?;
        let index = BasinIndex::new(&basins);
        let fallback = ctx
            .palette
            .fallback()
            .ok_or_else(|| Error::config(format!("Palette '{}' is empty", ctx.palette.name)))?;

        let mut rivers = self.load_dataset(&map.rivers, "rivers", ctx.scheme, ctx.level)?;
        join_colours(&mut rivers, &index, &colours, fallback);
        assign_line_widths(&mut rivers, &map.stream_order_field, &ctx.scaling);
        assign_paths(&mut rivers)?;

        let lakes = match &map.lakes {
            Some(lakes_cfg) => {
                let mut lakes = self.load_dataset(lakes_cfg, "lakes", ctx.scheme, ctx.level)?;
                join_colours(&mut lakes, &index, &colours, fallback);
                Some(lakes)
            }
            None => None,
        };
        Ok(ColouredMap { rivers, lakes })
    }

    fn render(&self, layers: &MapLayers, basename: &str) -> Result<Vec<PathBuf>> {
        self.renderers
            .iter()
            .map(|renderer| write_output(renderer, layers, &self.outdir, basename))
            .collect()
    }

    fn border_map(
        &self,
        ni: &FeatureCollection,
        roi: &FeatureCollection,
        ctx: &RunContext,
    ) -> Result<Vec<PathBuf>> {
        let border = self.config.border.as_ref().ok_or_else(|| {
            Error::config("Border map requested without [border] configuration")
        })?;
        let combined = combine("border", &[ni, roi]);
        let rivers = if border.clip {
            let ni_area = self.load_dataset(&border.ni_area, "ni_area", ctx.scheme, ctx.level)?;
            let roi_area =
                self.load_dataset(&border.roi_area, "roi_area", ctx.scheme, ctx.level)?;
            border_crossing(&combined, &ni_area, &roi_area)
        } else {
            combined
        };
        let basename = expand_placeholders(&border.output, ctx.scheme, ctx.level);
        let layers = MapLayers {
            title: basename.clone(),
            rivers: &rivers,
            lakes: None,
            view: &border.view,
        };
        self.render(&layers, &basename)
    }

    /// Produce all requested maps. Returns the written files in order.
    pub fn run(&self, opts: &RunOptions) -> Result<Vec<PathBuf>> {
        opts.validate()?;
        let mut outputs = Vec::new();
        let mut linewidth = self.config.linewidth.clone();
        linewidth.exponent = opts.strahler_power;
        let scaling = WidthScaling::from_config(&linewidth)?;

        for scheme in &opts.schemes {
            let now = Instant::now();
            let palette = Palette::by_name(scheme)?;
            let ctx = RunContext {
                scheme,
                level: opts.basin_level,
                policy: PalettePolicy::from_config(&self.config.palette, &palette),
                palette,
                scaling,
            };
            info!("Colour scheme {}", scheme);

            let mut ni = None;
            let mut roi = None;
            for map in opts.maps.iter().filter(|m| **m != SubMap::Border) {
                let map_cfg = self.map_config(*map)?;
                info!("Creating {} map", map);
                let coloured = self.colour_map(map_cfg, &ctx)?;
                let basename = expand_placeholders(&map_cfg.output, scheme, opts.basin_level);
                let layers = MapLayers {
                    title: basename.clone(),
                    rivers: &coloured.rivers,
                    lakes: coloured.lakes.as_ref(),
                    view: &map_cfg.view,
                };
                outputs.extend(self.render(&layers, &basename)?);
                match map {
                    SubMap::NI => ni = Some(coloured.rivers),
                    SubMap::ROI => roi = Some(coloured.rivers),
                    _ => {}
                }
            }

            if opts.maps.contains(&SubMap::Border) {
                match (&ni, &roi) {
                    (Some(ni), Some(roi)) => {
                        info!("Creating Border map");
                        outputs.extend(self.border_map(ni, roi, &ctx)?);
                    }
                    _ => warn!("Border map requires the NI and ROI maps - skipping"),
                }
            }
            info!("{} finished in {:.1}s", scheme, now.elapsed().as_secs_f64());
        }
        Ok(outputs)
    }
}
