//
// Copyright (c) rivermap contributors. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::map_service::{MapService, RunOptions, SubMap};
use rivermap_core::cache::{DatasetCache, HttpFetcher};
use rivermap_core::core::config::{ApplicationCfg, DEFAULT_CONFIG};
use rivermap_core::core::palette::palette_names;
use rivermap_core::core::{parse_config, read_config, Config};
use rivermap_core::{Error, Result};
use clap::ArgMatches;
use std::str::FromStr;

/// Arguments of the `run` subcommand
pub const RUN_ARGS: &str = "-c, --config=[FILE] 'Load from custom config file'
    --loglevel=[error|warn|info|debug|trace] 'Log level (Default: info)'
    --colours=[SCHEME] 'MetBrewer colour scheme (Default: Derain)'
    --allcolours 'Create maps for every colour scheme'
    --maps=[Hydro,NI,ROI,Border] 'Maps to create (Default: all)'
    --basinlevel=[1-9] 'HydroBASINS level (Default: 7)'
    --strahlerpower=[FLOAT] 'Exponent applied to the Strahler order (Default: 0.5)'
    --outdir=[DIR] 'Output directory'
    --cachedir=[DIR] 'Dataset download directory'
    --renderer=[deck|chart|all] 'Render target (Default: from config)'
    --progress=[true|false] 'Show download progress bar'";

pub const DEFAULT_MAPS: &str = "Hydro,NI,ROI,Border";
pub const DEFAULT_BASIN_LEVEL: u8 = 7;

fn parse_arg<T: FromStr>(args: &ArgMatches, name: &str) -> Result<Option<T>> {
    match args.value_of(name) {
        Some(value) => value
            .parse::<T>()
            .map(Some)
            .map_err(|_| Error::config(format!("Invalid value '{}' for --{}", value, name))),
        None => Ok(None),
    }
}

/// Configuration from `--config` or the built-in default, with command line overrides
pub fn config_from_args(args: &ArgMatches) -> Result<ApplicationCfg> {
    let mut config: ApplicationCfg = match args.value_of("config") {
        Some(cfgpath) => {
            info!("Reading configuration from '{}'", cfgpath);
            read_config(cfgpath)?
        }
        None => parse_config(DEFAULT_CONFIG.to_string(), "")?,
    };
    if let Some(outdir) = args.value_of("outdir") {
        config.service.outdir = outdir.to_string();
    }
    if let Some(dir) = args.value_of("cachedir") {
        config.cache.dir = dir.to_string();
    }
    if let Some(progress) = parse_arg::<bool>(args, "progress")? {
        config.cache.progress = progress;
    }
    match args.value_of("renderer") {
        Some("all") => config.service.renderers = vec!["deck".to_string(), "chart".to_string()],
        Some(renderer) => config.service.renderers = vec![renderer.to_string()],
        None => {}
    }
    Ok(config)
}

/// Validated run options
pub fn options_from_args(args: &ArgMatches, config: &ApplicationCfg) -> Result<RunOptions> {
    let schemes = if args.is_present("allcolours") {
        palette_names().iter().map(|s| s.to_string()).collect()
    } else {
        vec![args
            .value_of("colours")
            .unwrap_or(&config.palette.scheme)
            .to_string()]
    };
    let opts = RunOptions {
        schemes,
        maps: SubMap::parse_list(args.value_of("maps").unwrap_or(DEFAULT_MAPS))?,
        basin_level: parse_arg(args, "basinlevel")?.unwrap_or(DEFAULT_BASIN_LEVEL),
        strahler_power: parse_arg(args, "strahlerpower")?.unwrap_or(config.linewidth.exponent),
    };
    opts.validate()?;
    Ok(opts)
}

pub fn service_from_args(config: ApplicationCfg) -> Result<MapService<HttpFetcher>> {
    let cache = DatasetCache::<HttpFetcher>::from_config(&config)?;
    info!("{}", cache.info());
    MapService::new(config, cache)
}

/// Configuration template
pub fn gen_config() -> String {
    let mut toml = DEFAULT_CONFIG.to_string();
    toml.push_str(&DatasetCache::<HttpFetcher>::gen_config());
    toml
}
