//
// Copyright (c) rivermap contributors. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

pub mod config;
pub mod convert;
pub mod feature;
pub mod geom;
pub mod palette;
pub mod path;

pub use self::config::{parse_config, read_config, ApplicationCfg, Config};

#[cfg(test)]
mod path_test;
