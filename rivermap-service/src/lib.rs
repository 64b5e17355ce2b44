//
// Copyright (c) rivermap contributors. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_json;

pub mod border;
pub mod colouring;
pub mod linewidth;
pub mod map_service;
pub mod render;
pub mod runtime_config;

#[cfg(test)]
mod border_test;
#[cfg(test)]
mod map_service_test;

pub use crate::map_service::{MapService, RunOptions, SubMap};
pub use crate::runtime_config::{config_from_args, gen_config, options_from_args, service_from_args};
