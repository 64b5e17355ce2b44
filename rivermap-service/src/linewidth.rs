//
// Copyright (c) rivermap contributors. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use rivermap_core::core::config::LineWidthCfg;
use rivermap_core::core::feature::{FeatureAttrValType, FeatureCollection};
use rivermap_core::{Error, Result};

pub const LINEWIDTH_ATTR: &str = "linewidth";

/// Width of features without a usable stream order
pub const DEFAULT_WIDTH: f64 = 1.0;

/// Line width derived from the stream order of a river
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum WidthScaling {
    /// order ^ exponent
    Power { exponent: f64 },
    /// order / divisor
    Linear { divisor: f64 },
}

impl WidthScaling {
    pub fn from_config(cfg: &LineWidthCfg) -> Result<WidthScaling> {
        match cfg.divisor {
            Some(divisor) if divisor <= 0.0 || !divisor.is_finite() => Err(Error::config(
                format!("linewidth.divisor must be positive, got {}", divisor),
            )),
            Some(divisor) => Ok(WidthScaling::Linear { divisor }),
            None => WidthScaling::power(cfg.exponent),
        }
    }

    pub fn power(exponent: f64) -> Result<WidthScaling> {
        if !exponent.is_finite() {
            return Err(Error::config(format!(
                "Invalid stream order exponent {}",
                exponent
            )));
        }
        Ok(WidthScaling::Power { exponent })
    }

    pub fn width(&self, order: f64) -> f64 {
        match self {
            WidthScaling::Power { exponent } => order.powf(*exponent),
            WidthScaling::Linear { divisor } => order / divisor,
        }
    }
}

/// Set `linewidth` on every feature from the numeric attribute `field`.
/// Returns the number of features without a usable value.
pub fn assign_line_widths(
    features: &mut FeatureCollection,
    field: &str,
    scaling: &WidthScaling,
) -> usize {
    let mut missing = 0;
    for feature in features.features.iter_mut() {
        let width = match feature.attr_f64(field) {
            Some(order) if order >= 0.0 && order.is_finite() => scaling.width(order),
            _ => {
                missing += 1;
                DEFAULT_WIDTH
            }
        };
        feature.set_attr(LINEWIDTH_ATTR, FeatureAttrValType::Double(width));
    }
    if missing > 0 {
        debug!(
            "{}: {} features without numeric '{}', using width {}",
            features.name, missing, field, DEFAULT_WIDTH
        );
    }
    missing
}
