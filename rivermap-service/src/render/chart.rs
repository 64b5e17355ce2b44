//
// Copyright (c) rivermap contributors. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::colouring::HEXCOLOUR_ATTR;
use crate::linewidth::{DEFAULT_WIDTH, LINEWIDTH_ATTR};
use crate::render::{script_json, MapLayers, Renderer};
use rivermap_core::core::feature::{FeatureAttrValType, FeatureCollection};
use rivermap_core::Result;
use serde_json::Value;
use tera::{Context, Tera};

static TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{{ title }}</title>
<script src="https://cdn.jsdelivr.net/npm/vega@5"></script>
<script src="https://cdn.jsdelivr.net/npm/vega-lite@5"></script>
<script src="https://cdn.jsdelivr.net/npm/vega-embed@6"></script>
</head>
<body>
<div id="vis"></div>
<script>
vegaEmbed('#vis', {{ spec | safe }}, {renderer: 'svg', actions: false});
</script>
</body>
</html>
"#;

/// Vega-Lite page drawing the unmodified geometries as geoshape marks
pub struct ChartRenderer {
    pub width: u32,
    pub height: u32,
}

impl ChartRenderer {
    pub fn new(width: u32, height: u32) -> ChartRenderer {
        ChartRenderer { width, height }
    }
}

fn hexcolour(feature: &rivermap_core::core::feature::Feature) -> Value {
    match feature.attr(HEXCOLOUR_ATTR) {
        Some(FeatureAttrValType::String(hex)) => Value::from(hex.as_str()),
        _ => Value::from("#000000"),
    }
}

/// GeoJSON features carrying only the attributes used for encoding
pub fn chart_values(features: &FeatureCollection) -> Vec<Value> {
    features
        .features
        .iter()
        .map(|feature| {
            json!({
                "type": "Feature",
                "geometry": geojson::Geometry::new(feature.geometry.to_geojson()),
                "properties": {
                    "hexcolour": hexcolour(feature),
                    "linewidth": feature.attr_f64(LINEWIDTH_ATTR).unwrap_or(DEFAULT_WIDTH),
                },
            })
        })
        .collect()
}

impl ChartRenderer {
    /// Vega-Lite specification
    pub fn spec(&self, layers: &MapLayers) -> Value {
        let mut marks = vec![json!({
            "data": {"values": chart_values(layers.rivers)},
            "mark": {"type": "geoshape", "filled": false},
            "encoding": {
                "color": {"field": "properties.hexcolour", "type": "nominal", "scale": null},
                "strokeWidth": {"field": "properties.linewidth", "type": "quantitative", "scale": null},
            },
        })];
        if let Some(lakes) = layers.lakes {
            marks.push(json!({
                "data": {"values": chart_values(lakes)},
                "mark": {"type": "geoshape", "filled": true, "strokeWidth": 0},
                "encoding": {
                    "color": {"field": "properties.hexcolour", "type": "nominal", "scale": null},
                },
            }));
        }
        json!({
            "$schema": "https://vega.github.io/schema/vega-lite/v5.json",
            "title": layers.title,
            "width": self.width,
            "height": self.height,
            "projection": {"type": "mercator"},
            "layer": marks,
            "config": {"view": {"stroke": null}},
        })
    }
}

impl Renderer for ChartRenderer {
    fn name(&self) -> &'static str {
        "chart"
    }
    fn suffix(&self) -> &'static str {
        "-chart.html"
    }
    fn render(&self, layers: &MapLayers) -> Result<String> {
        let mut tera = Tera::default();
        tera.add_raw_template("chart.html", TEMPLATE)?;
        let mut context = Context::new();
        context.insert("title", &layers.title);
        context.insert("spec", &script_json(&self.spec(layers))?);
        Ok(tera.render("chart.html", &context)?)
    }
}
