//
// Copyright (c) rivermap contributors. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::colouring::COLOUR_ATTR;
use crate::linewidth::{DEFAULT_WIDTH, LINEWIDTH_ATTR};
use crate::render::{script_json, MapLayers, Renderer, PLOTSTRINGS_ATTR};
use rivermap_core::core::config::LineWidthCfg;
use rivermap_core::core::feature::{FeatureAttrValType, FeatureCollection};
use rivermap_core::core::path::to_path;
use rivermap_core::Result;
use serde_json::Value;
use tera::{Context, Tera};

static TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{{ title }}</title>
<script src="https://unpkg.com/deck.gl@8.9.0/dist.min.js"></script>
<style>
  body { margin: 0; background: #ffffff; }
  #map { width: 100vw; height: 100vh; position: relative; }
</style>
</head>
<body>
<div id="map"></div>
<script>
const paths = {{ paths | safe }};
const lakes = {{ lakes | safe }};
new deck.DeckGL({
  container: 'map',
  initialViewState: {{ view | safe }},
  controller: true,
  layers: [
    new deck.PathLayer({
      id: 'rivers',
      data: paths,
      widthScale: {{ width_scale }},
      widthMinPixels: {{ width_min_pixels }},
      getPath: d => d.path,
      getColor: d => d.color,
      getWidth: d => d.width
    }),
    new deck.GeoJsonLayer({
      id: 'lakes',
      data: lakes,
      filled: true,
      stroked: false,
      getFillColor: f => f.properties.colour
    })
  ]
});
</script>
</body>
</html>
"#;

/// deck.gl page with a PathLayer for rivers and a GeoJsonLayer for lakes
pub struct DeckRenderer {
    pub width_scale: f64,
    pub width_min_pixels: f64,
}

impl DeckRenderer {
    pub fn new(cfg: &LineWidthCfg) -> DeckRenderer {
        DeckRenderer {
            width_scale: cfg.width_scale,
            width_min_pixels: cfg.width_min_pixels,
        }
    }
}

/// One PathLayer record per single path. Multi-line rivers are split in order.
pub fn path_records(rivers: &FeatureCollection) -> Result<Vec<Value>> {
    let mut records = Vec::with_capacity(rivers.len());
    for feature in &rivers.features {
        let path = match feature.attr(PLOTSTRINGS_ATTR) {
            Some(FeatureAttrValType::Path(path)) => path.clone(),
            _ => to_path(&feature.geometry)?,
        };
        let color = feature
            .colour(COLOUR_ATTR)
            .map(|c| c.rgb())
            .unwrap_or([0, 0, 0]);
        let width = feature.attr_f64(LINEWIDTH_ATTR).unwrap_or(DEFAULT_WIDTH);
        for single in path.paths() {
            records.push(json!({
                "path": single,
                "color": color,
                "width": width,
            }));
        }
    }
    Ok(records)
}

impl Renderer for DeckRenderer {
    fn name(&self) -> &'static str {
        "deck"
    }
    fn suffix(&self) -> &'static str {
        ".html"
    }
    fn render(&self, layers: &MapLayers) -> Result<String> {
        let paths = Value::Array(path_records(layers.rivers)?);
        let lakes = match layers.lakes {
            Some(lakes) => serde_json::to_value(lakes.to_geojson())?,
            None => json!({"type": "FeatureCollection", "features": []}),
        };
        let view = json!({
            "latitude": layers.view.latitude,
            "longitude": layers.view.longitude,
            "zoom": layers.view.zoom,
            "pitch": 0,
            "bearing": 0,
        });

        let mut tera = Tera::default();
        tera.add_raw_template("deck.html", TEMPLATE)?;
        let mut context = Context::new();
        context.insert("title", &layers.title);
        context.insert("paths", &script_json(&paths)?);
        context.insert("lakes", &script_json(&lakes)?);
        context.insert("view", &script_json(&view)?);
        context.insert("width_scale", &self.width_scale);
        context.insert("width_min_pixels", &self.width_min_pixels);
        Ok(tera.render("deck.html", &context)?)
    }
}
