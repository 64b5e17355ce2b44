//
// Copyright (c) rivermap contributors. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::colouring::{COLOUR_ATTR, HEXCOLOUR_ATTR};
use crate::linewidth::LINEWIDTH_ATTR;
use crate::render::deck::path_records;
use crate::render::*;
use rivermap_core::core::config::{parse_config, ApplicationCfg, LineWidthCfg, ViewCfg};
use rivermap_core::core::feature::{Feature, FeatureAttrValType, FeatureCollection};
use rivermap_core::core::geom::*;
use rivermap_core::core::palette::Colour;
use rivermap_core::core::path::PathShape;
use rivermap_core::Error;

fn river(lines: Vec<Vec<(f64, f64)>>, colour: Colour, width: f64) -> Feature {
    let lines: Vec<LineString> = lines
        .into_iter()
        .map(|coords| LineString {
            points: coords.into_iter().map(|(x, y)| Coord::new(x, y)).collect(),
        })
        .collect();
    let mut feature = Feature::new(GeometryType::MultiLineString(MultiLineString { lines }));
    feature.set_attr(COLOUR_ATTR, FeatureAttrValType::Colour(colour));
    feature.set_attr(HEXCOLOUR_ATTR, FeatureAttrValType::String(colour.hex()));
    feature.set_attr(LINEWIDTH_ATTR, FeatureAttrValType::Double(width));
    feature
}

fn rivers() -> FeatureCollection {
    let mut fc = FeatureCollection::new("rivers");
    fc.features.push(river(
        vec![vec![(-6.5, 54.1), (-6.4, 54.2)]],
        Colour::new(239, 200, 110),
        2.0,
    ));
    fc.features.push(river(
        vec![
            vec![(-7.0, 53.0), (-7.1, 53.1)],
            vec![(-7.1, 53.1), (-7.2, 53.3)],
        ],
        Colour::new(151, 198, 132),
        1.5,
    ));
    fc
}

fn lakes() -> FeatureCollection {
    let mut fc = FeatureCollection::new("lakes");
    let mut lake = Feature::new(GeometryType::Polygon(Polygon {
        exterior: LinearRing {
            points: vec![
                Coord::new(-6.5, 54.5),
                Coord::new(-6.3, 54.5),
                Coord::new(-6.3, 54.7),
                Coord::new(-6.5, 54.5),
            ],
        },
        interiors: vec![],
    }));
    lake.set_attr("name", FeatureAttrValType::String("Lough Neagh</script>".to_string()));
    lake.set_attr(COLOUR_ATTR, FeatureAttrValType::Colour(Colour::new(1, 2, 3)));
    lake.set_attr(HEXCOLOUR_ATTR, FeatureAttrValType::String("#010203".to_string()));
    fc.features.push(lake);
    fc
}

#[test]
fn test_assign_paths() {
    let mut fc = rivers();
    assign_paths(&mut fc).unwrap();
    match fc.features[0].attr(PLOTSTRINGS_ATTR) {
        Some(FeatureAttrValType::Path(PathShape::Line(points))) => assert_eq!(points.len(), 2),
        other => panic!("unexpected {:?}", other),
    }
    match fc.features[1].attr(PLOTSTRINGS_ATTR) {
        Some(FeatureAttrValType::Path(PathShape::MultiLine(paths))) => assert_eq!(paths.len(), 2),
        other => panic!("unexpected {:?}", other),
    }

    let mut lakes = lakes();
    match assign_paths(&mut lakes) {
        Err(Error::UnsupportedGeometry(kind)) => assert_eq!(kind, "Polygon"),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_path_records() {
    let mut fc = rivers();
    assign_paths(&mut fc).unwrap();
    let records = path_records(&fc).unwrap();
    // Multi-line river expanded into two records
    assert_eq!(records.len(), 3);
    assert_eq!(
        records[0],
        json!({"path": [[-6.5, 54.1], [-6.4, 54.2]], "color": [239, 200, 110], "width": 2.0})
    );
    assert_eq!(records[1]["path"], json!([[-7.0, 53.0], [-7.1, 53.1]]));
    assert_eq!(records[2]["path"], json!([[-7.1, 53.1], [-7.2, 53.3]]));
    assert_eq!(records[2]["color"], json!([151, 198, 132]));
}

#[test]
fn test_deck_render() {
    let mut fc = rivers();
    assign_paths(&mut fc).unwrap();
    let lakes = lakes();
    let view = ViewCfg::default();
    let layers = MapLayers {
        title: "hydrorivers_hydrobasins-Derain-7".to_string(),
        rivers: &fc,
        lakes: Some(&lakes),
        view: &view,
    };
    let renderer = DeckRenderer::new(&LineWidthCfg::default());
    assert_eq!(renderer.suffix(), ".html");
    let html = renderer.render(&layers).unwrap();
    assert!(html.contains("<title>hydrorivers_hydrobasins-Derain-7</title>"));
    assert!(html.contains("new deck.PathLayer"));
    assert!(html.contains("widthScale: 200"));
    assert!(html.contains(r#""color":[239,200,110]"#));
    assert!(html.contains(r#""latitude":53.45"#));
    assert!(html.contains(r#"Lough Neagh<\/script>"#));
    assert!(!html.contains("Lough Neagh</script>"));
}

#[test]
fn test_chart_render() {
    let fc = rivers();
    let lakes = lakes();
    let view = ViewCfg::default();
    let layers = MapLayers {
        title: "ni_rivers_basins-Derain".to_string(),
        rivers: &fc,
        lakes: Some(&lakes),
        view: &view,
    };
    let renderer = ChartRenderer::new(1000, 1300);
    let spec = renderer.spec(&layers);
    assert_eq!(spec["width"], json!(1000));
    assert_eq!(spec["height"], json!(1300));
    let river_layer = &spec["layer"][0];
    assert_eq!(river_layer["mark"]["filled"], json!(false));
    assert_eq!(river_layer["encoding"]["color"]["scale"], json!(null));
    let values = river_layer["data"]["values"].as_array().unwrap();
    assert_eq!(values.len(), 2);
    assert_eq!(values[0]["properties"]["hexcolour"], json!("#efc86e"));
    assert_eq!(values[1]["properties"]["linewidth"], json!(1.5));
    // Geometry passed through unchanged
    assert_eq!(values[1]["geometry"]["type"], json!("MultiLineString"));
    assert_eq!(spec["layer"][1]["mark"]["filled"], json!(true));

    let html = renderer.render(&layers).unwrap();
    assert!(html.contains("vegaEmbed('#vis', {"));
    assert_eq!(renderer.suffix(), "-chart.html");
}

#[test]
fn test_render_targets_from_config() {
    let toml = r#"
        [service]
        renderers = ["chart"]
        chart_width = 800
        "#;
    let config: ApplicationCfg = parse_config(toml.to_string(), "").unwrap();
    let targets = RenderTarget::from_config(&config).unwrap();
    assert_eq!(targets.len(), 1);
    assert_eq!(targets[0].name(), "chart");
    match &targets[0] {
        RenderTarget::Chart(chart) => assert_eq!((chart.width, chart.height), (800, 1300)),
        _ => panic!("chart renderer expected"),
    }
    assert!(RenderTarget::from_name("png", &config).is_err());
}

#[test]
fn test_write_output() {
    let dir = tempfile::tempdir().unwrap();
    let fc = rivers();
    let view = ViewCfg::default();
    let layers = MapLayers {
        title: "roi".to_string(),
        rivers: &fc,
        lakes: None,
        view: &view,
    };
    let outdir = dir.path().join("maps");
    let path = write_output(&ChartRenderer::new(10, 10), &layers, &outdir, "roi_rivers_basins-Tam-7")
        .unwrap();
    assert_eq!(path, outdir.join("roi_rivers_basins-Tam-7-chart.html"));
    assert!(path.exists());
}
