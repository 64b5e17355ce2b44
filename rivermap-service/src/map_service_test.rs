//
// Copyright (c) rivermap contributors. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::map_service::{MapService, RunOptions, SubMap};
use rivermap_core::cache::{DatasetCache, Fetcher};
use rivermap_core::core::config::ApplicationCfg;
use rivermap_core::core::parse_config;
use rivermap_core::{Error, Result};
use std::fs;
use std::io::Write;
use std::path::Path;

/// Every download attempt fails
struct Offline;

impl Fetcher for Offline {
    fn fetch(&self, url: &str, _dest: &mut dyn Write) -> Result<u64> {
        Err(Error::Fetch {
            url: url.to_string(),
            reason: "offline".to_string(),
        })
    }
}

const CONFIG: &str = r#"
[service]
outdir = "OUTDIR"
renderers = ["deck", "chart"]

[[map]]
name = "NI"
output = "ni-{scheme}"
stream_order_field = "strahler"

[map.rivers]
url = "https://example.com/ni/rivers.geojson"

[map.basins]
url = "https://example.com/basins?level={level}"
filename = "basins_lev{level02}.geojson"

[map.lakes]
url = "https://example.com/ni/lakes.geojson"

[[map]]
name = "ROI"
output = "roi-{scheme}-{level}"
stream_order_field = "ORDER_"

[map.rivers]
url = "https://example.com/roi/rivers.json"
filename = "roi_rivers.geojson"

[map.basins]
url = "https://example.com/basins?level={level}"
filename = "basins_lev{level02}.geojson"

[border]
output = "border-{scheme}-{level}"

[border.ni_area]
url = "https://example.com/ni_area.geojson"

[border.roi_area]
url = "https://example.com/roi_area.geojson"
"#;

fn polygon(minx: f64, miny: f64, maxx: f64, maxy: f64) -> String {
    format!(
        r#"{{"type": "Polygon", "coordinates": [[[{minx}, {miny}], [{maxx}, {miny}], [{maxx}, {maxy}], [{minx}, {maxy}], [{minx}, {miny}]]]}}"#,
        minx = minx,
        miny = miny,
        maxx = maxx,
        maxy = maxy
    )
}

fn feature(props: &str, geometry: &str) -> String {
    format!(
        r#"{{"type": "Feature", "properties": {}, "geometry": {}}}"#,
        props, geometry
    )
}

fn collection(features: &[String]) -> String {
    format!(
        r#"{{"type": "FeatureCollection", "features": [{}]}}"#,
        features.join(",")
    )
}

fn line(coords: &str) -> String {
    format!(r#"{{"type": "LineString", "coordinates": {}}}"#, coords)
}

/// Cache directory with all datasets of the test configuration
fn seed_cache(dir: &Path) {
    let files = vec![
        (
            "basins_lev07.geojson",
            collection(&[
                feature(r#"{"HYBAS_ID": 1}"#, &polygon(-8.0, 54.0, -7.0, 55.0)),
                feature(r#"{"HYBAS_ID": 2}"#, &polygon(-7.0, 54.0, -6.0, 55.0)),
            ]),
        ),
        (
            "rivers.geojson",
            collection(&[
                feature(
                    r#"{"strahler": 4}"#,
                    &line("[[-6.5, 54.5, 3.0], [-6.4, 54.6, 2.0]]"),
                ),
                feature(r#"{"strahler": 9}"#, &line("[[-7.2, 54.5], [-6.8, 54.5]]")),
            ]),
        ),
        (
            "lakes.geojson",
            collection(&[feature(
                r#"{"name": "Lough"}"#,
                &polygon(-6.6, 54.6, -6.5, 54.7),
            )]),
        ),
        (
            "roi_rivers.geojson",
            collection(&[
                feature(r#"{"ORDER_": 1}"#, &line("[[-7.5, 54.2], [-7.4, 54.3]]")),
                feature(r#"{"ORDER_": 2}"#, &line("[[-9.0, 52.0], [-9.1, 52.1]]")),
            ]),
        ),
        (
            "ni_area.geojson",
            collection(&[feature("{}", &polygon(-7.0, 54.0, -5.0, 56.0))]),
        ),
        (
            "roi_area.geojson",
            collection(&[feature("{}", &polygon(-11.0, 51.0, -7.0, 56.0))]),
        ),
    ];
    for (name, content) in files {
        fs::write(dir.join(name), content).unwrap();
    }
}

fn service(dir: &Path) -> MapService<Offline> {
    let outdir = dir.join("maps");
    let toml = CONFIG.replace("OUTDIR", &outdir.display().to_string());
    let config: ApplicationCfg = parse_config(toml, "").unwrap();
    MapService::new(config, DatasetCache::new(dir, Offline)).unwrap()
}

fn options(maps: &[SubMap]) -> RunOptions {
    RunOptions {
        schemes: vec!["Derain".to_string()],
        maps: maps.to_vec(),
        basin_level: 7,
        strahler_power: 0.5,
    }
}

#[test]
fn test_run_offline() {
    let dir = tempfile::tempdir().unwrap();
    seed_cache(dir.path());
    let svc = service(dir.path());
    let outputs = svc
        .run(&options(&[SubMap::Border, SubMap::NI, SubMap::ROI]))
        .unwrap();
    let names: Vec<String> = outputs
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(
        names,
        vec![
            "ni-Derain.html",
            "ni-Derain-chart.html",
            "roi-Derain-7.html",
            "roi-Derain-7-chart.html",
            "border-Derain-7.html",
            "border-Derain-7-chart.html",
        ]
    );
    assert!(outputs.iter().all(|p| p.starts_with(dir.path().join("maps"))));

    // Derain: #efc86e (fallback), #97c684 (basin 1), #6f9969 (basin 2)
    let ni = fs::read_to_string(&outputs[0]).unwrap();
    assert!(ni.contains(r#"{"color":[111,153,105],"path":[[-6.5,54.5],[-6.4,54.6]],"width":2.0}"#));
    assert!(ni.contains(r#"{"color":[151,198,132],"path":[[-7.2,54.5],[-6.8,54.5]],"width":3.0}"#));
    // Lake in basin 2
    assert!(ni.contains(r#""colour":[111,153,105]"#));

    let roi_chart = fs::read_to_string(&outputs[3]).unwrap();
    assert!(roi_chart.contains(r##"{"hexcolour":"#97c684","linewidth":1.0}"##));
    assert!(roi_chart.contains(r##""hexcolour":"#efc86e""##));

    // Only the river crossing x=-7 is on the border map
    let border = fs::read_to_string(&outputs[4]).unwrap();
    assert!(border.contains("[[-7.2,54.5],[-6.8,54.5]]"));
    assert!(!border.contains("[-6.5,54.5]"));
    assert!(!border.contains("[-7.5,54.2]"));
}

#[test]
fn test_border_needs_ni_and_roi() {
    let dir = tempfile::tempdir().unwrap();
    seed_cache(dir.path());
    let svc = service(dir.path());
    let outputs = svc.run(&options(&[SubMap::NI, SubMap::Border])).unwrap();
    assert_eq!(outputs.len(), 2);
    assert!(!dir.path().join("maps/border-Derain-7.html").exists());
}

#[test]
fn test_fetch_error_aborts_run() {
    let dir = tempfile::tempdir().unwrap();
    seed_cache(dir.path());
    fs::remove_file(dir.path().join("roi_rivers.geojson")).unwrap();
    let svc = service(dir.path());
    match svc.run(&options(&[SubMap::NI, SubMap::ROI])) {
        Err(Error::Fetch { url, .. }) => assert_eq!(url, "https://example.com/roi/rivers.json"),
        other => panic!("unexpected {:?}", other),
    }
    // NI was written before the failure
    assert!(dir.path().join("maps/ni-Derain.html").exists());
}

#[test]
fn test_missing_map_config() {
    let dir = tempfile::tempdir().unwrap();
    let svc = service(dir.path());
    let err = svc.run(&options(&[SubMap::Hydro])).err().unwrap();
    assert_eq!(
        err.to_string(),
        "Configuration error: No [[map]] configuration for 'Hydro'"
    );
}

#[test]
fn test_run_options() {
    assert_eq!(
        SubMap::parse_list("Hydro,ni, ROI,Border,NI").unwrap(),
        vec![SubMap::Hydro, SubMap::NI, SubMap::ROI, SubMap::Border]
    );
    assert!(SubMap::parse_list("").is_err());
    assert!(SubMap::parse_list("Hydro,Scotland").is_err());

    let mut opts = options(&[SubMap::Hydro]);
    assert!(opts.validate().is_ok());
    opts.basin_level = 10;
    assert!(opts.validate().is_err());
    opts.basin_level = 0;
    assert!(opts.validate().is_err());
    opts.basin_level = 9;
    opts.schemes = vec!["Viridis".to_string()];
    let err = opts.validate().err().unwrap().to_string();
    assert!(err.starts_with("Configuration error: Unknown colour scheme 'Viridis'"));
}
