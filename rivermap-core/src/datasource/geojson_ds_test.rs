//
// Copyright (c) rivermap contributors. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::core::config::{Config, DatasetCfg};
use crate::core::feature::FeatureAttrValType;
use crate::core::geom::{Extent, GeometryType};
use crate::datasource::{load_collection, Datasource, DatasetFilter, DatasourceType};
use crate::error::Error;
use std::fs;
use std::path::Path;

const RIVERS: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {"type": "Feature", "id": 1,
     "properties": {"name": "Bann", "strahler": 5, "length": 12.5, "note": null},
     "geometry": {"type": "LineString", "coordinates": [[-6.5, 54.8, 10.0], [-6.4, 54.9, 8.0]]}},
    {"type": "Feature", "id": "2",
     "properties": {"name": "Foyle", "strahler": "3"},
     "geometry": {"type": "MultiLineString", "coordinates": [[[-7.3, 54.9], [-7.2, 55.0]], [[-7.2, 55.0], [-7.1, 55.1]]]}},
    {"type": "Feature", "properties": {"name": "Clyde", "strahler": 6},
     "geometry": {"type": "LineString", "coordinates": [[-5.6, 55.3], [-5.5, 55.35]]}},
    {"type": "Feature", "properties": {"name": "nowhere"}, "geometry": null}
  ]
}"#;

fn write_dataset(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

fn dataset_cfg(toml: &str) -> DatasetCfg {
    toml::from_str(toml).unwrap()
}

#[test]
fn test_retrieve_features() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_dataset(dir.path(), "rivers.geojson", RIVERS);
    let ds = Datasource::from_path(&path, None, None).unwrap();
    assert!(ds.info().starts_with("GeoJSON "));

    let mut features = Vec::new();
    let cnt = ds.retrieve_features(|feat| features.push(feat)).unwrap();
    assert_eq!(cnt, 3);
    assert_eq!(features.len(), 3);

    let bann = &features[0];
    assert_eq!(bann.fid, Some(1));
    assert_eq!(bann.attr("name"), Some(&FeatureAttrValType::String("Bann".to_string())));
    assert_eq!(bann.attr("strahler"), Some(&FeatureAttrValType::Int(5)));
    assert_eq!(bann.attr_f64("length"), Some(12.5));
    assert_eq!(bann.attr("note"), None);
    assert_eq!(bann.geometry.type_name(), "LineString");

    let foyle = &features[1];
    assert_eq!(foyle.fid, Some(2));
    assert_eq!(foyle.attr_f64("strahler"), Some(3.0));
    assert_eq!(foyle.geometry.type_name(), "MultiLineString");
    assert_eq!(features[2].fid, None);
}

#[test]
fn test_single_geometry() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_dataset(
        dir.path(),
        "area.json",
        r#"{"type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 0]]]}"#,
    );
    let ds = Datasource::from_path(&path, None, None).unwrap();
    let mut geoms = Vec::new();
    assert_eq!(ds.retrieve_features(|feat| geoms.push(feat.geometry)).unwrap(), 1);
    assert_eq!(geoms[0].type_name(), "Polygon");
}

#[test]
fn test_invalid_geojson() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_dataset(dir.path(), "broken.geojson", r#"{"type": "Feature"#);
    let ds = Datasource::from_path(&path, None, None).unwrap();
    match ds.retrieve_features(|_| {}) {
        Err(Error::GeoJson(_, p)) => assert_eq!(p, path),
        other => panic!("unexpected {:?}", other),
    }

    let ds = Datasource::from_path(&dir.path().join("missing.geojson"), None, None).unwrap();
    assert!(matches!(ds.retrieve_features(|_| {}), Err(Error::Io(_, _))));
}

#[test]
fn test_format_detection() {
    let path = Path::new("data/ows");
    assert!(Datasource::from_path(path, None, None).is_err());
    assert!(matches!(
        Datasource::from_path(path, Some("GeoJSON"), None),
        Ok(Datasource::GeoJson(_))
    ));
    assert!(matches!(
        Datasource::from_path(Path::new("hybas.zip"), None, Some("hybas_eu_lev07_v1c".to_string())),
        Ok(Datasource::Shapefile(_))
    ));
    let err = Datasource::from_path(Path::new("rivers.gpkg"), None, None).err().unwrap();
    assert_eq!(
        err.to_string(),
        "Configuration error: Unsupported dataset format 'gpkg' for rivers.gpkg"
    );
}

#[test]
fn test_filter() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_dataset(dir.path(), "rivers.geojson", RIVERS);
    let ds = Datasource::from_path(&path, None, None).unwrap();

    let no_filter = DatasetFilter::default();
    let all = load_collection(&ds, "rivers", &no_filter).unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all.srid, Some(4326));
    // Always flattened
    let mut dims = Vec::new();
    for feat in &all.features {
        feat.geometry.for_each_coord(&mut |c: &crate::core::geom::Coord| dims.push(c.dims()));
    }
    assert!(dims.iter().all(|d| *d == 2));

    let cfg = dataset_cfg(
        r#"
        url = "https://example.com/rivers.geojson"
        bbox = [-10.56, 51.39, -5.34, 55.43]
        exclude = [[-5.34, 55.43], [-5.85, 55.43], [-5.85, 55.23], [-5.34, 55.23]]
        "#,
    );
    let filter = DatasetFilter::from_config(&cfg).unwrap();
    assert_eq!(
        filter.bbox,
        Some(Extent {
            minx: -10.56,
            miny: 51.39,
            maxx: -5.34,
            maxy: 55.43
        })
    );
    let irish = load_collection(&ds, "rivers", &filter).unwrap();
    let names: Vec<_> = irish
        .features
        .iter()
        .map(|f| f.attr("name").cloned())
        .collect();
    assert_eq!(
        names,
        vec![
            Some(FeatureAttrValType::String("Bann".to_string())),
            Some(FeatureAttrValType::String("Foyle".to_string()))
        ]
    );

    let cfg = dataset_cfg(
        r#"
        url = "https://example.com/rivers.geojson"
        bbox = [-6.0, 54.0, -5.0, 55.0]
        "#,
    );
    let filter = DatasetFilter::from_config(&cfg).unwrap();
    assert_eq!(load_collection(&ds, "rivers", &filter).unwrap().len(), 0);
}

#[test]
fn test_filter_simplify() {
    let mut feature = crate::core::feature::Feature::new(
        GeometryType::from_geojson(&geojson::Value::LineString(vec![
            vec![0.0, 0.0, 5.0],
            vec![1.0, 0.001, 5.0],
            vec![2.0, 0.0, 5.0],
        ]))
        .unwrap(),
    );
    feature.fid = Some(7);
    let filter = DatasetFilter {
        simplify: Some(0.01),
        ..Default::default()
    };
    let simplified = filter.apply(feature).unwrap();
    assert_eq!(simplified.fid, Some(7));
    assert_eq!(
        simplified.geometry.to_geojson(),
        geojson::Value::LineString(vec![vec![0.0, 0.0], vec![2.0, 0.0]])
    );
}

#[test]
fn test_filter_config_errors() {
    let cfg = dataset_cfg(
        r#"
        url = "https://example.com/rivers.geojson"
        exclude = [[-5.34, 55.43], [-5.85, 55.43]]
        "#,
    );
    assert!(DatasetFilter::from_config(&cfg).is_err());
    let cfg = dataset_cfg(
        r#"
        url = "https://example.com/rivers.geojson"
        bbox = [1.0, 0.0, 0.0, 1.0]
        "#,
    );
    assert!(DatasetFilter::from_config(&cfg)
        .err()
        .unwrap()
        .to_string()
        .contains("invalid bbox"));
}
