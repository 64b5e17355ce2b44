//
// Copyright (c) rivermap contributors. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::core::geom::*;
use crate::core::path::{to_path, PathShape};
use crate::error::Error;

fn line(n: usize, offset: f64) -> LineString {
    LineString {
        points: (0..n)
            .map(|i| Coord::new_z(offset + i as f64, 53.0 + i as f64 * 0.1, 7.0))
            .collect(),
    }
}

#[test]
fn test_linestring_path() {
    let path = to_path(&GeometryType::LineString(line(4, -7.0))).unwrap();
    match &path {
        PathShape::Line(points) => {
            assert_eq!(points.len(), 4);
            assert_eq!(points[0], [-7.0, 53.0]);
            assert_eq!(points[3], [-4.0, 53.3]);
        }
        other => panic!("unexpected {:?}", other),
    }
    assert_eq!(path.paths().len(), 1);
}

#[test]
fn test_single_member_multilinestring_is_flat() {
    let geom = GeometryType::MultiLineString(MultiLineString {
        lines: vec![line(5, -8.0)],
    });
    match to_path(&geom).unwrap() {
        PathShape::Line(points) => assert_eq!(points.len(), 5),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_multilinestring_path() {
    let geom = GeometryType::MultiLineString(MultiLineString {
        lines: vec![line(2, -8.0), line(3, -7.0), line(6, -6.0)],
    });
    let path = to_path(&geom).unwrap();
    match &path {
        PathShape::MultiLine(paths) => {
            let lens: Vec<usize> = paths.iter().map(Vec::len).collect();
            assert_eq!(lens, vec![2, 3, 6]);
            assert_eq!(paths[1][0], [-7.0, 53.0]);
        }
        other => panic!("unexpected {:?}", other),
    }
    // Deterministic
    assert_eq!(to_path(&geom).unwrap(), path);
    assert_eq!(
        serde_json::to_string(&to_path(&GeometryType::MultiLineString(MultiLineString {
            lines: vec![line(1, 0.0), line(1, 1.0)]
        }))
        .unwrap())
        .unwrap(),
        "[[[0.0,53.0]],[[1.0,53.0]]]"
    );
}

#[test]
fn test_empty_multilinestring() {
    let geom = GeometryType::MultiLineString(MultiLineString::default());
    assert_eq!(to_path(&geom).unwrap(), PathShape::MultiLine(vec![]));
}

#[test]
fn test_unsupported_geometries() {
    let point = GeometryType::Point(Coord::new(-6.0, 54.0));
    match to_path(&point) {
        Err(Error::UnsupportedGeometry(kind)) => assert_eq!(kind, "Point"),
        other => panic!("unexpected {:?}", other),
    }
    let polygon = GeometryType::Polygon(Polygon::default());
    assert_eq!(
        to_path(&polygon).err().map(|e| e.to_string()),
        Some("Unsupported geometry type Polygon".to_string())
    );
}
