//
// Copyright (c) rivermap contributors. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::border::{border_crossing, combine};
use rivermap_core::core::feature::{Feature, FeatureAttrValType, FeatureCollection};
use rivermap_core::core::geom::*;

fn area(minx: f64, maxx: f64) -> FeatureCollection {
    let mut fc = FeatureCollection::new("area");
    fc.features.push(Feature::new(GeometryType::MultiPolygon(MultiPolygon {
        polygons: vec![Polygon {
            exterior: LinearRing {
                points: vec![
                    Coord::new(minx, 0.0),
                    Coord::new(maxx, 0.0),
                    Coord::new(maxx, 1.0),
                    Coord::new(minx, 1.0),
                    Coord::new(minx, 0.0),
                ],
            },
            interiors: vec![],
        }],
    })));
    fc
}

fn rivers(name: &str, segments: &[(f64, f64)]) -> FeatureCollection {
    let mut fc = FeatureCollection::new(name);
    for (i, (x1, x2)) in segments.iter().enumerate() {
        let mut feature = Feature::new(GeometryType::LineString(LineString {
            points: vec![Coord::new(*x1, 0.5), Coord::new(*x2, 0.5)],
        }));
        feature.set_attr("name", FeatureAttrValType::String(format!("{}-{}", name, i)));
        fc.features.push(feature);
    }
    fc
}

#[test]
fn test_border_crossing() {
    // NI east of x=1, ROI west of it
    let ni_area = area(1.0, 3.0);
    let roi_area = area(-2.0, 1.0);
    let ni = rivers("ni", &[(1.5, 2.5), (0.5, 1.5)]);
    let roi = rivers("roi", &[(-1.5, -0.5), (0.8, 1.2), (5.0, 6.0)]);

    let all = combine("border", &[&ni, &roi]);
    assert_eq!(all.len(), 5);
    assert_eq!(all.name, "border");

    let crossing = border_crossing(&all, &ni_area, &roi_area);
    let names: Vec<_> = crossing
        .features
        .iter()
        .map(|f| f.attr("name").cloned())
        .collect();
    assert_eq!(
        names,
        vec![
            Some(FeatureAttrValType::String("ni-1".to_string())),
            Some(FeatureAttrValType::String("roi-1".to_string()))
        ]
    );
}

#[test]
fn test_empty_areas() {
    let ni = rivers("ni", &[(0.5, 1.5)]);
    let empty = FeatureCollection::new("area");
    assert!(border_crossing(&ni, &empty, &area(0.0, 2.0)).is_empty());
}
