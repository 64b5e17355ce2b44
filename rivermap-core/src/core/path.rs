//
// Copyright (c) rivermap contributors. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::core::geom::{Coord, GeometryType};
use crate::error::{Error, Result};

/// Nested coordinate lists as consumed by path layers
#[derive(Serialize, Clone, PartialEq, Debug)]
#[serde(untagged)]
pub enum PathShape {
    Line(Vec<[f64; 2]>),
    MultiLine(Vec<Vec<[f64; 2]>>),
}

impl PathShape {
    /// Single paths in drawing order
    pub fn paths(&self) -> Vec<&[[f64; 2]]> {
        match self {
            PathShape::Line(path) => vec![path.as_slice()],
            PathShape::MultiLine(paths) => paths.iter().map(Vec::as_slice).collect(),
        }
    }
}

fn xy(points: &[Coord]) -> Vec<[f64; 2]> {
    points.iter().map(Coord::xy).collect()
}

/// Convert a line geometry into a path.
///
/// A MultiLineString with a single member collapses to a flat path.
pub fn to_path(geom: &GeometryType) -> Result<PathShape> {
    match geom {
        GeometryType::LineString(line) => Ok(PathShape::Line(xy(&line.points))),
        GeometryType::MultiLineString(multi) if multi.lines.len() == 1 => {
            Ok(PathShape::Line(xy(&multi.lines[0].points)))
        }
        GeometryType::MultiLineString(multi) => Ok(PathShape::MultiLine(
            multi.lines.iter().map(|line| xy(&line.points)).collect(),
        )),
        other => Err(Error::UnsupportedGeometry(other.type_name().to_string())),
    }
}
