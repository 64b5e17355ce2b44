//
// Copyright (c) rivermap contributors. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

//! Conversions between [GeometryType] and the `geo` / `geojson` representations.
//!
//! `geo` geometries are strictly 2D, so converting to them always drops z.

use crate::core::geom::*;
use crate::error::{Error, Result};
use geo::Simplify;
use geojson::{PolygonType, Position, Value};

fn geo_coord(c: &Coord) -> geo::Coord<f64> {
    geo::Coord { x: c.x, y: c.y }
}

fn geo_line(points: &[Coord]) -> geo::LineString<f64> {
    geo::LineString::new(points.iter().map(geo_coord).collect())
}

fn geo_polygon(polygon: &Polygon) -> geo::Polygon<f64> {
    geo::Polygon::new(
        geo_line(&polygon.exterior.points),
        polygon
            .interiors
            .iter()
            .map(|ring| geo_line(&ring.points))
            .collect(),
    )
}

impl GeometryType {
    pub fn to_geo(&self) -> geo::Geometry<f64> {
        match self {
            GeometryType::Point(p) => geo::Geometry::Point(geo::Point::new(p.x, p.y)),
            GeometryType::LineString(l) => geo::Geometry::LineString(geo_line(&l.points)),
            GeometryType::LinearRing(r) => geo::Geometry::LineString(geo_line(&r.points)),
            GeometryType::Polygon(p) => geo::Geometry::Polygon(geo_polygon(p)),
            GeometryType::MultiPoint(mp) => geo::Geometry::MultiPoint(geo::MultiPoint(
                mp.points.iter().map(|p| geo::Point::new(p.x, p.y)).collect(),
            )),
            GeometryType::MultiLineString(ml) => geo::Geometry::MultiLineString(
                geo::MultiLineString::new(ml.lines.iter().map(|l| geo_line(&l.points)).collect()),
            ),
            GeometryType::MultiPolygon(mp) => geo::Geometry::MultiPolygon(geo::MultiPolygon::new(
                mp.polygons.iter().map(geo_polygon).collect(),
            )),
            GeometryType::GeometryCollection(gc) => geo::Geometry::GeometryCollection(
                geo::GeometryCollection(gc.geometries.iter().map(GeometryType::to_geo).collect()),
            ),
        }
    }

    /// Ramer-Douglas-Peucker simplification of lines and polygons.
    /// Points are returned unchanged, the result is always 2D.
    pub fn simplify(&self, tolerance: f64) -> GeometryType {
        match self.to_geo() {
            geo::Geometry::LineString(l) => {
                let points = points_from_geo(&l.simplify(&tolerance));
                match self {
                    GeometryType::LinearRing(_) => GeometryType::LinearRing(LinearRing { points }),
                    _ => GeometryType::LineString(LineString { points }),
                }
            }
            geo::Geometry::Polygon(p) => GeometryType::Polygon(polygon_from_geo(&p.simplify(&tolerance))),
            geo::Geometry::MultiLineString(ml) => {
                GeometryType::MultiLineString(MultiLineString {
                    lines: ml
                        .simplify(&tolerance)
                        .0
                        .iter()
                        .map(|l| LineString {
                            points: points_from_geo(l),
                        })
                        .collect(),
                })
            }
            geo::Geometry::MultiPolygon(mp) => GeometryType::MultiPolygon(MultiPolygon {
                polygons: mp.simplify(&tolerance).0.iter().map(polygon_from_geo).collect(),
            }),
            _ => match self {
                GeometryType::GeometryCollection(gc) => {
                    GeometryType::GeometryCollection(GeometryCollection {
                        geometries: gc
                            .geometries
                            .iter()
                            .map(|g| g.simplify(tolerance))
                            .collect(),
                    })
                }
                other => other.drop_z(),
            },
        }
    }

    /// GeoJSON geometry value. Linear rings are written as LineStrings.
    pub fn to_geojson(&self) -> Value {
        match self {
            GeometryType::Point(p) => Value::Point(position(p)),
            GeometryType::LineString(LineString { points })
            | GeometryType::LinearRing(LinearRing { points }) => Value::LineString(positions(points)),
            GeometryType::Polygon(p) => Value::Polygon(polygon_positions(p)),
            GeometryType::MultiPoint(mp) => Value::MultiPoint(positions(&mp.points)),
            GeometryType::MultiLineString(ml) => {
                Value::MultiLineString(ml.lines.iter().map(|l| positions(&l.points)).collect())
            }
            GeometryType::MultiPolygon(mp) => {
                Value::MultiPolygon(mp.polygons.iter().map(polygon_positions).collect())
            }
            GeometryType::GeometryCollection(gc) => Value::GeometryCollection(
                gc.geometries
                    .iter()
                    .map(|g| geojson::Geometry::new(g.to_geojson()))
                    .collect(),
            ),
        }
    }

    pub fn from_geojson(value: &Value) -> Result<GeometryType> {
        let geom = match value {
            Value::Point(pos) => GeometryType::Point(coord(pos)?),
            Value::MultiPoint(pos) => GeometryType::MultiPoint(MultiPoint {
                points: coords(pos)?,
            }),
            Value::LineString(pos) => GeometryType::LineString(LineString {
                points: coords(pos)?,
            }),
            Value::MultiLineString(lines) => GeometryType::MultiLineString(MultiLineString {
                lines: lines
                    .iter()
                    .map(|l| coords(l).map(|points| LineString { points }))
                    .collect::<Result<_>>()?,
            }),
            Value::Polygon(rings) => GeometryType::Polygon(polygon(rings)?),
            Value::MultiPolygon(polygons) => GeometryType::MultiPolygon(MultiPolygon {
                polygons: polygons.iter().map(|p| polygon(p)).collect::<Result<_>>()?,
            }),
            Value::GeometryCollection(geoms) => {
                GeometryType::GeometryCollection(GeometryCollection {
                    geometries: geoms
                        .iter()
                        .map(|g| GeometryType::from_geojson(&g.value))
                        .collect::<Result<_>>()?,
                })
            }
        };
        Ok(geom)
    }
}

fn points_from_geo(line: &geo::LineString<f64>) -> Vec<Coord> {
    line.coords().map(|c| Coord::new(c.x, c.y)).collect()
}

fn polygon_from_geo(polygon: &geo::Polygon<f64>) -> Polygon {
    Polygon {
        exterior: LinearRing {
            points: points_from_geo(polygon.exterior()),
        },
        interiors: polygon
            .interiors()
            .iter()
            .map(|ring| LinearRing {
                points: points_from_geo(ring),
            })
            .collect(),
    }
}

fn position(c: &Coord) -> Position {
    match c.z {
        Some(z) => vec![c.x, c.y, z],
        None => vec![c.x, c.y],
    }
}

fn positions(points: &[Coord]) -> Vec<Position> {
    points.iter().map(position).collect()
}

fn polygon_positions(p: &Polygon) -> PolygonType {
    let mut rings = vec![positions(&p.exterior.points)];
    rings.extend(p.interiors.iter().map(|r| positions(&r.points)));
    rings
}

fn coord(pos: &[f64]) -> Result<Coord> {
    match *pos {
        [x, y] => Ok(Coord::new(x, y)),
        [x, y, z, ..] => Ok(Coord::new_z(x, y, z)),
        _ => Err(Error::UnsupportedGeometry(format!(
            "position with {} ordinates",
            pos.len()
        ))),
    }
}

fn coords(pos: &[Position]) -> Result<Vec<Coord>> {
    pos.iter().map(|p| coord(p)).collect()
}

fn polygon(rings: &[Vec<Position>]) -> Result<Polygon> {
    let mut rings = rings.iter();
    let exterior = match rings.next() {
        Some(ring) => LinearRing {
            points: coords(ring)?,
        },
        None => LinearRing::default(),
    };
    let interiors = rings
        .map(|ring| coords(ring).map(|points| LinearRing { points }))
        .collect::<Result<_>>()?;
    Ok(Polygon {
        exterior,
        interiors,
    })
}
