//
// Copyright (c) rivermap contributors. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

/// Coordinate tuple with optional elevation
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Coord {
    pub x: f64,
    pub y: f64,
    pub z: Option<f64>,
}

impl Coord {
    pub fn new(x: f64, y: f64) -> Coord {
        Coord { x, y, z: None }
    }
    pub fn new_z(x: f64, y: f64, z: f64) -> Coord {
        Coord { x, y, z: Some(z) }
    }
    /// Number of ordinates (2 or 3)
    pub fn dims(&self) -> usize {
        if self.z.is_some() {
            3
        } else {
            2
        }
    }
    pub fn xy(&self) -> [f64; 2] {
        [self.x, self.y]
    }
    pub fn drop_z(&self) -> Coord {
        Coord::new(self.x, self.y)
    }
}

#[derive(Clone, PartialEq, Debug, Default)]
pub struct LineString {
    pub points: Vec<Coord>,
}

#[derive(Clone, PartialEq, Debug, Default)]
pub struct LinearRing {
    pub points: Vec<Coord>,
}

#[derive(Clone, PartialEq, Debug, Default)]
pub struct Polygon {
    pub exterior: LinearRing,
    pub interiors: Vec<LinearRing>,
}

#[derive(Clone, PartialEq, Debug, Default)]
pub struct MultiPoint {
    pub points: Vec<Coord>,
}

#[derive(Clone, PartialEq, Debug, Default)]
pub struct MultiLineString {
    pub lines: Vec<LineString>,
}

#[derive(Clone, PartialEq, Debug, Default)]
pub struct MultiPolygon {
    pub polygons: Vec<Polygon>,
}

#[derive(Clone, PartialEq, Debug, Default)]
pub struct GeometryCollection {
    pub geometries: Vec<GeometryType>,
}

/// Generic Geometry Data Type
#[derive(Clone, PartialEq, Debug)]
pub enum GeometryType {
    Point(Coord),
    LineString(LineString),
    LinearRing(LinearRing),
    Polygon(Polygon),
    MultiPoint(MultiPoint),
    MultiLineString(MultiLineString),
    MultiPolygon(MultiPolygon),
    GeometryCollection(GeometryCollection),
}

fn drop_z_points(points: &[Coord]) -> Vec<Coord> {
    points.iter().map(Coord::drop_z).collect()
}

impl LineString {
    pub fn drop_z(&self) -> LineString {
        LineString {
            points: drop_z_points(&self.points),
        }
    }
}

impl LinearRing {
    pub fn drop_z(&self) -> LinearRing {
        LinearRing {
            points: drop_z_points(&self.points),
        }
    }
}

impl Polygon {
    pub fn drop_z(&self) -> Polygon {
        Polygon {
            exterior: self.exterior.drop_z(),
            interiors: self.interiors.iter().map(LinearRing::drop_z).collect(),
        }
    }
}

impl GeometryType {
    pub fn type_name(&self) -> &'static str {
        match self {
            GeometryType::Point(_) => "Point",
            GeometryType::LineString(_) => "LineString",
            GeometryType::LinearRing(_) => "LinearRing",
            GeometryType::Polygon(_) => "Polygon",
            GeometryType::MultiPoint(_) => "MultiPoint",
            GeometryType::MultiLineString(_) => "MultiLineString",
            GeometryType::MultiPolygon(_) => "MultiPolygon",
            GeometryType::GeometryCollection(_) => "GeometryCollection",
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            GeometryType::Point(_) => false,
            GeometryType::LineString(l) => l.points.is_empty(),
            GeometryType::LinearRing(r) => r.points.is_empty(),
            GeometryType::Polygon(p) => p.exterior.points.is_empty(),
            GeometryType::MultiPoint(p) => p.points.is_empty(),
            GeometryType::MultiLineString(l) => l.lines.is_empty(),
            GeometryType::MultiPolygon(p) => p.polygons.is_empty(),
            GeometryType::GeometryCollection(c) => c.geometries.is_empty(),
        }
    }

    /// Strip the elevation ordinate from every coordinate.
    /// Returns a geometry of the same kind and structure.
    pub fn drop_z(&self) -> GeometryType {
        match self {
            GeometryType::Point(p) => GeometryType::Point(p.drop_z()),
            GeometryType::LineString(l) => GeometryType::LineString(l.drop_z()),
            GeometryType::LinearRing(r) => GeometryType::LinearRing(r.drop_z()),
            GeometryType::Polygon(p) => GeometryType::Polygon(p.drop_z()),
            GeometryType::MultiPoint(mp) => GeometryType::MultiPoint(MultiPoint {
                points: drop_z_points(&mp.points),
            }),
            GeometryType::MultiLineString(ml) => GeometryType::MultiLineString(MultiLineString {
                lines: ml.lines.iter().map(LineString::drop_z).collect(),
            }),
            GeometryType::MultiPolygon(mp) => GeometryType::MultiPolygon(MultiPolygon {
                polygons: mp.polygons.iter().map(Polygon::drop_z).collect(),
            }),
            GeometryType::GeometryCollection(gc) => {
                GeometryType::GeometryCollection(GeometryCollection {
                    geometries: gc.geometries.iter().map(GeometryType::drop_z).collect(),
                })
            }
        }
    }

    /// Visit every coordinate in storage order
    pub fn for_each_coord<F>(&self, f: &mut F)
    where
        F: FnMut(&Coord),
    {
        match self {
            GeometryType::Point(p) => f(p),
            GeometryType::LineString(LineString { points })
            | GeometryType::LinearRing(LinearRing { points })
            | GeometryType::MultiPoint(MultiPoint { points }) => points.iter().for_each(f),
            GeometryType::Polygon(p) => {
                p.exterior.points.iter().for_each(&mut *f);
                for ring in &p.interiors {
                    ring.points.iter().for_each(&mut *f);
                }
            }
            GeometryType::MultiLineString(ml) => {
                for line in &ml.lines {
                    line.points.iter().for_each(&mut *f);
                }
            }
            GeometryType::MultiPolygon(mp) => {
                for polygon in &mp.polygons {
                    polygon.exterior.points.iter().for_each(&mut *f);
                    for ring in &polygon.interiors {
                        ring.points.iter().for_each(&mut *f);
                    }
                }
            }
            GeometryType::GeometryCollection(gc) => {
                for geom in &gc.geometries {
                    geom.for_each_coord(f);
                }
            }
        }
    }

    /// Bounding box of all coordinates, `None` for empty geometries
    pub fn bounding_extent(&self) -> Option<Extent> {
        let mut extent: Option<Extent> = None;
        self.for_each_coord(&mut |c: &Coord| {
            extent = Some(match extent {
                None => Extent {
                    minx: c.x,
                    miny: c.y,
                    maxx: c.x,
                    maxy: c.y,
                },
                Some(ext) => Extent {
                    minx: ext.minx.min(c.x),
                    miny: ext.miny.min(c.y),
                    maxx: ext.maxx.max(c.x),
                    maxy: ext.maxy.max(c.y),
                },
            });
        });
        extent
    }
}

/// Bounding box in lon/lat
#[derive(Deserialize, Clone, Copy, PartialEq, Debug)]
pub struct Extent {
    pub minx: f64,
    pub miny: f64,
    pub maxx: f64,
    pub maxy: f64,
}

impl Extent {
    pub fn intersects(&self, other: &Extent) -> bool {
        self.minx <= other.maxx
            && other.minx <= self.maxx
            && self.miny <= other.maxy
            && other.miny <= self.maxy
    }
}
