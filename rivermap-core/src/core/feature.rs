//
// Copyright (c) rivermap contributors. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::core::geom::GeometryType;
use crate::core::palette::Colour;
use crate::core::path::PathShape;

/// Supported feature attribute value types
#[derive(Clone, PartialEq, Debug)]
pub enum FeatureAttrValType {
    String(String),
    Double(f64),
    Int(i64),
    Bool(bool),
    Colour(Colour),
    Path(PathShape),
}

impl FeatureAttrValType {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FeatureAttrValType::Double(v) => Some(*v),
            FeatureAttrValType::Int(v) => Some(*v as f64),
            FeatureAttrValType::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Attribute value from a JSON property. Null values have no representation.
    pub fn from_json(value: &serde_json::Value) -> Option<FeatureAttrValType> {
        use serde_json::Value;
        match value {
            Value::Null => None,
            Value::Bool(b) => Some(FeatureAttrValType::Bool(*b)),
            Value::Number(n) => Some(match n.as_i64() {
                Some(i) => FeatureAttrValType::Int(i),
                None => FeatureAttrValType::Double(n.as_f64().unwrap_or(f64::NAN)),
            }),
            Value::String(s) => Some(FeatureAttrValType::String(s.clone())),
            other => Some(FeatureAttrValType::String(other.to_string())),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            FeatureAttrValType::String(s) => serde_json::Value::from(s.as_str()),
            FeatureAttrValType::Double(v) => serde_json::Value::from(*v),
            FeatureAttrValType::Int(v) => serde_json::Value::from(*v),
            FeatureAttrValType::Bool(v) => serde_json::Value::from(*v),
            FeatureAttrValType::Colour(c) => serde_json::Value::from(c.rgb().to_vec()),
            FeatureAttrValType::Path(p) => serde_json::to_value(p).unwrap_or_default(),
        }
    }
}

#[derive(Clone, PartialEq, Debug)]
pub struct FeatureAttr {
    pub key: String,
    pub value: FeatureAttrValType,
}

#[derive(Clone, PartialEq, Debug)]
pub struct Feature {
    pub fid: Option<u64>,
    pub attributes: Vec<FeatureAttr>,
    pub geometry: GeometryType,
}

impl Feature {
    pub fn new(geometry: GeometryType) -> Feature {
        Feature {
            fid: None,
            attributes: Vec::new(),
            geometry,
        }
    }

    pub fn attr(&self, key: &str) -> Option<&FeatureAttrValType> {
        self.attributes
            .iter()
            .find(|attr| attr.key == key)
            .map(|attr| &attr.value)
    }

    pub fn attr_f64(&self, key: &str) -> Option<f64> {
        self.attr(key).and_then(FeatureAttrValType::as_f64)
    }

    pub fn colour(&self, key: &str) -> Option<Colour> {
        match self.attr(key) {
            Some(FeatureAttrValType::Colour(c)) => Some(*c),
            _ => None,
        }
    }

    /// Replace an existing attribute or append a new one
    pub fn set_attr(&mut self, key: &str, value: FeatureAttrValType) {
        match self.attributes.iter_mut().find(|attr| attr.key == key) {
            Some(attr) => attr.value = value,
            None => self.attributes.push(FeatureAttr {
                key: key.to_string(),
                value,
            }),
        }
    }

    /// Properties object for GeoJSON output
    pub fn properties(&self) -> serde_json::Map<String, serde_json::Value> {
        self.attributes
            .iter()
            .map(|attr| (attr.key.clone(), attr.value.to_json()))
            .collect()
    }

    pub fn to_geojson(&self) -> geojson::Feature {
        geojson::Feature {
            bbox: None,
            geometry: Some(geojson::Geometry::new(self.geometry.to_geojson())),
            id: self
                .fid
                .map(|fid| geojson::feature::Id::Number(serde_json::Number::from(fid))),
            properties: Some(self.properties()),
            foreign_members: None,
        }
    }
}

/// Features of one dataset sharing a CRS
#[derive(Clone, PartialEq, Debug, Default)]
pub struct FeatureCollection {
    pub name: String,
    /// Spatial reference system (EPSG code), `None` when unknown
    pub srid: Option<i32>,
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(name: &str) -> FeatureCollection {
        FeatureCollection {
            name: name.to_string(),
            srid: None,
            features: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn to_geojson(&self) -> geojson::FeatureCollection {
        geojson::FeatureCollection {
            bbox: None,
            features: self.features.iter().map(Feature::to_geojson).collect(),
            foreign_members: None,
        }
    }
}
