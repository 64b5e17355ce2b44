//
// Copyright (c) rivermap contributors. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

//! Basin colours and the spatial join propagating them to rivers and lakes.

use geo::Intersects;
use rivermap_core::core::config::{PaletteCfg, PalettePolicyCfg};
use rivermap_core::core::feature::{Feature, FeatureAttrValType, FeatureCollection};
use rivermap_core::core::geom::GeometryType;
use rivermap_core::core::palette::{Colour, Palette};
use rivermap_core::{Error, Result};
use rstar::primitives::{GeomWithData, Rectangle};
use rstar::{RTree, AABB};

/// Attribute names written by the colour stage
pub const COLOUR_ATTR: &str = "colour";
pub const HEXCOLOUR_ATTR: &str = "hexcolour";
pub const BASIN_ATTR: &str = "basin";

/// How basin colours are taken from a palette. Index 0 is never assigned to a basin.
#[derive(Clone, PartialEq, Debug)]
pub enum PalettePolicy {
    /// Repeat `palette[1..]` as often as needed
    Cyclic,
    /// Fixed range `palette[offset..offset + count]`
    Slice { offset: usize, count: usize },
}

impl PalettePolicy {
    pub fn from_config(cfg: &PaletteCfg, palette: &Palette) -> PalettePolicy {
        match cfg.policy {
            PalettePolicyCfg::Cyclic => PalettePolicy::Cyclic,
            PalettePolicyCfg::Slice => PalettePolicy::Slice {
                offset: cfg.slice_offset,
                count: cfg
                    .slice_count
                    .unwrap_or_else(|| palette.len().saturating_sub(cfg.slice_offset)),
            },
        }
    }
}

/// Colours for `n` basins in basin order
pub fn basin_colours(palette: &Palette, policy: &PalettePolicy, n: usize) -> Result<Vec<Colour>> {
    match policy {
        PalettePolicy::Cyclic => {
            if palette.len() < 2 {
                return Err(Error::config(format!(
                    "Palette '{}' needs at least 2 colours",
                    palette.name
                )));
            }
            Ok(palette.colours[1..].iter().cycle().take(n).copied().collect())
        }
        PalettePolicy::Slice { offset, count } => {
            if *offset == 0 {
                return Err(Error::config(
                    "Palette slice must not include the fallback colour at index 0",
                ));
            }
            let end = offset + count;
            if end > palette.len() {
                return Err(Error::config(format!(
                    "Palette slice {}..{} exceeds the {} colours of '{}'",
                    offset,
                    end,
                    palette.len(),
                    palette.name
                )));
            }
            if n > *count {
                return Err(Error::config(format!(
                    "{} basins exceed the palette slice of {} colours",
                    n, count
                )));
            }
            Ok(palette.colours[*offset..offset + n].to_vec())
        }
    }
}

fn set_colour(feature: &mut Feature, colour: Colour) {
    feature.set_attr(COLOUR_ATTR, FeatureAttrValType::Colour(colour));
    feature.set_attr(HEXCOLOUR_ATTR, FeatureAttrValType::String(colour.hex()));
}

/// Colour every basin. Returns the assigned colours in basin order.
pub fn assign_basin_colours(
    basins: &mut FeatureCollection,
    palette: &Palette,
    policy: &PalettePolicy,
) -> Result<Vec<Colour>> {
    let colours = basin_colours(palette, policy, basins.len())?;
    for (basin, colour) in basins.features.iter_mut().zip(colours.iter()) {
        set_colour(basin, *colour);
    }
    Ok(colours)
}

type IndexEntry = GeomWithData<Rectangle<[f64; 2]>, usize>;

/// Spatial index over basin polygons
pub struct BasinIndex {
    tree: RTree<IndexEntry>,
    geometries: Vec<geo::Geometry<f64>>,
}

impl BasinIndex {
    pub fn new(basins: &FeatureCollection) -> BasinIndex {
        let mut entries = Vec::with_capacity(basins.len());
        let mut geometries = Vec::with_capacity(basins.len());
        for (idx, basin) in basins.features.iter().enumerate() {
            if let Some(ext) = basin.geometry.bounding_extent() {
                entries.push(GeomWithData::new(
                    Rectangle::from_corners([ext.minx, ext.miny], [ext.maxx, ext.maxy]),
                    idx,
                ));
            }
            geometries.push(basin.geometry.to_geo());
        }
        BasinIndex {
            tree: RTree::bulk_load(entries),
            geometries,
        }
    }

    pub fn len(&self) -> usize {
        self.geometries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.geometries.is_empty()
    }

    /// Indices of all basins intersecting `geom`, ascending
    pub fn intersecting(&self, geom: &GeometryType) -> Vec<usize> {
        let ext = match geom.bounding_extent() {
            Some(ext) => ext,
            None => return Vec::new(),
        };
        let envelope = AABB::from_corners([ext.minx, ext.miny], [ext.maxx, ext.maxy]);
        let geo_geom = geom.to_geo();
        let mut matches: Vec<usize> = self
            .tree
            .locate_in_envelope_intersecting(&envelope)
            .map(|entry| entry.data)
            .filter(|idx| self.geometries[*idx].intersects(&geo_geom))
            .collect();
        matches.sort_unstable();
        matches
    }

    /// Basin for a feature. Rivers crossing several basins get the one with the lowest index.
    pub fn first_intersecting(&self, geom: &GeometryType) -> Option<usize> {
        self.intersecting(geom).into_iter().next()
    }
}

/// Left spatial join of basin colours onto `features`.
///
/// Every feature is kept. Matched features get the basin colour and the
/// basin index in `basin`, unmatched ones get `fallback` and no `basin`.
/// Returns the number of matched features.
pub fn join_colours(
    features: &mut FeatureCollection,
    index: &BasinIndex,
    colours: &[Colour],
    fallback: Colour,
) -> usize {
    let mut matched = 0;
    for feature in features.features.iter_mut() {
        match index
            .first_intersecting(&feature.geometry)
            .and_then(|idx| colours.get(idx).map(|c| (idx, *c)))
        {
            Some((idx, colour)) => {
                set_colour(feature, colour);
                feature.set_attr(BASIN_ATTR, FeatureAttrValType::Int(idx as i64));
                matched += 1;
            }
            None => set_colour(feature, fallback),
        }
    }
    debug!(
        "{}: {} of {} features matched a basin",
        features.name,
        matched,
        features.len()
    );
    matched
}
