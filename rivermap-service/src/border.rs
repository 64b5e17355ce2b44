//
// Copyright (c) rivermap contributors. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

//! Rivers crossing the land border between Northern Ireland and the Republic.

use crate::colouring::BasinIndex;
use rivermap_core::core::feature::FeatureCollection;

/// All features of `collections` in order, as one collection
pub fn combine(name: &str, collections: &[&FeatureCollection]) -> FeatureCollection {
    let mut combined = FeatureCollection::new(name);
    for fc in collections {
        combined.features.extend(fc.features.iter().cloned());
    }
    combined
}

/// Features intersecting both `ni_area` and `roi_area`
pub fn border_crossing(
    rivers: &FeatureCollection,
    ni_area: &FeatureCollection,
    roi_area: &FeatureCollection,
) -> FeatureCollection {
    let ni = BasinIndex::new(ni_area);
    let roi = BasinIndex::new(roi_area);
    let mut crossing = FeatureCollection::new(&rivers.name);
    crossing.features = rivers
        .features
        .iter()
        .filter(|feature| {
            ni.first_intersecting(&feature.geometry).is_some()
                && roi.first_intersecting(&feature.geometry).is_some()
        })
        .cloned()
        .collect();
    info!(
        "{}: {} of {} features cross the border",
        rivers.name,
        crossing.len(),
        rivers.len()
    );
    crossing
}
