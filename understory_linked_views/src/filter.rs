// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Membership test of entities against a brushed data-space rectangle.

use hashbrown::HashSet;
use kurbo::Point;
use tracing::trace;
use understory_scale::BrushExtent;

use crate::data::Dataset;
use crate::entity::{EntityId, View};

/// Returns the ids whose point lies strictly inside `extent`.
///
/// Points on the boundary are excluded. A degenerate extent selects nothing.
/// The result is a fresh set; callers replace a source with it wholesale.
pub fn filter_by_extent<I>(entries: I, extent: &BrushExtent) -> HashSet<EntityId>
where
    I: IntoIterator<Item = (EntityId, Point)>,
{
    if extent.is_degenerate() {
        return HashSet::new();
    }
    entries
        .into_iter()
        .filter(|(_, pt)| extent.contains_open(*pt))
        .map(|(id, _)| id)
        .collect()
}

/// Data-space point tested for each entity when brushing `view`.
///
/// Scatter points use their position. Map features use the first vertex of
/// their geometry, so a brush that covers most of a cell but not that vertex
/// does not select it.
pub fn representative_points(view: View, dataset: &Dataset) -> Vec<(EntityId, Point)> {
    match view {
        View::Scatter => dataset
            .points()
            .iter()
            .map(|p| (p.id, p.position))
            .collect(),
        View::Map => dataset
            .features()
            .iter()
            .filter_map(|f| {
                let vertex = f.geometry.first_vertex();
                if vertex.is_none() {
                    trace!(id = %f.id, "feature has no vertices; never brushable");
                }
                vertex.map(|pt| (f.id, pt))
            })
            .collect(),
    }
}
