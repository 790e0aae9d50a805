// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Projecting a merged selection onto both views' emphasis attributes.

use tracing::trace;
use understory_selection::Merged;

use crate::config::EmphasisConfig;
use crate::entity::EntityId;
use crate::surface::{Attr, RenderSurface};
use crate::view::ViewElements;

/// Sets the selected or muted emphasis on every element of every view.
///
/// Only emphasis attributes are written. The result depends on nothing but
/// `merged` and the bindings, so repeated calls with the same set are
/// indistinguishable.
pub fn apply_highlight<S: RenderSurface>(
    surface: &mut S,
    views: &[&ViewElements<S::Element>],
    merged: &Merged<EntityId>,
    emphasis: &EmphasisConfig,
) {
    for elements in views {
        let pair = emphasis.for_view(elements.view());
        let selected: Vec<Attr> = pair.selected.attrs();
        let muted: Vec<Attr> = pair.muted.attrs();
        if selected.is_empty() && muted.is_empty() {
            continue;
        }
        for (id, element) in elements.iter() {
            let attrs = if merged.contains(&id) {
                &selected
            } else {
                &muted
            };
            surface.set_attributes(element, attrs);
        }
    }
    trace!(selected = merged.len(), "highlight applied");
}
