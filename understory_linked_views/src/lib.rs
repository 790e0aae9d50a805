// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_linked_views --heading-base-level=0

//! Understory Linked Views: a map and a scatter plot sharing one selection.
//!
//! The same set of entities is drawn twice: as outlines on a spatial map
//! (left half of the surface) and as points in a two-dimensional embedding
//! (right half). Brushing a rectangle or hovering an element in either view
//! highlights the matching entities in both.
//!
//! The crate owns the coordination, not the pixels:
//! - [`Dataset`] loads both forms of the entities and links them by [`EntityId`].
//! - [`ViewContext`] holds each view's data ↔ pixel mapping (from
//!   `understory_scale`) and inverts brushed rectangles into entity sets.
//! - [`LinkedViews`] keeps one selection source per view (from
//!   `understory_selection`) and re-projects their union onto every element
//!   after each interaction.
//! - [`RenderSurface`] is the seam to whatever draws. [`RecordingSurface`]
//!   is an in-memory implementation for tests and debugging.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::Rect;
//! use serde_json::json;
//! use understory_linked_views::{
//!     Dataset, LinkedViews, LinkedViewsConfig, RecordingSurface, View,
//! };
//!
//! let config = LinkedViewsConfig::default();
//! let spatial = json!({ "type": "FeatureCollection", "features": [] });
//! let projected = json!([
//!     { "cellLabelInImage": 1, "V1": -1.0, "V2": 0.0, "tumorYN": 1, "tumorCluster": 4 },
//! ]);
//! let data = Dataset::from_json(&spatial, &projected, &config.fields).unwrap();
//!
//! let mut surface = RecordingSurface::new();
//! let mut views = LinkedViews::render(&mut surface, 900.0, 700.0, &data, config).unwrap();
//!
//! // Brush the whole scatter panel.
//! views.handle_brush(&mut surface, View::Scatter, Some(Rect::new(450.0, 0.0, 900.0, 700.0)));
//! assert_eq!(views.merged().len(), 1);
//!
//! // A click without drag clears it again.
//! views.handle_brush(&mut surface, View::Scatter, Some(Rect::new(500.0, 50.0, 500.0, 50.0)));
//! assert!(views.merged().is_empty());
//! ```
//!
//! Logging goes through `tracing`: `debug!` for setup, `trace!` per event,
//! `warn!` for entities that only one of the datasets contains.

mod brush;
mod config;
mod data;
mod entity;
mod filter;
mod highlight;
mod recording;
mod style;
mod surface;
mod view;
mod widget;

pub use brush::BrushGesture;
pub use config::{
    ConfigError, Emphasis, EmphasisConfig, EmphasisPair, FieldNames, HoverBindings, HoverEdit,
    LinkedViewsConfig, MapConfig, OrdinalConfig, PaletteConfig, ScatterConfig,
};
pub use data::{Dataset, LoadError};
pub use entity::{
    Classification, ClusterKey, EntityId, Geometry, ProjectedPoint, Ring, SpatialFeature, View,
};
pub use filter::{filter_by_extent, representative_points};
pub use highlight::apply_highlight;
pub use recording::{ElementId, ElementState, Op, RecordingSurface};
pub use style::{BaseStyle, OrdinalPalette, parse_color};
pub use surface::{Attr, ElementKind, Interaction, Modifiers, RenderSurface};
pub use view::{Frame, ViewContext, ViewElements, init_view};
pub use widget::{LinkedViews, RenderError};
