// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The seam between the selection core and whatever actually draws.
//!
//! A [`RenderSurface`] owns elements (SVG nodes, canvas display-list entries,
//! retained scene items...) and accepts declarative attribute updates. The
//! core never reads attributes back; it only writes them.
//!
//! All coordinates handed to a surface are surface-global pixels: the panel
//! offset of each view has already been applied.

use core::fmt::Debug;
use core::hash::Hash;

use kurbo::{BezPath, Point, Rect};
use peniko::Color;
use serde::{Deserialize, Serialize};

use crate::entity::View;

bitflags::bitflags! {
    /// Keyboard modifiers held during a pointer event.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Modifiers: u8 {
        /// Shift.
        const SHIFT = 1;
        /// Control.
        const CTRL = 1 << 1;
        /// Alt / Option.
        const ALT = 1 << 2;
        /// Meta / Command / Super.
        const META = 1 << 3;
    }
}

/// Shape of an element created for an entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// Filled outline (map features).
    Path,
    /// Filled circle (scatter points).
    Circle,
}

/// One declarative attribute update.
#[derive(Clone, Debug, PartialEq)]
pub enum Attr {
    /// Outline geometry.
    Path(BezPath),
    /// Circle geometry.
    Circle {
        /// Center.
        center: Point,
        /// Radius in pixels.
        radius: f64,
    },
    /// Fill color.
    Fill(Color),
    /// Fill opacity in `0.0..=1.0`.
    FillOpacity(f64),
    /// Outline color.
    Stroke(Color),
    /// Outline width in pixels.
    StrokeWidth(f64),
}

impl Attr {
    /// SVG-style attribute name, handy for logs and keyed stores.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Path(_) => "d",
            Self::Circle { .. } => "circle",
            Self::Fill(_) => "fill",
            Self::FillOpacity(_) => "fill-opacity",
            Self::Stroke(_) => "stroke",
            Self::StrokeWidth(_) => "stroke-width",
        }
    }
}

/// A drawing backend the linked views render into.
pub trait RenderSurface {
    /// Handle to a created element.
    type Element: Copy + Eq + Hash + Debug;

    /// Creates an element of `kind` inside `view`'s panel.
    fn create_element(&mut self, view: View, kind: ElementKind) -> Self::Element;

    /// Applies attribute updates to `element`. Attributes not listed keep
    /// their current values.
    fn set_attributes(&mut self, element: Self::Element, attrs: &[Attr]);

    /// Declares the rectangle where `view` accepts brush gestures.
    ///
    /// Surfaces that draw their own brush overlay use this to size it. The
    /// default does nothing.
    fn register_brush(&mut self, view: View, region: Rect) {
        let _ = (view, region);
    }
}

/// Pointer interaction delivered by the host, as a value.
///
/// Hosts may instead call the matching `handle_*` methods on
/// [`crate::LinkedViews`] directly.
#[derive(Clone, Debug, PartialEq)]
pub enum Interaction<E> {
    /// The brush in `view` now covers `selection` (surface pixels), or
    /// `None` when the host reports no selection for this event.
    Brush {
        /// Brushed view.
        view: View,
        /// Brushed rectangle.
        selection: Option<Rect>,
    },
    /// The brush in `view` was removed.
    BrushCleared {
        /// View whose brush was removed.
        view: View,
    },
    /// Pointer pressed at a surface position.
    PointerDown {
        /// Surface position.
        position: Point,
    },
    /// Pointer moved to a surface position.
    PointerMove {
        /// Surface position.
        position: Point,
    },
    /// Pointer released at a surface position.
    PointerUp {
        /// Surface position.
        position: Point,
    },
    /// Pointer entered `element`.
    PointerEnter {
        /// Element under the pointer.
        element: E,
        /// Modifiers held at the time.
        modifiers: Modifiers,
    },
    /// Pointer left the element it was over.
    PointerLeave,
}
