// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory [`RenderSurface`] for tests and debugging.
//!
//! It does **not** draw anything. It keeps the latest value of every attribute
//! per element and a log of every call, so tests can assert on what the core
//! asked for.

use kurbo::{BezPath, Point, Rect};
use peniko::Color;

use crate::entity::View;
use crate::surface::{Attr, ElementKind, RenderSurface};

/// Handle issued by [`RecordingSurface`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u32);

/// Latest attribute values of one element.
#[derive(Clone, Debug, PartialEq)]
pub struct ElementState {
    /// Owning view.
    pub view: View,
    /// Element shape.
    pub kind: ElementKind,
    /// Outline, for paths.
    pub path: Option<BezPath>,
    /// Center, for circles.
    pub center: Option<Point>,
    /// Radius, for circles.
    pub radius: Option<f64>,
    /// Fill color.
    pub fill: Option<Color>,
    /// Fill opacity.
    pub fill_opacity: Option<f64>,
    /// Outline color.
    pub stroke: Option<Color>,
    /// Outline width.
    pub stroke_width: Option<f64>,
}

impl ElementState {
    fn new(view: View, kind: ElementKind) -> Self {
        Self {
            view,
            kind,
            path: None,
            center: None,
            radius: None,
            fill: None,
            fill_opacity: None,
            stroke: None,
            stroke_width: None,
        }
    }

    fn apply(&mut self, attr: &Attr) {
        match attr {
            Attr::Path(path) => self.path = Some(path.clone()),
            Attr::Circle { center, radius } => {
                self.center = Some(*center);
                self.radius = Some(*radius);
            }
            Attr::Fill(color) => self.fill = Some(*color),
            Attr::FillOpacity(opacity) => self.fill_opacity = Some(*opacity),
            Attr::Stroke(color) => self.stroke = Some(*color),
            Attr::StrokeWidth(width) => self.stroke_width = Some(*width),
        }
    }
}

/// Call recorded by [`RecordingSurface`].
#[derive(Clone, Debug, PartialEq)]
pub enum Op {
    /// An element was created.
    Create {
        /// New handle.
        element: ElementId,
        /// Owning view.
        view: View,
        /// Shape.
        kind: ElementKind,
    },
    /// Attributes were set.
    SetAttributes {
        /// Target element.
        element: ElementId,
        /// Attributes in call order.
        attrs: Vec<Attr>,
    },
    /// A brush region was declared.
    RegisterBrush {
        /// View owning the brush.
        view: View,
        /// Region in surface pixels.
        region: Rect,
    },
}

/// Recording implementation of [`RenderSurface`].
#[derive(Debug, Default)]
pub struct RecordingSurface {
    elements: Vec<ElementState>,
    brushes: Vec<(View, Rect)>,
    ops: Vec<Op>,
}

impl RecordingSurface {
    /// Creates an empty surface.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the state of `element`, if it was created here.
    #[must_use]
    pub fn element(&self, element: ElementId) -> Option<&ElementState> {
        self.elements.get(element.0 as usize)
    }

    /// Iterates all elements in creation order.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "create_element never hands out more than u32::MAX handles"
    )]
    pub fn elements(&self) -> impl Iterator<Item = (ElementId, &ElementState)> + '_ {
        self.elements
            .iter()
            .enumerate()
            .map(|(idx, state)| (ElementId(idx as u32), state))
    }

    /// Iterates the elements of one view in creation order.
    pub fn elements_in(&self, view: View) -> impl Iterator<Item = (ElementId, &ElementState)> + '_ {
        self.elements().filter(move |(_, state)| state.view == view)
    }

    /// Returns the brush region registered for `view`, if any.
    #[must_use]
    pub fn brush_region(&self, view: View) -> Option<Rect> {
        self.brushes
            .iter()
            .rev()
            .find(|(v, _)| *v == view)
            .map(|(_, region)| *region)
    }

    /// Returns every recorded call in order.
    #[must_use]
    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    /// Forgets recorded calls but keeps element state.
    pub fn clear_ops(&mut self) {
        self.ops.clear();
    }
}

impl RenderSurface for RecordingSurface {
    type Element = ElementId;

    fn create_element(&mut self, view: View, kind: ElementKind) -> ElementId {
        let element = ElementId(
            u32::try_from(self.elements.len()).expect("more than u32::MAX recorded elements"),
        );
        self.elements.push(ElementState::new(view, kind));
        self.ops.push(Op::Create {
            element,
            view,
            kind,
        });
        element
    }

    fn set_attributes(&mut self, element: ElementId, attrs: &[Attr]) {
        if let Some(state) = self.elements.get_mut(element.0 as usize) {
            for attr in attrs {
                state.apply(attr);
            }
        }
        self.ops.push(Op::SetAttributes {
            element,
            attrs: attrs.to_vec(),
        });
    }

    fn register_brush(&mut self, view: View, region: Rect) {
        self.brushes.push((view, region));
        self.ops.push(Op::RegisterBrush { view, region });
    }
}
