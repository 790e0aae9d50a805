// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Point, Rect, Vec2};

use crate::PixelFrame;

/// Data-space rectangle produced by inverting a brushed pixel rectangle.
///
/// Always normalized: `min.x <= max.x` and `min.y <= max.y`. A NaN corner
/// coordinate collapses that axis, leaving the extent degenerate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BrushExtent {
    /// Lower corner.
    pub min: Point,
    /// Upper corner.
    pub max: Point,
}

impl BrushExtent {
    /// Builds an extent from two arbitrary corners.
    #[must_use]
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            min: Point::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Returns `true` if `pt` lies strictly inside on both axes.
    ///
    /// Points on the boundary are excluded.
    #[must_use]
    pub fn contains_open(&self, pt: Point) -> bool {
        pt.x > self.min.x && pt.x < self.max.x && pt.y > self.min.y && pt.y < self.max.y
    }

    /// Returns `true` if the extent has no interior, so nothing can be inside.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        !(self.max.x > self.min.x && self.max.y > self.min.y)
    }

    /// Returns the extent as a `kurbo::Rect`.
    #[must_use]
    pub fn to_rect(&self) -> Rect {
        Rect::from_points(self.min, self.max)
    }
}

/// Inverts a pixel rectangle on the shared drawing surface into data space.
///
/// Each corner has `origin_offset` (the panel's top-left corner on the
/// surface) subtracted before being mapped through `frame`. The result is
/// normalized, so flipped axes and corners given in any order are fine.
/// Nothing is clamped to the frame's domain.
#[must_use]
pub fn invert_rect<F: PixelFrame>(
    corners: [Point; 2],
    frame: &F,
    origin_offset: Vec2,
) -> BrushExtent {
    let [a, b] = corners.map(|corner| frame.to_data(corner - origin_offset));
    BrushExtent::from_corners(a, b)
}
