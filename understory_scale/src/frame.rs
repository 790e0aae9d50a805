// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::Point;

use crate::{IdentityProjection, LinearScale};

/// A two-dimensional mapping between data space and a panel's local pixels.
///
/// "Local" means relative to the panel's own origin; translating from the
/// shared drawing surface into the panel is the caller's job (see
/// [`crate::invert_rect`]).
pub trait PixelFrame {
    /// Maps a data-space point into local pixels.
    fn to_pixel(&self, data: Point) -> Point;

    /// Maps a local pixel back into data space.
    fn to_data(&self, pixel: Point) -> Point;
}

/// An ordered pair of independent per-axis scales.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisScales {
    /// Horizontal scale.
    pub x: LinearScale,
    /// Vertical scale.
    pub y: LinearScale,
}

impl AxisScales {
    /// Pairs an x scale with a y scale.
    #[must_use]
    pub const fn new(x: LinearScale, y: LinearScale) -> Self {
        Self { x, y }
    }
}

impl PixelFrame for AxisScales {
    fn to_pixel(&self, data: Point) -> Point {
        Point::new(self.x.apply(data.x), self.y.apply(data.y))
    }

    fn to_data(&self, pixel: Point) -> Point {
        Point::new(self.x.invert(pixel.x), self.y.invert(pixel.y))
    }
}

impl PixelFrame for IdentityProjection {
    fn to_pixel(&self, data: Point) -> Point {
        self.project(data)
    }

    fn to_data(&self, pixel: Point) -> Point {
        self.invert(pixel)
    }
}

impl<F: PixelFrame + ?Sized> PixelFrame for &F {
    fn to_pixel(&self, data: Point) -> Point {
        (**self).to_pixel(data)
    }

    fn to_data(&self, pixel: Point) -> Point {
        (**self).to_data(pixel)
    }
}
