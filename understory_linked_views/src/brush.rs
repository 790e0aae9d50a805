// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Brush gesture helper: turn pointer down/move/up into a clamped rectangle.
//!
//! ## Usage
//!
//! 1) Create one [`BrushGesture`] per view with the view's brush region.
//! 2) On pointer down, call [`BrushGesture::begin`]; it only starts inside the region.
//! 3) On each move, [`BrushGesture::update`] returns the current rectangle.
//! 4) On pointer up, [`BrushGesture::end`] returns the final rectangle and resets.
//!
//! A press and release without movement yields a zero-area rectangle, which
//! callers treat as "clear the brush".
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::{Point, Rect};
//! use understory_linked_views::BrushGesture;
//!
//! let mut brush = BrushGesture::new(Rect::new(0.0, 0.0, 100.0, 100.0));
//! assert!(brush.begin(Point::new(10.0, 20.0)));
//!
//! // Dragging past the region is clamped to its edge.
//! let rect = brush.update(Point::new(150.0, 40.0)).unwrap();
//! assert_eq!(rect, Rect::new(10.0, 20.0, 100.0, 40.0));
//!
//! let done = brush.end(Point::new(50.0, 60.0)).unwrap();
//! assert_eq!(done, Rect::new(10.0, 20.0, 50.0, 60.0));
//! assert!(!brush.is_active());
//! ```

use kurbo::{Point, Rect};

/// Tracks one in-progress brush gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrushGesture {
    region: Rect,
    /// Where the gesture started, once active.
    pub start_pos: Option<Point>,
    /// Latest clamped pointer position.
    pub last_pos: Option<Point>,
}

impl BrushGesture {
    /// Creates an idle gesture bounded by `region` (surface pixels).
    #[must_use]
    pub fn new(region: Rect) -> Self {
        Self {
            region: region.abs(),
            start_pos: None,
            last_pos: None,
        }
    }

    /// The region this gesture is confined to.
    #[must_use]
    pub fn region(&self) -> Rect {
        self.region
    }

    /// Returns `true` if `pos` lies in the region, edges included.
    #[must_use]
    pub fn accepts(&self, pos: Point) -> bool {
        let r = self.region;
        pos.x >= r.x0 && pos.x <= r.x1 && pos.y >= r.y0 && pos.y <= r.y1
    }

    /// Starts a gesture at `pos`. Returns `false`, leaving state untouched, if
    /// `pos` is outside the region.
    pub fn begin(&mut self, pos: Point) -> bool {
        if !self.accepts(pos) {
            return false;
        }
        self.start_pos = Some(pos);
        self.last_pos = Some(pos);
        true
    }

    /// Moves the free corner to `pos` and returns the current rectangle.
    pub fn update(&mut self, pos: Point) -> Option<Rect> {
        self.start_pos?;
        self.last_pos = Some(self.clamp(pos));
        self.selection()
    }

    /// Finishes the gesture at `pos`, returning the final rectangle.
    pub fn end(&mut self, pos: Point) -> Option<Rect> {
        let rect = self.update(pos);
        self.cancel();
        rect
    }

    /// Drops the gesture without producing a rectangle.
    pub fn cancel(&mut self) {
        self.start_pos = None;
        self.last_pos = None;
    }

    /// Returns `true` between [`Self::begin`] and [`Self::end`].
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.start_pos.is_some()
    }

    /// Current rectangle, normalized so `x0 <= x1` and `y0 <= y1`.
    #[must_use]
    pub fn selection(&self) -> Option<Rect> {
        Some(Rect::from_points(self.start_pos?, self.last_pos?))
    }

    fn clamp(&self, pos: Point) -> Point {
        let r = self.region;
        Point::new(pos.x.clamp(r.x0, r.x1), pos.y.clamp(r.y0, r.y1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gesture() -> BrushGesture {
        BrushGesture::new(Rect::new(100.0, 0.0, 200.0, 50.0))
    }

    #[test]
    fn new_gesture_is_idle() {
        let brush = gesture();
        assert!(!brush.is_active());
        assert_eq!(brush.selection(), None);
    }

    #[test]
    fn begin_outside_region_is_rejected() {
        let mut brush = gesture();
        assert!(!brush.begin(Point::new(50.0, 10.0)));
        assert!(!brush.is_active());
        assert!(brush.begin(Point::new(200.0, 50.0)));
    }

    #[test]
    fn update_without_begin_returns_none() {
        let mut brush = gesture();
        assert_eq!(brush.update(Point::new(150.0, 10.0)), None);
        assert!(brush.last_pos.is_none());
    }

    #[test]
    fn dragging_backwards_normalizes() {
        let mut brush = gesture();
        brush.begin(Point::new(180.0, 40.0));
        let rect = brush.update(Point::new(120.0, 10.0));
        assert_eq!(rect, Some(Rect::new(120.0, 10.0, 180.0, 40.0)));
    }

    #[test]
    fn positions_are_clamped_to_region() {
        let mut brush = gesture();
        brush.begin(Point::new(150.0, 25.0));
        let rect = brush.update(Point::new(-500.0, 900.0));
        assert_eq!(rect, Some(Rect::new(100.0, 25.0, 150.0, 50.0)));
    }

    #[test]
    fn click_yields_zero_area() {
        let mut brush = gesture();
        brush.begin(Point::new(150.0, 25.0));
        let rect = brush.end(Point::new(150.0, 25.0)).expect("active gesture");
        assert_eq!(rect.area(), 0.0);
        assert!(!brush.is_active());
    }

    #[test]
    fn cancel_discards_gesture() {
        let mut brush = gesture();
        brush.begin(Point::new(150.0, 25.0));
        brush.cancel();
        assert_eq!(brush.end(Point::new(160.0, 30.0)), None);
    }
}
