// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Affine, Point, Rect, Vec2};

/// Uniform scale + translation from planar data coordinates into pixels.
///
/// This is the projection used for geometry that is already Cartesian (for
/// example cell outlines in image coordinates): no reflection, no rotation,
/// just a zoom factor shared by both axes and an offset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IdentityProjection {
    data_to_pixel: Affine,
    pixel_to_data: Affine,
}

impl Default for IdentityProjection {
    fn default() -> Self {
        Self::from_affine(Affine::IDENTITY)
    }
}

impl IdentityProjection {
    /// Creates a projection with the given uniform scale and translation.
    ///
    /// A non-positive or non-finite `scale` falls back to `1.0`.
    #[must_use]
    pub fn new(scale: f64, translate: Vec2) -> Self {
        let scale = if scale.is_finite() && scale > 0.0 {
            scale
        } else {
            1.0
        };
        Self::from_affine(Affine::translate(translate) * Affine::scale(scale))
    }

    /// Fits `bounds` (data space) into `extent` (pixel space).
    ///
    /// The zoom is the largest uniform factor that keeps all of `bounds`
    /// inside `extent`; the fitted box is centered along the axis with slack.
    /// If `bounds` has zero size on one axis, the other axis decides the
    /// zoom. If it has zero size on both, the zoom is `1.0` and the single
    /// point lands on the center of `extent`.
    #[must_use]
    pub fn fit_extent(extent: Rect, bounds: Rect) -> Self {
        let extent = extent.abs();
        let bounds = bounds.abs();
        let w = extent.width();
        let h = extent.height();

        let kx = (bounds.width() > 0.0).then(|| w / bounds.width());
        let ky = (bounds.height() > 0.0).then(|| h / bounds.height());
        let k = match (kx, ky) {
            (Some(kx), Some(ky)) => kx.min(ky),
            (Some(k), None) | (None, Some(k)) => k,
            (None, None) => 1.0,
        };

        let tx = extent.x0 + (w - k * (bounds.x0 + bounds.x1)) * 0.5;
        let ty = extent.y0 + (h - k * (bounds.y0 + bounds.y1)) * 0.5;
        Self::new(k, Vec2::new(tx, ty))
    }

    /// Returns the uniform zoom factor.
    #[must_use]
    pub fn scale(&self) -> f64 {
        self.data_to_pixel.as_coeffs()[0]
    }

    /// Returns the translation applied after scaling.
    #[must_use]
    pub fn translation(&self) -> Vec2 {
        self.data_to_pixel.translation()
    }

    /// Returns the data → pixel transform, e.g. for projecting whole paths.
    #[must_use]
    pub fn transform(&self) -> Affine {
        self.data_to_pixel
    }

    /// Projects a data-space point into pixels.
    #[must_use]
    pub fn project(&self, pt: Point) -> Point {
        self.data_to_pixel * pt
    }

    /// Maps a pixel back into data space.
    #[must_use]
    pub fn invert(&self, pt: Point) -> Point {
        self.pixel_to_data * pt
    }

    fn from_affine(data_to_pixel: Affine) -> Self {
        Self {
            data_to_pixel,
            pixel_to_data: data_to_pixel.inverse(),
        }
    }
}

#[cfg(test)]
mod tests {
    use kurbo::{Point, Rect, Vec2};

    use super::IdentityProjection;

    fn approx(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
    }

    #[test]
    fn fit_extent_fills_limiting_axis_and_centers_the_other() {
        // 100x50 data box into a 200x200 panel: x limits the zoom to 2.
        let proj = IdentityProjection::fit_extent(
            Rect::new(0.0, 0.0, 200.0, 200.0),
            Rect::new(0.0, 0.0, 100.0, 50.0),
        );
        assert!((proj.scale() - 2.0).abs() < 1e-12);
        assert!(approx(proj.project(Point::new(0.0, 0.0)), Point::new(0.0, 50.0)));
        assert!(approx(
            proj.project(Point::new(100.0, 50.0)),
            Point::new(200.0, 150.0)
        ));
    }

    #[test]
    fn fit_extent_respects_extent_origin() {
        let proj = IdentityProjection::fit_extent(
            Rect::new(10.0, 20.0, 110.0, 120.0),
            Rect::new(-1.0, -1.0, 1.0, 1.0),
        );
        assert!(approx(proj.project(Point::ZERO), Point::new(60.0, 70.0)));
    }

    #[test]
    fn project_and_invert_round_trip() {
        let proj = IdentityProjection::new(3.5, Vec2::new(-12.0, 40.0));
        let pt = Point::new(7.25, -3.0);
        assert!(approx(proj.invert(proj.project(pt)), pt));
    }

    #[test]
    fn degenerate_bounds_do_not_produce_infinite_zoom() {
        let proj = IdentityProjection::fit_extent(
            Rect::new(0.0, 0.0, 100.0, 100.0),
            Rect::new(5.0, 5.0, 5.0, 5.0),
        );
        assert_eq!(proj.scale(), 1.0);
        assert!(approx(proj.project(Point::new(5.0, 5.0)), Point::new(50.0, 50.0)));

        let line = IdentityProjection::fit_extent(
            Rect::new(0.0, 0.0, 100.0, 100.0),
            Rect::new(0.0, 3.0, 20.0, 3.0),
        );
        assert!((line.scale() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn invalid_scale_falls_back_to_unit() {
        let proj = IdentityProjection::new(f64::NAN, Vec2::ZERO);
        assert_eq!(proj.scale(), 1.0);
        let proj = IdentityProjection::new(-2.0, Vec2::ZERO);
        assert_eq!(proj.scale(), 1.0);
    }
}
