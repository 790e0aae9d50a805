// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Affine map from a one-dimensional data domain onto a pixel range.
///
/// Both endpoint pairs may be given in either order; a reversed range flips
/// the axis (the common "y grows downward" case). Values outside the domain
/// extrapolate linearly and are never clamped.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearScale {
    domain: [f64; 2],
    range: [f64; 2],
}

impl LinearScale {
    /// Creates a scale mapping `domain[0] → range[0]` and `domain[1] → range[1]`.
    #[must_use]
    pub const fn new(domain: [f64; 2], range: [f64; 2]) -> Self {
        Self { domain, range }
    }

    /// Returns the data-space domain.
    #[must_use]
    pub fn domain(&self) -> [f64; 2] {
        self.domain
    }

    /// Returns the pixel-space range.
    #[must_use]
    pub fn range(&self) -> [f64; 2] {
        self.range
    }

    /// Maps a data value into pixel space.
    ///
    /// A degenerate domain maps every value to the middle of the range.
    #[must_use]
    pub fn apply(&self, value: f64) -> f64 {
        let [d0, d1] = self.domain;
        let [r0, r1] = self.range;
        let span = d1 - d0;
        if span == 0.0 {
            return (r0 + r1) * 0.5;
        }
        r0 + (value - d0) * (r1 - r0) / span
    }

    /// Maps a pixel value back into data space.
    ///
    /// A degenerate range maps every pixel to the middle of the domain.
    #[must_use]
    pub fn invert(&self, pixel: f64) -> f64 {
        let [d0, d1] = self.domain;
        let [r0, r1] = self.range;
        let span = r1 - r0;
        if span == 0.0 {
            return (d0 + d1) * 0.5;
        }
        d0 + (pixel - r0) * (d1 - d0) / span
    }
}
