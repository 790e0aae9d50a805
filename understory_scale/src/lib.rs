// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_scale --heading-base-level=0

//! Understory Scale: invertible data ↔ pixel mappings for chart panels.
//!
//! This crate provides the small set of mappings a linked-views widget needs
//! to turn a pointer gesture in pixel space back into data space:
//! - [`LinearScale`]: a one-dimensional affine map from a data domain to a
//!   pixel range, with an exact inverse.
//! - [`IdentityProjection`]: a uniform scale plus translation fitted so that a
//!   data-space bounding box fills a pixel extent (the usual setup for drawing
//!   planar polygons that are already in a Cartesian frame).
//! - [`PixelFrame`]: the trait both of the above plug into, so callers can
//!   invert a rectangle without caring which kind of view produced it.
//! - [`invert_rect`] and [`BrushExtent`]: the actual coordinate inversion of a
//!   brushed pixel rectangle into a normalized data-space rectangle.
//!
//! It does **not** clamp anything. Pixels outside a panel invert to data values
//! outside the axis domain and are treated literally downstream.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Point, Vec2};
//! use understory_scale::{AxisScales, LinearScale, invert_rect};
//!
//! // A panel 100px wide, placed 200px from the left of the drawing surface.
//! let scales = AxisScales::new(
//!     LinearScale::new([0.0, 10.0], [0.0, 100.0]),
//!     LinearScale::new([0.0, 10.0], [0.0, 100.0]),
//! );
//! let offset = Vec2::new(200.0, 0.0);
//!
//! // Corners arrive in surface-global pixels.
//! let extent = invert_rect([Point::new(210.0, 10.0), Point::new(260.0, 60.0)], &scales, offset);
//! assert_eq!(extent.min, Point::new(1.0, 1.0));
//! assert_eq!(extent.max, Point::new(6.0, 6.0));
//! assert!(extent.contains_open(Point::new(5.0, 5.0)));
//! ```
//!
//! This crate is `no_std`.

#![no_std]

mod extent;
mod frame;
mod linear;
mod projection;

pub use extent::{BrushExtent, invert_rect};
pub use frame::{AxisScales, PixelFrame};
pub use linear::LinearScale;
pub use projection::IdentityProjection;
