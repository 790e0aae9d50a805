// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-view layout and the one-time element setup.

use hashbrown::{HashMap, HashSet};
use kurbo::{Point, Rect, Vec2};
use tracing::debug;
use understory_scale::{AxisScales, IdentityProjection, LinearScale, PixelFrame, invert_rect};

use crate::config::{ConfigError, LinkedViewsConfig, ScatterConfig};
use crate::data::Dataset;
use crate::entity::{EntityId, View};
use crate::filter::{filter_by_extent, representative_points};
use crate::style::{BaseStyle, parse_color};
use crate::surface::{Attr, ElementKind, RenderSurface};

/// Data ↔ local-pixel mapping of one view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Frame {
    /// Two independent linear axes (scatter).
    Axes(AxisScales),
    /// Uniform fitted projection (map).
    Projection(IdentityProjection),
}

impl PixelFrame for Frame {
    fn to_pixel(&self, data: Point) -> Point {
        match self {
            Self::Axes(axes) => axes.to_pixel(data),
            Self::Projection(projection) => projection.to_pixel(data),
        }
    }

    fn to_data(&self, pixel: Point) -> Point {
        match self {
            Self::Axes(axes) => axes.to_data(pixel),
            Self::Projection(projection) => projection.to_data(pixel),
        }
    }
}

/// Everything a brush handler needs to turn a pixel rectangle into ids.
///
/// Built once at render time and passed explicitly; nothing here changes
/// afterwards.
#[derive(Clone, Debug)]
pub struct ViewContext {
    /// Which view this is.
    pub view: View,
    /// Data ↔ local-pixel mapping.
    pub frame: Frame,
    /// Top-left of the view's panel on the surface.
    pub origin_offset: Vec2,
    /// Where brush gestures are accepted, in surface pixels.
    pub brush_region: Rect,
    /// Representative data-space point of each entity.
    pub points: Vec<(EntityId, Point)>,
}

impl ViewContext {
    /// Assembles a context from its parts.
    #[must_use]
    pub fn new(
        view: View,
        frame: Frame,
        origin_offset: Vec2,
        brush_region: Rect,
        points: Vec<(EntityId, Point)>,
    ) -> Self {
        Self {
            view,
            frame,
            origin_offset,
            brush_region,
            points,
        }
    }

    /// Left half of the surface, with the projection fitted to the features.
    #[must_use]
    pub fn map(width: f64, height: f64, dataset: &Dataset) -> Self {
        let panel = Rect::new(0.0, 0.0, width / 2.0, height);
        let projection = match dataset.map_bounds() {
            Some(bounds) => IdentityProjection::fit_extent(panel, bounds),
            None => IdentityProjection::default(),
        };
        debug!(
            scale = projection.scale(),
            tx = projection.translation().x,
            ty = projection.translation().y,
            "fitted map projection"
        );
        Self::new(
            View::Map,
            Frame::Projection(projection),
            Vec2::ZERO,
            panel,
            representative_points(View::Map, dataset),
        )
    }

    /// Right half of the surface, pushed down by the configured top margin.
    #[must_use]
    pub fn scatter(width: f64, height: f64, dataset: &Dataset, config: &ScatterConfig) -> Self {
        let axes = AxisScales::new(
            LinearScale::new(config.x_domain, [0.0, width / 2.0]),
            LinearScale::new(config.y_domain, [0.0, height]),
        );
        Self::new(
            View::Scatter,
            Frame::Axes(axes),
            Vec2::new(width / 2.0, config.top_margin),
            Rect::new(width / 2.0, 0.0, width, height),
            representative_points(View::Scatter, dataset),
        )
    }

    /// Maps a data-space point to surface pixels.
    #[must_use]
    pub fn to_surface(&self, data: Point) -> Point {
        self.frame.to_pixel(data) + self.origin_offset
    }

    /// Ids selected by a brushed rectangle given in surface pixels.
    #[must_use]
    pub fn brush_selection(&self, rect: Rect) -> HashSet<EntityId> {
        let extent = invert_rect(
            [Point::new(rect.x0, rect.y0), Point::new(rect.x1, rect.y1)],
            &self.frame,
            self.origin_offset,
        );
        filter_by_extent(self.points.iter().copied(), &extent)
    }
}

/// Entity ↔ element binding of one view, fixed at initialization.
#[derive(Clone, Debug)]
pub struct ViewElements<E> {
    view: View,
    entries: Vec<(EntityId, E)>,
    by_element: HashMap<E, EntityId>,
    by_entity: HashMap<EntityId, E>,
}

impl<E> ViewElements<E>
where
    E: Copy + Eq + core::hash::Hash,
{
    fn new(view: View) -> Self {
        Self {
            view,
            entries: Vec::new(),
            by_element: HashMap::new(),
            by_entity: HashMap::new(),
        }
    }

    fn bind(&mut self, id: EntityId, element: E) {
        self.entries.push((id, element));
        self.by_element.insert(element, id);
        self.by_entity.insert(id, element);
    }

    /// The owning view.
    #[must_use]
    pub fn view(&self) -> View {
        self.view
    }

    /// Entity drawn by `element`, if it belongs to this view.
    #[must_use]
    pub fn entity_of(&self, element: E) -> Option<EntityId> {
        self.by_element.get(&element).copied()
    }

    /// Element drawing `id` in this view.
    #[must_use]
    pub fn element_of(&self, id: EntityId) -> Option<E> {
        self.by_entity.get(&id).copied()
    }

    /// Bindings in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, E)> + '_ {
        self.entries.iter().copied()
    }

    /// Number of bound elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the view drew nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Creates one element per entity of `context.view` with geometry and base
/// encoding, then registers the view's brush region.
///
/// Emphasis attributes are left alone.
pub fn init_view<S: RenderSurface>(
    surface: &mut S,
    context: &ViewContext,
    dataset: &Dataset,
    style: &mut BaseStyle,
    config: &LinkedViewsConfig,
) -> Result<ViewElements<S::Element>, ConfigError> {
    let mut elements = ViewElements::new(context.view);
    match context.view {
        View::Map => {
            for feature in dataset.features() {
                let element = surface.create_element(View::Map, ElementKind::Path);
                let path = feature.geometry.to_path(|pt| context.to_surface(pt));
                surface.set_attributes(
                    element,
                    &[
                        Attr::Path(path),
                        Attr::Fill(style.fill(&feature.classification)),
                        Attr::StrokeWidth(config.map.stroke_width),
                    ],
                );
                elements.bind(feature.id, element);
            }
        }
        View::Scatter => {
            let stroke = parse_color(&config.scatter.stroke)?;
            for point in dataset.points() {
                let element = surface.create_element(View::Scatter, ElementKind::Circle);
                surface.set_attributes(
                    element,
                    &[
                        Attr::Circle {
                            center: context.to_surface(point.position),
                            radius: config.scatter.radius,
                        },
                        Attr::Fill(style.fill(&point.classification)),
                        Attr::Stroke(stroke),
                        Attr::StrokeWidth(config.scatter.stroke_width),
                    ],
                );
                elements.bind(point.id, element);
            }
        }
    }
    surface.register_brush(context.view, context.brush_region);
    debug!(
        view = %context.view,
        elements = elements.len(),
        "view initialized"
    );
    Ok(elements)
}

#[cfg(test)]
mod tests {
    use kurbo::{Point, Rect, Vec2};

    use super::{ViewContext, init_view};
    use crate::config::{LinkedViewsConfig, ScatterConfig};
    use crate::data::Dataset;
    use crate::entity::{
        Classification, ClusterKey, EntityId, Geometry, ProjectedPoint, SpatialFeature, View,
    };
    use crate::recording::RecordingSurface;
    use crate::style::BaseStyle;
    use crate::surface::ElementKind;

    fn dataset() -> Dataset {
        let features = vec![SpatialFeature {
            id: EntityId(7),
            geometry: Geometry::Polygon(vec![vec![
                Point::new(0.0, 0.0),
                Point::new(10.0, 0.0),
                Point::new(10.0, 20.0),
            ]]),
            classification: Classification::Tumor(ClusterKey::Int(4)),
        }];
        let points = vec![ProjectedPoint {
            id: EntityId(7),
            position: Point::new(-1.0, 0.0),
            classification: Classification::Tumor(ClusterKey::Int(4)),
        }];
        Dataset::new(features, points).expect("unique ids")
    }

    #[test]
    fn scatter_layout_matches_panel() {
        let ctx = ViewContext::scatter(900.0, 700.0, &dataset(), &ScatterConfig::default());
        assert_eq!(ctx.origin_offset, Vec2::new(450.0, 10.0));
        assert_eq!(ctx.brush_region, Rect::new(450.0, 0.0, 900.0, 700.0));
        // -1 is halfway along [-5.5, 3.5]; 0 is halfway along [-7, 7].
        let px = ctx.to_surface(Point::new(-1.0, 0.0));
        assert!((px.x - 675.0).abs() < 1e-9);
        assert!((px.y - 360.0).abs() < 1e-9);
    }

    #[test]
    fn map_projection_fits_left_panel() {
        let ctx = ViewContext::map(200.0, 100.0, &dataset());
        assert_eq!(ctx.brush_region, Rect::new(0.0, 0.0, 100.0, 100.0));
        // 10x20 bounds into 100x100: height-limited scale 5, centered horizontally.
        let top_left = ctx.to_surface(Point::new(0.0, 0.0));
        let bottom_right = ctx.to_surface(Point::new(10.0, 20.0));
        assert!((top_left.x - 25.0).abs() < 1e-9 && top_left.y.abs() < 1e-9);
        assert!((bottom_right.x - 75.0).abs() < 1e-9);
        assert!((bottom_right.y - 100.0).abs() < 1e-9);
    }

    #[test]
    fn brush_selection_inverts_through_the_frame() {
        let ctx = ViewContext::scatter(900.0, 700.0, &dataset(), &ScatterConfig::default());
        let around = Rect::new(650.0, 300.0, 700.0, 400.0);
        assert!(ctx.brush_selection(around).contains(&EntityId(7)));
        let elsewhere = Rect::new(450.0, 10.0, 500.0, 60.0);
        assert!(ctx.brush_selection(elsewhere).is_empty());
    }

    #[test]
    fn init_binds_elements_both_ways() {
        let data = dataset();
        let config = LinkedViewsConfig::default();
        let mut style = BaseStyle::from_config(&config.palette).expect("default palette");
        let mut surface = RecordingSurface::new();

        let ctx = ViewContext::scatter(900.0, 700.0, &data, &config.scatter);
        let elements =
            init_view(&mut surface, &ctx, &data, &mut style, &config).expect("valid config");
        assert_eq!(elements.len(), 1);
        let element = elements.element_of(EntityId(7)).expect("bound");
        assert_eq!(elements.entity_of(element), Some(EntityId(7)));

        let state = surface.element(element).expect("created");
        assert_eq!(state.kind, ElementKind::Circle);
        assert_eq!(state.radius, Some(4.0));
        assert_eq!(state.stroke_width, Some(0.2));
        assert_eq!(state.fill_opacity, None);
        assert_eq!(surface.brush_region(View::Scatter), Some(ctx.brush_region));
    }
}
