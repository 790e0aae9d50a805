// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Entity model shared by both views.

use core::fmt;
use core::slice;

use kurbo::{BezPath, Point, Rect};
use serde::{Deserialize, Serialize};

/// Stable identifier linking an entity's map feature to its scatter point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One of the two linked views.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum View {
    /// Cell outlines drawn through a fitted projection.
    Map,
    /// Reduced-dimension points drawn through two linear axes.
    Scatter,
}

impl View {
    /// Both views, map first.
    pub const ALL: [Self; 2] = [Self::Map, Self::Scatter];

    /// Short lowercase name, used in logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Map => "map",
            Self::Scatter => "scatter",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Categorical value that picks a color from an ordinal palette.
///
/// Integral values (including integral floats and numeric strings in the
/// input) become [`ClusterKey::Int`]; any other string, such as a factor
/// label, becomes [`ClusterKey::Label`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClusterKey {
    /// Numeric category.
    Int(i64),
    /// Named category.
    Label(String),
    /// Absent or `null` value; still gets its own palette slot.
    Missing,
}

impl From<i64> for ClusterKey {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for ClusterKey {
    fn from(value: &str) -> Self {
        Self::Label(value.to_owned())
    }
}

impl fmt::Display for ClusterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(value) => write!(f, "{value}"),
            Self::Label(label) => f.write_str(label),
            Self::Missing => f.write_str("<missing>"),
        }
    }
}

/// What kind of cell an entity is, resolved once at load time.
///
/// The payload is the categorical value that picks the base fill from the
/// matching palette.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Classification {
    /// Tumor cell, keyed by tumor cluster.
    Tumor(ClusterKey),
    /// Immune cell, keyed by immune group.
    Immune(ClusterKey),
}

/// A closed ring of vertices; the closing edge is implicit.
pub type Ring = Vec<Point>;

/// Planar geometry of a map feature, in GeoJSON ring layout.
#[derive(Clone, Debug, PartialEq)]
pub enum Geometry {
    /// One polygon: an outer ring followed by optional holes.
    Polygon(Vec<Ring>),
    /// Several polygons.
    MultiPolygon(Vec<Vec<Ring>>),
}

impl Geometry {
    /// Returns the polygons as slices of rings.
    #[must_use]
    pub fn polygons(&self) -> &[Vec<Ring>] {
        match self {
            Self::Polygon(rings) => slice::from_ref(rings),
            Self::MultiPolygon(polygons) => polygons,
        }
    }

    /// First vertex of the first ring of the first polygon.
    ///
    /// Used as the feature's representative point when brushing the map.
    #[must_use]
    pub fn first_vertex(&self) -> Option<Point> {
        self.polygons().first()?.first()?.first().copied()
    }

    /// Bounding box of every vertex, or `None` for empty geometry.
    #[must_use]
    pub fn bounds(&self) -> Option<Rect> {
        self.vertices()
            .map(|pt| Rect::from_points(pt, pt))
            .reduce(|acc, r| acc.union(r))
    }

    /// Iterates every vertex of every ring.
    pub fn vertices(&self) -> impl Iterator<Item = Point> + '_ {
        self.polygons()
            .iter()
            .flat_map(|rings| rings.iter())
            .flat_map(|ring| ring.iter().copied())
    }

    /// Builds a closed path with every vertex mapped through `to_pixel`.
    #[must_use]
    pub fn to_path(&self, to_pixel: impl Fn(Point) -> Point) -> BezPath {
        let mut path = BezPath::new();
        for ring in self.polygons().iter().flatten() {
            let mut vertices = ring.iter().copied().map(&to_pixel);
            let Some(first) = vertices.next() else {
                continue;
            };
            path.move_to(first);
            for pt in vertices {
                path.line_to(pt);
            }
            path.close_path();
        }
        path
    }
}

/// Map-view form of an entity.
#[derive(Clone, Debug, PartialEq)]
pub struct SpatialFeature {
    /// Entity identifier.
    pub id: EntityId,
    /// Outline in data coordinates.
    pub geometry: Geometry,
    /// Classification used for the base fill.
    pub classification: Classification,
}

/// Scatter-view form of an entity.
#[derive(Clone, Debug, PartialEq)]
pub struct ProjectedPoint {
    /// Entity identifier.
    pub id: EntityId,
    /// First two axes of the reduced embedding.
    pub position: Point,
    /// Classification used for the base fill.
    pub classification: Classification,
}

#[cfg(test)]
mod tests {
    use kurbo::{PathEl, Point, Rect};

    use super::Geometry;

    fn square(x: f64, y: f64, size: f64) -> Vec<Point> {
        vec![
            Point::new(x, y),
            Point::new(x + size, y),
            Point::new(x + size, y + size),
            Point::new(x, y + size),
        ]
    }

    #[test]
    fn first_vertex_follows_first_polygon_first_ring() {
        let multi = Geometry::MultiPolygon(vec![
            vec![square(3.0, 4.0, 1.0)],
            vec![square(-10.0, -10.0, 1.0)],
        ]);
        assert_eq!(multi.first_vertex(), Some(Point::new(3.0, 4.0)));

        let single = Geometry::Polygon(vec![square(1.0, 2.0, 5.0), square(2.0, 3.0, 1.0)]);
        assert_eq!(single.first_vertex(), Some(Point::new(1.0, 2.0)));

        assert_eq!(Geometry::Polygon(vec![]).first_vertex(), None);
        assert_eq!(Geometry::Polygon(vec![vec![]]).first_vertex(), None);
    }

    #[test]
    fn bounds_cover_every_polygon() {
        let multi = Geometry::MultiPolygon(vec![
            vec![square(0.0, 0.0, 1.0)],
            vec![square(5.0, -2.0, 2.0)],
        ]);
        assert_eq!(multi.bounds(), Some(Rect::new(0.0, -2.0, 7.0, 1.0)));
        assert_eq!(Geometry::MultiPolygon(vec![]).bounds(), None);
    }

    #[test]
    fn to_path_closes_each_ring_and_maps_vertices() {
        let geometry = Geometry::Polygon(vec![square(0.0, 0.0, 1.0), vec![]]);
        let path = geometry.to_path(|pt| Point::new(pt.x * 10.0, pt.y * 10.0 + 5.0));
        let els = path.elements();
        assert_eq!(els.len(), 5);
        assert_eq!(els[0], PathEl::MoveTo(Point::new(0.0, 5.0)));
        assert_eq!(els[2], PathEl::LineTo(Point::new(10.0, 15.0)));
        assert_eq!(els[4], PathEl::ClosePath);
    }
}
