//! Geometries of the shapes a map surface reports from hit-testing.

use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint2d;

/// Geometry of a rendered shape in geographic coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ShapeGeometry {
    /// Single point.
    Point(GeoPoint2d),
    /// Set of points.
    MultiPoint(Vec<GeoPoint2d>),
    /// Line string.
    Contour(Vec<GeoPoint2d>),
    /// Set of line strings.
    MultiContour(Vec<Vec<GeoPoint2d>>),
    /// Polygon given by its outer ring followed by inner rings.
    Polygon(Vec<Vec<GeoPoint2d>>),
    /// Set of polygons.
    MultiPolygon(Vec<Vec<Vec<GeoPoint2d>>>),
}

/// Kind of a [`ShapeGeometry`] without the coordinates.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeometryKind {
    /// See [`ShapeGeometry::Point`].
    Point,
    /// See [`ShapeGeometry::MultiPoint`].
    MultiPoint,
    /// See [`ShapeGeometry::Contour`].
    Contour,
    /// See [`ShapeGeometry::MultiContour`].
    MultiContour,
    /// See [`ShapeGeometry::Polygon`].
    Polygon,
    /// See [`ShapeGeometry::MultiPolygon`].
    MultiPolygon,
}

impl ShapeGeometry {
    /// Kind of the geometry.
    pub fn kind(&self) -> GeometryKind {
        match self {
            ShapeGeometry::Point(_) => GeometryKind::Point,
            ShapeGeometry::MultiPoint(_) => GeometryKind::MultiPoint,
            ShapeGeometry::Contour(_) => GeometryKind::Contour,
            ShapeGeometry::MultiContour(_) => GeometryKind::MultiContour,
            ShapeGeometry::Polygon(_) => GeometryKind::Polygon,
            ShapeGeometry::MultiPolygon(_) => GeometryKind::MultiPolygon,
        }
    }

    /// Returns the point if this is a [`ShapeGeometry::Point`] geometry.
    pub fn as_point(&self) -> Option<&GeoPoint2d> {
        match self {
            ShapeGeometry::Point(point) => Some(point),
            _ => None,
        }
    }
}

impl From<GeoPoint2d> for ShapeGeometry {
    fn from(value: GeoPoint2d) -> Self {
        Self::Point(value)
    }
}
