//! Screen-space types. Coordinates are in pixels from the top-left corner of the map surface.

pub use nalgebra::{Point2, Vector2};

/// Point on the screen.
pub type Point2d = Point2<f64>;

/// Difference between two screen points.
pub type Vector2d = Vector2<f64>;
