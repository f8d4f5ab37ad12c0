//! Points in geographic coordinates (latitude and longitude in degrees) and great-circle distance
//! between them.

mod datum;
mod point;

pub use datum::Datum;
pub use point::{GeoPoint, GeoPoint2d, NewGeoPoint};
