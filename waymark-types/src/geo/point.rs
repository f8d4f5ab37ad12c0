use approx::{AbsDiffEq, RelativeEq};
use num_traits::{Float, NumCast, One};
use serde::{Deserialize, Serialize};

use crate::geo::Datum;

/// Point on the surface of a celestial body given by latitude and longitude in degrees.
pub trait GeoPoint {
    /// Numeric type of the coordinates.
    type Num: Float;

    /// Latitude in degrees.
    fn lat(&self) -> Self::Num;
    /// Longitude in degrees.
    fn lon(&self) -> Self::Num;

    /// Latitude in radians.
    fn lat_rad(&self) -> Self::Num {
        self.lat().to_radians()
    }

    /// Longitude in radians.
    fn lon_rad(&self) -> Self::Num {
        self.lon().to_radians()
    }

    /// Great-circle distance to the `other` point in meters, calculated with the haversine formula on the sphere
    /// with the mean radius of the `datum`.
    ///
    /// Returns `None` if the datum radius cannot be represented with `Self::Num`.
    fn distance(&self, other: &impl GeoPoint<Num = Self::Num>, datum: &Datum) -> Option<Self::Num> {
        let radius: Self::Num = NumCast::from(datum.mean_radius())?;
        let two = Self::Num::one() + Self::Num::one();

        let d_lat = other.lat_rad() - self.lat_rad();
        let d_lon = other.lon_rad() - self.lon_rad();

        let a = (d_lat / two).sin().powi(2)
            + self.lat_rad().cos() * other.lat_rad().cos() * (d_lon / two).sin().powi(2);
        let c = two * a.sqrt().atan2((Self::Num::one() - a).sqrt());

        Some(radius * c)
    }
}

/// Geo point that can be constructed from coordinates.
pub trait NewGeoPoint<N = f64>: GeoPoint<Num = N> + Sized {
    /// Creates a point from latitude and longitude in degrees.
    fn latlon(lat: N, lon: N) -> Self;

    /// Creates a point from longitude and latitude in degrees.
    fn lonlat(lon: N, lat: N) -> Self {
        Self::latlon(lat, lon)
    }
}

/// 2d point on the surface of a celestial body.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Deserialize, Serialize)]
pub struct GeoPoint2d {
    lat: f64,
    lon: f64,
}

impl GeoPoint for GeoPoint2d {
    type Num = f64;

    fn lat(&self) -> f64 {
        self.lat
    }

    fn lon(&self) -> f64 {
        self.lon
    }
}

impl NewGeoPoint<f64> for GeoPoint2d {
    fn latlon(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl GeoPoint2d {
    /// Creates a new point from another one.
    pub fn from(other: &impl GeoPoint<Num = f64>) -> Self {
        Self {
            lat: other.lat(),
            lon: other.lon(),
        }
    }

    /// Great-circle distance in meters on the WGS84 mean sphere.
    pub fn distance_to(&self, other: &impl GeoPoint<Num = f64>) -> f64 {
        self.distance(other, &Datum::WGS84).unwrap_or(f64::NAN)
    }
}

impl AbsDiffEq for GeoPoint2d {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.lat.abs_diff_eq(&other.lat, epsilon) && self.lon.abs_diff_eq(&other.lon, epsilon)
    }
}

impl RelativeEq for GeoPoint2d {
    fn default_max_relative() -> f64 {
        f64::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f64, max_relative: f64) -> bool {
        self.lat.relative_eq(&other.lat, epsilon, max_relative)
            && self.lon.relative_eq(&other.lon, epsilon, max_relative)
    }
}

/// Creates a new [`GeoPoint2d`] from latitude and longitude values (in degrees).
///
/// ```
/// use waymark_types::geo::GeoPoint;
/// use waymark_types::latlon;
///
/// let point = latlon!(38.0, 52.0);
/// assert_eq!(point.lat(), 38.0);
/// ```
#[macro_export]
macro_rules! latlon {
    ($lat:expr, $lon:expr) => {
        <$crate::geo::GeoPoint2d as $crate::geo::NewGeoPoint<f64>>::latlon($lat, $lon)
    };
}

/// Creates a new [`GeoPoint2d`] from longitude and latitude values (in degrees), in the order map engines
/// usually pass them around.
///
/// ```
/// use waymark_types::geo::GeoPoint;
/// use waymark_types::lonlat;
///
/// let point = lonlat!(52.0, 38.0);
/// assert_eq!(point.lat(), 38.0);
/// ```
#[macro_export]
macro_rules! lonlat {
    ($lon:expr, $lat:expr) => {
        <$crate::geo::GeoPoint2d as $crate::geo::NewGeoPoint<f64>>::lonlat($lon, $lat)
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use geo::HaversineDistance;

    #[test]
    fn mean_radius() {
        assert_relative_eq!(
            Datum::WGS84.mean_radius(),
            6_371_008.8,
            max_relative = 1e-8
        );
    }

    #[test]
    fn distance_matches_haversine() {
        let pairs = [
            (latlon!(53.732562, -1.863383), latlon!(53.704014, -1.786128)),
            (latlon!(37.566, 126.9784), latlon!(35.1796, 129.0756)),
            (latlon!(0.0, 179.9), latlon!(0.0, -179.9)),
            (latlon!(-33.8688, 151.2093), latlon!(51.5074, -0.1278)),
        ];

        for (a, b) in pairs {
            let expected = geo::Point::new(a.lon(), a.lat())
                .haversine_distance(&geo::Point::new(b.lon(), b.lat()));
            assert_relative_eq!(a.distance_to(&b), expected, max_relative = 1e-6);
        }
    }

    #[test]
    fn distance_to_self_is_zero() {
        let point = latlon!(10.0, 20.0);
        assert_eq!(point.distance_to(&point), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = latlon!(10.0, 20.0);
        let b = latlon!(10.5, 19.0);
        assert_relative_eq!(a.distance_to(&b), b.distance_to(&a));
    }

    #[test]
    fn lonlat_order() {
        assert_eq!(lonlat!(20.0, 10.0), latlon!(10.0, 20.0));
    }
}
