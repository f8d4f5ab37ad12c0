/// Reference ellipsoid of the celestial body the coordinates are given on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Datum {
    semimajor: f64,
    inv_flattening: f64,
}

impl Datum {
    /// WGS84 ellipsoid.
    pub const WGS84: Self = Datum {
        semimajor: 6_378_137.0,
        inv_flattening: 298.257223563,
    };

    /// Semimajor axis in meters.
    pub fn semimajor(&self) -> f64 {
        self.semimajor
    }

    /// Inverse flattening of the ellipsoid.
    pub fn inv_flattening(&self) -> f64 {
        self.inv_flattening
    }

    /// Mean radius of the ellipsoid `(2a + b) / 3` in meters. This is the radius of the sphere used for
    /// great-circle distance calculations.
    pub fn mean_radius(&self) -> f64 {
        let flattening = 1.0 / self.inv_flattening;
        self.semimajor * (3.0 - flattening) / 3.0
    }
}

impl Default for Datum {
    fn default() -> Self {
        Self::WGS84
    }
}
