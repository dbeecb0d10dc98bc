//! Geographic coordinates in raw degree units

use serde::{Deserialize, Serialize};

/// A point on the equirectangular degree grid.
///
/// Degree values are stored as given; range checks happen at grid lookup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub longitude_degrees: f64,
    pub latitude_degrees: f64,
}

impl Coordinate {
    pub const fn new(longitude_degrees: f64, latitude_degrees: f64) -> Self {
        Self {
            longitude_degrees,
            latitude_degrees,
        }
    }

    pub fn longitude_radians(&self) -> f64 {
        self.longitude_degrees.to_radians()
    }

    pub fn latitude_radians(&self) -> f64 {
        self.latitude_degrees.to_radians()
    }

    pub fn is_finite(&self) -> bool {
        self.longitude_degrees.is_finite() && self.latitude_degrees.is_finite()
    }
}
