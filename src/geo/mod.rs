//! Geographic primitives
//!
//! Validated coordinates and the great-circle distance kernel.

pub mod distance;

use serde::Serialize;
use thiserror::Error;

pub use distance::{distance_km, EARTH_RADIUS_KM};

/// Reasons a coordinate pair is rejected
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum CoordinateError {
    #[error("coordinates must be finite numbers")]
    NotFinite,

    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),

    #[error("longitude {0} is outside (-180, 180]")]
    LongitudeOutOfRange(f64),
}

/// A point on the earth in decimal degrees
///
/// Latitude lies in `[-90, 90]`, longitude in `(-180, 180]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    lat: f64,
    lon: f64,
}

impl GeoPoint {
    /// Validate and build a point. A longitude of exactly `-180` names the
    /// same meridian as `180` and is stored as `180`.
    #[allow(clippy::float_cmp)]
    pub fn new(lat: f64, lon: f64) -> Result<Self, CoordinateError> {
        if !lat.is_finite() || !lon.is_finite() {
            return Err(CoordinateError::NotFinite);
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(CoordinateError::LatitudeOutOfRange(lat));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(CoordinateError::LongitudeOutOfRange(lon));
        }
        let lon = if lon == -180.0 { 180.0 } else { lon };
        Ok(Self { lat, lon })
    }

    pub const fn lat(&self) -> f64 {
        self.lat
    }

    pub const fn lon(&self) -> f64 {
        self.lon
    }

    /// Great-circle distance to `other` in kilometers
    pub fn distance_km(&self, other: &Self) -> f64 {
        distance_km(self.lat, self.lon, other.lat, other.lon)
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.lat, self.lon)
    }
}
