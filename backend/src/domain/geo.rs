//! Geographic primitives shared by entities, queries, and adapters.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Validation errors for geographic values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GeoValidationError {
    /// A coordinate was NaN or infinite.
    #[error("coordinates must be finite numbers")]
    NotFinite,
    /// Longitude fell outside the WGS84 range.
    #[error("longitude must be within [-180, 180]")]
    LongitudeOutOfRange,
    /// Latitude fell outside the WGS84 range.
    #[error("latitude must be within [-90, 90]")]
    LatitudeOutOfRange,
}

/// WGS84 point carried and serialised in `[longitude, latitude]` order.
///
/// The geocoding upstream answers latitude-first; that shape never reaches
/// this type. Anything holding a `GeoPoint` is already in storage order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 2]", into = "[f64; 2]")]
pub struct GeoPoint {
    longitude: f64,
    latitude: f64,
}

impl GeoPoint {
    /// Validate and construct a point from longitude and latitude.
    pub fn new(longitude: f64, latitude: f64) -> Result<Self, GeoValidationError> {
        if !longitude.is_finite() || !latitude.is_finite() {
            return Err(GeoValidationError::NotFinite);
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(GeoValidationError::LongitudeOutOfRange);
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(GeoValidationError::LatitudeOutOfRange);
        }
        Ok(Self {
            longitude,
            latitude,
        })
    }

    /// Longitude in degrees.
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Latitude in degrees.
    pub fn latitude(&self) -> f64 {
        self.latitude
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.longitude, self.latitude)
    }
}

impl From<GeoPoint> for [f64; 2] {
    fn from(value: GeoPoint) -> Self {
        [value.longitude, value.latitude]
    }
}

impl TryFrom<[f64; 2]> for GeoPoint {
    type Error = GeoValidationError;

    fn try_from(value: [f64; 2]) -> Result<Self, Self::Error> {
        let [longitude, latitude] = value;
        Self::new(longitude, latitude)
    }
}
