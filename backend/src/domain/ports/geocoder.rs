//! Port for the external address/coordinate lookup dependency.

use async_trait::async_trait;

use crate::domain::geo::GeoPoint;

/// Coordinate pair in upstream API order.
///
/// Deliberately distinct from [`GeoPoint`]: the geocoding API speaks
/// latitude-first, while storage and spatial queries are longitude-first.
/// The reconciler owns the conversion between the two.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLng {
    pub latitude: f64,
    pub longitude: f64,
}

/// Errors raised by geocoder adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeocoderError {
    /// Network-level failure reaching the upstream service.
    #[error("geocoder transport failure: {message}")]
    Transport { message: String },
    /// The lookup did not complete within the configured deadline.
    #[error("geocoder timed out: {message}")]
    Timeout { message: String },
    /// Upstream answered with a non-success HTTP status.
    #[error("geocoder rejected the request: {message}")]
    UpstreamStatus { message: String },
    /// Upstream payload could not be decoded.
    #[error("geocoder response could not be decoded: {message}")]
    Decode { message: String },
}

impl GeocoderError {
    /// Create a transport error with the given message.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Create a timeout error with the given message.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
        }
    }

    /// Create an upstream-status error with the given message.
    pub fn upstream_status(message: impl Into<String>) -> Self {
        Self::UpstreamStatus {
            message: message.into(),
        }
    }

    /// Create a decode error with the given message.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }
}

/// Port wrapping the third-party geocoding API.
///
/// `forward` resolving to `Ok(None)` means the lookup ran and matched
/// nothing. That is a distinct condition from the error variants, which all
/// signal the dependency itself misbehaving.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolve an address string to coordinates.
    async fn forward(&self, address: &str) -> Result<Option<LatLng>, GeocoderError>;

    /// Resolve coordinates to a display address.
    async fn reverse(&self, point: &GeoPoint) -> Result<String, GeocoderError>;
}
