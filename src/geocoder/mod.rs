//! Forward geocoding
//!
//! The [`Geocode`] trait is the seam between request handling and the
//! outbound provider; [`NominatimGeocoder`] is the production implementation.

mod nominatim;

use async_trait::async_trait;
use thiserror::Error;

use crate::geo::{CoordinateError, GeoPoint};

pub use nominatim::NominatimGeocoder;

/// Resolve a free-text address to a single point
#[async_trait]
pub trait Geocode: Send + Sync {
    async fn lookup(&self, address: &str) -> Result<GeoPoint, GeocodeError>;
}

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("no match for the given address")]
    NotFound,

    #[error("request to geocoding provider failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("geocoding provider returned HTTP {0}")]
    Status(u16),

    #[error("unusable provider response: {0}")]
    Parse(String),

    #[error("invalid provider endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("invalid User-Agent: {0}")]
    InvalidUserAgent(String),
}

impl GeocodeError {
    /// Short textual kind, stable enough to show to clients
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::NotFound => "not found",
            Self::Transport(_) | Self::Status(_) => "transport error",
            Self::Parse(_) => "parse error",
            Self::InvalidEndpoint(_) | Self::InvalidUserAgent(_) => "configuration error",
        }
    }
}

impl From<CoordinateError> for GeocodeError {
    fn from(e: CoordinateError) -> Self {
        Self::Parse(e.to_string())
    }
}

impl From<url::ParseError> for GeocodeError {
    fn from(e: url::ParseError) -> Self {
        Self::InvalidEndpoint(e.to_string())
    }
}
