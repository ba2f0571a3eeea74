//! `/distance` handler
//!
//! Geocodes `address1` and `address2`, then answers with the great-circle
//! distance between them.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::geo::GeoPoint;
use crate::geocoder::{Geocode, GeocodeError};
use crate::http;
use crate::logger;

/// Which query parameter an address came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressSlot {
    First,
    Second,
}

impl AddressSlot {
    pub const fn param(self) -> &'static str {
        match self {
            Self::First => "address1",
            Self::Second => "address2",
        }
    }
}

impl fmt::Display for AddressSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.param())
    }
}

#[derive(Debug, Error)]
pub enum DistanceError {
    #[error("address1 and address2 query parameters are required")]
    MissingAddress,

    #[error("failed to geocode {slot} ({kind}): {source}", kind = .source.kind())]
    Geocode {
        slot: AddressSlot,
        #[source]
        source: GeocodeError,
    },
}

impl DistanceError {
    /// Geocoding failures, "not found" included, are reported as 500
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::MissingAddress => StatusCode::BAD_REQUEST,
            Self::Geocode { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Both addresses of one request, verbatim as the client sent them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistanceQuery {
    pub address1: String,
    pub address2: String,
}

impl DistanceQuery {
    /// Decode the query string; the first occurrence of a parameter wins
    pub fn parse(query: Option<&str>) -> Result<Self, DistanceError> {
        let mut address1 = None;
        let mut address2 = None;

        for (key, value) in url::form_urlencoded::parse(query.unwrap_or_default().as_bytes()) {
            match key.as_ref() {
                "address1" if address1.is_none() => address1 = Some(value.into_owned()),
                "address2" if address2.is_none() => address2 = Some(value.into_owned()),
                _ => {}
            }
        }

        let usable = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        match (usable(address1), usable(address2)) {
            (Some(address1), Some(address2)) => Ok(Self { address1, address2 }),
            _ => Err(DistanceError::MissingAddress),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DistanceResponse {
    pub address1: String,
    pub address2: String,
    pub distance_km: f64,
}

async fn lookup(
    geocoder: &dyn Geocode,
    address: &str,
    slot: AddressSlot,
) -> Result<GeoPoint, DistanceError> {
    geocoder
        .lookup(address)
        .await
        .map_err(|source| DistanceError::Geocode { slot, source })
}

/// Geocode both addresses and measure the distance between them
///
/// When both lookups fail, `address1` is the one reported.
pub async fn resolve(
    query: DistanceQuery,
    geocoder: &dyn Geocode,
    parallel: bool,
) -> Result<DistanceResponse, DistanceError> {
    let (from, to) = if parallel {
        let (from, to) = tokio::join!(
            lookup(geocoder, &query.address1, AddressSlot::First),
            lookup(geocoder, &query.address2, AddressSlot::Second),
        );
        (from?, to?)
    } else {
        let from = lookup(geocoder, &query.address1, AddressSlot::First).await?;
        let to = lookup(geocoder, &query.address2, AddressSlot::Second).await?;
        (from, to)
    };

    Ok(DistanceResponse {
        distance_km: from.distance_km(&to),
        address1: query.address1,
        address2: query.address2,
    })
}

/// Answer one `/distance` request
pub async fn handle_distance(
    query: Option<&str>,
    geocoder: &dyn Geocode,
    parallel: bool,
) -> Response<Full<Bytes>> {
    let result = match DistanceQuery::parse(query) {
        Ok(query) => resolve(query, geocoder, parallel).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(answer) => match serde_json::to_string(&answer) {
            Ok(json) => {
                logger::log_distance_response(&json);
                http::build_json_response(StatusCode::OK, json)
            }
            Err(e) => {
                log::error!("Failed to serialize distance response: {e}");
                http::build_text_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "failed to encode response",
                )
            }
        },
        Err(e) => {
            if e.status().is_server_error() {
                log::warn!("{e}");
            } else {
                log::debug!("Rejected distance query: {e}");
            }
            http::build_text_response(e.status(), &e.to_string())
        }
    }
}
