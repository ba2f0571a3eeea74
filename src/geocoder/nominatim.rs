//! Nominatim-style forward geocoding client
//!
//! Issues `GET {base}/search?q=..&format=json&limit=1` and decodes the first
//! match. One `reqwest::Client` is shared by every lookup so connections
//! are pooled.

use async_trait::async_trait;
use reqwest::header::{HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client, Request, Url};
use serde::Deserialize;
use std::time::Duration;

use super::{Geocode, GeocodeError};
use crate::config::GeocoderConfig;
use crate::geo::GeoPoint;

/// One candidate match; providers send coordinates as strings
#[derive(Debug, Deserialize)]
struct Place {
    lat: String,
    lon: String,
}

impl Place {
    fn to_point(&self) -> Result<GeoPoint, GeocodeError> {
        let lat = parse_coordinate("lat", &self.lat)?;
        let lon = parse_coordinate("lon", &self.lon)?;
        Ok(GeoPoint::new(lat, lon)?)
    }
}

fn parse_coordinate(field: &str, raw: &str) -> Result<f64, GeocodeError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|e| GeocodeError::Parse(format!("{field} {raw:?} is not a number: {e}")))
}

/// Decode a search response body into the first match
fn parse_search_response(body: &[u8]) -> Result<GeoPoint, GeocodeError> {
    let places: Vec<Place> = serde_json::from_slice(body)
        .map_err(|e| GeocodeError::Parse(format!("malformed search response: {e}")))?;
    places
        .first()
        .ok_or(GeocodeError::NotFound)
        .and_then(Place::to_point)
}

#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    client: Client,
    search_url: Url,
    user_agent: HeaderValue,
}

impl NominatimGeocoder {
    /// Build a geocoder with its own pooled client
    pub fn new(config: &GeocoderConfig) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()?;
        Self::with_client(client, &config.base_url, &config.user_agent)
    }

    /// Build a geocoder on top of an existing client
    pub fn with_client(
        client: Client,
        base_url: &str,
        user_agent: &str,
    ) -> Result<Self, GeocodeError> {
        if user_agent.trim().is_empty() {
            return Err(GeocodeError::InvalidUserAgent(
                "must not be empty".to_string(),
            ));
        }
        let user_agent = HeaderValue::from_str(user_agent)
            .map_err(|e| GeocodeError::InvalidUserAgent(e.to_string()))?;

        let mut search_url = Url::parse(base_url)?;
        if !matches!(search_url.scheme(), "http" | "https") {
            return Err(GeocodeError::InvalidEndpoint(format!(
                "unsupported scheme in {base_url}"
            )));
        }
        search_url
            .path_segments_mut()
            .map_err(|()| GeocodeError::InvalidEndpoint(format!("{base_url} cannot be a base")))?
            .pop_if_empty()
            .push("search");
        search_url.set_query(None);

        Ok(Self {
            client,
            search_url,
            user_agent,
        })
    }

    pub const fn search_url(&self) -> &Url {
        &self.search_url
    }

    /// Build the outbound search request for `address`
    pub fn build_request(&self, address: &str) -> Result<Request, GeocodeError> {
        let mut url = self.search_url.clone();
        url.query_pairs_mut()
            .append_pair("q", address)
            .append_pair("format", "json")
            .append_pair("limit", "1");

        Ok(self
            .client
            .get(url)
            .header(USER_AGENT, self.user_agent.clone())
            .header(ACCEPT, "application/json")
            .build()?)
    }
}

#[async_trait]
impl Geocode for NominatimGeocoder {
    async fn lookup(&self, address: &str) -> Result<GeoPoint, GeocodeError> {
        let request = self.build_request(address)?;
        log::debug!("Geocoding {address:?} via {}", request.url());

        let response = self.client.execute(request).await?;
        let status = response.status();
        if !status.is_success() {
            log::warn!("Geocoding provider answered {status} for {address:?}");
            return Err(GeocodeError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        let point = parse_search_response(&body)?;
        log::debug!("Geocoded {address:?} to {point}");
        Ok(point)
    }
}
