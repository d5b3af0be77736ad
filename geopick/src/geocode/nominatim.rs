//! OpenStreetMap Nominatim reverse geocoding.
//!
//! # API Endpoint
//!
//! - Reverse: `{base}/reverse?lat={lat}&lon={lng}&format=json`
//!
//! A successful answer carries `display_name` and an optional `address`
//! object whose keys match [`StructuredAddress`]. Positions with nothing to
//! report (open sea, poles) come back as `200 OK` with an `error` field and
//! no `display_name`; those are treated as "no result".

use serde::Deserialize;
use tracing::warn;

use super::http::{AsyncHttpClient, DEFAULT_USER_AGENT};
use super::types::{GeocodeError, GeocodeResult, GeocodingService, ReverseGeocoder};
use super::StructuredAddress;

/// Public Nominatim instance.
pub const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

/// Reverse geocoder backed by a Nominatim server.
pub struct NominatimGeocoder<C: AsyncHttpClient> {
    http_client: C,
    base_url: String,
    user_agent: String,
}

impl<C: AsyncHttpClient> NominatimGeocoder<C> {
    /// Creates a geocoder for the public Nominatim instance.
    pub fn new(http_client: C) -> Self {
        Self::with_endpoint(http_client, DEFAULT_NOMINATIM_URL, DEFAULT_USER_AGENT)
    }

    /// Creates a geocoder for a specific Nominatim server and user agent.
    pub fn with_endpoint(
        http_client: C,
        base_url: impl Into<String>,
        user_agent: impl Into<String>,
    ) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
            user_agent: user_agent.into(),
        }
    }

    fn build_url(&self, lat: f64, lng: f64) -> String {
        format!(
            "{}/reverse?lat={}&lon={}&format=json",
            self.base_url.trim_end_matches('/'),
            lat,
            lng
        )
    }

    /// Performs one lookup and reports why it failed, if it did.
    pub async fn lookup(&self, lat: f64, lng: f64) -> Result<GeocodeResult, GeocodeError> {
        let url = self.build_url(lat, lng);
        let body = self
            .http_client
            .get_with_headers(
                &url,
                &[
                    ("User-Agent", self.user_agent.as_str()),
                    ("Accept", "application/json"),
                ],
            )
            .await?;

        parse_response(&body, lat, lng)
    }
}

impl<C: AsyncHttpClient> ReverseGeocoder for NominatimGeocoder<C> {
    async fn reverse_geocode(&self, lat: f64, lng: f64) -> Option<GeocodeResult> {
        match self.lookup(lat, lng).await {
            Ok(result) => Some(result),
            Err(e) => {
                warn!(service = "nominatim", lat, lng, error = %e, "Reverse geocoding failed");
                None
            }
        }
    }

    fn service(&self) -> GeocodingService {
        GeocodingService::Nominatim
    }
}

#[derive(Deserialize)]
struct ReverseResponse {
    display_name: Option<String>,
    address: Option<StructuredAddress>,
    error: Option<String>,
}

fn parse_response(body: &[u8], lat: f64, lng: f64) -> Result<GeocodeResult, GeocodeError> {
    let response: ReverseResponse = serde_json::from_slice(body).map_err(|e| {
        GeocodeError::InvalidResponse(format!("failed to parse Nominatim response: {}", e))
    })?;

    if let Some(message) = response.error {
        tracing::debug!(lat, lng, message = %message, "Nominatim reported no address");
    }

    match response.display_name {
        Some(display_name) if !display_name.trim().is_empty() => Ok(GeocodeResult {
            display_name,
            address: response.address,
        }),
        _ => Err(GeocodeError::NoResult { lat, lng }),
    }
}
