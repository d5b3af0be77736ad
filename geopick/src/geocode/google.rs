//! Google Geocoding API reverse geocoding.
//!
//! Requires a Google Maps Platform API key with the Geocoding API enabled.
//! The key is checked when the geocoder is created, so a missing or
//! placeholder key is reported as a configuration error before any request.
//!
//! # API Endpoint
//!
//! - `{base}/maps/api/geocode/json?latlng={lat},{lng}&key={API_KEY}`
//!
//! The response `status` must be `"OK"` and `results` non-empty. The first
//! result supplies `formatted_address` and the `address_components` that
//! are folded into a [`StructuredAddress`].

use serde::Deserialize;
use tracing::warn;

use super::http::AsyncHttpClient;
use super::types::{GeocodeError, GeocodeResult, GeocodingService, ReverseGeocoder};
use super::StructuredAddress;
use crate::config::require_api_key;

/// Google Maps Platform host.
pub const DEFAULT_GOOGLE_URL: &str = "https://maps.googleapis.com";

/// Success sentinel of the `status` field.
const STATUS_OK: &str = "OK";

/// Reverse geocoder backed by the Google Geocoding API.
pub struct GoogleGeocoder<C: AsyncHttpClient> {
    http_client: C,
    base_url: String,
    api_key: String,
}

impl<C: AsyncHttpClient> GoogleGeocoder<C> {
    /// Creates a geocoder for the public Google endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Credential`] if the key is absent, blank, or a
    /// placeholder.
    pub fn new(http_client: C, api_key: Option<&str>) -> Result<Self, GeocodeError> {
        Self::with_endpoint(http_client, api_key, DEFAULT_GOOGLE_URL)
    }

    /// Creates a geocoder for a specific host (used for proxies and tests).
    pub fn with_endpoint(
        http_client: C,
        api_key: Option<&str>,
        base_url: impl Into<String>,
    ) -> Result<Self, GeocodeError> {
        let api_key = require_api_key("Google Maps API key", api_key)?;
        Ok(Self {
            http_client,
            base_url: base_url.into(),
            api_key,
        })
    }

    fn build_url(&self, lat: f64, lng: f64) -> String {
        format!(
            "{}/maps/api/geocode/json?latlng={},{}&key={}",
            self.base_url.trim_end_matches('/'),
            lat,
            lng,
            self.api_key
        )
    }

    /// Performs one lookup and reports why it failed, if it did.
    pub async fn lookup(&self, lat: f64, lng: f64) -> Result<GeocodeResult, GeocodeError> {
        let url = self.build_url(lat, lng);
        let body = self.http_client.get(&url).await?;
        parse_response(&body, lat, lng)
    }
}

impl<C: AsyncHttpClient> ReverseGeocoder for GoogleGeocoder<C> {
    async fn reverse_geocode(&self, lat: f64, lng: f64) -> Option<GeocodeResult> {
        match self.lookup(lat, lng).await {
            Ok(result) => Some(result),
            Err(e) => {
                warn!(service = "google", lat, lng, error = %e, "Reverse geocoding failed");
                None
            }
        }
    }

    fn service(&self) -> GeocodingService {
        GeocodingService::Google
    }
}

#[derive(Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GoogleResult>,
    error_message: Option<String>,
}

#[derive(Deserialize)]
struct GoogleResult {
    formatted_address: String,
    #[serde(default)]
    address_components: Vec<AddressComponent>,
}

/// One entry of a Google `address_components` list.
#[derive(Debug, Clone, Deserialize)]
pub struct AddressComponent {
    pub long_name: String,
    pub short_name: String,
    #[serde(default)]
    pub types: Vec<String>,
}

fn parse_response(body: &[u8], lat: f64, lng: f64) -> Result<GeocodeResult, GeocodeError> {
    let response: GeocodeResponse = serde_json::from_slice(body).map_err(|e| {
        GeocodeError::InvalidResponse(format!("failed to parse Google response: {}", e))
    })?;

    if response.status != STATUS_OK {
        if let Some(message) = &response.error_message {
            tracing::debug!(status = %response.status, message = %message, "Google geocoding error");
        }
        return Err(GeocodeError::ServiceStatus {
            service: GeocodingService::Google,
            status: response.status,
        });
    }

    let first = response
        .results
        .into_iter()
        .next()
        .ok_or(GeocodeError::NoResult { lat, lng })?;

    Ok(GeocodeResult {
        display_name: first.formatted_address,
        address: Some(map_components(&first.address_components)),
    })
}

/// Folds Google address components into the shared address shape.
///
/// `locality` takes precedence over `administrative_area_level_3` for the
/// city regardless of component order; every other field keeps the first
/// component that supplied it.
pub fn map_components(components: &[AddressComponent]) -> StructuredAddress {
    let mut address = StructuredAddress::default();
    let mut city_from_locality = false;

    for component in components {
        for kind in &component.types {
            let long = || Some(component.long_name.clone());
            match kind.as_str() {
                "street_number" => set_once(&mut address.house_number, long()),
                "route" => set_once(&mut address.road, long()),
                "locality" => {
                    if !city_from_locality {
                        address.city = long();
                        city_from_locality = true;
                    }
                }
                "administrative_area_level_3" => set_once(&mut address.city, long()),
                "administrative_area_level_2" => set_once(&mut address.county, long()),
                "administrative_area_level_1" => set_once(&mut address.state, long()),
                "country" => {
                    set_once(&mut address.country, long());
                    set_once(
                        &mut address.country_code,
                        Some(component.short_name.clone()),
                    );
                }
                "postal_code" => set_once(&mut address.postcode, long()),
                "sublocality" | "sublocality_level_1" | "neighborhood" => {
                    set_once(&mut address.suburb, long())
                }
                _ => {}
            }
        }
    }

    address
}

fn set_once(field: &mut Option<String>, value: Option<String>) {
    if field.is_none() {
        *field = value;
    }
}
