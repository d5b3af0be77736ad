//! Geocoding types and traits

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::CredentialError;

/// Semantic address fields shared by every geocoding service.
///
/// Field names follow the Nominatim `address` object so that its responses
/// deserialize directly; other services map into this shape.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StructuredAddress {
    pub house_number: Option<String>,
    pub road: Option<String>,
    pub suburb: Option<String>,
    pub city: Option<String>,
    pub town: Option<String>,
    pub village: Option<String>,
    pub county: Option<String>,
    pub state: Option<String>,
    pub postcode: Option<String>,
    pub country: Option<String>,
    pub country_code: Option<String>,
}

/// Outcome of one successful reverse geocoding lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeResult {
    /// Full human-readable name as returned by the service
    pub display_name: String,
    /// Structured fields, when the service returned any
    pub address: Option<StructuredAddress>,
}

impl GeocodeResult {
    /// Short address line for popups and summaries.
    ///
    /// Uses [`format_address`](super::format_address) on the structured
    /// fields and falls back to the display name when that yields nothing.
    pub fn summary(&self) -> String {
        self.address
            .as_ref()
            .map(super::format_address)
            .filter(|line| !line.is_empty())
            .unwrap_or_else(|| self.display_name.clone())
    }
}

/// The selectable reverse geocoding services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GeocodingService {
    /// OpenStreetMap Nominatim (no key required)
    #[default]
    Nominatim,
    /// Google Geocoding API (requires an API key)
    Google,
}

impl GeocodingService {
    /// Every service, in display order.
    pub const ALL: [GeocodingService; 2] = [GeocodingService::Nominatim, GeocodingService::Google];

    /// Identifier used in config files and on the command line.
    pub fn id(&self) -> &'static str {
        match self {
            Self::Nominatim => "nominatim",
            Self::Google => "google",
        }
    }

    /// Human-readable service name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Nominatim => "OpenStreetMap Nominatim",
            Self::Google => "Google Geocoding",
        }
    }
}

impl fmt::Display for GeocodingService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for GeocodingService {
    type Err = GeocodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "nominatim" | "osm" | "openstreetmap" => Ok(Self::Nominatim),
            "google" => Ok(Self::Google),
            other => Err(GeocodeError::UnknownService(other.to_string())),
        }
    }
}

/// Errors that can occur during a reverse geocoding lookup.
///
/// These never reach the UI layer as failures: [`ReverseGeocoder`]
/// implementations log them and resolve to "no result".
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeocodeError {
    /// Transport failure or non-success HTTP status
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Body could not be decoded
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Service answered with a non-OK status field
    #[error("{service} returned status {status}")]
    ServiceStatus {
        service: GeocodingService,
        status: String,
    },

    /// Service was reached but returned nothing usable
    #[error("No address found at ({lat}, {lng})")]
    NoResult { lat: f64, lng: f64 },

    /// Missing or placeholder credential
    #[error("Configuration error: {0}")]
    Credential(#[from] CredentialError),

    /// Unrecognized service identifier
    #[error("Unknown geocoding service '{0}' (expected nominatim or google)")]
    UnknownService(String),
}

/// Reverse geocoding capability.
///
/// Performs exactly one network call per invocation, with no retry and no
/// caching. Any failure resolves to `None`.
pub trait ReverseGeocoder: Send + Sync {
    /// Resolves a coordinate to an address, or `None` on any failure.
    fn reverse_geocode(
        &self,
        lat: f64,
        lng: f64,
    ) -> impl Future<Output = Option<GeocodeResult>> + Send;

    /// The service this geocoder talks to.
    fn service(&self) -> GeocodingService;
}
