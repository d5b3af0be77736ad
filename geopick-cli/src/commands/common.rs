//! Common types and utilities shared across CLI commands.

use clap::ValueEnum;
use geopick::config::ConfigFile;
use geopick::coord::LatLng;
use geopick::geocode::{AsyncReqwestClient, GeocoderFactory, GeocodingService};
use geopick::map::MapStyle;

use crate::error::CliError;

/// Geocoding service selection for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq)]
pub enum ServiceType {
    /// OpenStreetMap Nominatim (no API key required)
    Nominatim,
    /// Google Geocoding API (requires API key)
    Google,
}

impl From<ServiceType> for GeocodingService {
    fn from(service: ServiceType) -> Self {
        match service {
            ServiceType::Nominatim => GeocodingService::Nominatim,
            ServiceType::Google => GeocodingService::Google,
        }
    }
}

/// Basemap style selection for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq)]
pub enum StyleType {
    /// Each engine's default base layer
    Standard,
    /// Light, low-contrast basemap
    Light,
    /// Topographic basemap
    Topo,
}

impl From<StyleType> for MapStyle {
    fn from(style: StyleType) -> Self {
        match style {
            StyleType::Standard => MapStyle::Standard,
            StyleType::Light => MapStyle::Light,
            StyleType::Topo => MapStyle::Topographic,
        }
    }
}

/// Resolve the geocoding service: CLI takes precedence, then config.
pub fn resolve_service(cli_service: Option<ServiceType>, config: &ConfigFile) -> GeocodingService {
    cli_service
        .map(GeocodingService::from)
        .unwrap_or(config.geocoding.service)
}

/// Validate a coordinate given on the command line.
pub fn parse_point(lat: f64, lng: f64) -> Result<LatLng, CliError> {
    let point = LatLng::new(lat, lng);
    point
        .validate()
        .map_err(|e| CliError::InvalidArgument(e.to_string()))?;
    Ok(point)
}

/// Geocoder factory using the configured HTTP timeout.
pub fn geocoder_factory(config: &ConfigFile) -> Result<GeocoderFactory, CliError> {
    let client = AsyncReqwestClient::with_timeout(config.geocoding.timeout_secs)
        .map_err(CliError::HttpClient)?;
    Ok(GeocoderFactory::new(client))
}
