//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.
//! These are pure data types with no parsing or serialization logic.

use std::path::PathBuf;

use crate::engine::EngineKind;
use crate::geocode::GeocodingService;
use crate::map::MapStyle;

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    /// Reverse geocoding settings
    pub geocoding: GeocodingSettings,
    /// Google Maps Platform settings
    pub google: GoogleSettings,
    /// Map settings
    pub map: MapSettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

/// Reverse geocoding configuration.
#[derive(Debug, Clone)]
pub struct GeocodingSettings {
    /// Service selected at startup
    pub service: GeocodingService,
    /// Nominatim server root
    pub nominatim_url: String,
    /// Google Maps Platform host root
    pub google_url: String,
    /// Quiet period after the last coordinate change before a lookup fires
    pub debounce_ms: u64,
    /// HTTP timeout in seconds
    pub timeout_secs: u64,
    /// User-Agent sent to Nominatim
    pub user_agent: String,
}

/// Google Maps Platform configuration.
#[derive(Debug, Clone, Default)]
pub struct GoogleSettings {
    /// API key for the Google geocoder and the hosted map engine
    pub api_key: Option<String>,
    /// Optional cloud map id for the hosted map engine
    pub map_id: Option<String>,
}

/// Map configuration.
#[derive(Debug, Clone)]
pub struct MapSettings {
    /// Engine used by the input map
    pub engine: EngineKind,
    /// Basemap style preset
    pub style: MapStyle,
    /// Initial zoom level
    pub zoom: f64,
    /// Initial center latitude
    pub default_lat: f64,
    /// Initial center longitude
    pub default_lng: f64,
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LoggingSettings {
    /// Log file path
    pub file: PathBuf,
}
