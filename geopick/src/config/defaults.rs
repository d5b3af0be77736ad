//! Default values and constants for all configuration settings.

use std::path::PathBuf;

use super::settings::*;
use crate::engine::EngineKind;
use crate::geocode::{
    GeocodingService, DEFAULT_GOOGLE_URL, DEFAULT_NOMINATIM_URL, DEFAULT_TIMEOUT_SECS,
    DEFAULT_USER_AGENT,
};
use crate::map::MapStyle;

/// Debounce window before a reverse geocoding lookup fires.
pub const DEFAULT_DEBOUNCE_MS: u64 = 1000;

/// Initial zoom of every map.
pub const DEFAULT_ZOOM: f64 = 13.0;

/// Initial map center (central London).
pub const DEFAULT_LAT: f64 = 51.505;
pub const DEFAULT_LNG: f64 = -0.09;

/// Log file name inside the config directory.
pub const DEFAULT_LOG_FILE: &str = "geopick.log";

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            geocoding: GeocodingSettings::default(),
            google: GoogleSettings::default(),
            map: MapSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl Default for GeocodingSettings {
    fn default() -> Self {
        Self {
            service: GeocodingService::Nominatim,
            nominatim_url: DEFAULT_NOMINATIM_URL.to_string(),
            google_url: DEFAULT_GOOGLE_URL.to_string(),
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            engine: EngineKind::Raster,
            style: MapStyle::Standard,
            zoom: DEFAULT_ZOOM,
            default_lat: DEFAULT_LAT,
            default_lng: DEFAULT_LNG,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            file: super::file::config_directory().join(DEFAULT_LOG_FILE),
        }
    }
}

/// Default log file location.
pub fn default_log_file() -> PathBuf {
    LoggingSettings::default().file
}
