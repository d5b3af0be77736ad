//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This is the single place where INI key names are mapped to struct fields.

use ini::Ini;
use std::path::PathBuf;
use std::str::FromStr;

use super::file::ConfigFileError;
use super::settings::ConfigFile;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [geocoding] section
    if let Some(section) = ini.section(Some("geocoding")) {
        if let Some(v) = section.get("service") {
            config.geocoding.service =
                parse_value("geocoding", "service", v, "must be one of: nominatim, google")?;
        }
        if let Some(v) = non_empty(section.get("nominatim_url")) {
            config.geocoding.nominatim_url = v.to_string();
        }
        if let Some(v) = non_empty(section.get("google_url")) {
            config.geocoding.google_url = v.to_string();
        }
        if let Some(v) = section.get("debounce_ms") {
            config.geocoding.debounce_ms = parse_value(
                "geocoding",
                "debounce_ms",
                v,
                "must be a non-negative integer (milliseconds)",
            )?;
        }
        if let Some(v) = section.get("timeout_secs") {
            let timeout: u64 = parse_value(
                "geocoding",
                "timeout_secs",
                v,
                "must be a positive integer (seconds)",
            )?;
            if timeout == 0 {
                return Err(invalid(
                    "geocoding",
                    "timeout_secs",
                    v,
                    "must be a positive integer (seconds)",
                ));
            }
            config.geocoding.timeout_secs = timeout;
        }
        if let Some(v) = non_empty(section.get("user_agent")) {
            config.geocoding.user_agent = v.to_string();
        }
    }

    // [google] section
    if let Some(section) = ini.section(Some("google")) {
        config.google.api_key = non_empty(section.get("api_key")).map(str::to_string);
        config.google.map_id = non_empty(section.get("map_id")).map(str::to_string);
    }

    // [map] section
    if let Some(section) = ini.section(Some("map")) {
        if let Some(v) = section.get("engine") {
            config.map.engine = parse_value(
                "map",
                "engine",
                v,
                "must be one of: raster, vector, feature, hosted",
            )?;
        }
        if let Some(v) = section.get("style") {
            config.map.style =
                parse_value("map", "style", v, "must be one of: standard, light, topo")?;
        }
        if let Some(v) = section.get("zoom") {
            let zoom: f64 = parse_value("map", "zoom", v, "must be a number")?;
            if !(0.0..=22.0).contains(&zoom) {
                return Err(invalid("map", "zoom", v, "must be between 0 and 22"));
            }
            config.map.zoom = zoom;
        }
        if let Some(v) = section.get("default_lat") {
            let lat: f64 = parse_value("map", "default_lat", v, "must be a number")?;
            if !(-90.0..=90.0).contains(&lat) {
                return Err(invalid("map", "default_lat", v, "must be between -90 and 90"));
            }
            config.map.default_lat = lat;
        }
        if let Some(v) = section.get("default_lng") {
            let lng: f64 = parse_value("map", "default_lng", v, "must be a number")?;
            if !(-180.0..=180.0).contains(&lng) {
                return Err(invalid(
                    "map",
                    "default_lng",
                    v,
                    "must be between -180 and 180",
                ));
            }
            config.map.default_lng = lng;
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = non_empty(section.get("file")) {
            config.logging.file = expand_tilde(v);
        }
    }

    Ok(config)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_value<T: FromStr>(
    section: &str,
    key: &str,
    value: &str,
    reason: &str,
) -> Result<T, ConfigFileError> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid(section, key, value, reason))
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Expand a leading `~` to the home directory.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
