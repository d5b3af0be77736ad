//! INI serialization logic for converting `ConfigFile` → INI string.

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let api_key = config.google.api_key.as_deref().unwrap_or("");
    let map_id = config.google.map_id.as_deref().unwrap_or("");

    format!(
        r#"[geocoding]
; Reverse geocoding service:
;   nominatim - OpenStreetMap Nominatim (free, no key required)
;   google    - Google Geocoding API (requires [google] api_key)
service = {}
; Nominatim server root (change when self-hosting)
nominatim_url = {}
; Google Maps Platform host root
google_url = {}
; Quiet period after the last coordinate change before a lookup fires
debounce_ms = {}
; HTTP timeout in seconds
timeout_secs = {}
; User-Agent sent to Nominatim (its usage policy requires an identifying agent)
user_agent = {}

[google]
; Google Maps Platform API key, shared by the google geocoder and the hosted map engine.
; The GOOGLE_MAPS_API_KEY environment variable takes precedence.
api_key = {}
; Optional cloud map id for the hosted map engine
map_id = {}

[map]
; Input map engine: raster, vector, feature, hosted
engine = {}
; Basemap style preset: standard, light, topo
style = {}
; Initial zoom level (0-22)
zoom = {}
; Initial map center
default_lat = {}
default_lng = {}

[logging]
; Log file path
file = {}
"#,
        config.geocoding.service,
        config.geocoding.nominatim_url,
        config.geocoding.google_url,
        config.geocoding.debounce_ms,
        config.geocoding.timeout_secs,
        config.geocoding.user_agent,
        api_key,
        map_id,
        config.map.engine.id(),
        config.map.style.id(),
        config.map.zoom,
        config.map.default_lat,
        config.map.default_lng,
        config.logging.file.to_string_lossy(),
    )
}
