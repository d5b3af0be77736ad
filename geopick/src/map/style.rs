//! Basemap style presets.
//!
//! A preset maps every engine to the source it should render, so switching
//! presets only reinitializes the maps whose source actually changes.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::engine::{EngineKind, MapSourceConfig};

const CARTO_LIGHT_TILES: &str = "https://{s}.basemaps.cartocdn.com/light_all/{z}/{x}/{y}.png";
const CARTO_LIGHT_STYLE: &str = "https://basemaps.cartocdn.com/gl/positron-gl-style/style.json";
const CARTO_ATTRIBUTION: &str = "© OpenStreetMap contributors © CARTO";
const CARTO_MAX_ZOOM: u8 = 20;

const OPENTOPOMAP_TILES: &str = "https://{s}.tile.opentopomap.org/{z}/{x}/{y}.png";
const OPENTOPOMAP_ATTRIBUTION: &str =
    "Map data: © OpenStreetMap contributors, SRTM | Map style: © OpenTopoMap (CC-BY-SA)";
const OPENTOPOMAP_MAX_ZOOM: u8 = 17;

/// Unrecognized style identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown map style '{0}' (expected standard, light or topo)")]
pub struct UnknownStyle(pub String);

/// Basemap look shared by every map of the demo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MapStyle {
    /// Each engine's own default base layer
    #[default]
    Standard,
    /// Low-contrast light basemap
    Light,
    /// Topographic basemap with contour lines
    Topographic,
}

impl MapStyle {
    pub const ALL: [MapStyle; 3] = [MapStyle::Standard, MapStyle::Light, MapStyle::Topographic];

    /// Identifier used in config files and on the command line.
    pub fn id(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Light => "light",
            Self::Topographic => "topo",
        }
    }

    /// Source an engine should render for this style.
    ///
    /// `map_id` only applies to the hosted engine.
    pub fn source_for(&self, kind: EngineKind, map_id: Option<&str>) -> MapSourceConfig {
        if kind == EngineKind::Hosted {
            let map_type = match self {
                Self::Topographic => "terrain",
                Self::Standard | Self::Light => "roadmap",
            };
            return MapSourceConfig::Hosted {
                map_id: map_id.map(str::to_string),
                map_type: map_type.to_string(),
            };
        }

        match (self, kind) {
            (Self::Standard, _) => MapSourceConfig::Default,
            (Self::Light, EngineKind::VectorStyle) => MapSourceConfig::VectorStyle {
                style_url: CARTO_LIGHT_STYLE.to_string(),
            },
            (Self::Light, _) => MapSourceConfig::RasterTiles {
                url_template: CARTO_LIGHT_TILES.to_string(),
                attribution: CARTO_ATTRIBUTION.to_string(),
                max_zoom: CARTO_MAX_ZOOM,
            },
            (Self::Topographic, _) => MapSourceConfig::RasterTiles {
                url_template: OPENTOPOMAP_TILES.to_string(),
                attribution: OPENTOPOMAP_ATTRIBUTION.to_string(),
                max_zoom: OPENTOPOMAP_MAX_ZOOM,
            },
        }
    }
}

impl fmt::Display for MapStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for MapStyle {
    type Err = UnknownStyle;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "standard" | "default" => Ok(Self::Standard),
            "light" => Ok(Self::Light),
            "topo" | "topographic" => Ok(Self::Topographic),
            other => Err(UnknownStyle(other.to_string())),
        }
    }
}
