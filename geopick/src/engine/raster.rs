//! Raster tile engine.
//!
//! Stands in for a raster-tile library that works in (lat, lng) order.

use std::sync::Arc;

use super::sdk::{AxisOrder, BaseLayer, MapSdk};
use super::types::{EngineError, EngineKind, MapSourceConfig};

/// OpenStreetMap standard tiles.
pub const OSM_TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";

/// Attribution required by the OpenStreetMap tile usage policy.
pub const OSM_ATTRIBUTION: &str = "© OpenStreetMap contributors";

/// Highest zoom served by the OpenStreetMap tile servers.
pub const OSM_MAX_ZOOM: u8 = 19;

/// Base layer for the OpenStreetMap standard tiles.
pub(super) fn osm_tiles() -> BaseLayer {
    BaseLayer::Tiles {
        url_template: OSM_TILE_URL.to_string(),
        attribution: OSM_ATTRIBUTION.to_string(),
        max_zoom: OSM_MAX_ZOOM,
    }
}

/// Tile layer for an explicit raster source.
pub(super) fn tiles(url_template: &str, attribution: &str, max_zoom: u8) -> BaseLayer {
    BaseLayer::Tiles {
        url_template: url_template.to_string(),
        attribution: attribution.to_string(),
        max_zoom,
    }
}

pub struct RasterEngine {
    sdk: Arc<dyn MapSdk>,
}

impl RasterEngine {
    const AXIS: AxisOrder = AxisOrder::LatLng;

    pub fn new(sdk: Arc<dyn MapSdk>) -> Self {
        Self { sdk }
    }

    fn base_layer(&self, source: &MapSourceConfig) -> Result<BaseLayer, EngineError> {
        match source {
            MapSourceConfig::RasterTiles {
                url_template,
                attribution,
                max_zoom,
            } => Ok(tiles(url_template, attribution, *max_zoom)),
            MapSourceConfig::Default => Ok(osm_tiles()),
            other => Err(EngineError::UnsupportedSource {
                engine: EngineKind::Raster,
                source_kind: other.variant_name(),
            }),
        }
    }
}

sdk_engine!(RasterEngine, EngineKind::Raster);
