//! Vector style engine.
//!
//! Stands in for a vector-style library that works in (lng, lat) order.
//! Accepts style documents and also plain raster tiles, which such
//! libraries wrap in a one-layer style.

use std::sync::Arc;

use super::raster::tiles;
use super::sdk::{AxisOrder, BaseLayer, MapSdk};
use super::types::{EngineError, EngineKind, MapSourceConfig};

/// Style used when no source is given.
pub const DEMO_STYLE_URL: &str = "https://demotiles.maplibre.org/style.json";

pub struct VectorStyleEngine {
    sdk: Arc<dyn MapSdk>,
}

impl VectorStyleEngine {
    const AXIS: AxisOrder = AxisOrder::LngLat;

    pub fn new(sdk: Arc<dyn MapSdk>) -> Self {
        Self { sdk }
    }

    fn base_layer(&self, source: &MapSourceConfig) -> Result<BaseLayer, EngineError> {
        match source {
            MapSourceConfig::VectorStyle { style_url } => Ok(BaseLayer::Style {
                style_url: style_url.clone(),
            }),
            MapSourceConfig::RasterTiles {
                url_template,
                attribution,
                max_zoom,
            } => Ok(tiles(url_template, attribution, *max_zoom)),
            MapSourceConfig::Default => Ok(BaseLayer::Style {
                style_url: DEMO_STYLE_URL.to_string(),
            }),
            MapSourceConfig::Hosted { .. } => Err(EngineError::UnsupportedSource {
                engine: EngineKind::VectorStyle,
                source_kind: source.variant_name(),
            }),
        }
    }
}

sdk_engine!(VectorStyleEngine, EngineKind::VectorStyle);
