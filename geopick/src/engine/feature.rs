//! Feature layer engine.
//!
//! Stands in for a feature-layer library that addresses points as (x, y),
//! i.e. longitude first. Its default base layer is the named `osm` basemap.

use std::sync::Arc;

use super::raster::tiles;
use super::sdk::{AxisOrder, BaseLayer, MapSdk};
use super::types::{EngineError, EngineKind, MapSourceConfig};

/// Named basemap used for [`MapSourceConfig::Default`].
pub const DEFAULT_BASEMAP: &str = "osm";

pub struct FeatureLayerEngine {
    sdk: Arc<dyn MapSdk>,
}

impl FeatureLayerEngine {
    const AXIS: AxisOrder = AxisOrder::LngLat;

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
            MapSourceConfig::Default => Ok(BaseLayer::Basemap {
                name: DEFAULT_BASEMAP.to_string(),
            }),
            other => Err(EngineError::UnsupportedSource {
                engine: EngineKind::FeatureLayer,
                source_kind: other.variant_name(),
            }),
        }
    }
}

sdk_engine!(FeatureLayerEngine, EngineKind::FeatureLayer);
