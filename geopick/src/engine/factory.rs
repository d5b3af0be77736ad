//! Engine factory and closed engine enum.
//!
//! [`EngineFactory::create`] is the single place an [`EngineKind`] tag turns
//! into a working adapter.

use std::sync::Arc;

use tracing::debug;

use crate::coord::LatLng;

use super::feature::FeatureLayerEngine;
use super::hosted::HostedEngine;
use super::raster::RasterEngine;
use super::sdk::MapSdk;
use super::session::EngineHandle;
use super::types::{
    EngineError, EngineKind, EngineOptions, EventSender, MapEngine, MapSourceConfig, MapView,
    MarkerSpec,
};
use super::vector::VectorStyleEngine;

/// Every engine adapter, dispatched by exhaustive match.
pub enum Engine {
    Raster(RasterEngine),
    VectorStyle(VectorStyleEngine),
    FeatureLayer(FeatureLayerEngine),
    Hosted(HostedEngine),
}

impl Engine {
    fn inner(&self) -> &dyn MapEngine {
        match self {
            Engine::Raster(e) => e,
            Engine::VectorStyle(e) => e,
            Engine::FeatureLayer(e) => e,
            Engine::Hosted(e) => e,
        }
    }
}

impl MapEngine for Engine {
    fn kind(&self) -> EngineKind {
        match self {
            Engine::Raster(_) => EngineKind::Raster,
            Engine::VectorStyle(_) => EngineKind::VectorStyle,
            Engine::FeatureLayer(_) => EngineKind::FeatureLayer,
            Engine::Hosted(_) => EngineKind::Hosted,
        }
    }

    fn init(
        &self,
        container: &str,
        view: MapView,
        source: &MapSourceConfig,
        options: EngineOptions,
        events: EventSender,
    ) -> Result<EngineHandle, EngineError> {
        self.inner().init(container, view, source, options, events)
    }

    fn update_markers(
        &self,
        handle: &mut EngineHandle,
        markers: &[MarkerSpec],
    ) -> Result<(), EngineError> {
        self.inner().update_markers(handle, markers)
    }

    fn set_center(&self, handle: &mut EngineHandle, center: LatLng) -> Result<(), EngineError> {
        self.inner().set_center(handle, center)
    }

    fn set_zoom(&self, handle: &mut EngineHandle, zoom: f64) -> Result<(), EngineError> {
        self.inner().set_zoom(handle, zoom)
    }

    fn destroy(&self, container: &str, handle: Option<EngineHandle>) {
        self.inner().destroy(container, handle)
    }
}

/// Creates engine adapters bound to one map SDK.
#[derive(Clone)]
pub struct EngineFactory {
    sdk: Arc<dyn MapSdk>,
    hosted_api_key: Option<String>,
}

impl EngineFactory {
    pub fn new(sdk: Arc<dyn MapSdk>) -> Self {
        Self {
            sdk,
            hosted_api_key: None,
        }
    }

    /// Sets the key handed to [`EngineKind::Hosted`] adapters.
    pub fn with_hosted_api_key(mut self, api_key: Option<String>) -> Self {
        self.hosted_api_key = api_key;
        self
    }

    /// The SDK every created adapter drives.
    pub fn sdk(&self) -> &Arc<dyn MapSdk> {
        &self.sdk
    }

    pub fn create(&self, kind: EngineKind) -> Engine {
        debug!(engine = %kind, "Creating engine adapter");
        let sdk = Arc::clone(&self.sdk);
        match kind {
            EngineKind::Raster => Engine::Raster(RasterEngine::new(sdk)),
            EngineKind::VectorStyle => Engine::VectorStyle(VectorStyleEngine::new(sdk)),
            EngineKind::FeatureLayer => Engine::FeatureLayer(FeatureLayerEngine::new(sdk)),
            EngineKind::Hosted => {
                Engine::Hosted(HostedEngine::new(sdk, self.hosted_api_key.clone()))
            }
        }
    }
}
