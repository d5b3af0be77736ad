//! Base map: owns one engine session for one container.
//!
//! ```text
//! Uninitialized --mount--> Ready(kind) | Failed(kind, error)
//!        |                        |
//!        +-------unmount-------> Destroyed
//! ```
//!
//! An engine or source change while mounted destroys the current session
//! before initializing the next, so a container never holds two maps.

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::coord::LatLng;
use crate::engine::{
    Engine, EngineError, EngineFactory, EngineHandle, EngineKind, EngineOptions, MapEngine,
    MapEvent, MapSourceConfig, MapView, MarkerSpec,
};

/// Lifecycle state of a [`BaseMap`].
#[derive(Debug, Clone, PartialEq)]
pub enum MapStatus {
    Uninitialized,
    Ready(EngineKind),
    /// Init failed; the engine is kept so unmount still tears it down
    Failed {
        kind: EngineKind,
        error: EngineError,
    },
    Destroyed,
}

impl MapStatus {
    /// True in `Ready` or `Failed`.
    pub fn is_mounted(&self) -> bool {
        matches!(self, MapStatus::Ready(_) | MapStatus::Failed { .. })
    }
}

pub struct BaseMap {
    factory: EngineFactory,
    container: String,
    kind: EngineKind,
    source: MapSourceConfig,
    options: EngineOptions,
    view: MapView,
    markers: Vec<MarkerSpec>,
    engine: Option<Engine>,
    handle: Option<EngineHandle>,
    status: MapStatus,
    events: mpsc::UnboundedReceiver<MapEvent>,
}

impl BaseMap {
    pub fn new(
        factory: EngineFactory,
        container: impl Into<String>,
        kind: EngineKind,
        source: MapSourceConfig,
        view: MapView,
        options: EngineOptions,
    ) -> Self {
        // Replaced on every init; starts closed
        let (_, events) = mpsc::unbounded_channel();
        Self {
            factory,
            container: container.into(),
            kind,
            source,
            options,
            view,
            markers: Vec::new(),
            engine: None,
            handle: None,
            status: MapStatus::Uninitialized,
            events,
        }
    }

    /// Creates the engine session.
    ///
    /// An init failure is returned and also kept as [`MapStatus::Failed`].
    /// Mounting an already mounted or destroyed map does nothing.
    pub fn mount(&mut self) -> Result<(), EngineError> {
        match &self.status {
            MapStatus::Uninitialized => self.start(),
            MapStatus::Destroyed => {
                warn!(container = %self.container, "Mount after unmount ignored");
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Switches engines, reinitializing when mounted.
    pub fn set_engine(&mut self, kind: EngineKind) -> Result<(), EngineError> {
        let source = self.source.clone();
        self.reconfigure(kind, source)
    }

    /// Replaces the base layer source, reinitializing when mounted and the
    /// value actually changed.
    pub fn set_source(&mut self, source: MapSourceConfig) -> Result<(), EngineError> {
        self.reconfigure(self.kind, source)
    }

    /// Changes engine and source together with at most one reinitialization.
    pub fn reconfigure(
        &mut self,
        kind: EngineKind,
        source: MapSourceConfig,
    ) -> Result<(), EngineError> {
        if kind == self.kind && source == self.source {
            return Ok(());
        }
        debug!(
            container = %self.container,
            from = %self.kind,
            to = %kind,
            source = source.variant_name(),
            "Reconfiguring map"
        );
        self.kind = kind;
        self.source = source;
        self.restart()
    }

    pub fn set_center(&mut self, center: LatLng) -> Result<(), EngineError> {
        self.view.center = center;
        match (&self.engine, self.handle.as_mut()) {
            (Some(engine), Some(handle)) => engine.set_center(handle, center),
            _ => Ok(()),
        }
    }

    pub fn set_zoom(&mut self, zoom: f64) -> Result<(), EngineError> {
        self.view.zoom = zoom;
        match (&self.engine, self.handle.as_mut()) {
            (Some(engine), Some(handle)) => {
                engine.set_zoom(handle, zoom)?;
                self.view.zoom = handle.view().zoom;
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Replaces the full marker list.
    pub fn set_markers(&mut self, markers: Vec<MarkerSpec>) -> Result<(), EngineError> {
        self.markers = markers;
        match (&self.engine, self.handle.as_mut()) {
            (Some(engine), Some(handle)) => engine.update_markers(handle, &self.markers),
            _ => Ok(()),
        }
    }

    /// Tears the session down. Destroy runs at most once per session.
    ///
    /// A map that was never mounted has no session and never touched its
    /// container, so unmounting it only marks it destroyed. Once `mount`
    /// has run, destroy runs even if init failed.
    pub fn unmount(&mut self) {
        if self.status == MapStatus::Destroyed {
            return;
        }
        self.teardown();
        self.status = MapStatus::Destroyed;
        debug!(container = %self.container, "Map unmounted");
    }

    /// Next pending engine event, if any.
    pub fn next_event(&mut self) -> Option<MapEvent> {
        let event = self.events.try_recv().ok()?;
        if let MapEvent::CenterChanged(center) = event {
            self.view.center = center;
            if let Some(handle) = self.handle.as_mut() {
                handle.record_center(center);
            }
        }
        Some(event)
    }

    /// Every pending engine event, oldest first.
    pub fn drain_events(&mut self) -> Vec<MapEvent> {
        std::iter::from_fn(|| self.next_event()).collect()
    }

    pub fn status(&self) -> &MapStatus {
        &self.status
    }

    pub fn kind(&self) -> EngineKind {
        self.kind
    }

    pub fn source(&self) -> &MapSourceConfig {
        &self.source
    }

    pub fn container(&self) -> &str {
        &self.container
    }

    /// Current view as last set or reported by the engine.
    pub fn view(&self) -> MapView {
        self.view
    }

    pub fn markers(&self) -> &[MarkerSpec] {
        &self.markers
    }

    /// The live session, when ready.
    pub fn handle(&self) -> Option<&EngineHandle> {
        self.handle.as_ref()
    }

    fn restart(&mut self) -> Result<(), EngineError> {
        if !self.status.is_mounted() {
            return Ok(());
        }
        self.teardown();
        self.start()
    }

    fn start(&mut self) -> Result<(), EngineError> {
        let engine = self.factory.create(self.kind);
        let (tx, rx) = mpsc::unbounded_channel();
        self.events = rx;

        let result = engine
            .init(&self.container, self.view, &self.source, self.options, tx)
            .and_then(|mut handle| {
                if !self.markers.is_empty() {
                    if let Err(e) = engine.update_markers(&mut handle, &self.markers) {
                        engine.destroy(&self.container, Some(handle));
                        return Err(e);
                    }
                }
                Ok(handle)
            });

        self.engine = Some(engine);
        match result {
            Ok(handle) => {
                self.view = handle.view();
                self.handle = Some(handle);
                self.status = MapStatus::Ready(self.kind);
                Ok(())
            }
            Err(error) => {
                warn!(
                    container = %self.container,
                    engine = %self.kind,
                    error = %error,
                    "Engine initialization failed"
                );
                self.status = MapStatus::Failed {
                    kind: self.kind,
                    error: error.clone(),
                };
                Err(error)
            }
        }
    }

    fn teardown(&mut self) {
        if let Some(engine) = self.engine.take() {
            engine.destroy(&self.container, self.handle.take());
        }
    }
}

impl Drop for BaseMap {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::HeadlessSdk;
    use std::sync::Arc;

    fn base_map(sdk: &Arc<HeadlessSdk>, kind: EngineKind) -> BaseMap {
        BaseMap::new(
            EngineFactory::new(sdk.clone()),
            "map",
            kind,
            MapSourceConfig::Default,
            MapView::new(LatLng::new(51.505, -0.09), 13.0),
            EngineOptions::default(),
        )
    }

    #[test]
    fn test_mount_reports_initial_center() {
        let sdk = Arc::new(HeadlessSdk::new());
        let mut map = base_map(&sdk, EngineKind::Raster);
        assert_eq!(map.status(), &MapStatus::Uninitialized);

        map.mount().unwrap();

        assert_eq!(map.status(), &MapStatus::Ready(EngineKind::Raster));
        assert_eq!(
            map.next_event(),
            Some(MapEvent::CenterChanged(LatLng::new(51.505, -0.09)))
        );
        assert_eq!(map.next_event(), None);
    }

    #[test]
    fn test_operations_before_mount_are_stored() {
        let sdk = Arc::new(HeadlessSdk::new());
        let mut map = base_map(&sdk, EngineKind::Raster);

        map.set_markers(vec![MarkerSpec::new(LatLng::new(1.0, 1.0).into())])
            .unwrap();
        map.set_center(LatLng::new(1.0, 1.0)).unwrap();
        assert_eq!(sdk.total_live_maps(), 0);

        map.mount().unwrap();
        let snapshot = sdk.snapshot("map").unwrap();
        assert_eq!(snapshot.center, LatLng::new(1.0, 1.0));
        assert_eq!(snapshot.markers.len(), 1);
    }

    #[test]
    fn test_engine_switch_destroys_before_create() {
        let sdk = Arc::new(HeadlessSdk::new());
        let mut map = base_map(&sdk, EngineKind::Raster);
        map.mount().unwrap();

        map.set_engine(EngineKind::VectorStyle).unwrap();
        map.set_engine(EngineKind::FeatureLayer).unwrap();

        let stats = sdk.stats();
        assert_eq!(stats.maps_created, 3);
        assert_eq!(stats.maps_removed, 2);
        assert_eq!(sdk.live_maps("map"), 1);
        assert_eq!(map.status(), &MapStatus::Ready(EngineKind::FeatureLayer));
    }

    #[test]
    fn test_same_source_does_not_reinitialize() {
        let sdk = Arc::new(HeadlessSdk::new());
        let mut map = base_map(&sdk, EngineKind::Raster);
        map.mount().unwrap();

        map.set_source(MapSourceConfig::Default).unwrap();
        map.set_engine(EngineKind::Raster).unwrap();
        assert_eq!(sdk.stats().maps_created, 1);

        map.set_source(MapSourceConfig::RasterTiles {
            url_template: "https://tiles.example.org/{z}/{x}/{y}.png".to_string(),
            attribution: String::new(),
            max_zoom: 18,
        })
        .unwrap();
        assert_eq!(sdk.stats().maps_created, 2);
        assert_eq!(sdk.live_maps("map"), 1);
    }

    #[test]
    fn test_markers_survive_reinitialization() {
        let sdk = Arc::new(HeadlessSdk::new());
        let mut map = base_map(&sdk, EngineKind::Raster);
        map.mount().unwrap();
        map.set_markers(vec![MarkerSpec::new(LatLng::new(5.0, 6.0).into())])
            .unwrap();

        map.set_engine(EngineKind::VectorStyle).unwrap();

        let snapshot = sdk.snapshot("map").unwrap();
        assert_eq!(snapshot.markers.len(), 1);
        assert_eq!(snapshot.markers[0].position, LatLng::new(5.0, 6.0));
    }

    #[test]
    fn test_reconfigure_reinitializes_once() {
        let sdk = Arc::new(HeadlessSdk::new());
        let mut map = base_map(&sdk, EngineKind::Raster);
        map.mount().unwrap();

        map.reconfigure(
            EngineKind::VectorStyle,
            MapSourceConfig::VectorStyle {
                style_url: "https://example.org/style.json".to_string(),
            },
        )
        .unwrap();

        assert_eq!(sdk.stats().maps_created, 2);
        assert_eq!(map.status(), &MapStatus::Ready(EngineKind::VectorStyle));
    }

    #[test]
    fn test_failed_init_still_destroyed_once() {
        let sdk = Arc::new(HeadlessSdk::new());
        let mut map = base_map(&sdk, EngineKind::Hosted);

        let err = map.mount().unwrap_err();
        assert!(matches!(err, EngineError::MissingCredential(_)));
        assert!(matches!(map.status(), MapStatus::Failed { .. }));

        map.unmount();
        map.unmount();
        assert_eq!(map.status(), &MapStatus::Destroyed);
        assert_eq!(sdk.stats().cleared("map"), 1);
        assert_eq!(sdk.stats().maps_created, 0);
    }

    #[test]
    fn test_failed_map_recovers_on_engine_switch() {
        let sdk = Arc::new(HeadlessSdk::new());
        let mut map = base_map(&sdk, EngineKind::Hosted);
        let _ = map.mount();

        map.set_engine(EngineKind::Raster).unwrap();
        assert_eq!(map.status(), &MapStatus::Ready(EngineKind::Raster));
        assert_eq!(sdk.live_maps("map"), 1);
    }

    #[test]
    fn test_drop_unmounts() {
        let sdk = Arc::new(HeadlessSdk::new());
        {
            let mut map = base_map(&sdk, EngineKind::Raster);
            map.mount().unwrap();
            assert_eq!(sdk.live_maps("map"), 1);
        }
        assert_eq!(sdk.live_maps("map"), 0);
        assert_eq!(sdk.stats().cleared("map"), 1);
    }

    #[test]
    fn test_unmount_before_mount_skips_destroy() {
        let sdk = Arc::new(HeadlessSdk::new());
        let mut map = base_map(&sdk, EngineKind::Raster);
        map.unmount();

        assert_eq!(sdk.stats().cleared("map"), 0);
        assert!(map.mount().is_ok());
        assert_eq!(sdk.total_live_maps(), 0);
    }

    #[test]
    fn test_user_pan_updates_view() {
        let sdk = Arc::new(HeadlessSdk::new());
        let mut map = base_map(&sdk, EngineKind::Raster);
        map.mount().unwrap();
        map.drain_events();

        sdk.pan_to("map", LatLng::new(48.0, 2.0));
        assert_eq!(
            map.drain_events(),
            vec![MapEvent::CenterChanged(LatLng::new(48.0, 2.0))]
        );
        assert_eq!(map.view().center, LatLng::new(48.0, 2.0));
    }

    #[test]
    fn test_zoom_after_pan_keeps_panned_center() {
        let sdk = Arc::new(HeadlessSdk::new());
        let mut map = base_map(&sdk, EngineKind::Raster);
        map.mount().unwrap();
        sdk.pan_to("map", LatLng::new(48.0, 2.0));
        map.drain_events();

        map.set_zoom(10.0).unwrap();

        let snapshot = sdk.snapshot("map").unwrap();
        assert_eq!(snapshot.center, LatLng::new(48.0, 2.0));
        assert_eq!(snapshot.zoom, 10.0);
        assert_eq!(map.view().center, LatLng::new(48.0, 2.0));
    }
}
