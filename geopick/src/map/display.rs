//! Display map: read-only rendering of a fixed coordinate.

use crate::coord::Coordinate;
use crate::engine::{
    EngineError, EngineFactory, EngineKind, EngineOptions, MapSourceConfig, MapView, MarkerSpec,
};

use super::base::{BaseMap, MapStatus};

/// Non-interactive map with one marker at an external coordinate.
pub struct DisplayMap {
    map: BaseMap,
    position: Coordinate,
    popup: Option<String>,
}

impl DisplayMap {
    pub fn new(
        factory: EngineFactory,
        container: impl Into<String>,
        kind: EngineKind,
        source: MapSourceConfig,
        view: MapView,
    ) -> Self {
        Self {
            map: BaseMap::new(
                factory,
                container,
                kind,
                source,
                view,
                EngineOptions::read_only(),
            ),
            position: Coordinate::UNSET,
            popup: None,
        }
    }

    pub fn mount(&mut self) -> Result<(), EngineError> {
        self.map.mount()
    }

    /// Moves marker and view without reinitializing. Unset clears the marker.
    pub fn set_position(
        &mut self,
        position: Coordinate,
        popup: Option<String>,
    ) -> Result<(), EngineError> {
        if position == self.position && popup == self.popup {
            return Ok(());
        }
        self.position = position;
        self.popup = popup;

        let markers = match position.as_lat_lng() {
            Some(point) => {
                self.map.set_center(point)?;
                vec![MarkerSpec {
                    position,
                    popup_text: self.popup.clone(),
                }]
            }
            None => Vec::new(),
        };
        let result = self.map.set_markers(markers);
        // Nothing listens to a read-only map
        self.map.drain_events();
        result
    }

    pub fn position(&self) -> Coordinate {
        self.position
    }

    pub fn popup(&self) -> Option<&str> {
        self.popup.as_deref()
    }

    pub fn set_engine(&mut self, kind: EngineKind) -> Result<(), EngineError> {
        self.map.set_engine(kind)
    }

    pub fn set_source(&mut self, source: MapSourceConfig) -> Result<(), EngineError> {
        self.map.set_source(source)
    }

    pub fn status(&self) -> &MapStatus {
        self.map.status()
    }

    pub fn base(&self) -> &BaseMap {
        &self.map
    }

    pub fn unmount(&mut self) {
        self.map.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::LatLng;
    use crate::engine::HeadlessSdk;
    use std::sync::Arc;

    fn display_map(sdk: &Arc<HeadlessSdk>) -> DisplayMap {
        let mut map = DisplayMap::new(
            EngineFactory::new(sdk.clone()),
            "display",
            EngineKind::VectorStyle,
            MapSourceConfig::Default,
            MapView::new(LatLng::new(0.0, 0.0), 13.0),
        );
        map.mount().unwrap();
        map
    }

    #[test]
    fn test_set_position_moves_without_reinit() {
        let sdk = Arc::new(HeadlessSdk::new());
        let mut map = display_map(&sdk);

        map.set_position(Coordinate::new(1.0, 2.0), Some("First".to_string()))
            .unwrap();
        map.set_position(Coordinate::new(3.0, 4.0), Some("Second".to_string()))
            .unwrap();

        let snapshot = sdk.snapshot("display").unwrap();
        assert_eq!(snapshot.center, LatLng::new(3.0, 4.0));
        assert_eq!(snapshot.markers.len(), 1);
        assert_eq!(snapshot.markers[0].popup.as_deref(), Some("Second"));
        assert!(!snapshot.interactive);
        assert_eq!(sdk.stats().maps_created, 1);
    }

    #[test]
    fn test_unset_clears_marker() {
        let sdk = Arc::new(HeadlessSdk::new());
        let mut map = display_map(&sdk);
        map.set_position(Coordinate::new(1.0, 2.0), None).unwrap();

        map.set_position(Coordinate::UNSET, None).unwrap();
        assert!(sdk.snapshot("display").unwrap().markers.is_empty());
    }

    #[test]
    fn test_source_change_reinitializes_with_marker() {
        let sdk = Arc::new(HeadlessSdk::new());
        let mut map = display_map(&sdk);
        map.set_position(Coordinate::new(1.0, 2.0), None).unwrap();

        map.set_source(MapSourceConfig::VectorStyle {
            style_url: "https://example.org/style.json".to_string(),
        })
        .unwrap();

        assert_eq!(sdk.stats().maps_created, 2);
        let snapshot = sdk.snapshot("display").unwrap();
        assert_eq!(snapshot.markers.len(), 1);
        assert_eq!(snapshot.center, LatLng::new(1.0, 2.0));
    }

    #[test]
    fn test_drag_not_possible() {
        let sdk = Arc::new(HeadlessSdk::new());
        let mut map = display_map(&sdk);
        map.set_position(Coordinate::new(1.0, 2.0), None).unwrap();

        assert!(!sdk.drag_marker("display", LatLng::new(5.0, 5.0)));
        assert!(!sdk.pan_to("display", LatLng::new(5.0, 5.0)));
    }
}
