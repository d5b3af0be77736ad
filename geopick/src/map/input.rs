//! Input map: the map the user picks a coordinate on.

use std::fmt;
use std::str::FromStr;

use tracing::trace;

use crate::coord::{Coordinate, LatLng};
use crate::engine::{
    EngineError, EngineFactory, EngineKind, EngineOptions, MapEvent, MapSourceConfig, MapView,
    MarkerSpec,
};

use super::base::{BaseMap, MapStatus};

/// How the user picks a coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Click places the marker
    #[default]
    Click,
    /// Map center under a crosshair is the value
    Center,
    /// Drag a marker
    Drag,
}

impl InputMode {
    fn engine_options(self) -> EngineOptions {
        EngineOptions {
            report_clicks: self == InputMode::Click,
            draggable_marker: self == InputMode::Drag,
            interactive: true,
        }
    }
}

impl fmt::Display for InputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            InputMode::Click => "click",
            InputMode::Center => "center",
            InputMode::Drag => "drag",
        })
    }
}

impl FromStr for InputMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "click" => Ok(InputMode::Click),
            "center" => Ok(InputMode::Center),
            "drag" => Ok(InputMode::Drag),
            other => Err(format!(
                "unknown input mode '{}' (expected click, center or drag)",
                other
            )),
        }
    }
}

/// Map with a two-way bound [`Coordinate`].
///
/// Values produced by interaction are limited to 6 decimal digits. An
/// external value only recenters the map when it differs from the last
/// value this map applied, so echoing the map's own output back is free.
pub struct InputMap {
    map: BaseMap,
    mode: InputMode,
    value: Coordinate,
    last_applied: Option<Coordinate>,
}

impl InputMap {
    pub fn new(
        factory: EngineFactory,
        container: impl Into<String>,
        kind: EngineKind,
        source: MapSourceConfig,
        view: MapView,
        mode: InputMode,
    ) -> Self {
        Self {
            map: BaseMap::new(factory, container, kind, source, view, mode.engine_options()),
            mode,
            value: Coordinate::UNSET,
            last_applied: None,
        }
    }

    pub fn mount(&mut self) -> Result<(), EngineError> {
        self.map.mount()?;
        self.render()
    }

    /// Binds an external value.
    pub fn set_value(&mut self, value: Coordinate) -> Result<(), EngineError> {
        let value = value.with_precision();
        if value == self.value {
            return Ok(());
        }
        self.value = value;

        if self.last_applied != Some(value) {
            if let Some(point) = value.as_lat_lng() {
                trace!(container = self.map.container(), value = %value, "Recentering on external value");
                self.map.set_center(point)?;
            }
            self.last_applied = Some(value);
        }
        self.render()
    }

    /// Consumes pending map events.
    ///
    /// Returns the new value when an interaction changed it.
    pub fn poll(&mut self) -> Option<Coordinate> {
        let mut picked: Option<LatLng> = None;
        for event in self.map.drain_events() {
            match (self.mode, event) {
                (InputMode::Click, MapEvent::Click(point))
                | (InputMode::Center, MapEvent::CenterChanged(point))
                | (InputMode::Drag, MapEvent::MarkerDragged(point)) => picked = Some(point),
                _ => {}
            }
        }

        let value = Coordinate::from(picked?).with_precision();
        if value == self.value {
            return None;
        }
        self.value = value;
        self.last_applied = Some(value);
        if let Err(e) = self.render() {
            tracing::warn!(container = self.map.container(), error = %e, "Failed to render input marker");
        }
        Some(value)
    }

    pub fn value(&self) -> Coordinate {
        self.value
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    /// True when the map shows a crosshair instead of a marker.
    pub fn shows_crosshair(&self) -> bool {
        self.mode == InputMode::Center
    }

    pub fn set_engine(&mut self, kind: EngineKind) -> Result<(), EngineError> {
        self.map.set_engine(kind)
    }

    pub fn set_source(&mut self, source: MapSourceConfig) -> Result<(), EngineError> {
        self.map.set_source(source)
    }

    /// Switches engine and source with a single reinitialization.
    pub fn reconfigure(
        &mut self,
        kind: EngineKind,
        source: MapSourceConfig,
    ) -> Result<(), EngineError> {
        self.map.reconfigure(kind, source)?;
        self.render()
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

    fn render(&mut self) -> Result<(), EngineError> {
        let position = match self.mode {
            InputMode::Center => None,
            InputMode::Click => self.value.as_lat_lng(),
            InputMode::Drag => Some(
                self.value
                    .as_lat_lng()
                    .unwrap_or_else(|| self.map.view().center),
            ),
        };
        let markers = position
            .map(|point| vec![MarkerSpec::new(point.into())])
            .unwrap_or_default();
        self.map.set_markers(markers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::HeadlessSdk;
    use std::sync::Arc;

    fn input_map(sdk: &Arc<HeadlessSdk>, mode: InputMode) -> InputMap {
        let mut map = InputMap::new(
            EngineFactory::new(sdk.clone()),
            "input",
            EngineKind::Raster,
            MapSourceConfig::Default,
            MapView::new(LatLng::new(51.505, -0.09), 13.0),
            mode,
        );
        map.mount().unwrap();
        map
    }

    #[test]
    fn test_click_sets_truncated_value() {
        let sdk = Arc::new(HeadlessSdk::new());
        let mut map = input_map(&sdk, InputMode::Click);
        assert_eq!(map.poll(), None);

        sdk.click("input", LatLng::new(40.712776123, -74.005974987));

        let value = map.poll().unwrap();
        assert_eq!(value, Coordinate::new(40.712776, -74.005974));
        assert_eq!(map.value(), value);
        assert_eq!(
            sdk.snapshot("input").unwrap().markers[0].position,
            LatLng::new(40.712776, -74.005974)
        );
        assert_eq!(map.poll(), None);
    }

    #[test]
    fn test_round_trip_is_unchanged() {
        let sdk = Arc::new(HeadlessSdk::new());
        let mut map = input_map(&sdk, InputMode::Click);

        map.set_value(Coordinate::new(12.345678, 98.765432)).unwrap();
        assert_eq!(map.value(), Coordinate::new(12.345678, 98.765432));
    }

    #[test]
    fn test_echo_does_not_recenter() {
        let sdk = Arc::new(HeadlessSdk::new());
        let mut map = input_map(&sdk, InputMode::Click);

        sdk.click("input", LatLng::new(10.0, 20.0));
        let value = map.poll().unwrap();
        map.set_value(value).unwrap();

        // Clicking does not move the view, and the echo must not either
        assert_eq!(
            sdk.snapshot("input").unwrap().center,
            LatLng::new(51.505, -0.09)
        );
    }

    #[test]
    fn test_external_value_recenters() {
        let sdk = Arc::new(HeadlessSdk::new());
        let mut map = input_map(&sdk, InputMode::Click);

        map.set_value(Coordinate::new(35.6762, 139.6503)).unwrap();

        let snapshot = sdk.snapshot("input").unwrap();
        assert_eq!(snapshot.center, LatLng::new(35.6762, 139.6503));
        assert_eq!(snapshot.markers.len(), 1);
    }

    #[test]
    fn test_center_mode_follows_pan() {
        let sdk = Arc::new(HeadlessSdk::new());
        let mut map = input_map(&sdk, InputMode::Center);
        assert!(map.shows_crosshair());

        // Initial center becomes the value
        assert_eq!(map.poll(), Some(Coordinate::new(51.505, -0.09)));

        sdk.pan_to("input", LatLng::new(48.8566, 2.3522));
        assert_eq!(map.poll(), Some(Coordinate::new(48.8566, 2.3522)));
        assert!(sdk.snapshot("input").unwrap().markers.is_empty());
    }

    #[test]
    fn test_center_mode_ignores_own_recenter() {
        let sdk = Arc::new(HeadlessSdk::new());
        let mut map = input_map(&sdk, InputMode::Center);
        map.poll();

        map.set_value(Coordinate::new(1.5, 2.5)).unwrap();
        assert_eq!(map.poll(), None);
        assert_eq!(map.value(), Coordinate::new(1.5, 2.5));
    }

    #[test]
    fn test_drag_mode_moves_value() {
        let sdk = Arc::new(HeadlessSdk::new());
        let mut map = input_map(&sdk, InputMode::Drag);
        assert_eq!(sdk.snapshot("input").unwrap().markers.len(), 1);

        sdk.drag_marker("input", LatLng::new(-33.8688, 151.2093));
        assert_eq!(map.poll(), Some(Coordinate::new(-33.8688, 151.2093)));
    }

    #[test]
    fn test_clicks_ignored_outside_click_mode() {
        let sdk = Arc::new(HeadlessSdk::new());
        let mut map = input_map(&sdk, InputMode::Drag);

        sdk.click("input", LatLng::new(1.0, 1.0));
        assert_eq!(map.poll(), None);
        assert!(map.value().is_unset());
    }

    #[test]
    fn test_unset_clears_marker() {
        let sdk = Arc::new(HeadlessSdk::new());
        let mut map = input_map(&sdk, InputMode::Click);
        map.set_value(Coordinate::new(1.0, 1.0)).unwrap();

        map.set_value(Coordinate::UNSET).unwrap();
        assert!(sdk.snapshot("input").unwrap().markers.is_empty());
    }

    #[test]
    fn test_parse_mode() {
        assert_eq!("Center".parse::<InputMode>().unwrap(), InputMode::Center);
        assert!("hover".parse::<InputMode>().is_err());
    }
}
