//! Demo application wiring.
//!
//! One [`InputMap`] feeds the [`Coordinator`]; the coordinate and its
//! address are rendered on one [`DisplayMap`] per engine.

use tracing::{debug, warn};

use crate::config::ConfigFile;
use crate::coord::{Coordinate, LatLng};
use crate::engine::{EngineError, EngineFactory, EngineKind, MapView};
use crate::geocode::{GeocodingService, ReverseGeocoder};
use crate::map::{DisplayMap, InputMap, InputMode, MapStyle};

use crate::coordinator::{Coordinator, CoordinatorState};

/// Container of the input map.
pub const INPUT_CONTAINER: &str = "input-map";

/// Container of the display map for an engine.
pub fn display_container(kind: EngineKind) -> String {
    format!("display-{}", kind.id())
}

/// Startup settings for [`DemoApp`].
#[derive(Debug, Clone, PartialEq)]
pub struct DemoOptions {
    pub input_engine: EngineKind,
    pub input_mode: InputMode,
    pub style: MapStyle,
    pub view: MapView,
    /// Cloud map id for the hosted engine
    pub map_id: Option<String>,
}

impl DemoOptions {
    pub fn from_config(config: &ConfigFile) -> Self {
        Self {
            input_engine: config.map.engine,
            input_mode: InputMode::Click,
            style: config.map.style,
            view: MapView::new(
                LatLng::new(config.map.default_lat, config.map.default_lng),
                config.map.zoom,
            ),
            map_id: config.google.map_id.clone(),
        }
    }
}

impl Default for DemoOptions {
    fn default() -> Self {
        Self::from_config(&ConfigFile::default())
    }
}

/// A map failure reported by [`DemoApp::mount`] or a style switch.
#[derive(Debug, Clone, PartialEq)]
pub struct MapFailure {
    pub container: String,
    pub error: EngineError,
}

pub struct DemoApp<G> {
    input: InputMap,
    displays: Vec<DisplayMap>,
    coordinator: Coordinator<G>,
    style: MapStyle,
    map_id: Option<String>,
}

impl<G: ReverseGeocoder + 'static> DemoApp<G> {
    pub fn new(factory: EngineFactory, coordinator: Coordinator<G>, options: DemoOptions) -> Self {
        let map_id = options.map_id.as_deref();
        let input = InputMap::new(
            factory.clone(),
            INPUT_CONTAINER,
            options.input_engine,
            options.style.source_for(options.input_engine, map_id),
            options.view,
            options.input_mode,
        );
        let displays = EngineKind::ALL
            .iter()
            .map(|&kind| {
                DisplayMap::new(
                    factory.clone(),
                    display_container(kind),
                    kind,
                    options.style.source_for(kind, map_id),
                    options.view,
                )
            })
            .collect();

        Self {
            input,
            displays,
            coordinator,
            style: options.style,
            map_id: options.map_id,
        }
    }

    /// Mounts every map. Maps that fail stay in place and are reported.
    pub fn mount(&mut self) -> Vec<MapFailure> {
        let mut failures = Vec::new();
        if let Err(error) = self.input.mount() {
            failures.push(MapFailure {
                container: INPUT_CONTAINER.to_string(),
                error,
            });
        }
        for display in &mut self.displays {
            if let Err(error) = display.mount() {
                failures.push(MapFailure {
                    container: display.base().container().to_string(),
                    error,
                });
            }
        }
        for failure in &failures {
            warn!(container = %failure.container, error = %failure.error, "Map failed to mount");
        }
        failures
    }

    /// Moves pending interaction into the coordinator and pushes the current
    /// coordinate and address onto every display map.
    ///
    /// Returns the state that was rendered.
    pub fn pump(&mut self) -> CoordinatorState {
        if let Some(value) = self.input.poll() {
            debug!(value = %value, "Input map produced a coordinate");
            self.coordinator.set_coordinate(value);
        }

        let state = self.coordinator.snapshot();
        if let Err(e) = self.input.set_value(state.coordinate) {
            warn!(error = %e, "Failed to bind coordinate to input map");
        }

        let popup = popup_text(&state);
        for map in &mut self.displays {
            if let Err(e) = map.set_position(state.coordinate, popup.clone()) {
                warn!(container = map.base().container(), error = %e, "Failed to update display map");
            }
        }
        state
    }

    /// Sets the coordinate as if it came from outside the input map.
    pub fn set_coordinate(&mut self, coordinate: Coordinate) -> CoordinatorState {
        self.coordinator.set_coordinate(coordinate.with_precision());
        self.pump()
    }

    pub fn select_service(&self, service: GeocodingService) {
        self.coordinator.select_service(service);
    }

    /// Applies a style preset to every map.
    ///
    /// Only maps whose source value changes are reinitialized.
    pub fn select_style(&mut self, style: MapStyle) -> Vec<MapFailure> {
        if style == self.style {
            return Vec::new();
        }
        debug!(style = %style, "Switching map style");
        self.style = style;

        let map_id = self.map_id.as_deref();
        let mut failures = Vec::new();
        let input_source = style.source_for(self.input.base().kind(), map_id);
        if let Err(error) = self.input.set_source(input_source) {
            failures.push(MapFailure {
                container: INPUT_CONTAINER.to_string(),
                error,
            });
        }
        for display in &mut self.displays {
            let source = style.source_for(display.base().kind(), map_id);
            if let Err(error) = display.set_source(source) {
                failures.push(MapFailure {
                    container: display.base().container().to_string(),
                    error,
                });
            }
        }
        failures
    }

    /// Switches the input map to another engine, keeping the current style.
    pub fn set_input_engine(&mut self, kind: EngineKind) -> Result<(), EngineError> {
        let source = self.style.source_for(kind, self.map_id.as_deref());
        self.input.reconfigure(kind, source)
    }

    pub fn input(&self) -> &InputMap {
        &self.input
    }

    pub fn displays(&self) -> &[DisplayMap] {
        &self.displays
    }

    pub fn coordinator(&self) -> &Coordinator<G> {
        &self.coordinator
    }

    pub fn style(&self) -> MapStyle {
        self.style
    }

    pub fn unmount(&mut self) {
        self.input.unmount();
        for display in &mut self.displays {
            display.unmount();
        }
    }
}

/// Popup text for display markers: the address summary once resolved,
/// otherwise whatever fallback text is showing.
fn popup_text(state: &CoordinatorState) -> Option<String> {
    state
        .result
        .as_ref()
        .map(|result| result.summary())
        .or_else(|| state.address.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinator::DEFAULT_DEBOUNCE;
    use crate::engine::HeadlessSdk;
    use crate::geocode::{GeocoderConfig, GeocoderFactory, MockAsyncHttpClient};
    use crate::map::MapStatus;
    use std::sync::Arc;
    use std::time::Duration;

    const BODY: &str = r#"{
        "display_name": "Eiffel Tower, 5, Avenue Anatole France, Paris, France",
        "address": {"house_number": "5", "road": "Avenue Anatole France", "city": "Paris", "country": "France"}
    }"#;

    type TestApp = DemoApp<crate::geocode::Geocoder<MockAsyncHttpClient>>;

    fn app(sdk: &Arc<HeadlessSdk>, hosted_key: Option<&str>) -> TestApp {
        let geocoders = GeocoderFactory::new(MockAsyncHttpClient::ok(BODY))
            .build_set(&[GeocoderConfig::nominatim(), GeocoderConfig::google(None)]);
        let coordinator = Coordinator::new(geocoders, GeocodingService::Nominatim, DEFAULT_DEBOUNCE);
        let factory = EngineFactory::new(sdk.clone())
            .with_hosted_api_key(hosted_key.map(str::to_string));
        DemoApp::new(factory, coordinator, DemoOptions::default())
    }

    #[test]
    fn test_mount_reports_hosted_without_key() {
        let sdk = Arc::new(HeadlessSdk::new());
        let mut app = app(&sdk, None);

        let failures = app.mount();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].container, display_container(EngineKind::Hosted));
        assert_eq!(sdk.total_live_maps(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_click_flows_to_every_display() {
        let sdk = Arc::new(HeadlessSdk::new());
        let mut app = app(&sdk, Some("k-123"));
        assert!(app.mount().is_empty());

        sdk.click(INPUT_CONTAINER, LatLng::new(48.858370, 2.294481));
        let state = app.pump();
        assert_eq!(state.coordinate, Coordinate::new(48.85837, 2.294481));

        tokio::time::sleep(DEFAULT_DEBOUNCE + Duration::from_millis(10)).await;
        let state = app.pump();
        assert_eq!(
            state.address.as_deref(),
            Some("Eiffel Tower, 5, Avenue Anatole France, Paris, France")
        );

        for kind in EngineKind::ALL {
            let snapshot = sdk.snapshot(&display_container(kind)).unwrap();
            assert_eq!(snapshot.center, LatLng::new(48.85837, 2.294481));
            assert_eq!(
                snapshot.markers[0].popup.as_deref(),
                Some("5 Avenue Anatole France, Paris, France")
            );
        }
    }

    #[test]
    fn test_style_switch_only_reinitializes_changed_sources() {
        let sdk = Arc::new(HeadlessSdk::new());
        let mut app = app(&sdk, Some("k-123"));
        app.mount();
        let created = sdk.stats().maps_created;

        // Hosted stays on roadmap for the light style
        assert!(app.select_style(MapStyle::Light).is_empty());
        assert_eq!(sdk.stats().maps_created, created + 4);
        assert_eq!(sdk.stats().maps_removed, 4);

        assert!(app.select_style(MapStyle::Light).is_empty());
        assert_eq!(sdk.stats().maps_created, created + 4);
    }

    #[test]
    fn test_unmount_tears_down_everything() {
        let sdk = Arc::new(HeadlessSdk::new());
        let mut app = app(&sdk, None);
        app.mount();

        app.unmount();
        assert_eq!(sdk.total_live_maps(), 0);
        assert_eq!(sdk.stats().cleared(&display_container(EngineKind::Hosted)), 1);
        for display in app.displays() {
            assert_eq!(display.status(), &MapStatus::Destroyed);
        }
    }
}
