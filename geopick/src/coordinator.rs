//! Root coordinator: coordinate state and debounced reverse geocoding.
//!
//! Each coordinate change cancels the pending debounce and bumps a request
//! token. A lookup task only writes state while it still holds the current
//! token; dispatched requests are never aborted, their late responses are
//! dropped instead.
//!
//! ```text
//! Idle -> DebounceWaiting -> InFlight -> Resolved | Failed
//! ```
//!
//! All methods that schedule work must be called inside a tokio runtime.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use crate::config::DEFAULT_DEBOUNCE_MS;
use crate::coord::{Coordinate, LatLng};
use crate::geocode::{GeocodeResult, GeocoderSet, GeocodingService, ReverseGeocoder};

/// Address text shown when the service found nothing.
pub const NO_ADDRESS_TEXT: &str = "Unable to determine address";

/// Address text shown when the selected service cannot be used.
pub const LOOKUP_ERROR_TEXT: &str = "Error retrieving address";

/// Default debounce window.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(DEFAULT_DEBOUNCE_MS);

/// Where the current lookup stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LookupPhase {
    #[default]
    Idle,
    DebounceWaiting,
    InFlight,
    Resolved,
    Failed,
}

/// Everything the UI renders.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CoordinatorState {
    pub coordinate: Coordinate,
    pub service: GeocodingService,
    pub is_loading_address: bool,
    /// Address line or one of the fallback texts
    pub address: Option<String>,
    /// Configuration problem behind [`LOOKUP_ERROR_TEXT`]
    pub error_text: Option<String>,
    pub result: Option<GeocodeResult>,
    pub phase: LookupPhase,
}

struct Inner {
    state: CoordinatorState,
    token: u64,
    pending: Option<CancellationToken>,
}

struct Shared<G> {
    geocoders: GeocoderSet<G>,
    debounce: Duration,
    inner: Mutex<Inner>,
    updates: watch::Sender<CoordinatorState>,
}

impl<G> Shared<G> {
    fn publish(&self, state: &CoordinatorState) {
        self.updates.send_replace(state.clone());
    }
}

/// Owns the picked coordinate and its address.
pub struct Coordinator<G> {
    shared: Arc<Shared<G>>,
}

impl<G> Clone for Coordinator<G> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<G: ReverseGeocoder + 'static> Coordinator<G> {
    pub fn new(geocoders: GeocoderSet<G>, service: GeocodingService, debounce: Duration) -> Self {
        let state = CoordinatorState {
            service,
            ..CoordinatorState::default()
        };
        let (updates, _) = watch::channel(state.clone());
        Self {
            shared: Arc::new(Shared {
                geocoders,
                debounce,
                inner: Mutex::new(Inner {
                    state,
                    token: 0,
                    pending: None,
                }),
                updates,
            }),
        }
    }

    /// Sets the coordinate and schedules a lookup after the debounce window.
    ///
    /// Setting the current value again does nothing. An unset coordinate
    /// clears the address state.
    pub fn set_coordinate(&self, coordinate: Coordinate) {
        let mut inner = self.shared.inner.lock();
        if inner.state.coordinate == coordinate {
            return;
        }
        inner.state.coordinate = coordinate;
        let token = supersede(&mut inner);

        match coordinate.as_lat_lng() {
            Some(point) => {
                trace!(token, coordinate = %coordinate, "Scheduling reverse geocode");
                let cancel = CancellationToken::new();
                inner.pending = Some(cancel.clone());
                inner.state.phase = LookupPhase::DebounceWaiting;
                self.shared.publish(&inner.state);
                drop(inner);
                self.spawn_debounced(token, point, cancel);
            }
            None => {
                let state = &mut inner.state;
                state.address = None;
                state.error_text = None;
                state.result = None;
                state.is_loading_address = false;
                state.phase = LookupPhase::Idle;
                self.shared.publish(&inner.state);
            }
        }
    }

    /// Selects the geocoding service.
    ///
    /// With a valid coordinate this starts a fresh lookup right away.
    pub fn select_service(&self, service: GeocodingService) {
        let mut inner = self.shared.inner.lock();
        if inner.state.service == service {
            return;
        }
        debug!(service = %service, "Geocoding service selected");
        inner.state.service = service;

        match inner.state.coordinate.as_lat_lng() {
            Some(point) => {
                let token = supersede(&mut inner);
                self.shared.publish(&inner.state);
                drop(inner);
                let shared = Arc::clone(&self.shared);
                tokio::spawn(async move { lookup(shared, token, point).await });
            }
            None => self.shared.publish(&inner.state),
        }
    }

    pub fn snapshot(&self) -> CoordinatorState {
        self.shared.inner.lock().state.clone()
    }

    /// Receiver that sees every published state.
    pub fn subscribe(&self) -> watch::Receiver<CoordinatorState> {
        self.shared.updates.subscribe()
    }

    /// Services that can be selected, in display order.
    pub fn available_services(&self) -> Vec<GeocodingService> {
        self.shared.geocoders.available_services()
    }

    pub fn debounce(&self) -> Duration {
        self.shared.debounce
    }

    fn spawn_debounced(&self, token: u64, point: LatLng, cancel: CancellationToken) {
        let shared = Arc::clone(&self.shared);
        let debounce = shared.debounce;
        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {
                    trace!(token, "Debounce cancelled");
                }
                _ = tokio::time::sleep(debounce) => {
                    lookup(shared, token, point).await;
                }
            }
        });
    }
}

/// Cancels the pending debounce and returns the new request token.
///
/// A lookup still in flight loses its right to write state, so it no
/// longer counts as loading.
fn supersede(inner: &mut Inner) -> u64 {
    if let Some(pending) = inner.pending.take() {
        pending.cancel();
    }
    if inner.state.phase == LookupPhase::InFlight {
        inner.state.phase = LookupPhase::Idle;
    }
    inner.state.is_loading_address = false;
    inner.token += 1;
    inner.token
}

/// Runs one lookup for `token`, writing state only while it is current.
async fn lookup<G: ReverseGeocoder>(shared: Arc<Shared<G>>, token: u64, point: LatLng) {
    let (geocoder, service) = {
        let mut inner = shared.inner.lock();
        if inner.token != token {
            trace!(token, current = inner.token, "Lookup superseded before dispatch");
            return;
        }
        inner.pending = None;
        let service = inner.state.service;

        match shared.geocoders.get(service) {
            Ok(geocoder) => {
                inner.state.phase = LookupPhase::InFlight;
                inner.state.is_loading_address = true;
                shared.publish(&inner.state);
                (geocoder, service)
            }
            Err(reason) => {
                warn!(service = %service, reason = %reason, "Geocoding service unavailable");
                let state = &mut inner.state;
                state.address = Some(LOOKUP_ERROR_TEXT.to_string());
                state.error_text = Some(reason);
                state.result = None;
                state.is_loading_address = false;
                state.phase = LookupPhase::Failed;
                shared.publish(&inner.state);
                return;
            }
        }
    };

    debug!(token, service = %service, lat = point.lat, lng = point.lng, "Reverse geocoding");
    let result = geocoder.reverse_geocode(point.lat, point.lng).await;

    let mut inner = shared.inner.lock();
    if inner.token != token {
        debug!(token, current = inner.token, service = %service, "Dropping stale geocode response");
        return;
    }

    let state = &mut inner.state;
    state.is_loading_address = false;
    state.error_text = None;
    match result {
        Some(result) => {
            state.address = Some(result.display_name.clone());
            state.result = Some(result);
            state.phase = LookupPhase::Resolved;
        }
        None => {
            state.address = Some(NO_ADDRESS_TEXT.to_string());
            state.result = None;
            state.phase = LookupPhase::Failed;
        }
    }
    shared.publish(&inner.state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geocode::{GeocoderConfig, GeocoderFactory, MockAsyncHttpClient};

    const NOMINATIM_BODY: &str = r#"{
        "display_name": "10 Downing Street, Westminster, London, SW1A 2AA, United Kingdom",
        "address": {"house_number": "10", "road": "Downing Street", "city": "London", "country": "United Kingdom"}
    }"#;

    fn coordinator(client: MockAsyncHttpClient) -> Coordinator<crate::geocode::Geocoder<MockAsyncHttpClient>> {
        let factory = GeocoderFactory::new(client);
        let set = factory.build_set(&[GeocoderConfig::nominatim(), GeocoderConfig::google(None)]);
        Coordinator::new(set, GeocodingService::Nominatim, DEFAULT_DEBOUNCE)
    }

    #[tokio::test(start_paused = true)]
    async fn test_lookup_resolves_after_debounce() {
        let client = MockAsyncHttpClient::ok(NOMINATIM_BODY);
        let coordinator = coordinator(client.clone());

        coordinator.set_coordinate(Coordinate::new(51.503396, -0.12764));
        assert_eq!(coordinator.snapshot().phase, LookupPhase::DebounceWaiting);

        tokio::time::sleep(Duration::from_millis(999)).await;
        assert!(client.recorded().is_empty());

        tokio::time::sleep(Duration::from_millis(10)).await;
        let state = coordinator.snapshot();
        assert_eq!(state.phase, LookupPhase::Resolved);
        assert!(!state.is_loading_address);
        assert_eq!(
            state.address.as_deref(),
            Some("10 Downing Street, Westminster, London, SW1A 2AA, United Kingdom")
        );
        assert_eq!(
            state.result.unwrap().summary(),
            "10 Downing Street, London, United Kingdom"
        );
        assert_eq!(client.recorded().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transport_failure_shows_fallback() {
        let client = MockAsyncHttpClient::failing("connection refused");
        let coordinator = coordinator(client);

        coordinator.set_coordinate(Coordinate::new(1.0, 2.0));
        tokio::time::sleep(Duration::from_millis(1100)).await;

        let state = coordinator.snapshot();
        assert_eq!(state.phase, LookupPhase::Failed);
        assert_eq!(state.address.as_deref(), Some(NO_ADDRESS_TEXT));
        assert!(state.error_text.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_unavailable_service_reports_configuration_error() {
        let client = MockAsyncHttpClient::ok(NOMINATIM_BODY);
        let coordinator = coordinator(client.clone());
        coordinator.set_coordinate(Coordinate::new(1.0, 2.0));
        tokio::time::sleep(Duration::from_millis(1100)).await;

        coordinator.select_service(GeocodingService::Google);
        tokio::time::sleep(Duration::from_millis(1)).await;

        let state = coordinator.snapshot();
        assert_eq!(state.service, GeocodingService::Google);
        assert_eq!(state.address.as_deref(), Some(LOOKUP_ERROR_TEXT));
        assert!(state.error_text.unwrap().contains("GOOGLE_MAPS_API_KEY"));
        assert_eq!(client.recorded().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unset_clears_address() {
        let client = MockAsyncHttpClient::ok(NOMINATIM_BODY);
        let coordinator = coordinator(client.clone());
        coordinator.set_coordinate(Coordinate::new(1.0, 2.0));
        tokio::time::sleep(Duration::from_millis(1100)).await;
        assert!(coordinator.snapshot().address.is_some());

        coordinator.set_coordinate(Coordinate::UNSET);
        let state = coordinator.snapshot();
        assert_eq!(state.phase, LookupPhase::Idle);
        assert!(state.address.is_none());
        assert!(state.result.is_none());

        tokio::time::sleep(Duration::from_millis(2000)).await;
        assert_eq!(client.recorded().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_same_coordinate_is_ignored() {
        let client = MockAsyncHttpClient::ok(NOMINATIM_BODY);
        let coordinator = coordinator(client.clone());
        coordinator.set_coordinate(Coordinate::new(1.0, 2.0));
        tokio::time::sleep(Duration::from_millis(600)).await;

        // Would restart the debounce if it were treated as a change
        coordinator.set_coordinate(Coordinate::new(1.0, 2.0));
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(client.recorded().len(), 1);
    }

    #[tokio::test]
    async fn test_subscribe_sees_updates() {
        let coordinator = coordinator(MockAsyncHttpClient::ok(NOMINATIM_BODY));
        let mut updates = coordinator.subscribe();

        coordinator.set_coordinate(Coordinate::new(1.0, 2.0));
        updates.changed().await.unwrap();
        assert_eq!(updates.borrow().coordinate, Coordinate::new(1.0, 2.0));
    }

    #[test]
    fn test_service_switch_without_coordinate_needs_no_runtime() {
        let coordinator = coordinator(MockAsyncHttpClient::ok(NOMINATIM_BODY));
        coordinator.select_service(GeocodingService::Google);
        assert_eq!(coordinator.snapshot().service, GeocodingService::Google);
        assert_eq!(coordinator.snapshot().phase, LookupPhase::Idle);
    }
}
