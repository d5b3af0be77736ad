//! Integration tests for debounced, token-guarded reverse geocoding.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::Instant;

use geopick::coord::Coordinate;
use geopick::coordinator::{Coordinator, LookupPhase, LOOKUP_ERROR_TEXT, NO_ADDRESS_TEXT};
use geopick::geocode::{GeocodeResult, GeocoderSet, GeocodingService, ReverseGeocoder};

/// One call seen by [`FakeGeocoder`].
#[derive(Debug, Clone, PartialEq)]
struct Call {
    service: GeocodingService,
    lat: f64,
    lng: f64,
    at: Instant,
}

/// Geocoder that answers after a fixed latency with a name derived from
/// the service and coordinate.
struct FakeGeocoder {
    service: GeocodingService,
    latency: Duration,
    answers: bool,
    calls: Arc<Mutex<Vec<Call>>>,
}

impl ReverseGeocoder for FakeGeocoder {
    fn reverse_geocode(
        &self,
        lat: f64,
        lng: f64,
    ) -> impl Future<Output = Option<GeocodeResult>> + Send {
        let service = self.service;
        let latency = self.latency;
        let answers = self.answers;
        let calls = Arc::clone(&self.calls);
        async move {
            calls.lock().push(Call {
                service,
                lat,
                lng,
                at: Instant::now(),
            });
            tokio::time::sleep(latency).await;
            answers.then(|| GeocodeResult {
                display_name: format!("{} @ {:.3},{:.3}", service.id(), lat, lng),
                address: None,
            })
        }
    }

    fn service(&self) -> GeocodingService {
        self.service
    }
}

struct Harness {
    coordinator: Coordinator<FakeGeocoder>,
    calls: Arc<Mutex<Vec<Call>>>,
}

fn harness(nominatim_latency: Duration, google_latency: Duration) -> Harness {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let set = GeocoderSet::new()
        .with_geocoder(
            GeocodingService::Nominatim,
            FakeGeocoder {
                service: GeocodingService::Nominatim,
                latency: nominatim_latency,
                answers: true,
                calls: Arc::clone(&calls),
            },
        )
        .with_geocoder(
            GeocodingService::Google,
            FakeGeocoder {
                service: GeocodingService::Google,
                latency: google_latency,
                answers: true,
                calls: Arc::clone(&calls),
            },
        );
    Harness {
        coordinator: Coordinator::new(set, GeocodingService::Nominatim, Duration::from_millis(1000)),
        calls,
    }
}

#[tokio::test(start_paused = true)]
async fn test_burst_of_updates_yields_one_lookup_with_last_value() {
    let h = harness(Duration::ZERO, Duration::ZERO);
    let start = Instant::now();

    h.coordinator.set_coordinate(Coordinate::new(10.0, 10.0));
    tokio::time::sleep(Duration::from_millis(200)).await;
    h.coordinator.set_coordinate(Coordinate::new(20.0, 20.0));
    tokio::time::sleep(Duration::from_millis(200)).await;
    h.coordinator.set_coordinate(Coordinate::new(30.0, 30.0));

    tokio::time::sleep(Duration::from_millis(990)).await;
    assert!(h.calls.lock().is_empty(), "lookup fired before the quiet period");

    tokio::time::sleep(Duration::from_millis(50)).await;
    let calls = h.calls.lock().clone();
    assert_eq!(calls.len(), 1);
    assert_eq!((calls[0].lat, calls[0].lng), (30.0, 30.0));
    assert!(calls[0].at - start >= Duration::from_millis(1400));

    let state = h.coordinator.snapshot();
    assert_eq!(state.phase, LookupPhase::Resolved);
    assert_eq!(state.address.as_deref(), Some("nominatim @ 30.000,30.000"));
}

#[tokio::test(start_paused = true)]
async fn test_loading_flag_tracks_in_flight_lookup() {
    let h = harness(Duration::from_millis(300), Duration::ZERO);

    h.coordinator.set_coordinate(Coordinate::new(1.0, 1.0));
    assert!(!h.coordinator.snapshot().is_loading_address);

    tokio::time::sleep(Duration::from_millis(1100)).await;
    let state = h.coordinator.snapshot();
    assert_eq!(state.phase, LookupPhase::InFlight);
    assert!(state.is_loading_address);

    tokio::time::sleep(Duration::from_millis(300)).await;
    let state = h.coordinator.snapshot();
    assert_eq!(state.phase, LookupPhase::Resolved);
    assert!(!state.is_loading_address);
}

#[tokio::test(start_paused = true)]
async fn test_service_switch_supersedes_in_flight_lookup() {
    let h = harness(Duration::from_millis(800), Duration::from_millis(100));

    h.coordinator.set_coordinate(Coordinate::new(5.0, 6.0));
    tokio::time::sleep(Duration::from_millis(1050)).await;
    assert_eq!(h.calls.lock().len(), 1, "nominatim lookup should be in flight");

    h.coordinator.select_service(GeocodingService::Google);
    tokio::time::sleep(Duration::from_millis(200)).await;

    let calls = h.calls.lock().clone();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[1].service, GeocodingService::Google);
    assert_eq!(
        h.coordinator.snapshot().address.as_deref(),
        Some("google @ 5.000,6.000")
    );

    // The nominatim response lands now and must be dropped
    tokio::time::sleep(Duration::from_millis(1000)).await;
    let state = h.coordinator.snapshot();
    assert_eq!(state.service, GeocodingService::Google);
    assert_eq!(state.address.as_deref(), Some("google @ 5.000,6.000"));
    assert_eq!(h.calls.lock().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_new_coordinate_drops_older_response() {
    let h = harness(Duration::from_millis(1500), Duration::ZERO);

    h.coordinator.set_coordinate(Coordinate::new(1.0, 1.0));
    tokio::time::sleep(Duration::from_millis(1100)).await;
    h.coordinator.set_coordinate(Coordinate::new(2.0, 2.0));

    // First response arrives at ~2500ms, second at ~3600ms
    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert_ne!(
        h.coordinator.snapshot().address.as_deref(),
        Some("nominatim @ 1.000,1.000")
    );

    tokio::time::sleep(Duration::from_millis(1200)).await;
    assert_eq!(
        h.coordinator.snapshot().address.as_deref(),
        Some("nominatim @ 2.000,2.000")
    );
}

#[tokio::test(start_paused = true)]
async fn test_new_coordinate_clears_loading_during_debounce() {
    let h = harness(Duration::from_millis(1500), Duration::ZERO);

    h.coordinator.set_coordinate(Coordinate::new(1.0, 1.0));
    tokio::time::sleep(Duration::from_millis(1100)).await;
    assert!(h.coordinator.snapshot().is_loading_address);

    h.coordinator.set_coordinate(Coordinate::new(2.0, 2.0));
    let state = h.coordinator.snapshot();
    assert_eq!(state.phase, LookupPhase::DebounceWaiting);
    assert!(!state.is_loading_address);

    tokio::time::sleep(Duration::from_millis(900)).await;
    let state = h.coordinator.snapshot();
    assert_eq!(state.phase, LookupPhase::DebounceWaiting);
    assert!(!state.is_loading_address);

    // Second lookup dispatched at ~2100ms; the stale one lands at ~2500ms
    tokio::time::sleep(Duration::from_millis(550)).await;
    let state = h.coordinator.snapshot();
    assert_eq!(state.phase, LookupPhase::InFlight);
    assert!(state.is_loading_address);
    assert_eq!(state.address, None);
}

#[tokio::test(start_paused = true)]
async fn test_unavailable_and_empty_results() {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let set = GeocoderSet::new()
        .with_geocoder(
            GeocodingService::Nominatim,
            FakeGeocoder {
                service: GeocodingService::Nominatim,
                latency: Duration::ZERO,
                answers: false,
                calls: Arc::clone(&calls),
            },
        )
        .with_unavailable(GeocodingService::Google, "Google Maps API key is not configured");
    let coordinator = Coordinator::new(set, GeocodingService::Nominatim, Duration::from_millis(1000));

    coordinator.set_coordinate(Coordinate::new(0.0, 0.0));
    tokio::time::sleep(Duration::from_millis(1100)).await;
    assert_eq!(coordinator.snapshot().address.as_deref(), Some(NO_ADDRESS_TEXT));

    coordinator.select_service(GeocodingService::Google);
    tokio::time::sleep(Duration::from_millis(10)).await;
    let state = coordinator.snapshot();
    assert_eq!(state.address.as_deref(), Some(LOOKUP_ERROR_TEXT));
    assert_eq!(
        state.error_text.as_deref(),
        Some("Google Maps API key is not configured")
    );
    assert_eq!(state.phase, LookupPhase::Failed);
    assert_eq!(calls.lock().len(), 1);
}
