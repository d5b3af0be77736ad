//! Full pipeline on the headless map SDK.
//!
//! Clicks the input map at the given coordinate, waits for the debounced
//! lookup to settle, and prints what every display map ended up showing.

use std::sync::Arc;

use clap::Args;
use geopick::app::{DemoApp, DemoOptions, INPUT_CONTAINER};
use geopick::config::ConfigFile;
use geopick::coordinator::{Coordinator, CoordinatorState, LookupPhase};
use geopick::engine::{BaseLayer, EngineFactory, HeadlessSdk};
use geopick::map::MapStatus;
use tokio::sync::watch;
use tracing::info;

use super::common::{geocoder_factory, parse_point, resolve_service, ServiceType, StyleType};
use crate::error::CliError;

/// Arguments for the demo command.
#[derive(Debug, Args)]
pub struct DemoArgs {
    /// Latitude to click, in decimal degrees
    #[arg(long, allow_hyphen_values = true)]
    pub lat: f64,

    /// Longitude to click, in decimal degrees
    #[arg(long, allow_hyphen_values = true)]
    pub lng: f64,

    /// Geocoding service (defaults to [geocoding] service from config)
    #[arg(long, value_enum)]
    pub service: Option<ServiceType>,

    /// Basemap style (defaults to [map] style from config)
    #[arg(long, value_enum)]
    pub style: Option<StyleType>,
}

/// Run the demo command.
pub async fn run(args: DemoArgs, config: &ConfigFile) -> Result<(), CliError> {
    let point = parse_point(args.lat, args.lng)?;

    let geocoders = geocoder_factory(config)?.build_set(&config.geocoder_configs());
    let coordinator = Coordinator::new(
        geocoders,
        resolve_service(args.service, config),
        config.debounce(),
    );

    let sdk = Arc::new(HeadlessSdk::new());
    let factory = EngineFactory::new(sdk.clone()).with_hosted_api_key(config.google_api_key());
    let mut options = DemoOptions::from_config(config);
    if let Some(style) = args.style {
        options.style = style.into();
    }

    let mut app = DemoApp::new(factory, coordinator.clone(), options);
    for failure in app.mount() {
        println!("! {} unavailable: {}", failure.container, failure.error);
    }
    if let MapStatus::Failed { error, .. } = app.input().status() {
        return Err(CliError::Map(error.clone()));
    }

    let mut updates = coordinator.subscribe();
    info!(point = %point, "Clicking input map");
    sdk.click(INPUT_CONTAINER, point);
    app.pump();

    println!(
        "Picked {} on the {} input map, waiting {:?} for the lookup...",
        app.coordinator().snapshot().coordinate,
        app.input().base().kind().name(),
        coordinator.debounce()
    );
    wait_for_lookup(&mut updates).await;

    let state = app.pump();
    println!();
    println!("Service:  {}", state.service.name());
    println!("Address:  {}", state.address.as_deref().unwrap_or("-"));
    if let Some(error) = &state.error_text {
        println!("Reason:   {}", error);
    }

    println!();
    println!("Input map ({}):", app.input().base().kind());
    print_map(&sdk, INPUT_CONTAINER);
    for display in app.displays() {
        println!();
        println!(
            "{} ({}):",
            display.base().container(),
            display.base().kind().name()
        );
        match display.status() {
            MapStatus::Failed { error, .. } => println!("  failed: {}", error),
            _ => print_map(&sdk, display.base().container()),
        }
    }

    app.unmount();
    Ok(())
}

/// Waits until the coordinator leaves the debounce and in-flight phases.
async fn wait_for_lookup(updates: &mut watch::Receiver<CoordinatorState>) {
    loop {
        let phase = updates.borrow_and_update().phase;
        if matches!(phase, LookupPhase::Resolved | LookupPhase::Failed) {
            return;
        }
        if updates.changed().await.is_err() {
            return;
        }
    }
}

fn print_map(sdk: &HeadlessSdk, container: &str) {
    let Some(snapshot) = sdk.snapshot(container) else {
        println!("  (no map)");
        return;
    };
    println!("  center: {}  zoom: {}", snapshot.center, snapshot.zoom);
    println!("  layer:  {:?}", redact_layer(&snapshot.layer));
    if let Some(url) = sdk.center_tile_url(container) {
        println!("  tile:   {}", url);
    }
    for marker in &snapshot.markers {
        match &marker.popup {
            Some(popup) => println!("  marker: {} \"{}\"", marker.position, popup),
            None => println!("  marker: {}", marker.position),
        }
    }
}

/// Keeps API keys out of terminal output.
fn redact_layer(layer: &BaseLayer) -> BaseLayer {
    match layer {
        BaseLayer::Hosted {
            map_id, map_type, ..
        } => BaseLayer::Hosted {
            map_id: map_id.clone(),
            map_type: map_type.clone(),
            api_key: "***".to_string(),
        },
        other => other.clone(),
    }
}
