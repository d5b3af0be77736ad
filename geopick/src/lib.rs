//! geopick - coordinate picking with reverse geocoding
//!
//! The user picks a coordinate on an input map, the coordinate is shown on
//! one read-only map per mapping engine, and a selectable external service
//! turns it into an address.
//!
//! # High-Level API
//!
//! ```ignore
//! use std::sync::Arc;
//! use geopick::app::{DemoApp, DemoOptions};
//! use geopick::config::ConfigFile;
//! use geopick::coordinator::Coordinator;
//! use geopick::engine::{EngineFactory, HeadlessSdk};
//! use geopick::geocode::{AsyncReqwestClient, GeocoderFactory};
//!
//! let config = ConfigFile::load()?;
//! let geocoders = GeocoderFactory::new(AsyncReqwestClient::new()?)
//!     .build_set(&config.geocoder_configs());
//! let coordinator = Coordinator::new(geocoders, config.geocoding.service, config.debounce());
//! let factory = EngineFactory::new(Arc::new(HeadlessSdk::new()))
//!     .with_hosted_api_key(config.google_api_key());
//!
//! let mut app = DemoApp::new(factory, coordinator, DemoOptions::from_config(&config));
//! app.mount();
//! ```

pub mod app;
pub mod config;
pub mod coord;
pub mod coordinator;
pub mod engine;
pub mod geocode;
pub mod logging;
pub mod map;

/// Version of the geopick library and CLI.
///
/// This is synchronized across all components in the workspace.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
