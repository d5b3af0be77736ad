//! Reverse geocoding abstraction
//!
//! Normalizes external reverse geocoding services behind one interface.
//! Every backend performs a single HTTP request per lookup and resolves to
//! `None` on any failure; the failure itself is only logged.
//!
//! # Factory Pattern
//!
//! ```ignore
//! use geopick::geocode::{AsyncReqwestClient, GeocoderConfig, GeocoderFactory, ReverseGeocoder};
//!
//! let factory = GeocoderFactory::new(AsyncReqwestClient::new()?);
//! let geocoder = factory.create(&GeocoderConfig::nominatim())?;
//! if let Some(result) = geocoder.reverse_geocode(51.5074, -0.1278).await {
//!     println!("{}", result.display_name);
//! }
//! ```

mod factory;
mod format;
mod google;
mod http;
mod nominatim;
mod set;
mod types;

pub use factory::{Geocoder, GeocoderConfig, GeocoderFactory};
pub use format::format_address;
pub use google::{map_components, AddressComponent, GoogleGeocoder, DEFAULT_GOOGLE_URL};
pub use http::{AsyncHttpClient, AsyncReqwestClient, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};
pub use nominatim::{NominatimGeocoder, DEFAULT_NOMINATIM_URL};
pub use set::GeocoderSet;
pub use types::{GeocodeError, GeocodeResult, GeocodingService, ReverseGeocoder, StructuredAddress};

#[cfg(test)]
pub use http::tests::MockAsyncHttpClient;
