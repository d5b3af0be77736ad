//! Geocoder factory for centralized geocoder creation.
//!
//! [`GeocoderConfig`] describes one service; [`GeocoderFactory`] turns it into
//! a [`Geocoder`], the closed enum that dispatches to the concrete backend.
//! [`GeocoderFactory::build_set`] builds every configured service at once and
//! records configuration errors per service instead of failing as a whole.

use tracing::{info, warn};

use super::google::{GoogleGeocoder, DEFAULT_GOOGLE_URL};
use super::http::{AsyncHttpClient, AsyncReqwestClient, DEFAULT_USER_AGENT};
use super::nominatim::{NominatimGeocoder, DEFAULT_NOMINATIM_URL};
use super::set::GeocoderSet;
use super::types::{GeocodeError, GeocodeResult, GeocodingService, ReverseGeocoder};

/// Configuration for creating a geocoder.
#[derive(Debug, Clone, PartialEq)]
pub enum GeocoderConfig {
    /// OpenStreetMap Nominatim.
    ///
    /// No API key required. The usage policy asks for an identifying
    /// user agent.
    Nominatim {
        /// Server root, e.g. `https://nominatim.openstreetmap.org`
        base_url: String,
        /// User-Agent header sent with each request
        user_agent: String,
    },

    /// Google Geocoding API.
    ///
    /// Requires a Google Maps Platform API key.
    Google {
        /// API key, if one was configured
        api_key: Option<String>,
        /// Host root, e.g. `https://maps.googleapis.com`
        base_url: String,
    },
}

impl GeocoderConfig {
    /// Nominatim on the public instance.
    pub fn nominatim() -> Self {
        Self::Nominatim {
            base_url: DEFAULT_NOMINATIM_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Google with the given (possibly missing) key.
    pub fn google(api_key: Option<String>) -> Self {
        Self::Google {
            api_key,
            base_url: DEFAULT_GOOGLE_URL.to_string(),
        }
    }

    /// The service this configuration creates.
    pub fn service(&self) -> GeocodingService {
        match self {
            Self::Nominatim { .. } => GeocodingService::Nominatim,
            Self::Google { .. } => GeocodingService::Google,
        }
    }

    /// Returns whether this service needs an API key.
    pub fn requires_api_key(&self) -> bool {
        matches!(self, Self::Google { .. })
    }
}

/// Closed set of geocoder backends.
pub enum Geocoder<C: AsyncHttpClient = AsyncReqwestClient> {
    Nominatim(NominatimGeocoder<C>),
    Google(GoogleGeocoder<C>),
}

impl<C: AsyncHttpClient> ReverseGeocoder for Geocoder<C> {
    async fn reverse_geocode(&self, lat: f64, lng: f64) -> Option<GeocodeResult> {
        match self {
            Self::Nominatim(g) => g.reverse_geocode(lat, lng).await,
            Self::Google(g) => g.reverse_geocode(lat, lng).await,
        }
    }

    fn service(&self) -> GeocodingService {
        match self {
            Self::Nominatim(g) => g.service(),
            Self::Google(g) => g.service(),
        }
    }
}

impl<C: AsyncHttpClient> Geocoder<C> {
    /// Performs one lookup, keeping the failure reason.
    pub async fn lookup(&self, lat: f64, lng: f64) -> Result<GeocodeResult, GeocodeError> {
        match self {
            Self::Nominatim(g) => g.lookup(lat, lng).await,
            Self::Google(g) => g.lookup(lat, lng).await,
        }
    }
}

/// Factory for creating geocoder instances.
pub struct GeocoderFactory<C: AsyncHttpClient + Clone = AsyncReqwestClient> {
    http_client: C,
}

impl<C: AsyncHttpClient + Clone> GeocoderFactory<C> {
    /// Create a new geocoder factory with the given HTTP client.
    pub fn new(http_client: C) -> Self {
        Self { http_client }
    }

    /// Create a geocoder from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Credential`] when a service needs a key that
    /// is missing or still a placeholder.
    pub fn create(&self, config: &GeocoderConfig) -> Result<Geocoder<C>, GeocodeError> {
        match config {
            GeocoderConfig::Nominatim {
                base_url,
                user_agent,
            } => Ok(Geocoder::Nominatim(NominatimGeocoder::with_endpoint(
                self.http_client.clone(),
                base_url.clone(),
                user_agent.clone(),
            ))),
            GeocoderConfig::Google { api_key, base_url } => {
                let geocoder = GoogleGeocoder::with_endpoint(
                    self.http_client.clone(),
                    api_key.as_deref(),
                    base_url.clone(),
                )?;
                Ok(Geocoder::Google(geocoder))
            }
        }
    }

    /// Build every configured service.
    ///
    /// A service whose configuration is invalid is registered as unavailable
    /// with the error text; the remaining services stay usable.
    pub fn build_set(&self, configs: &[GeocoderConfig]) -> GeocoderSet<Geocoder<C>> {
        let mut set = GeocoderSet::new();
        for config in configs {
            let service = config.service();
            match self.create(config) {
                Ok(geocoder) => {
                    info!(service = %service, "Geocoding service ready");
                    set = set.with_geocoder(service, geocoder);
                }
                Err(e) => {
                    warn!(service = %service, error = %e, "Geocoding service unavailable");
                    set = set.with_unavailable(service, e.to_string());
                }
            }
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geocode::MockAsyncHttpClient;

    const NOMINATIM_OK: &str = r#"{"display_name": "Somewhere", "address": {"road": "High St"}}"#;

    #[test]
    fn test_config_service_and_key_requirement() {
        assert_eq!(
            GeocoderConfig::nominatim().service(),
            GeocodingService::Nominatim
        );
        assert!(!GeocoderConfig::nominatim().requires_api_key());
        assert_eq!(
            GeocoderConfig::google(None).service(),
            GeocodingService::Google
        );
        assert!(GeocoderConfig::google(None).requires_api_key());
    }

    #[test]
    fn test_create_google_without_key_fails() {
        let factory = GeocoderFactory::new(MockAsyncHttpClient::ok("{}"));
        assert!(matches!(
            factory.create(&GeocoderConfig::google(None)),
            Err(GeocodeError::Credential(_))
        ));
    }

    #[tokio::test]
    async fn test_enum_dispatch_reaches_backend() {
        let client = MockAsyncHttpClient::ok(NOMINATIM_OK);
        let factory = GeocoderFactory::new(client.clone());

        let geocoder = factory.create(&GeocoderConfig::nominatim()).unwrap();
        assert_eq!(geocoder.service(), GeocodingService::Nominatim);

        let result = geocoder.reverse_geocode(1.0, 2.0).await.unwrap();
        assert_eq!(result.display_name, "Somewhere");
        assert_eq!(client.recorded().len(), 1);
    }

    #[test]
    fn test_build_set_keeps_working_services() {
        let factory = GeocoderFactory::new(MockAsyncHttpClient::ok(NOMINATIM_OK));
        let set = factory.build_set(&[
            GeocoderConfig::nominatim(),
            GeocoderConfig::google(Some("YOUR_API_KEY".to_string())),
        ]);

        assert!(set.is_available(GeocodingService::Nominatim));
        assert!(!set.is_available(GeocodingService::Google));
        let reason = set.get(GeocodingService::Google).err().unwrap();
        assert!(reason.contains("placeholder"), "reason was: {}", reason);
    }
}
