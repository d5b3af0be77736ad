//! Per-service geocoder registry.

use std::collections::HashMap;
use std::sync::Arc;

use super::types::GeocodingService;

/// Whether a service can be used.
enum Availability<G> {
    Ready(Arc<G>),
    Unavailable(String),
}

/// The geocoders a coordinator can switch between.
///
/// Each service is either ready or unavailable with the reason (usually a
/// configuration error). Looking up a service that was never registered
/// yields an "is not configured" reason.
pub struct GeocoderSet<G> {
    entries: HashMap<GeocodingService, Availability<G>>,
}

impl<G> GeocoderSet<G> {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Registers a ready geocoder for a service.
    pub fn with_geocoder(mut self, service: GeocodingService, geocoder: G) -> Self {
        self.entries
            .insert(service, Availability::Ready(Arc::new(geocoder)));
        self
    }

    /// Registers a service as unusable.
    pub fn with_unavailable(mut self, service: GeocodingService, reason: impl Into<String>) -> Self {
        self.entries
            .insert(service, Availability::Unavailable(reason.into()));
        self
    }

    /// Returns the geocoder for a service, or why it cannot be used.
    pub fn get(&self, service: GeocodingService) -> Result<Arc<G>, String> {
        match self.entries.get(&service) {
            Some(Availability::Ready(geocoder)) => Ok(Arc::clone(geocoder)),
            Some(Availability::Unavailable(reason)) => Err(reason.clone()),
            None => Err(format!("{} is not configured", service.name())),
        }
    }

    /// Returns true if the service has a ready geocoder.
    pub fn is_available(&self, service: GeocodingService) -> bool {
        matches!(self.entries.get(&service), Some(Availability::Ready(_)))
    }

    /// Services that are ready, in display order.
    pub fn available_services(&self) -> Vec<GeocodingService> {
        GeocodingService::ALL
            .into_iter()
            .filter(|s| self.is_available(*s))
            .collect()
    }
}

impl<G> Default for GeocoderSet<G> {
    fn default() -> Self {
        Self::new()
    }
}
