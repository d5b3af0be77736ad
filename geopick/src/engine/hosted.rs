//! Hosted map engine.
//!
//! Stands in for a hosted map provider loaded with an API key. The key is
//! checked before any SDK call, so a missing or placeholder key leaves
//! nothing behind in the container.

use std::sync::Arc;

use crate::config::require_api_key;

use super::sdk::{AxisOrder, BaseLayer, MapSdk};
use super::types::{EngineError, EngineKind, MapSourceConfig};

/// Map type used for [`MapSourceConfig::Default`].
pub const DEFAULT_MAP_TYPE: &str = "roadmap";

const KEY_NAME: &str = "Google Maps API key";

pub struct HostedEngine {
    sdk: Arc<dyn MapSdk>,
    api_key: Option<String>,
}

impl HostedEngine {
    const AXIS: AxisOrder = AxisOrder::LatLng;

    pub fn new(sdk: Arc<dyn MapSdk>, api_key: Option<String>) -> Self {
        Self { sdk, api_key }
    }

    fn base_layer(&self, source: &MapSourceConfig) -> Result<BaseLayer, EngineError> {
        let api_key = require_api_key(KEY_NAME, self.api_key.as_deref())?;
        match source {
            MapSourceConfig::Hosted { map_id, map_type } => Ok(BaseLayer::Hosted {
                map_id: map_id.clone(),
                map_type: map_type.clone(),
                api_key,
            }),
            MapSourceConfig::Default => Ok(BaseLayer::Hosted {
                map_id: None,
                map_type: DEFAULT_MAP_TYPE.to_string(),
                api_key,
            }),
            other => Err(EngineError::UnsupportedSource {
                engine: EngineKind::Hosted,
                source_kind: other.variant_name(),
            }),
        }
    }
}

sdk_engine!(HostedEngine, EngineKind::Hosted);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CredentialError;
    use crate::coord::LatLng;
    use crate::engine::{EngineOptions, HeadlessSdk, MapEngine, MapView};
    use tokio::sync::mpsc;

    fn view() -> MapView {
        MapView::new(LatLng::new(37.7749, -122.4194), 12.0)
    }

    #[test]
    fn test_missing_key_fails_before_sdk() {
        let sdk = Arc::new(HeadlessSdk::new());
        let engine = HostedEngine::new(sdk.clone(), None);
        let (tx, mut rx) = mpsc::unbounded_channel();

        let err = engine
            .init("map", view(), &MapSourceConfig::Default, EngineOptions::default(), tx)
            .unwrap_err();

        assert_eq!(
            err,
            EngineError::MissingCredential(CredentialError::Missing { name: KEY_NAME })
        );
        assert_eq!(sdk.stats().maps_created, 0);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_placeholder_key_rejected() {
        let engine = HostedEngine::new(
            Arc::new(HeadlessSdk::new()),
            Some("YOUR_API_KEY".to_string()),
        );
        let (tx, _rx) = mpsc::unbounded_channel();

        let err = engine
            .init("map", view(), &MapSourceConfig::Default, EngineOptions::default(), tx)
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::MissingCredential(CredentialError::Placeholder { .. })
        ));
    }

    #[test]
    fn test_hosted_source_with_map_id() {
        let sdk = Arc::new(HeadlessSdk::new());
        let engine = HostedEngine::new(sdk.clone(), Some("k-123".to_string()));
        let (tx, _rx) = mpsc::unbounded_channel();
        let source = MapSourceConfig::Hosted {
            map_id: Some("DEMO_MAP".to_string()),
            map_type: "terrain".to_string(),
        };

        engine
            .init("map", view(), &source, EngineOptions::default(), tx)
            .unwrap();

        assert_eq!(
            sdk.snapshot("map").unwrap().layer,
            BaseLayer::Hosted {
                map_id: Some("DEMO_MAP".to_string()),
                map_type: "terrain".to_string(),
                api_key: "k-123".to_string(),
            }
        );
    }

    #[test]
    fn test_default_source_is_roadmap() {
        let sdk = Arc::new(HeadlessSdk::new());
        let engine = HostedEngine::new(sdk.clone(), Some("k-123".to_string()));
        let (tx, _rx) = mpsc::unbounded_channel();

        engine
            .init("map", view(), &MapSourceConfig::Default, EngineOptions::default(), tx)
            .unwrap();

        assert!(matches!(
            sdk.snapshot("map").unwrap().layer,
            BaseLayer::Hosted { ref map_type, .. } if map_type == DEFAULT_MAP_TYPE
        ));
    }
}
