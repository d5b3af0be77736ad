//! Mapping engine adapters
//!
//! Each engine drives an injected [`MapSdk`] and exposes the same
//! [`MapEngine`] capability set: create a map in a container, replace its
//! markers, move its view, and tear it down. Engines are a closed set;
//! [`EngineFactory`] turns an [`EngineKind`] into an [`Engine`].
//!
//! | Kind | Axis order | Sources |
//! |------|------------|---------|
//! | [`EngineKind::Raster`] | lat,lng | raster tiles, default (OSM) |
//! | [`EngineKind::VectorStyle`] | lng,lat | vector style, raster tiles, default (demo style) |
//! | [`EngineKind::FeatureLayer`] | lng,lat | raster tiles, default (`osm` basemap) |
//! | [`EngineKind::Hosted`] | lat,lng | hosted, default (`roadmap`); needs an API key |

#[macro_use]
mod session;

mod factory;
mod feature;
mod headless;
mod hosted;
mod raster;
mod sdk;
mod types;
mod vector;

pub use factory::{Engine, EngineFactory};
pub use feature::{FeatureLayerEngine, DEFAULT_BASEMAP};
pub use headless::{HeadlessSdk, MapSnapshot, MarkerSnapshot, SdkStats};
pub use hosted::{HostedEngine, DEFAULT_MAP_TYPE};
pub use raster::{RasterEngine, OSM_ATTRIBUTION, OSM_MAX_ZOOM, OSM_TILE_URL};
pub use sdk::{
    AxisOrder, BaseLayer, MapId, MapInit, MapSdk, MarkerId, NativePoint, SdkError, SdkEvent,
    SdkListener, SdkMarker,
};
pub use session::EngineHandle;
pub use types::{
    EngineError, EngineKind, EngineOptions, EventSender, MapEngine, MapEvent, MapSourceConfig,
    MapView, MarkerSpec,
};
pub use vector::{VectorStyleEngine, DEMO_STYLE_URL};
