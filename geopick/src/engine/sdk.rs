//! Map SDK capability.
//!
//! [`MapSdk`] is the narrow surface an engine adapter needs from a mapping
//! library. Points cross it in the library's own axis order as
//! [`NativePoint`]; adapters translate with [`AxisOrder`].

use std::sync::Arc;

use thiserror::Error;

use crate::coord::LatLng;

/// SDK-assigned map identifier.
pub type MapId = u64;

/// SDK-assigned marker identifier.
pub type MarkerId = u64;

/// A point in the SDK's native axis order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NativePoint {
    /// First axis as the SDK sees it
    pub x: f64,
    /// Second axis as the SDK sees it
    pub y: f64,
}

/// Axis order a mapping library expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisOrder {
    /// (latitude, longitude)
    LatLng,
    /// (longitude, latitude)
    LngLat,
}

impl AxisOrder {
    /// Converts a public point into the SDK's order.
    pub fn to_native(self, point: LatLng) -> NativePoint {
        match self {
            Self::LatLng => NativePoint {
                x: point.lat,
                y: point.lng,
            },
            Self::LngLat => NativePoint {
                x: point.lng,
                y: point.lat,
            },
        }
    }

    /// Converts an SDK point back into (lat, lng).
    pub fn from_native(self, point: NativePoint) -> LatLng {
        match self {
            Self::LatLng => LatLng::new(point.x, point.y),
            Self::LngLat => LatLng::new(point.y, point.x),
        }
    }
}

/// Base layer attached when a map is created.
#[derive(Debug, Clone, PartialEq)]
pub enum BaseLayer {
    /// XYZ raster tile layer
    Tiles {
        url_template: String,
        attribution: String,
        max_zoom: u8,
    },
    /// Vector style document
    Style { style_url: String },
    /// Named basemap of a feature-layer library
    Basemap { name: String },
    /// Hosted provider map
    Hosted {
        map_id: Option<String>,
        map_type: String,
        api_key: String,
    },
}

/// Parameters for [`MapSdk::create_map`].
#[derive(Debug, Clone, PartialEq)]
pub struct MapInit {
    pub container: String,
    pub axis: AxisOrder,
    pub center: NativePoint,
    pub zoom: f64,
    pub layer: BaseLayer,
    pub interactive: bool,
}

/// A marker as the SDK stores it.
#[derive(Debug, Clone, PartialEq)]
pub struct SdkMarker {
    pub position: NativePoint,
    pub popup: Option<String>,
    pub draggable: bool,
}

/// Events raised by the SDK, in native order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SdkEvent {
    Click(NativePoint),
    MoveEnd(NativePoint),
    MarkerDragEnd {
        marker: MarkerId,
        position: NativePoint,
    },
}

/// Listener registered with [`MapSdk::on_event`].
pub type SdkListener = Arc<dyn Fn(SdkEvent) + Send + Sync>;

/// Errors raised by a map SDK.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SdkError {
    #[error("map {0} does not exist")]
    UnknownMap(MapId),

    #[error("marker {marker} does not exist on map {map}")]
    UnknownMarker { map: MapId, marker: MarkerId },

    #[error("container '{0}' already holds a map")]
    ContainerBusy(String),
}

/// Operations an engine adapter performs against a mapping library.
pub trait MapSdk: Send + Sync {
    /// Creates a map bound to a container with its base layer attached.
    fn create_map(&self, init: MapInit) -> Result<MapId, SdkError>;

    /// Moves the view; raises [`SdkEvent::MoveEnd`] once settled.
    fn set_view(&self, map: MapId, center: NativePoint, zoom: f64) -> Result<(), SdkError>;

    fn add_marker(&self, map: MapId, marker: SdkMarker) -> Result<MarkerId, SdkError>;

    fn remove_marker(&self, map: MapId, marker: MarkerId) -> Result<(), SdkError>;

    /// Registers a listener for click, move-end and marker drag-end.
    fn on_event(&self, map: MapId, listener: SdkListener) -> Result<(), SdkError>;

    /// Removes a map. Returns false when it was already gone.
    fn remove_map(&self, map: MapId) -> bool;

    /// Empties a container element.
    fn clear_container(&self, container: &str);
}
