//! In-memory map SDK.
//!
//! Keeps maps, base layers, views and markers in memory and dispatches SDK
//! events to registered listeners. Gesture methods simulate what a user
//! would do on a rendered map. Listeners are always invoked after the
//! internal lock is released, so a listener may call back into the SDK.

use std::collections::{BTreeMap, HashMap};

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::coord::{to_tile_coords, LatLng, MAX_ZOOM};

use super::sdk::{
    BaseLayer, MapId, MapInit, MapSdk, MarkerId, NativePoint, SdkError, SdkEvent, SdkListener,
    SdkMarker,
};

/// Tile server subdomains substituted for `{s}`.
const SUBDOMAINS: &[&str] = &["a", "b", "c"];

struct MapState {
    init: MapInit,
    center: NativePoint,
    zoom: f64,
    markers: BTreeMap<MarkerId, SdkMarker>,
    listeners: Vec<SdkListener>,
}

#[derive(Default)]
struct Inner {
    next_id: u64,
    maps: HashMap<MapId, MapState>,
    stats: SdkStats,
}

impl Inner {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn map_in(&self, container: &str) -> Option<MapId> {
        self.maps
            .iter()
            .find(|(_, state)| state.init.container == container)
            .map(|(id, _)| *id)
    }
}

/// Lifetime counters of a [`HeadlessSdk`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SdkStats {
    pub maps_created: usize,
    pub maps_removed: usize,
    pub markers_added: usize,
    pub markers_removed: usize,
    /// `clear_container` calls per container
    pub containers_cleared: HashMap<String, usize>,
}

impl SdkStats {
    /// Times a container was cleared.
    pub fn cleared(&self, container: &str) -> usize {
        self.containers_cleared.get(container).copied().unwrap_or(0)
    }
}

/// Read-only view of one live map.
#[derive(Debug, Clone, PartialEq)]
pub struct MapSnapshot {
    pub id: MapId,
    pub container: String,
    pub layer: BaseLayer,
    pub interactive: bool,
    /// Center in (lat, lng) order
    pub center: LatLng,
    pub zoom: f64,
    pub markers: Vec<MarkerSnapshot>,
}

/// Read-only view of one marker.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerSnapshot {
    pub id: MarkerId,
    /// Position in (lat, lng) order
    pub position: LatLng,
    pub popup: Option<String>,
    pub draggable: bool,
}

/// In-memory [`MapSdk`] implementation.
#[derive(Default)]
pub struct HeadlessSdk {
    inner: Mutex<Inner>,
}

impl HeadlessSdk {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counters accumulated since creation.
    pub fn stats(&self) -> SdkStats {
        self.inner.lock().stats.clone()
    }

    /// Number of live maps bound to a container.
    pub fn live_maps(&self, container: &str) -> usize {
        self.inner
            .lock()
            .maps
            .values()
            .filter(|state| state.init.container == container)
            .count()
    }

    /// Total number of live maps.
    pub fn total_live_maps(&self) -> usize {
        self.inner.lock().maps.len()
    }

    /// Snapshot of the map bound to a container.
    pub fn snapshot(&self, container: &str) -> Option<MapSnapshot> {
        let inner = self.inner.lock();
        let id = inner.map_in(container)?;
        let state = inner.maps.get(&id)?;
        let axis = state.init.axis;
        Some(MapSnapshot {
            id,
            container: state.init.container.clone(),
            layer: state.init.layer.clone(),
            interactive: state.init.interactive,
            center: axis.from_native(state.center),
            zoom: state.zoom,
            markers: state
                .markers
                .iter()
                .map(|(marker_id, marker)| MarkerSnapshot {
                    id: *marker_id,
                    position: axis.from_native(marker.position),
                    popup: marker.popup.clone(),
                    draggable: marker.draggable,
                })
                .collect(),
        })
    }

    /// URL of the raster tile under the map center.
    ///
    /// Returns `None` when the container holds no map or its base layer is
    /// not a tile layer.
    pub fn center_tile_url(&self, container: &str) -> Option<String> {
        let snapshot = self.snapshot(container)?;
        let BaseLayer::Tiles {
            url_template,
            max_zoom,
            ..
        } = &snapshot.layer
        else {
            return None;
        };

        let zoom = (snapshot.zoom.max(0.0).floor() as u8).min(*max_zoom).min(MAX_ZOOM);
        let tile = to_tile_coords(snapshot.center.lat, snapshot.center.lng, zoom).ok()?;
        let subdomain = SUBDOMAINS[(tile.col as usize + tile.row as usize) % SUBDOMAINS.len()];

        Some(
            url_template
                .replace("{s}", subdomain)
                .replace("{z}", &tile.zoom.to_string())
                .replace("{x}", &tile.col.to_string())
                .replace("{y}", &tile.row.to_string()),
        )
    }

    /// Simulates a click. Returns false when no map is there.
    pub fn click(&self, container: &str, point: LatLng) -> bool {
        let dispatch = {
            let inner = self.inner.lock();
            inner.map_in(container).and_then(|id| {
                let state = inner.maps.get(&id)?;
                let native = state.init.axis.to_native(point);
                Some((state.listeners.clone(), SdkEvent::Click(native)))
            })
        };
        self.dispatch(dispatch)
    }

    /// Simulates a user pan ending at `point`.
    ///
    /// Non-interactive maps ignore the gesture and return false.
    pub fn pan_to(&self, container: &str, point: LatLng) -> bool {
        let dispatch = {
            let mut inner = self.inner.lock();
            let Some(id) = inner.map_in(container) else {
                return false;
            };
            let Some(state) = inner.maps.get_mut(&id) else {
                return false;
            };
            if !state.init.interactive {
                return false;
            }
            state.center = state.init.axis.to_native(point);
            Some((state.listeners.clone(), SdkEvent::MoveEnd(state.center)))
        };
        self.dispatch(dispatch)
    }

    /// Simulates dragging the first draggable marker to `point`.
    pub fn drag_marker(&self, container: &str, point: LatLng) -> bool {
        let dispatch = {
            let mut inner = self.inner.lock();
            let Some(id) = inner.map_in(container) else {
                return false;
            };
            let Some(state) = inner.maps.get_mut(&id) else {
                return false;
            };
            let native = state.init.axis.to_native(point);
            let Some((marker_id, marker)) =
                state.markers.iter_mut().find(|(_, marker)| marker.draggable)
            else {
                return false;
            };
            marker.position = native;
            let event = SdkEvent::MarkerDragEnd {
                marker: *marker_id,
                position: native,
            };
            Some((state.listeners.clone(), event))
        };
        self.dispatch(dispatch)
    }

    fn dispatch(&self, dispatch: Option<(Vec<SdkListener>, SdkEvent)>) -> bool {
        let Some((listeners, event)) = dispatch else {
            return false;
        };
        trace!(?event, listeners = listeners.len(), "Dispatching SDK event");
        for listener in &listeners {
            listener(event);
        }
        true
    }
}

impl MapSdk for HeadlessSdk {
    fn create_map(&self, init: MapInit) -> Result<MapId, SdkError> {
        let mut inner = self.inner.lock();
        if inner.map_in(&init.container).is_some() {
            return Err(SdkError::ContainerBusy(init.container));
        }

        let id = inner.next_id();
        debug!(map = id, container = %init.container, "Creating map");
        inner.stats.maps_created += 1;
        inner.maps.insert(
            id,
            MapState {
                center: init.center,
                zoom: init.zoom,
                init,
                markers: BTreeMap::new(),
                listeners: Vec::new(),
            },
        );
        Ok(id)
    }

    fn set_view(&self, map: MapId, center: NativePoint, zoom: f64) -> Result<(), SdkError> {
        let listeners = {
            let mut inner = self.inner.lock();
            let state = inner.maps.get_mut(&map).ok_or(SdkError::UnknownMap(map))?;
            state.center = center;
            state.zoom = zoom;
            state.listeners.clone()
        };
        self.dispatch(Some((listeners, SdkEvent::MoveEnd(center))));
        Ok(())
    }

    fn add_marker(&self, map: MapId, marker: SdkMarker) -> Result<MarkerId, SdkError> {
        let mut inner = self.inner.lock();
        if !inner.maps.contains_key(&map) {
            return Err(SdkError::UnknownMap(map));
        }
        let id = inner.next_id();
        inner.stats.markers_added += 1;
        if let Some(state) = inner.maps.get_mut(&map) {
            state.markers.insert(id, marker);
        }
        Ok(id)
    }

    fn remove_marker(&self, map: MapId, marker: MarkerId) -> Result<(), SdkError> {
        let mut inner = self.inner.lock();
        let state = inner.maps.get_mut(&map).ok_or(SdkError::UnknownMap(map))?;
        state
            .markers
            .remove(&marker)
            .ok_or(SdkError::UnknownMarker { map, marker })?;
        inner.stats.markers_removed += 1;
        Ok(())
    }

    fn on_event(&self, map: MapId, listener: SdkListener) -> Result<(), SdkError> {
        let mut inner = self.inner.lock();
        let state = inner.maps.get_mut(&map).ok_or(SdkError::UnknownMap(map))?;
        state.listeners.push(listener);
        Ok(())
    }

    fn remove_map(&self, map: MapId) -> bool {
        let mut inner = self.inner.lock();
        match inner.maps.remove(&map) {
            Some(state) => {
                debug!(map, container = %state.init.container, "Removed map");
                inner.stats.maps_removed += 1;
                true
            }
            None => false,
        }
    }

    fn clear_container(&self, container: &str) {
        let mut inner = self.inner.lock();
        *inner
            .stats
            .containers_cleared
            .entry(container.to_string())
            .or_insert(0) += 1;
    }
}
