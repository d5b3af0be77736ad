//! SDK session shared by every engine adapter.
//!
//! Adapters differ in axis order and in how a [`MapSourceConfig`] becomes a
//! [`BaseLayer`]; opening a map, replacing markers, moving the view and
//! tearing down are the same for all of them and live here.

use std::sync::Arc;

use tracing::{debug, trace, warn};

/// Implements [`MapEngine`](super::MapEngine) for an adapter on top of this
/// module.
///
/// The adapter needs an `sdk: Arc<dyn MapSdk>` field, an `AXIS` constant
/// and a `base_layer` method turning a source into a [`BaseLayer`].
macro_rules! sdk_engine {
    ($engine:ty, $kind:expr) => {
        impl $crate::engine::MapEngine for $engine {
            fn kind(&self) -> $crate::engine::EngineKind {
                $kind
            }

            fn init(
                &self,
                container: &str,
                view: $crate::engine::MapView,
                source: &$crate::engine::MapSourceConfig,
                options: $crate::engine::EngineOptions,
                events: $crate::engine::EventSender,
            ) -> Result<$crate::engine::EngineHandle, $crate::engine::EngineError> {
                let layer = self.base_layer(source)?;
                super::session::open(
                    &self.sdk,
                    $kind,
                    Self::AXIS,
                    container,
                    view,
                    layer,
                    options,
                    events,
                )
            }

            fn update_markers(
                &self,
                handle: &mut $crate::engine::EngineHandle,
                markers: &[$crate::engine::MarkerSpec],
            ) -> Result<(), $crate::engine::EngineError> {
                super::session::replace_markers(&self.sdk, handle, markers)
            }

            fn set_center(
                &self,
                handle: &mut $crate::engine::EngineHandle,
                center: $crate::coord::LatLng,
            ) -> Result<(), $crate::engine::EngineError> {
                super::session::move_center(&self.sdk, handle, center)
            }

            fn set_zoom(
                &self,
                handle: &mut $crate::engine::EngineHandle,
                zoom: f64,
            ) -> Result<(), $crate::engine::EngineError> {
                super::session::zoom_to(&self.sdk, handle, zoom)
            }

            fn destroy(&self, container: &str, handle: Option<$crate::engine::EngineHandle>) {
                super::session::close(&self.sdk, container, handle)
            }
        }
    };
}

use crate::coord::LatLng;

use super::sdk::{
    AxisOrder, BaseLayer, MapId, MapInit, MapSdk, MarkerId, SdkEvent, SdkListener, SdkMarker,
};
use super::types::{EngineError, EngineKind, EngineOptions, EventSender, MapEvent, MapView, MarkerSpec};

/// Live SDK session owned by one base map.
///
/// Opaque outside the engine module. Moving it into `destroy` ends the
/// session, so it cannot be torn down twice.
#[derive(Debug)]
pub struct EngineHandle {
    kind: EngineKind,
    map: MapId,
    axis: AxisOrder,
    markers: Vec<MarkerId>,
    view: MapView,
    max_zoom: Option<u8>,
    draggable: bool,
}

impl EngineHandle {
    /// Engine that created this session.
    pub fn kind(&self) -> EngineKind {
        self.kind
    }

    /// SDK map identifier.
    pub fn map_id(&self) -> MapId {
        self.map
    }

    /// Last view applied through the engine.
    pub fn view(&self) -> MapView {
        self.view
    }

    /// Number of markers currently rendered.
    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    /// Records a center the map settled on by itself, e.g. after a pan.
    pub(crate) fn record_center(&mut self, center: LatLng) {
        self.view.center = center;
    }
}

/// Clamps a zoom level to the layer's limit, if it has one.
fn clamp_zoom(zoom: f64, max_zoom: Option<u8>) -> f64 {
    match max_zoom {
        Some(max) => zoom.clamp(0.0, f64::from(max)),
        None => zoom.max(0.0),
    }
}

/// Creates the map, registers the listener and reports the initial center.
#[allow(clippy::too_many_arguments)]
pub(super) fn open(
    sdk: &Arc<dyn MapSdk>,
    kind: EngineKind,
    axis: AxisOrder,
    container: &str,
    view: MapView,
    layer: BaseLayer,
    options: EngineOptions,
    events: EventSender,
) -> Result<EngineHandle, EngineError> {
    view.center.validate()?;

    let max_zoom = match &layer {
        BaseLayer::Tiles { max_zoom, .. } => Some(*max_zoom),
        _ => None,
    };
    let view = MapView::new(view.center, clamp_zoom(view.zoom, max_zoom));

    let map = sdk.create_map(MapInit {
        container: container.to_string(),
        axis,
        center: axis.to_native(view.center),
        zoom: view.zoom,
        layer,
        interactive: options.interactive,
    })?;

    let listener_events = events.clone();
    let report_clicks = options.report_clicks;
    let listener: SdkListener = Arc::new(move |event| {
        let mapped = match event {
            SdkEvent::Click(point) if report_clicks => Some(MapEvent::Click(axis.from_native(point))),
            SdkEvent::Click(_) => None,
            SdkEvent::MoveEnd(point) => Some(MapEvent::CenterChanged(axis.from_native(point))),
            SdkEvent::MarkerDragEnd { position, .. } => {
                Some(MapEvent::MarkerDragged(axis.from_native(position)))
            }
        };
        if let Some(event) = mapped {
            // Receiver gone means the owning map is being dropped
            let _ = listener_events.send(event);
        }
    });

    if let Err(e) = sdk.on_event(map, listener) {
        sdk.remove_map(map);
        return Err(e.into());
    }

    debug!(engine = %kind, container, map, center = %view.center, zoom = view.zoom, "Engine initialized");
    let _ = events.send(MapEvent::CenterChanged(view.center));

    Ok(EngineHandle {
        kind,
        map,
        axis,
        markers: Vec::new(),
        view,
        max_zoom,
        draggable: options.draggable_marker,
    })
}

/// Removes every rendered marker, then adds the supplied ones.
pub(super) fn replace_markers(
    sdk: &Arc<dyn MapSdk>,
    handle: &mut EngineHandle,
    markers: &[MarkerSpec],
) -> Result<(), EngineError> {
    for marker in handle.markers.drain(..) {
        if let Err(e) = sdk.remove_marker(handle.map, marker) {
            trace!(map = handle.map, marker, error = %e, "Marker already gone");
        }
    }

    for spec in markers {
        let Some(position) = spec.position.as_lat_lng() else {
            continue;
        };
        let id = sdk.add_marker(
            handle.map,
            SdkMarker {
                position: handle.axis.to_native(position),
                popup: spec.popup_text.clone(),
                draggable: handle.draggable,
            },
        )?;
        handle.markers.push(id);
    }

    trace!(map = handle.map, markers = handle.markers.len(), "Markers replaced");
    Ok(())
}

pub(super) fn move_center(
    sdk: &Arc<dyn MapSdk>,
    handle: &mut EngineHandle,
    center: LatLng,
) -> Result<(), EngineError> {
    center.validate()?;
    sdk.set_view(handle.map, handle.axis.to_native(center), handle.view.zoom)?;
    handle.view.center = center;
    Ok(())
}

pub(super) fn zoom_to(
    sdk: &Arc<dyn MapSdk>,
    handle: &mut EngineHandle,
    zoom: f64,
) -> Result<(), EngineError> {
    let zoom = clamp_zoom(zoom, handle.max_zoom);
    sdk.set_view(handle.map, handle.axis.to_native(handle.view.center), zoom)?;
    handle.view.zoom = zoom;
    Ok(())
}

/// Removes markers and the map, then clears the container.
///
/// The container is cleared even when there was never a session.
pub(super) fn close(sdk: &Arc<dyn MapSdk>, container: &str, handle: Option<EngineHandle>) {
    if let Some(mut handle) = handle {
        for marker in handle.markers.drain(..) {
            // Map may already be gone with its markers
            let _ = sdk.remove_marker(handle.map, marker);
        }
        if !sdk.remove_map(handle.map) {
            warn!(engine = %handle.kind, container, map = handle.map, "Map already removed");
        } else {
            debug!(engine = %handle.kind, container, map = handle.map, "Engine destroyed");
        }
    }
    sdk.clear_container(container);
}
