//! Engine adapter types

use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use tokio::sync::mpsc;

use crate::config::CredentialError;
use crate::coord::{CoordError, Coordinate, LatLng};

use super::sdk::SdkError;
use super::session::EngineHandle;

/// The closed set of mapping engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EngineKind {
    /// Raster tile library (lat,lng order)
    #[default]
    Raster,
    /// Vector style library (lng,lat order)
    VectorStyle,
    /// Feature layer library (x,y order)
    FeatureLayer,
    /// Hosted map provider, requires an API key
    Hosted,
}

impl EngineKind {
    /// Every engine, in display order.
    pub const ALL: [EngineKind; 4] = [
        EngineKind::Raster,
        EngineKind::VectorStyle,
        EngineKind::FeatureLayer,
        EngineKind::Hosted,
    ];

    /// Identifier used in config files and on the command line.
    pub fn id(&self) -> &'static str {
        match self {
            Self::Raster => "raster",
            Self::VectorStyle => "vector",
            Self::FeatureLayer => "feature",
            Self::Hosted => "hosted",
        }
    }

    /// Human-readable engine name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Raster => "Raster tiles",
            Self::VectorStyle => "Vector style",
            Self::FeatureLayer => "Feature layer",
            Self::Hosted => "Hosted map",
        }
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for EngineKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "raster" => Ok(Self::Raster),
            "vector" | "vector-style" | "vectorstyle" => Ok(Self::VectorStyle),
            "feature" | "feature-layer" | "featurelayer" => Ok(Self::FeatureLayer),
            "hosted" => Ok(Self::Hosted),
            other => Err(EngineError::UnknownEngine(other.to_string())),
        }
    }
}

/// Where an engine gets its base layer from.
///
/// A new, different value given to a mounted map triggers reinitialization.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum MapSourceConfig {
    /// XYZ raster tiles, `{s}`/`{z}`/`{x}`/`{y}` placeholders
    RasterTiles {
        url_template: String,
        attribution: String,
        max_zoom: u8,
    },
    /// Vector style document
    VectorStyle { style_url: String },
    /// Whatever the engine considers its default base layer
    #[default]
    Default,
    /// Hosted provider map
    Hosted {
        map_id: Option<String>,
        map_type: String,
    },
}

impl MapSourceConfig {
    /// Short variant name used in logs and errors.
    pub fn variant_name(&self) -> &'static str {
        match self {
            Self::RasterTiles { .. } => "raster-tiles",
            Self::VectorStyle { .. } => "vector-style",
            Self::Default => "default",
            Self::Hosted { .. } => "hosted",
        }
    }
}

/// One marker to render. Unset positions are skipped.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MarkerSpec {
    pub position: Coordinate,
    pub popup_text: Option<String>,
}

impl MarkerSpec {
    pub fn new(position: Coordinate) -> Self {
        Self {
            position,
            popup_text: None,
        }
    }

    pub fn with_popup(mut self, text: impl Into<String>) -> Self {
        self.popup_text = Some(text.into());
        self
    }
}

/// Behavior switches applied at init.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    /// Forward clicks as [`MapEvent::Click`]
    pub report_clicks: bool,
    /// Markers can be dragged by the user
    pub draggable_marker: bool,
    /// Map accepts pan and zoom gestures
    pub interactive: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            report_clicks: false,
            draggable_marker: false,
            interactive: true,
        }
    }
}

impl EngineOptions {
    /// Options for a read-only map.
    pub fn read_only() -> Self {
        Self {
            report_clicks: false,
            draggable_marker: false,
            interactive: false,
        }
    }
}

/// Map center and zoom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapView {
    pub center: LatLng,
    pub zoom: f64,
}

impl MapView {
    pub fn new(center: LatLng, zoom: f64) -> Self {
        Self { center, zoom }
    }
}

/// Events an engine reports to its owning map, always in (lat, lng) order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MapEvent {
    /// User clicked the map (only when clicks are reported)
    Click(LatLng),
    /// Map center settled, including the initial center after init
    CenterChanged(LatLng),
    /// User finished dragging a marker
    MarkerDragged(LatLng),
}

/// Channel an engine reports [`MapEvent`]s on.
pub type EventSender = mpsc::UnboundedSender<MapEvent>;

/// Errors that can occur while driving an engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// The engine cannot render this kind of source
    #[error("{engine} engine does not support {source_kind} sources")]
    UnsupportedSource {
        engine: EngineKind,
        source_kind: &'static str,
    },

    /// Required credential missing or placeholder
    #[error("Configuration error: {0}")]
    MissingCredential(#[from] CredentialError),

    /// The map SDK rejected an operation
    #[error("Map SDK error: {0}")]
    Sdk(#[from] SdkError),

    /// Coordinate outside the geographic range
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(#[from] CoordError),

    /// Unrecognized engine identifier
    #[error("Unknown engine '{0}' (expected raster, vector, feature or hosted)")]
    UnknownEngine(String),
}

/// Capability set shared by every engine adapter.
///
/// The public contract is always (lat, lng); adapters whose library thinks
/// in (lng, lat) translate at their own boundary.
pub trait MapEngine: Send + Sync {
    /// The engine's tag.
    fn kind(&self) -> EngineKind;

    /// Creates a map in `container` with a base layer derived from `source`.
    ///
    /// Reports the initial center on `events` before returning.
    fn init(
        &self,
        container: &str,
        view: MapView,
        source: &MapSourceConfig,
        options: EngineOptions,
        events: EventSender,
    ) -> Result<EngineHandle, EngineError>;

    /// Removes every rendered marker then adds `markers`.
    fn update_markers(
        &self,
        handle: &mut EngineHandle,
        markers: &[MarkerSpec],
    ) -> Result<(), EngineError>;

    fn set_center(&self, handle: &mut EngineHandle, center: LatLng) -> Result<(), EngineError>;

    fn set_zoom(&self, handle: &mut EngineHandle, zoom: f64) -> Result<(), EngineError>;

    /// Tears down a session. Safe when `handle` is `None` or its map is gone.
    fn destroy(&self, container: &str, handle: Option<EngineHandle>);
}
