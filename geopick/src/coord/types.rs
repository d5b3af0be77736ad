//! Coordinate type definitions

use std::fmt;

/// Valid latitude range
pub const MIN_LAT: f64 = -90.0;
pub const MAX_LAT: f64 = 90.0;

/// Valid longitude range
pub const MIN_LON: f64 = -180.0;
pub const MAX_LON: f64 = 180.0;

/// Web Mercator latitude limit used for tile math.
pub const MERCATOR_MAX_LAT: f64 = 85.05112878;

/// Zoom range accepted by tile math
pub const MIN_ZOOM: u8 = 0;
pub const MAX_ZOOM: u8 = 22;

/// Decimal digits kept on coordinates produced by map interaction.
pub const PRECISION_DIGITS: i32 = 6;

/// A geographic point that is always set.
///
/// This is the shape engines and markers work with. The public order is
/// always latitude first; engines that think in (longitude, latitude)
/// translate at their own boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLng {
    /// Latitude in degrees (-90 to 90)
    pub lat: f64,
    /// Longitude in degrees (-180 to 180)
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Returns this point with both axes limited to [`PRECISION_DIGITS`].
    pub fn with_precision(self) -> Self {
        Self {
            lat: super::limit_precision(self.lat),
            lng: super::limit_precision(self.lng),
        }
    }

    /// Checks both axes against the geographic ranges.
    pub fn validate(&self) -> Result<(), CoordError> {
        if !self.lat.is_finite() || !(MIN_LAT..=MAX_LAT).contains(&self.lat) {
            return Err(CoordError::InvalidLatitude(self.lat));
        }
        if !self.lng.is_finite() || !(MIN_LON..=MAX_LON).contains(&self.lng) {
            return Err(CoordError::InvalidLongitude(self.lng));
        }
        Ok(())
    }
}

impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.lat, self.lng)
    }
}

/// The bindable coordinate value.
///
/// Both fields `None` means "unset". A coordinate with only one axis set is
/// kept as given but is not [`valid`](Coordinate::as_lat_lng).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Coordinate {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

impl Coordinate {
    /// The unset coordinate.
    pub const UNSET: Self = Self {
        lat: None,
        lng: None,
    };

    pub const fn new(lat: f64, lng: f64) -> Self {
        Self {
            lat: Some(lat),
            lng: Some(lng),
        }
    }

    /// True when neither axis is set.
    pub fn is_unset(&self) -> bool {
        self.lat.is_none() && self.lng.is_none()
    }

    /// Returns the point when both axes are set.
    pub fn as_lat_lng(&self) -> Option<LatLng> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Some(LatLng { lat, lng }),
            _ => None,
        }
    }

    /// Returns the coordinate with every set axis limited to [`PRECISION_DIGITS`].
    pub fn with_precision(self) -> Self {
        Self {
            lat: self.lat.map(super::limit_precision),
            lng: self.lng.map(super::limit_precision),
        }
    }
}

impl From<LatLng> for Coordinate {
    fn from(point: LatLng) -> Self {
        Self::new(point.lat, point.lng)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_lat_lng() {
            Some(point) => point.fmt(f),
            None => write!(f, "unset"),
        }
    }
}

/// Tile coordinates in the Web Mercator / Slippy Map system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCoord {
    /// Y coordinate (north-south), 0 at north
    pub row: u32,
    /// X coordinate (east-west), 0 at west
    pub col: u32,
    /// Zoom level
    pub zoom: u8,
}

/// Errors that can occur during coordinate validation or conversion.
#[derive(Debug, Clone, PartialEq)]
pub enum CoordError {
    /// Latitude is outside the valid range
    InvalidLatitude(f64),
    /// Longitude is outside the valid range
    InvalidLongitude(f64),
    /// Zoom level is outside the valid range
    InvalidZoom(u8),
}

impl fmt::Display for CoordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordError::InvalidLatitude(lat) => {
                write!(
                    f,
                    "Invalid latitude: {} (must be between {} and {})",
                    lat, MIN_LAT, MAX_LAT
                )
            }
            CoordError::InvalidLongitude(lon) => {
                write!(
                    f,
                    "Invalid longitude: {} (must be between {} and {})",
                    lon, MIN_LON, MAX_LON
                )
            }
            CoordError::InvalidZoom(zoom) => {
                write!(
                    f,
                    "Invalid zoom level: {} (must be between {} and {})",
                    zoom, MIN_ZOOM, MAX_ZOOM
                )
            }
        }
    }
}

impl std::error::Error for CoordError {}
