//! Coordinate types and conversions
//!
//! Provides the bindable [`Coordinate`] value, its always-set form [`LatLng`],
//! precision limiting for values produced by map interaction, and the
//! Web Mercator tile math used to expand raster tile URL templates.

mod types;

pub use types::{
    CoordError, Coordinate, LatLng, TileCoord, MAX_LAT, MAX_LON, MAX_ZOOM, MERCATOR_MAX_LAT,
    MIN_LAT, MIN_LON, MIN_ZOOM, PRECISION_DIGITS,
};

use std::f64::consts::PI;

/// Nudge applied before truncating, in units of the last kept digit.
const TRUNCATION_EPSILON: f64 = 1e-6;

/// Truncates a coordinate axis to [`PRECISION_DIGITS`] decimal digits.
///
/// Extra digits are dropped toward zero. The scaled value is nudged away
/// from zero first so that float representation error cannot turn
/// `12.345678` into `12.345677`.
#[inline]
pub fn limit_precision(value: f64) -> f64 {
    let factor = 10f64.powi(PRECISION_DIGITS);
    let scaled = value * factor;
    (scaled + TRUNCATION_EPSILON.copysign(scaled)).trunc() / factor
}

/// Converts geographic coordinates to tile coordinates.
///
/// Latitudes beyond the Web Mercator limit are clamped to it, since a map
/// view can sit there even though no tile row exists past it.
#[inline]
pub fn to_tile_coords(lat: f64, lon: f64, zoom: u8) -> Result<TileCoord, CoordError> {
    if !(MIN_LAT..=MAX_LAT).contains(&lat) {
        return Err(CoordError::InvalidLatitude(lat));
    }
    if !(MIN_LON..=MAX_LON).contains(&lon) {
        return Err(CoordError::InvalidLongitude(lon));
    }
    if zoom > MAX_ZOOM {
        return Err(CoordError::InvalidZoom(zoom));
    }

    let lat = lat.clamp(-MERCATOR_MAX_LAT, MERCATOR_MAX_LAT);
    let n = 2.0_f64.powi(zoom as i32);
    let max_index = (n as u32).saturating_sub(1);

    let col = (((lon + 180.0) / 360.0 * n) as u32).min(max_index);

    let lat_rad = lat * PI / 180.0;
    let row = (((1.0 - lat_rad.tan().asinh() / PI) / 2.0 * n) as u32).min(max_index);

    Ok(TileCoord { row, col, zoom })
}
