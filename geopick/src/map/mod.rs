//! Map components
//!
//! - [`BaseMap`] - one engine session per container, reinitialized on
//!   engine or source change and torn down exactly once
//! - [`InputMap`] - two-way bound coordinate picked by click, crosshair or drag
//! - [`DisplayMap`] - read-only marker at a given coordinate
//! - [`MapStyle`] - basemap presets shared by every map

mod base;
mod display;
mod input;
mod style;

pub use base::{BaseMap, MapStatus};
pub use display::DisplayMap;
pub use input::{InputMap, InputMode};
pub use style::{MapStyle, UnknownStyle};
