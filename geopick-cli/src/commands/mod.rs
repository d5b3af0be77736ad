//! CLI command implementations.
//!
//! - [`demo`] - Full pipeline on the headless map SDK
//! - [`init`] - Configuration initialization
//! - [`reverse`] - Single reverse geocoding lookup

pub mod common;
pub mod demo;
pub mod init;
pub mod reverse;
