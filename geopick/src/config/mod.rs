//! Configuration for geopick.
//!
//! - [`ConfigFile`] - `~/.geopick/config.ini`, loaded with defaults for
//!   anything missing
//! - [`credentials`](require_api_key) - API key resolution and placeholder
//!   detection
//!
//! # Example
//!
//! ```ignore
//! use geopick::config::ConfigFile;
//!
//! let config = ConfigFile::load()?;
//! println!("debounce: {:?}", config.debounce());
//! ```

mod credentials;
mod defaults;
mod file;
mod parser;
mod settings;
mod writer;

pub use credentials::{
    is_placeholder, require_api_key, resolve_google_api_key, CredentialError, GOOGLE_API_KEY_ENV,
};
pub use defaults::{
    default_log_file, DEFAULT_DEBOUNCE_MS, DEFAULT_LAT, DEFAULT_LNG, DEFAULT_LOG_FILE,
    DEFAULT_ZOOM,
};
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::{ConfigFile, GeocodingSettings, GoogleSettings, LoggingSettings, MapSettings};
