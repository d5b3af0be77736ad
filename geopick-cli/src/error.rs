//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;

use geopick::config::{ConfigFileError, GOOGLE_API_KEY_ENV};
use geopick::engine::EngineError;
use geopick::geocode::GeocodeError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration file could not be read or written
    Config(ConfigFileError),
    /// Invalid command-line value
    InvalidArgument(String),
    /// Failed to create the HTTP client
    HttpClient(GeocodeError),
    /// Reverse geocoding lookup failed
    Lookup(GeocodeError),
    /// Input map could not be created
    Map(EngineError),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Lookup(GeocodeError::Credential(_))
            | CliError::Map(EngineError::MissingCredential(_)) => {
                eprintln!();
                eprintln!("The Google services need an API key. Either:");
                eprintln!("  1. export {}=<your key>", GOOGLE_API_KEY_ENV);
                eprintln!("  2. set api_key in the [google] section of config.ini");
                eprintln!("Run 'geopick init' to create a config file.");
            }
            CliError::Lookup(GeocodeError::ServiceStatus { .. }) => {
                eprintln!();
                eprintln!("If using the Google service, make sure:");
                eprintln!("  1. Geocoding API is enabled in Google Cloud Console");
                eprintln!("  2. Billing is enabled for your project");
                eprintln!("  3. Your API key is not restricted to other APIs");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(e) => write!(f, "{}", e),
            CliError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            CliError::HttpClient(e) => write!(f, "Failed to create HTTP client: {}", e),
            CliError::Lookup(e) => write!(f, "Reverse geocoding failed: {}", e),
            CliError::Map(e) => write!(f, "Map error: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::HttpClient(e) => Some(e),
            CliError::Lookup(e) => Some(e),
            CliError::Map(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e)
    }
}
