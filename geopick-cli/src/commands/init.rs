//! Configuration initialization command.

use geopick::config::{config_file_path, ConfigFile};

use crate::error::CliError;

/// Write the default config file if it does not exist yet.
pub fn run() -> Result<(), CliError> {
    let path = config_file_path();
    let existed = path.exists();
    let path = ConfigFile::ensure_exists()?;

    if existed {
        println!("Config file already exists: {}", path.display());
    } else {
        println!("Created config file: {}", path.display());
        println!();
        println!("Edit it to choose a geocoding service or add a Google Maps API key.");
    }
    Ok(())
}
