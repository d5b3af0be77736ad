//! Single reverse geocoding lookup.

use clap::Args;
use geopick::config::ConfigFile;
use geopick::geocode::GeocodeResult;

use super::common::{geocoder_factory, parse_point, resolve_service, ServiceType};
use crate::error::CliError;

/// Arguments for the reverse command.
#[derive(Debug, Args)]
pub struct ReverseArgs {
    /// Latitude in decimal degrees
    #[arg(long, allow_hyphen_values = true)]
    pub lat: f64,

    /// Longitude in decimal degrees
    #[arg(long, allow_hyphen_values = true)]
    pub lng: f64,

    /// Geocoding service (defaults to [geocoding] service from config)
    #[arg(long, value_enum)]
    pub service: Option<ServiceType>,
}

/// Run the reverse command.
pub async fn run(args: ReverseArgs, config: &ConfigFile) -> Result<(), CliError> {
    let point = parse_point(args.lat, args.lng)?;
    let service = resolve_service(args.service, config);

    let geocoder_config = config
        .geocoder_configs()
        .into_iter()
        .find(|c| c.service() == service)
        .ok_or_else(|| CliError::InvalidArgument(format!("{} is not configured", service)))?;
    let geocoder = geocoder_factory(config)?
        .create(&geocoder_config)
        .map_err(CliError::Lookup)?;

    println!("Reverse geocoding {} via {}", point, service.name());
    let result = geocoder
        .lookup(point.lat, point.lng)
        .await
        .map_err(CliError::Lookup)?;

    print_result(&result);
    Ok(())
}

fn print_result(result: &GeocodeResult) {
    println!();
    println!("  Display name: {}", result.display_name);
    println!("  Address:      {}", result.summary());
    if let Some(code) = result
        .address
        .as_ref()
        .and_then(|address| address.country_code.as_deref())
    {
        println!("  Country code: {}", code);
    }
}
