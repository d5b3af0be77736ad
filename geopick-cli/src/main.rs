//! geopick CLI - Command-line interface
//!
//! This binary provides a command-line interface to the geopick library.

mod commands;
mod error;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use geopick::config::ConfigFile;
use geopick::logging::{init_logging, split_log_path, LoggingGuard};

use commands::demo::DemoArgs;
use commands::reverse::ReverseArgs;
use error::CliError;

#[derive(Parser)]
#[command(name = "geopick")]
#[command(version = geopick::VERSION)]
#[command(about = "Pick a coordinate, show it on several map engines, and reverse-geocode it", long_about = None)]
struct Cli {
    /// Config file to use instead of ~/.geopick/config.ini
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve one coordinate to an address
    Reverse(ReverseArgs),

    /// Run the pick, debounce and display pipeline on the headless map SDK
    Demo(DemoArgs),

    /// Create the default config file if it does not exist
    Init,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        e.exit();
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    if let Commands::Init = cli.command {
        return commands::init::run();
    }

    let config = match &cli.config {
        Some(path) => ConfigFile::load_from(path)?,
        None => ConfigFile::load()?,
    };
    let _logging = start_logging(&config)?;

    match cli.command {
        Commands::Reverse(args) => commands::reverse::run(args, &config).await,
        Commands::Demo(args) => commands::demo::run(args, &config).await,
        Commands::Init => Ok(()),
    }
}

fn start_logging(config: &ConfigFile) -> Result<LoggingGuard, CliError> {
    let (dir, file) = split_log_path(&config.logging.file);
    init_logging(&dir, &file).map_err(|e| CliError::LoggingInit(e.to_string()))
}
