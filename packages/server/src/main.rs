#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Accident map dashboard server binary.

use std::path::PathBuf;

use accident_map_server::config::DashboardConfig;
use clap::Parser;

#[derive(Parser)]
#[command(name = "accident_map_server")]
#[command(about = "Serve the accident map dashboard API")]
struct Cli {
    /// TOML configuration file
    #[arg(long, env = "DASHBOARD_CONFIG")]
    config: Option<PathBuf>,

    /// Directory holding `lat_lon_districts.csv`, `accidents.csv` and `lad.json`
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Prompt for the bind address and port before starting
    #[arg(long, short)]
    interactive: bool,
}

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let cli = Cli::parse();

    let mut config = DashboardConfig::resolve(cli.config.as_deref())?;
    if let Some(dir) = &cli.data_dir {
        config.use_data_dir(dir);
    }

    if cli.interactive {
        accident_map_server::interactive::run(config).await?;
    } else {
        accident_map_server::run_server(config).await?;
    }

    Ok(())
}
