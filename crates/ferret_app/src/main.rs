mod platform;

use std::path::PathBuf;

use clap::Parser;
use ferret_logging::{ferret_info, ferret_warn};

use platform::config::{self, AppConfig};
use platform::logging::{self, LogDestination};

/// Terminal client for gopher menus and documents.
#[derive(Debug, Parser)]
#[command(name = "ferret", version)]
struct Cli {
    /// Address to open instead of the configured home page.
    url: Option<String>,
    /// Configuration file (RON).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Where log output goes.
    #[arg(long, value_enum)]
    log: Option<LogDestination>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.or_else(config::default_config_path);
    let (mut app_config, config_error) = match config_path.as_deref().map(config::load) {
        Some(Ok(loaded)) => (loaded, None),
        Some(Err(err)) => (AppConfig::default(), Some(err)),
        None => (AppConfig::default(), None),
    };
    if let Some(destination) = cli.log {
        app_config.log = destination;
    }
    if let Some(url) = cli.url {
        app_config.home = url;
    }

    logging::initialize(app_config.log);
    if let Some(err) = config_error {
        ferret_warn!("{:#}; using default configuration", err);
    }
    ferret_info!("Starting with home {}", app_config.home);

    platform::app::run_app(app_config)
}
