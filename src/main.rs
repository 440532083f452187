use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vin_cache::{
    config::Config,
    database::Database,
    decoder::NhtsaDecoder,
    services::VinCacheService,
    web::{AppState, WebServer},
};

#[derive(Parser)]
#[command(name = "vin-cache")]
#[command(version)]
#[command(about = "Decode VINs through NHTSA vPIC with a local lookaside cache")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Listening IP address
    #[arg(short = 'H', long, value_name = "IP")]
    host: Option<String>,

    /// Listening port
    #[arg(short, long, value_name = "PORT")]
    port: Option<u16>,

    /// Database URL (overrides config file)
    #[arg(short = 'd', long, value_name = "URL")]
    database_url: Option<String>,

    /// Log level
    #[arg(short = 'v', long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging with specified level
    let log_filter = if cli.log_level == "trace" {
        format!("vin_cache={},tower_http=trace", cli.log_level)
    } else {
        format!("vin_cache={},tower_http=info", cli.log_level)
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting VIN Cache Service v{}", env!("CARGO_PKG_VERSION"));

    let mut config = Config::load_from_file(&cli.config)?;
    info!("Configuration loaded from: {}", cli.config);

    // Override config with CLI arguments
    if let Some(host) = cli.host {
        config.web.host = host;
    }
    if let Some(port) = cli.port {
        config.web.port = port;
    }
    if let Some(database_url) = cli.database_url {
        config.database.url = database_url;
    }

    info!("Using database: {}", config.database.url);
    let database = Database::new(&config.database).await?;
    database.migrate().await?;
    info!("Database connection established and migrations applied");

    let decoder = NhtsaDecoder::from_config(&config.decoder)
        .context("Failed to build decoder HTTP client")?;
    info!(
        "Decoder configured: {} (timeout {})",
        config.decoder.base_url, config.decoder.timeout
    );

    let vin_cache = VinCacheService::new(&database, Arc::new(decoder));
    let web_server = WebServer::new(AppState::new(config, database, vin_cache))?;

    info!(
        "Starting web server on {}:{}",
        web_server.host(),
        web_server.port()
    );
    web_server.serve().await?;

    info!("VIN Cache Service stopped");
    Ok(())
}
