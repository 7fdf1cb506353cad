//! Similar-Proxy main entry point
//!
//! This is the command-line interface for the Similar-Proxy server.

use clap::Parser;
use similar_proxy::config::{load_config_with_hash, validate, Config};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Similar-Proxy: JSON API over a movie/TV recommendation site
///
/// Serves autocomplete suggestions and scraped "similar titles" listings as
/// JSON. Every setting has a default, so the configuration file is optional.
#[derive(Parser, Debug)]
#[command(name = "similar-proxy")]
#[command(version = "1.0.0")]
#[command(about = "JSON proxy for movie and TV recommendations", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Port to listen on (overrides the configuration file)
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate the configuration, print it and exit
    #[arg(long)]
    check_config: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            match load_config_with_hash(path) {
                Ok((cfg, hash)) => {
                    tracing::info!("Configuration loaded successfully (hash: {})", hash);
                    cfg
                }
                Err(e) => {
                    tracing::error!("Failed to load configuration: {}", e);
                    return Err(e.into());
                }
            }
        }
        None => {
            tracing::info!("No configuration file given, using defaults");
            Config::default()
        }
    };

    if let Some(port) = cli.port {
        config.server.port = port;
        if let Err(e) = validate(&config) {
            tracing::error!("Invalid port override: {}", e);
            return Err(e.into());
        }
    }

    if cli.check_config {
        print_config(&config);
        return Ok(());
    }

    match similar_proxy::server::serve(&config).await {
        Ok(()) => Ok(()),
        Err(e) => {
            tracing::error!("Server failed: {}", e);
            Err(e.into())
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("similar_proxy=info,tower_http=info,warn"),
            1 => EnvFilter::new("similar_proxy=debug,tower_http=debug,info"),
            2 => EnvFilter::new("similar_proxy=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles --check-config: shows the effective configuration
fn print_config(config: &Config) {
    println!("=== Similar-Proxy Configuration ===\n");

    println!("Server:");
    println!("  Address: {}", config.server.address);
    println!("  Port: {}", config.server.port);

    println!("\nUpstream:");
    println!("  Base URL: {}", config.upstream.base_url);
    println!(
        "  Request timeout: {}s",
        config.upstream.request_timeout_secs
    );
    println!(
        "  Connect timeout: {}s",
        config.upstream.connect_timeout_secs
    );

    println!("\nPagination:");
    println!("  Max pages: {}", config.pagination.max_pages);
    println!("  Page delay: {}ms", config.pagination.page_delay_ms);
    println!("  Min page size: {} bytes", config.pagination.min_page_bytes);

    println!("\n✓ Configuration is valid");
}
