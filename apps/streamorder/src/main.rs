//! # Streamorder - Stream Order Engine
//!
//! The command-line binary for computing Strahler order and Shreve magnitude
//! over river networks.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │          apps/streamorder (THE BINARY)        │
//! │                                               │
//! │   ┌─────────────┐        ┌────────────────┐   │
//! │   │    CLI      │        │  Config (toml) │   │
//! │   │   (clap)    │        │  + tracing     │   │
//! │   └──────┬──────┘        └───────┬────────┘   │
//! │          └──────────┬────────────┘            │
//! │                     ▼                         │
//! │           ┌───────────────────┐               │
//! │           │ streamorder-core  │               │
//! │           │   (THE LOGIC)     │               │
//! │           └───────────────────┘               │
//! └───────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! streamorder compute -i network.json -s 12 --engine strahler
//! streamorder compute -i network.json -s 12 --rule all --json-mode
//! streamorder inspect -i network.srn
//! streamorder convert -i network.json -o network.srn
//! ```

use clap::Parser;
use streamorder::cli;
use streamorder::config::{Config, LogFormat};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() {
    let cli = cli::Cli::parse();

    // Config errors are reported after logging is up.
    let config = Config::load(cli.config.as_deref());
    let defaults = Config::default();
    let active = config.as_ref().unwrap_or(&defaults);

    init_tracing(active, cli.verbose, cli.quiet);

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = cli::execute(cli, &config) {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing on stderr.
///
/// Filter precedence: `RUST_LOG`, then `--verbose`/`--quiet`, then the
/// config file, then `streamorder=info`. `STREAMORDER_LOG_FORMAT=json`
/// overrides the configured format.
fn init_tracing(config: &Config, verbose: bool, quiet: bool) {
    let fallback = if verbose {
        "streamorder=debug".to_string()
    } else if quiet {
        "streamorder=warn".to_string()
    } else {
        config
            .logging
            .filter
            .clone()
            .unwrap_or_else(|| "streamorder=info".to_string())
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    let format = match std::env::var("STREAMORDER_LOG_FORMAT").as_deref() {
        Ok("json") => LogFormat::Json,
        Ok("text") => LogFormat::Text,
        _ => config.logging.format,
    };

    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}
