//! # Origo - Source Registry
//!
//! The main binary for the Origo source registry.
//!
//! Every invocation builds the registry in memory from the config file,
//! bootstraps the default source, runs one command and exits.
//!
//! ## Usage
//!
//! ```bash
//! origo --config origo.toml list
//! origo --config origo.toml show --id 020f755c3c082000
//! origo default --json-mode
//! origo classify application/x-msgpack
//! origo --config origo.toml check
//! ```

use clap::Parser;
use origo::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() {
    // ORIGO_LOG_FORMAT=json enables machine-parseable output.
    // Logs go to stderr; stdout carries command output only.
    let log_format = std::env::var("ORIGO_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "origo=info,origo_core=info".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    let cli = cli::Cli::parse();

    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if let Err(e) = cli::execute(cli, &mut out) {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the Origo startup banner.
fn print_banner() {
    println!("Origo source registry v{}", env!("CARGO_PKG_VERSION"));
    println!();
}
