//! # Origo CLI Module
//!
//! This module implements the CLI interface for Origo.
//!
//! ## Available Commands
//!
//! - `list` - List every source (default when no command is given)
//! - `show` - Show one source by id
//! - `default` - Show the default source
//! - `classify` - Classify a MIME type into an encoding format
//! - `check` - Validate the config and summarize the registry

mod commands;

use crate::config::OrigoConfig;
use crate::error::CliError;
use clap::{Parser, Subcommand};
use origo_core::{MAX_MACHINE_ID, SnowflakeGenerator, SourceRegistry};
use std::io::Write;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Origo - source registry
///
/// Builds the in-memory source registry from a config file and queries it.
#[derive(Parser, Debug)]
#[command(name = "origo")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the TOML config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Machine id for generated source ids (0-1023)
    #[arg(
        long,
        global = true,
        default_value = "0",
        value_parser = clap::value_parser!(u16).range(0..=i64::from(MAX_MACHINE_ID))
    )]
    pub machine_id: u16,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// List every source
    List,

    /// Show a source by id
    Show {
        /// 16-character hexadecimal source id
        #[arg(short, long)]
        id: String,
    },

    /// Show the default source
    Default,

    /// Classify a MIME type into an encoding format
    Classify {
        /// MIME type, matched exactly
        mime: String,
    },

    /// Validate the config and summarize the registry
    Check,
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments, writing results to `out`.
pub fn execute(cli: Cli, out: &mut dyn Write) -> Result<(), CliError> {
    let json_mode = cli.json_mode;
    match cli.command.clone().unwrap_or(Commands::List) {
        Commands::Classify { mime } => cmd_classify(out, json_mode, &mime),
        Commands::List => cmd_list(out, json_mode, &load_registry(&cli)?),
        Commands::Show { id } => cmd_show(out, json_mode, &load_registry(&cli)?, &id),
        Commands::Default => cmd_default(out, json_mode, &load_registry(&cli)?),
        Commands::Check => cmd_check(out, json_mode, &load_registry(&cli)?),
    }
}

/// Load the config (if any) and build the registry it describes.
fn load_registry(cli: &Cli) -> Result<SourceRegistry, CliError> {
    let config = match &cli.config {
        Some(path) => OrigoConfig::load(path)?,
        None => OrigoConfig::default(),
    };
    config.build_registry(SnowflakeGenerator::new(cli.machine_id))
}
