//! # Origo
//!
//! CLI front end for the origo-core source registry.
//!
//! - `cli`: clap argument structure and command implementations
//! - `config`: the TOML config file
//! - `error`: CLI error type

pub mod cli;
pub mod config;
pub mod error;

pub use config::OrigoConfig;
pub use error::CliError;
