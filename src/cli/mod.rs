//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Chartex using clap.

pub mod commands;

use crate::config::{load_config, ChartexConfig, LoggingConfig};
use clap::{Parser, Subcommand};

/// Chartex - chart export client
#[derive(Parser, Debug)]
#[command(name = "chartex")]
#[command(version, about, long_about = None)]
#[command(author = "Chartex Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "chartex.toml", env = "CHARTEX_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "CHARTEX_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Log level and logging settings for this run, read from the
    /// configuration file when it loads
    pub fn logging_settings(&self) -> (String, LoggingConfig) {
        let config = load_config(&self.config).ok();
        logging_settings(self.log_level.as_deref(), config.as_ref())
    }
}

/// Picks the log level and logging settings
///
/// `--log-level` wins over `[application] log_level`. Without a loaded
/// configuration (`init`, or a file that fails to load) logging goes to the
/// console only.
pub fn logging_settings(
    cli_level: Option<&str>,
    config: Option<&ChartexConfig>,
) -> (String, LoggingConfig) {
    match config {
        Some(config) => (
            cli_level
                .unwrap_or(&config.application.log_level)
                .to_string(),
            config.logging.clone(),
        ),
        None => (
            cli_level.unwrap_or("info").to_string(),
            LoggingConfig {
                local_enabled: false,
                ..LoggingConfig::default()
            },
        ),
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export charts and deliver them to disk or the configured destination
    Export(commands::export::ExportArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
