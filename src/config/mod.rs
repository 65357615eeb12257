//! Configuration management for Chartex.
//!
//! Chartex reads a TOML file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `CHARTEX_*` environment overrides
//! - Default values for optional settings
//! - Validation of every section
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use chartex::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("chartex.toml")?;
//!
//! println!("Export server: {}", config.server.connection());
//! println!("Destination: {}", config.destination.kind);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level
//! - [`ServerConfig`] - Export server host, port, TLS and request flags
//! - [`ExportSettings`] - Output directory, unzip/bulk flags, export options
//! - [`DestinationConfig`] - Where exported files are delivered
//! - [`S3Config`] - Object storage bucket and credentials
//! - [`FtpConfig`] - FTP server, login and remote directory
//! - [`LoggingConfig`] - File logging
//!
//! # Example Configuration
//!
//! ```toml
//! [server]
//! host = "127.0.0.1"
//! port = 1337
//!
//! [export]
//! output_dir = "./exported"
//! unzip = true
//!
//! [export.options]
//! type = "png"
//! chartConfig = { path = "resources/multiple.json" }
//!
//! [destination]
//! kind = "ftp"
//!
//! [ftp]
//! host = "ftp.example.com"
//! username = "charts"
//! password = "${CHARTEX_FTP_PASSWORD}"
//! remote_dir = "reports"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, parse_config};
pub use schema::{
    ApplicationConfig, ChartexConfig, DestinationConfig, DestinationKind, ExportSettings,
    FtpConfig, LoggingConfig, S3Config, ServerConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
