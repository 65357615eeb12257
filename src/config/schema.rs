//! Configuration schema types
//!
//! This module defines the configuration structure for Chartex.

use crate::config::SecretString;
use crate::domain::{ConnectionConfig, ExportConfig, DEFAULT_HOST, DEFAULT_PORT};
use serde::{Deserialize, Serialize};

/// Where exported files end up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DestinationKind {
    /// Local output directory only
    #[default]
    Local,
    /// S3-compatible object storage
    S3,
    /// FTP server
    Ftp,
}

impl std::str::FromStr for DestinationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" => Ok(DestinationKind::Local),
            "s3" => Ok(DestinationKind::S3),
            "ftp" => Ok(DestinationKind::Ftp),
            other => Err(format!(
                "Invalid destination '{other}'. Must be one of: local, s3, ftp"
            )),
        }
    }
}

impl std::fmt::Display for DestinationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DestinationKind::Local => "local",
            DestinationKind::S3 => "s3",
            DestinationKind::Ftp => "ftp",
        };
        f.write_str(name)
    }
}

/// Main Chartex configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartexConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Export server connection
    #[serde(default)]
    pub server: ServerConfig,

    /// Export request and local output settings
    #[serde(default)]
    pub export: ExportSettings,

    /// Remote destination selection
    #[serde(default)]
    pub destination: DestinationConfig,

    /// Object storage settings (required if destination.kind = "s3")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s3: Option<S3Config>,

    /// FTP settings (required if destination.kind = "ftp")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ftp: Option<FtpConfig>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ChartexConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.server.validate()?;
        self.export.validate()?;

        // Only the section of the active destination has to be present
        match self.destination.kind {
            DestinationKind::Local => {}
            DestinationKind::S3 => match self.s3 {
                Some(ref config) => config.validate()?,
                None => {
                    return Err(
                        "s3 configuration is required when destination.kind = 's3'".to_string()
                    )
                }
            },
            DestinationKind::Ftp => match self.ftp {
                Some(ref config) => config.validate()?,
                None => {
                    return Err(
                        "ftp configuration is required when destination.kind = 'ftp'".to_string()
                    )
                }
            },
        }

        self.logging.validate()?;
        Ok(())
    }
}

impl Default for ChartexConfig {
    fn default() -> Self {
        Self {
            application: ApplicationConfig::default(),
            server: ServerConfig::default(),
            export: ExportSettings::default(),
            destination: DestinationConfig::default(),
            s3: None,
            ftp: None,
            logging: LoggingConfig::default(),
        }
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Export server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Export server host
    #[serde(default = "default_host")]
    pub host: String,

    /// Export server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Use HTTPS
    #[serde(default)]
    pub secure: bool,

    /// TLS certificate verification for secure connections
    ///
    /// **SECURITY WARNING**: disabling verification exposes the export request
    /// to man-in-the-middle attacks. Only use it against self-signed
    /// development servers.
    #[serde(default = "default_true")]
    pub tls_verify: bool,

    /// Ask the server to minify bundled static resources
    #[serde(default)]
    pub minify_resources: bool,

    /// Client-side request timeout; unset leaves the transport default
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
}

impl ServerConfig {
    fn validate(&self) -> Result<(), String> {
        if self.host.trim().is_empty() {
            return Err("server.host cannot be empty".to_string());
        }

        if self.host.contains("://") {
            return Err(
                "server.host must be a bare host name; use server.secure to select https"
                    .to_string(),
            );
        }

        if self.port == 0 {
            return Err("server.port must be > 0".to_string());
        }

        if self.timeout_seconds == Some(0) {
            return Err("server.timeout_seconds must be > 0 when set".to_string());
        }

        Ok(())
    }

    /// Connection settings for an export manager
    pub fn connection(&self) -> ConnectionConfig {
        ConnectionConfig::new(self.host.clone(), self.port, self.secure)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            secure: false,
            tls_verify: true,
            minify_resources: false,
            timeout_seconds: None,
        }
    }
}

/// Export request and local output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportSettings {
    /// Directory receiving the archive or its extracted files
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Extract the archive after download
    #[serde(default = "default_true")]
    pub unzip: bool,

    /// Request a bulk (batch) export
    #[serde(default = "default_true")]
    pub bulk: bool,

    /// Options forwarded to the export server
    #[serde(default)]
    pub options: ExportConfig,
}

impl ExportSettings {
    fn validate(&self) -> Result<(), String> {
        if self.output_dir.trim().is_empty() {
            return Err("export.output_dir cannot be empty".to_string());
        }
        Ok(())
    }
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            unzip: true,
            bulk: true,
            options: ExportConfig::default(),
        }
    }
}

/// Remote destination selection
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DestinationConfig {
    /// Destination kind (local, s3, ftp)
    #[serde(default)]
    pub kind: DestinationKind,
}

/// S3-compatible object storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Config {
    /// Target bucket; it must already exist
    pub bucket: String,

    /// Access key id
    pub access_key_id: String,

    /// Secret access key
    /// Stored securely in memory and automatically zeroized on drop
    pub secret_access_key: SecretString,

    /// Region used to list buckets before the bucket's own region is known
    #[serde(default = "default_probe_region")]
    pub probe_region: String,

    /// Custom endpoint for S3-compatible services (MinIO, etc.)
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Use path-style requests (required for MinIO)
    #[serde(default)]
    pub force_path_style: bool,
}

impl S3Config {
    fn validate(&self) -> Result<(), String> {
        use secrecy::ExposeSecret;

        if self.bucket.is_empty() {
            return Err("s3.bucket cannot be empty".to_string());
        }

        if self.access_key_id.is_empty() {
            return Err("s3.access_key_id cannot be empty".to_string());
        }

        if self.secret_access_key.expose_secret().is_empty() {
            return Err("s3.secret_access_key cannot be empty".to_string());
        }

        if self.probe_region.is_empty() {
            return Err("s3.probe_region cannot be empty".to_string());
        }

        if let Some(ref endpoint) = self.endpoint {
            if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                return Err("s3.endpoint must start with http:// or https://".to_string());
            }
        }

        Ok(())
    }
}

/// FTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FtpConfig {
    /// FTP host
    pub host: String,

    /// FTP port
    #[serde(default = "default_ftp_port")]
    pub port: u16,

    /// Login user
    pub username: String,

    /// Login password
    /// Stored securely in memory and automatically zeroized on drop
    pub password: SecretString,

    /// Directory (relative to the login directory) receiving the files;
    /// created when missing
    pub remote_dir: String,
}

impl FtpConfig {
    fn validate(&self) -> Result<(), String> {
        if self.host.is_empty() {
            return Err("ftp.host cannot be empty".to_string());
        }

        if self.port == 0 {
            return Err("ftp.port must be > 0".to_string());
        }

        if self.username.is_empty() {
            return Err("ftp.username cannot be empty".to_string());
        }

        if self.remote_dir.trim().is_empty() {
            return Err("ftp.remote_dir cannot be empty".to_string());
        }

        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local JSON file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily, hourly)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.is_empty() {
            return Err("logging.local_path cannot be empty when local logging is enabled".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_output_dir() -> String {
    ".".to_string()
}

fn default_probe_region() -> String {
    crate::adapters::s3::DEFAULT_PROBE_REGION.to_string()
}

fn default_ftp_port() -> u16 {
    21
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
