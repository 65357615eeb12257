//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "chartex.toml")]
    pub output: String,

    /// Include commented sections for every destination
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing Chartex configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2); // Configuration error exit code
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your export server and options", self.output);
                println!("  2. Optionally set destination.kind to 's3' or 'ftp'");
                println!("  3. Put credentials in a .env file:");
                println!("     - CHARTEX_S3_SECRET_ACCESS_KEY (if using S3)");
                println!("     - CHARTEX_FTP_PASSWORD (if using FTP)");
                println!("  4. Validate configuration: chartex validate-config");
                println!("  5. Run export: chartex export");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5) // Fatal error exit code
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# Chartex Configuration File

[application]
log_level = "info"

[server]
host = "127.0.0.1"
port = 1337
secure = false

[export]
output_dir = "./exports"
unzip = true
bulk = true

[export.options]
type = "png"
chartConfig = { path = "chart.json" }

[destination]
kind = "local"
"#
        .to_string()
    }

    /// Generate configuration with examples
    fn generate_config_with_examples() -> String {
        r#"# Chartex Configuration File
#
# Values of the form ${VAR} are substituted from the environment.
# Any setting can also be overridden with CHARTEX_<SECTION>_<KEY>,
# e.g. CHARTEX_SERVER_HOST or CHARTEX_FTP_PASSWORD.

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level: trace, debug, info, warn, error
log_level = "info"

# ============================================================================
# Export Server
# ============================================================================
[server]
host = "127.0.0.1"
port = 1337

# Use https instead of http
secure = false

# Verify TLS certificates when secure = true
tls_verify = true

# Ask the server to minify chart resources
minify_resources = false

# Request timeout in seconds (unset = no client-side timeout)
# timeout_seconds = 60

# ============================================================================
# Export Settings
# ============================================================================
[export]
# Directory receiving exported files (created when missing)
output_dir = "./exports"

# Extract the returned archive; false keeps the archive itself
unzip = true

# Mark requests as bulk exports
bulk = true

# Options forwarded to the export server.
# - strings are sent as text fields
# - { path = "..." } sends the file content (relative to this file)
# - anything else is sent as JSON text
[export.options]
type = "png"
chartConfig = { path = "chart.json" }
# template = { path = "template.json" }
# scale = 2

# ============================================================================
# Destination: local | s3 | ftp
# ============================================================================
[destination]
kind = "local"

# ----------------------------------------------------------------------------
# S3-compatible object storage (destination.kind = "s3")
# The bucket must already exist.
# ----------------------------------------------------------------------------
# [s3]
# bucket = "chart-exports"
# access_key_id = "${CHARTEX_S3_ACCESS_KEY_ID}"
# secret_access_key = "${CHARTEX_S3_SECRET_ACCESS_KEY}"
# probe_region = "us-west-2"
# endpoint = "http://localhost:9000"   # MinIO and other S3-compatible services
# force_path_style = true

# ----------------------------------------------------------------------------
# FTP (destination.kind = "ftp")
# remote_dir is created when missing.
# ----------------------------------------------------------------------------
# [ftp]
# host = "ftp.example.com"
# port = 21
# username = "charts"
# password = "${CHARTEX_FTP_PASSWORD}"
# remote_dir = "reports"

# ============================================================================
# Logging
# ============================================================================
[logging]
# JSON log files in addition to console output
local_enabled = false
local_path = "./logs"

# Rotation: daily | hourly
local_rotation = "daily"
"#
        .to_string()
    }
}
