//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the Chartex configuration file.

use crate::config::{load_config, ChartexConfig, DestinationKind};
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    ///
    /// Loading already validates, so a load failure and a validation
    /// failure both map to exit code 2.
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        match load_config(config_path) {
            Ok(config) => {
                println!("✅ Configuration is valid");
                println!();
                for line in summary_lines(&config) {
                    println!("{line}");
                }
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                println!();
                Ok(2) // Configuration error exit code
            }
        }
    }
}

/// Human-readable summary; secrets are never included
fn summary_lines(config: &ChartexConfig) -> Vec<String> {
    let mut lines = vec![
        "Configuration Summary:".to_string(),
        format!("  Log Level: {}", config.application.log_level),
        format!("  Export Server: {}", config.server.connection()),
        format!("  Minify Resources: {}", config.server.minify_resources),
        format!("  Output Directory: {}", config.export.output_dir),
        format!("  Unzip: {}", config.export.unzip),
        format!("  Bulk: {}", config.export.bulk),
        format!(
            "  Export Options: {}",
            config
                .export
                .options
                .iter()
                .map(|(name, _)| name)
                .collect::<Vec<_>>()
                .join(", ")
        ),
        format!("  Destination: {}", config.destination.kind),
    ];

    match config.destination.kind {
        DestinationKind::Local => {}
        DestinationKind::S3 => {
            if let Some(ref s3) = config.s3 {
                lines.push(format!("  S3 Bucket: {}", s3.bucket));
                if let Some(ref endpoint) = s3.endpoint {
                    lines.push(format!("  S3 Endpoint: {endpoint}"));
                }
            }
        }
        DestinationKind::Ftp => {
            if let Some(ref ftp) = config.ftp {
                lines.push(format!("  FTP Server: {}:{}", ftp.host, ftp.port));
                lines.push(format!("  FTP Directory: {}", ftp.remote_dir));
            }
        }
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_summary_hides_ftp_password() {
        let config = parse_config(
            r#"
[destination]
kind = "ftp"

[ftp]
host = "ftp.example.com"
username = "charts"
password = "hunter2"
remote_dir = "reports"
"#,
        )
        .unwrap();

        let summary = summary_lines(&config).join("\n");
        assert!(summary.contains("FTP Server: ftp.example.com:21"));
        assert!(summary.contains("FTP Directory: reports"));
        assert!(!summary.contains("hunter2"));
    }

    #[tokio::test]
    async fn test_execute_exit_codes() {
        let mut valid = NamedTempFile::new().unwrap();
        writeln!(valid, "[server]\nport = 7801").unwrap();
        let code = ValidateArgs {}
            .execute(valid.path().to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(code, 0);

        let mut invalid = NamedTempFile::new().unwrap();
        writeln!(invalid, "[server]\nport = 0").unwrap();
        let code = ValidateArgs {}
            .execute(invalid.path().to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(code, 2);
    }
}
