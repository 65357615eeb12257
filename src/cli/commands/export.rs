//! Export command implementation
//!
//! This module implements the `export` command: it sends the configured
//! export request and writes the result to disk or uploads it to the
//! configured destination.

use crate::adapters::destination::{create_destination, UploadReport};
use crate::config::{load_config, ChartexConfig, DestinationKind};
use crate::core::ExportManager;
use crate::domain::{ChartexError, OptionValue};
use crate::log_error_with_context;
use clap::Args;
use std::path::{Path, PathBuf};

/// Arguments for the export command
#[derive(Args, Debug, Default)]
pub struct ExportArgs {
    /// Override the output directory
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Output type sent as the `type` option (png, jpeg, svg, pdf)
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    pub export_type: Option<String>,

    /// Chart configuration file sent as the `chartConfig` option
    #[arg(long, value_name = "PATH")]
    pub chart_config: Option<PathBuf>,

    /// Template file sent as the `template` option
    #[arg(long, value_name = "PATH")]
    pub template: Option<PathBuf>,

    /// Keep the archive instead of extracting it
    #[arg(long)]
    pub no_unzip: bool,

    /// Send a single (non-bulk) export request
    #[arg(long)]
    pub no_bulk: bool,

    /// Override the destination (local, s3, ftp)
    #[arg(short, long, value_name = "KIND")]
    pub destination: Option<DestinationKind>,
}

impl ExportArgs {
    /// Execute the export command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Starting export command");

        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                log_error_with_context!(&e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        self.apply_overrides(&mut config);

        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(2);
        }

        if config.export.options.is_empty() {
            eprintln!("Nothing to export: no export options configured");
            return Ok(2);
        }

        let manager = match ExportManager::from_config(&config.server) {
            Ok(m) => m,
            Err(e) => {
                log_error_with_context!(&e, "Failed to create export manager");
                eprintln!("Failed to initialize export: {e}");
                return Ok(4); // Connection error exit code
            }
        };

        let destination = match create_destination(&config) {
            Ok(d) => d,
            Err(e) => {
                eprintln!("Failed to create destination: {e}");
                return Ok(2);
            }
        };

        println!("🚀 Exporting from {}", manager.connection());

        match destination {
            None => {
                let output_dir = Path::new(&config.export.output_dir);
                let result = manager
                    .export(
                        &config.export.options,
                        output_dir,
                        config.export.unzip,
                        config.export.bulk,
                    )
                    .await;

                match result {
                    Ok(paths) => {
                        println!();
                        println!("📁 Exported files:");
                        for path in &paths {
                            println!("  {}", path.display());
                        }
                        println!();
                        println!("✅ Export completed successfully!");
                        Ok(0)
                    }
                    Err(e) => Ok(failure_exit_code(&e)),
                }
            }
            Some(destination) => {
                let result = manager
                    .export_to(&config.export.options, config.export.bulk, destination.as_ref())
                    .await;

                match result {
                    Ok(report) => {
                        report.log_summary();
                        Ok(print_upload_summary(&report))
                    }
                    Err(e) => Ok(failure_exit_code(&e)),
                }
            }
        }
    }

    /// Apply command-line overrides on top of the loaded configuration
    fn apply_overrides(&self, config: &mut ChartexConfig) {
        if let Some(ref dir) = self.output_dir {
            tracing::info!(output_dir = %dir.display(), "Overriding output directory from CLI");
            config.export.output_dir = dir.to_string_lossy().into_owned();
        }

        if let Some(ref export_type) = self.export_type {
            config.export.options.set("type", export_type.as_str());
        }

        if let Some(ref path) = self.chart_config {
            config
                .export
                .options
                .set("chartConfig", OptionValue::Path(path.clone()));
        }

        if let Some(ref path) = self.template {
            config
                .export
                .options
                .set("template", OptionValue::Path(path.clone()));
        }

        if self.no_unzip {
            config.export.unzip = false;
        }

        if self.no_bulk {
            config.export.bulk = false;
        }

        if let Some(kind) = self.destination {
            tracing::info!(destination = %kind, "Overriding destination from CLI");
            config.destination.kind = kind;
        }
    }
}

/// Print the upload report and pick the exit code
fn print_upload_summary(report: &UploadReport) -> i32 {
    println!();
    println!("📊 Upload Summary ({}):", report.destination);
    println!("  Total: {}", report.total());
    println!("  Uploaded: {}", report.success_count());
    println!("  Failed: {}", report.failure_count());
    println!("  Duration: {:.2}s", report.duration.as_secs_f64());
    println!();

    if report.is_successful() {
        println!("✅ Export completed successfully!");
        0
    } else {
        println!("⚠️  Errors encountered:");
        for outcome in report.failures() {
            println!("  - {}: {:?}", outcome.name, outcome.status);
        }
        println!();
        println!("⚠️  Export completed with failures");
        1 // Partial success
    }
}

/// Exit code for a failed export
fn failure_exit_code(error: &ChartexError) -> i32 {
    log_error_with_context!(error, "Export failed");
    eprintln!("Export failed: {error}");

    match error {
        ChartexError::Configuration(_) | ChartexError::Validation(_) => 2,
        e if e.is_connection_error() => 4,
        _ => 5,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FtpError, StorageError, TransportError};

    #[test]
    fn test_export_args_defaults() {
        let args = ExportArgs::default();
        assert!(args.output_dir.is_none());
        assert!(!args.no_unzip);
        assert!(!args.no_bulk);
        assert!(args.destination.is_none());
    }

    #[test]
    fn test_overrides_are_applied() {
        let args = ExportArgs {
            output_dir: Some(PathBuf::from("/tmp/charts")),
            export_type: Some("svg".to_string()),
            chart_config: Some(PathBuf::from("chart.json")),
            template: None,
            no_unzip: true,
            no_bulk: true,
            destination: Some(DestinationKind::Ftp),
        };
        let mut config = ChartexConfig::default();

        args.apply_overrides(&mut config);

        assert_eq!(config.export.output_dir, "/tmp/charts");
        assert_eq!(
            config.export.options.get("type"),
            Some(&OptionValue::Text("svg".to_string()))
        );
        assert_eq!(
            config.export.options.get("chartConfig"),
            Some(&OptionValue::Path(PathBuf::from("chart.json")))
        );
        assert!(!config.export.options.contains("template"));
        assert!(!config.export.unzip);
        assert!(!config.export.bulk);
        assert_eq!(config.destination.kind, DestinationKind::Ftp);
    }

    #[test]
    fn test_failure_exit_codes() {
        let transport = ChartexError::Transport(TransportError::ConnectionFailed("refused".into()));
        let login = ChartexError::Ftp(FtpError::LoginFailed("530".into()));
        let bucket = ChartexError::Storage(StorageError::BucketNotFound("charts".into()));
        let config = ChartexError::Configuration("bad".into());

        assert_eq!(failure_exit_code(&transport), 4);
        assert_eq!(failure_exit_code(&login), 4);
        assert_eq!(failure_exit_code(&bucket), 5);
        assert_eq!(failure_exit_code(&config), 2);
    }

    #[test]
    fn test_upload_summary_exit_codes() {
        let mut report = UploadReport::new("s3");
        report.record_success("a.png");
        assert_eq!(print_upload_summary(&report), 0);

        report.record_failure("b.png", "AccessDenied");
        assert_eq!(print_upload_summary(&report), 1);
    }
}
