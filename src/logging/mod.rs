//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Console output for interactive use
//! - Configurable log levels (`RUST_LOG` takes precedence)
//! - Local JSON file logging with rotation
//!
//! # Example
//!
//! ```no_run
//! use chartex::logging::init_logging;
//! use chartex::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the start of an export request
///
/// # Example
///
/// ```no_run
/// use chartex::log_export_start;
///
/// log_export_start!("http://127.0.0.1:1337", "disk");
/// ```
#[macro_export]
macro_rules! log_export_start {
    ($endpoint:expr, $mode:expr) => {
        tracing::info!(
            endpoint = %$endpoint,
            mode = $mode,
            "Starting export"
        );
    };
}

/// Log the completion of an export request
///
/// # Example
///
/// ```no_run
/// use chartex::log_export_complete;
/// use std::time::Duration;
///
/// log_export_complete!(3, Duration::from_millis(250));
/// ```
#[macro_export]
macro_rules! log_export_complete {
    ($count:expr, $duration:expr) => {
        tracing::info!(
            count = $count,
            duration_ms = $duration.as_millis(),
            "Export completed"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use chartex::log_error_with_context;
/// use chartex::domain::ChartexError;
///
/// let error = ChartexError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
