// Chartex - Chart Export Client
// Copyright (c) 2025 Chartex Contributors
// Licensed under the MIT License

//! # Chartex - Chart Export Client
//!
//! Chartex sends chart export requests to a remote export server and
//! delivers the rendered files it returns.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Requesting** exports over HTTP/HTTPS as multipart forms
//! - **Delivering** the returned archive to disk, extracted or as-is
//! - **Reading** the archive into memory without touching the disk
//! - **Uploading** exported files to S3-compatible object storage or FTP
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Export pipeline (manager and delivery modes)
//! - [`adapters`] - External integrations (export server, S3, FTP)
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chartex::core::ExportManager;
//! use chartex::domain::{ConnectionConfig, ExportConfig};
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let manager = ExportManager::new(ConnectionConfig::new("127.0.0.1", 1337, false))?;
//!
//!     let mut config = ExportConfig::new();
//!     config.set("type", "png");
//!     config.set("chartConfig", Path::new("chart.json"));
//!
//!     let files = manager.export(&config, Path::new("exports"), true, true).await?;
//!     println!("Exported {} files", files.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Uploading
//!
//! Uploaders implement [`adapters::destination::RemoteDestination`]. Per-file
//! failures are collected in the returned report:
//!
//! ```rust,no_run
//! use chartex::adapters::ftp::FtpUploader;
//! use chartex::config::{secret_string, FtpConfig};
//! use chartex::core::ExportManager;
//! use chartex::domain::{ConnectionConfig, ExportConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let ftp = FtpUploader::from_config(&FtpConfig {
//!     host: "ftp.example.com".to_string(),
//!     port: 21,
//!     username: "charts".to_string(),
//!     password: secret_string("secret".to_string()),
//!     remote_dir: "reports".to_string(),
//! });
//!
//! let manager = ExportManager::new(ConnectionConfig::default())?;
//! let mut config = ExportConfig::new();
//! config.set("type", "svg");
//!
//! let report = manager.export_to(&config, true, &ftp).await?;
//! report.log_summary();
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Chartex uses the [`domain::ChartexError`] type for all errors:
//!
//! ```rust,no_run
//! use chartex::domain::ChartexError;
//!
//! fn example() -> Result<(), ChartexError> {
//!     let config = chartex::config::load_config("chartex.toml")?;
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
