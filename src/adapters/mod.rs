//! External system integrations for Chartex.
//!
//! This module provides adapters for the systems an export touches:
//!
//! - [`exporter`] - Export server transport (multipart over HTTP/HTTPS)
//! - [`destination`] - Remote destination abstraction and factory
//! - [`s3`] - S3-compatible object storage uploader
//! - [`ftp`] - FTP uploader
//!
//! # Design Pattern
//!
//! Adapters isolate external dependencies behind traits so the export
//! pipeline can be tested with fake implementations. Uploaders implement
//! [`destination::RemoteDestination`]; their network clients sit behind
//! connector traits ([`s3::ObjectStorageConnector`], [`ftp::FtpConnector`]).
//!
//! # Export Server
//!
//! ```rust,no_run
//! use chartex::adapters::exporter::{ExportClient, TransportOptions};
//! use chartex::domain::{ConnectionConfig, ExportConfig};
//!
//! # async fn example() -> chartex::domain::Result<()> {
//! let client = ExportClient::new(ConnectionConfig::default(), &TransportOptions::default())?;
//!
//! let mut config = ExportConfig::new();
//! config.set("type", "png");
//!
//! let archive = client.send(&config, false, true).await?;
//! println!("received {} bytes", archive.len());
//! # Ok(())
//! # }
//! ```

pub mod destination;
pub mod exporter;
pub mod ftp;
pub mod s3;
