//! Core export pipeline for Chartex.
//!
//! # Modules
//!
//! - [`delivery`] - Turning an exported archive into files, a map, or uploads
//! - [`manager`] - [`ExportManager`], which ties transport and delivery together
//!
//! # Export Workflow
//!
//! 1. **Request**: The export configuration is posted to the export server
//! 2. **Receive**: The server answers with a zip archive
//! 3. **Deliver**: The archive is written to disk (optionally extracted),
//!    read into memory, or uploaded to a remote destination
//!
//! # Example
//!
//! ```rust,no_run
//! use chartex::config::load_config;
//! use chartex::core::ExportManager;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("chartex.toml")?;
//! let manager = ExportManager::from_config(&config.server)?;
//!
//! let contents = manager
//!     .export_as_stream(&config.export.options, config.export.bulk)
//!     .await?;
//! println!("{} files exported", contents.len());
//! # Ok(())
//! # }
//! ```

pub mod delivery;
pub mod manager;

pub use manager::ExportManager;
