//! Domain models and types for Chartex.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Request types** ([`ExportConfig`], [`OptionValue`], [`ConnectionConfig`])
//! - **Result artifacts** ([`ExportedFile`])
//! - **Error types** ([`ChartexError`], [`TransportError`], [`ArchiveError`],
//!   [`StorageError`], [`FtpError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, ChartexError>`]:
//!
//! ```rust
//! use chartex::domain::{ChartexError, Result};
//!
//! fn example() -> Result<()> {
//!     // Errors are automatically converted using the ? operator
//!     let config = chartex::config::load_config("chartex.toml")?;
//!     Ok(())
//! }
//! ```

pub mod connection;
pub mod errors;
pub mod export_config;
pub mod exported;
pub mod result;

// Re-export commonly used types for convenience
pub use connection::{ConnectionConfig, DEFAULT_HOST, DEFAULT_PORT};
pub use errors::{ArchiveError, ChartexError, FtpError, StorageError, TransportError};
pub use export_config::{ExportConfig, OptionValue};
pub use exported::ExportedFile;
pub use result::Result;
