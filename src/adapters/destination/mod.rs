//! Remote destinations for exported files
//!
//! Implementations live in [`crate::adapters::s3`] and [`crate::adapters::ftp`];
//! [`create_destination`] picks one from configuration.

pub mod factory;
pub mod traits;

pub use factory::create_destination;
pub use traits::{FileUploadOutcome, RemoteDestination, UploadReport, UploadStatus};
