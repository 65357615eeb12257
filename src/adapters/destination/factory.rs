//! Destination factory
//!
//! Builds the configured [`RemoteDestination`], if any.

use crate::adapters::destination::traits::RemoteDestination;
use crate::adapters::ftp::FtpUploader;
use crate::adapters::s3::ObjectStoreUploader;
use crate::config::schema::{ChartexConfig, DestinationKind};
use crate::domain::{ChartexError, Result};
use std::sync::Arc;

/// Create the remote destination selected by `destination.kind`
///
/// Returns `None` for [`DestinationKind::Local`], where exports stay on disk.
///
/// # Errors
///
/// Returns a configuration error if the section for the selected
/// destination is missing.
pub fn create_destination(config: &ChartexConfig) -> Result<Option<Arc<dyn RemoteDestination>>> {
    match config.destination.kind {
        DestinationKind::Local => Ok(None),
        DestinationKind::S3 => {
            let s3_config = config.s3.as_ref().ok_or_else(|| {
                ChartexError::Configuration("destination kind is s3 but [s3] is missing".to_string())
            })?;

            tracing::info!(bucket = %s3_config.bucket, "Creating object storage destination");
            Ok(Some(Arc::new(ObjectStoreUploader::from_config(s3_config))))
        }
        DestinationKind::Ftp => {
            let ftp_config = config.ftp.as_ref().ok_or_else(|| {
                ChartexError::Configuration("destination kind is ftp but [ftp] is missing".to_string())
            })?;

            tracing::info!(
                host = %ftp_config.host,
                dir = %ftp_config.remote_dir,
                "Creating FTP destination"
            );
            Ok(Some(Arc::new(FtpUploader::from_config(ftp_config))))
        }
    }
}
