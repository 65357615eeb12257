//! Object storage (S3-compatible) destination
//!
//! # Configuration
//!
//! ```toml
//! [destination]
//! kind = "s3"
//!
//! [s3]
//! bucket = "chart-exports"
//! access_key_id = "AKIA..."
//! secret_access_key = "${CHARTEX_S3_SECRET_ACCESS_KEY}"
//!
//! # Optional: for MinIO or other S3-compatible services
//! endpoint = "http://localhost:9000"
//! force_path_style = true
//! ```

pub mod client;
pub mod uploader;

pub use client::{AwsS3Client, AwsS3Connector, ObjectStorageClient, ObjectStorageConnector};
pub use uploader::ObjectStoreUploader;

/// Region used to list buckets before the target bucket's region is known
pub const DEFAULT_PROBE_REGION: &str = "us-west-2";
