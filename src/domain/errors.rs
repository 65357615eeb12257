//! Domain error types
//!
//! This module defines the error hierarchy for Chartex. Each external
//! collaborator (export server, archive codec, object storage, FTP) has its
//! own error enum, and all of them fold into [`ChartexError`].
//! None of the variants expose third-party types.

use thiserror::Error;

/// Main Chartex error type
///
/// This is the primary error type used throughout the crate.
#[derive(Debug, Error)]
pub enum ChartexError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Export server transport errors
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Archive extraction errors
    #[error("Archive error: {0}")]
    Archive(#[from] ArchiveError),

    /// Object storage errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// FTP errors
    #[error("FTP error: {0}")]
    Ftp(#[from] FtpError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl ChartexError {
    /// Whether the error came from talking to a remote endpoint
    /// (export server, object storage or FTP server)
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            ChartexError::Transport(_)
                | ChartexError::Storage(StorageError::ListBucketsFailed(_))
                | ChartexError::Ftp(FtpError::ConnectionFailed(_))
                | ChartexError::Ftp(FtpError::LoginFailed(_))
        )
    }
}

/// Export server transport errors
///
/// Raised by the export client when the request cannot be delivered or the
/// response cannot be read back in full.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Failed to connect to the export server
    #[error("Failed to connect to export server: {0}")]
    ConnectionFailed(String),

    /// The request could not be built (unreadable input file, bad URL)
    #[error("Invalid export request: {0}")]
    InvalidRequest(String),

    /// Server answered with a non-success status
    #[error("Export server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// Response body ended early or was empty
    #[error("Export response truncated: {0}")]
    ResponseTruncated(String),

    /// Configured client-side timeout elapsed
    #[error("Export request timeout: {0}")]
    Timeout(String),
}

/// Archive errors
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// Archive cannot be opened (corrupt or truncated payload)
    #[error("Failed to open exported archive: {0}")]
    Open(String),

    /// A member could not be read
    #[error("Failed to read archive entry {index}: {message}")]
    ReadEntry { index: usize, message: String },

    /// A member name is absolute or escapes the output directory
    #[error("Unsafe archive entry name: {0}")]
    UnsafeEntry(String),

    /// Two members share the same name
    #[error("Duplicate archive entry: {0}")]
    DuplicateEntry(String),

    /// A member could not be written to disk
    #[error("Failed to extract {name}: {message}")]
    Extract { name: String, message: String },
}

/// Object storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// Client could not be configured
    #[error("Invalid object storage client configuration: {0}")]
    ClientConfig(String),

    /// Listing buckets failed
    #[error("Failed to list buckets: {0}")]
    ListBucketsFailed(String),

    /// Target bucket is not among the account's buckets
    #[error("Bucket does not exist: {0}")]
    BucketNotFound(String),

    /// Bucket region lookup failed
    #[error("Failed to resolve region of bucket {bucket}: {message}")]
    RegionLookupFailed { bucket: String, message: String },

    /// Put object failed
    #[error("Failed to put object {key}: {message}")]
    PutFailed { key: String, message: String },
}

/// FTP errors
#[derive(Debug, Error)]
pub enum FtpError {
    /// Failed to connect to the FTP server
    #[error("Failed to connect to FTP server: {0}")]
    ConnectionFailed(String),

    /// Login rejected
    #[error("FTP login failed: {0}")]
    LoginFailed(String),

    /// Directory listing failed
    #[error("Failed to list remote directory: {0}")]
    ListFailed(String),

    /// Remote directory could not be created or entered
    #[error("Remote directory error for {path}: {message}")]
    DirectoryFailed { path: String, message: String },

    /// File transfer failed
    #[error("Failed to transfer {name}: {message}")]
    TransferFailed { name: String, message: String },
}

// Conversion from std::io::Error
impl From<std::io::Error> for ChartexError {
    fn from(err: std::io::Error) -> Self {
        ChartexError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for ChartexError {
    fn from(err: serde_json::Error) -> Self {
        ChartexError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for ChartexError {
    fn from(err: toml::de::Error) -> Self {
        ChartexError::Configuration(format!("TOML parse error: {err}"))
    }
}

// Blocking tasks that panic or get cancelled
impl From<tokio::task::JoinError> for ChartexError {
    fn from(err: tokio::task::JoinError) -> Self {
        ChartexError::Other(format!("Background task failed: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chartex_error_display() {
        let err = ChartexError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_transport_error_conversion() {
        let transport_err = TransportError::ConnectionFailed("refused".to_string());
        let err: ChartexError = transport_err.into();
        assert!(matches!(err, ChartexError::Transport(_)));
        assert!(err.is_connection_error());
    }

    #[test]
    fn test_server_error_display() {
        let err = TransportError::ServerError {
            status: 500,
            message: "render failed".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Export server error: 500 - render failed"
        );
    }

    #[test]
    fn test_archive_error_conversion() {
        let err: ChartexError = ArchiveError::Open("bad magic".to_string()).into();
        assert!(matches!(err, ChartexError::Archive(ArchiveError::Open(_))));
        assert!(!err.is_connection_error());
    }

    #[test]
    fn test_bucket_not_found_is_distinguishable() {
        let err: ChartexError = StorageError::BucketNotFound("charts".to_string()).into();
        assert!(matches!(
            err,
            ChartexError::Storage(StorageError::BucketNotFound(ref name)) if name == "charts"
        ));
    }

    #[test]
    fn test_ftp_login_is_connection_error() {
        let err: ChartexError = FtpError::LoginFailed("530".to_string()).into();
        assert!(err.is_connection_error());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: ChartexError = io_err.into();
        assert!(matches!(err, ChartexError::Io(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: ChartexError = json_err.into();
        assert!(matches!(err, ChartexError::Serialization(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: ChartexError = toml_err.into();
        assert!(matches!(err, ChartexError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_errors_implement_std_error() {
        let _: &dyn std::error::Error = &ChartexError::Validation("x".to_string());
        let _: &dyn std::error::Error = &TransportError::Timeout("x".to_string());
        let _: &dyn std::error::Error = &FtpError::ListFailed("x".to_string());
    }
}
