//! FTP destination
//!
//! # Configuration
//!
//! ```toml
//! [destination]
//! kind = "ftp"
//!
//! [ftp]
//! host = "ftp.example.com"
//! port = 21
//! username = "charts"
//! password = "${CHARTEX_FTP_PASSWORD}"
//! remote_dir = "reports"
//! ```

pub mod session;
pub mod uploader;

pub use session::{EntryKind, FtpConnector, FtpSession, RemoteEntry, SuppaFtpConnector};
pub use uploader::FtpUploader;
