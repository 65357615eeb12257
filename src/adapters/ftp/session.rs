//! FTP session abstraction
//!
//! [`FtpSession`] covers the FTP commands the uploader needs. The
//! [`SuppaFtpConnector`] implementation is a blocking client; callers run it
//! on a blocking thread.

use crate::domain::{FtpError, Result};
use std::io::Cursor;
use suppaftp::list::File as ListEntry;
use suppaftp::types::FileType;
use suppaftp::FtpStream;

/// What a listing says about an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
    /// The server gave no type information (name-only listing)
    Unknown,
}

/// One entry of a remote directory listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteEntry {
    pub name: String,
    pub kind: EntryKind,
}

impl RemoteEntry {
    pub fn new(name: impl Into<String>, kind: EntryKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// An authenticated FTP session in binary transfer mode
pub trait FtpSession: Send {
    /// Entries of the current working directory
    fn list(&mut self) -> Result<Vec<RemoteEntry>>;

    /// Current working directory
    fn pwd(&mut self) -> Result<String>;

    /// Change the working directory
    fn cwd(&mut self, path: &str) -> Result<()>;

    /// Create a directory
    fn mkdir(&mut self, path: &str) -> Result<()>;

    /// Store `content` as `name` in the working directory
    fn put(&mut self, name: &str, content: &[u8]) -> Result<()>;

    /// Close the session
    fn quit(&mut self) -> Result<()>;
}

/// Opens authenticated sessions
pub trait FtpConnector: Send + Sync {
    fn connect(
        &self,
        host: &str,
        port: u16,
        username: &str,
        password: &str,
    ) -> Result<Box<dyn FtpSession>>;
}

/// Connector backed by the `suppaftp` blocking client
#[derive(Debug, Clone, Copy, Default)]
pub struct SuppaFtpConnector;

impl FtpConnector for SuppaFtpConnector {
    fn connect(
        &self,
        host: &str,
        port: u16,
        username: &str,
        password: &str,
    ) -> Result<Box<dyn FtpSession>> {
        let mut stream = FtpStream::connect((host, port))
            .map_err(|e| FtpError::ConnectionFailed(format!("{host}:{port}: {e}")))?;

        stream
            .login(username, password)
            .map_err(|e| FtpError::LoginFailed(e.to_string()))?;

        stream
            .transfer_type(FileType::Binary)
            .map_err(|e| FtpError::ConnectionFailed(format!("cannot switch to binary mode: {e}")))?;

        tracing::debug!(host = %host, port = port, "FTP session established");
        Ok(Box::new(SuppaFtpSession { stream }))
    }
}

/// Session over a `suppaftp` stream
pub struct SuppaFtpSession {
    stream: FtpStream,
}

impl FtpSession for SuppaFtpSession {
    fn list(&mut self) -> Result<Vec<RemoteEntry>> {
        // Typed LIST output first; name-only NLST when any line is unparseable
        let lines = self
            .stream
            .list(None)
            .map_err(|e| FtpError::ListFailed(e.to_string()))?;

        if let Some(entries) = parse_listing(&lines) {
            return Ok(entries);
        }

        tracing::debug!("LIST output not parseable, falling back to NLST");
        let names = self
            .stream
            .nlst(None)
            .map_err(|e| FtpError::ListFailed(e.to_string()))?;

        Ok(names
            .into_iter()
            .map(|name| RemoteEntry::new(name, EntryKind::Unknown))
            .collect())
    }

    fn pwd(&mut self) -> Result<String> {
        self.stream
            .pwd()
            .map_err(|e| FtpError::DirectoryFailed {
                path: ".".to_string(),
                message: e.to_string(),
            })
            .map_err(Into::into)
    }

    fn cwd(&mut self, path: &str) -> Result<()> {
        self.stream
            .cwd(path)
            .map_err(|e| FtpError::DirectoryFailed {
                path: path.to_string(),
                message: e.to_string(),
            })
            .map_err(Into::into)
    }

    fn mkdir(&mut self, path: &str) -> Result<()> {
        self.stream
            .mkdir(path)
            .map_err(|e| FtpError::DirectoryFailed {
                path: path.to_string(),
                message: e.to_string(),
            })
            .map_err(Into::into)
    }

    fn put(&mut self, name: &str, content: &[u8]) -> Result<()> {
        let mut reader = Cursor::new(content);
        self.stream
            .put_file(name, &mut reader)
            .map_err(|e| FtpError::TransferFailed {
                name: name.to_string(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    fn quit(&mut self) -> Result<()> {
        self.stream
            .quit()
            .map_err(|e| FtpError::ConnectionFailed(format!("quit failed: {e}")))
            .map_err(Into::into)
    }
}

/// Parses `LIST` lines into typed entries
///
/// Returns `None` if any line is not in a recognised (POSIX or DOS) format.
pub fn parse_listing(lines: &[String]) -> Option<Vec<RemoteEntry>> {
    lines
        .iter()
        .filter(|line| !line.trim().is_empty() && !line.starts_with("total "))
        .map(|line| {
            line.parse::<ListEntry>().ok().map(|entry| {
                let kind = if entry.is_directory() {
                    EntryKind::Directory
                } else {
                    EntryKind::File
                };
                RemoteEntry::new(entry.name(), kind)
            })
        })
        .collect()
}
