//! FTP uploader

use super::session::{EntryKind, FtpConnector, FtpSession, SuppaFtpConnector};
use crate::adapters::destination::{RemoteDestination, UploadReport};
use crate::config::{FtpConfig, SecretString};
use crate::domain::{ExportedFile, Result};
use async_trait::async_trait;
use secrecy::ExposeSecret;
use std::sync::Arc;
use std::time::Instant;

/// Uploads exported files into a directory on an FTP server
///
/// The target directory is looked up case-insensitively among the entries
/// of the login directory and created when missing. Files are stored under
/// their archive-relative names.
pub struct FtpUploader {
    host: String,
    port: u16,
    username: String,
    password: SecretString,
    remote_dir: String,
    connector: Arc<dyn FtpConnector>,
}

impl FtpUploader {
    pub fn new(
        host: impl Into<String>,
        port: u16,
        username: impl Into<String>,
        password: SecretString,
        remote_dir: impl Into<String>,
        connector: Arc<dyn FtpConnector>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            username: username.into(),
            password,
            remote_dir: remote_dir.into(),
            connector,
        }
    }

    /// Create an uploader backed by `suppaftp` from configuration
    pub fn from_config(config: &FtpConfig) -> Self {
        Self::new(
            config.host.clone(),
            config.port,
            config.username.clone(),
            config.password.clone(),
            config.remote_dir.clone(),
            Arc::new(SuppaFtpConnector),
        )
    }

    pub fn remote_dir(&self) -> &str {
        &self.remote_dir
    }

    /// Upload every file into the remote directory
    ///
    /// The FTP client is blocking, so the whole session runs on a blocking
    /// thread.
    ///
    /// # Errors
    ///
    /// Connection, login and directory failures fail the call. Failed
    /// transfers are recorded in the report.
    pub async fn upload(&self, files: &[ExportedFile]) -> Result<UploadReport> {
        let job = UploadJob {
            host: self.host.clone(),
            port: self.port,
            username: self.username.clone(),
            password: self.password.clone(),
            remote_dir: self.remote_dir.clone(),
            connector: Arc::clone(&self.connector),
            files: files.to_vec(),
        };

        tokio::task::spawn_blocking(move || job.run()).await?
    }
}

impl std::fmt::Debug for FtpUploader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FtpUploader")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("remote_dir", &self.remote_dir)
            .finish()
    }
}

#[async_trait]
impl RemoteDestination for FtpUploader {
    fn name(&self) -> &str {
        "ftp"
    }

    async fn deliver(&self, files: &[ExportedFile]) -> Result<UploadReport> {
        self.upload(files).await
    }
}

/// Owned copy of everything a blocking upload needs
struct UploadJob {
    host: String,
    port: u16,
    username: String,
    password: SecretString,
    remote_dir: String,
    connector: Arc<dyn FtpConnector>,
    files: Vec<ExportedFile>,
}

impl UploadJob {
    fn run(self) -> Result<UploadReport> {
        let started = Instant::now();

        let mut session = self.connector.connect(
            &self.host,
            self.port,
            &self.username,
            self.password.expose_secret().as_str(),
        )?;

        let result = self.upload_with(session.as_mut());

        if let Err(e) = session.quit() {
            tracing::warn!(host = %self.host, error = %e, "FTP quit failed");
        }

        result.map(|report| report.with_duration(started.elapsed()))
    }

    fn upload_with(&self, session: &mut dyn FtpSession) -> Result<UploadReport> {
        let directory = match find_directory(session, &self.remote_dir)? {
            Some(existing) => existing,
            None => {
                tracing::info!(dir = %self.remote_dir, "Creating remote directory");
                session.mkdir(&self.remote_dir)?;
                self.remote_dir.clone()
            }
        };
        session.cwd(&directory)?;

        tracing::info!(
            host = %self.host,
            dir = %directory,
            file_count = self.files.len(),
            "Uploading exported files over FTP"
        );

        let mut report = UploadReport::new("ftp");
        for file in &self.files {
            match session.put(&file.name, &file.content) {
                Ok(()) => {
                    tracing::debug!(file = %file.name, bytes = file.len(), "File stored");
                    report.record_success(&file.name);
                }
                Err(e) => {
                    tracing::warn!(file = %file.name, error = %e, "File transfer failed");
                    report.record_failure(&file.name, e);
                }
            }
        }

        Ok(report)
    }
}

/// Finds `wanted` among the directories of the working directory
///
/// Names compare case-insensitively; the server's spelling is returned.
/// Entries of unknown type are probed by changing into them.
fn find_directory(session: &mut dyn FtpSession, wanted: &str) -> Result<Option<String>> {
    let entries = session.list()?;

    for entry in entries {
        if entry.name == "." || entry.name == ".." || !entry.name.eq_ignore_ascii_case(wanted) {
            continue;
        }

        let is_directory = match entry.kind {
            EntryKind::Directory => true,
            EntryKind::File => false,
            EntryKind::Unknown => probe_directory(session, &entry.name)?,
        };

        if is_directory {
            return Ok(Some(entry.name));
        }
    }

    Ok(None)
}

/// Tells whether `name` can be entered, leaving the working directory as it was
fn probe_directory(session: &mut dyn FtpSession, name: &str) -> Result<bool> {
    let mut guard = WorkingDirGuard::new(session)?;
    Ok(guard.session().cwd(name).is_ok())
}

/// Restores the original working directory on drop
struct WorkingDirGuard<'a> {
    session: &'a mut dyn FtpSession,
    origin: String,
}

impl<'a> WorkingDirGuard<'a> {
    fn new(session: &'a mut dyn FtpSession) -> Result<Self> {
        let origin = session.pwd()?;
        Ok(Self { session, origin })
    }

    fn session(&mut self) -> &mut dyn FtpSession {
        &mut *self.session
    }
}

impl Drop for WorkingDirGuard<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.session.cwd(&self.origin) {
            tracing::warn!(dir = %self.origin, error = %e, "Could not restore FTP working directory");
        }
    }
}
