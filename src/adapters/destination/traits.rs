//! Remote destination abstraction
//!
//! This module defines the trait every uploader implements so callers can
//! deliver exported files without knowing where they end up.

use crate::domain::{ExportedFile, Result};
use async_trait::async_trait;
use std::time::Duration;

/// Outcome of a single file upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadStatus {
    /// File stored at the destination
    Uploaded,

    /// Upload failed; carries the cause
    Failed(String),
}

/// Per-file entry of an [`UploadReport`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUploadOutcome {
    /// Name of the exported file (object key or remote file name)
    pub name: String,

    pub status: UploadStatus,
}

impl FileUploadOutcome {
    pub fn is_uploaded(&self) -> bool {
        self.status == UploadStatus::Uploaded
    }
}

/// Result of delivering a batch of files
///
/// Every file handed to the destination gets exactly one outcome, in the
/// order the files were given. A failed file never stops the rest of the
/// batch; the caller decides what to do with the failures.
#[derive(Debug, Clone)]
pub struct UploadReport {
    /// Destination name (e.g. "s3", "ftp")
    pub destination: String,

    /// One outcome per file
    pub outcomes: Vec<FileUploadOutcome>,

    /// Wall time of the upload call
    pub duration: Duration,
}

impl UploadReport {
    /// Create an empty report for a destination
    pub fn new(destination: impl Into<String>) -> Self {
        Self {
            destination: destination.into(),
            outcomes: Vec::new(),
            duration: Duration::ZERO,
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Record a stored file
    pub fn record_success(&mut self, name: impl Into<String>) {
        self.outcomes.push(FileUploadOutcome {
            name: name.into(),
            status: UploadStatus::Uploaded,
        });
    }

    /// Record a failed file
    pub fn record_failure(&mut self, name: impl Into<String>, cause: impl ToString) {
        self.outcomes.push(FileUploadOutcome {
            name: name.into(),
            status: UploadStatus::Failed(cause.to_string()),
        });
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn success_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_uploaded()).count()
    }

    pub fn failure_count(&self) -> usize {
        self.total() - self.success_count()
    }

    /// Check if every file was uploaded
    pub fn is_successful(&self) -> bool {
        self.failure_count() == 0
    }

    /// Failed outcomes, in upload order
    pub fn failures(&self) -> impl Iterator<Item = &FileUploadOutcome> {
        self.outcomes.iter().filter(|o| !o.is_uploaded())
    }

    /// Log the report
    pub fn log_summary(&self) {
        tracing::info!(
            destination = %self.destination,
            total = self.total(),
            uploaded = self.success_count(),
            failed = self.failure_count(),
            duration_ms = self.duration.as_millis(),
            "Upload completed"
        );

        for outcome in self.failures() {
            if let UploadStatus::Failed(ref cause) = outcome.status {
                tracing::warn!(
                    destination = %self.destination,
                    file = %outcome.name,
                    error = %cause,
                    "File upload failed"
                );
            }
        }
    }
}

/// A place exported files can be delivered to
///
/// Implementations own their connection lifecycle: each call opens a
/// connection, uploads every file, and closes it before returning.
///
/// # Errors
///
/// `deliver` fails as a whole only when nothing can be uploaded (unreachable
/// server, rejected login, missing bucket or directory). Individual file
/// failures are reported in the returned [`UploadReport`].
#[async_trait]
pub trait RemoteDestination: Send + Sync {
    /// Short destination name used in logs and reports
    fn name(&self) -> &str;

    /// Upload every file, best effort per file
    async fn deliver(&self, files: &[ExportedFile]) -> Result<UploadReport>;
}
