//! Exported artifacts

use base64::{engine::general_purpose, Engine as _};
use std::fmt;

use super::errors::ChartexError;
use super::result::Result;

/// One rendered file taken out of an export archive
///
/// `name` is the member's path relative to the archive root; `content` is
/// the raw binary payload.
#[derive(Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub name: String,
    pub content: Vec<u8>,
}

impl ExportedFile {
    /// Creates an exported file
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Creates an exported file from base64-encoded content
    ///
    /// # Errors
    ///
    /// Returns a validation error if `encoded` is not valid base64.
    pub fn from_base64(name: impl Into<String>, encoded: &str) -> Result<Self> {
        let name = name.into();
        let content = general_purpose::STANDARD.decode(encoded).map_err(|e| {
            ChartexError::Validation(format!("Invalid base64 content for {name}: {e}"))
        })?;
        Ok(Self { name, content })
    }

    /// Content encoded as standard base64
    pub fn content_base64(&self) -> String {
        general_purpose::STANDARD.encode(&self.content)
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

// Content is elided; rendered images are large and binary.
impl fmt::Debug for ExportedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExportedFile")
            .field("name", &self.name)
            .field("size", &self.content.len())
            .finish()
    }
}
