//! Archive delivery
//!
//! The export server answers with a zip archive. Delivery turns those bytes
//! into something usable:
//!
//! - [`deliver_to_disk`] - files in an output directory (or the archive itself)
//! - [`deliver_to_memory`] - a name to content map, nothing written to disk
//! - [`deliver_to_memory_files`] - the file members as [`ExportedFile`]s, in
//!   archive order, ready for an uploader
//!
//! Every function here does blocking I/O; async callers run them through
//! `tokio::task::spawn_blocking`.
//!
//! [`ExportedFile`]: crate::domain::ExportedFile

pub mod disk;
pub mod memory;

pub use disk::deliver_to_disk;
pub use memory::{deliver_to_memory, deliver_to_memory_files};

use crate::domain::{ArchiveError, ChartexError, Result};
use std::collections::BTreeSet;
use std::io::{Read, Seek};
use std::path::PathBuf;
use zip::result::ZipError;
use zip::ZipArchive;

/// Prefix of staging archives written into the output directory
pub const STAGING_PREFIX: &str = "chartex_export";

/// Extension of staging archives
pub const STAGING_SUFFIX: &str = ".zip";

/// Upper bound on the buffer reserved for one entry before reading it
const MAX_PREALLOCATION: usize = 1 << 20;

pub(crate) fn open_archive<R: Read + Seek>(reader: R) -> Result<ZipArchive<R>> {
    ZipArchive::new(reader).map_err(|e| ArchiveError::Open(e.to_string()).into())
}

pub(crate) fn entry_error(index: usize, err: ZipError) -> ChartexError {
    ArchiveError::ReadEntry {
        index,
        message: err.to_string(),
    }
    .into()
}

/// Relative path of an entry, rejecting absolute names and `..` escapes
pub(crate) fn safe_entry_path(name: &str, enclosed: Option<PathBuf>) -> Result<PathBuf> {
    enclosed.ok_or_else(|| ArchiveError::UnsafeEntry(name.to_string()).into())
}

/// Buffer capacity for an entry whose header declares `declared` bytes
///
/// Header sizes are not trusted; the buffer grows while reading instead.
pub(crate) fn initial_capacity(declared: u64) -> usize {
    usize::try_from(declared)
        .unwrap_or(usize::MAX)
        .min(MAX_PREALLOCATION)
}

/// Records `key` for the member `name`, failing if it was seen before
pub(crate) fn ensure_unique<K: Ord>(seen: &mut BTreeSet<K>, key: K, name: &str) -> Result<()> {
    if seen.insert(key) {
        Ok(())
    } else {
        Err(ArchiveError::DuplicateEntry(name.to_string()).into())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_capacity_is_capped() {
        assert_eq!(initial_capacity(0), 0);
        assert_eq!(initial_capacity(512), 512);
        assert_eq!(initial_capacity(u64::MAX), MAX_PREALLOCATION);
    }

    #[test]
    fn test_ensure_unique_rejects_repeated_name() {
        let mut seen = BTreeSet::new();
        ensure_unique(&mut seen, "chart.png".to_string(), "chart.png").unwrap();
        ensure_unique(&mut seen, "chart.svg".to_string(), "chart.svg").unwrap();

        let result = ensure_unique(&mut seen, "chart.png".to_string(), "chart.png");
        assert!(matches!(
            result,
            Err(ChartexError::Archive(ArchiveError::DuplicateEntry(ref name))) if name == "chart.png"
        ));
    }
}
