//! In-memory delivery

use super::{ensure_unique, entry_error, initial_capacity, open_archive, safe_entry_path};
use crate::domain::{ArchiveError, ExportedFile, Result};
use std::collections::{BTreeMap, BTreeSet};
use std::io::{Cursor, Read};

/// Read every member of an exported archive into memory
///
/// Keys are the member names as stored in the archive. Directory members map
/// to empty content, so the map has one entry per member. Nothing is written
/// to disk.
///
/// # Errors
///
/// Same archive errors as [`deliver_to_disk`](super::deliver_to_disk), plus
/// [`ArchiveError::DuplicateEntry`] when two members share a name.
pub fn deliver_to_memory(archive: &[u8]) -> Result<BTreeMap<String, Vec<u8>>> {
    Ok(read_members(archive, true)?
        .into_iter()
        .map(|file| (file.name, file.content))
        .collect())
}

/// Read the file members of an exported archive, in archive order
///
/// Directory members are skipped: the result is what an uploader stores.
pub fn deliver_to_memory_files(archive: &[u8]) -> Result<Vec<ExportedFile>> {
    read_members(archive, false)
}

fn read_members(archive: &[u8], with_directories: bool) -> Result<Vec<ExportedFile>> {
    let mut zip = open_archive(Cursor::new(archive))?;
    let mut files = Vec::with_capacity(zip.len());
    let mut names = BTreeSet::new();

    for index in 0..zip.len() {
        let mut entry = zip.by_index(index).map_err(|e| entry_error(index, e))?;
        let name = entry.name().to_string();
        safe_entry_path(&name, entry.enclosed_name())?;
        ensure_unique(&mut names, name.clone(), &name)?;

        if entry.is_dir() {
            if with_directories {
                files.push(ExportedFile::new(name, Vec::new()));
            }
            continue;
        }

        let mut content = Vec::with_capacity(initial_capacity(entry.size()));
        entry
            .read_to_end(&mut content)
            .map_err(|e| ArchiveError::ReadEntry {
                index,
                message: e.to_string(),
            })?;

        tracing::debug!(entry = %name, bytes = content.len(), "Read archive entry");
        files.push(ExportedFile::new(name, content));
    }

    Ok(files)
}
