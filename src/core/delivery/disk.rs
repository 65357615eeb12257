//! Disk delivery

use super::{
    ensure_unique, entry_error, open_archive, safe_entry_path, STAGING_PREFIX, STAGING_SUFFIX,
};
use crate::domain::{ArchiveError, ChartexError, Result};
use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};
use tempfile::{Builder, NamedTempFile};

/// Write an exported archive into `output_dir`
///
/// The archive is first staged under a unique `chartex_export*.zip` name in
/// `output_dir`, which is created when missing.
///
/// - `unzip == false`: the staging file is kept and its canonical path is the
///   only element returned.
/// - `unzip == true`: every member is extracted into `output_dir` in archive
///   order and the canonical path of each member is returned. The staging
///   file is removed whether extraction succeeds or not.
///
/// # Errors
///
/// - [`ChartexError::Io`] if the directory or staging file cannot be written
/// - [`ArchiveError::Open`] if the payload is not a readable archive
/// - [`ArchiveError::UnsafeEntry`] for names escaping `output_dir`
/// - [`ArchiveError::DuplicateEntry`] when two members share a name or would
///   be written to the same path
/// - [`ArchiveError::Extract`] if a member cannot be written
pub fn deliver_to_disk(archive: &[u8], output_dir: &Path, unzip: bool) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(output_dir)?;

    let staging = stage(archive, output_dir)?;

    if !unzip {
        let (_, path) = staging.keep().map_err(|e| ChartexError::from(e.error))?;
        let path = fs::canonicalize(path)?;
        tracing::debug!(path = %path.display(), "Kept exported archive");
        return Ok(vec![path]);
    }

    // `staging` is dropped, and the file deleted, on every return below
    let paths = extract_all(&staging, output_dir)?;
    tracing::debug!(
        dir = %output_dir.display(),
        count = paths.len(),
        "Extracted exported archive"
    );
    Ok(paths)
}

fn stage(archive: &[u8], output_dir: &Path) -> Result<NamedTempFile> {
    let mut staging = Builder::new()
        .prefix(STAGING_PREFIX)
        .suffix(STAGING_SUFFIX)
        .tempfile_in(output_dir)?;

    staging.write_all(archive)?;
    staging.flush()?;
    Ok(staging)
}

fn extract_all(staging: &NamedTempFile, output_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut zip = open_archive(staging.reopen()?)?;
    let mut paths = Vec::with_capacity(zip.len());
    let mut names = BTreeSet::new();
    let mut targets = BTreeSet::new();

    for index in 0..zip.len() {
        let mut entry = zip.by_index(index).map_err(|e| entry_error(index, e))?;
        let name = entry.name().to_string();
        let relative = safe_entry_path(&name, entry.enclosed_name())?;

        // Checked before writing so an earlier member is never overwritten
        ensure_unique(&mut names, name.clone(), &name)?;
        ensure_unique(&mut targets, normalized(&relative), &name)?;

        let target = output_dir.join(relative);

        let written = if entry.is_dir() {
            fs::create_dir_all(&target)
        } else {
            write_entry(&mut entry, &target)
        };
        written.map_err(|e| ArchiveError::Extract {
            name: name.clone(),
            message: e.to_string(),
        })?;

        let path = fs::canonicalize(&target)?;
        tracing::debug!(entry = %name, path = %path.display(), "Extracted entry");
        paths.push(path);
    }

    Ok(paths)
}

/// `relative` with `.` dropped and `..` applied
fn normalized(relative: &Path) -> PathBuf {
    let mut path = PathBuf::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => path.push(part),
            Component::ParentDir => {
                path.pop();
            }
            _ => {}
        }
    }
    path
}

fn write_entry(entry: &mut impl io::Read, target: &Path) -> io::Result<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(target)?;
    io::copy(entry, &mut file)?;
    file.flush()
}
