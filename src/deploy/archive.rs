//! Packaging the local build directory into a zip archive.
//!
//! Entries are stored relative to the build directory, sorted so the
//! archive layout is stable between runs, and deflate-compressed. macOS
//! `.DS_Store` files are never shipped.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;

/// File names left out of every archive.
const EXCLUDED_NAMES: &[&str] = &[".DS_Store"];

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("local directory {0} does not exist or is not a directory")]
    MissingSource(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

/// What ended up in the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveSummary {
    pub path: PathBuf,
    pub files: usize,
    pub bytes: u64,
}

/// Zip the contents of `source_dir` (not the directory itself) into
/// `destination`, replacing any previous archive.
pub fn create_archive(source_dir: &Path, destination: &Path) -> Result<ArchiveSummary, ArchiveError> {
    if !source_dir.is_dir() {
        return Err(ArchiveError::MissingSource(source_dir.to_path_buf()));
    }

    let mut entries = collect_entries(source_dir)?;
    // Deploying the working directory itself must not pack a stale archive.
    entries.retain(|(_, path)| path != destination);
    entries.sort();

    let file = File::create(destination)?;
    let mut zip = zip::ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    let mut files = 0;
    for (relative, full_path) in &entries {
        if full_path.is_dir() {
            zip.add_directory(format!("{relative}/"), options)?;
        } else {
            zip.start_file(relative.as_str(), options)?;
            let mut source = File::open(full_path)?;
            io::copy(&mut source, &mut zip)?;
            files += 1;
        }
    }
    zip.finish()?;

    let bytes = std::fs::metadata(destination)?.len();
    tracing::debug!(archive = %destination.display(), files, bytes, "archive written");
    Ok(ArchiveSummary {
        path: destination.to_path_buf(),
        files,
        bytes,
    })
}

/// Remove the archive if present. Returns whether a file was deleted.
pub fn remove_archive(path: &Path) -> io::Result<bool> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

/// `(zip entry name, filesystem path)` for everything under `root`, with
/// `/` separators regardless of platform.
fn collect_entries(root: &Path) -> Result<Vec<(String, PathBuf)>, ArchiveError> {
    let mut entries = Vec::new();
    let walker = WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .filter_entry(|e| !is_excluded(e.file_name()));
    for entry in walker {
        let entry = entry?;
        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };
        let name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        entries.push((name, entry.into_path()));
    }
    Ok(entries)
}

fn is_excluded(name: &std::ffi::OsStr) -> bool {
    name.to_str().is_some_and(|n| EXCLUDED_NAMES.contains(&n))
}
