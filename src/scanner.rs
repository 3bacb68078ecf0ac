//! Directory scanning for display lists.
//!
//! Produces ephemeral [`FileEntry`] values for the regular files directly
//! inside a folder. A scan can run on a background worker thread so a
//! caller's interface stays responsive; the result comes back as a single
//! one-shot channel message, no streaming.

use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;

/// A regular file observed during a scan.
///
/// Not persisted anywhere; recomputed on every scan.
#[derive(Debug, Clone)]
pub struct FileEntry {
    /// File name without directory components.
    pub name: String,
    /// Absolute or as-given path to the file.
    pub path: PathBuf,
    /// Size in bytes.
    pub size: u64,
    /// Last modification time, if the filesystem reports one.
    pub modified: Option<DateTime<Local>>,
}

impl FileEntry {
    /// Modification time formatted for display, or "-" when unknown.
    pub fn modified_display(&self) -> String {
        self.modified
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "-".to_string())
    }
}

/// Errors that can occur while scanning a folder.
#[derive(Debug)]
pub enum ScanError {
    /// The folder to scan does not exist.
    FolderNotFound { path: PathBuf },
    /// The folder's entries could not be listed.
    ReadDirFailed {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl std::fmt::Display for ScanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FolderNotFound { path } => write!(f, "Folder not found: {}", path.display()),
            Self::ReadDirFailed { path, source } => {
                write!(f, "Failed to read folder {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for ScanError {}

/// Lists the regular files directly inside `folder`.
///
/// Subfolders are not entered. Entries whose metadata cannot be read are
/// skipped rather than failing the whole scan.
pub fn scan_folder(folder: &Path) -> Result<Vec<FileEntry>, ScanError> {
    if !folder.exists() {
        return Err(ScanError::FolderNotFound {
            path: folder.to_path_buf(),
        });
    }

    let entries = fs::read_dir(folder).map_err(|e| ScanError::ReadDirFailed {
        path: folder.to_path_buf(),
        source: e,
    })?;

    let mut files = Vec::new();
    for entry in entries.flatten() {
        if let Ok(metadata) = entry.metadata()
            && metadata.is_file()
        {
            files.push(FileEntry {
                name: entry.file_name().to_string_lossy().to_string(),
                path: entry.path(),
                size: metadata.len(),
                modified: metadata.modified().ok().map(DateTime::<Local>::from),
            });
        }
    }
    Ok(files)
}

/// Runs [`scan_folder`] on a worker thread.
///
/// The receiver yields exactly one message: the complete scan result. There
/// are no partial updates and no cancellation; dropping the receiver simply
/// discards the result when the worker finishes.
pub fn scan_in_background(folder: PathBuf) -> mpsc::Receiver<Result<Vec<FileEntry>, ScanError>> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        // The receiver may be gone by the time the scan completes.
        let _ = tx.send(scan_folder(&folder));
    });
    rx
}

/// Formats a byte count for display (e.g. `1.5 KB`).
pub fn format_size(bytes: u64) -> String {
    let mut size = bytes as f64;
    for unit in ["B", "KB", "MB", "GB"] {
        if size < 1024.0 {
            return format!("{:.1} {}", size, unit);
        }
        size /= 1024.0;
    }
    format!("{:.1} TB", size)
}
