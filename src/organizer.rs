//! Collision-safe file moving and organize-by-type.
//!
//! This module moves files into per-category subfolders of a base folder.
//! Destination folders are created on demand (one level, idempotent) and
//! name collisions are resolved by appending an incrementing numeric suffix
//! before the extension (`report.txt` → `report_1.txt`).
//!
//! The collision check and the rename are not atomic, so at most one caller
//! may operate on a given destination folder at a time.

use crate::category::CategoryTable;
use std::fs;
use std::path::{Path, PathBuf};

/// Errors that can occur while moving or organizing files.
#[derive(Debug)]
pub enum OrganizeError {
    /// The folder to organize does not exist.
    FolderNotFound { path: PathBuf },
    /// The folder's entries could not be listed.
    ReadDirFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// A category folder could not be created.
    DirectoryCreationFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// A single file could not be relocated.
    MoveFailed {
        file_name: String,
        source: std::io::Error,
    },
}

impl std::fmt::Display for OrganizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FolderNotFound { path } => {
                write!(f, "Folder not found: {}", path.display())
            }
            Self::ReadDirFailed { path, source } => {
                write!(f, "Failed to read folder {}: {}", path.display(), source)
            }
            Self::DirectoryCreationFailed { path, source } => {
                write!(
                    f,
                    "Failed to create directory {}: {}",
                    path.display(),
                    source
                )
            }
            Self::MoveFailed { file_name, source } => {
                write!(f, "Failed to move {}: {}", file_name, source)
            }
        }
    }
}

impl std::error::Error for OrganizeError {}

/// Result type for move and organize operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// Counters returned by one organize invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrganizeStats {
    /// Category folders newly created during this run.
    pub folders_created: usize,
    /// Files relocated during this run.
    pub files_moved: usize,
}

/// Outcome of a single collision-safe move.
#[derive(Debug)]
pub struct MoveOutcome {
    /// Where the file ended up, after collision resolution.
    pub final_path: PathBuf,
    /// Whether this call created the destination folder.
    pub created_dir: bool,
}

/// One planned relocation, produced by [`plan_by_type`] for dry runs.
#[derive(Debug, Clone)]
pub struct PlannedMove {
    pub file_name: String,
    pub category: String,
}

/// Moves `source` into `dest_folder` without overwriting anything.
///
/// Creates `dest_folder` if absent (a single level, not a recursive path).
/// If a file with the same name already exists there, retries with
/// `stem_1.ext`, `stem_2.ext`, … until a free name is found. The counter is
/// local to this call.
///
/// The move is a rename, so the source no longer exists on success.
/// Cross-device moves fail with the underlying io error rather than falling
/// back to copy-and-delete.
pub fn move_unique(source: &Path, dest_folder: &Path) -> OrganizeResult<MoveOutcome> {
    let created_dir = if dest_folder.exists() {
        false
    } else {
        fs::create_dir(dest_folder).map_err(|e| OrganizeError::DirectoryCreationFailed {
            path: dest_folder.to_path_buf(),
            source: e,
        })?;
        true
    };

    let file_name = source
        .file_name()
        .ok_or_else(|| OrganizeError::MoveFailed {
            file_name: source.display().to_string(),
            source: std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "file has no name component",
            ),
        })?;

    let mut destination = dest_folder.join(file_name);
    if destination.exists() {
        let stem = source
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("file");
        let ext = source
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e))
            .unwrap_or_default();

        let mut counter = 1;
        loop {
            let candidate = dest_folder.join(format!("{}_{}{}", stem, counter, ext));
            if !candidate.exists() {
                destination = candidate;
                break;
            }
            counter += 1;
        }
    }

    fs::rename(source, &destination).map_err(|e| OrganizeError::MoveFailed {
        file_name: file_name.to_string_lossy().to_string(),
        source: e,
    })?;

    Ok(MoveOutcome {
        final_path: destination,
        created_dir,
    })
}

/// Moves every regular file directly inside `folder` into a subfolder named
/// after its category.
///
/// Non-recursive: existing subfolders are neither entered nor moved. The
/// first failed move aborts the batch; files moved before the failure stay
/// where they landed. Entry order follows the directory listing, so which
/// numeric suffix a colliding name receives is not guaranteed across runs.
///
/// # Examples
///
/// ```no_run
/// use batchkit::category::CategoryTable;
/// use batchkit::organizer::organize_by_type;
/// use std::path::Path;
///
/// let stats = organize_by_type(Path::new("/home/user/Downloads"), &CategoryTable::default())?;
/// println!("{} folders created, {} files moved", stats.folders_created, stats.files_moved);
/// # Ok::<(), batchkit::organizer::OrganizeError>(())
/// ```
pub fn organize_by_type(folder: &Path, table: &CategoryTable) -> OrganizeResult<OrganizeStats> {
    let mut stats = OrganizeStats::default();

    for path in list_regular_files(folder)? {
        let category = table.classify_path(&path);
        let outcome = move_unique(&path, &folder.join(category))?;
        if outcome.created_dir {
            stats.folders_created += 1;
        }
        stats.files_moved += 1;
    }

    Ok(stats)
}

/// Computes what [`organize_by_type`] would do, without touching anything.
pub fn plan_by_type(folder: &Path, table: &CategoryTable) -> OrganizeResult<Vec<PlannedMove>> {
    let plans = list_regular_files(folder)?
        .into_iter()
        .map(|path| PlannedMove {
            file_name: path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default(),
            category: table.classify_path(&path).to_string(),
        })
        .collect();
    Ok(plans)
}

/// Snapshots the regular files directly inside `folder` before any move
/// happens, so the iteration is not affected by the moves themselves.
fn list_regular_files(folder: &Path) -> OrganizeResult<Vec<PathBuf>> {
    if !folder.exists() {
        return Err(OrganizeError::FolderNotFound {
            path: folder.to_path_buf(),
        });
    }

    let entries = fs::read_dir(folder).map_err(|e| OrganizeError::ReadDirFailed {
        path: folder.to_path_buf(),
        source: e,
    })?;

    let mut files = Vec::new();
    for entry in entries.flatten() {
        if let Ok(file_type) = entry.file_type()
            && file_type.is_file()
        {
            files.push(entry.path());
        }
    }
    Ok(files)
}
