//! Batch renaming by rule.
//!
//! Files are renamed in place, inside their own parent directory. Renaming
//! is a two-step affair: [`plan`] computes the new names without touching
//! the filesystem (so the result can be previewed), and [`apply`] performs
//! the renames. A rename that would overwrite an existing file is refused.

use std::fs;
use std::path::PathBuf;

/// Placeholder in a [`RenameRule::Pattern`] template, replaced with the
/// running index.
pub const INDEX_PLACEHOLDER: &str = "{n}";

/// How new file names are derived from old ones.
///
/// All rules keep the original extension; they only rewrite the stem.
#[derive(Debug, Clone)]
pub enum RenameRule {
    /// Replace the whole stem with a template; `{n}` in the template becomes
    /// `start`, `start + 1`, … in input order.
    Pattern { template: String, start: usize },
    /// Substring find-and-replace on the stem.
    FindReplace { find: String, replace: String },
    /// Wrap the stem in a prefix and/or suffix.
    Affix { prefix: String, suffix: String },
}

/// One planned rename, produced by [`plan`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenamePlan {
    pub from: PathBuf,
    pub to: PathBuf,
}

/// Errors that can occur while planning or applying renames.
#[derive(Debug)]
pub enum RenameError {
    /// The path has no usable file name component.
    NoFileName { path: PathBuf },
    /// The target name already belongs to another file.
    TargetExists { path: PathBuf },
    /// The underlying filesystem rename failed.
    RenameFailed {
        file_name: String,
        source: std::io::Error,
    },
}

impl std::fmt::Display for RenameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoFileName { path } => {
                write!(f, "Path has no file name: {}", path.display())
            }
            Self::TargetExists { path } => {
                write!(
                    f,
                    "Refusing to overwrite existing file: {}",
                    path.display()
                )
            }
            Self::RenameFailed { file_name, source } => {
                write!(f, "Failed to rename {}: {}", file_name, source)
            }
        }
    }
}

impl std::error::Error for RenameError {}

/// Computes the new name for every file under the given rule.
///
/// Pure with respect to the filesystem: nothing is moved. Index numbering
/// for [`RenameRule::Pattern`] follows the order of `files`.
///
/// # Examples
///
/// ```
/// use batchkit::rename::{plan, RenameRule};
/// use std::path::PathBuf;
///
/// let files = vec![PathBuf::from("/photos/IMG_1.jpg")];
/// let rule = RenameRule::Affix {
///     prefix: "2024_".to_string(),
///     suffix: String::new(),
/// };
/// let plans = plan(&files, &rule).unwrap();
/// assert_eq!(plans[0].to, PathBuf::from("/photos/2024_IMG_1.jpg"));
/// ```
pub fn plan(files: &[PathBuf], rule: &RenameRule) -> Result<Vec<RenamePlan>, RenameError> {
    files
        .iter()
        .enumerate()
        .map(|(index, path)| {
            let stem = path
                .file_stem()
                .and_then(|s| s.to_str())
                .ok_or_else(|| RenameError::NoFileName {
                    path: path.clone(),
                })?;
            let ext = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| format!(".{}", e))
                .unwrap_or_default();

            let new_name = match rule {
                RenameRule::Pattern { template, start } => {
                    let stem = template.replace(INDEX_PLACEHOLDER, &(start + index).to_string());
                    format!("{}{}", stem, ext)
                }
                RenameRule::FindReplace { find, replace } => {
                    format!("{}{}", stem.replace(find.as_str(), replace), ext)
                }
                RenameRule::Affix { prefix, suffix } => {
                    format!("{}{}{}{}", prefix, stem, suffix, ext)
                }
            };

            let to = match path.parent() {
                Some(parent) => parent.join(&new_name),
                None => PathBuf::from(&new_name),
            };

            Ok(RenamePlan {
                from: path.clone(),
                to,
            })
        })
        .collect()
}

/// Performs the planned renames, returning how many files were renamed.
///
/// Plans whose target equals the source are skipped. A target that already
/// exists aborts the batch; renames performed before the failure are kept.
pub fn apply(plans: &[RenamePlan]) -> Result<usize, RenameError> {
    let mut count = 0;
    for plan in plans {
        if plan.from == plan.to {
            continue;
        }
        if plan.to.exists() {
            return Err(RenameError::TargetExists {
                path: plan.to.clone(),
            });
        }
        fs::rename(&plan.from, &plan.to).map_err(|e| RenameError::RenameFailed {
            file_name: plan
                .from
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| plan.from.display().to_string()),
            source: e,
        })?;
        count += 1;
    }
    Ok(count)
}
