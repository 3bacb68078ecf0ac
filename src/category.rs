//! File-type classification for organizing files by category.
//!
//! This module maps file extensions to named categories (e.g. "图片", "文档")
//! through an ordered table. The first category in table order that lists an
//! extension wins; anything unmatched falls back to [`FALLBACK_CATEGORY`].
//!
//! # Examples
//!
//! ```
//! use batchkit::category::CategoryTable;
//!
//! let table = CategoryTable::default();
//! assert_eq!(table.classify(".jpg"), "图片");
//! assert_eq!(table.classify(".PDF"), "文档");
//! assert_eq!(table.classify(".xyz"), "Other");
//! ```

use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Category assigned to files whose extension matches no table entry.
pub const FALLBACK_CATEGORY: &str = "Other";

/// Errors detected while building a category table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryTableError {
    /// A category was declared with an empty name.
    EmptyCategoryName,
    /// An extension entry is empty or missing its leading dot.
    InvalidExtension { category: String, extension: String },
    /// The same extension appears in two different categories.
    DuplicateExtension {
        extension: String,
        first_category: String,
        second_category: String,
    },
}

impl std::fmt::Display for CategoryTableError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyCategoryName => write!(f, "Category name must not be empty"),
            Self::InvalidExtension {
                category,
                extension,
            } => {
                write!(
                    f,
                    "Invalid extension '{}' in category '{}': expected a dot-prefixed extension like '.txt'",
                    extension, category
                )
            }
            Self::DuplicateExtension {
                extension,
                first_category,
                second_category,
            } => {
                write!(
                    f,
                    "Extension '{}' is listed in both '{}' and '{}'",
                    extension, first_category, second_category
                )
            }
        }
    }
}

impl std::error::Error for CategoryTableError {}

#[derive(Debug, Clone)]
struct CategoryEntry {
    name: String,
    extensions: HashSet<String>,
}

/// An ordered, immutable mapping from category name to a set of lowercase,
/// dot-prefixed file extensions.
///
/// Order is the tie-break when an extension could plausibly belong to more
/// than one category, but construction rejects tables where an extension is
/// actually listed twice, so lookups are unambiguous.
#[derive(Debug, Clone)]
pub struct CategoryTable {
    categories: Vec<CategoryEntry>,
}

impl CategoryTable {
    /// Builds a table from `(category name, extensions)` pairs.
    ///
    /// Extensions are lowercased; each must carry a leading dot. An extension
    /// repeated inside one category is deduplicated silently, but an
    /// extension listed under two different categories is a configuration
    /// error.
    pub fn new<I, S>(entries: I) -> Result<Self, CategoryTableError>
    where
        I: IntoIterator<Item = (S, Vec<S>)>,
        S: Into<String>,
    {
        let mut categories: Vec<CategoryEntry> = Vec::new();
        let mut seen: HashMap<String, String> = HashMap::new();

        for (name, extensions) in entries {
            let name = name.into();
            if name.trim().is_empty() {
                return Err(CategoryTableError::EmptyCategoryName);
            }

            let mut set = HashSet::new();
            for extension in extensions {
                let extension = extension.into().to_lowercase();
                if extension.len() < 2 || !extension.starts_with('.') {
                    return Err(CategoryTableError::InvalidExtension {
                        category: name,
                        extension,
                    });
                }
                if let Some(first) = seen.get(&extension)
                    && first != &name
                {
                    return Err(CategoryTableError::DuplicateExtension {
                        extension,
                        first_category: first.clone(),
                        second_category: name,
                    });
                }
                seen.insert(extension.clone(), name.clone());
                set.insert(extension);
            }

            categories.push(CategoryEntry {
                name,
                extensions: set,
            });
        }

        Ok(Self { categories })
    }

    /// Returns the category name for a dot-prefixed extension.
    ///
    /// The extension is lowercased before lookup; no other canonicalization
    /// is applied. Unmatched extensions (and the empty string) return
    /// [`FALLBACK_CATEGORY`].
    pub fn classify(&self, extension: &str) -> &str {
        let extension = extension.to_lowercase();
        self.categories
            .iter()
            .find(|entry| entry.extensions.contains(&extension))
            .map(|entry| entry.name.as_str())
            .unwrap_or(FALLBACK_CATEGORY)
    }

    /// Returns the category name for a file path, based on its extension.
    ///
    /// Extensionless files classify to [`FALLBACK_CATEGORY`].
    pub fn classify_path(&self, path: &Path) -> &str {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) => self.classify(&format!(".{}", ext)),
            None => FALLBACK_CATEGORY,
        }
    }

    /// Returns the category names in table order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|entry| entry.name.as_str())
    }
}

impl Default for CategoryTable {
    /// The built-in table used by the organize operation.
    fn default() -> Self {
        Self::new([
            ("图片", vec![".jpg", ".jpeg", ".png", ".gif", ".bmp", ".webp"]),
            ("文档", vec![".pdf", ".doc", ".docx", ".txt", ".rtf"]),
            ("表格", vec![".xls", ".xlsx", ".csv"]),
            ("视频", vec![".mp4", ".avi", ".mov", ".wmv", ".flv"]),
            ("音频", vec![".mp3", ".wav", ".flac", ".aac"]),
            ("压缩包", vec![".zip", ".rar", ".7z", ".tar", ".gz"]),
            ("程序", vec![".exe", ".msi", ".bat", ".sh", ".py"]),
        ])
        .expect("built-in category table is valid")
    }
}
