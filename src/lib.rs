//! batchkit - batch file processing toolkit
//!
//! This library provides utilities for batch renaming files, replacing text
//! across multiple files, converting image and tabular formats, scanning
//! folders, and organizing a folder's contents into category-based
//! subdirectories with collision-safe moves.

pub mod category;
pub mod cli;
pub mod config;
pub mod image_convert;
pub mod organizer;
pub mod output;
pub mod rename;
pub mod scanner;
pub mod table_convert;
pub mod text_replace;

pub use category::{CategoryTable, CategoryTableError, FALLBACK_CATEGORY};
pub use config::{CategoryConfig, ConfigError};
pub use organizer::{MoveOutcome, OrganizeError, OrganizeStats, move_unique, organize_by_type};
pub use rename::{RenamePlan, RenameRule};
pub use scanner::{FileEntry, ScanError, scan_folder, scan_in_background};

pub use cli::{Cli, run};
