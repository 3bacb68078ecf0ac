//! Command-line interface for batchkit.
//!
//! Each subcommand maps to one batch operation: scanning a folder, renaming
//! files by rule, replacing text inside files, converting image or tabular
//! formats, and organizing a folder into per-category subfolders. Operations
//! fail fast: the first file that cannot be processed aborts the batch and
//! the error is reported once with the offending file name.

use crate::config::CategoryConfig;
use crate::image_convert::{self, DEFAULT_QUALITY, ImageTarget};
use crate::organizer;
use crate::output::OutputFormatter;
use crate::rename::{self, RenameRule};
use crate::scanner::{self, format_size};
use crate::table_convert;
use crate::text_replace::{self, ReplaceOptions};
use clap::{Args, Parser, Subcommand};
use std::collections::HashMap;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "batchkit",
    version,
    about = "Batch file toolkit: rename, replace, convert and organize files"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// File inputs for commands that operate on an explicit selection.
#[derive(Args, Debug)]
pub struct FileSelection {
    /// Files to process.
    pub files: Vec<PathBuf>,

    /// Glob pattern adding matching files to the selection.
    #[arg(long)]
    pub glob: Option<String>,
}

impl FileSelection {
    /// Resolves explicit paths plus glob matches into one file list.
    fn resolve(&self) -> Result<Vec<PathBuf>, String> {
        let mut files = self.files.clone();
        if let Some(pattern) = &self.glob {
            let matches = glob::glob(pattern)
                .map_err(|e| format!("Invalid glob pattern '{}': {}", pattern, e))?;
            for entry in matches {
                let path = entry.map_err(|e| format!("Glob error: {}", e))?;
                if path.is_file() {
                    files.push(path);
                }
            }
        }
        if files.is_empty() {
            return Err("No input files given (pass paths or --glob)".to_string());
        }
        Ok(files)
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// List the files in a folder with size and modification time.
    Scan { folder: PathBuf },

    /// Rename files by template, find/replace, or prefix/suffix.
    Rename {
        #[command(flatten)]
        selection: FileSelection,

        /// Template for the new stem; `{n}` becomes the running index.
        #[arg(long, conflicts_with_all = ["find", "prefix", "suffix"])]
        template: Option<String>,

        /// First index substituted for `{n}`.
        #[arg(long, default_value_t = 1)]
        start: usize,

        /// Substring to find in the stem.
        #[arg(long, requires = "replace")]
        find: Option<String>,

        /// Replacement for `--find`.
        #[arg(long, requires = "find")]
        replace: Option<String>,

        /// Prefix added to the stem.
        #[arg(long)]
        prefix: Option<String>,

        /// Suffix appended to the stem, before the extension.
        #[arg(long)]
        suffix: Option<String>,

        /// Show the planned renames without performing them.
        #[arg(long)]
        dry_run: bool,
    },

    /// Search and replace text inside files.
    Replace {
        #[command(flatten)]
        selection: FileSelection,

        /// Text (or regex, with --regex) to search for.
        #[arg(long)]
        find: String,

        /// Replacement text.
        #[arg(long)]
        replace: String,

        /// Treat the search text as a regular expression.
        #[arg(long)]
        regex: bool,

        /// Match case-sensitively.
        #[arg(long)]
        case_sensitive: bool,

        /// Encoding used to read and write the files (utf-8, gbk, …).
        #[arg(long, default_value = "utf-8")]
        encoding: String,
    },

    /// Convert images to another format.
    ConvertImage {
        #[command(flatten)]
        selection: FileSelection,

        /// Target format: jpg, png, webp, bmp or tiff.
        #[arg(long, default_value = "jpg")]
        format: String,

        /// JPEG quality, 1-100.
        #[arg(long, default_value_t = DEFAULT_QUALITY)]
        quality: u8,
    },

    /// Convert CSV files to Excel workbooks.
    Csv2xlsx {
        #[command(flatten)]
        selection: FileSelection,
    },

    /// Convert Excel workbooks to CSV files.
    Xlsx2csv {
        #[command(flatten)]
        selection: FileSelection,
    },

    /// Move a folder's files into per-category subfolders.
    Organize {
        folder: PathBuf,

        /// Show the planned moves without performing them.
        #[arg(long)]
        dry_run: bool,

        /// Path to a category table configuration file.
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

/// Runs the parsed command; errors are already formatted for display.
pub fn run(cli: Cli) -> Result<(), String> {
    match cli.command {
        Command::Scan { folder } => run_scan(folder),
        Command::Rename {
            selection,
            template,
            start,
            find,
            replace,
            prefix,
            suffix,
            dry_run,
        } => run_rename(selection, template, start, find, replace, prefix, suffix, dry_run),
        Command::Replace {
            selection,
            find,
            replace,
            regex,
            case_sensitive,
            encoding,
        } => run_replace(selection, find, replace, regex, case_sensitive, encoding),
        Command::ConvertImage {
            selection,
            format,
            quality,
        } => run_convert_image(selection, format, quality),
        Command::Csv2xlsx { selection } => run_csv_to_xlsx(selection),
        Command::Xlsx2csv { selection } => run_xlsx_to_csv(selection),
        Command::Organize {
            folder,
            dry_run,
            config,
        } => run_organize(folder, dry_run, config),
    }
}

fn run_scan(folder: PathBuf) -> Result<(), String> {
    OutputFormatter::log(&format!("Scanning folder: {}", folder.display()));

    // The scan runs on a worker thread; the receiver blocks until the
    // complete list arrives in one message.
    let rx = scanner::scan_in_background(folder);
    let entries = rx
        .recv()
        .map_err(|_| "Scan worker terminated unexpectedly".to_string())?
        .map_err(|e| e.to_string())?;

    if entries.is_empty() {
        OutputFormatter::warning("No files found.");
        return Ok(());
    }

    for entry in &entries {
        OutputFormatter::plain(&format!(
            "{:<40} {:>10}  {}",
            entry.name,
            format_size(entry.size),
            entry.modified_display()
        ));
    }
    OutputFormatter::log(&format!("Scan complete, {} files found", entries.len()));
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn run_rename(
    selection: FileSelection,
    template: Option<String>,
    start: usize,
    find: Option<String>,
    replace: Option<String>,
    prefix: Option<String>,
    suffix: Option<String>,
    dry_run: bool,
) -> Result<(), String> {
    let rule = if let Some(template) = template {
        RenameRule::Pattern { template, start }
    } else if let Some(find) = find {
        RenameRule::FindReplace {
            find,
            replace: replace.unwrap_or_default(),
        }
    } else if prefix.is_some() || suffix.is_some() {
        RenameRule::Affix {
            prefix: prefix.unwrap_or_default(),
            suffix: suffix.unwrap_or_default(),
        }
    } else {
        return Err(
            "Specify a rename rule: --template, --find/--replace, or --prefix/--suffix"
                .to_string(),
        );
    };

    let files = selection.resolve()?;
    let plans = rename::plan(&files, &rule).map_err(|e| e.to_string())?;

    if dry_run {
        OutputFormatter::dry_run_notice("Planned renames:");
        for plan in &plans {
            OutputFormatter::plain(&format!(
                " - {} → {}",
                plan.from.display(),
                plan.to
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default()
            ));
        }
        OutputFormatter::dry_run_notice("No files were renamed.");
        return Ok(());
    }

    let count = rename::apply(&plans).map_err(|e| e.to_string())?;
    OutputFormatter::success(&format!("Renamed {} files", count));
    Ok(())
}

fn run_replace(
    selection: FileSelection,
    find: String,
    replace: String,
    regex: bool,
    case_sensitive: bool,
    encoding: String,
) -> Result<(), String> {
    let files = selection.resolve()?;
    let options = ReplaceOptions {
        case_sensitive,
        use_regex: regex,
        encoding,
    };

    let pb = OutputFormatter::create_progress_bar(files.len() as u64);
    for file in &files {
        text_replace::batch_replace(std::slice::from_ref(file), &find, &replace, &options)
            .map_err(|e| e.to_string())?;
        pb.inc(1);
    }
    pb.finish_and_clear();

    OutputFormatter::success(&format!("Replaced text in {} files", files.len()));
    Ok(())
}

fn run_convert_image(
    selection: FileSelection,
    format: String,
    quality: u8,
) -> Result<(), String> {
    let target: ImageTarget = format.parse().map_err(|e: image_convert::ImageConvertError| e.to_string())?;
    let files = selection.resolve()?;

    let pb = OutputFormatter::create_progress_bar(files.len() as u64);
    for file in &files {
        image_convert::convert_images(std::slice::from_ref(file), target, quality)
            .map_err(|e| e.to_string())?;
        pb.inc(1);
    }
    pb.finish_and_clear();

    OutputFormatter::success(&format!(
        "Converted {} images to {}",
        files.len(),
        target.extension()
    ));
    Ok(())
}

fn run_csv_to_xlsx(selection: FileSelection) -> Result<(), String> {
    let files = selection.resolve()?;
    let count = table_convert::csv_to_xlsx(&files).map_err(|e| e.to_string())?;
    OutputFormatter::success(&format!("Converted {} CSV files to xlsx", count));
    Ok(())
}

fn run_xlsx_to_csv(selection: FileSelection) -> Result<(), String> {
    let files = selection.resolve()?;
    let count = table_convert::xlsx_to_csv(&files).map_err(|e| e.to_string())?;
    OutputFormatter::success(&format!("Converted {} workbooks to CSV", count));
    Ok(())
}

fn run_organize(
    folder: PathBuf,
    dry_run: bool,
    config: Option<PathBuf>,
) -> Result<(), String> {
    let table = CategoryConfig::load(config.as_deref())
        .map_err(|e| e.to_string())?
        .into_table()
        .map_err(|e| e.to_string())?;

    if dry_run {
        OutputFormatter::dry_run_notice(&format!("Analyzing contents of {}", folder.display()));
        let plans = organizer::plan_by_type(&folder, &table).map_err(|e| e.to_string())?;
        if plans.is_empty() {
            OutputFormatter::warning("No files to organize.");
            return Ok(());
        }

        let mut counts: HashMap<String, usize> = HashMap::new();
        for plan in &plans {
            OutputFormatter::plain(&format!(" - {} → {}/", plan.file_name, plan.category));
            *counts.entry(plan.category.clone()).or_insert(0) += 1;
        }
        OutputFormatter::summary_table(&counts, plans.len());
        OutputFormatter::dry_run_notice("No files were moved.");
        return Ok(());
    }

    OutputFormatter::log(&format!("Organizing contents of {}", folder.display()));
    let stats = organizer::organize_by_type(&folder, &table).map_err(|e| e.to_string())?;
    OutputFormatter::success(&format!(
        "Organize complete: created {} category folders, moved {} files",
        stats.folders_created, stats.files_moved
    ));
    Ok(())
}
