//! CSV ↔ Excel conversion.
//!
//! Both directions copy cell values as text, row by row, into a sibling
//! output file (`stem.xlsx` or `stem.csv`). Only the first worksheet of an
//! Excel workbook is read. CSV output starts with a UTF-8 byte-order mark so
//! spreadsheet applications pick the right encoding.

use calamine::Reader;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Errors that can occur during tabular conversion.
#[derive(Debug)]
pub enum TableConvertError {
    /// A CSV file could not be parsed.
    CsvFailed { file_name: String, reason: String },
    /// An Excel workbook could not be read or written.
    ExcelFailed { file_name: String, reason: String },
    /// The workbook has no worksheets.
    NoWorksheet { file_name: String },
    /// The output file could not be created or written.
    Io {
        file_name: String,
        source: std::io::Error,
    },
}

impl std::fmt::Display for TableConvertError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CsvFailed { file_name, reason } => {
                write!(f, "Failed to process CSV {}: {}", file_name, reason)
            }
            Self::ExcelFailed { file_name, reason } => {
                write!(f, "Failed to process workbook {}: {}", file_name, reason)
            }
            Self::NoWorksheet { file_name } => {
                write!(f, "Workbook {} has no worksheets", file_name)
            }
            Self::Io { file_name, source } => {
                write!(f, "IO error on {}: {}", file_name, source)
            }
        }
    }
}

impl std::error::Error for TableConvertError {}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Converts each CSV file into an `.xlsx` workbook next to it.
///
/// All cells are written as strings; the CSV is copied verbatim, header row
/// included. Returns the number of files converted; the first failure
/// aborts the batch.
pub fn csv_to_xlsx(paths: &[PathBuf]) -> Result<usize, TableConvertError> {
    let mut count = 0;
    for path in paths {
        convert_csv_file(path)?;
        count += 1;
    }
    Ok(count)
}

fn convert_csv_file(path: &Path) -> Result<(), TableConvertError> {
    let file_name = display_name(path);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| TableConvertError::CsvFailed {
            file_name: file_name.clone(),
            reason: e.to_string(),
        })?;

    let mut workbook = rust_xlsxwriter::Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (row, record) in reader.records().enumerate() {
        let record = record.map_err(|e| TableConvertError::CsvFailed {
            file_name: file_name.clone(),
            reason: e.to_string(),
        })?;
        for (col, field) in record.iter().enumerate() {
            worksheet
                .write_string(row as u32, col as u16, field)
                .map_err(|e| TableConvertError::ExcelFailed {
                    file_name: file_name.clone(),
                    reason: e.to_string(),
                })?;
        }
    }

    let out_path = path.with_extension("xlsx");
    workbook
        .save(&out_path)
        .map_err(|e| TableConvertError::ExcelFailed {
            file_name,
            reason: e.to_string(),
        })?;

    Ok(())
}

/// Converts the first worksheet of each Excel workbook into a `.csv` next
/// to it.
///
/// Handles both `.xlsx` and legacy `.xls` input. Returns the number of
/// files converted; the first failure aborts the batch.
pub fn xlsx_to_csv(paths: &[PathBuf]) -> Result<usize, TableConvertError> {
    let mut count = 0;
    for path in paths {
        convert_excel_file(path)?;
        count += 1;
    }
    Ok(count)
}

fn convert_excel_file(path: &Path) -> Result<(), TableConvertError> {
    let file_name = display_name(path);

    let mut workbook =
        calamine::open_workbook_auto(path).map_err(|e| TableConvertError::ExcelFailed {
            file_name: file_name.clone(),
            reason: e.to_string(),
        })?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| TableConvertError::NoWorksheet {
            file_name: file_name.clone(),
        })?
        .map_err(|e| TableConvertError::ExcelFailed {
            file_name: file_name.clone(),
            reason: e.to_string(),
        })?;

    let out_path = path.with_extension("csv");
    let file = File::create(&out_path).map_err(|e| TableConvertError::Io {
        file_name: file_name.clone(),
        source: e,
    })?;
    let mut writer = BufWriter::new(file);

    // UTF-8 BOM so Excel re-opens the CSV with the right encoding.
    writer
        .write_all(b"\xEF\xBB\xBF")
        .map_err(|e| TableConvertError::Io {
            file_name: file_name.clone(),
            source: e,
        })?;

    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in range.rows() {
        let record: Vec<String> = row.iter().map(|cell| cell.to_string()).collect();
        csv_writer
            .write_record(&record)
            .map_err(|e| TableConvertError::CsvFailed {
                file_name: file_name.clone(),
                reason: e.to_string(),
            })?;
    }
    csv_writer.flush().map_err(|e| TableConvertError::Io {
        file_name,
        source: e,
    })?;

    Ok(())
}
