//! Batch text search-and-replace across files.
//!
//! Each file is read, decoded under a stated encoding, rewritten with the
//! substitution applied, re-encoded and written back in place. Supports
//! plain and regex matching, optional case sensitivity, and any encoding
//! `encoding_rs` knows by label (utf-8, gbk, gb2312, …).

use encoding_rs::Encoding;
use regex::{NoExpand, Regex, RegexBuilder};
use std::fs;
use std::path::{Path, PathBuf};

/// Options for one batch replace run.
#[derive(Debug, Clone)]
pub struct ReplaceOptions {
    /// Match case-sensitively. Off by default.
    pub case_sensitive: bool,
    /// Treat the needle as a regular expression. In regex mode the
    /// replacement may reference capture groups (`$1`).
    pub use_regex: bool,
    /// Encoding label for reading and writing the files.
    pub encoding: String,
}

impl Default for ReplaceOptions {
    fn default() -> Self {
        Self {
            case_sensitive: false,
            use_regex: false,
            encoding: "utf-8".to_string(),
        }
    }
}

/// Errors that can occur during batch text replacement.
#[derive(Debug)]
pub enum ReplaceError {
    /// The encoding label is not recognized.
    UnknownEncoding(String),
    /// A file's bytes are not valid under the stated encoding.
    DecodeFailed { file_name: String, encoding: String },
    /// The replaced text contains characters the encoding cannot represent.
    EncodeFailed { file_name: String, encoding: String },
    /// The regex pattern failed to compile.
    InvalidPattern { pattern: String, reason: String },
    /// A file could not be read or written.
    Io {
        file_name: String,
        source: std::io::Error,
    },
}

impl std::fmt::Display for ReplaceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownEncoding(label) => write!(f, "Unknown encoding: {}", label),
            Self::DecodeFailed {
                file_name,
                encoding,
            } => {
                write!(f, "Failed to decode {} as {}", file_name, encoding)
            }
            Self::EncodeFailed {
                file_name,
                encoding,
            } => {
                write!(
                    f,
                    "Replacement in {} produced text not representable in {}",
                    file_name, encoding
                )
            }
            Self::InvalidPattern { pattern, reason } => {
                write!(f, "Invalid regex pattern '{}': {}", pattern, reason)
            }
            Self::Io { file_name, source } => {
                write!(f, "IO error on {}: {}", file_name, source)
            }
        }
    }
}

impl std::error::Error for ReplaceError {}

/// Replaces `find` with `replace` in every listed file, in place.
///
/// Returns the number of files processed. The first failure aborts the
/// batch; files rewritten before the failure keep their new content.
pub fn batch_replace(
    files: &[PathBuf],
    find: &str,
    replace: &str,
    options: &ReplaceOptions,
) -> Result<usize, ReplaceError> {
    let encoding = Encoding::for_label(options.encoding.as_bytes())
        .ok_or_else(|| ReplaceError::UnknownEncoding(options.encoding.clone()))?;
    let matcher = build_matcher(find, options)?;

    let mut count = 0;
    for file in files {
        replace_in_file(file, &matcher, replace, encoding, &options.encoding)?;
        count += 1;
    }
    Ok(count)
}

/// Compiled form of the needle. Plain case-sensitive search needs no regex
/// machinery at all; the escaped-literal and regex paths differ in whether
/// the replacement may expand capture groups.
enum Matcher {
    Literal(String),
    Pattern { re: Regex, expand: bool },
}

fn build_matcher(find: &str, options: &ReplaceOptions) -> Result<Matcher, ReplaceError> {
    if !options.use_regex && options.case_sensitive {
        return Ok(Matcher::Literal(find.to_string()));
    }

    let pattern = if options.use_regex {
        find.to_string()
    } else {
        regex::escape(find)
    };

    RegexBuilder::new(&pattern)
        .case_insensitive(!options.case_sensitive)
        .build()
        .map(|re| Matcher::Pattern {
            re,
            expand: options.use_regex,
        })
        .map_err(|e| ReplaceError::InvalidPattern {
            pattern,
            reason: e.to_string(),
        })
}

fn replace_in_file(
    file: &Path,
    matcher: &Matcher,
    replace: &str,
    encoding: &'static Encoding,
    encoding_label: &str,
) -> Result<(), ReplaceError> {
    let file_name = file
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| file.display().to_string());

    let bytes = fs::read(file).map_err(|e| ReplaceError::Io {
        file_name: file_name.clone(),
        source: e,
    })?;

    let (text, _, had_errors) = encoding.decode(&bytes);
    if had_errors {
        return Err(ReplaceError::DecodeFailed {
            file_name,
            encoding: encoding_label.to_string(),
        });
    }

    let new_text = match matcher {
        Matcher::Literal(find) => text.replace(find.as_str(), replace),
        Matcher::Pattern { re, expand: true } => re.replace_all(&text, replace).into_owned(),
        // Escaped-literal path: substitute the replacement verbatim.
        Matcher::Pattern { re, expand: false } => {
            re.replace_all(&text, NoExpand(replace)).into_owned()
        }
    };

    let (encoded, _, had_unmappable) = encoding.encode(&new_text);
    if had_unmappable {
        return Err(ReplaceError::EncodeFailed {
            file_name,
            encoding: encoding_label.to_string(),
        });
    }

    fs::write(file, &encoded).map_err(|e| ReplaceError::Io {
        file_name,
        source: e,
    })?;

    Ok(())
}
