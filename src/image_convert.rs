//! Image format conversion.
//!
//! Re-encodes images into a target format, writing `stem.<target>` next to
//! the source file. JPEG output flattens any alpha channel to RGB and honors
//! the quality setting; other formats use their encoder defaults.

use image::ImageFormat;
use image::codecs::jpeg::JpegEncoder;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Default JPEG quality, matching the usual "good enough" preset.
pub const DEFAULT_QUALITY: u8 = 85;

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageTarget {
    Jpg,
    Png,
    Webp,
    Bmp,
    Tiff,
}

impl ImageTarget {
    /// File extension for the output path, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Jpg => "jpg",
            Self::Png => "png",
            Self::Webp => "webp",
            Self::Bmp => "bmp",
            Self::Tiff => "tiff",
        }
    }

    fn format(&self) -> ImageFormat {
        match self {
            Self::Jpg => ImageFormat::Jpeg,
            Self::Png => ImageFormat::Png,
            Self::Webp => ImageFormat::WebP,
            Self::Bmp => ImageFormat::Bmp,
            Self::Tiff => ImageFormat::Tiff,
        }
    }
}

impl FromStr for ImageTarget {
    type Err = ImageConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "jpg" | "jpeg" => Ok(Self::Jpg),
            "png" => Ok(Self::Png),
            "webp" => Ok(Self::Webp),
            "bmp" => Ok(Self::Bmp),
            "tiff" | "tif" => Ok(Self::Tiff),
            other => Err(ImageConvertError::UnknownFormat(other.to_string())),
        }
    }
}

/// Errors that can occur during image conversion.
#[derive(Debug)]
pub enum ImageConvertError {
    /// The target format name is not supported.
    UnknownFormat(String),
    /// Quality must be between 1 and 100.
    InvalidQuality(u8),
    /// A single image failed to decode or re-encode.
    ConversionFailed { file_name: String, reason: String },
    /// The output file could not be created.
    Io {
        file_name: String,
        source: std::io::Error,
    },
}

impl std::fmt::Display for ImageConvertError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownFormat(name) => {
                write!(f, "Unsupported image format: {} (expected jpg, png, webp, bmp or tiff)", name)
            }
            Self::InvalidQuality(q) => write!(f, "Quality must be 1-100, got {}", q),
            Self::ConversionFailed { file_name, reason } => {
                write!(f, "Failed to convert {}: {}", file_name, reason)
            }
            Self::Io { file_name, source } => {
                write!(f, "IO error on {}: {}", file_name, source)
            }
        }
    }
}

impl std::error::Error for ImageConvertError {}

/// Converts every listed image to `target`, returning how many succeeded.
///
/// Output files land next to their sources as `stem.<target>`; a source
/// whose extension already matches is re-encoded over a new file of the
/// same name. The first failure aborts the batch.
pub fn convert_images(
    paths: &[PathBuf],
    target: ImageTarget,
    quality: u8,
) -> Result<usize, ImageConvertError> {
    if quality == 0 || quality > 100 {
        return Err(ImageConvertError::InvalidQuality(quality));
    }

    let mut count = 0;
    for path in paths {
        convert_one(path, target, quality)?;
        count += 1;
    }
    Ok(count)
}

fn convert_one(path: &Path, target: ImageTarget, quality: u8) -> Result<(), ImageConvertError> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());

    let img = image::open(path).map_err(|e| ImageConvertError::ConversionFailed {
        file_name: file_name.clone(),
        reason: e.to_string(),
    })?;

    let out_path = path.with_extension(target.extension());

    match target {
        ImageTarget::Jpg => {
            // JPEG has no alpha; flatten to RGB before encoding.
            let rgb = img.to_rgb8();
            let file = File::create(&out_path).map_err(|e| ImageConvertError::Io {
                file_name: file_name.clone(),
                source: e,
            })?;
            let mut writer = BufWriter::new(file);
            JpegEncoder::new_with_quality(&mut writer, quality)
                .encode_image(&rgb)
                .map_err(|e| ImageConvertError::ConversionFailed {
                    file_name,
                    reason: e.to_string(),
                })?;
        }
        _ => {
            img.save_with_format(&out_path, target.format()).map_err(|e| {
                ImageConvertError::ConversionFailed {
                    file_name,
                    reason: e.to_string(),
                }
            })?;
        }
    }

    Ok(())
}
