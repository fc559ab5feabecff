//! Pure Rust image backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, BMP) | `image::ImageReader` with content sniffing |
//! | Encode → PNG / BMP | `image::codecs::{png, bmp}` |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` with [`Quality`] |

use super::backend::{BackendError, ImageBackend, SnapshotFormat, SourceImage};
use super::params::Quality;
use image::codecs::bmp::BmpEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, ImageReader, RgbImage};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// File-name suffixes accepted into a collection. Matching is case-sensitive.
pub const SUPPORTED_SUFFIXES: &[&str] = &[".jpg", ".png", ".bmp"];

/// Returns the file-name suffixes that have decoders compiled in.
pub fn supported_input_suffixes() -> &'static [&'static str] {
    SUPPORTED_SUFFIXES
}

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn encode_error(path: &Path, e: impl std::fmt::Display) -> BackendError {
    BackendError::Encode {
        path: path.to_path_buf(),
        message: e.to_string(),
    }
}

impl ImageBackend for RustBackend {
    fn decode(&self, path: &Path) -> Result<SourceImage, BackendError> {
        let decode_error = |message: String| BackendError::Decode {
            path: path.to_path_buf(),
            message,
        };
        // Sniff content rather than trusting the suffix: a `.jpg` that is
        // really a PNG still decodes.
        let img = ImageReader::open(path)?
            .with_guessed_format()?
            .decode()
            .map_err(|e| decode_error(e.to_string()))?;
        SourceImage::new(img.into_rgb8()).ok_or_else(|| decode_error("image has no pixels".into()))
    }

    fn encode(
        &self,
        frame: &RgbImage,
        path: &Path,
        format: SnapshotFormat,
        quality: Quality,
    ) -> Result<(), BackendError> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        let (w, h) = frame.dimensions();
        let result = match format {
            SnapshotFormat::Png => {
                PngEncoder::new(&mut writer).write_image(frame.as_raw(), w, h, ExtendedColorType::Rgb8)
            }
            SnapshotFormat::Bmp => {
                BmpEncoder::new(&mut writer).write_image(frame.as_raw(), w, h, ExtendedColorType::Rgb8)
            }
            SnapshotFormat::Jpg => JpegEncoder::new_with_quality(&mut writer, quality.value() as u8)
                .write_image(frame.as_raw(), w, h, ExtendedColorType::Rgb8),
        };
        result.map_err(|e| encode_error(path, e))?;
        writer.flush()?;
        Ok(())
    }
}
