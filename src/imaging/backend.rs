//! Image backend trait and shared types.
//!
//! The [`ImageBackend`] trait is the I/O seam of the engine: decode a source
//! file into a [`SourceImage`] and encode a rendered frame to disk. Everything
//! between those two calls is pure pixel math in [`render`](super::render).
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate's pure-Rust codecs.

use super::params::Quality;
use image::RgbImage;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to decode {path}: {message}")]
    Decode { path: PathBuf, message: String },
    #[error("Failed to encode {path}: {message}")]
    Encode { path: PathBuf, message: String },
}

/// An immutable decoded raster.
///
/// Always 8-bit RGB; alpha is dropped at decode time. Replaced wholesale on
/// navigation, never mutated in place.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceImage {
    pixels: RgbImage,
}

impl SourceImage {
    /// Wrap decoded pixels. Returns `None` for a zero-sized image.
    pub fn new(pixels: RgbImage) -> Option<Self> {
        (pixels.width() > 0 && pixels.height() > 0).then_some(Self { pixels })
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    pub fn pixels(&self) -> &RgbImage {
        &self.pixels
    }
}

/// Encoded file format for snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotFormat {
    #[default]
    Png,
    Bmp,
    Jpg,
}

impl SnapshotFormat {
    pub fn extension(self) -> &'static str {
        match self {
            SnapshotFormat::Png => "png",
            SnapshotFormat::Bmp => "bmp",
            SnapshotFormat::Jpg => "jpg",
        }
    }
}

/// Trait for image I/O backends.
///
/// Keeps decoding and encoding behind one seam so session logic can be
/// tested against a mock without touching codecs.
pub trait ImageBackend {
    /// Decode the file at `path` into RGB pixels.
    fn decode(&self, path: &Path) -> Result<SourceImage, BackendError>;

    /// Encode `frame` to `path` in the given format.
    fn encode(
        &self,
        frame: &RgbImage,
        path: &Path,
        format: SnapshotFormat,
        quality: Quality,
    ) -> Result<(), BackendError>;
}

impl<B: ImageBackend + ?Sized> ImageBackend for &B {
    fn decode(&self, path: &Path) -> Result<SourceImage, BackendError> {
        (**self).decode(path)
    }

    fn encode(
        &self,
        frame: &RgbImage,
        path: &Path,
        format: SnapshotFormat,
        quality: Quality,
    ) -> Result<(), BackendError> {
        (**self).encode(frame, path, format, quality)
    }
}
