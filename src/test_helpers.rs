//! Shared test utilities for the squarecrop test suite.
//!
//! Provides fixture writers that put real, decodable images on disk and a
//! small-frame config so rendering tests stay fast.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let input = image_folder(&[("a.jpg", 40, 30), ("b.png", 30, 40)]);
//! let collection = Collection::open(input.path()).unwrap();
//! assert_eq!(collection.len(), 2);
//! ```

use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::config::CropConfig;
use crate::imaging::Resample;
use image::{Rgb, RgbImage};

// =========================================================================
// Fixture setup
// =========================================================================

/// Write a `width`x`height` gradient to `dir/name`. Format follows the suffix.
pub fn write_test_image(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            128,
        ])
    });
    let path = dir.join(name);
    img.save(&path).unwrap();
    path
}

/// Write a single-colour image to `dir/name`.
pub fn write_solid_image(dir: &Path, name: &str, width: u32, height: u32, rgb: [u8; 3]) -> PathBuf {
    let path = dir.join(name);
    RgbImage::from_pixel(width, height, Rgb(rgb))
        .save(&path)
        .unwrap();
    path
}

/// Temp folder holding one gradient image per `(name, width, height)`.
pub fn image_folder(images: &[(&str, u32, u32)]) -> TempDir {
    let tmp = TempDir::new().unwrap();
    for (name, w, h) in images {
        write_test_image(tmp.path(), name, *w, *h);
    }
    tmp
}

// =========================================================================
// Config
// =========================================================================

/// Stock config with a 32px frame and nearest-neighbour sampling.
pub fn small_config() -> CropConfig {
    let mut config = CropConfig::default();
    config.target_size = 32;
    config.view.resample = Resample::Nearest;
    config
}
