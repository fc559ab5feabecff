//! Transform engine, pure Rust on top of the `image` crate.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::ImageReader` (JPEG, PNG, BMP) |
//! | **Render** | `imageops::crop_imm` → `imageops::resize` → `imageops::replace` |
//! | **Encode** | `image::codecs::{png, bmp, jpeg}` |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for crop-window math (unit testable)
//! - **Parameters**: [`Transform`], [`TransformUpdate`], [`Color`] and friends
//! - **Render**: [`render`] and [`default_transform`]
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]

pub mod backend;
pub mod calculations;
pub mod params;
pub mod render;
pub mod rust_backend;

pub use backend::{BackendError, ImageBackend, SnapshotFormat, SourceImage};
pub use calculations::suggest_pan_x;
pub use params::{
    Color, ColorParseError, MAX_ZOOM, Quality, Resample, Transform, TransformError,
    TransformUpdate,
};
pub use render::{RenderedFrame, default_transform, render};
pub use rust_backend::{RustBackend, supported_input_suffixes};
