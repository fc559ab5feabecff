//! Parameter types for the transform engine.
//!
//! These structs describe *what* a frame should look like, not *how* it is
//! produced. They are the interface between [`ImageState`](crate::image_state::ImageState),
//! which owns and mutates them, and [`render`](super::render), which turns them
//! into pixels.
//!
//! ## Types
//!
//! - [`Color`]: RGB background fill. Parses from `#rrggbb`.
//! - [`Transform`]: pan, zoom and background for one source image.
//! - [`TransformUpdate`]: partial update; `None` means "keep current value".
//! - [`Quality`]: Lossy encoding quality (1–100, default 90). Clamped on construction.
//! - [`Resample`]: resampling filter used when scaling the source.

use image::imageops::FilterType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransformError {
    #[error("zoom must be greater than zero and at most 1000000, got {0}")]
    InvalidZoom(f64),
}

/// Largest accepted zoom. Keeps crop-window coordinates well inside `i64`.
pub const MAX_ZOOM: f64 = 1e6;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid color {0:?}: expected #rrggbb")]
pub struct ColorParseError(pub String);

/// An opaque RGB color. Serialized as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_rgb(self) -> image::Rgb<u8> {
        image::Rgb([self.r, self.g, self.b])
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s
            .strip_prefix('#')
            .ok_or_else(|| ColorParseError(s.to_string()))?;
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorParseError(s.to_string()));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| ColorParseError(s.to_string()))
        };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl TryFrom<String> for Color {
    type Error = ColorParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        c.to_string()
    }
}

impl From<[u8; 3]> for Color {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::new(r, g, b)
    }
}

/// Pan, zoom and background for one source image.
///
/// `pan_x` / `pan_y` are offsets in target-size coordinates before zoom is
/// applied. `zoom` is always finite and greater than zero; construct through
/// [`Transform::new`] or [`Transform::apply`] to keep it that way.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub pan_x: i32,
    pub pan_y: i32,
    zoom: f64,
    pub background: Color,
}

impl Transform {
    pub fn new(pan_x: i32, pan_y: i32, zoom: f64, background: Color) -> Result<Self, TransformError> {
        Ok(Self {
            pan_x,
            pan_y,
            zoom: check_zoom(zoom)?,
            background,
        })
    }

    /// Identity transform: no pan, zoom 1.
    pub fn identity(background: Color) -> Self {
        Self {
            pan_x: 0,
            pan_y: 0,
            zoom: 1.0,
            background,
        }
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Merge a partial update. Fails without modifying `self` when the
    /// update carries an invalid zoom.
    pub fn apply(&mut self, update: &TransformUpdate) -> Result<(), TransformError> {
        let zoom = match update.zoom {
            Some(z) => check_zoom(z)?,
            None => self.zoom,
        };
        if let Some(x) = update.pan_x {
            self.pan_x = x;
        }
        if let Some(y) = update.pan_y {
            self.pan_y = y;
        }
        if let Some(bg) = update.background {
            self.background = bg;
        }
        self.zoom = zoom;
        Ok(())
    }
}

fn check_zoom(zoom: f64) -> Result<f64, TransformError> {
    if zoom > 0.0 && zoom <= MAX_ZOOM {
        Ok(zoom)
    } else {
        Err(TransformError::InvalidZoom(zoom))
    }
}

/// Partial transform update. Fields left as `None` keep their current value,
/// so an explicit `Some(0)` pan is distinct from "not supplied".
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TransformUpdate {
    pub pan_x: Option<i32>,
    pub pan_y: Option<i32>,
    pub zoom: Option<f64>,
    pub background: Option<Color>,
}

impl TransformUpdate {
    pub fn is_empty(&self) -> bool {
        self.pan_x.is_none()
            && self.pan_y.is_none()
            && self.zoom.is_none()
            && self.background.is_none()
    }
}

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}

/// Resampling filter used to scale the visible part of the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Resample {
    Nearest,
    Triangle,
    #[default]
    CatmullRom,
    Gaussian,
    Lanczos3,
}

impl From<Resample> for FilterType {
    fn from(r: Resample) -> Self {
        match r {
            Resample::Nearest => FilterType::Nearest,
            Resample::Triangle => FilterType::Triangle,
            Resample::CatmullRom => FilterType::CatmullRom,
            Resample::Gaussian => FilterType::Gaussian,
            Resample::Lanczos3 => FilterType::Lanczos3,
        }
    }
}
