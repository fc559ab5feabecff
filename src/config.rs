//! Cropper configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! serialized to a TOML table, the user's file is overlaid key by key, and
//! the merged table is deserialized and validated.
//!
//! ## Config File Location
//!
//! `config.toml` is read from the directory given by `--config-dir`
//! (default: the working directory). The file is optional.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! target_size = 512          # Side of every rendered frame in pixels
//!
//! [view]
//! background = "#000000"     # Background until the operator picks one
//! zoom_step = 1.1            # Factor for one zoom-in / zoom-out step
//! resample = "catmull-rom"   # nearest | triangle | catmull-rom | gaussian | lanczos3
//!
//! [snapshot]
//! format = "png"             # png | bmp | jpg
//! quality = 90               # JPEG quality (1-100)
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse; override just the values you want:
//!
//! ```toml
//! [view]
//! background = "#ffffff"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{Color, Resample, SnapshotFormat};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Largest accepted `target_size`.
pub const MAX_TARGET_SIZE: u32 = 8192;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Cropper configuration loaded from `config.toml`.
///
/// All fields have defaults. User config files need only specify the values
/// they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CropConfig {
    /// Side length of every rendered frame.
    pub target_size: u32,
    /// Interactive view settings.
    pub view: ViewConfig,
    /// Snapshot encoding settings.
    pub snapshot: SnapshotConfig,
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            target_size: 512,
            view: ViewConfig::default(),
            snapshot: SnapshotConfig::default(),
        }
    }
}

impl CropConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.target_size == 0 || self.target_size > MAX_TARGET_SIZE {
            return Err(ConfigError::Validation(format!(
                "target_size must be 1-{MAX_TARGET_SIZE}"
            )));
        }
        if !(self.view.zoom_step.is_finite() && self.view.zoom_step > 1.0) {
            return Err(ConfigError::Validation(
                "view.zoom_step must be greater than 1".into(),
            ));
        }
        if !(1..=100).contains(&self.snapshot.quality) {
            return Err(ConfigError::Validation(
                "snapshot.quality must be 1-100".into(),
            ));
        }
        Ok(())
    }
}

/// Interactive view settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewConfig {
    /// Background color used until the operator picks one.
    pub background: Color,
    /// Multiplicative factor applied by one zoom step.
    pub zoom_step: f64,
    /// Resampling filter.
    pub resample: Resample,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            background: Color::BLACK,
            zoom_step: 1.1,
            resample: Resample::default(),
        }
    }
}

/// Snapshot encoding settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SnapshotConfig {
    pub format: SnapshotFormat,
    /// JPEG quality; ignored for lossless formats.
    pub quality: u32,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            format: SnapshotFormat::default(),
            quality: 90,
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(CropConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<CropConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: CropConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(dir: &Path) -> Result<CropConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(dir)?;
    let config = resolve_config(base, overlay)?;
    log::debug!("config loaded from {}: {:?}", dir.display(), config);
    Ok(config)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# squarecrop Configuration
# ========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# Side length in pixels of every rendered frame and every snapshot.
target_size = 512

# ---------------------------------------------------------------------------
# Interactive view
# ---------------------------------------------------------------------------
[view]
# Background fill for pixels not covered by the image. Changing it during a
# session carries over to the following images and sessions.
background = "#000000"

# Factor applied by one zoom-in step ("+"); zoom-out ("-") divides by it.
zoom_step = 1.1

# Resampling filter: nearest, triangle, catmull-rom, gaussian, lanczos3.
resample = "catmull-rom"

# ---------------------------------------------------------------------------
# Snapshots
# ---------------------------------------------------------------------------
[snapshot]
# Output format: png, bmp or jpg.
format = "png"

# JPEG encoding quality (1 = worst, 100 = best). Ignored for png and bmp.
quality = 90
"##
}
