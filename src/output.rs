//! Operator-facing text.
//!
//! # Output Format
//!
//! ## Status (after every navigation)
//!
//! ```text
//! 2/14 photos/IMG_0042.jpg
//! ```
//!
//! ## Info
//!
//! ```text
//! 2/14 photos/IMG_0042.jpg
//!     pan: 128, 0
//!     zoom: 1.210
//!     background: #000000
//!     output: crops/
//! ```
//!
//! ## Check
//!
//! ```text
//! photos (3 images)
//!     001 a.jpg
//!     002 b.png
//!     003 c.bmp
//! ```
//!
//! # Architecture
//!
//! Each view has a `format_*` function (returns `String` or `Vec<String>`) for
//! testability. The console writes these lines to its own writer; `print_*`
//! wrappers write to stdout for the one-shot commands. Format functions are
//! pure: no I/O, no side effects.

use crate::collection::Collection;
use crate::imaging::Transform;
use crate::session::Session;
use std::path::Path;

/// Printed when the cursor runs past the last image.
pub const END_MESSAGE: &str = "Reached end of the folder! Reopen it to start anew!";

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

// ============================================================================
// Session views
// ============================================================================

/// `i/n path`, with `index` 0-based.
pub fn format_status(index: usize, len: usize, path: &Path) -> String {
    format!("{}/{} {}", index + 1, len, path.display())
}

/// Indented transform lines.
pub fn format_transform(transform: &Transform) -> Vec<String> {
    vec![
        format!("    pan: {}, {}", transform.pan_x, transform.pan_y),
        format!("    zoom: {:.3}", transform.zoom()),
        format!("    background: {}", transform.background),
    ]
}

/// Status plus transform and output folder.
///
/// A cursor on an undecodable file shows `(not loaded)` instead of a transform.
pub fn format_info(session: &Session) -> Vec<String> {
    let (index, len) = session.position();
    let mut lines = vec![format_status(index, len, session.current_path())];
    match session.transform() {
        Some(t) => lines.extend(format_transform(t)),
        None => lines.push("    (not loaded)".to_string()),
    }
    lines.push(format!("    output: {}", session.output_dir().display()));
    lines
}

pub fn format_saved(filename: &str) -> String {
    format!("{filename} just saved")
}

// ============================================================================
// Check
// ============================================================================

/// Collection listing: folder header, then one numbered line per image.
pub fn format_collection(collection: &Collection) -> Vec<String> {
    let mut lines = vec![format!(
        "{} ({} images)",
        collection.folder().display(),
        collection.len()
    )];
    for (i, path) in collection.paths().iter().enumerate() {
        lines.push(format!("    {} {}", format_index(i + 1), file_name(path)));
    }
    lines
}

pub fn print_collection(collection: &Collection) {
    for line in format_collection(collection) {
        println!("{}", line);
    }
}

// ============================================================================
// Help
// ============================================================================

pub fn format_help() -> Vec<String> {
    [
        "input DIR          choose the folder to crop from",
        "output DIR         choose the folder snapshots go to",
        "pan DX DY          move the crop window",
        "drag DX DY         move as if dragging the frame by DX, DY screen pixels",
        "zoom F             multiply zoom by F",
        "+ / -              zoom in / out one step",
        "bg #rrggbb|R G B   set the background colour",
        "next, n            next image",
        "prev, p            previous image",
        "goto N             jump to image N (1-based)",
        "snap, s            save the current frame",
        "reset              default pan and zoom",
        "info               show position and transform",
        "help               this list",
        "quit               leave",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
