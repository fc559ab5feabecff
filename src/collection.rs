//! Folder scanning and cursor navigation.
//!
//! A [`Collection`] is the ordered list of image files found directly inside
//! one input folder. It is built once and never changes. A [`Navigator`]
//! walks it with a cursor.
//!
//! ## Selection Rules
//!
//! - Only regular files directly inside the folder (no recursion).
//! - File name must end in `.jpg`, `.png` or `.bmp`, case-sensitive:
//!   `a.jpg` qualifies, `A.JPG` does not.
//! - Files are ordered by file name.
//! - A folder with no qualifying files is an error, not an empty collection.

use crate::imaging::supported_input_suffixes;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CollectionError {
    #[error("Cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{0} does not contain images")]
    Empty(PathBuf),
}

/// Ordered, immutable list of source image paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection {
    folder: PathBuf,
    paths: Vec<PathBuf>,
}

impl Collection {
    /// List the supported images in `folder`.
    pub fn open(folder: &Path) -> Result<Self, CollectionError> {
        let io_err = |source| CollectionError::Io {
            path: folder.to_path_buf(),
            source,
        };
        let mut paths: Vec<PathBuf> = fs::read_dir(folder)
            .map_err(io_err)?
            .filter_map(|e| readable(folder, e.map(|e| e.path())))
            .filter(|p| p.is_file() && is_supported(p))
            .collect();
        paths.sort();

        Self::from_paths(folder, paths)
    }

    /// Build a collection from an already-filtered list. Fails when empty.
    pub fn from_paths(folder: &Path, paths: Vec<PathBuf>) -> Result<Self, CollectionError> {
        if paths.is_empty() {
            return Err(CollectionError::Empty(folder.to_path_buf()));
        }
        log::info!("{} images in {}", paths.len(), folder.display());
        Ok(Self {
            folder: folder.to_path_buf(),
            paths,
        })
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn get(&self, index: usize) -> Option<&Path> {
        self.paths.get(index).map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Always `false`: construction rejects empty folders.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Path of a listed entry, or `None` (with a warning) if it could not be read.
fn readable(folder: &Path, entry: std::io::Result<PathBuf>) -> Option<PathBuf> {
    entry
        .inspect_err(|e| log::warn!("{}: skipping unreadable entry: {e}", folder.display()))
        .ok()
}

fn is_supported(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    supported_input_suffixes()
        .iter()
        .any(|suffix| name.ends_with(suffix))
}

/// Result of moving the cursor forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Cursor now points at this index.
    Moved(usize),
    /// Cursor ran past the last element; the walk is over.
    End,
}

/// A cursor over a [`Collection`].
///
/// `0 <= cursor < len` holds until [`Navigator::advance`] returns
/// [`Advance::End`]; after that the navigator is finished and every move is
/// refused.
#[derive(Debug, Clone)]
pub struct Navigator {
    collection: Collection,
    cursor: usize,
    finished: bool,
}

impl Navigator {
    pub fn new(collection: Collection) -> Self {
        Self {
            collection,
            cursor: 0,
            finished: false,
        }
    }

    pub fn collection(&self) -> &Collection {
        &self.collection
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.collection.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collection.is_empty()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Path under the cursor.
    pub fn current(&self) -> &Path {
        &self.collection.paths[self.cursor]
    }

    /// Move forward by one.
    pub fn advance(&mut self) -> Advance {
        if self.finished || self.cursor + 1 >= self.collection.len() {
            self.finished = true;
            log::debug!("navigator: end of {}", self.collection.folder.display());
            return Advance::End;
        }
        self.cursor += 1;
        Advance::Moved(self.cursor)
    }

    /// Move back by one. Returns `None` (and stays put) at the first element.
    pub fn retreat(&mut self) -> Option<usize> {
        if self.finished || self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(self.cursor)
    }

    /// Jump to `index`. Returns `None` and leaves the cursor unchanged when
    /// `index` is out of range.
    pub fn jump_to(&mut self, index: usize) -> Option<usize> {
        if self.finished || index >= self.collection.len() {
            return None;
        }
        self.cursor = index;
        Some(index)
    }
}
