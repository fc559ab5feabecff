//! Persisting rendered frames.

use crate::imaging::{BackendError, ImageBackend, Quality, RenderedFrame, SnapshotFormat};
use crate::naming::{timestamp_stem, unique_snapshot_path};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("Cannot write snapshot to {dir}: {source}")]
    OutputWrite {
        dir: PathBuf,
        #[source]
        source: BackendError,
    },
}

/// Writes frames into one output directory.
#[derive(Debug, Clone)]
pub struct SnapshotWriter {
    dir: PathBuf,
    format: SnapshotFormat,
    quality: Quality,
}

impl SnapshotWriter {
    pub fn new(dir: impl Into<PathBuf>, format: SnapshotFormat, quality: Quality) -> Self {
        Self {
            dir: dir.into(),
            format,
            quality,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Encode `frame` under a timestamp-derived name and return that name.
    ///
    /// The output directory must already exist.
    pub fn capture(
        &self,
        backend: &impl ImageBackend,
        frame: &RenderedFrame,
    ) -> Result<String, SnapshotError> {
        self.capture_at(backend, frame, SystemTime::now())
    }

    /// [`capture`](Self::capture) with an explicit timestamp.
    pub fn capture_at(
        &self,
        backend: &impl ImageBackend,
        frame: &RenderedFrame,
        time: SystemTime,
    ) -> Result<String, SnapshotError> {
        let stem = timestamp_stem(time);
        let path = unique_snapshot_path(&self.dir, &stem, self.format.extension());
        backend
            .encode(frame, &path, self.format, self.quality)
            .map_err(|source| SnapshotError::OutputWrite {
                dir: self.dir.clone(),
                source,
            })?;

        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        log::info!("saved {}", path.display());
        Ok(filename)
    }
}
