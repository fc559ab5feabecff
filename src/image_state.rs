//! The currently loaded image and its transform.
//!
//! [`ImageState`] owns one [`SourceImage`], the [`Transform`] applied to it,
//! and the last [`RenderedFrame`]. Every mutation re-renders synchronously,
//! so [`ImageState::current`] always reflects the latest transform.

use crate::imaging::{
    BackendError, Color, ImageBackend, RenderedFrame, Resample, SourceImage, Transform,
    TransformError, TransformUpdate, default_transform, render,
};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImageStateError {
    #[error("Image decode error: {0}")]
    Decode(#[from] BackendError),
    #[error("Invalid transform: {0}")]
    Transform(#[from] TransformError),
}

/// How frames are produced for this state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSettings {
    pub target_size: u32,
    pub filter: Resample,
}

#[derive(Debug)]
pub struct ImageState {
    path: PathBuf,
    source: SourceImage,
    transform: Transform,
    frame: RenderedFrame,
    settings: RenderSettings,
}

impl ImageState {
    /// Decode `path` and render it with the default transform.
    pub fn open(
        backend: &impl ImageBackend,
        path: &Path,
        settings: RenderSettings,
        background: Color,
    ) -> Result<Self, ImageStateError> {
        let source = backend.decode(path)?;
        let transform = default_transform(&source, settings.target_size, background);
        let frame = render(&source, &transform, settings.target_size, settings.filter);
        log::debug!(
            "opened {} ({}x{}), default pan_x {}",
            path.display(),
            source.width(),
            source.height(),
            transform.pan_x
        );
        Ok(Self {
            path: path.to_path_buf(),
            source,
            transform,
            frame,
            settings,
        })
    }

    /// Replace the source with the image at `path`.
    ///
    /// The transform resets to the default for the new image; the background
    /// carries over. On failure the previous image stays loaded.
    pub fn load(&mut self, backend: &impl ImageBackend, path: &Path) -> Result<(), ImageStateError> {
        *self = Self::open(backend, path, self.settings, self.transform.background)?;
        Ok(())
    }

    /// Merge `update` into the transform and re-render.
    ///
    /// Every call renders, even when nothing changed. An invalid zoom is
    /// rejected and leaves transform and frame untouched.
    pub fn update(&mut self, update: &TransformUpdate) -> Result<&RenderedFrame, ImageStateError> {
        self.transform.apply(update)?;
        self.rerender();
        Ok(&self.frame)
    }

    /// Restore the default pan and zoom, keeping the background.
    pub fn reset(&mut self) -> &RenderedFrame {
        self.transform =
            default_transform(&self.source, self.settings.target_size, self.transform.background);
        self.rerender();
        &self.frame
    }

    /// The cached frame. Never re-renders.
    pub fn current(&self) -> &RenderedFrame {
        &self.frame
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn source(&self) -> &SourceImage {
        &self.source
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn rerender(&mut self) {
        self.frame = render(
            &self.source,
            &self.transform,
            self.settings.target_size,
            self.settings.filter,
        );
    }
}
