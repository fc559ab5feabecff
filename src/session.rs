//! Session state machine.
//!
//! A [`Session`] binds a [`Navigator`] over one input folder, the
//! [`ImageState`] for the image under the cursor, and a [`SnapshotWriter`]
//! for the output folder. It is driven by [`Command`]s through
//! [`Session::apply`], the single state-transition function.
//!
//! A [`Controller`] owns at most one session plus the folder selections that
//! create it. It is what a front end talks to.
//!
//! ## Lifecycle
//!
//! ```text
//! select_input + select_output ──► active ──next past last──► ended (dropped)
//!                                     ▲                            │
//!                                     └──── select_input again ◄───┘
//! ```
//!
//! ## Failure policy
//!
//! - An empty or unreadable input folder refuses to start; any running
//!   session keeps going.
//! - A file that fails to decode leaves the cursor on it with no image
//!   loaded. Image commands answer [`SessionError::NoImage`] until the
//!   operator moves on. This holds for the first image too: the session
//!   still starts and the decode error is returned alongside it.
//! - The background colour is the operator's last choice, kept across
//!   navigation and across new sessions from re-selected folders.
//! - Out-of-range jumps and invalid zooms are refused with state unchanged.

use crate::collection::{Advance, Collection, CollectionError, Navigator};
use crate::config::CropConfig;
use crate::image_state::{ImageState, ImageStateError, RenderSettings};
use crate::imaging::calculations::drag_to_pan_delta;
use crate::imaging::{
    Color, ImageBackend, Quality, RenderedFrame, RustBackend, Transform, TransformUpdate,
};
use crate::snapshot::{SnapshotError, SnapshotWriter};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Collection(#[from] CollectionError),
    #[error(transparent)]
    Image(#[from] ImageStateError),
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
    #[error("index {index} is out of range (collection has {len} images)")]
    InvalidIndex { index: usize, len: usize },
    #[error("no image loaded for {0}")]
    NoImage(PathBuf),
    #[error("no active session: select an input and an output folder")]
    Inactive,
}

/// Operator commands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Move the crop window by a delta in pan units.
    Pan { dx: i32, dy: i32 },
    /// Multiply the current zoom by a factor.
    Zoom(f64),
    SetBackground(Color),
    Next,
    Previous,
    /// Jump to a 0-based index.
    JumpTo(usize),
    Snapshot,
    /// Back to the default pan and zoom; background is kept.
    Reset,
}

/// What a command did.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The transform changed and the frame was re-rendered.
    Rendered,
    /// The cursor moved and the new image is loaded.
    Moved { index: usize, len: usize, path: PathBuf },
    /// Nothing to do (e.g. previous at the first image).
    Unchanged,
    /// A snapshot was written under this file name.
    Saved(String),
    /// The cursor ran past the last image; the session is over.
    Ended,
}

#[derive(Debug)]
pub struct Session {
    navigator: Navigator,
    image: Option<ImageState>,
    writer: SnapshotWriter,
    settings: RenderSettings,
    background: Color,
}

impl Session {
    /// Open `input`, load its first image and get ready to write into `output`.
    ///
    /// Only an unusable input folder fails. If the first image does not
    /// decode, the session comes back with an empty slot together with the
    /// decode error.
    pub fn start(
        backend: &impl ImageBackend,
        input: &Path,
        output: &Path,
        config: &CropConfig,
        background: Color,
    ) -> Result<(Self, Option<SessionError>), SessionError> {
        let navigator = Navigator::new(Collection::open(input)?);
        let settings = RenderSettings {
            target_size: config.target_size,
            filter: config.view.resample,
        };
        let writer = SnapshotWriter::new(
            output,
            config.snapshot.format,
            Quality::new(config.snapshot.quality),
        );
        log::info!(
            "session started: {} images from {} → {}",
            navigator.len(),
            input.display(),
            output.display()
        );
        let mut session = Self {
            navigator,
            image: None,
            writer,
            settings,
            background,
        };
        let load_error = session.load_current(backend).err();
        Ok((session, load_error))
    }

    /// Apply one command.
    pub fn apply(
        &mut self,
        backend: &impl ImageBackend,
        command: Command,
    ) -> Result<Outcome, SessionError> {
        if self.navigator.is_finished() {
            return Err(SessionError::Inactive);
        }
        match command {
            Command::Pan { dx, dy } => {
                let t = *self.image_mut()?.transform();
                self.update(TransformUpdate {
                    pan_x: Some(t.pan_x.saturating_add(dx)),
                    pan_y: Some(t.pan_y.saturating_add(dy)),
                    ..Default::default()
                })
            }
            Command::Zoom(factor) => {
                let zoom = self.image_mut()?.transform().zoom() * factor;
                self.update(TransformUpdate {
                    zoom: Some(zoom),
                    ..Default::default()
                })
            }
            Command::SetBackground(color) => {
                self.background = color;
                if self.image.is_none() {
                    return Ok(Outcome::Unchanged);
                }
                self.update(TransformUpdate {
                    background: Some(color),
                    ..Default::default()
                })
            }
            Command::Reset => {
                self.image_mut()?.reset();
                Ok(Outcome::Rendered)
            }
            Command::Next => match self.navigator.advance() {
                Advance::Moved(_) => self.load_current(backend),
                Advance::End => {
                    self.image = None;
                    log::info!(
                        "session ended: reached the end of {}",
                        self.navigator.collection().folder().display()
                    );
                    Ok(Outcome::Ended)
                }
            },
            Command::Previous => match self.navigator.retreat() {
                Some(_) => self.load_current(backend),
                None => Ok(Outcome::Unchanged),
            },
            Command::JumpTo(index) => match self.navigator.jump_to(index) {
                Some(_) => self.load_current(backend),
                None => {
                    let len = self.navigator.len();
                    log::warn!("jump to {index} ignored: collection has {len} images");
                    Err(SessionError::InvalidIndex { index, len })
                }
            },
            Command::Snapshot => {
                let image = self.image.as_ref().ok_or_else(|| self.no_image())?;
                let name = self.writer.capture(backend, image.current())?;
                Ok(Outcome::Saved(name))
            }
        }
    }

    pub fn is_ended(&self) -> bool {
        self.navigator.is_finished()
    }

    /// 0-based cursor and collection length.
    pub fn position(&self) -> (usize, usize) {
        (self.navigator.cursor(), self.navigator.len())
    }

    pub fn current_path(&self) -> &Path {
        self.navigator.current()
    }

    pub fn collection(&self) -> &Collection {
        self.navigator.collection()
    }

    pub fn output_dir(&self) -> &Path {
        self.writer.dir()
    }

    pub fn background(&self) -> Color {
        self.background
    }

    /// Transform of the loaded image, if any.
    pub fn transform(&self) -> Option<&Transform> {
        self.image.as_ref().map(ImageState::transform)
    }

    /// Cached frame of the loaded image, if any.
    pub fn current_frame(&self) -> Option<&RenderedFrame> {
        self.image.as_ref().map(ImageState::current)
    }

    pub fn target_size(&self) -> u32 {
        self.settings.target_size
    }

    fn update(&mut self, update: TransformUpdate) -> Result<Outcome, SessionError> {
        self.image_mut()?.update(&update)?;
        Ok(Outcome::Rendered)
    }

    fn load_current(&mut self, backend: &impl ImageBackend) -> Result<Outcome, SessionError> {
        let path = self.navigator.current().to_path_buf();
        let result = match self.image.take() {
            Some(mut state) => state.load(backend, &path).map(|()| state),
            None => ImageState::open(backend, &path, self.settings, self.background),
        };
        match result {
            Ok(state) => self.image = Some(state),
            Err(e) => {
                log::warn!("{}: {e}", path.display());
                return Err(e.into());
            }
        }
        let (index, len) = self.position();
        log::debug!("moved to {}/{}: {}", index + 1, len, path.display());
        Ok(Outcome::Moved { index, len, path })
    }

    fn image_mut(&mut self) -> Result<&mut ImageState, SessionError> {
        let path = self.navigator.current().to_path_buf();
        self.image.as_mut().ok_or(SessionError::NoImage(path))
    }

    fn no_image(&self) -> SessionError {
        SessionError::NoImage(self.navigator.current().to_path_buf())
    }
}

/// Front-end facing owner of the folder selections and the active session.
pub struct Controller<B: ImageBackend = RustBackend> {
    backend: B,
    config: CropConfig,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    session: Option<Session>,
    /// Last background chosen; seeds every new session.
    background: Color,
}

impl Controller<RustBackend> {
    pub fn new(config: CropConfig) -> Self {
        Self::with_backend(RustBackend::new(), config)
    }
}

impl<B: ImageBackend> Controller<B> {
    pub fn with_backend(backend: B, config: CropConfig) -> Self {
        Self {
            backend,
            background: config.view.background,
            config,
            input: None,
            output: None,
            session: None,
        }
    }

    /// Choose the input folder. Starts a new session when an output folder
    /// is known; returns whether one was started.
    ///
    /// A first image that fails to decode still starts the session; the
    /// decode error is returned and [`is_active`](Self::is_active) is true.
    pub fn select_input(&mut self, folder: impl Into<PathBuf>) -> Result<bool, SessionError> {
        self.input = Some(folder.into());
        self.try_start()
    }

    /// Choose the output folder. Starts a new session when an input folder
    /// is known; returns whether one was started.
    pub fn select_output(&mut self, folder: impl Into<PathBuf>) -> Result<bool, SessionError> {
        self.output = Some(folder.into());
        self.try_start()
    }

    /// Route a command to the active session. Drops the session when it ends.
    pub fn dispatch(&mut self, command: Command) -> Result<Outcome, SessionError> {
        let session = self.session.as_mut().ok_or(SessionError::Inactive)?;
        let outcome = session.apply(&self.backend, command);
        self.background = session.background();
        let outcome = outcome?;
        if outcome == Outcome::Ended {
            self.session = None;
        }
        Ok(outcome)
    }

    pub fn pan(&mut self, dx: i32, dy: i32) -> Result<Outcome, SessionError> {
        self.dispatch(Command::Pan { dx, dy })
    }

    pub fn zoom(&mut self, factor: f64) -> Result<Outcome, SessionError> {
        self.dispatch(Command::Zoom(factor))
    }

    pub fn zoom_in(&mut self) -> Result<Outcome, SessionError> {
        self.zoom(self.config.view.zoom_step)
    }

    pub fn zoom_out(&mut self) -> Result<Outcome, SessionError> {
        self.zoom(1.0 / self.config.view.zoom_step)
    }

    /// Pan by a screen-space drag, scaled by the current zoom.
    pub fn drag(&mut self, dx: i32, dy: i32) -> Result<Outcome, SessionError> {
        let session = self.session.as_ref().ok_or(SessionError::Inactive)?;
        let zoom = session
            .transform()
            .ok_or_else(|| SessionError::NoImage(session.current_path().to_path_buf()))?
            .zoom();
        let (pdx, pdy) = drag_to_pan_delta((dx, dy), zoom);
        self.pan(pdx, pdy)
    }

    pub fn set_background(&mut self, color: Color) -> Result<Outcome, SessionError> {
        self.dispatch(Command::SetBackground(color))
    }

    pub fn next(&mut self) -> Result<Outcome, SessionError> {
        self.dispatch(Command::Next)
    }

    pub fn previous(&mut self) -> Result<Outcome, SessionError> {
        self.dispatch(Command::Previous)
    }

    pub fn jump_to(&mut self, index: usize) -> Result<Outcome, SessionError> {
        self.dispatch(Command::JumpTo(index))
    }

    pub fn snapshot(&mut self) -> Result<Outcome, SessionError> {
        self.dispatch(Command::Snapshot)
    }

    /// The frame to display, if a session is active and its image loaded.
    pub fn current_frame(&self) -> Option<&RenderedFrame> {
        self.session.as_ref().and_then(Session::current_frame)
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn config(&self) -> &CropConfig {
        &self.config
    }

    pub fn input(&self) -> Option<&Path> {
        self.input.as_deref()
    }

    pub fn output(&self) -> Option<&Path> {
        self.output.as_deref()
    }

    fn try_start(&mut self) -> Result<bool, SessionError> {
        let (Some(input), Some(output)) = (&self.input, &self.output) else {
            return Ok(false);
        };
        let (session, load_error) =
            Session::start(&self.backend, input, output, &self.config, self.background)?;
        self.session = Some(session);
        match load_error {
            Some(e) => Err(e),
            None => Ok(true),
        }
    }
}
