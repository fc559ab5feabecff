//! # Squarecrop
//!
//! An interactive square-crop tool. Point it at a folder of photos, move and
//! zoom a fixed square window over each one, and save what you see as a
//! square image. Built for preparing fixed-size training or thumbnail sets.
//!
//! # Architecture
//!
//! ```text
//! Collection ──► Navigator ──► ImageState ──► render ──► RenderedFrame ──► SnapshotWriter
//!  (folder)       (cursor)     (source +       (crop,        (square)          (timestamped
//!                               transform)      resample)                       file)
//! ```
//!
//! A [`session::Session`] binds these together for one input/output folder
//! pair and is driven by [`session::Command`]s. A [`session::Controller`] owns
//! the folder selections and the active session; the [`console`] reads
//! commands from text and drives a controller.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | Transform engine: crop-window math, render, decode/encode backend |
//! | [`image_state`] | The loaded image, its transform and cached frame |
//! | [`collection`] | Folder listing and cursor navigation |
//! | [`naming`] | Timestamp snapshot file names |
//! | [`snapshot`] | Writing frames to the output folder |
//! | [`session`] | Session state machine and controller |
//! | [`console`] | Line-oriented operator console |
//! | [`output`] | Operator-facing text formatting |
//! | [`config`] | `config.toml` loading, merging and validation |
//!
//! # Design Decisions
//!
//! ## Crop Then Resample
//!
//! Rendering never scales the whole source. The crop window is mapped back
//! into source pixels and only that region is resampled. When even that
//! region would resample into more than a few frames' worth of pixels, each
//! output pixel is sampled from its source pixel directly, so a frame costs
//! about the same at zoom 0.1 and zoom 1e6. Zoom is capped at
//! [`imaging::MAX_ZOOM`]. See [`imaging::calculations::visible_region`].
//!
//! ## Synchronous Rendering
//!
//! Every transform change re-renders before returning. There is no frame
//! queue and no stale frame to observe: whatever [`image_state::ImageState::current`]
//! returns matches the transform.
//!
//! ## One Background Per Session
//!
//! The background colour is a session setting, not an image setting. It
//! carries over as the operator moves through the folder.

pub mod collection;
pub mod config;
pub mod console;
pub mod image_state;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod session;
pub mod snapshot;

#[cfg(test)]
pub(crate) mod test_helpers;
