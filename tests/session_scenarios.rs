//! End-to-end scenarios against the public API.
//!
//! Real images are written to temp folders and driven through a
//! `Controller` exactly as the console does. The property test at the bottom
//! swaps in an in-memory backend so it can run thousands of commands quickly.

use image::{Rgb, RgbImage};
use proptest::prelude::*;
use squarecrop::collection::CollectionError;
use squarecrop::config::CropConfig;
use squarecrop::imaging::{
    BackendError, Color, ImageBackend, Quality, SnapshotFormat, SourceImage, suggest_pan_x,
};
use squarecrop::session::{Command, Controller, Outcome, SessionError};
use std::path::Path;
use tempfile::TempDir;

fn write_image(dir: &Path, name: &str, width: u32, height: u32) {
    RgbImage::from_fn(width, height, |x, y| Rgb([x as u8, y as u8, 200]))
        .save(dir.join(name))
        .unwrap();
}

fn started(input: &Path, output: &Path) -> Controller {
    let mut controller = Controller::new(CropConfig::default());
    controller.select_input(input).unwrap();
    assert!(controller.select_output(output).unwrap());
    controller
}

#[test]
fn advance_loads_next_image_with_suggested_pan_then_ends() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_image(input.path(), "a.jpg", 200, 100);
    write_image(input.path(), "b.png", 300, 200);
    let mut controller = started(input.path(), output.path());

    let t = controller.session().unwrap().transform().unwrap();
    assert_eq!(t.pan_x, 256);

    let outcome = controller.next().unwrap();
    assert_eq!(
        outcome,
        Outcome::Moved {
            index: 1,
            len: 2,
            path: input.path().join("b.png"),
        }
    );
    let t = controller.session().unwrap().transform().unwrap();
    assert_eq!(t.pan_x, suggest_pan_x((300, 200), 512));
    assert_eq!(t.pan_x, 128);
    assert_eq!((t.pan_y, t.zoom()), (0, 1.0));
    assert_eq!(controller.current_frame().unwrap().dimensions(), (512, 512));

    assert_eq!(controller.next().unwrap(), Outcome::Ended);
    assert!(!controller.is_active());
}

#[test]
fn folder_without_images_is_empty_collection() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    std::fs::write(input.path().join("notes.txt"), "no pictures here").unwrap();
    std::fs::write(input.path().join("SHOUTY.JPG"), "wrong case").unwrap();

    let mut controller = Controller::new(CropConfig::default());
    controller.select_output(output.path()).unwrap();
    let err = controller.select_input(input.path()).unwrap_err();

    assert!(matches!(
        err,
        SessionError::Collection(CollectionError::Empty(_))
    ));
    assert!(!controller.is_active());
}

#[test]
fn window_off_the_image_snapshots_pure_background() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_image(input.path(), "a.png", 120, 80);
    let mut controller = started(input.path(), output.path());

    controller.dispatch(Command::Pan { dx: 10_000, dy: 0 }).unwrap();
    let Outcome::Saved(name) = controller.snapshot().unwrap() else {
        panic!("expected a saved snapshot");
    };

    let files: Vec<_> = std::fs::read_dir(output.path()).unwrap().collect();
    assert_eq!(files.len(), 1);
    let saved = image::open(output.path().join(name)).unwrap().into_rgb8();
    assert_eq!(saved.dimensions(), (512, 512));
    assert!(saved.pixels().all(|p| p.0 == [0, 0, 0]));
}

#[test]
fn background_survives_navigation() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_image(input.path(), "a.png", 60, 60);
    write_image(input.path(), "b.png", 60, 60);
    let mut controller = started(input.path(), output.path());

    controller
        .dispatch(Command::SetBackground(Color::new(0, 0, 255)))
        .unwrap();
    controller.next().unwrap();
    controller.zoom(0.5).unwrap();

    let frame = controller.current_frame().unwrap();
    assert_eq!(frame.get_pixel(0, 0).0, [0, 0, 255]);
    assert_eq!(frame.get_pixel(511, 511).0, [0, 0, 255]);
    assert_ne!(frame.get_pixel(256, 256).0, [0, 0, 255]);
}

#[test]
fn jump_past_the_end_keeps_position() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_image(input.path(), "a.bmp", 40, 40);
    write_image(input.path(), "b.bmp", 40, 40);
    let mut controller = started(input.path(), output.path());
    controller.jump_to(1).unwrap();

    let err = controller.jump_to(2).unwrap_err();
    assert!(matches!(err, SessionError::InvalidIndex { index: 2, len: 2 }));
    assert_eq!(controller.session().unwrap().position(), (1, 2));
}

// =========================================================================
// Properties over random command sequences
// =========================================================================

/// Decodes `NN-WxH.png` names into synthetic images; never writes anything.
struct MemoryBackend;

impl ImageBackend for MemoryBackend {
    fn decode(&self, path: &Path) -> Result<SourceImage, BackendError> {
        let decode_error = || BackendError::Decode {
            path: path.to_path_buf(),
            message: "unrecognised fixture name".into(),
        };
        let stem = path.file_stem().and_then(|s| s.to_str()).ok_or_else(decode_error)?;
        let (_, size) = stem.split_once('-').ok_or_else(decode_error)?;
        let (w, h) = size.split_once('x').ok_or_else(decode_error)?;
        let (w, h) = (
            w.parse().map_err(|_| decode_error())?,
            h.parse().map_err(|_| decode_error())?,
        );
        SourceImage::new(RgbImage::from_pixel(w, h, Rgb([90, 160, 30]))).ok_or_else(decode_error)
    }

    fn encode(
        &self,
        _image: &RgbImage,
        _output: &Path,
        _format: SnapshotFormat,
        _quality: Quality,
    ) -> Result<(), BackendError> {
        Ok(())
    }
}

fn command_strategy() -> impl Strategy<Value = Command> {
    prop_oneof![
        (-200i32..200, -200i32..200).prop_map(|(dx, dy)| Command::Pan { dx, dy }),
        (0.05f64..8.0).prop_map(Command::Zoom),
        Just(Command::Zoom(0.0)),
        Just(Command::Zoom(-1.0)),
        Just(Command::Next),
        Just(Command::Previous),
        (0usize..8).prop_map(Command::JumpTo),
        Just(Command::Reset),
        Just(Command::Snapshot),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn cursor_and_frame_stay_valid(
        sizes in prop::collection::vec((1u32..80, 1u32..80), 1..6),
        commands in prop::collection::vec(command_strategy(), 1..40),
    ) {
        let input = TempDir::new().unwrap();
        for (i, (w, h)) in sizes.iter().enumerate() {
            std::fs::write(input.path().join(format!("{i:02}-{w}x{h}.png")), b"").unwrap();
        }
        let config = CropConfig { target_size: 16, ..CropConfig::default() };
        let mut controller = Controller::with_backend(MemoryBackend, config);
        controller.select_input(input.path()).unwrap();
        prop_assert!(controller.select_output("/unused").unwrap());

        for command in commands {
            let result = controller.dispatch(command);
            if matches!(result, Ok(Outcome::Ended)) {
                prop_assert!(!controller.is_active());
                break;
            }
            let session = controller.session().unwrap();
            let (index, len) = session.position();
            prop_assert!(index < len);
            prop_assert_eq!(len, sizes.len());
            prop_assert_eq!(controller.current_frame().unwrap().dimensions(), (16, 16));
            prop_assert!(session.transform().unwrap().zoom() > 0.0);
        }
    }
}
