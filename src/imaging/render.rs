//! Frame rendering.
//!
//! Turns a [`SourceImage`] plus a [`Transform`] into a square
//! [`RenderedFrame`]. The frame starts as solid background; the part of the
//! scaled source that falls inside the crop window is pasted over it.
//!
//! Only the visible source rectangle is resampled (see
//! [`visible_region`](super::calculations::visible_region)). Once a single
//! source pixel outgrows the window that rectangle would resample into a
//! buffer far larger than the frame, so past [`MAX_RESAMPLE_FRAMES`] frame
//! areas each output pixel samples its source pixel directly instead
//! (nearest neighbour, whatever the filter). Work per frame is bounded by
//! the target size at every zoom.

use super::backend::SourceImage;
use super::calculations::{
    crop_origin, resampled_dimensions, sample_index, suggest_pan_x, visible_region,
};
use super::params::{Color, Resample, Transform};
use image::RgbImage;
use image::imageops;

/// A `target_size × target_size` RGB frame.
pub type RenderedFrame = RgbImage;

/// Largest intermediate resize buffer, in multiples of the frame area.
pub const MAX_RESAMPLE_FRAMES: u64 = 4;

/// Render `source` through `transform` into a square frame of side `target_size`.
pub fn render(
    source: &SourceImage,
    transform: &Transform,
    target_size: u32,
    filter: Resample,
) -> RenderedFrame {
    let mut frame = RgbImage::from_pixel(target_size, target_size, transform.background.to_rgb());

    let Some(region) = visible_region(
        source.dimensions(),
        target_size,
        (transform.pan_x, transform.pan_y),
        transform.zoom(),
    ) else {
        log::debug!(
            "render: source {:?} entirely outside window (zoom {})",
            source.dimensions(),
            transform.zoom()
        );
        return frame;
    };

    let (cw, ch) = region.scaled;
    let budget = MAX_RESAMPLE_FRAMES as u128 * (target_size as u128).pow(2);
    if cw as u128 * ch as u128 > budget {
        sample_direct(source, transform, target_size, &mut frame);
        log::debug!(
            "render: {}x{} sampled directly at zoom {}",
            target_size,
            target_size,
            transform.zoom()
        );
        return frame;
    }

    // Within budget, so both edges fit in u32.
    let (cw, ch) = (cw as u32, ch as u32);
    let (sx, sy, sw, sh) = region.source;
    let crop = imageops::crop_imm(source.pixels(), sx, sy, sw, sh).to_image();
    let scaled = if (sw, sh) == (cw, ch) {
        crop
    } else {
        imageops::resize(&crop, cw, ch, filter.into())
    };
    imageops::replace(&mut frame, &scaled, region.offset.0, region.offset.1);

    log::debug!(
        "render: {}x{} from source rect {:?} at offset {:?}",
        target_size,
        target_size,
        region.source,
        region.offset
    );
    frame
}

/// Fill `frame` by mapping every output pixel back to one source pixel.
fn sample_direct(
    source: &SourceImage,
    transform: &Transform,
    target_size: u32,
    frame: &mut RenderedFrame,
) {
    let zoom = transform.zoom();
    let (rw, rh) = resampled_dimensions(source.dimensions(), target_size, zoom);
    let (x1, y1) = crop_origin((transform.pan_x, transform.pan_y), target_size, zoom);
    let columns: Vec<Option<u32>> = (0..target_size)
        .map(|x| sample_index(x, x1, rw, source.width()))
        .collect();
    for y in 0..target_size {
        let Some(sy) = sample_index(y, y1, rh, source.height()) else {
            continue;
        };
        for (x, sx) in columns.iter().enumerate() {
            if let Some(sx) = *sx {
                frame.put_pixel(x as u32, y, *source.pixels().get_pixel(sx, sy));
            }
        }
    }
}

/// Default transform for a freshly loaded source: centered horizontally,
/// no vertical pan, zoom 1.
pub fn default_transform(
    source: &SourceImage,
    target_size: u32,
    background: Color,
) -> Transform {
    let mut t = Transform::identity(background);
    t.pan_x = suggest_pan_x(source.dimensions(), target_size);
    t
}
