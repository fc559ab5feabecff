//! Pure calculation functions for the crop window.
//!
//! All functions here are pure and testable without any I/O or images.
//!
//! Coordinates come in two spaces:
//! - **source**: pixels of the decoded image.
//! - **resampled**: pixels of the source after uniform scaling by
//!   [`scale_factor`]; the crop window lives here.

/// Scale that maps the shorter source edge to `target_size * zoom`.
pub fn scale_factor(source: (u32, u32), target_size: u32, zoom: f64) -> f64 {
    let short = source.0.min(source.1).max(1);
    target_size as f64 / short as f64 * zoom
}

/// Dimensions of the source after uniform scaling.
///
/// Each edge is `floor(edge * target_size * zoom / short_edge)`. The product
/// is formed before the division so an edge equal to the short edge maps to
/// exactly `target_size` at zoom 1.
///
/// # Examples
/// ```
/// # use squarecrop::imaging::calculations::resampled_dimensions;
/// assert_eq!(resampled_dimensions((200, 100), 512, 1.0), (1024, 512));
/// assert_eq!(resampled_dimensions((300, 300), 512, 0.5), (256, 256));
/// ```
pub fn resampled_dimensions(source: (u32, u32), target_size: u32, zoom: f64) -> (u64, u64) {
    let (w, h) = source;
    let short = w.min(h).max(1) as f64;
    let scaled = |edge: u32| (edge as f64 * target_size as f64 * zoom / short).floor().max(0.0) as u64;
    (scaled(w), scaled(h))
}

/// Top-left corner of the crop window in resampled coordinates.
///
/// `x1 = floor(pan_x * zoom + target/2 * zoom - target/2)`, same for `y1`.
pub fn crop_origin(pan: (i32, i32), target_size: u32, zoom: f64) -> (i64, i64) {
    let half = target_size as f64 / 2.0;
    let axis = |p: i32| (p as f64 * zoom + half * zoom - half).floor() as i64;
    (axis(pan.0), axis(pan.1))
}

/// Default horizontal pan that centers the crop window on a landscape source.
///
/// Portrait and square sources get 0: their width already matches the
/// target after scaling.
///
/// # Examples
/// ```
/// # use squarecrop::imaging::calculations::suggest_pan_x;
/// assert_eq!(suggest_pan_x((600, 800), 512), 0);
/// assert_eq!(suggest_pan_x((200, 100), 512), 256);
/// ```
pub fn suggest_pan_x(source: (u32, u32), target_size: u32) -> i32 {
    let (w, h) = source;
    if w <= h {
        return 0;
    }
    let scaled_width = w as f64 / h as f64 * target_size as f64;
    (0.5 * (scaled_width - target_size as f64)).floor() as i32
}

/// Convert a screen-space drag into a pan delta.
///
/// Dragging the picture right moves the window left, and one screen pixel
/// covers `1 / zoom` pan units. Fractions truncate toward zero.
pub fn drag_to_pan_delta(drag: (i32, i32), zoom: f64) -> (i32, i32) {
    let axis = |d: i32| (-(d as f64) / zoom).trunc() as i32;
    (axis(drag.0), axis(drag.1))
}

/// Intersection of the crop window with the resampled image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleRegion {
    /// Source-pixel rectangle that must be resampled: `(x, y, width, height)`.
    pub source: (u32, u32, u32, u32),
    /// Size of that rectangle after scaling. Grows without bound when one
    /// source pixel is larger than the window; see [`sample_index`].
    pub scaled: (u64, u64),
    /// Where the scaled rectangle lands in the output frame. May be negative
    /// or overhang the frame by a pixel; callers clip.
    pub offset: (i64, i64),
}

/// Work out which part of the source is visible through the crop window.
///
/// Returns `None` when the window does not overlap the resampled image at
/// all, in which case the frame is pure background.
pub fn visible_region(
    source: (u32, u32),
    target_size: u32,
    pan: (i32, i32),
    zoom: f64,
) -> Option<VisibleRegion> {
    let (rw, rh) = resampled_dimensions(source, target_size, zoom);
    if rw == 0 || rh == 0 {
        return None;
    }
    let (x1, y1) = crop_origin(pan, target_size, zoom);
    let (sx, sw, scaled_w, ox) = visible_axis(source.0, rw, x1, target_size)?;
    let (sy, sh, scaled_h, oy) = visible_axis(source.1, rh, y1, target_size)?;
    Some(VisibleRegion {
        source: (sx, sy, sw, sh),
        scaled: (scaled_w, scaled_h),
        offset: (ox, oy),
    })
}

/// One axis of [`visible_region`]: returns `(src_start, src_len, scaled_len, offset)`.
fn visible_axis(
    src_len: u32,
    resampled_len: u64,
    window_start: i64,
    target_size: u32,
) -> Option<(u32, u32, u64, i64)> {
    // Integer arithmetic keeps the mapping exact at region edges; i128 keeps
    // it from overflowing at extreme zoom.
    let window = window_start as i128;
    let rl = resampled_len as i128;
    let v0 = window.max(0);
    let v1 = (window + target_size as i128).min(rl);
    if v0 >= v1 {
        return None;
    }
    let src = src_len as i128;
    let s0 = (v0 * src / rl).clamp(0, src - 1);
    let s1 = ((v1 * src + rl - 1) / rl).clamp(s0 + 1, src);
    let to_resampled = |s: i128| (2 * s * rl + src) / (2 * src);
    let start = to_resampled(s0);
    let scaled = (to_resampled(s1) - start).max(1);
    Some((
        s0 as u32,
        (s1 - s0) as u32,
        scaled as u64,
        (start - window) as i64,
    ))
}

/// Source pixel seen by output pixel `out` along one axis, sampling at the
/// pixel center. `None` when that output pixel lies outside the resampled
/// image and shows background.
///
/// Cost is one call per output pixel whatever the zoom.
pub fn sample_index(out: u32, window_start: i64, resampled_len: u64, src_len: u32) -> Option<u32> {
    let r = window_start as i128 + out as i128;
    let rl = resampled_len as i128;
    if r < 0 || r >= rl {
        return None;
    }
    let src = src_len as i128;
    Some(((2 * r + 1) * src / (2 * rl)).min(src - 1) as u32)
}
