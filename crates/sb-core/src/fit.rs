//! Auto-fit heuristic applied when an image is attached to a note.
//!
//! Images are stacked above the caption at the note's interior width. The
//! note grows to fit the stack but never shrinks, so a note the user
//! enlarged keeps its size.

use crate::config::ImageFitConfig;
use crate::geometry::Size;

/// Size a note should take after an image with `aspect_ratio` (w / h) was
/// attached, leaving it holding `image_count` images.
///
/// Every image is assumed to share the new image's displayed height; the
/// payloads carry no intrinsic size once stored.
pub fn fit_for_image(
    current: Size,
    image_count: usize,
    aspect_ratio: f64,
    config: &ImageFitConfig,
) -> Size {
    if !aspect_ratio.is_finite() || aspect_ratio <= 0.0 {
        return current;
    }
    let interior = (current.width - config.padding).max(0.0);
    let image_height = interior / aspect_ratio;
    let stack = image_count as f64 * (image_height + config.gap);
    let required = stack + config.text_allowance;

    Size::new(
        current.width.max(config.min_width),
        current.height.max(required),
    )
}
