//! Mask sampling: collect the grid points whose pixel matches a color.
//!
//! This is the first step per palette color. The result feeds the
//! concave hull builder, which tolerates duplicates and arbitrary order.

use crate::pixels::PixelBuffer;
use crate::types::{Color, Point};

/// Effective sampling stride for a configured step size.
///
/// The step is floored and clamped to at least 1, so `2.7` samples every
/// second pixel and anything below 1 (or non-finite) samples every pixel.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "value is floored and clamped to >= 1 before the cast"
)]
pub fn grid_stride(step_size: f64) -> usize {
    if !step_size.is_finite() {
        return 1;
    }
    step_size.max(1.0).floor() as usize
}

/// Collect every grid point whose pixel exactly matches `color`.
///
/// Samples `(x, y)` for `x` and `y` multiples of `stride`, scanning row by
/// row. A pixel matches when its alpha is non-zero and its RGB channels
/// equal `color` exactly. An empty result is valid.
#[must_use = "returns the matching sample points"]
pub fn sample_mask(buffer: &PixelBuffer<'_>, color: Color, stride: usize) -> Vec<Point> {
    let stride = stride.max(1);
    let mut points = Vec::new();

    for y in (0..buffer.height()).step_by(stride) {
        for x in (0..buffer.width()).step_by(stride) {
            if let Some([r, g, b, a]) = buffer.rgba(x, y)
                && a != 0
                && Color::new(r, g, b) == color
            {
                points.push(Point::new(f64::from(x), f64::from(y)));
            }
        }
    }

    points
}
