//! Palette extraction: derive candidate trace colors from an image.
//!
//! Channels are quantized to a fixed step so near-identical shades collapse
//! into one palette entry. Tracing still matches pixels exactly, so a
//! quantized entry only picks up pixels whose value already lies on the
//! quantization grid (e.g. flat-color artwork).

use std::collections::HashSet;

use crate::pixels::PixelBuffer;
use crate::types::Color;

/// Pixels with alpha below this are ignored by default.
pub const DEFAULT_MIN_ALPHA: u8 = 32;

/// Collect the distinct quantized colors of an image in first-seen order.
///
/// Each channel becomes `min(255, round(c / step) * step)` with
/// `step = max(1, quantize_step)`. Pixels whose alpha is below
/// `min_alpha` are skipped.
#[must_use = "returns the extracted palette"]
pub fn extract_palette(buffer: &PixelBuffer<'_>, quantize_step: u8, min_alpha: u8) -> Vec<Color> {
    let step = quantize_step.max(1);
    let mut seen = HashSet::new();
    let mut palette = Vec::new();

    for [r, g, b, a] in buffer.pixels() {
        if a < min_alpha {
            continue;
        }
        let color = Color::new(quantize(r, step), quantize(g, step), quantize(b, step));
        if seen.insert(color) {
            palette.push(color);
        }
    }

    palette
}

/// Round a channel to the nearest multiple of `step`, saturating at 255.
fn quantize(channel: u8, step: u8) -> u8 {
    let step = u16::from(step);
    let channel = u16::from(channel);
    // Round half up, matching `Math.round` on non-negative values.
    let rounded = (channel + step / 2) / step * step;
    u8::try_from(rounded.min(255)).unwrap_or(u8::MAX)
}
