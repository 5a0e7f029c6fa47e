//! hulltrace-pipeline: Palette-color raster tracing (sans-IO).
//!
//! Converts an RGBA raster plus a palette into one closed vector outline
//! per color through:
//! mask sampling -> concave hull -> frame-preserving simplification ->
//! frame snapping -> line/curve segmentation -> cubic fitting.
//!
//! Outline edges that lie on the image frame stay straight and
//! pixel-exact; everything else is approximated with cubic Beziers.
//!
//! This crate has **no I/O dependencies** -- it operates on borrowed
//! pixel data and returns structured results. SVG serialization lives in
//! `hulltrace-export`.

pub mod fit;
pub mod frame;
pub mod hull;
pub mod palette;
pub mod pixels;
pub mod region;
pub mod sample;
pub mod segment;
pub mod simplify;
pub mod trace;
pub mod types;

/// Curve types used by the [`CurveFitter`] interface.
pub use kurbo;
pub use fit::{CurveFitter, CurveFitterKind};
pub use hull::{ConcaveHull, ConcaveHullKind};
pub use palette::extract_palette;
pub use pixels::PixelBuffer;
pub use region::Region;
pub use simplify::{Simplifier, SimplifierKind};
pub use trace::{Backends, Trace};
pub use types::{
    Color, CubicBezier, Dimensions, PathSegment, Point, Polygon, TraceConfig, TraceError,
};

/// Trace every palette color of `buffer` with the built-in backends.
///
/// Convenience wrapper around [`Trace::new`].
///
/// # Errors
///
/// Returns [`TraceError::EmptyPalette`] if `palette` is empty, or
/// [`TraceError::InvalidConfig`] if `config` is invalid.
pub fn trace(
    buffer: &PixelBuffer<'_>,
    palette: &[Color],
    config: TraceConfig,
) -> Result<Trace, TraceError> {
    Trace::new(buffer, palette, config)
}
