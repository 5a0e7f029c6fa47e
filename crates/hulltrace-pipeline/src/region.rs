//! One palette color's traced outline.

use crate::frame::Frame;
use crate::hull::build_hull;
use crate::pixels::PixelBuffer;
use crate::sample::sample_mask;
use crate::segment::segment_path;
use crate::trace::Backends;
use crate::types::{Color, CubicBezier, PathSegment, Point, Polygon, TraceConfig};

/// The traced outline of one palette color.
///
/// A region is valid when its hull has at least three vertices. Invalid
/// regions carry their samples and hull but no path segments.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    color: Color,
    sampled_points: Vec<Point>,
    hull_points: Polygon,
    path_segments: Vec<PathSegment>,
    cubics: Vec<CubicBezier>,
    numeric_anomalies: usize,
}

impl Region {
    /// Sample `buffer` for `color` and build the region from the samples.
    #[must_use]
    pub fn trace(
        buffer: &PixelBuffer<'_>,
        color: Color,
        config: &TraceConfig,
        backends: &Backends<'_>,
    ) -> Self {
        let samples = sample_mask(buffer, color, config.grid_stride());
        let frame = Frame::new(buffer.dimensions(), config.boundary_tolerance);
        Self::from_samples(color, samples, &frame, config, backends)
    }

    /// Build a region from already-sampled points.
    ///
    /// The fitter is only consulted when the hull is valid.
    #[must_use]
    pub fn from_samples(
        color: Color,
        sampled_points: Vec<Point>,
        frame: &Frame,
        config: &TraceConfig,
        backends: &Backends<'_>,
    ) -> Self {
        let hull_points = if sampled_points.is_empty() {
            Polygon::default()
        } else {
            build_hull(
                &sampled_points,
                frame,
                config.path_simplification_tolerance,
                backends.hull,
                backends.simplifier,
            )
        };

        let mut region = Self {
            color,
            sampled_points,
            hull_points,
            path_segments: Vec::new(),
            cubics: Vec::new(),
            numeric_anomalies: 0,
        };

        if region.is_valid() {
            let segmentation = segment_path(
                region.hull_points.points(),
                frame,
                config.curve_fitting_tolerance,
                backends.fitter,
            );
            region.path_segments = segmentation.segments;
            region.cubics = segmentation.cubics;
            region.numeric_anomalies = segmentation.numeric_anomalies;
        }

        tracing::debug!(
            color = %region.color,
            samples = region.sampled_points.len(),
            hull = region.hull_points.len(),
            segments = region.path_segments.len(),
            anomalies = region.numeric_anomalies,
            "built region"
        );

        region
    }

    /// The palette color this region traces.
    #[must_use]
    pub const fn color(&self) -> Color {
        self.color
    }

    /// Mask sample points, in row-major order.
    #[must_use]
    pub fn sampled_points(&self) -> &[Point] {
        &self.sampled_points
    }

    /// Boundary polygon after frame-preserving simplification.
    #[must_use]
    pub const fn hull_points(&self) -> &Polygon {
        &self.hull_points
    }

    /// Chained outline segments. Empty for invalid regions.
    #[must_use]
    pub fn path_segments(&self) -> &[PathSegment] {
        &self.path_segments
    }

    /// Fitted cubics, in outline order.
    #[must_use]
    pub fn cubics(&self) -> &[CubicBezier] {
        &self.cubics
    }

    /// Curve runs that fell back to lines because of non-finite output.
    #[must_use]
    pub const fn numeric_anomalies(&self) -> usize {
        self.numeric_anomalies
    }

    /// Returns `true` if the hull has at least three vertices.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.hull_points.len() >= 3
    }
}
