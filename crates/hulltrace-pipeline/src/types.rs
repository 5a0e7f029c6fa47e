//! Shared types for the hulltrace pipeline.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A 2D point in image coordinates.
///
/// Geometry beyond distances goes through [`kurbo`]; convert with
/// `kurbo::Point::from(p)` and back with `Point::from(k)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position (pixels from left edge).
    pub x: f64,
    /// Vertical position (pixels from top edge).
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to another point.
    ///
    /// Avoids the square root for comparison purposes.
    #[must_use]
    pub fn distance_squared(self, other: Self) -> f64 {
        (kurbo::Point::from(self) - kurbo::Point::from(other)).hypot2()
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        kurbo::Point::from(self).distance(other.into())
    }

    /// Returns `true` if both coordinates are finite.
    #[must_use]
    pub const fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<Point> for kurbo::Point {
    fn from(p: Point) -> Self {
        Self::new(p.x, p.y)
    }
}

impl From<kurbo::Point> for Point {
    fn from(p: kurbo::Point) -> Self {
        Self::new(p.x, p.y)
    }
}

/// An opaque RGB color. Equality is exact and component-wise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Color {
    /// Create a new color.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Formats as the SVG/CSS functional notation `rgb(r,g,b)`.
impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({},{},{})", self.r, self.g, self.b)
    }
}

/// An implicitly closed ring of points.
///
/// The first point is not repeated at the end. Winding direction is
/// whatever produced the polygon; nothing downstream depends on it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Polygon(Vec<Point>);

impl Polygon {
    /// Create a new polygon from a vector of points.
    #[must_use]
    pub const fn new(points: Vec<Point>) -> Self {
        Self(points)
    }

    /// Returns `true` if the polygon has no points.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of vertices.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns a slice of all vertices.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.0
    }

    /// Consumes the polygon and returns the underlying vector of points.
    #[must_use]
    pub fn into_points(self) -> Vec<Point> {
        self.0
    }
}

impl From<Vec<Point>> for Polygon {
    fn from(points: Vec<Point>) -> Self {
        Self(points)
    }
}

/// Image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// A cubic Bezier control-point quadruple as returned by a curve fitter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CubicBezier {
    /// Start point.
    pub p0: Point,
    /// First control point.
    pub c1: Point,
    /// Second control point.
    pub c2: Point,
    /// End point.
    pub p1: Point,
}

impl CubicBezier {
    /// Create a new cubic from its four control points.
    #[must_use]
    pub const fn new(p0: Point, c1: Point, c2: Point, p1: Point) -> Self {
        Self { p0, c1, c2, p1 }
    }

    /// Returns `true` if every control point has finite coordinates.
    #[must_use]
    pub const fn is_finite(&self) -> bool {
        self.p0.is_finite() && self.c1.is_finite() && self.c2.is_finite() && self.p1.is_finite()
    }
}

impl From<CubicBezier> for kurbo::CubicBez {
    fn from(c: CubicBezier) -> Self {
        Self::new(c.p0, c.c1, c.c2, c.p1)
    }
}

impl From<kurbo::CubicBez> for CubicBezier {
    fn from(c: kurbo::CubicBez) -> Self {
        Self::new(c.p0.into(), c.p1.into(), c.p2.into(), c.p3.into())
    }
}

/// One element of a region's vector outline.
///
/// Frame-aligned edges are [`Line`](Self::Line)s so they stay
/// pixel-exact; organic runs become [`Curve`](Self::Curve)s.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PathSegment {
    /// A straight edge.
    Line {
        /// Start point.
        p0: Point,
        /// End point.
        p1: Point,
    },
    /// A cubic Bezier arc.
    Curve {
        /// Start point.
        p0: Point,
        /// First control point.
        c1: Point,
        /// Second control point.
        c2: Point,
        /// End point.
        p1: Point,
    },
}

impl PathSegment {
    /// The point this segment starts at.
    #[must_use]
    pub const fn start(&self) -> Point {
        match *self {
            Self::Line { p0, .. } | Self::Curve { p0, .. } => p0,
        }
    }

    /// The point this segment ends at.
    #[must_use]
    pub const fn end(&self) -> Point {
        match *self {
            Self::Line { p1, .. } | Self::Curve { p1, .. } => p1,
        }
    }

    /// Returns `true` for [`Line`](Self::Line) segments.
    #[must_use]
    pub const fn is_line(&self) -> bool {
        matches!(self, Self::Line { .. })
    }
}

impl From<CubicBezier> for PathSegment {
    fn from(c: CubicBezier) -> Self {
        Self::Curve {
            p0: c.p0,
            c1: c.c1,
            c2: c.c2,
            p1: c.p1,
        }
    }
}

/// Configuration for tracing a palette.
///
/// Missing fields fall back to their defaults when deserialized, so a
/// partial JSON object such as `{"curve_fitting_tolerance": 2.0}` is a
/// valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceConfig {
    /// Polyline simplification tolerance in pixels, applied to each hull
    /// before segmentation. 0.0 preserves every hull vertex.
    pub path_simplification_tolerance: f64,

    /// Maximum deviation in pixels allowed between a fitted curve and the
    /// hull vertices it approximates.
    pub curve_fitting_tolerance: f64,

    /// Sampling stride in pixels. Floored, and clamped to at least 1.
    pub pixel_grid_step_size: f64,

    /// When set, the SVG output includes circle markers of this radius at
    /// every hull vertex and curve control point.
    pub debug_point_radius: Option<f64>,

    /// Distance in pixels within which a vertex counts as touching the
    /// image frame. Must be below one pixel, or neighboring grid samples
    /// snap onto the same frame point.
    pub boundary_tolerance: f64,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            path_simplification_tolerance: 1.0,
            curve_fitting_tolerance: 1.0,
            pixel_grid_step_size: 1.0,
            debug_point_radius: None,
            boundary_tolerance: 0.5,
        }
    }
}

impl TraceConfig {
    /// The effective sampling stride (see [`crate::sample::grid_stride`]).
    #[must_use]
    pub fn grid_stride(&self) -> usize {
        crate::sample::grid_stride(self.pixel_grid_step_size)
    }

    /// Check the configuration for values the pipeline cannot use.
    ///
    /// `pixel_grid_step_size` is never rejected; out-of-range strides are
    /// clamped by [`grid_stride`](Self::grid_stride) instead.
    ///
    /// # Errors
    ///
    /// Returns [`TraceError::InvalidConfig`] if a tolerance is negative or
    /// non-finite, if `boundary_tolerance` is one pixel or more, or if
    /// `debug_point_radius` is not a positive finite number.
    pub fn validate(&self) -> Result<(), TraceError> {
        let tolerances = [
            ("path_simplification_tolerance", self.path_simplification_tolerance),
            ("curve_fitting_tolerance", self.curve_fitting_tolerance),
            ("boundary_tolerance", self.boundary_tolerance),
        ];
        for (name, value) in tolerances {
            if !value.is_finite() || value < 0.0 {
                return Err(TraceError::InvalidConfig(format!(
                    "{name} must be a finite non-negative number, got {value}"
                )));
            }
        }
        if self.boundary_tolerance >= 1.0 {
            return Err(TraceError::InvalidConfig(format!(
                "boundary_tolerance must be below one pixel, got {}",
                self.boundary_tolerance
            )));
        }
        if let Some(radius) = self.debug_point_radius
            && !(radius.is_finite() && radius > 0.0)
        {
            return Err(TraceError::InvalidConfig(format!(
                "debug_point_radius must be a finite positive number, got {radius}"
            )));
        }
        Ok(())
    }
}

/// Errors that can occur while tracing.
///
/// Every variant describes invalid caller input; the pipeline itself is
/// deterministic and has no transient failures. Regions whose hull
/// degenerates are not errors: they are dropped from the trace.
#[derive(Debug, Clone, PartialEq, thiserror::Error, Serialize, Deserialize)]
pub enum TraceError {
    /// The pixel buffer contained no data.
    #[error("pixel buffer is empty")]
    EmptyPixelBuffer,

    /// The palette contained no colors.
    #[error("palette must contain at least one color")]
    EmptyPalette,

    /// The pixel data length does not match `width * height * 4`.
    #[error("pixel buffer holds {actual} bytes, expected {expected} for RGBA")]
    BufferSizeMismatch {
        /// Bytes required by the declared dimensions.
        expected: usize,
        /// Bytes actually supplied.
        actual: usize,
    },

    /// Trace configuration is invalid.
    #[error("invalid trace configuration: {0}")]
    InvalidConfig(String),
}

impl TraceError {
    /// Returns `true` for errors caused by bad caller input.
    ///
    /// This currently covers every variant.
    #[must_use]
    pub const fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::EmptyPixelBuffer
                | Self::EmptyPalette
                | Self::BufferSizeMismatch { .. }
                | Self::InvalidConfig(_)
        )
    }
}
