//! Trace orchestration: one region per palette color.

use rayon::prelude::*;

use crate::fit::{CurveFitter, CurveFitterKind};
use crate::hull::{ConcaveHull, ConcaveHullKind};
use crate::pixels::PixelBuffer;
use crate::region::Region;
use crate::simplify::{Simplifier, SimplifierKind};
use crate::types::{Color, Dimensions, TraceConfig, TraceError};

/// The pluggable capabilities a trace runs on.
///
/// Regions are built in parallel, so every backend must be `Sync`.
#[derive(Clone, Copy)]
pub struct Backends<'a> {
    /// Concave hull of a color's sample points.
    pub hull: &'a (dyn ConcaveHull + Sync),
    /// Closed-ring simplification of the hull.
    pub simplifier: &'a (dyn Simplifier + Sync),
    /// Cubic fitting of curve runs.
    pub fitter: &'a (dyn CurveFitter + Sync),
}

impl Default for Backends<'_> {
    fn default() -> Self {
        Self {
            hull: &ConcaveHullKind::Geo,
            simplifier: &SimplifierKind::DouglasPeucker,
            fitter: &CurveFitterKind::Schneider,
        }
    }
}

impl std::fmt::Debug for Backends<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Backends").finish_non_exhaustive()
    }
}

/// The traced regions of one image.
#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    dimensions: Dimensions,
    config: TraceConfig,
    regions: Vec<Region>,
}

impl Trace {
    /// Trace every palette color using the built-in backends.
    ///
    /// # Errors
    ///
    /// See [`with_backends`](Self::with_backends).
    pub fn new(
        buffer: &PixelBuffer<'_>,
        palette: &[Color],
        config: TraceConfig,
    ) -> Result<Self, TraceError> {
        Self::with_backends(buffer, palette, config, &Backends::default())
    }

    /// Trace every palette color.
    ///
    /// Regions are built in parallel and kept in palette order. Regions
    /// whose hull has fewer than three vertices, or whose outline came out
    /// empty, are dropped. A color that
    /// appears more than once in the palette is traced once per
    /// occurrence.
    ///
    /// # Errors
    ///
    /// Returns [`TraceError::EmptyPalette`] if `palette` is empty, or
    /// [`TraceError::InvalidConfig`] if `config` fails
    /// [`TraceConfig::validate`]. Nothing is traced in either case.
    pub fn with_backends(
        buffer: &PixelBuffer<'_>,
        palette: &[Color],
        config: TraceConfig,
        backends: &Backends<'_>,
    ) -> Result<Self, TraceError> {
        if palette.is_empty() {
            return Err(TraceError::EmptyPalette);
        }
        config.validate()?;

        let dimensions = buffer.dimensions();
        let span = tracing::debug_span!(
            "trace",
            width = dimensions.width,
            height = dimensions.height,
            colors = palette.len(),
        );
        let _entered = span.enter();

        // Rayon workers inherit neither the caller's dispatcher nor its span.
        let dispatch = tracing::dispatcher::get_default(Clone::clone);
        let regions: Vec<Region> = palette
            .par_iter()
            .map(|&color| {
                tracing::dispatcher::with_default(&dispatch, || {
                    span.in_scope(|| {
                        tracing::debug_span!("region", color = %color)
                            .in_scope(|| Region::trace(buffer, color, &config, backends))
                    })
                })
            })
            .collect();

        let regions: Vec<Region> = regions
            .into_iter()
            .filter(|region| {
                let keep = region.is_valid() && !region.path_segments().is_empty();
                if !keep {
                    tracing::debug!(
                        color = %region.color(),
                        hull = region.hull_points().len(),
                        segments = region.path_segments().len(),
                        "dropping degenerate region"
                    );
                }
                keep
            })
            .collect();

        tracing::debug!(regions = regions.len(), "trace complete");

        Ok(Self {
            dimensions,
            config,
            regions,
        })
    }

    /// Source image dimensions.
    #[must_use]
    pub const fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    /// The configuration the trace ran with.
    #[must_use]
    pub const fn config(&self) -> &TraceConfig {
        &self.config
    }

    /// Valid regions, in palette order.
    #[must_use]
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// The first region traced for exactly `color`.
    #[must_use]
    pub fn region_by_color(&self, color: Color) -> Option<&Region> {
        self.regions.iter().find(|r| r.color() == color)
    }
}
