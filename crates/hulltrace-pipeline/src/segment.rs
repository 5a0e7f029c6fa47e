//! Path segmentation: turn a hull polygon into line and curve segments.
//!
//! Edges that run along the image frame must stay pixel-exact, so they
//! become straight [`PathSegment::Line`]s. Everything else is grouped into
//! runs and handed to a [`CurveFitter`].
//!
//! # Steps
//!
//! 1. Snap every near-frame vertex onto the frame (a new vertex array; the
//!    input is never mutated).
//! 2. Classify each edge `i -> i+1`: [`EdgeKind::Line`] when both endpoints
//!    touch a common frame side, [`EdgeKind::Curve`] otherwise. A polygon
//!    with no line edge is a *closed free shape*.
//! 3. Start walking at the first line edge so no run is split by the
//!    array wraparound, skip zero-length edges, and group consecutive
//!    edges of the same kind into [`Run`]s.
//! 4. Emit one line per edge of a line run. A curve run of a single edge
//!    also becomes a line. Longer curve runs are fitted; closed free shapes
//!    use a shared tangent at the seam so the loop closes without a kink.

use crate::fit::{CurveFitter, tangent};
use crate::frame::Frame;
use crate::types::{CubicBezier, PathSegment, Point};

/// How an edge is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeKind {
    /// Along a frame side: rendered straight.
    Line,
    /// Anywhere else: part of a fitted curve.
    Curve,
}

/// A maximal sequence of consecutive edges of one kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    /// Kind shared by every edge in the run.
    pub kind: EdgeKind,
    /// Start-vertex indices of the edges, in traversal order.
    pub edges: Vec<usize>,
}

/// Output of [`segment_path`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Segmentation {
    /// Chained segments forming the closed outline.
    pub segments: Vec<PathSegment>,
    /// The fitted cubics, in the same order as the curve segments.
    pub cubics: Vec<CubicBezier>,
    /// Curve runs rejected because a tangent or fitted coordinate was not
    /// finite. Each one was emitted as straight lines instead.
    pub numeric_anomalies: usize,
    /// `true` when no edge touches the frame along a side.
    pub closed_free_shape: bool,
}

/// Classify every edge of an already-snapped ring.
///
/// Edge `i` runs from `points[i]` to `points[(i + 1) % n]`.
#[must_use]
pub fn classify_edges(points: &[Point], frame: &Frame) -> Vec<EdgeKind> {
    let n = points.len();
    let sides: Vec<_> = points.iter().map(|&p| frame.sides(p)).collect();
    (0..n)
        .map(|i| {
            if sides[i].intersects(sides[(i + 1) % n]) {
                EdgeKind::Line
            } else {
                EdgeKind::Curve
            }
        })
        .collect()
}

/// Group edges into runs, starting at the first line edge (or 0).
///
/// Zero-length edges are skipped.
#[must_use]
pub fn build_runs(points: &[Point], kinds: &[EdgeKind]) -> Vec<Run> {
    let n = points.len();
    let start = kinds
        .iter()
        .position(|&k| k == EdgeKind::Line)
        .unwrap_or(0);

    let mut runs: Vec<Run> = Vec::new();
    for offset in 0..n {
        let i = (start + offset) % n;
        if points[i] == points[(i + 1) % n] {
            continue;
        }
        match runs.last_mut() {
            Some(run) if run.kind == kinds[i] => run.edges.push(i),
            _ => runs.push(Run {
                kind: kinds[i],
                edges: vec![i],
            }),
        }
    }
    runs
}

/// Segment a hull polygon into chained line and curve segments.
///
/// Polygons with fewer than three vertices produce an empty
/// segmentation and never reach the fitter.
#[must_use = "returns the segmentation"]
pub fn segment_path(
    hull: &[Point],
    frame: &Frame,
    tolerance: f64,
    fitter: &dyn CurveFitter,
) -> Segmentation {
    let n = hull.len();
    if n < 3 {
        return Segmentation::default();
    }

    let points = frame.snap_all(hull);
    let kinds = classify_edges(&points, frame);
    let closed_free_shape = !kinds.contains(&EdgeKind::Line);

    let mut out = Segmentation {
        closed_free_shape,
        ..Segmentation::default()
    };

    for run in build_runs(&points, &kinds) {
        match (run.kind, run.edges.len()) {
            (EdgeKind::Line, _) | (EdgeKind::Curve, 1) => {
                push_lines(&points, &run.edges, &mut out);
            }
            (EdgeKind::Curve, _) => {
                let mut run_points: Vec<Point> = run.edges.iter().map(|&i| points[i]).collect();
                if let Some(&last) = run.edges.last() {
                    run_points.push(points[(last + 1) % n]);
                }
                match fit_run(&run_points, closed_free_shape, tolerance, fitter) {
                    Some(cubics) => {
                        out.segments.extend(cubics.iter().copied().map(PathSegment::from));
                        out.cubics.extend(cubics);
                    }
                    None => {
                        tracing::warn!(
                            edges = run.edges.len(),
                            start = ?run_points.first(),
                            "curve fit produced non-finite output; emitting lines"
                        );
                        out.numeric_anomalies += 1;
                        push_lines(&points, &run.edges, &mut out);
                    }
                }
            }
        }
    }

    out
}

fn push_lines(points: &[Point], edges: &[usize], out: &mut Segmentation) {
    let n = points.len();
    out.segments.extend(edges.iter().map(|&i| PathSegment::Line {
        p0: points[i],
        p1: points[(i + 1) % n],
    }));
}

/// Fit one curve run.
///
/// Returns `None` when a tangent is undefined or the fitter returns
/// nothing usable. The fitted chain is pinned to the run's endpoints and
/// made contiguous, so output segments always chain.
fn fit_run(
    run_points: &[Point],
    closed_free_shape: bool,
    tolerance: f64,
    fitter: &dyn CurveFitter,
) -> Option<Vec<CubicBezier>> {
    let len = run_points.len();
    let first = run_points[0];
    let last = run_points[len - 1];

    let (left, right) = if closed_free_shape {
        // The run is the whole loop: run_points[len - 2] is the vertex
        // before the seam.
        let left = tangent(run_points[1], run_points[len - 2])?;
        (left, -left)
    } else {
        (
            tangent(run_points[1], first)?,
            tangent(run_points[len - 2], last)?,
        )
    };

    let mut cubics = fitter.fit(run_points, left, right, tolerance);
    if cubics.is_empty() || !cubics.iter().all(CubicBezier::is_finite) {
        return None;
    }

    let mut previous_end = first;
    for cubic in &mut cubics {
        cubic.p0 = previous_end;
        previous_end = cubic.p1;
    }
    if let Some(tail) = cubics.last_mut() {
        tail.p1 = last;
    }
    Some(cubics)
}
