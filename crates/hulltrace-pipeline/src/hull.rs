//! Hull building: turn a color's sample points into a closed boundary.
//!
//! This module defines the [`ConcaveHull`] trait for pluggable hull
//! backends, the [`ConcaveHullKind`] enum naming the built-in one, and
//! [`build_hull`], which runs the backend and then simplifies the result
//! without ever dropping a vertex that sits on the image frame.

use geo::concave_hull::ConcaveHullOptions;
use geo::{ConcaveHull as _, ConvexHull as _, MultiPoint};

use crate::frame::Frame;
use crate::simplify::Simplifier;
use crate::types::{Point, Polygon};

/// Concavity passed to the hull backend. Lower values follow the sample
/// cloud more tightly.
pub const HULL_CONCAVITY: f64 = 1.0;

/// Hull edges shorter than this (in pixels) are not refined further.
pub const HULL_MIN_EDGE_LENGTH: f64 = 1.0;

/// Selects which concave hull backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConcaveHullKind {
    /// `geo::ConcaveHull` on a `MultiPoint`.
    #[default]
    Geo,
    /// `geo::ConvexHull` on a `MultiPoint`. Ignores concavity and edge
    /// length; every concave notch is bridged.
    Convex,
}

/// Trait for concave hull strategies.
///
/// Input: an unordered point cloud that may contain duplicates.
/// Output: an implicitly closed ring. No winding direction or starting
/// vertex is guaranteed.
pub trait ConcaveHull {
    /// Compute the concave hull of `points`.
    fn concave_hull(&self, points: &[Point], concavity: f64, min_edge_length: f64) -> Polygon;
}

impl ConcaveHull for ConcaveHullKind {
    fn concave_hull(&self, points: &[Point], concavity: f64, min_edge_length: f64) -> Polygon {
        let Some(cloud) = point_cloud(points) else {
            return Polygon::new(distinct_prefix(points));
        };
        let hull = match *self {
            Self::Geo => cloud.concave_hull_with_options(ConcaveHullOptions {
                concavity,
                length_threshold: min_edge_length,
            }),
            Self::Convex => cloud.convex_hull(),
        };
        Polygon::new(open_ring(hull.exterior().coords().map(|&c| coord_to_point(c))))
    }
}

const fn point_to_coord(p: Point) -> geo::Coord<f64> {
    geo::Coord { x: p.x, y: p.y }
}

const fn coord_to_point(c: geo::Coord<f64>) -> Point {
    Point::new(c.x, c.y)
}

/// Up to three distinct points of `points`, in first-seen order.
fn distinct_prefix(points: &[Point]) -> Vec<Point> {
    let mut distinct: Vec<Point> = Vec::with_capacity(3);
    for &p in points {
        if !distinct.contains(&p) {
            distinct.push(p);
            if distinct.len() >= 3 {
                break;
            }
        }
    }
    distinct
}

/// The sample cloud as a `geo` multipoint, or `None` when it has fewer
/// than three distinct points and cannot enclose an area.
fn point_cloud(points: &[Point]) -> Option<MultiPoint<f64>> {
    (distinct_prefix(points).len() >= 3)
        .then(|| points.iter().map(|&p| point_to_coord(p)).collect())
}

/// Drop the closing vertex `geo` repeats at the end of a ring.
fn open_ring(coords: impl IntoIterator<Item = Point>) -> Vec<Point> {
    let mut ring: Vec<Point> = coords.into_iter().collect();
    if ring.len() > 1 && ring.first() == ring.last() {
        ring.pop();
    }
    ring
}

/// Build the boundary polygon for one color's sample points.
///
/// Runs the hull backend, then [`preserve_frame_vertices`] over the
/// simplifier's output. The result is valid for segmentation when it has
/// at least three vertices.
#[must_use = "returns the hull polygon"]
pub fn build_hull(
    samples: &[Point],
    frame: &Frame,
    simplification_tolerance: f64,
    hull_backend: &dyn ConcaveHull,
    simplifier: &dyn Simplifier,
) -> Polygon {
    let hull = hull_backend.concave_hull(samples, HULL_CONCAVITY, HULL_MIN_EDGE_LENGTH);
    if hull.is_empty() {
        return hull;
    }
    let simplified = simplifier.simplify_closed(&hull, simplification_tolerance, true);
    preserve_frame_vertices(&hull, &simplified, frame)
}

/// Merge a simplified ring back with the frame-touching vertices of the
/// original ring.
///
/// A vertex of `original` is kept when the simplifier kept it, when it
/// touches the frame, or when it is the direct neighbor of a frame vertex
/// without touching the frame itself (that neighbor anchors where the
/// outline leaves the frame). Consecutive duplicates, including the
/// wrap-around pair, are collapsed. If nothing survives, `original` is
/// returned unchanged.
#[must_use = "returns the merged polygon"]
pub fn preserve_frame_vertices(original: &Polygon, simplified: &Polygon, frame: &Frame) -> Polygon {
    let points = original.points();
    let n = points.len();
    if n == 0 {
        return original.clone();
    }

    let on_frame: Vec<bool> = points.iter().map(|&p| frame.touches(p)).collect();

    let mut anchor = vec![false; n];
    for i in (0..n).filter(|&i| on_frame[i]) {
        let prev = (i + n - 1) % n;
        let next = (i + 1) % n;
        if !on_frame[prev] {
            anchor[prev] = true;
        }
        if !on_frame[next] {
            anchor[next] = true;
        }
    }

    // The simplified ring is an ordered subsequence of the original, so
    // one cursor over it finds every vertex the simplifier kept.
    let kept = simplified.points();
    let mut cursor = 0;
    let mut merged: Vec<Point> = Vec::with_capacity(n);
    for (i, &p) in points.iter().enumerate() {
        let simplifier_kept = kept.get(cursor) == Some(&p);
        if simplifier_kept {
            cursor += 1;
        }
        let keep = on_frame[i] || anchor[i] || simplifier_kept;
        if keep && merged.last() != Some(&p) {
            merged.push(p);
        }
    }
    while merged.len() > 1 && merged.first() == merged.last() {
        merged.pop();
    }

    if merged.is_empty() {
        original.clone()
    } else {
        Polygon::new(merged)
    }
}
