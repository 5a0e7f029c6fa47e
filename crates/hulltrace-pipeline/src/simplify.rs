//! Polygon simplification using the Ramer-Douglas-Peucker algorithm.
//!
//! This module defines the [`Simplifier`] trait for pluggable
//! simplification backends and the [`SimplifierKind`] enum naming the
//! built-in one. The hull builder only relies on the trait contract:
//! order-preserving, closed-ring aware, never inventing points.

use crate::types::{Point, Polygon};

/// Selects which simplification backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SimplifierKind {
    /// Ramer-Douglas-Peucker on the closed ring, optionally preceded by a
    /// radial-distance pass when `high_quality` is `false`.
    #[default]
    DouglasPeucker,
}

/// Trait for polygon simplification strategies.
///
/// Input: an implicitly closed ring. Output: a subsequence of its
/// vertices, in the same order.
pub trait Simplifier {
    /// Simplify a closed ring at `tolerance` pixels.
    ///
    /// `high_quality` skips any fast pre-pass and runs the full algorithm
    /// on every vertex.
    fn simplify_closed(&self, polygon: &Polygon, tolerance: f64, high_quality: bool) -> Polygon;
}

impl Simplifier for SimplifierKind {
    fn simplify_closed(&self, polygon: &Polygon, tolerance: f64, high_quality: bool) -> Polygon {
        match *self {
            Self::DouglasPeucker => simplify_ring(polygon, tolerance, high_quality),
        }
    }
}

/// Simplify a closed ring with Ramer-Douglas-Peucker.
///
/// The ring is opened at its first vertex (which is always kept) and
/// closed again by appending that vertex, so the closing edge takes part
/// in the distance tests. Rings with fewer than 4 vertices are returned
/// unchanged.
#[must_use = "returns the simplified polygon"]
pub fn simplify_ring(polygon: &Polygon, tolerance: f64, high_quality: bool) -> Polygon {
    let points = polygon.points();
    if points.len() < 4 {
        return polygon.clone();
    }

    let reduced;
    let points = if high_quality {
        points
    } else {
        reduced = radial_distance(points, tolerance);
        &reduced[..]
    };

    let mut ring = Vec::with_capacity(points.len() + 1);
    ring.extend_from_slice(points);
    ring.push(points[0]);

    let mut kept = vec![false; ring.len()];
    kept[0] = true;
    let last = ring.len() - 1;
    kept[last] = true;

    rdp_recurse(&ring, 0, last, tolerance, &mut kept);

    // Drop the closing duplicate again.
    let simplified: Vec<Point> = ring[..last]
        .iter()
        .zip(&kept)
        .filter(|&(_, k)| *k)
        .map(|(&p, _)| p)
        .collect();

    Polygon::new(simplified)
}

/// Drop points closer than `tolerance` to the previously kept point.
///
/// The last point is always kept.
fn radial_distance(points: &[Point], tolerance: f64) -> Vec<Point> {
    let sq_tolerance = tolerance * tolerance;
    let mut out: Vec<Point> = Vec::with_capacity(points.len());
    for (i, &p) in points.iter().enumerate() {
        let keep = match out.last() {
            None => true,
            Some(&prev) => i == points.len() - 1 || p.distance_squared(prev) > sq_tolerance,
        };
        if keep {
            out.push(p);
        }
    }
    out
}

/// Recursive step of the Ramer-Douglas-Peucker algorithm.
///
/// Finds the point between `start` and `end` that is farthest from the
/// line segment between them. If that distance exceeds `tolerance`, the
/// point is kept and both sub-segments are processed recursively.
fn rdp_recurse(points: &[Point], start: usize, end: usize, tolerance: f64, kept: &mut [bool]) {
    if end <= start + 1 {
        return;
    }

    let mut max_dist = 0.0;
    let mut max_idx = start;

    for i in (start + 1)..end {
        let d = perpendicular_distance(points[i], points[start], points[end]);
        if d > max_dist {
            max_dist = d;
            max_idx = i;
        }
    }

    if max_dist > tolerance {
        kept[max_idx] = true;
        rdp_recurse(points, start, max_idx, tolerance, kept);
        rdp_recurse(points, max_idx, end, tolerance, kept);
    }
}

/// Perpendicular distance from point `p` to the line defined by `a` and `b`.
///
/// When `a` and `b` coincide (the closing edge of a ring opened at `a`),
/// returns the distance from `p` to `a`.
fn perpendicular_distance(p: Point, a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let length_sq = dx.mul_add(dx, dy * dy);

    if length_sq == 0.0 {
        return p.distance(a);
    }

    let cross = dx.mul_add(a.y - p.y, -(dy * (a.x - p.x)));
    cross.abs() / length_sq.sqrt()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn square_with_midpoints() -> Polygon {
        Polygon::new(vec![
            Point::new(0.0, 0.0),
            Point::new(5.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 5.0),
            Point::new(10.0, 10.0),
            Point::new(5.0, 10.0),
            Point::new(0.0, 10.0),
            Point::new(0.0, 5.0),
        ])
    }

    #[test]
    fn triangle_unchanged() {
        let tri = Polygon::new(vec![
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(0.0, 4.0),
        ]);
        assert_eq!(simplify_ring(&tri, 10.0, true), tri);
    }

    #[test]
    fn collinear_midpoints_removed() {
        let result = simplify_ring(&square_with_midpoints(), 0.5, true);
        assert_eq!(
            result.points(),
            &[
                Point::new(0.0, 0.0),
                Point::new(10.0, 0.0),
                Point::new(10.0, 10.0),
                Point::new(0.0, 10.0),
            ]
        );
    }

    #[test]
    fn zero_tolerance_keeps_non_collinear_points() {
        let poly = Polygon::new(vec![
            Point::new(0.0, 0.0),
            Point::new(4.0, 1.0),
            Point::new(8.0, 0.0),
            Point::new(8.0, 8.0),
            Point::new(4.0, 7.0),
            Point::new(0.0, 8.0),
        ]);
        assert_eq!(simplify_ring(&poly, 0.0, true), poly);
    }

    #[test]
    fn closing_edge_takes_part() {
        // The vertex (0, 5) only deviates from the closing edge back to
        // (0, 0); it must still be tested and dropped.
        let poly = Polygon::new(vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
            Point::new(0.1, 5.0),
        ]);
        let result = simplify_ring(&poly, 0.5, true);
        assert_eq!(result.len(), 4);
        assert!(!result.points().contains(&Point::new(0.1, 5.0)));
    }

    #[test]
    fn order_is_preserved() {
        let poly = square_with_midpoints();
        let result = simplify_ring(&poly, 0.5, true);
        let indices: Vec<usize> = result
            .points()
            .iter()
            .map(|p| poly.points().iter().position(|q| q == p).unwrap())
            .collect();
        assert!(indices.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn low_quality_drops_clustered_points() {
        let poly = Polygon::new(vec![
            Point::new(0.0, 0.0),
            Point::new(0.2, 0.1),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ]);
        let result = simplify_ring(&poly, 1.0, false);
        assert!(!result.points().contains(&Point::new(0.2, 0.1)));
    }

    #[test]
    fn kind_dispatches_to_douglas_peucker() {
        let poly = square_with_midpoints();
        assert_eq!(
            SimplifierKind::DouglasPeucker.simplify_closed(&poly, 0.5, true),
            simplify_ring(&poly, 0.5, true)
        );
    }

    #[test]
    fn perpendicular_distance_on_axis() {
        let d = perpendicular_distance(
            Point::new(1.0, 3.0),
            Point::new(0.0, 0.0),
            Point::new(2.0, 0.0),
        );
        assert!((d - 3.0).abs() < 1e-10);
    }

    #[test]
    fn perpendicular_distance_coincident_endpoints() {
        let d = perpendicular_distance(
            Point::new(3.0, 4.0),
            Point::new(0.0, 0.0),
            Point::new(0.0, 0.0),
        );
        assert!((d - 5.0).abs() < 1e-10);
    }
}
