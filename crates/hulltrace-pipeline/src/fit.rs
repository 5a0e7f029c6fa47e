//! Cubic Bezier fitting through an ordered run of points.
//!
//! This module defines the [`CurveFitter`] trait for pluggable fitting
//! backends and the [`CurveFitterKind`] enum naming the built-in one, a
//! least-squares fitter after Philip J. Schneider, "An Algorithm for
//! Automatically Fitting Digitized Curves" (Graphics Gems, 1990).
//!
//! # Algorithm
//!
//! 1. Parameterize the points by cumulative chord length.
//! 2. Solve for the two control-point distances along the given end
//!    tangents that minimise squared error.
//! 3. If the worst point is within tolerance, done. If it is close, refine
//!    the parameters with Newton-Raphson and retry a few times.
//! 4. Otherwise split at the worst point, using the direction through its
//!    neighbors as the shared tangent, and fit both halves recursively.

use kurbo::{CubicBez, ParamCurve, ParamCurveDeriv, Vec2};

use crate::types::{CubicBezier, Point};

/// Newton-Raphson reparameterization passes before splitting.
const MAX_REPARAMETERIZE_ITERATIONS: usize = 20;

/// Selects which curve fitting backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CurveFitterKind {
    /// Schneider's least-squares fit with recursive splitting.
    #[default]
    Schneider,
}

/// Trait for cubic curve fitting strategies.
///
/// Contract: the returned cubics are ordered, each one starts where the
/// previous ended, the first starts at `points[0]` and the last ends at
/// the final point. `left_tangent` points from the first point into the
/// run; `right_tangent` points from the last point back into the run.
/// Both are unit vectors.
pub trait CurveFitter {
    /// Fit cubics through `points` within `tolerance` pixels.
    fn fit(
        &self,
        points: &[Point],
        left_tangent: Vec2,
        right_tangent: Vec2,
        tolerance: f64,
    ) -> Vec<CubicBezier>;
}

impl CurveFitter for CurveFitterKind {
    fn fit(
        &self,
        points: &[Point],
        left_tangent: Vec2,
        right_tangent: Vec2,
        tolerance: f64,
    ) -> Vec<CubicBezier> {
        match *self {
            Self::Schneider => fit_cubic(points, left_tangent, right_tangent, tolerance),
        }
    }
}

/// Unit tangent pointing from `from` towards `to`.
///
/// Returns `None` when the points coincide.
#[must_use]
pub fn tangent(to: Point, from: Point) -> Option<Vec2> {
    unit(kurbo::Point::from(to) - kurbo::Point::from(from))
}

/// `v` scaled to unit length, or `None` for a zero or non-finite vector.
fn unit(v: Vec2) -> Option<Vec2> {
    let len = v.hypot();
    (len > 0.0 && len.is_finite()).then(|| v / len)
}

/// Fit one or more cubics through `points` with Schneider's algorithm.
///
/// Fewer than two points produce no curves.
#[must_use = "returns the fitted cubics"]
pub fn fit_cubic(
    points: &[Point],
    left_tangent: Vec2,
    right_tangent: Vec2,
    tolerance: f64,
) -> Vec<CubicBezier> {
    let points: Vec<kurbo::Point> = points.iter().map(|&p| p.into()).collect();
    let mut out = Vec::new();
    fit_recursive(&points, left_tangent, right_tangent, tolerance * tolerance, &mut out);
    out.into_iter().map(CubicBezier::from).collect()
}

fn fit_recursive(
    points: &[kurbo::Point],
    left_tangent: Vec2,
    right_tangent: Vec2,
    sq_tolerance: f64,
    out: &mut Vec<CubicBez>,
) {
    let n = points.len();
    if n < 2 {
        return;
    }
    let first = points[0];
    let last = points[n - 1];

    if n == 2 {
        let dist = first.distance(last) / 3.0;
        out.push(CubicBez::new(
            first,
            first + left_tangent * dist,
            last + right_tangent * dist,
            last,
        ));
        return;
    }

    let mut params = chord_length_parameterize(points);
    let mut bezier = generate_bezier(points, &params, left_tangent, right_tangent);
    let (mut max_error, mut split) = compute_max_error(points, &bezier, &params);

    if max_error <= sq_tolerance {
        out.push(bezier);
        return;
    }

    // Close enough to be worth refining the parameters first.
    if max_error < sq_tolerance * 4.0 {
        for _ in 0..MAX_REPARAMETERIZE_ITERATIONS {
            params = reparameterize(&bezier, points, &params);
            bezier = generate_bezier(points, &params, left_tangent, right_tangent);
            (max_error, split) = compute_max_error(points, &bezier, &params);
            if max_error <= sq_tolerance {
                out.push(bezier);
                return;
            }
        }
    }

    let split = split.clamp(1, n - 2);
    let center = center_tangent(points, split);
    fit_recursive(&points[..=split], left_tangent, center, sq_tolerance, out);
    fit_recursive(&points[split..], -center, right_tangent, sq_tolerance, out);
}

/// Tangent at an interior split point, pointing back towards the start.
fn center_tangent(points: &[kurbo::Point], split: usize) -> Vec2 {
    if let Some(t) = unit(points[split - 1] - points[split + 1]) {
        return t;
    }
    // Neighbors coincide (the run doubles back on itself): use the
    // perpendicular of the incoming edge instead.
    let incoming = points[split - 1] - points[split];
    unit(Vec2::new(-incoming.y, incoming.x)).unwrap_or(incoming)
}

/// Cumulative chord length, normalized to `[0, 1]`.
fn chord_length_parameterize(points: &[kurbo::Point]) -> Vec<f64> {
    let mut params = Vec::with_capacity(points.len());
    let mut total = 0.0;
    params.push(0.0);
    for pair in points.windows(2) {
        total += pair[0].distance(pair[1]);
        params.push(total);
    }
    if total > 0.0 {
        for u in &mut params {
            *u /= total;
        }
    }
    params
}

/// Least-squares control points along fixed end tangents.
fn generate_bezier(
    points: &[kurbo::Point],
    params: &[f64],
    left_tangent: Vec2,
    right_tangent: Vec2,
) -> CubicBez {
    let first = points[0];
    let last = points[points.len() - 1];
    let base = CubicBez::new(first, first, last, last);

    let mut c = [[0.0_f64; 2]; 2];
    let mut x = [0.0_f64; 2];

    for (&p, &u) in points.iter().zip(params) {
        let mt = 1.0 - u;
        let a0 = left_tangent * (3.0 * u * mt * mt);
        let a1 = right_tangent * (3.0 * u * u * mt);

        c[0][0] += a0.dot(a0);
        c[0][1] += a0.dot(a1);
        c[1][1] += a1.dot(a1);

        let tmp = p - base.eval(u);
        x[0] += a0.dot(tmp);
        x[1] += a1.dot(tmp);
    }
    c[1][0] = c[0][1];

    let det_c0_c1 = c[0][0].mul_add(c[1][1], -(c[1][0] * c[0][1]));
    let det_c0_x = c[0][0].mul_add(x[1], -(c[1][0] * x[0]));
    let det_x_c1 = x[0].mul_add(c[1][1], -(x[1] * c[0][1]));

    let (alpha_l, alpha_r) = if det_c0_c1 == 0.0 {
        (0.0, 0.0)
    } else {
        (det_x_c1 / det_c0_c1, det_c0_x / det_c0_c1)
    };

    let seg_length = first.distance(last);
    let epsilon = 1.0e-6 * seg_length;

    // Degenerate or negative solutions fall back to the Wu/Barsky
    // heuristic of a third of the chord.
    let (alpha_l, alpha_r) = if alpha_l < epsilon || alpha_r < epsilon {
        (seg_length / 3.0, seg_length / 3.0)
    } else {
        (alpha_l, alpha_r)
    };

    CubicBez::new(
        first,
        first + left_tangent * alpha_l,
        last + right_tangent * alpha_r,
        last,
    )
}

/// Largest squared distance between a point and its parameterized
/// position on the curve, and the index where it occurs.
fn compute_max_error(points: &[kurbo::Point], bezier: &CubicBez, params: &[f64]) -> (f64, usize) {
    let mut max_dist = 0.0;
    let mut split = points.len() / 2;
    for i in 1..points.len() - 1 {
        let dist = (bezier.eval(params[i]) - points[i]).hypot2();
        if dist > max_dist {
            max_dist = dist;
            split = i;
        }
    }
    (max_dist, split)
}

/// One Newton-Raphson step per point towards its closest curve parameter.
fn reparameterize(bezier: &CubicBez, points: &[kurbo::Point], params: &[f64]) -> Vec<f64> {
    let first = bezier.deriv();
    let second = first.deriv();
    points
        .iter()
        .zip(params)
        .map(|(&p, &u)| {
            let d = bezier.eval(u) - p;
            let q1 = first.eval(u).to_vec2();
            let q2 = second.eval(u).to_vec2();
            let denominator = q1.dot(q1) + d.dot(q2);
            if denominator == 0.0 {
                u
            } else {
                (u - d.dot(q1) / denominator).clamp(0.0, 1.0)
            }
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn assert_chained(cubics: &[CubicBezier], first: Point, last: Point) {
        assert!(!cubics.is_empty());
        assert_eq!(cubics[0].p0, first);
        assert_eq!(cubics[cubics.len() - 1].p1, last);
        for pair in cubics.windows(2) {
            assert_eq!(pair[0].p1, pair[1].p0);
        }
    }

    fn max_deviation(cubics: &[CubicBezier], points: &[Point]) -> f64 {
        points
            .iter()
            .map(|&p| {
                cubics
                    .iter()
                    .map(|&c| CubicBez::from(c))
                    .flat_map(|c| (0..=200).map(move |i| c.eval(f64::from(i) / 200.0)))
                    .map(|q| q.distance(p.into()))
                    .fold(f64::INFINITY, f64::min)
            })
            .fold(0.0, f64::max)
    }

    #[test]
    fn two_points_make_one_third_chord_handles() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 0.0);
        let cubics = fit_cubic(&[a, b], Vec2::new(1.0, 0.0), Vec2::new(-1.0, 0.0), 1.0);
        assert_eq!(
            cubics,
            vec![CubicBezier::new(a, Point::new(1.0, 0.0), Point::new(2.0, 0.0), b)]
        );
    }

    #[test]
    fn too_few_points_fit_nothing() {
        let cubics = fit_cubic(
            &[Point::new(1.0, 1.0)],
            Vec2::new(1.0, 0.0),
            Vec2::new(-1.0, 0.0),
            1.0,
        );
        assert!(cubics.is_empty());
    }

    #[test]
    fn collinear_points_fit_single_cubic() {
        let points: Vec<Point> = (0..=10).map(|i| Point::new(f64::from(i), 0.0)).collect();
        let cubics = fit_cubic(&points, Vec2::new(1.0, 0.0), Vec2::new(-1.0, 0.0), 0.5);
        assert_eq!(cubics.len(), 1);
        assert_chained(&cubics, points[0], points[10]);
    }

    #[test]
    fn arc_fits_within_tolerance() {
        let points: Vec<Point> = (0..=16)
            .map(|i| {
                let a = std::f64::consts::PI * f64::from(i) / 16.0;
                Point::new(10.0 * a.cos(), 10.0 * a.sin())
            })
            .collect();
        let left = tangent(points[1], points[0]).unwrap();
        let right = tangent(points[15], points[16]).unwrap();
        let cubics = fit_cubic(&points, left, right, 0.25);
        assert_chained(&cubics, points[0], points[16]);
        // Sampled nearest-point distance overestimates slightly.
        assert!(max_deviation(&cubics, &points) <= 0.3);
    }

    #[test]
    fn zigzag_is_split() {
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(2.0, 6.0),
            Point::new(4.0, 0.0),
            Point::new(6.0, 6.0),
            Point::new(8.0, 0.0),
        ];
        let left = tangent(points[1], points[0]).unwrap();
        let right = tangent(points[3], points[4]).unwrap();
        let cubics = fit_cubic(&points, left, right, 0.1);
        assert!(cubics.len() > 1);
        assert_chained(&cubics, points[0], points[4]);
        assert!(cubics.iter().all(CubicBezier::is_finite));
    }

    #[test]
    fn closed_loop_fits_without_nan() {
        let mut points = vec![
            Point::new(5.0, 2.0),
            Point::new(8.0, 5.0),
            Point::new(5.0, 8.0),
            Point::new(2.0, 5.0),
        ];
        points.push(points[0]);
        let left = tangent(points[1], points[3]).unwrap();
        let cubics = fit_cubic(&points, left, -left, 0.5);
        assert_chained(&cubics, points[0], points[4]);
        assert!(cubics.iter().all(CubicBezier::is_finite));
    }

    #[test]
    fn tangent_of_coincident_points_is_none() {
        let p = Point::new(2.0, 2.0);
        assert!(tangent(p, p).is_none());
        assert_eq!(
            tangent(Point::new(0.0, 5.0), Point::new(0.0, 1.0)),
            Some(Vec2::new(0.0, 1.0))
        );
    }

    #[test]
    fn doubled_back_split_uses_perpendicular_tangent() {
        let points = [
            kurbo::Point::new(0.0, 0.0),
            kurbo::Point::new(2.0, 0.0),
            kurbo::Point::new(0.0, 0.0),
        ];
        let t = center_tangent(&points, 1);
        assert!((t.hypot() - 1.0).abs() < 1e-12);
        assert!(t.dot(Vec2::new(1.0, 0.0)).abs() < 1e-12);
    }

    #[test]
    fn chord_length_params_are_normalized() {
        let params = chord_length_parameterize(&[
            kurbo::Point::new(0.0, 0.0),
            kurbo::Point::new(1.0, 0.0),
            kurbo::Point::new(4.0, 0.0),
        ]);
        assert_eq!(params, vec![0.0, 0.25, 1.0]);
    }

    #[test]
    fn kind_dispatches_to_schneider() {
        let points = [Point::new(0.0, 0.0), Point::new(3.0, 0.0)];
        let left = Vec2::new(1.0, 0.0);
        assert_eq!(
            CurveFitterKind::Schneider.fit(&points, left, -left, 1.0),
            fit_cubic(&points, left, -left, 1.0)
        );
    }
}
