// src/utilities/spline.rs
//
// Cardinal (Catmull-Rom style) smoothing of clicked polylines.

use nannou::prelude::*;

/// Smoothing parameters. The smoothed curve is a pure function of the
/// source points and these two values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Smoothing {
    pub tension: f32,
    pub segments: usize,
}

impl Default for Smoothing {
    fn default() -> Self {
        Self {
            tension: 0.5,
            segments: 12,
        }
    }
}

impl Smoothing {
    pub fn new(tension: f32, segments: usize) -> Self {
        Self {
            tension: tension.clamp(0.0, 1.0),
            segments: segments.max(1),
        }
    }

    pub fn apply(&self, points: &[Point2]) -> Vec<Point2> {
        smooth(points, self.tension, self.segments)
    }
}

/// Interpolates `segments` points between every pair of consecutive input
/// points and appends the last input point, giving `(n - 1) * segments + 1`
/// points. End points are clamped: the first and last points stand in for
/// their own missing neighbours.
pub fn smooth(points: &[Point2], tension: f32, segments: usize) -> Vec<Point2> {
    if points.len() < 2 {
        return points.to_vec();
    }

    let tension = tension.clamp(0.0, 1.0);
    let segments = segments.max(1);
    let last = points.len() - 1;

    let mut out = Vec::with_capacity(last * segments + 1);
    for i in 0..last {
        let p0 = points[i.saturating_sub(1)];
        let p1 = points[i];
        let p2 = points[i + 1];
        let p3 = points[(i + 2).min(last)];

        for step in 0..segments {
            let t = step as f32 / segments as f32;
            out.push(cardinal_point(p0, p1, p2, p3, tension, t));
        }
    }
    out.push(points[last]);
    out
}

// Hermite form of the cardinal spline: weights sum to 1, t=0 gives p1, t=1 gives p2.
fn cardinal_point(p0: Point2, p1: Point2, p2: Point2, p3: Point2, s: f32, t: f32) -> Point2 {
    let t2 = t * t;
    let t3 = t2 * t;

    let q0 = -s * t3 + 2.0 * s * t2 - s * t;
    let q1 = (2.0 - s) * t3 + (s - 3.0) * t2 + 1.0;
    let q2 = (s - 2.0) * t3 + (3.0 - 2.0 * s) * t2 + s * t;
    let q3 = s * t3 - s * t2;

    p0 * q0 + p1 * q1 + p2 * q2 + p3 * q3
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Point2> {
        vec![
            pt2(10.0, 10.0),
            pt2(50.0, 10.0),
            pt2(50.0, 50.0),
            pt2(10.0, 50.0),
        ]
    }

    #[test]
    fn test_empty_and_single_point() {
        assert!(smooth(&[], 0.5, 12).is_empty());
        let single = [pt2(3.0, 4.0)];
        assert_eq!(smooth(&single, 0.5, 12), vec![pt2(3.0, 4.0)]);
    }

    #[test]
    fn test_output_length() {
        let pts = square();
        let out = smooth(&pts, 0.5, 12);
        assert_eq!(out.len(), (pts.len() - 1) * 12 + 1);

        let out = smooth(&pts[..2], 0.5, 1);
        assert_eq!(out, vec![pts[0], pts[1]]);
    }

    #[test]
    fn test_passes_through_control_points() {
        let pts = square();
        let segments = 8;
        let out = smooth(&pts, 0.5, segments);
        for (i, p) in pts.iter().enumerate() {
            let q = out[i * segments];
            assert!((q.x - p.x).abs() < 1e-4, "x mismatch at control point {}", i);
            assert!((q.y - p.y).abs() < 1e-4, "y mismatch at control point {}", i);
        }
    }

    #[test]
    fn test_deterministic() {
        let pts = square();
        let a = smooth(&pts, 0.35, 7);
        let b = smooth(&pts, 0.35, 7);
        assert_eq!(a, b);
    }

    #[test]
    fn test_input_untouched_and_params_clamped() {
        let pts = square();
        let copy = pts.clone();
        let out = smooth(&pts, 4.0, 0);
        assert_eq!(pts, copy);
        // segments clamped to 1 means only the control points come back
        assert_eq!(out.len(), pts.len());
        assert_eq!(Smoothing::new(-1.0, 0), Smoothing::new(0.0, 1));
    }

    #[test]
    fn test_collinear_points_stay_on_line() {
        let pts = vec![pt2(0.0, 0.0), pt2(10.0, 0.0), pt2(20.0, 0.0)];
        for p in smooth(&pts, 0.5, 10) {
            assert!(p.y.abs() < 1e-5);
            assert!(p.x >= -1e-4 && p.x <= 20.0 + 1e-4);
        }
    }
}
