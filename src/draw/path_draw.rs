/// src/draw/path_draw.rs
/// Canvas-style path building, flattened to polylines, plus line dashing

use nannou::prelude::*;

use std::f32::consts::PI;

/// Segments used for a full turn of an arc or ellipse.
pub const ARC_RESOLUTION: usize = 128;
/// Segments used per quadratic curve.
pub const QUADRATIC_RESOLUTION: usize = 16;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SubPath {
    pub points: Vec<Point2>,
    pub closed: bool,
}

impl SubPath {
    /// Points to stroke, with the closing segment spelled out.
    pub fn stroke_points(&self) -> Vec<Point2> {
        let mut points = self.points.clone();
        if self.closed && points.len() > 2 {
            points.push(points[0]);
        }
        points
    }
}

/// A flattened path. Coordinates follow the canvas convention: y grows
/// downwards and positive angles sweep clockwise on screen.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Shape {
    subpaths: Vec<SubPath>,
}

impl Shape {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn polyline(points: &[Point2]) -> Self {
        let mut shape = Self::new();
        if let Some((first, rest)) = points.split_first() {
            shape.move_to(*first);
            for p in rest {
                shape.line_to(*p);
            }
        }
        shape
    }

    pub fn rect(origin: Point2, size: Vec2) -> Self {
        let mut shape = Self::new();
        shape.move_to(origin);
        shape.line_to(pt2(origin.x + size.x, origin.y));
        shape.line_to(origin + size);
        shape.line_to(pt2(origin.x, origin.y + size.y));
        shape.close();
        shape
    }

    pub fn subpaths(&self) -> &[SubPath] {
        &self.subpaths
    }

    pub fn move_to(&mut self, p: Point2) {
        self.subpaths.push(SubPath {
            points: vec![p],
            closed: false,
        });
    }

    pub fn line_to(&mut self, p: Point2) {
        match self.open_subpath() {
            Some(sub) => sub.points.push(p),
            None => self.move_to(p),
        }
    }

    /// Quadratic curve from the current point. Without a current point the
    /// control point becomes the start, as a canvas does.
    pub fn quadratic_to(&mut self, ctrl: Point2, end: Point2) {
        let Some(start) = self.current_point() else {
            self.move_to(ctrl);
            self.line_to(end);
            return;
        };
        for i in 1..=QUADRATIC_RESOLUTION {
            let t = i as f32 / QUADRATIC_RESOLUTION as f32;
            self.line_to(quadratic_point(start, ctrl, end, t));
        }
    }

    /// Clockwise arc from `start` to `end` (radians). A line joins the
    /// current point to the arc's first point.
    pub fn arc(&mut self, center: Point2, radius: f32, start: f32, end: f32) {
        let sweep = clockwise_sweep(start, end);
        let steps = arc_steps(sweep);
        for i in 0..=steps {
            let angle = start + sweep * i as f32 / steps as f32;
            self.line_to(center + vec2(angle.cos(), angle.sin()) * radius);
        }
    }

    /// A full, closed ellipse as its own subpath, starting at angle 0.
    pub fn ellipse(&mut self, center: Point2, radius_x: f32, radius_y: f32) {
        let points = (0..ARC_RESOLUTION)
            .map(|i| {
                let angle = 2.0 * PI * i as f32 / ARC_RESOLUTION as f32;
                center + vec2(angle.cos() * radius_x, angle.sin() * radius_y)
            })
            .collect();
        self.subpaths.push(SubPath {
            points,
            closed: true,
        });
    }

    pub fn close(&mut self) {
        if let Some(sub) = self.open_subpath() {
            sub.closed = true;
        }
    }

    fn current_point(&self) -> Option<Point2> {
        self.subpaths
            .last()
            .filter(|s| !s.closed)
            .and_then(|s| s.points.last().copied())
    }

    fn open_subpath(&mut self) -> Option<&mut SubPath> {
        self.subpaths.last_mut().filter(|s| !s.closed)
    }
}

pub fn quadratic_point(p0: Point2, p1: Point2, p2: Point2, t: f32) -> Point2 {
    let inv = 1.0 - t;
    p0 * (inv * inv) + p1 * (2.0 * inv * t) + p2 * (t * t)
}

// Canvas rule: a clockwise sweep covers (end - start) wrapped into [0, 2pi),
// or the whole circle when the request already spans a full turn.
fn clockwise_sweep(start: f32, end: f32) -> f32 {
    let raw = end - start;
    if raw >= 2.0 * PI {
        2.0 * PI
    } else {
        raw.rem_euclid(2.0 * PI)
    }
}

fn arc_steps(sweep: f32) -> usize {
    ((sweep.abs() / (2.0 * PI)) * ARC_RESOLUTION as f32).ceil().max(1.0) as usize
}

/// Splits a polyline into the runs that a `[on, off]` dash pattern keeps.
/// `offset` shifts the pattern start along the line, so an offset equal to
/// `on` yields exactly the gaps of the unshifted pattern.
pub fn dash_polyline(points: &[Point2], on: f32, off: f32, offset: f32) -> Vec<Vec<Point2>> {
    if points.len() < 2 {
        return Vec::new();
    }
    if on <= 0.0 || off <= 0.0 {
        return vec![points.to_vec()];
    }

    let period = on + off;
    let phase = offset.rem_euclid(period);
    let mut in_dash = phase < on;
    let mut left = if in_dash { on - phase } else { period - phase };

    let mut runs = Vec::new();
    let mut current = if in_dash { vec![points[0]] } else { Vec::new() };

    for pair in points.windows(2) {
        let mut a = pair[0];
        let b = pair[1];
        let mut remaining = a.distance(b);

        while remaining > 0.0 {
            if left >= remaining {
                left -= remaining;
                remaining = 0.0;
                if in_dash {
                    current.push(b);
                }
            } else {
                let split = a + (b - a) * (left / remaining);
                remaining -= left;
                a = split;
                if in_dash {
                    current.push(split);
                    if current.len() >= 2 {
                        runs.push(std::mem::take(&mut current));
                    }
                    current.clear();
                    left = off;
                } else {
                    current = vec![split];
                    left = on;
                }
                in_dash = !in_dash;
            }
        }
    }

    if in_dash && current.len() >= 2 {
        runs.push(current);
    }
    runs
}
