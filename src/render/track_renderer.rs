// src/render/track_renderer.rs
// Paints the parametric track templates in a canvas-centered frame.

use nannou::prelude::*;

use std::f32::consts::PI;

use crate::draw::{color, Shape, StrokeStyle, Surface};
use crate::models::TrackShape;

pub const BACKGROUND: u32 = 0x1a1a1a;
const OUTER_EDGE: u32 = 0x4a4a4a;
const SURFACE: u32 = 0x2d2d2d;
const CENTERLINE: u32 = 0xffd700;
const WHITE: u32 = 0xffffff;
const BLACK: u32 = 0x000000;

// the inner surface pass is this much narrower than the edge pass
const EDGE_INSET: f32 = 8.0;
const CENTERLINE_WIDTH: f32 = 2.0;
const CENTERLINE_DASH: (f32, f32) = (20.0, 15.0);

// start/finish marker, measured in from the track's right extreme
const MARKER_INSET: f32 = 50.0;
const MARKER_HALF_SPAN: f32 = 45.0;
const MARKER_WIDTH: f32 = 5.0;
const CHECKER_CELLS: usize = 6;
const CHECKER_CELL: (f32, f32) = (16.0, 15.0);
const CIRCUIT_MARKER_HALF: f32 = 20.0;

/// Draws `shape` centered on the surface. The caller's transform is restored
/// before returning.
pub fn render_track<S: Surface>(surface: &mut S, shape: &TrackShape) {
    let (w, h) = (surface.width(), surface.height());

    surface.save();
    surface.translate(w / 2.0, h / 2.0);

    surface.fill_rect(pt2(-w / 2.0, -h / 2.0), vec2(w, h), color(BACKGROUND));

    match shape {
        TrackShape::Oval {
            radius_x,
            radius_y,
            track_width,
        } => {
            let outline = oval_outline(*radius_x, *radius_y);
            draw_passes(surface, &outline, *track_width);
            draw_start_marker(surface, radius_x - MARKER_INSET);
        }
        TrackShape::Stadium {
            straight_length,
            radius,
            track_width,
        } => {
            let half_length = straight_length / 2.0;
            let outline = stadium_outline(half_length, *radius);
            draw_passes(surface, &outline, *track_width);
            draw_start_marker(surface, half_length - MARKER_INSET);
        }
        TrackShape::Circuit {
            waypoints,
            track_width,
        } => {
            let outline = circuit_outline(waypoints);
            draw_passes(surface, &outline, *track_width);

            let start = waypoints[0];
            let mut line = Shape::new();
            line.move_to(pt2(start.x - CIRCUIT_MARKER_HALF, start.y));
            line.line_to(pt2(start.x + CIRCUIT_MARKER_HALF, start.y));
            surface.stroke(&line, &StrokeStyle::solid(color(WHITE), MARKER_WIDTH));
        }
    }

    surface.restore();
}

// Edge, surface and centerline all follow the same outline so the three
// passes stay concentric.
fn draw_passes<S: Surface>(surface: &mut S, outline: &Shape, track_width: f32) {
    surface.stroke(outline, &StrokeStyle::solid(color(OUTER_EDGE), track_width).rounded());
    surface.stroke(
        outline,
        &StrokeStyle::solid(color(SURFACE), (track_width - EDGE_INSET).max(0.0)).rounded(),
    );
    surface.stroke(
        outline,
        &StrokeStyle::solid(color(CENTERLINE), CENTERLINE_WIDTH).dashed(
            CENTERLINE_DASH.0,
            CENTERLINE_DASH.1,
            0.0,
        ),
    );
}

fn draw_start_marker<S: Surface>(surface: &mut S, start_x: f32) {
    let mut line = Shape::new();
    line.move_to(pt2(start_x, -MARKER_HALF_SPAN));
    line.line_to(pt2(start_x, MARKER_HALF_SPAN));
    surface.stroke(&line, &StrokeStyle::solid(color(WHITE), MARKER_WIDTH));

    let (cell_w, cell_h) = CHECKER_CELL;
    for i in 0..CHECKER_CELLS {
        let fill = if i % 2 == 0 { WHITE } else { BLACK };
        surface.fill_rect(
            pt2(start_x - cell_w / 2.0, -MARKER_HALF_SPAN + i as f32 * cell_h),
            vec2(cell_w, cell_h),
            color(fill),
        );
    }
}

pub fn oval_outline(radius_x: f32, radius_y: f32) -> Shape {
    let mut shape = Shape::new();
    shape.ellipse(pt2(0.0, 0.0), radius_x, radius_y);
    shape
}

/// Two semicircles at +-`half_length` joined by tangent straights.
pub fn stadium_outline(half_length: f32, radius: f32) -> Shape {
    let mut shape = Shape::new();
    shape.arc(pt2(half_length, 0.0), radius, -PI / 2.0, PI / 2.0);
    shape.line_to(pt2(-half_length, radius));
    shape.arc(pt2(-half_length, 0.0), radius, PI / 2.0, -PI / 2.0);
    shape.line_to(pt2(half_length, -radius));
    shape.close();
    shape
}

/// Closed loop of quadratic curves: each one bends toward the next waypoint
/// and ends halfway to the waypoint after it. Starting at the first midpoint
/// makes the loop end exactly where it began.
pub fn circuit_outline(waypoints: &[Point2]) -> Shape {
    let mut shape = Shape::new();
    let n = waypoints.len();
    if n < 3 {
        return Shape::polyline(waypoints);
    }

    shape.move_to((waypoints[0] + waypoints[1]) / 2.0);
    for i in 0..n {
        let next = waypoints[(i + 1) % n];
        let after = waypoints[(i + 2) % n];
        shape.quadratic_to(next, (next + after) / 2.0);
    }
    shape.close();
    shape
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::recording::{Op, RecordingSurface};
    use crate::models::geometry::Transform2D;
    use crate::models::TrackKind;

    fn render(kind: TrackKind) -> RecordingSurface {
        let mut surface = RecordingSurface::new(800.0, 600.0);
        render_track(&mut surface, &TrackShape::preset(kind));
        surface
    }

    #[test]
    fn test_transform_restored() {
        for kind in [TrackKind::Oval, TrackKind::Stadium, TrackKind::Circuit] {
            let surface = render(kind);
            assert_eq!(surface.stack_depth(), 0);
            assert_eq!(surface.current_transform(), Transform2D::default());
        }
    }

    #[test]
    fn test_background_covers_canvas_from_center() {
        let surface = render(TrackKind::Circuit);
        match &surface.ops[0] {
            Op::FillRect {
                origin,
                size,
                transform,
                ..
            } => {
                assert_eq!(*origin, pt2(-400.0, -300.0));
                assert_eq!(*size, vec2(800.0, 600.0));
                assert_eq!(transform.translation, vec2(400.0, 300.0));
            }
            other => panic!("expected background fill, got {:?}", other),
        }
    }

    #[test]
    fn test_three_concentric_passes() {
        let surface = render(TrackKind::Stadium);
        let strokes = surface.strokes();
        // edge, surface, centerline, start line
        assert_eq!(strokes.len(), 4);
        assert_eq!(strokes[0].0, strokes[1].0);
        assert_eq!(strokes[1].0, strokes[2].0);
        assert_eq!(strokes[0].1.width, 80.0);
        assert_eq!(strokes[1].1.width, 72.0);
        assert_eq!(strokes[2].1.width, 2.0);
        assert!(strokes[2].1.dash.is_some());
        assert!(strokes[0].1.dash.is_none());
    }

    #[test]
    fn test_checker_strip_only_on_oval_and_stadium() {
        let count_cells = |surface: &RecordingSurface| {
            surface
                .ops
                .iter()
                .filter(|op| matches!(op, Op::FillRect { size, .. } if *size == vec2(16.0, 15.0)))
                .count()
        };
        assert_eq!(count_cells(&render(TrackKind::Oval)), 6);
        assert_eq!(count_cells(&render(TrackKind::Stadium)), 6);
        assert_eq!(count_cells(&render(TrackKind::Circuit)), 0);
    }

    #[test]
    fn test_stadium_outline_extents() {
        let outline = stadium_outline(200.0, 100.0);
        let points = &outline.subpaths()[0].points;
        let max_x = points.iter().map(|p| p.x).fold(f32::MIN, f32::max);
        let min_x = points.iter().map(|p| p.x).fold(f32::MAX, f32::min);
        let max_y = points.iter().map(|p| p.y).fold(f32::MIN, f32::max);
        assert!((max_x - 300.0).abs() < 1e-3);
        assert!((min_x + 300.0).abs() < 1e-3);
        assert!((max_y - 100.0).abs() < 1e-3);
        assert!(outline.subpaths()[0].closed);
    }

    #[test]
    fn test_circuit_outline_closes_smoothly() {
        let shape = TrackShape::preset(TrackKind::Circuit);
        let TrackShape::Circuit { waypoints, .. } = shape else {
            panic!("preset returned the wrong variant");
        };
        let outline = circuit_outline(&waypoints);
        let points = &outline.subpaths()[0].points;
        let first = points[0];
        let last = *points.last().unwrap();
        assert!((first - last).length() < 1e-3);
        assert_eq!(first, (waypoints[0] + waypoints[1]) / 2.0);
    }
}
