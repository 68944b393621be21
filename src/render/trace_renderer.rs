// src/render/trace_renderer.rs
// Trace mode: the reference backdrop, the paths being traced, and the
// finished curb + asphalt track. Everything here is in canvas space.

use nannou::prelude::*;

use crate::config::TraceStyle;
use crate::draw::{color, color_alpha, parse_hex_color, Shape, StrokeStyle, Surface};
use crate::models::{TracePhase, TraceSession};
use crate::utilities::spline::Smoothing;

pub const BACKDROP_FALLBACK: u32 = 0x0b0b0b;
const BACKDROP_ALPHA: f32 = 0.55;

const PATH_WIDTH: f32 = 2.0;
const PATH_ALPHA: f32 = 0.95;
const DOT_RADIUS: f32 = 3.0;
const ACTIVE_DOT_RADIUS: f32 = 4.0;
const ACTIVE_DOT: u32 = 0xffff00;
const PREVIEW_WIDTH: f32 = 1.0;
const PREVIEW_ALPHA: f32 = 0.45;
const PREVIEW_DASH: (f32, f32) = (6.0, 4.0);

/// Reference image with its pixel size.
pub struct Backdrop<'a, I> {
    pub image: &'a I,
    pub size: Vec2,
}

/// Resolved colors and widths for the curb and asphalt strokes.
#[derive(Debug, Clone, PartialEq)]
pub struct CurbStyle {
    pub asphalt: Rgba,
    pub asphalt_width: f32,
    pub curb_width: f32,
    pub curb_primary: Rgba,
    pub curb_secondary: Rgba,
    pub dash: f32,
    pub gap: f32,
}

impl Default for CurbStyle {
    fn default() -> Self {
        Self::from_config(&TraceStyle::default())
    }
}

impl CurbStyle {
    /// Bad color strings fall back to the built-in colors with a warning.
    pub fn from_config(style: &TraceStyle) -> Self {
        let defaults = TraceStyle::default();
        let resolve = |text: &str, fallback: &str| {
            parse_hex_color(text).unwrap_or_else(|| {
                log::warn!("Invalid color {:?} in [trace.style], using {}", text, fallback);
                parse_hex_color(fallback).unwrap_or(rgba(1.0, 1.0, 1.0, 1.0))
            })
        };
        Self {
            asphalt: resolve(&style.asphalt_color, &defaults.asphalt_color),
            asphalt_width: style.asphalt_width,
            curb_width: style.curb_width,
            curb_primary: resolve(&style.curb_primary, &defaults.curb_primary),
            curb_secondary: resolve(&style.curb_secondary, &defaults.curb_secondary),
            dash: style.dash,
            gap: style.gap,
        }
    }

    /// Primary curb, secondary curb shifted by one dash so it fills the
    /// gaps, then the solid asphalt on top.
    pub fn passes(&self) -> [StrokeStyle; 3] {
        [
            StrokeStyle::solid(self.curb_primary, self.curb_width)
                .dashed(self.dash, self.gap, 0.0)
                .rounded(),
            StrokeStyle::solid(self.curb_secondary, self.curb_width)
                .dashed(self.dash, self.gap, self.dash)
                .rounded(),
            StrokeStyle::solid(self.asphalt, self.asphalt_width).rounded(),
        ]
    }
}

/// Largest size with the image's aspect ratio that fits the canvas, centered.
pub fn contain_fit(image_size: Vec2, canvas_size: Vec2) -> (Point2, Vec2) {
    if image_size.x <= 0.0 || image_size.y <= 0.0 {
        return (pt2(0.0, 0.0), canvas_size);
    }
    let scale = (canvas_size.x / image_size.x).min(canvas_size.y / image_size.y);
    let size = image_size * scale;
    ((canvas_size - size) / 2.0, size)
}

pub fn render_backdrop<S: Surface>(surface: &mut S, backdrop: Option<Backdrop<'_, S::Image>>) {
    let canvas = vec2(surface.width(), surface.height());
    match backdrop {
        Some(backdrop) => {
            let (origin, size) = contain_fit(backdrop.size, canvas);
            surface.draw_image(backdrop.image, origin, size, BACKDROP_ALPHA);
        }
        None => surface.fill_rect(pt2(0.0, 0.0), canvas, color(BACKDROP_FALLBACK)),
    }
}

/// Paints the session for its current phase. `pointer` is the canvas-space
/// cursor, used for the preview segment while drawing.
pub fn render_trace<S: Surface>(
    surface: &mut S,
    session: &TraceSession,
    pointer: Option<Point2>,
    backdrop: Option<Backdrop<'_, S::Image>>,
    style: &CurbStyle,
    smoothing: Smoothing,
) {
    render_backdrop(surface, backdrop);
    match session.phase() {
        TracePhase::Drawing => render_drawing(surface, session, pointer),
        TracePhase::Finished => {
            for path in session.drawable_paths() {
                render_curbed_path(surface, &smoothing.apply(path), style);
            }
        }
    }
}

fn render_drawing<S: Surface>(surface: &mut S, session: &TraceSession, pointer: Option<Point2>) {
    let line = StrokeStyle::solid(color_alpha(0xffffff, PATH_ALPHA), PATH_WIDTH);

    for (index, path) in session.paths().iter().enumerate() {
        if path.is_empty() {
            continue;
        }
        surface.stroke(&Shape::polyline(path), &line);

        let active = index == session.active_index();
        let (dot, radius) = if active {
            (color(ACTIVE_DOT), ACTIVE_DOT_RADIUS)
        } else {
            (color(0xffffff), DOT_RADIUS)
        };
        for p in path {
            surface.fill_circle(*p, radius, dot);
        }
    }

    if let (Some(pointer), Some(last)) = (pointer, session.active_path().last()) {
        let preview = StrokeStyle::solid(color_alpha(0xffffff, PREVIEW_ALPHA), PREVIEW_WIDTH)
            .dashed(PREVIEW_DASH.0, PREVIEW_DASH.1, 0.0);
        surface.stroke(&Shape::polyline(&[*last, pointer]), &preview);
    }
}

/// Three strokes along one smoothed path. Paths under two points draw nothing.
pub fn render_curbed_path<S: Surface>(surface: &mut S, points: &[Point2], style: &CurbStyle) {
    if points.len() < 2 {
        return;
    }
    let shape = Shape::polyline(points);
    surface.save();
    for pass in style.passes() {
        surface.stroke(&shape, &pass);
    }
    surface.restore();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::recording::{Op, RecordingSurface};
    use approx::assert_relative_eq;

    fn traced() -> TraceSession {
        let mut session = TraceSession::new();
        session.click(pt2(10.0, 10.0));
        session.click(pt2(50.0, 10.0));
        session.start_new_path();
        session.click(pt2(200.0, 200.0));
        session
    }

    #[test]
    fn test_contain_fit_centers_wide_image() {
        let (origin, size) = contain_fit(vec2(2000.0, 500.0), vec2(1000.0, 600.0));
        assert_relative_eq!(size.x, 1000.0);
        assert_relative_eq!(size.y, 250.0);
        assert_relative_eq!(origin.x, 0.0);
        assert_relative_eq!(origin.y, 175.0);
    }

    #[test]
    fn test_backdrop_fallback_and_image() {
        let mut surface = RecordingSurface::new(1000.0, 600.0);
        render_backdrop(&mut surface, None);
        assert!(matches!(
            surface.ops[0],
            Op::FillRect { color, .. } if color == crate::draw::color(BACKDROP_FALLBACK)
        ));

        let mut surface = RecordingSurface::new(1000.0, 600.0);
        render_backdrop(
            &mut surface,
            Some(Backdrop {
                image: &(),
                size: vec2(500.0, 600.0),
            }),
        );
        match surface.ops[0] {
            Op::Image { origin, size, alpha } => {
                assert_relative_eq!(alpha, 0.55);
                assert_relative_eq!(origin.x, 250.0);
                assert_relative_eq!(size.y, 600.0);
            }
            ref other => panic!("expected image, got {:?}", other),
        }
    }

    #[test]
    fn test_drawing_mode_marks_active_path() {
        let mut surface = RecordingSurface::new(1000.0, 600.0);
        let session = traced();
        render_trace(
            &mut surface,
            &session,
            Some(pt2(300.0, 300.0)),
            None,
            &CurbStyle::default(),
            Smoothing::default(),
        );

        let dots: Vec<_> = surface
            .ops
            .iter()
            .filter_map(|op| match op {
                Op::FillCircle { center, radius, .. } => Some((*center, *radius)),
                _ => None,
            })
            .collect();
        assert_eq!(dots.len(), 3);
        assert_eq!(dots[0].1, DOT_RADIUS);
        assert_eq!(dots[2], (pt2(200.0, 200.0), ACTIVE_DOT_RADIUS));

        // two path polylines plus the preview
        let strokes = surface.strokes();
        assert_eq!(strokes.len(), 3);
        let preview = strokes[2].0.subpaths()[0].points.clone();
        assert_eq!(preview, vec![pt2(200.0, 200.0), pt2(300.0, 300.0)]);
    }

    #[test]
    fn test_no_preview_without_points() {
        let mut surface = RecordingSurface::new(1000.0, 600.0);
        render_trace(
            &mut surface,
            &TraceSession::new(),
            Some(pt2(1.0, 1.0)),
            None,
            &CurbStyle::default(),
            Smoothing::default(),
        );
        assert!(surface.strokes().is_empty());
    }

    #[test]
    fn test_finished_mode_draws_curbs_for_long_paths() {
        let mut session = traced();
        session.finish().unwrap();

        let mut surface = RecordingSurface::new(1000.0, 600.0);
        let style = CurbStyle::default();
        render_trace(&mut surface, &session, None, None, &style, Smoothing::new(0.5, 4));

        let strokes = surface.strokes();
        // only the two-point path qualifies
        assert_eq!(strokes.len(), 3);
        assert_eq!(strokes[0].0.subpaths()[0].points.len(), 5);
        assert_eq!(strokes[0].1.width, 60.0);
        assert_eq!(strokes[1].1.dash.map(|d| d.offset), Some(24.0));
        assert_eq!(strokes[2].1.width, 36.0);
        assert!(strokes[2].1.dash.is_none());
        assert!(strokes.iter().all(|s| s.1.round_join));
        assert_eq!(surface.stack_depth(), 0);
    }

    #[test]
    fn test_bad_style_color_falls_back() {
        let style = TraceStyle {
            curb_primary: "crimson".to_string(),
            ..TraceStyle::default()
        };
        let resolved = CurbStyle::from_config(&style);
        assert_eq!(resolved.curb_primary, color(0xff0000));
    }
}
