// src/draw/nannou_surface.rs
// Surface backed by a nannou Draw. Canvas coordinates are pushed through the
// transform stack, then the viewport, then flipped into nannou window space
// (origin at the window center, y-up).

use nannou::prelude::*;

use super::path_draw::dash_polyline;
use super::{LineCap, Shape, StrokeStyle, Surface};
use crate::models::geometry::{TransformStack, Viewport};

pub struct NannouSurface<'a> {
    draw: &'a Draw,
    window_size: Vec2,
    viewport: Viewport,
    stack: TransformStack,
    // color used to wash images drawn at partial opacity
    matte: Rgba,
}

impl<'a> NannouSurface<'a> {
    pub fn new(draw: &'a Draw, window_size: Vec2, viewport: Viewport, matte: Rgba) -> Self {
        Self {
            draw,
            window_size,
            viewport,
            stack: TransformStack::default(),
            matte,
        }
    }

    fn to_window(&self, canvas: Point2) -> Point2 {
        let transformed = self.stack.current().apply_to_point(canvas);
        Viewport::page_to_window(self.window_size, self.viewport.canvas_to_page(transformed))
    }

    fn scaled(&self, length: f32) -> f32 {
        length * self.stack.current().scale
    }

    fn polyline(&self, points: &[Point2], style: &StrokeStyle) {
        if points.len() < 2 {
            return;
        }
        let window_points: Vec<Point2> = points.iter().map(|p| self.to_window(*p)).collect();

        let line = self.draw.polyline().weight(self.scaled(style.width));
        let line = match style.cap {
            LineCap::Round => line.caps_round(),
            LineCap::Butt => line.caps_butt(),
        };
        let line = if style.round_join {
            line.join_round()
        } else {
            line.join_miter()
        };
        let color = style.color;
        line.points_colored(window_points.into_iter().map(|p| (p, color)));
    }

    fn polygon(&self, corners: [Point2; 4], color: Rgba) {
        let window_points = corners.map(|p| (self.to_window(p), color));
        self.draw.polygon().points_colored(window_points);
    }
}

impl Surface for NannouSurface<'_> {
    type Image = wgpu::Texture;

    fn width(&self) -> f32 {
        self.viewport.width
    }

    fn height(&self) -> f32 {
        self.viewport.height
    }

    fn save(&mut self) {
        self.stack.save();
    }

    fn restore(&mut self) {
        self.stack.restore();
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        self.stack.translate(dx, dy);
    }

    fn rotate(&mut self, radians: f32) {
        self.stack.rotate(radians);
    }

    fn fill_rect(&mut self, origin: Point2, size: Vec2, color: Rgba) {
        let corners = [
            origin,
            pt2(origin.x + size.x, origin.y),
            origin + size,
            pt2(origin.x, origin.y + size.y),
        ];
        self.polygon(corners, color);
    }

    fn fill_circle(&mut self, center: Point2, radius: f32, color: Rgba) {
        let c = self.to_window(center);
        self.draw
            .ellipse()
            .x_y(c.x, c.y)
            .radius(self.scaled(radius))
            .color(color);
    }

    fn stroke(&mut self, shape: &Shape, style: &StrokeStyle) {
        for sub in shape.subpaths() {
            let points = sub.stroke_points();
            match style.dash {
                Some(dash) => {
                    for run in dash_polyline(&points, dash.on, dash.off, dash.offset) {
                        self.polyline(&run, style);
                    }
                }
                None => self.polyline(&points, style),
            }
        }
    }

    // Images are placed axis-aligned; rotation in the stack is ignored.
    fn draw_image(&mut self, image: &wgpu::Texture, origin: Point2, size: Vec2, alpha: f32) {
        let center = self.to_window(origin + size / 2.0);
        let w = self.scaled(size.x);
        let h = self.scaled(size.y);
        self.draw.texture(image).x_y(center.x, center.y).w_h(w, h);

        let wash = 1.0 - alpha.clamp(0.0, 1.0);
        if wash > 0.0 {
            let mut matte = self.matte;
            matte.alpha = wash;
            self.draw
                .rect()
                .x_y(center.x, center.y)
                .w_h(w, h)
                .color(matte);
        }
    }
}
