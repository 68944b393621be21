// src/models/geometry.rs
// Transforms and coordinate spaces shared by hit-testing, rendering and input.
//
// Spaces, all y-down:
//   page        - window pixels, origin at the window's top-left
//   canvas      - page minus the canvas offset (toolbar strip above it)
//   track-local - canvas minus half the canvas size, origin at the track center

use nannou::prelude::*;

/// Similarity transform: scale, then rotate (radians), then translate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform2D {
    pub translation: Vec2,
    pub scale: f32,
    pub rotation: f32,
}

impl Default for Transform2D {
    fn default() -> Self {
        Self {
            translation: Vec2::ZERO,
            scale: 1.0,
            rotation: 0.0,
        }
    }
}

impl Transform2D {
    pub fn translate(dx: f32, dy: f32) -> Self {
        Self {
            translation: vec2(dx, dy),
            ..Self::default()
        }
    }

    pub fn rotate(radians: f32) -> Self {
        Self {
            rotation: radians,
            ..Self::default()
        }
    }

    /// Returns the transform that applies `inner` first and `self` second.
    pub fn then(&self, inner: &Transform2D) -> Transform2D {
        Transform2D {
            translation: self.apply_to_point(inner.translation),
            scale: self.scale * inner.scale,
            rotation: self.rotation + inner.rotation,
        }
    }

    pub fn apply_to_point(&self, point: Point2) -> Point2 {
        self.apply_to_vector(point) + self.translation
    }

    pub fn apply_to_vector(&self, v: Vec2) -> Vec2 {
        rotate_vec(v * self.scale, self.rotation)
    }
}

/// Rotates `v` by `radians`; positive angles turn clockwise on a y-down screen.
pub fn rotate_vec(v: Vec2, radians: f32) -> Vec2 {
    let (sin, cos) = radians.sin_cos();
    vec2(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Canvas-style save/restore stack of transforms.
#[derive(Debug, Clone, Default)]
pub struct TransformStack {
    current: Transform2D,
    saved: Vec<Transform2D>,
}

impl TransformStack {
    pub fn current(&self) -> &Transform2D {
        &self.current
    }

    pub fn save(&mut self) {
        self.saved.push(self.current);
    }

    // unbalanced restores are ignored, like a canvas context
    pub fn restore(&mut self) {
        if let Some(previous) = self.saved.pop() {
            self.current = previous;
        }
    }

    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.current = self.current.then(&Transform2D::translate(dx, dy));
    }

    pub fn rotate(&mut self, radians: f32) {
        self.current = self.current.then(&Transform2D::rotate(radians));
    }

    pub fn depth(&self) -> usize {
        self.saved.len()
    }
}

/// The canvas as placed in the window. Owns every conversion between pointer
/// space and the spaces the models work in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub offset: Vec2,
}

impl Viewport {
    pub fn new(width: f32, height: f32, offset: Vec2) -> Self {
        Self {
            width,
            height,
            offset,
        }
    }

    /// The same canvas on a target of its own size, as when rendered offscreen.
    pub fn detached(&self) -> Viewport {
        Viewport::new(self.width, self.height, Vec2::ZERO)
    }

    pub fn half_size(&self) -> Vec2 {
        vec2(self.width / 2.0, self.height / 2.0)
    }

    pub fn page_to_canvas(&self, page: Point2) -> Point2 {
        page - self.offset
    }

    pub fn canvas_to_page(&self, canvas: Point2) -> Point2 {
        canvas + self.offset
    }

    pub fn page_to_track(&self, page: Point2) -> Point2 {
        self.page_to_canvas(page) - self.half_size()
    }

    pub fn track_to_page(&self, local: Point2) -> Point2 {
        self.canvas_to_page(local + self.half_size())
    }

    pub fn contains_page(&self, page: Point2) -> bool {
        let p = self.page_to_canvas(page);
        p.x >= 0.0 && p.y >= 0.0 && p.x <= self.width && p.y <= self.height
    }

    /// Window coordinates (nannou: origin at the window center, y-up) to page pixels.
    pub fn window_to_page(window_size: Vec2, window: Point2) -> Point2 {
        pt2(window.x + window_size.x / 2.0, window_size.y / 2.0 - window.y)
    }

    pub fn page_to_window(window_size: Vec2, page: Point2) -> Point2 {
        pt2(page.x - window_size.x / 2.0, window_size.y / 2.0 - page.y)
    }
}
