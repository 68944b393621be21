// src/draw/recording.rs
// Test double that records every draw call with its resolved transform.

use nannou::prelude::*;

use super::{Shape, StrokeStyle, Surface};
use crate::models::geometry::{Transform2D, TransformStack};

#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    FillRect {
        origin: Point2,
        size: Vec2,
        color: Rgba,
        transform: Transform2D,
    },
    FillCircle {
        center: Point2,
        radius: f32,
        color: Rgba,
        transform: Transform2D,
    },
    Stroke {
        shape: Shape,
        style: StrokeStyle,
        transform: Transform2D,
    },
    Image {
        origin: Point2,
        size: Vec2,
        alpha: f32,
    },
}

pub struct RecordingSurface {
    pub width: f32,
    pub height: f32,
    pub ops: Vec<Op>,
    stack: TransformStack,
}

impl RecordingSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
            stack: TransformStack::default(),
        }
    }

    pub fn strokes(&self) -> Vec<(&Shape, &StrokeStyle, &Transform2D)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Stroke {
                    shape,
                    style,
                    transform,
                } => Some((shape, style, transform)),
                _ => None,
            })
            .collect()
    }

    pub fn stack_depth(&self) -> usize {
        self.stack.depth()
    }

    pub fn current_transform(&self) -> Transform2D {
        *self.stack.current()
    }
}

impl Surface for RecordingSurface {
    type Image = ();

    fn width(&self) -> f32 {
        self.width
    }

    fn height(&self) -> f32 {
        self.height
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
        self.ops.push(Op::FillRect {
            origin,
            size,
            color,
            transform: *self.stack.current(),
        });
    }

    fn fill_circle(&mut self, center: Point2, radius: f32, color: Rgba) {
        self.ops.push(Op::FillCircle {
            center,
            radius,
            color,
            transform: *self.stack.current(),
        });
    }

    fn stroke(&mut self, shape: &Shape, style: &StrokeStyle) {
        self.ops.push(Op::Stroke {
            shape: shape.clone(),
            style: style.clone(),
            transform: *self.stack.current(),
        });
    }

    fn draw_image(&mut self, _image: &(), origin: Point2, size: Vec2, alpha: f32) {
        self.ops.push(Op::Image {
            origin,
            size,
            alpha,
        });
    }
}
