// src/render/obstacle_renderer.rs
// Striped barriers in track-local space, with the selection outline.

use nannou::prelude::*;

use crate::draw::{color, StrokeStyle, Surface};
use crate::models::{Obstacle, ObstacleId, ObstacleSet};

const STRIPES: usize = 8;
const STRIPE_BAND: f32 = 10.0;
const STRIPE_PRIMARY: u32 = 0xff0000;
const STRIPE_SECONDARY: u32 = 0xffffff;
const BORDER: u32 = 0x000000;
const BORDER_WIDTH: f32 = 2.0;

const SELECTION: u32 = 0x00ff00;
const SELECTION_PAD: f32 = 10.0;
const SELECTION_HEIGHT: f32 = 20.0;
const SELECTION_WIDTH: f32 = 2.0;
const SELECTION_DASH: (f32, f32) = (5.0, 5.0);

/// Draws every obstacle in insertion order, so later ones land on top.
/// Obstacle positions are track-local; the canvas center is the origin.
pub fn render_obstacles<S: Surface>(
    surface: &mut S,
    obstacles: &ObstacleSet,
    selected: Option<ObstacleId>,
) {
    let center = vec2(surface.width() / 2.0, surface.height() / 2.0);
    surface.save();
    surface.translate(center.x, center.y);
    for obstacle in obstacles.iter() {
        render_barrier(surface, obstacle, selected == Some(obstacle.id));
    }
    surface.restore();
}

/// One barrier in the current frame. Also used for the toolbar's ghost.
pub fn render_barrier<S: Surface>(surface: &mut S, obstacle: &Obstacle, selected: bool) {
    surface.save();
    surface.translate(obstacle.position.x, obstacle.position.y);
    surface.rotate(obstacle.angle);

    let length = obstacle.length;
    if selected {
        let outline = StrokeStyle::solid(color(SELECTION), SELECTION_WIDTH).dashed(
            SELECTION_DASH.0,
            SELECTION_DASH.1,
            0.0,
        );
        let size = vec2(length + SELECTION_PAD, SELECTION_HEIGHT);
        surface.stroke_rect(pt2(-size.x / 2.0, -size.y / 2.0), size, &outline);
    }

    let stripe = length / STRIPES as f32;
    let top = -STRIPE_BAND / 2.0;
    for i in 0..STRIPES {
        let fill = if i % 2 == 0 { STRIPE_PRIMARY } else { STRIPE_SECONDARY };
        surface.fill_rect(
            pt2(-length / 2.0 + i as f32 * stripe, top),
            vec2(stripe, STRIPE_BAND),
            color(fill),
        );
    }
    surface.stroke_rect(
        pt2(-length / 2.0, top),
        vec2(length, STRIPE_BAND),
        &StrokeStyle::solid(color(BORDER), BORDER_WIDTH),
    );

    surface.restore();
}
