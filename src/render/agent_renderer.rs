// src/render/agent_renderer.rs
// Feed agents as dots with a heading tick, over the track template.

use nannou::prelude::*;

use crate::draw::{color, StrokeStyle, Shape, Surface};
use crate::models::geometry::rotate_vec;
use crate::models::AgentSnapshot;

const AGENT_RADIUS: f32 = 6.0;
const HEADING_LENGTH: f32 = 14.0;
const HEADING_WIDTH: f32 = 2.0;
const RUNNING: u32 = 0x33c3ff;
const STOPPED: u32 = 0x9a9a9a;
const HEADING: u32 = 0xffffff;

/// Agent positions are track-local. `direction` is in degrees, clockwise
/// from +x on screen.
pub fn render_agents<S: Surface>(surface: &mut S, agents: &AgentSnapshot) {
    if agents.is_empty() {
        return;
    }
    surface.save();
    surface.translate(surface.width() / 2.0, surface.height() / 2.0);

    for agent in agents.values() {
        let center = agent.position();
        let fill = if agent.state == "running" { RUNNING } else { STOPPED };
        surface.fill_circle(center, AGENT_RADIUS, color(fill));

        let tip = center + rotate_vec(vec2(HEADING_LENGTH, 0.0), agent.direction.to_radians());
        surface.stroke(
            &Shape::polyline(&[center, tip]),
            &StrokeStyle::solid(color(HEADING), HEADING_WIDTH),
        );
    }

    surface.restore();
}
