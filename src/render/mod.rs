// src/render/mod.rs
// Renderers paint models onto any Surface. They never keep state between
// frames; the caller passes in whatever snapshot it holds.

pub mod agent_renderer;
pub mod obstacle_renderer;
pub mod trace_renderer;
pub mod track_renderer;

pub use agent_renderer::render_agents;
pub use obstacle_renderer::{render_barrier, render_obstacles};
pub use trace_renderer::{render_trace, Backdrop, CurbStyle};
pub use track_renderer::render_track;
