// src/controllers/editor.rs
// Routes window input to the obstacle editor or the trace session depending
// on the active mode. Anything that needs the app (file output, window
// capture, on-screen notices) is queued as a command and drained by main once
// per frame.

use nannou::prelude::*;

use super::interaction::{DropEffect, EditorKey, InteractionController};
use crate::models::{TraceSession, TrackKind, TrackShape, Viewport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    Obstacles,
    Trace,
}

impl EditorMode {
    pub fn toggled(self) -> Self {
        match self {
            EditorMode::Obstacles => EditorMode::Trace,
            EditorMode::Trace => EditorMode::Obstacles,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EditorMode::Obstacles => "obstacles",
            EditorMode::Trace => "trace",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EditorCommand {
    ExportImage,
    ExportCode,
    ExportObstacles,
    Notice(String),
}

pub struct Editor {
    mode: EditorMode,
    track: TrackShape,
    interaction: InteractionController,
    trace: TraceSession,
    // last pointer position on the canvas, page space
    pointer: Option<Point2>,
    command_queue: Vec<EditorCommand>,
}

impl Editor {
    pub fn new(viewport: Viewport, track: TrackKind) -> Self {
        Self {
            mode: EditorMode::Obstacles,
            track: TrackShape::preset(track),
            interaction: InteractionController::new(viewport),
            trace: TraceSession::new(),
            pointer: None,
            command_queue: Vec::new(),
        }
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn track(&self) -> &TrackShape {
        &self.track
    }

    pub fn interaction(&self) -> &InteractionController {
        &self.interaction
    }

    pub fn trace(&self) -> &TraceSession {
        &self.trace
    }

    pub fn viewport(&self) -> &Viewport {
        self.interaction.viewport()
    }

    /// Pointer in canvas space while it is over the canvas.
    pub fn canvas_pointer(&self) -> Option<Point2> {
        self.pointer.map(|p| self.viewport().page_to_canvas(p))
    }

    pub fn toggle_mode(&mut self) {
        self.interaction.pointer_up();
        self.mode = self.mode.toggled();
        log::info!("Switched to {} mode", self.mode.label());
    }

    pub fn cycle_track(&mut self) {
        let next = self.track.kind().next();
        self.track = TrackShape::preset(next);
        log::info!("Track template: {}", next.name());
    }

    pub fn pointer_down(&mut self, page: Point2) {
        if !self.viewport().contains_page(page) {
            return;
        }
        match self.mode {
            EditorMode::Obstacles => self.interaction.pointer_down(page),
            EditorMode::Trace => {
                let canvas = self.viewport().page_to_canvas(page);
                self.trace.click(canvas);
            }
        }
    }

    pub fn pointer_move(&mut self, page: Point2) {
        if !self.viewport().contains_page(page) {
            self.pointer_leave();
            return;
        }
        self.pointer = Some(page);
        self.interaction.pointer_move(page);
    }

    pub fn pointer_up(&mut self) {
        self.interaction.pointer_up();
    }

    pub fn pointer_leave(&mut self) {
        self.pointer = None;
        self.interaction.pointer_leave();
    }

    /// Drag from the toolbar hovering at `page`. Only the obstacle editor
    /// accepts drops, and only over the canvas.
    pub fn drag_over(&self, page: Point2) -> Option<DropEffect> {
        (self.mode == EditorMode::Obstacles && self.viewport().contains_page(page))
            .then(|| self.interaction.drag_over(page))
    }

    pub fn drop(&mut self, token: &str, page: Point2) {
        if self.drag_over(page).is_some() {
            self.interaction.drop(token, page);
        }
    }

    pub fn key(&mut self, key: EditorKey) {
        match self.mode {
            EditorMode::Obstacles => self.obstacle_key(key),
            EditorMode::Trace => self.trace_key(key),
        }
    }

    fn obstacle_key(&mut self, key: EditorKey) {
        if self.interaction.key(key) {
            return;
        }
        match key {
            EditorKey::Char('t') => self.cycle_track(),
            EditorKey::Char('c') => {
                self.interaction.clear();
                self.notice("Cleared all obstacles");
            }
            EditorKey::Char('j') => self.command_queue.push(EditorCommand::ExportObstacles),
            EditorKey::Char('p') => self.command_queue.push(EditorCommand::ExportImage),
            _ => {}
        }
    }

    fn trace_key(&mut self, key: EditorKey) {
        match key {
            EditorKey::Char('n') => self.trace.start_new_path(),
            EditorKey::Char('u') | EditorKey::Backspace => self.trace.undo_last(),
            EditorKey::Char('d') | EditorKey::Delete => {
                self.trace.delete_path(self.trace.active_index())
            }
            EditorKey::Char(c @ '1'..='9') => {
                if let Some(digit) = c.to_digit(10) {
                    self.trace.switch_path(digit as usize - 1);
                }
            }
            EditorKey::Char('f') | EditorKey::Enter => self.finish_trace(),
            EditorKey::Char('e') => self.trace.edit_again(),
            EditorKey::Char('c') => self.trace.clear_all(),
            EditorKey::Char('p') => self.command_queue.push(EditorCommand::ExportImage),
            EditorKey::Char('x') => self.command_queue.push(EditorCommand::ExportCode),
            _ => {}
        }
    }

    fn finish_trace(&mut self) {
        if self.trace.is_finished() {
            return;
        }
        match self.trace.finish() {
            Ok(()) => log::info!("Trace finished with {} path(s)", self.trace.drawable_paths().count()),
            Err(e) => {
                log::warn!("Cannot finish trace: {}", e);
                self.notice(&e.to_string());
            }
        }
    }

    fn notice(&mut self, text: &str) {
        self.command_queue.push(EditorCommand::Notice(text.to_string()));
    }

    pub fn drain_commands(&mut self) -> Vec<EditorCommand> {
        std::mem::take(&mut self.command_queue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TracePhase;
    use std::f32::consts::PI;

    fn editor() -> Editor {
        Editor::new(Viewport::new(800.0, 600.0, vec2(0.0, 40.0)), TrackKind::Stadium)
    }

    #[test]
    fn test_trace_clicks_use_canvas_space() {
        let mut e = editor();
        e.toggle_mode();
        e.pointer_down(pt2(10.0, 50.0));
        e.pointer_down(pt2(50.0, 50.0));
        assert_eq!(e.trace().active_path(), &[pt2(10.0, 10.0), pt2(50.0, 10.0)]);

        // the toolbar strip is not canvas
        e.pointer_down(pt2(10.0, 20.0));
        assert_eq!(e.trace().active_path().len(), 2);
    }

    #[test]
    fn test_finish_without_points_queues_notice() {
        let mut e = editor();
        e.toggle_mode();
        e.pointer_down(pt2(10.0, 50.0));
        e.key(EditorKey::Char('f'));
        assert_eq!(e.trace().phase(), TracePhase::Drawing);
        let commands = e.drain_commands();
        assert!(matches!(commands.as_slice(), [EditorCommand::Notice(_)]));
        assert!(e.drain_commands().is_empty());

        e.pointer_down(pt2(60.0, 50.0));
        e.key(EditorKey::Enter);
        assert_eq!(e.trace().phase(), TracePhase::Finished);
    }

    #[test]
    fn test_trace_path_keys() {
        let mut e = editor();
        e.toggle_mode();
        e.pointer_down(pt2(10.0, 50.0));
        e.key(EditorKey::Char('n'));
        e.pointer_down(pt2(20.0, 50.0));
        e.key(EditorKey::Char('1'));
        assert_eq!(e.trace().active_index(), 0);
        e.key(EditorKey::Char('u'));
        assert!(e.trace().active_path().is_empty());
        e.key(EditorKey::Char('d'));
        assert_eq!(e.trace().paths().len(), 1);
        e.key(EditorKey::Char('x'));
        assert_eq!(e.drain_commands(), vec![EditorCommand::ExportCode]);
    }

    #[test]
    fn test_barrier_drop_rotate_grow() {
        let mut e = editor();
        let center = e.viewport().track_to_page(pt2(0.0, 0.0));
        assert_eq!(e.drag_over(center), Some(DropEffect::Copy));
        e.drop("barrier", center);

        let id = e.interaction().selected().unwrap();
        e.key(EditorKey::Char('r'));
        e.key(EditorKey::Char('+'));
        let o = *e.interaction().obstacles().get(id).unwrap();
        assert!((o.angle - PI / 12.0).abs() < 1e-6);
        assert_eq!(o.length, 70.0);
    }

    #[test]
    fn test_drops_refused_in_trace_mode_and_off_canvas() {
        let mut e = editor();
        assert_eq!(e.drag_over(pt2(100.0, 10.0)), None);
        e.toggle_mode();
        let center = e.viewport().track_to_page(pt2(0.0, 0.0));
        e.drop("barrier", center);
        assert!(e.interaction().obstacles().is_empty());
    }

    #[test]
    fn test_obstacle_mode_commands() {
        let mut e = editor();
        e.key(EditorKey::Char('t'));
        assert_eq!(e.track().kind(), TrackKind::Circuit);
        e.key(EditorKey::Char('j'));
        e.key(EditorKey::Char('p'));
        assert_eq!(
            e.drain_commands(),
            vec![EditorCommand::ExportObstacles, EditorCommand::ExportImage]
        );
    }

    #[test]
    fn test_leaving_canvas_clears_pointer() {
        let mut e = editor();
        e.pointer_move(pt2(100.0, 100.0));
        assert_eq!(e.canvas_pointer(), Some(pt2(100.0, 60.0)));
        e.pointer_move(pt2(100.0, 5.0));
        assert_eq!(e.canvas_pointer(), None);
    }
}
