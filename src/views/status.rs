// src/views/status.rs
// Status text in the toolbar strip: mode, cursor readout, trace progress and
// short-lived notices.

use nannou::prelude::*;

use super::toolbar::TOOLBAR_HEIGHT;
use crate::controllers::{Editor, EditorMode};
use crate::draw::color;
use crate::models::{TracePhase, Viewport};

pub const NOTICE_SECONDS: f32 = 3.0;
const TEXT: u32 = 0xbdbdbd;
const NOTICE: u32 = 0xffd700;
const STATUS_LEFT: f32 = 140.0;

#[derive(Debug, Clone, PartialEq)]
struct Notice {
    text: String,
    until: f32,
}

#[derive(Debug, Default)]
pub struct StatusBar {
    notice: Option<Notice>,
}

impl StatusBar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shows `text` for a few seconds from `now` (app time in seconds),
    /// replacing any earlier notice.
    pub fn notify(&mut self, text: impl Into<String>, now: f32) {
        self.notice = Some(Notice {
            text: text.into(),
            until: now + NOTICE_SECONDS,
        });
    }

    pub fn notice(&self, now: f32) -> Option<&str> {
        self.notice
            .as_ref()
            .filter(|n| now < n.until)
            .map(|n| n.text.as_str())
    }

    pub fn draw(&self, draw: &Draw, window_size: Vec2, editor: &Editor, agents: usize, now: f32) {
        let (text, tint) = match self.notice(now) {
            Some(notice) => (notice.to_string(), NOTICE),
            None => (status_line(editor, agents), TEXT),
        };
        let width = window_size.x - STATUS_LEFT - 12.0;
        let center = Viewport::page_to_window(
            window_size,
            pt2(STATUS_LEFT + width / 2.0, TOOLBAR_HEIGHT / 2.0),
        );
        draw.text(&text)
            .xy(center)
            .w_h(width, TOOLBAR_HEIGHT)
            .left_justify()
            .font_size(13)
            .color(color(tint));
    }
}

pub fn status_line(editor: &Editor, agents: usize) -> String {
    // track-local for obstacles, canvas pixels for traced points
    let pointer = match editor.mode() {
        EditorMode::Obstacles => editor.interaction().cursor(),
        EditorMode::Trace => editor.canvas_pointer(),
    };
    let cursor = pointer
        .map(|p| format!("x {:.0}  y {:.0}", p.x, p.y))
        .unwrap_or_else(|| "x -  y -".to_string());

    match editor.mode() {
        EditorMode::Obstacles => format!(
            "[tab] {} | track {} | {} obstacle(s) | {} agent(s) | {} | drag barrier, r rotate, +/- size, del remove, t track, c clear, j json, p png",
            editor.mode().label(),
            editor.track().kind().name(),
            editor.interaction().obstacles().len(),
            agents,
            cursor,
        ),
        EditorMode::Trace => {
            let trace = editor.trace();
            let phase = match trace.phase() {
                TracePhase::Drawing => "drawing",
                TracePhase::Finished => "finished",
            };
            format!(
                "[tab] {} | {} | path {}/{} ({} pts) | {} | n new, u undo, d delete, 1-9 switch, f finish, e edit, c clear, p png, x code",
                editor.mode().label(),
                phase,
                trace.active_index() + 1,
                trace.paths().len(),
                trace.active_path().len(),
                cursor,
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TrackKind;

    #[test]
    fn test_notice_expires() {
        let mut status = StatusBar::new();
        assert_eq!(status.notice(0.0), None);
        status.notify("saved", 1.0);
        assert_eq!(status.notice(2.0), Some("saved"));
        assert_eq!(status.notice(1.0 + NOTICE_SECONDS), None);
    }

    #[test]
    fn test_later_notice_replaces_earlier() {
        let mut status = StatusBar::new();
        status.notify("first", 0.0);
        status.notify("second", 0.5);
        assert_eq!(status.notice(1.0), Some("second"));
    }

    #[test]
    fn test_status_line_per_mode() {
        let mut editor = Editor::new(Viewport::new(800.0, 600.0, vec2(0.0, 44.0)), TrackKind::Oval);
        editor.pointer_move(pt2(410.0, 334.0));
        let line = status_line(&editor, 3);
        assert!(line.contains("track oval"));
        assert!(line.contains("3 agent(s)"));
        assert!(line.contains("x 10  y -10"));

        editor.toggle_mode();
        let line = status_line(&editor, 0);
        assert!(line.contains("drawing"));
        assert!(line.contains("path 1/1 (0 pts)"));
    }

    #[test]
    fn test_trace_cursor_matches_clicked_point() {
        let mut editor = Editor::new(Viewport::new(800.0, 600.0, vec2(0.0, 44.0)), TrackKind::Oval);
        editor.toggle_mode();
        editor.pointer_move(pt2(410.0, 334.0));
        assert!(status_line(&editor, 0).contains("x 410  y 290"));

        editor.pointer_down(pt2(410.0, 334.0));
        assert_eq!(editor.trace().active_path().last(), Some(&pt2(410.0, 290.0)));
    }
}
