// src/controllers/interaction.rs
// Pointer and keyboard handling for obstacle placement.
//
// Inputs arrive in page space and go through the Viewport once; everything
// after that is track-local.

use nannou::prelude::*;
use std::f32::consts::PI;

use crate::models::{IdStamp, Obstacle, ObstacleId, ObstacleKind, ObstacleSet, Viewport};

pub const ROTATE_STEP: f32 = PI / 12.0;
pub const RESIZE_STEP: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InteractionState {
    Idle,
    Selected(ObstacleId),
    Dragging { id: ObstacleId, offset: Vec2 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorKey {
    Delete,
    Backspace,
    Enter,
    Char(char),
}

/// What the track surface tells a drag source hovering over it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropEffect {
    Copy,
}

pub struct InteractionController {
    viewport: Viewport,
    obstacles: ObstacleSet,
    state: InteractionState,
    ids: IdStamp,
    cursor: Option<Point2>,
}

impl InteractionController {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            obstacles: ObstacleSet::new(),
            state: InteractionState::Idle,
            ids: IdStamp::default(),
            cursor: None,
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn obstacles(&self) -> &ObstacleSet {
        &self.obstacles
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    /// Selected id, or None when it no longer names an obstacle.
    pub fn selected(&self) -> Option<ObstacleId> {
        let id = match self.state {
            InteractionState::Idle => return None,
            InteractionState::Selected(id) => id,
            InteractionState::Dragging { id, .. } => id,
        };
        self.obstacles.contains_id(id).then_some(id)
    }

    /// Last pointer position in track-local coordinates.
    pub fn cursor(&self) -> Option<Point2> {
        self.cursor
    }

    pub fn pointer_down(&mut self, page: Point2) {
        let local = self.viewport.page_to_track(page);
        self.state = match self.obstacles.hit_test(local) {
            Some(hit) => InteractionState::Dragging {
                id: hit.id,
                offset: local - hit.position,
            },
            None => InteractionState::Idle,
        };
    }

    pub fn pointer_move(&mut self, page: Point2) {
        let local = self.viewport.page_to_track(page);
        self.cursor = Some(local);

        if let InteractionState::Dragging { id, offset } = self.state {
            if !self.obstacles.contains_id(id) {
                self.state = InteractionState::Idle;
                return;
            }
            self.obstacles = self.obstacles.translated(id, local - offset);
        }
    }

    pub fn pointer_up(&mut self) {
        if let InteractionState::Dragging { id, .. } = self.state {
            self.state = InteractionState::Selected(id);
        }
    }

    /// The pointer left the track surface; a drag in progress ends there.
    pub fn pointer_leave(&mut self) {
        self.pointer_up();
        self.cursor = None;
    }

    pub fn drag_over(&self, _page: Point2) -> DropEffect {
        DropEffect::Copy
    }

    /// Places the obstacle named by `token` under the pointer and selects
    /// it. Unknown tokens are ignored.
    pub fn drop(&mut self, token: &str, page: Point2) -> Option<ObstacleId> {
        let kind = ObstacleKind::from_token(token)?;
        let local = self.viewport.page_to_track(page);
        let obstacle = Obstacle::new(self.ids.next(), local);
        self.obstacles = self.obstacles.with_added(obstacle);
        self.state = InteractionState::Selected(obstacle.id);
        log::debug!(
            "Placed {} {} at ({:.0}, {:.0})",
            kind.token(),
            obstacle.id,
            local.x,
            local.y
        );
        Some(obstacle.id)
    }

    /// Applies an editing key to the selected obstacle. Returns whether
    /// anything changed.
    pub fn key(&mut self, key: EditorKey) -> bool {
        let Some(id) = self.selected() else {
            return false;
        };
        match key {
            EditorKey::Delete | EditorKey::Backspace => {
                self.obstacles = self.obstacles.removed(id);
                self.state = InteractionState::Idle;
            }
            EditorKey::Char('r' | 'R') => {
                self.obstacles = self.obstacles.rotated(id, ROTATE_STEP);
            }
            EditorKey::Char('+' | '=') => {
                self.obstacles = self.obstacles.resized_by(id, RESIZE_STEP);
            }
            EditorKey::Char('-' | '_') => {
                self.obstacles = self.obstacles.resized_by(id, -RESIZE_STEP);
            }
            EditorKey::Enter | EditorKey::Char(_) => return false,
        }
        true
    }

    /// Removes every obstacle.
    pub fn clear(&mut self) {
        self.obstacles = ObstacleSet::new();
        self.state = InteractionState::Idle;
    }
}
