// src/models/trace_session.rs
// Click-to-trace session: several polylines traced over a reference image,
// then frozen into the final track.

use nannou::prelude::*;
use std::sync::Arc;
use thiserror::Error;

pub type TracePath = Vec<Point2>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TraceError {
    #[error("draw at least 2 points on one path before finishing")]
    NotEnoughPoints,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TracePhase {
    Drawing,
    Finished,
}

/// Paths are held behind an `Arc` and replaced wholesale on every edit, so a
/// snapshot handed to the renderer or the exporter stays consistent.
#[derive(Debug, Clone)]
pub struct TraceSession {
    paths: Arc<Vec<TracePath>>,
    active: usize,
    phase: TracePhase,
}

impl Default for TraceSession {
    fn default() -> Self {
        Self::new()
    }
}

impl TraceSession {
    pub fn new() -> Self {
        Self {
            paths: Arc::new(vec![Vec::new()]),
            active: 0,
            phase: TracePhase::Drawing,
        }
    }

    pub fn paths(&self) -> &[TracePath] {
        &self.paths
    }

    pub fn snapshot(&self) -> Arc<Vec<TracePath>> {
        Arc::clone(&self.paths)
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active_path(&self) -> &[Point2] {
        self.paths.get(self.active).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn phase(&self) -> TracePhase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        self.phase == TracePhase::Finished
    }

    /// Paths with enough points to be drawn as a track.
    pub fn drawable_paths(&self) -> impl Iterator<Item = &TracePath> {
        self.paths.iter().filter(|p| p.len() >= 2)
    }

    pub fn click(&mut self, point: Point2) {
        if self.is_finished() {
            return;
        }
        let active = self.active;
        self.edit(|paths| {
            if let Some(path) = paths.get_mut(active) {
                path.push(point);
            }
        });
    }

    pub fn start_new_path(&mut self) {
        if self.is_finished() {
            return;
        }
        self.edit(|paths| paths.push(Vec::new()));
        self.active = self.paths.len() - 1;
    }

    pub fn undo_last(&mut self) {
        if self.is_finished() || self.active_path().is_empty() {
            return;
        }
        let active = self.active;
        self.edit(|paths| {
            if let Some(path) = paths.get_mut(active) {
                path.pop();
            }
        });
    }

    /// Removes path `index`. The session always keeps at least one path, and
    /// the active index is pulled back into range.
    pub fn delete_path(&mut self, index: usize) {
        if self.is_finished() || index >= self.paths.len() {
            return;
        }
        self.edit(|paths| {
            paths.remove(index);
            if paths.is_empty() {
                paths.push(Vec::new());
            }
        });
        self.active = self.active.min(self.paths.len() - 1);
    }

    pub fn switch_path(&mut self, index: usize) {
        if self.is_finished() || index >= self.paths.len() {
            return;
        }
        self.active = index;
    }

    /// Back to a single empty path, from either phase.
    pub fn clear_all(&mut self) {
        *self = Self::new();
    }

    pub fn finish(&mut self) -> Result<(), TraceError> {
        if self.drawable_paths().next().is_none() {
            return Err(TraceError::NotEnoughPoints);
        }
        self.phase = TracePhase::Finished;
        Ok(())
    }

    pub fn edit_again(&mut self) {
        self.phase = TracePhase::Drawing;
    }

    fn edit(&mut self, f: impl FnOnce(&mut Vec<TracePath>)) {
        let mut next = self.paths.as_ref().clone();
        f(&mut next);
        self.paths = Arc::new(next);
    }
}
