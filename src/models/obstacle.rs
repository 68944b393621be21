// src/models/obstacle.rs
// Oriented rectangular barriers placed on the track, in track-local space.
//
// The collection is a value: every edit returns a new ObstacleSet and the
// caller swaps it in, so a snapshot held by a renderer never changes under it.

use nannou::prelude::*;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use super::geometry::rotate_vec;

pub type ObstacleId = u64;

pub const DEFAULT_LENGTH: f32 = 60.0;
pub const MIN_LENGTH: f32 = 20.0;
pub const MAX_LENGTH: f32 = 150.0;
/// Half height of the hit box around the barrier's long axis.
pub const HIT_HALF_HEIGHT: f32 = 10.0;

/// Obstacle types the toolbar can hand to the track surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObstacleKind {
    Barrier,
}

impl ObstacleKind {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "barrier" => Some(ObstacleKind::Barrier),
            _ => None,
        }
    }

    pub fn token(self) -> &'static str {
        match self {
            ObstacleKind::Barrier => "barrier",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub id: ObstacleId,
    pub position: Point2,
    pub angle: f32,
    pub length: f32,
}

impl Obstacle {
    pub fn new(id: ObstacleId, position: Point2) -> Self {
        Self {
            id,
            position,
            angle: 0.0,
            length: DEFAULT_LENGTH,
        }
    }

    /// Maps a track-local point into this obstacle's frame (inverse rotation
    /// about its center).
    pub fn to_local(&self, point: Point2) -> Vec2 {
        rotate_vec(point - self.position, -self.angle)
    }

    pub fn contains(&self, point: Point2) -> bool {
        let local = self.to_local(point);
        local.x.abs() <= self.length / 2.0 && local.y.abs() <= HIT_HALF_HEIGHT
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObstacleSet {
    items: Arc<Vec<Obstacle>>,
}

impl ObstacleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_vec(items: Vec<Obstacle>) -> Self {
        Self {
            items: Arc::new(items),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Obstacle> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: ObstacleId) -> Option<&Obstacle> {
        self.items.iter().find(|o| o.id == id)
    }

    pub fn contains_id(&self, id: ObstacleId) -> bool {
        self.get(id).is_some()
    }

    /// Top-most obstacle under `point`. Later entries are drawn on top, so
    /// the search runs newest first.
    pub fn hit_test(&self, point: Point2) -> Option<&Obstacle> {
        self.items.iter().rev().find(|o| o.contains(point))
    }

    #[must_use]
    pub fn with_added(&self, obstacle: Obstacle) -> Self {
        let mut items = Vec::with_capacity(self.items.len() + 1);
        items.extend_from_slice(&self.items);
        items.push(obstacle);
        Self::from_vec(items)
    }

    #[must_use]
    pub fn translated(&self, id: ObstacleId, position: Point2) -> Self {
        self.map_one(id, |o| Obstacle { position, ..o })
    }

    /// Adds `delta` to the angle. No wrap-around: trigonometry is periodic.
    #[must_use]
    pub fn rotated(&self, id: ObstacleId, delta: f32) -> Self {
        self.map_one(id, |o| Obstacle {
            angle: o.angle + delta,
            ..o
        })
    }

    #[must_use]
    pub fn resized_by(&self, id: ObstacleId, delta: f32) -> Self {
        self.map_one(id, |o| Obstacle {
            length: (o.length + delta).clamp(MIN_LENGTH, MAX_LENGTH),
            ..o
        })
    }

    #[must_use]
    pub fn removed(&self, id: ObstacleId) -> Self {
        Self::from_vec(self.items.iter().copied().filter(|o| o.id != id).collect())
    }

    fn map_one(&self, id: ObstacleId, f: impl Fn(Obstacle) -> Obstacle) -> Self {
        Self::from_vec(
            self.items
                .iter()
                .map(|o| if o.id == id { f(*o) } else { *o })
                .collect(),
        )
    }
}

/// Hands out creation-time ids in milliseconds, bumped when two obstacles
/// land in the same millisecond.
#[derive(Debug, Default)]
pub struct IdStamp {
    last: ObstacleId,
}

impl IdStamp {
    pub fn next(&mut self) -> ObstacleId {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as ObstacleId)
            .unwrap_or(0);
        self.last = now.max(self.last + 1);
        self.last
    }
}
