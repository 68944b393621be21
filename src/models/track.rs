// src/models/track.rs
// Parametric track templates, centered on the canvas midpoint

use nannou::prelude::*;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    Oval,
    #[default]
    Stadium,
    Circuit,
}

impl TrackKind {
    pub fn next(self) -> Self {
        match self {
            TrackKind::Oval => TrackKind::Stadium,
            TrackKind::Stadium => TrackKind::Circuit,
            TrackKind::Circuit => TrackKind::Oval,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TrackKind::Oval => "oval",
            TrackKind::Stadium => "stadium",
            TrackKind::Circuit => "circuit",
        }
    }
}

pub const CIRCUIT_WAYPOINTS: [(f32, f32); 8] = [
    (-250.0, 0.0),
    (-250.0, -150.0),
    (-50.0, -200.0),
    (150.0, -150.0),
    (250.0, 0.0),
    (250.0, 150.0),
    (50.0, 200.0),
    (-150.0, 150.0),
];

#[derive(Debug, Clone, PartialEq)]
pub enum TrackShape {
    Oval {
        radius_x: f32,
        radius_y: f32,
        track_width: f32,
    },
    Stadium {
        straight_length: f32,
        radius: f32,
        track_width: f32,
    },
    Circuit {
        waypoints: [Point2; 8],
        track_width: f32,
    },
}

impl TrackShape {
    pub fn preset(kind: TrackKind) -> Self {
        match kind {
            TrackKind::Oval => TrackShape::Oval {
                radius_x: 300.0,
                radius_y: 200.0,
                track_width: 80.0,
            },
            TrackKind::Stadium => TrackShape::Stadium {
                straight_length: 400.0,
                radius: 100.0,
                track_width: 80.0,
            },
            TrackKind::Circuit => TrackShape::Circuit {
                waypoints: CIRCUIT_WAYPOINTS.map(|(x, y)| pt2(x, y)),
                track_width: 100.0,
            },
        }
    }

    pub fn kind(&self) -> TrackKind {
        match self {
            TrackShape::Oval { .. } => TrackKind::Oval,
            TrackShape::Stadium { .. } => TrackKind::Stadium,
            TrackShape::Circuit { .. } => TrackKind::Circuit,
        }
    }

    pub fn track_width(&self) -> f32 {
        match self {
            TrackShape::Oval { track_width, .. }
            | TrackShape::Stadium { track_width, .. }
            | TrackShape::Circuit { track_width, .. } => *track_width,
        }
    }
}
