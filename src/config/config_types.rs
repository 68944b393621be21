// src/config/config_types.rs
//
// Config types for the app. Every section falls back to its defaults so a
// partial config.toml still loads.

use crate::models::TrackKind;
use crate::utilities::spline::Smoothing;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct WindowConfig {
    // canvas size; the toolbar strip is added on top of this
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1400,
            height: 750,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct TrackConfig {
    pub kind: TrackKind,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct TraceConfig {
    pub reference_image: Option<String>,
    pub tension: f32,
    pub segments: usize,
    pub style: TraceStyle,
}

impl Default for TraceConfig {
    fn default() -> Self {
        let smoothing = Smoothing::default();
        Self {
            reference_image: None,
            tension: smoothing.tension,
            segments: smoothing.segments,
            style: TraceStyle::default(),
        }
    }
}

impl TraceConfig {
    pub fn smoothing(&self) -> Smoothing {
        Smoothing::new(self.tension, self.segments)
    }
}

/// Stroke parameters for the finished curb + asphalt rendering.
/// Colors are `#rrggbb` strings, resolved once at startup.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct TraceStyle {
    pub asphalt_color: String,
    pub asphalt_width: f32,
    pub curb_width: f32,
    pub curb_primary: String,
    pub curb_secondary: String,
    pub dash: f32,
    pub gap: f32,
}

impl Default for TraceStyle {
    fn default() -> Self {
        Self {
            asphalt_color: "#2c2c2e".to_string(),
            asphalt_width: 36.0,
            curb_width: 60.0,
            curb_primary: "#ff0000".to_string(),
            curb_secondary: "#ffffff".to_string(),
            dash: 24.0,
            gap: 24.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct FeedConfig {
    pub enabled: bool,
    pub rx_port: u16,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            rx_port: 9001,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PathConfig {
    pub output_directory: String,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            output_directory: "exports".to_string(),
        }
    }
}
