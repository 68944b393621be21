// src/draw/mod.rs
// The drawing surface abstraction all renderers paint through.
// Renderers speak canvas coordinates (origin top-left, y-down); each Surface
// maps those onto its backend.

pub mod nannou_surface;
pub mod path_draw;

#[cfg(test)]
pub mod recording;

pub use nannou_surface::NannouSurface;
pub use path_draw::{dash_polyline, Shape, SubPath};

use nannou::prelude::*;
use regex::Regex;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineCap {
    Butt,
    Round,
}

/// `[on, off]` dash pattern shifted by `offset` along the path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dash {
    pub on: f32,
    pub off: f32,
    pub offset: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StrokeStyle {
    pub color: Rgba,
    pub width: f32,
    pub dash: Option<Dash>,
    pub cap: LineCap,
    pub round_join: bool,
}

impl StrokeStyle {
    pub fn solid(color: Rgba, width: f32) -> Self {
        Self {
            color,
            width,
            dash: None,
            cap: LineCap::Butt,
            round_join: false,
        }
    }

    pub fn dashed(mut self, on: f32, off: f32, offset: f32) -> Self {
        self.dash = Some(Dash { on, off, offset });
        self
    }

    pub fn rounded(mut self) -> Self {
        self.cap = LineCap::Round;
        self.round_join = true;
        self
    }
}

pub trait Surface {
    /// Backend handle for raster images (e.g. a GPU texture).
    type Image;

    fn width(&self) -> f32;
    fn height(&self) -> f32;

    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, dx: f32, dy: f32);
    fn rotate(&mut self, radians: f32);

    fn fill_rect(&mut self, origin: Point2, size: Vec2, color: Rgba);
    fn fill_circle(&mut self, center: Point2, radius: f32, color: Rgba);
    fn stroke(&mut self, shape: &Shape, style: &StrokeStyle);
    fn draw_image(&mut self, image: &Self::Image, origin: Point2, size: Vec2, alpha: f32);

    fn stroke_rect(&mut self, origin: Point2, size: Vec2, style: &StrokeStyle) {
        self.stroke(&Shape::rect(origin, size), style);
    }
}

/// Opaque color from a `0xRRGGBB` literal.
pub fn color(hex: u32) -> Rgba {
    color_alpha(hex, 1.0)
}

pub fn color_alpha(hex: u32, alpha: f32) -> Rgba {
    let r = ((hex >> 16) & 0xff) as f32 / 255.0;
    let g = ((hex >> 8) & 0xff) as f32 / 255.0;
    let b = (hex & 0xff) as f32 / 255.0;
    rgba(r, g, b, alpha)
}

/// Parses `#rrggbb` (the leading `#` is optional).
pub fn parse_hex_color(text: &str) -> Option<Rgba> {
    static HEX: OnceLock<Regex> = OnceLock::new();
    let re = HEX.get_or_init(|| {
        Regex::new(r"^#?([0-9a-fA-F]{6})$").expect("hex color pattern is valid")
    });
    let caps = re.captures(text.trim())?;
    let value = u32::from_str_radix(&caps[1], 16).ok()?;
    Some(color(value))
}

/// `#rrggbb` for the opaque part of `c`.
pub fn hex_string(c: Rgba) -> String {
    let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!("#{:02x}{:02x}{:02x}", channel(c.red), channel(c.green), channel(c.blue))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#ff0000"), Some(color(0xff0000)));
        assert_eq!(parse_hex_color("2c2c2e"), Some(color(0x2c2c2e)));
        assert_eq!(parse_hex_color(" #FFFFFF "), Some(color(0xffffff)));
        assert_eq!(parse_hex_color("#fff"), None);
        assert_eq!(parse_hex_color("red"), None);
    }

    #[test]
    fn test_hex_string_matches_parsed_color() {
        assert_eq!(hex_string(color(0x2c2c2e)), "#2c2c2e");
        let parsed = parse_hex_color("#FF8000").unwrap();
        assert_eq!(hex_string(parsed), "#ff8000");
    }

    #[test]
    fn test_color_channels() {
        let c = color_alpha(0xff8000, 0.5);
        assert!((c.red - 1.0).abs() < 1e-6);
        assert!((c.green - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(c.blue, 0.0);
        assert_eq!(c.alpha, 0.5);
    }

    #[test]
    fn test_stroke_style_builders() {
        let style = StrokeStyle::solid(color(0xffffff), 2.0).dashed(6.0, 4.0, 0.0).rounded();
        assert_eq!(style.cap, LineCap::Round);
        assert!(style.round_join);
        assert_eq!(
            style.dash,
            Some(Dash {
                on: 6.0,
                off: 4.0,
                offset: 0.0
            })
        );
    }
}
