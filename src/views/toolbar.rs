// src/views/toolbar.rs
// Strip above the canvas holding the draggable barrier chip.

use nannou::prelude::*;

use crate::draw::{color, NannouSurface, Surface};
use crate::models::{obstacle::DEFAULT_LENGTH, Obstacle, ObstacleKind, Viewport};
use crate::render::render_barrier;

pub const TOOLBAR_HEIGHT: f32 = 44.0;
const CHIP_ORIGIN: (f32, f32) = (12.0, 8.0);
const CHIP_SIZE: (f32, f32) = (110.0, 28.0);
const STRIP: u32 = 0x111114;
const CHIP: u32 = 0x2a2a30;
const CHIP_ACTIVE: u32 = 0x3b3b44;
const LABEL: u32 = 0xe6e6e6;

/// Drag state for the toolbar chip. All positions are page space.
#[derive(Debug, Default)]
pub struct Toolbar {
    drag: Option<Point2>,
}

impl Toolbar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chip_contains(&self, page: Point2) -> bool {
        let (x, y) = CHIP_ORIGIN;
        let (w, h) = CHIP_SIZE;
        page.x >= x && page.x <= x + w && page.y >= y && page.y <= y + h
    }

    /// Starts a drag when `page` lands on the chip.
    pub fn begin_drag(&mut self, page: Point2) -> bool {
        let hit = self.chip_contains(page);
        if hit {
            self.drag = Some(page);
        }
        hit
    }

    pub fn drag_to(&mut self, page: Point2) {
        if let Some(pointer) = self.drag.as_mut() {
            *pointer = page;
        }
    }

    /// Pointer position while a drag is in flight.
    pub fn dragging(&self) -> Option<Point2> {
        self.drag
    }

    /// Ends the drag, handing back the token and the release point.
    pub fn end_drag(&mut self) -> Option<(&'static str, Point2)> {
        self.drag
            .take()
            .map(|page| (ObstacleKind::Barrier.token(), page))
    }

    pub fn cancel(&mut self) {
        self.drag = None;
    }

    pub fn draw(&self, draw: &Draw, window_size: Vec2) {
        let strip_center =
            Viewport::page_to_window(window_size, pt2(window_size.x / 2.0, TOOLBAR_HEIGHT / 2.0));
        draw.rect()
            .xy(strip_center)
            .w_h(window_size.x, TOOLBAR_HEIGHT)
            .color(color(STRIP));

        let (x, y) = CHIP_ORIGIN;
        let (w, h) = CHIP_SIZE;
        let chip_center = Viewport::page_to_window(window_size, pt2(x + w / 2.0, y + h / 2.0));
        let fill = if self.drag.is_some() { CHIP_ACTIVE } else { CHIP };
        draw.rect().xy(chip_center).w_h(w, h).color(color(fill));
        draw.text("barrier")
            .xy(chip_center)
            .w_h(w, h)
            .font_size(14)
            .color(color(LABEL));
    }

    /// Outlined barrier preview under the pointer while dragging over the canvas.
    pub fn draw_ghost(&self, surface: &mut NannouSurface, viewport: &Viewport) {
        let Some(page) = self.drag else {
            return;
        };
        if !viewport.contains_page(page) {
            return;
        }
        let ghost = Obstacle {
            id: 0,
            position: viewport.page_to_track(page),
            angle: 0.0,
            length: DEFAULT_LENGTH,
        };
        let center = viewport.half_size();
        surface.save();
        surface.translate(center.x, center.y);
        render_barrier(surface, &ghost, true);
        surface.restore();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drag_only_from_chip() {
        let mut toolbar = Toolbar::new();
        assert!(!toolbar.begin_drag(pt2(500.0, 20.0)));
        assert_eq!(toolbar.end_drag(), None);

        assert!(toolbar.begin_drag(pt2(20.0, 20.0)));
        toolbar.drag_to(pt2(300.0, 400.0));
        assert_eq!(toolbar.dragging(), Some(pt2(300.0, 400.0)));
        assert_eq!(toolbar.end_drag(), Some(("barrier", pt2(300.0, 400.0))));
        assert_eq!(toolbar.dragging(), None);
    }

    #[test]
    fn test_cancel_drops_nothing() {
        let mut toolbar = Toolbar::new();
        toolbar.begin_drag(pt2(20.0, 20.0));
        toolbar.cancel();
        assert_eq!(toolbar.end_drag(), None);
    }

    #[test]
    fn test_chip_inside_strip() {
        let (_, y) = CHIP_ORIGIN;
        let (_, h) = CHIP_SIZE;
        assert!(y + h <= TOOLBAR_HEIGHT);
    }
}
