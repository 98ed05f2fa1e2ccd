//! Virtual camera: world/screen projection and primitive drawing
//!
//! The camera owns the projection (`screen = (world - center) * zoom +
//! screen_center`) and every draw call the editor makes goes through it,
//! either in world coordinates or, for fixed UI, in raw screen coordinates.

use std::fmt;

use macroquad::prelude::*;

use crate::ui::Rect as ScreenRect;

/// Zoom is never allowed below this floor
pub const MIN_ZOOM: f32 = 0.1;

/// Drawing-backend failure
#[derive(Debug)]
pub struct RenderError(pub String);

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "render error: {}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct Camera {
    center: Vec2,
    zoom: f32,
    screen_size: Vec2,
}

impl Camera {
    pub fn new(screen_w: f32, screen_h: f32) -> Self {
        Self {
            center: Vec2::ZERO,
            zoom: 1.0,
            screen_size: vec2(screen_w, screen_h),
        }
    }

    pub fn resize(&mut self, screen_w: f32, screen_h: f32) {
        self.screen_size = vec2(screen_w, screen_h);
    }

    pub fn set_center(&mut self, center: Vec2) {
        self.center = center;
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = zoom.max(MIN_ZOOM);
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn world_to_screen(&self, p: Vec2) -> Vec2 {
        (p - self.center) * self.zoom + self.screen_size * 0.5
    }

    pub fn screen_to_world(&self, p: Vec2) -> Vec2 {
        (p - self.screen_size * 0.5) / self.zoom + self.center
    }

    pub fn clear(&self, color: Color) {
        clear_background(color);
    }

    /// Fill a world-space rectangle
    pub fn fill_rect(&self, rect: Rect, color: Color) {
        let p = self.world_to_screen(rect.point());
        draw_rectangle(p.x, p.y, rect.w * self.zoom, rect.h * self.zoom, color);
    }

    /// Outline a world-space rectangle
    pub fn stroke_rect(&self, rect: Rect, color: Color) {
        let p = self.world_to_screen(rect.point());
        draw_rectangle_lines(p.x, p.y, rect.w * self.zoom, rect.h * self.zoom, 2.0, color);
    }

    /// Draw text anchored at a world-space position, scaled with zoom
    pub fn render_text(&self, text: &str, pos: Vec2, font_size: f32, color: Color) {
        let p = self.world_to_screen(pos);
        draw_text(text, p.x, p.y, font_size * self.zoom, color);
    }

    /// Fill a screen-space rectangle (unaffected by pan/zoom)
    pub fn fill_rect_screen(&self, rect: ScreenRect, color: Color) {
        draw_rectangle(rect.x, rect.y, rect.w, rect.h, color);
    }

    /// Outline a screen-space rectangle
    pub fn stroke_rect_screen(&self, rect: ScreenRect, color: Color) {
        draw_rectangle_lines(rect.x, rect.y, rect.w, rect.h, 2.0, color);
    }

    /// Draw text at a fixed screen position
    pub fn render_text_screen(&self, text: &str, pos: Vec2, font_size: f32, color: Color) {
        draw_text(text, pos.x, pos.y, font_size, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen_world_inverse() {
        let mut camera = Camera::new(800.0, 600.0);
        camera.set_center(vec2(120.0, -40.0));
        camera.set_zoom(2.5);

        let world = vec2(33.0, 77.0);
        let back = camera.screen_to_world(camera.world_to_screen(world));
        assert!((back - world).length() < 1e-3);

        let screen = vec2(400.0, 300.0);
        assert!((camera.world_to_screen(camera.center) - screen).length() < 1e-3);
    }

    #[test]
    fn test_zoom_floor() {
        let mut camera = Camera::new(800.0, 600.0);
        camera.set_zoom(0.0);
        assert_eq!(camera.zoom(), MIN_ZOOM);
        camera.set_zoom(-3.0);
        assert_eq!(camera.zoom(), MIN_ZOOM);
        camera.set_zoom(1.7);
        assert_eq!(camera.zoom(), 1.7);
    }

    #[test]
    fn test_default_projection_is_centered() {
        let camera = Camera::new(800.0, 600.0);
        let p = camera.world_to_screen(Vec2::ZERO);
        assert_eq!(p, vec2(400.0, 300.0));
        assert_eq!(camera.screen_to_world(vec2(400.0, 300.0)), Vec2::ZERO);
    }
}
