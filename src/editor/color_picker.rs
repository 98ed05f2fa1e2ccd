//! Background color layer
//!
//! Owns the level's background color and, while active, a screen-space
//! swatch palette for changing it. The palette ignores camera pan/zoom.

use std::io::{self, Write};

use macroquad::prelude::{Color, MouseButton};

use crate::camera::{Camera, RenderError};
use crate::input::InputEvent;
use crate::level::{color_to_hex, parse_color, LineCursor, ParseError};
use crate::ui::Rect;

use super::{EditorError, Layer};

const SWATCH_SIZE: f32 = 30.0;
const SWATCH_GAP: f32 = 6.0;
/// Palette origin, to the right of the layer picker column
const PALETTE_ORIGIN: (f32, f32) = (70.0, 10.0);

const SELECTED_OUTLINE: Color = Color::new(1.0, 1.0, 1.0, 1.0);

/// Fixed palette of background colors
const PALETTE: [Color; 8] = [
    Color::new(1.0, 253.0 / 255.0, 165.0 / 255.0, 1.0), // fffda5, the classic
    Color::new(0.65, 0.83, 1.0, 1.0), // sky blue
    Color::new(0.78, 1.0, 0.72, 1.0), // mint
    Color::new(1.0, 0.72, 0.72, 1.0), // salmon
    Color::new(0.85, 0.75, 1.0, 1.0), // lilac
    Color::new(0.95, 0.95, 0.95, 1.0), // near white
    Color::new(0.35, 0.35, 0.40, 1.0), // slate
    Color::new(0.10, 0.10, 0.12, 1.0), // near black
];

#[derive(Debug)]
pub struct ColorPicker {
    color: Color,
}

impl ColorPicker {
    pub fn new(color: Color) -> Self {
        Self { color }
    }

    /// Decode the background section: one hex color line
    pub fn from_lines(cursor: &mut LineCursor) -> Result<Self, ParseError> {
        let line = cursor.next_line()?;
        Ok(Self {
            color: parse_color(cursor, line.trim())?,
        })
    }

    pub fn color(&self) -> Color {
        self.color
    }

    fn swatch_rect(index: usize) -> Rect {
        let (x0, y0) = PALETTE_ORIGIN;
        Rect::new(
            x0 + index as f32 * (SWATCH_SIZE + SWATCH_GAP),
            y0,
            SWATCH_SIZE,
            SWATCH_SIZE,
        )
    }

    fn swatch_at(x: f32, y: f32) -> Option<Color> {
        PALETTE
            .iter()
            .enumerate()
            .find(|(i, _)| Self::swatch_rect(*i).contains(x, y))
            .map(|(_, color)| *color)
    }
}

impl Layer for ColorPicker {
    fn render(&self, camera: &Camera, active: bool) -> Result<(), RenderError> {
        // The background itself is cleared by the editor; only the palette
        // affordance is drawn here.
        if active {
            for (i, color) in PALETTE.iter().enumerate() {
                let rect = Self::swatch_rect(i);
                camera.fill_rect_screen(rect, *color);
                if color_to_hex(*color) == color_to_hex(self.color) {
                    camera.stroke_rect_screen(rect, SELECTED_OUTLINE);
                }
            }
        }
        Ok(())
    }

    fn handle_event(&mut self, event: &InputEvent, _camera: &Camera) -> Result<(), EditorError> {
        if let InputEvent::MousePressed {
            button: MouseButton::Left,
            pos,
        } = event
        {
            if let Some(color) = Self::swatch_at(pos.x, pos.y) {
                self.color = color;
            }
        }
        Ok(())
    }

    fn dump(&self, sink: &mut dyn io::Write) -> io::Result<()> {
        writeln!(sink, "{}", color_to_hex(self.color))
    }
}
