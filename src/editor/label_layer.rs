//! Label layer: positioned text with inline editing
//!
//! Clicking places an empty label and starts text entry on it; characters
//! append, Enter (or Escape) commits. Labels are world-anchored but drawn
//! at a fixed font size scaled by the camera.

use std::io::{self, Write};

use macroquad::prelude::*;

use crate::camera::{Camera, RenderError};
use crate::input::InputEvent;
use crate::level::{
    color_to_hex, parse_color, parse_count, parse_float, parse_id, LineCursor, ParseError,
};

use super::{EditorError, Layer};

const LABEL_FONT_SIZE: f32 = 24.0;
/// Rough glyph advance used for hit testing, world units
const LABEL_CHAR_WIDTH: f32 = 12.0;

#[derive(Debug, Clone)]
pub struct Label {
    pub id: String,
    pub pos: Vec2,
    pub color: Color,
    pub text: String,
}

#[derive(Debug)]
pub struct LabelLayer {
    labels: Vec<Label>,
    create_color: Color,
    /// Index of the label receiving typed text, if any
    editing: Option<usize>,
    /// Last known pointer position, world space
    cursor: Vec2,
    next_id: usize,
}

impl LabelLayer {
    pub fn new(create_color: Color) -> Self {
        Self {
            labels: Vec::new(),
            create_color,
            editing: None,
            cursor: Vec2::ZERO,
            next_id: 0,
        }
    }

    /// Decode the label section: a count line, then per label a header
    /// line `id x y colorHex` followed by one raw text line.
    pub fn from_lines(cursor: &mut LineCursor, create_color: Color) -> Result<Self, ParseError> {
        let count = parse_count(cursor)?;
        let mut labels = Vec::with_capacity(count);
        for _ in 0..count {
            let header = cursor.next_line()?;
            let fields: Vec<&str> = header.split_whitespace().collect();
            if fields.len() != 4 {
                return Err(cursor.error(format!(
                    "expected `id x y color`, got {} fields",
                    fields.len()
                )));
            }
            let id = parse_id(cursor, fields[0])?;
            let pos = vec2(
                parse_float(cursor, fields[1])?,
                parse_float(cursor, fields[2])?,
            );
            let color = parse_color(cursor, fields[3])?;
            let text = cursor.next_line()?.to_string();
            labels.push(Label {
                id,
                pos,
                color,
                text,
            });
        }
        let mut layer = Self::new(create_color);
        layer.next_id = labels.len();
        layer.labels = labels;
        Ok(layer)
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn add(&mut self, pos: Vec2, color: Color, text: impl Into<String>) {
        let id = format!("label_{}", self.next_id);
        self.next_id += 1;
        self.labels.push(Label {
            id,
            pos,
            color,
            text: text.into(),
        });
    }

    fn label_at(&self, pos: Vec2) -> Option<usize> {
        self.labels.iter().position(|label| {
            let w = (label.text.len().max(1) as f32) * LABEL_CHAR_WIDTH;
            Rect::new(label.pos.x, label.pos.y - LABEL_FONT_SIZE, w, LABEL_FONT_SIZE)
                .contains(pos)
        })
    }
}

impl Layer for LabelLayer {
    fn render(&self, camera: &Camera, active: bool) -> Result<(), RenderError> {
        for (i, label) in self.labels.iter().enumerate() {
            if active && self.editing == Some(i) {
                // Trailing underscore marks the insertion point
                let text = format!("{}_", label.text);
                camera.render_text(&text, label.pos, LABEL_FONT_SIZE, label.color);
            } else {
                camera.render_text(&label.text, label.pos, LABEL_FONT_SIZE, label.color);
            }
        }
        Ok(())
    }

    fn handle_event(&mut self, event: &InputEvent, camera: &Camera) -> Result<(), EditorError> {
        if let Some(i) = self.editing {
            match event {
                InputEvent::Char(ch) => self.labels[i].text.push(*ch),
                InputEvent::KeyPressed(KeyCode::Backspace) => {
                    self.labels[i].text.pop();
                }
                InputEvent::KeyPressed(KeyCode::Enter) | InputEvent::KeyPressed(KeyCode::Escape) => {
                    self.editing = None;
                }
                _ => {}
            }
            return Ok(());
        }

        match event {
            InputEvent::MousePressed {
                button: MouseButton::Left,
                pos,
            } => {
                let world = camera.screen_to_world(*pos);
                let color = self.create_color;
                self.add(world, color, "");
                self.editing = Some(self.labels.len() - 1);
            }
            InputEvent::MouseMoved { pos, .. } => {
                self.cursor = camera.screen_to_world(*pos);
            }
            InputEvent::KeyPressed(KeyCode::Delete) => {
                if let Some(i) = self.label_at(self.cursor) {
                    self.labels.remove(i);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn dump(&self, sink: &mut dyn io::Write) -> io::Result<()> {
        writeln!(sink, "{}", self.labels.len())?;
        for label in &self.labels {
            writeln!(
                sink,
                "{} {} {} {}",
                label.id,
                label.pos.x,
                label.pos.y,
                color_to_hex(label.color)
            )?;
            writeln!(sink, "{}", label.text)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(src: &str) -> Result<LabelLayer, ParseError> {
        let mut cursor = LineCursor::new(src);
        LabelLayer::from_lines(&mut cursor, BLACK)
    }

    #[test]
    fn test_decode_encode_round_trip() {
        let src = "2\nl0 10 20 000000\nhello there\nl1 -5 0 ff0000\n\n";
        let layer = decode(src).unwrap();
        assert_eq!(layer.labels().len(), 2);
        assert_eq!(layer.labels()[0].text, "hello there");
        assert_eq!(layer.labels()[1].text, "");

        let mut out = Vec::new();
        layer.dump(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), src);
    }

    #[test]
    fn test_missing_text_line_fails() {
        assert!(decode("1\nl0 10 20 000000\n").is_err());
    }

    #[test]
    fn test_place_and_type() {
        let mut layer = LabelLayer::new(BLACK);
        let camera = Camera::new(800.0, 600.0);

        layer
            .handle_event(
                &InputEvent::MousePressed {
                    button: MouseButton::Left,
                    pos: vec2(400.0, 300.0),
                },
                &camera,
            )
            .unwrap();
        for ch in "hi".chars() {
            layer.handle_event(&InputEvent::Char(ch), &camera).unwrap();
        }
        layer
            .handle_event(&InputEvent::KeyPressed(KeyCode::Enter), &camera)
            .unwrap();

        assert_eq!(layer.labels().len(), 1);
        assert_eq!(layer.labels()[0].text, "hi");
        assert_eq!(layer.labels()[0].pos, Vec2::ZERO);

        // Committed: further characters are ignored
        layer.handle_event(&InputEvent::Char('x'), &camera).unwrap();
        assert_eq!(layer.labels()[0].text, "hi");
    }
}
