//! Rectangle layer: platforms, back-platforms, lava, boxes and regions
//! all own a list of colored axis-aligned rectangles.

use std::io::{self, Write};

use macroquad::prelude::*;

use crate::camera::{Camera, RenderError};
use crate::input::InputEvent;
use crate::level::{
    color_to_hex, parse_color, parse_count, parse_float, parse_id, LineCursor, ParseError,
};

use super::{EditorError, Layer};

const ACTIVE_OUTLINE: Color = Color::new(1.0, 1.0, 1.0, 0.8);

#[derive(Debug, Clone)]
pub struct RectEntry {
    /// Opaque label; read and written verbatim, otherwise unused
    pub id: String,
    pub rect: Rect,
    pub color: Color,
}

#[derive(Debug)]
pub struct RectLayer {
    rects: Vec<RectEntry>,
    /// Color given to newly created rectangles
    create_color: Color,
    /// Anchor corner of the rectangle being dragged out, if any
    creating: Option<(Vec2, Rect)>,
    /// Last known pointer position, world space
    cursor: Vec2,
    next_id: usize,
}

impl RectLayer {
    pub fn new(create_color: Color) -> Self {
        Self {
            rects: Vec::new(),
            create_color,
            creating: None,
            cursor: Vec2::ZERO,
            next_id: 0,
        }
    }

    /// Decode one rect section: a count line, then `id x y w h colorHex`
    /// per rectangle.
    pub fn from_lines(cursor: &mut LineCursor, create_color: Color) -> Result<Self, ParseError> {
        let count = parse_count(cursor)?;
        let mut rects = Vec::with_capacity(count);
        for _ in 0..count {
            let line = cursor.next_line()?;
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() != 6 {
                return Err(cursor.error(format!(
                    "expected `id x y w h color`, got {} fields",
                    fields.len()
                )));
            }
            rects.push(RectEntry {
                id: parse_id(cursor, fields[0])?,
                rect: Rect::new(
                    parse_float(cursor, fields[1])?,
                    parse_float(cursor, fields[2])?,
                    parse_float(cursor, fields[3])?,
                    parse_float(cursor, fields[4])?,
                ),
                color: parse_color(cursor, fields[5])?,
            });
        }
        let mut layer = Self::new(create_color);
        layer.next_id = rects.len();
        layer.rects = rects;
        Ok(layer)
    }

    pub fn rects(&self) -> &[RectEntry] {
        &self.rects
    }

    pub fn add(&mut self, rect: Rect, color: Color) {
        let id = format!("rect_{}", self.next_id);
        self.next_id += 1;
        self.rects.push(RectEntry { id, rect, color });
    }

    fn rect_at(&self, pos: Vec2) -> Option<usize> {
        self.rects.iter().position(|entry| entry.rect.contains(pos))
    }

    /// Rectangle spanned by two opposite corners
    fn span(a: Vec2, b: Vec2) -> Rect {
        Rect::new(a.x.min(b.x), a.y.min(b.y), (b.x - a.x).abs(), (b.y - a.y).abs())
    }
}

impl Layer for RectLayer {
    fn render(&self, camera: &Camera, active: bool) -> Result<(), RenderError> {
        for entry in &self.rects {
            camera.fill_rect(entry.rect, entry.color);
            if active {
                camera.stroke_rect(entry.rect, ACTIVE_OUTLINE);
            }
        }
        if active {
            if let Some((_, rect)) = self.creating {
                camera.stroke_rect(rect, ACTIVE_OUTLINE);
            }
        }
        Ok(())
    }

    fn handle_event(&mut self, event: &InputEvent, camera: &Camera) -> Result<(), EditorError> {
        match event {
            InputEvent::MousePressed {
                button: MouseButton::Left,
                pos,
            } => {
                let world = camera.screen_to_world(*pos);
                self.creating = Some((world, Rect::new(world.x, world.y, 0.0, 0.0)));
            }
            InputEvent::MouseMoved { pos, .. } => {
                self.cursor = camera.screen_to_world(*pos);
                if let Some((anchor, rect)) = &mut self.creating {
                    *rect = Self::span(*anchor, self.cursor);
                }
            }
            InputEvent::MouseReleased {
                button: MouseButton::Left,
                pos,
            } => {
                if let Some((anchor, _)) = self.creating.take() {
                    let rect = Self::span(anchor, camera.screen_to_world(*pos));
                    if rect.w > 0.0 && rect.h > 0.0 {
                        let color = self.create_color;
                        self.add(rect, color);
                    }
                }
            }
            InputEvent::KeyPressed(KeyCode::Delete) => {
                if let Some(i) = self.rect_at(self.cursor) {
                    self.rects.remove(i);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn dump(&self, sink: &mut dyn io::Write) -> io::Result<()> {
        writeln!(sink, "{}", self.rects.len())?;
        for entry in &self.rects {
            writeln!(
                sink,
                "{} {} {} {} {} {}",
                entry.id,
                entry.rect.x,
                entry.rect.y,
                entry.rect.w,
                entry.rect.h,
                color_to_hex(entry.color)
            )?;
        }
        Ok(())
    }
}
