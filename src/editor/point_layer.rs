//! Point layer: a list of colored world-space points (goals)

use std::io::{self, Write};

use macroquad::prelude::*;

use crate::camera::{Camera, RenderError};
use crate::input::InputEvent;
use crate::level::{
    color_to_hex, parse_color, parse_count, parse_float, parse_id, LineCursor, ParseError,
};

use super::{EditorError, Layer};

/// Drawn radius and pick radius of a point, world units
pub const POINT_RADIUS: f32 = 10.0;

const ACTIVE_OUTLINE: Color = Color::new(1.0, 1.0, 1.0, 0.8);

#[derive(Debug, Clone)]
pub struct PointEntry {
    pub id: String,
    pub pos: Vec2,
    pub color: Color,
}

#[derive(Debug)]
pub struct PointLayer {
    points: Vec<PointEntry>,
    create_color: Color,
    /// Last known pointer position, world space
    cursor: Vec2,
    next_id: usize,
}

impl PointLayer {
    pub fn new(create_color: Color) -> Self {
        Self {
            points: Vec::new(),
            create_color,
            cursor: Vec2::ZERO,
            next_id: 0,
        }
    }

    /// Decode one point section: a count line, then `id x y colorHex`
    /// per point.
    pub fn from_lines(cursor: &mut LineCursor, create_color: Color) -> Result<Self, ParseError> {
        let count = parse_count(cursor)?;
        let mut points = Vec::with_capacity(count);
        for _ in 0..count {
            let line = cursor.next_line()?;
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() != 4 {
                return Err(cursor.error(format!(
                    "expected `id x y color`, got {} fields",
                    fields.len()
                )));
            }
            points.push(PointEntry {
                id: parse_id(cursor, fields[0])?,
                pos: vec2(
                    parse_float(cursor, fields[1])?,
                    parse_float(cursor, fields[2])?,
                ),
                color: parse_color(cursor, fields[3])?,
            });
        }
        let mut layer = Self::new(create_color);
        layer.next_id = points.len();
        layer.points = points;
        Ok(layer)
    }

    pub fn points(&self) -> &[PointEntry] {
        &self.points
    }

    pub fn add(&mut self, pos: Vec2, color: Color) {
        let id = format!("point_{}", self.next_id);
        self.next_id += 1;
        self.points.push(PointEntry { id, pos, color });
    }

    fn point_at(&self, pos: Vec2) -> Option<usize> {
        self.points
            .iter()
            .position(|entry| entry.pos.distance(pos) <= POINT_RADIUS)
    }

    fn bounds(entry: &PointEntry) -> Rect {
        Rect::new(
            entry.pos.x - POINT_RADIUS,
            entry.pos.y - POINT_RADIUS,
            POINT_RADIUS * 2.0,
            POINT_RADIUS * 2.0,
        )
    }
}

impl Layer for PointLayer {
    fn render(&self, camera: &Camera, active: bool) -> Result<(), RenderError> {
        for entry in &self.points {
            camera.fill_rect(Self::bounds(entry), entry.color);
            if active {
                camera.stroke_rect(Self::bounds(entry), ACTIVE_OUTLINE);
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
                let color = self.create_color;
                self.add(world, color);
            }
            InputEvent::MouseMoved { pos, .. } => {
                self.cursor = camera.screen_to_world(*pos);
            }
            InputEvent::KeyPressed(KeyCode::Delete) => {
                if let Some(i) = self.point_at(self.cursor) {
                    self.points.remove(i);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn dump(&self, sink: &mut dyn io::Write) -> io::Result<()> {
        writeln!(sink, "{}", self.points.len())?;
        for entry in &self.points {
            writeln!(
                sink,
                "{} {} {} {}",
                entry.id,
                entry.pos.x,
                entry.pos.y,
                color_to_hex(entry.color)
            )?;
        }
        Ok(())
    }
}
