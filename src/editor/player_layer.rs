//! Player layer: the single spawn point and the player's color

use std::io::{self, Write};

use macroquad::prelude::*;

use crate::camera::{Camera, RenderError};
use crate::input::InputEvent;
use crate::level::{color_to_hex, parse_color, parse_float, LineCursor, ParseError};

use super::{EditorError, Layer};

/// Player hitbox size, world units
const PLAYER_SIZE: f32 = 25.0;

const ACTIVE_OUTLINE: Color = Color::new(1.0, 1.0, 1.0, 0.8);

#[derive(Debug)]
pub struct PlayerLayer {
    spawn: Vec2,
    color: Color,
}

impl PlayerLayer {
    pub fn new(spawn: Vec2, color: Color) -> Self {
        Self { spawn, color }
    }

    /// Decode the player section: one `x y colorHex` line
    pub fn from_lines(cursor: &mut LineCursor) -> Result<Self, ParseError> {
        let line = cursor.next_line()?;
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 3 {
            return Err(cursor.error(format!(
                "expected `x y color`, got {} fields",
                fields.len()
            )));
        }
        Ok(Self {
            spawn: vec2(
                parse_float(cursor, fields[0])?,
                parse_float(cursor, fields[1])?,
            ),
            color: parse_color(cursor, fields[2])?,
        })
    }

    pub fn spawn(&self) -> Vec2 {
        self.spawn
    }

    pub fn color(&self) -> Color {
        self.color
    }

    fn hitbox(&self) -> Rect {
        Rect::new(self.spawn.x, self.spawn.y, PLAYER_SIZE, PLAYER_SIZE)
    }
}

impl Layer for PlayerLayer {
    fn render(&self, camera: &Camera, active: bool) -> Result<(), RenderError> {
        camera.fill_rect(self.hitbox(), self.color);
        if active {
            camera.stroke_rect(self.hitbox(), ACTIVE_OUTLINE);
        }
        Ok(())
    }

    fn handle_event(&mut self, event: &InputEvent, camera: &Camera) -> Result<(), EditorError> {
        if let InputEvent::MousePressed {
            button: MouseButton::Left,
            pos,
        } = event
        {
            self.spawn = camera.screen_to_world(*pos);
        }
        Ok(())
    }

    fn dump(&self, sink: &mut dyn io::Write) -> io::Result<()> {
        writeln!(
            sink,
            "{} {} {}",
            self.spawn.x,
            self.spawn.y,
            color_to_hex(self.color)
        )
    }
}
