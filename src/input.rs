//! Abstracted input events
//!
//! The editor never reads platform input directly; the host loop pumps
//! macroquad state once per frame and hands the editor this closed set of
//! events, one at a time and in order.

use macroquad::prelude::*;

/// One input event, with positions in screen coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    MousePressed { button: MouseButton, pos: Vec2 },
    MouseReleased { button: MouseButton, pos: Vec2 },
    MouseMoved { pos: Vec2, delta: Vec2 },
    Wheel { y: f32 },
    KeyPressed(KeyCode),
    Char(char),
}

/// Converts macroquad's per-frame input state into `InputEvent`s
pub struct InputPump {
    last_mouse: Vec2,
}

impl InputPump {
    pub fn new() -> Self {
        Self {
            last_mouse: mouse_position().into(),
        }
    }

    pub fn poll(&mut self) -> Vec<InputEvent> {
        let mut events = Vec::new();
        let pos: Vec2 = mouse_position().into();

        for button in [MouseButton::Left, MouseButton::Middle, MouseButton::Right] {
            if is_mouse_button_pressed(button) {
                events.push(InputEvent::MousePressed { button, pos });
            }
            if is_mouse_button_released(button) {
                events.push(InputEvent::MouseReleased { button, pos });
            }
        }

        if pos != self.last_mouse {
            events.push(InputEvent::MouseMoved {
                pos,
                delta: pos - self.last_mouse,
            });
            self.last_mouse = pos;
        }

        let (_, wheel_y) = mouse_wheel();
        if wheel_y != 0.0 {
            events.push(InputEvent::Wheel { y: wheel_y });
        }

        // Characters before key presses: a key that opens the save-as prompt
        // must not also type its own character into the fresh buffer.
        while let Some(ch) = get_char_pressed() {
            // Filter control characters
            if ch >= ' ' && ch != '\u{7f}' {
                events.push(InputEvent::Char(ch));
            }
        }

        let mut keys: Vec<KeyCode> = get_keys_pressed().into_iter().collect();
        keys.sort_by_key(|k| *k as u32);
        for key in keys {
            events.push(InputEvent::KeyPressed(key));
        }

        events
    }
}
