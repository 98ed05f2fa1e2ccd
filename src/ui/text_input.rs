//! Single-line text field with cursor handling
//!
//! Unlike an immediate-mode widget this field is event-driven: the owner
//! feeds it decoded characters and key presses one at a time, and drawing
//! is a separate read-only pass.

use macroquad::prelude::*;

use super::Rect;

/// State for a single-line text field
#[derive(Debug, Clone)]
pub struct TextInputState {
    text: String,
    /// Cursor position (byte index)
    cursor: usize,
}

impl TextInputState {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = text.len();
        Self { text, cursor }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Insert a character at the cursor
    pub fn insert_char(&mut self, ch: char) {
        self.text.insert(self.cursor, ch);
        self.cursor += ch.len_utf8();
    }

    /// Previous character boundary before the cursor
    fn prev_boundary(&self) -> usize {
        self.text[..self.cursor]
            .char_indices()
            .next_back()
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    /// Next character boundary after the cursor
    fn next_boundary(&self) -> usize {
        self.text[self.cursor..]
            .char_indices()
            .nth(1)
            .map(|(i, _)| self.cursor + i)
            .unwrap_or(self.text.len())
    }

    /// Delete the character before the cursor
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            let prev = self.prev_boundary();
            self.text.drain(prev..self.cursor);
            self.cursor = prev;
        }
    }

    /// Delete the character after the cursor
    pub fn delete(&mut self) {
        if self.cursor < self.text.len() {
            let next = self.next_boundary();
            self.text.drain(self.cursor..next);
        }
    }

    /// Apply a cursor-movement or deletion key
    pub fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Left => {
                if self.cursor > 0 {
                    self.cursor = self.prev_boundary();
                }
            }
            KeyCode::Right => {
                if self.cursor < self.text.len() {
                    self.cursor = self.next_boundary();
                }
            }
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.text.len(),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete(),
            _ => {}
        }
    }
}

const INPUT_BG: Color = Color::new(0.12, 0.12, 0.14, 1.0);
const INPUT_BORDER: Color = Color::new(0.0, 0.75, 0.9, 1.0);
const INPUT_TEXT: Color = Color::new(0.9, 0.9, 0.95, 1.0);

/// Draw the field. Pure rendering; input goes through the state methods.
pub fn draw_text_field(rect: Rect, state: &TextInputState, font_size: f32) {
    draw_rectangle(rect.x, rect.y, rect.w, rect.h, INPUT_BG);
    draw_rectangle_lines(rect.x, rect.y, rect.w, rect.h, 1.0, INPUT_BORDER);

    let padding = 8.0;
    let text_x = rect.x + padding;
    let text_y = rect.y + (rect.h + font_size * 0.7) / 2.0;
    draw_text(state.text(), text_x, text_y, font_size, INPUT_TEXT);

    let before_cursor = &state.text()[..state.cursor];
    let cursor_x = text_x + measure_text(before_cursor, None, font_size as u16, 1.0).width;
    draw_line(
        cursor_x,
        rect.y + 4.0,
        cursor_x,
        rect.bottom() - 4.0,
        1.5,
        INPUT_TEXT,
    );
}
