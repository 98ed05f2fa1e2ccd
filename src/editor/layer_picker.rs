//! Layer picker: selects which layer receives editing input
//!
//! A fixed screen-space column of swatches, one per `LayerKind`, at the
//! left edge of the window. Clicks inside a swatch consume the event and
//! change the selection; everything else passes through.

use macroquad::prelude::{Color, MouseButton, Vec2};

use crate::camera::{Camera, RenderError};
use crate::input::InputEvent;
use crate::ui::Rect;

use super::{EditorError, LayerKind};

const CELL_SIZE: f32 = 40.0;
const CELL_GAP: f32 = 8.0;
const MARGIN: f32 = 10.0;

const SELECTED_OUTLINE: Color = Color::new(1.0, 1.0, 1.0, 1.0);
const LABEL_COLOR: Color = Color::new(0.0, 0.0, 0.0, 0.8);

/// Swatch color identifying each layer in the picker
fn swatch_color(kind: LayerKind) -> Color {
    match kind {
        LayerKind::Background => Color::new(1.0, 0.99, 0.65, 1.0),
        LayerKind::Player => Color::new(1.0, 0.5, 0.5, 1.0),
        LayerKind::Platforms => Color::new(0.25, 0.25, 0.25, 1.0),
        LayerKind::BackPlatforms => Color::new(0.55, 0.55, 0.55, 1.0),
        LayerKind::Lava => Color::new(1.0, 0.35, 0.0, 1.0),
        LayerKind::Boxes => Color::new(0.75, 0.5, 0.25, 1.0),
        LayerKind::Goals => Color::new(1.0, 0.84, 0.0, 1.0),
        LayerKind::Regions => Color::new(0.5, 0.0, 1.0, 1.0),
        LayerKind::Labels => Color::new(0.9, 0.9, 0.95, 1.0),
    }
}

#[derive(Debug)]
pub struct LayerPicker {
    selected: LayerKind,
}

impl LayerPicker {
    pub fn new(selected: LayerKind) -> Self {
        Self { selected }
    }

    pub fn selected(&self) -> LayerKind {
        self.selected
    }

    /// Screen-space hit-box of the nth swatch
    pub fn hitbox(index: usize) -> Rect {
        Rect::new(
            MARGIN,
            MARGIN + index as f32 * (CELL_SIZE + CELL_GAP),
            CELL_SIZE,
            CELL_SIZE,
        )
    }

    pub fn render(&self, camera: &Camera) -> Result<(), RenderError> {
        for (i, kind) in LayerKind::ALL.iter().enumerate() {
            let rect = Self::hitbox(i);
            camera.fill_rect_screen(rect, swatch_color(*kind));
            if *kind == self.selected {
                camera.stroke_rect_screen(rect, SELECTED_OUTLINE);
            }
            let initial = &kind.label()[..1];
            camera.render_text_screen(
                initial,
                Vec2::new(rect.x + 14.0, rect.bottom() - 14.0),
                20.0,
                LABEL_COLOR,
            );
        }
        Ok(())
    }

    /// Returns true when the event was a click inside the picker and was
    /// consumed; the caller must not forward consumed events further.
    pub fn handle_event(&mut self, event: &InputEvent) -> Result<bool, EditorError> {
        if let InputEvent::MousePressed {
            button: MouseButton::Left,
            pos,
        } = event
        {
            for (i, kind) in LayerKind::ALL.iter().enumerate() {
                if Self::hitbox(i).contains(pos.x, pos.y) {
                    self.selected = *kind;
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }
}
