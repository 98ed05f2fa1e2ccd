//! Uniform layer capability interface

use std::io;

use crate::camera::{Camera, RenderError};
use crate::input::InputEvent;

use super::EditorError;

/// One overlay kind in a level. Every structurally different layer
/// implements the same capability set so the editor can dispatch over all
/// of them without knowing the concrete kind.
pub trait Layer {
    /// Draw all owned entities; `active` layers may add editing affordances
    fn render(&self, camera: &Camera, active: bool) -> Result<(), RenderError>;

    /// Apply one input event, mapping screen coordinates through `camera`.
    /// A layer only ever mutates its own entities.
    fn handle_event(&mut self, event: &InputEvent, camera: &Camera) -> Result<(), EditorError>;

    /// Write this layer's section of the level file. The inverse lives in
    /// each concrete type's `from_lines` constructor.
    fn dump(&self, sink: &mut dyn io::Write) -> io::Result<()>;
}

/// The closed set of overlay categories a level always has exactly one of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerKind {
    Background,
    Player,
    Platforms,
    BackPlatforms,
    Lava,
    Boxes,
    Goals,
    Regions,
    Labels,
}

impl LayerKind {
    pub const ALL: [LayerKind; 9] = [
        LayerKind::Background,
        LayerKind::Player,
        LayerKind::Platforms,
        LayerKind::BackPlatforms,
        LayerKind::Lava,
        LayerKind::Boxes,
        LayerKind::Goals,
        LayerKind::Regions,
        LayerKind::Labels,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            LayerKind::Background => "Background",
            LayerKind::Player => "Player",
            LayerKind::Platforms => "Platforms",
            LayerKind::BackPlatforms => "Back Platforms",
            LayerKind::Lava => "Lava",
            LayerKind::Boxes => "Boxes",
            LayerKind::Goals => "Goals",
            LayerKind::Regions => "Regions",
            LayerKind::Labels => "Labels",
        }
    }
}
