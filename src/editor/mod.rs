//! Layered level editor
//!
//! The `LevelEditor` owns one layer per `LayerKind`, the layer picker, the
//! camera pan/zoom state and the save-as sub-state, and composes render /
//! event dispatch across all of them. Exactly one layer is active at a
//! time; while the save-as prompt is open it owns every input event.

mod color_picker;
mod label_layer;
mod layer;
mod layer_picker;
mod player_layer;
mod point_layer;
mod rect_layer;

pub use color_picker::ColorPicker;
pub use label_layer::{Label, LabelLayer};
pub use layer::{Layer, LayerKind};
pub use layer_picker::LayerPicker;
pub use player_layer::PlayerLayer;
pub use point_layer::{PointEntry, PointLayer};
pub use rect_layer::{RectEntry, RectLayer};

use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use macroquad::prelude::*;

use crate::camera::{Camera, RenderError, MIN_ZOOM};
use crate::input::InputEvent;
use crate::level::{LineCursor, LoadError, ParseError};
use crate::ui::{draw_text_field, Rect as ScreenRect, TextInputState};

const DEFAULT_TITLE: &str = "New Level";

// Default colors, matching the classic level palette
const DEFAULT_BACKGROUND_COLOR: Color = Color::new(1.0, 253.0 / 255.0, 165.0 / 255.0, 1.0); // fffda5
const DEFAULT_PLAYER_COLOR: Color = Color::new(1.0, 128.0 / 255.0, 128.0 / 255.0, 1.0); // ff8080
const PLATFORM_COLOR: Color = Color::new(64.0 / 255.0, 64.0 / 255.0, 64.0 / 255.0, 1.0);
const BACK_PLATFORM_COLOR: Color = Color::new(128.0 / 255.0, 128.0 / 255.0, 128.0 / 255.0, 1.0);
const LAVA_COLOR: Color = Color::new(1.0, 90.0 / 255.0, 0.0, 1.0);
const BOX_COLOR: Color = Color::new(191.0 / 255.0, 128.0 / 255.0, 64.0 / 255.0, 1.0);
const GOAL_COLOR: Color = Color::new(1.0, 215.0 / 255.0, 0.0, 1.0);
const REGION_COLOR: Color = Color::new(128.0 / 255.0, 0.0, 1.0, 1.0);
const LABEL_TEXT_COLOR: Color = Color::new(16.0 / 255.0, 16.0 / 255.0, 16.0 / 255.0, 1.0);

const SAVE_AS_FONT_SIZE: f32 = 20.0;
const SAVE_AS_PROMPT_POS: Vec2 = Vec2::new(200.0, 200.0);

/// Error from event handling or rendering
#[derive(Debug)]
pub enum EditorError {
    Io(io::Error),
    Render(RenderError),
}

impl From<io::Error> for EditorError {
    fn from(e: io::Error) -> Self {
        EditorError::Io(e)
    }
}

impl From<RenderError> for EditorError {
    fn from(e: RenderError) -> Self {
        EditorError::Render(e)
    }
}

impl fmt::Display for EditorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditorError::Io(e) => write!(f, "IO error: {}", e),
            EditorError::Render(e) => write!(f, "{}", e),
        }
    }
}

/// The editor's modal state. The filename buffer only exists while the
/// save-as prompt is open, so it cannot be read outside that state.
#[derive(Debug)]
pub enum EditState {
    Editing,
    SaveAs(TextInputState),
}

pub struct LevelEditor {
    title: String,
    background: ColorPicker,
    player: PlayerLayer,
    platforms: RectLayer,
    back_platforms: RectLayer,
    lava: RectLayer,
    boxes: RectLayer,
    goals: PointLayer,
    regions: RectLayer,
    labels: LabelLayer,
    picker: LayerPicker,
    camera_offset: Vec2,
    camera_zoom: f32,
    /// Set at most once: at load, or on the first save-as confirmation
    file_name: Option<PathBuf>,
    /// Trailing script body, preserved byte-for-byte between load and save
    script_source: String,
    state: EditState,
    /// True while the middle mouse button is held (camera pan)
    drag: bool,
}

impl LevelEditor {
    /// Fresh, empty level
    pub fn new() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            background: ColorPicker::new(DEFAULT_BACKGROUND_COLOR),
            player: PlayerLayer::new(Vec2::ZERO, DEFAULT_PLAYER_COLOR),
            platforms: RectLayer::new(PLATFORM_COLOR),
            back_platforms: RectLayer::new(BACK_PLATFORM_COLOR),
            lava: RectLayer::new(LAVA_COLOR),
            boxes: RectLayer::new(BOX_COLOR),
            goals: PointLayer::new(GOAL_COLOR),
            regions: RectLayer::new(REGION_COLOR),
            labels: LabelLayer::new(LABEL_TEXT_COLOR),
            picker: LayerPicker::new(LayerKind::Platforms),
            camera_offset: Vec2::ZERO,
            camera_zoom: 1.0,
            file_name: None,
            script_source: String::new(),
            state: EditState::Editing,
            drag: false,
        }
    }

    /// Decode a level from its textual source. Sections are consumed in
    /// the fixed file order; whatever remains is the script body.
    pub fn from_source(src: &str) -> Result<Self, ParseError> {
        let mut cursor = LineCursor::new(src);
        let title = cursor.next_line()?.to_string();
        let background = ColorPicker::from_lines(&mut cursor)?;
        let player = PlayerLayer::from_lines(&mut cursor)?;
        let platforms = RectLayer::from_lines(&mut cursor, PLATFORM_COLOR)?;
        let goals = PointLayer::from_lines(&mut cursor, GOAL_COLOR)?;
        let lava = RectLayer::from_lines(&mut cursor, LAVA_COLOR)?;
        let back_platforms = RectLayer::from_lines(&mut cursor, BACK_PLATFORM_COLOR)?;
        let boxes = RectLayer::from_lines(&mut cursor, BOX_COLOR)?;
        let labels = LabelLayer::from_lines(&mut cursor, LABEL_TEXT_COLOR)?;
        let regions = RectLayer::from_lines(&mut cursor, REGION_COLOR)?;
        let script_source = cursor.rest().to_string();

        Ok(Self {
            title,
            background,
            player,
            platforms,
            back_platforms,
            lava,
            boxes,
            goals,
            regions,
            labels,
            script_source,
            ..Self::new()
        })
    }

    /// Load a level file. Any section failure aborts the whole load.
    pub fn load_from(path: impl Into<PathBuf>) -> Result<Self, LoadError> {
        let path = path.into();
        let src = fs::read_to_string(&path)?;
        let mut editor = Self::from_source(&src)?;
        editor.file_name = Some(path);
        Ok(editor)
    }

    /// Encode the level in the fixed file order
    pub fn to_bytes(&self) -> io::Result<Vec<u8>> {
        let mut out = Vec::new();
        writeln!(out, "{}", self.title)?;
        self.background.dump(&mut out)?;
        self.player.dump(&mut out)?;
        self.platforms.dump(&mut out)?;
        self.goals.dump(&mut out)?;
        self.lava.dump(&mut out)?;
        self.back_platforms.dump(&mut out)?;
        self.boxes.dump(&mut out)?;
        self.labels.dump(&mut out)?;
        self.regions.dump(&mut out)?;
        out.write_all(self.script_source.as_bytes())?;
        Ok(out)
    }

    /// Write the level to its file. Calling this without a file name is a
    /// programming error; the save-as flow guarantees one is set.
    pub fn dump(&self) -> io::Result<()> {
        let path = self
            .file_name
            .as_ref()
            .expect("dump called without a file name");
        fs::write(path, self.to_bytes()?)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn file_name(&self) -> Option<&Path> {
        self.file_name.as_deref()
    }

    pub fn script_source(&self) -> &str {
        &self.script_source
    }

    pub fn state(&self) -> &EditState {
        &self.state
    }

    pub fn camera_zoom(&self) -> f32 {
        self.camera_zoom
    }

    pub fn camera_offset(&self) -> Vec2 {
        self.camera_offset
    }

    pub fn active_layer(&self) -> LayerKind {
        self.picker.selected()
    }

    pub fn player(&self) -> &PlayerLayer {
        &self.player
    }

    pub fn platforms(&self) -> &RectLayer {
        &self.platforms
    }

    pub fn back_platforms(&self) -> &RectLayer {
        &self.back_platforms
    }

    pub fn lava(&self) -> &RectLayer {
        &self.lava
    }

    pub fn boxes(&self) -> &RectLayer {
        &self.boxes
    }

    pub fn goals(&self) -> &PointLayer {
        &self.goals
    }

    pub fn regions(&self) -> &RectLayer {
        &self.regions
    }

    pub fn labels(&self) -> &LabelLayer {
        &self.labels
    }

    pub fn background_color(&self) -> Color {
        self.background.color()
    }

    fn layer(&self, kind: LayerKind) -> &dyn Layer {
        match kind {
            LayerKind::Background => &self.background,
            LayerKind::Player => &self.player,
            LayerKind::Platforms => &self.platforms,
            LayerKind::BackPlatforms => &self.back_platforms,
            LayerKind::Lava => &self.lava,
            LayerKind::Boxes => &self.boxes,
            LayerKind::Goals => &self.goals,
            LayerKind::Regions => &self.regions,
            LayerKind::Labels => &self.labels,
        }
    }

    fn layer_mut(&mut self, kind: LayerKind) -> &mut dyn Layer {
        match kind {
            LayerKind::Background => &mut self.background,
            LayerKind::Player => &mut self.player,
            LayerKind::Platforms => &mut self.platforms,
            LayerKind::BackPlatforms => &mut self.back_platforms,
            LayerKind::Lava => &mut self.lava,
            LayerKind::Boxes => &mut self.boxes,
            LayerKind::Goals => &mut self.goals,
            LayerKind::Regions => &mut self.regions,
            LayerKind::Labels => &mut self.labels,
        }
    }

    /// Push editor pan/zoom into the camera before a frame
    pub fn focus_camera(&self, camera: &mut Camera) {
        camera.set_center(self.camera_offset);
        camera.set_zoom(self.camera_zoom);
    }

    pub fn render(&self, camera: &Camera) -> Result<(), RenderError> {
        camera.clear(self.background.color());

        for kind in LayerKind::ALL {
            self.layer(kind)
                .render(camera, kind == self.picker.selected())?;
        }

        self.picker.render(camera)?;

        if let EditState::SaveAs(field) = &self.state {
            let prompt = "Save as: ";
            camera.render_text_screen(prompt, SAVE_AS_PROMPT_POS, SAVE_AS_FONT_SIZE, BLACK);
            let prompt_w = measure_text(prompt, None, SAVE_AS_FONT_SIZE as u16, 1.0).width;
            draw_text_field(
                ScreenRect::new(
                    SAVE_AS_PROMPT_POS.x + prompt_w,
                    SAVE_AS_PROMPT_POS.y - SAVE_AS_FONT_SIZE * 0.8,
                    300.0,
                    SAVE_AS_FONT_SIZE + 8.0,
                ),
                field,
                SAVE_AS_FONT_SIZE,
            );
        }

        Ok(())
    }

    pub fn handle_event(&mut self, event: &InputEvent, camera: &Camera) -> Result<(), EditorError> {
        // The save-as prompt owns every event while it is open
        if let EditState::SaveAs(field) = &mut self.state {
            match event {
                InputEvent::Char(ch) => field.insert_char(*ch),
                InputEvent::KeyPressed(KeyCode::Enter) => {
                    let path = PathBuf::from(field.text());
                    fs::write(&path, self.to_bytes()?)?;
                    self.file_name = Some(path);
                    self.state = EditState::Editing;
                }
                InputEvent::KeyPressed(key) => field.handle_key(*key),
                _ => {}
            }
            return Ok(());
        }

        match event {
            InputEvent::KeyPressed(KeyCode::S) => {
                if let Some(path) = &self.file_name {
                    println!("Saving level to `{}`", path.display());
                    self.dump()?;
                } else {
                    self.state = EditState::SaveAs(TextInputState::new(""));
                }
            }
            InputEvent::Wheel { y } => {
                if *y > 0.0 {
                    self.camera_zoom += 0.1;
                } else if *y < 0.0 {
                    self.camera_zoom = (self.camera_zoom - 0.1).max(MIN_ZOOM);
                }
            }
            InputEvent::MousePressed {
                button: MouseButton::Middle,
                ..
            } => self.drag = true,
            InputEvent::MouseReleased {
                button: MouseButton::Middle,
                ..
            } => self.drag = false,
            InputEvent::MouseMoved { pos, delta } => {
                if self.drag {
                    // Recomputed from two screen points every motion event,
                    // so the pan stays correct under mid-drag zoom changes.
                    let next = camera.screen_to_world(*pos);
                    let prev = camera.screen_to_world(*pos + *delta);
                    self.camera_offset += next - prev;
                }
            }
            _ => {}
        }

        if !self.picker.handle_event(event)? {
            let kind = self.picker.selected();
            self.layer_mut(kind).handle_event(event, camera)?;
        }

        Ok(())
    }
}

impl Default for LevelEditor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> Camera {
        Camera::new(800.0, 600.0)
    }

    fn key(code: KeyCode) -> InputEvent {
        InputEvent::KeyPressed(code)
    }

    fn wheel(y: f32) -> InputEvent {
        InputEvent::Wheel { y }
    }

    fn type_str(editor: &mut LevelEditor, camera: &Camera, s: &str) {
        for ch in s.chars() {
            editor.handle_event(&InputEvent::Char(ch), camera).unwrap();
        }
    }

    /// A canonical, byte-exact level source covering every section
    const CANONICAL: &str = "\
My Level
fffda5
0 0 ff8080
2
p0 0 100 400 20 404040
p1 -100 -50 50 50 404040
1
g0 300 40 ffd700
1
l0 -200 200 300 100 ff5a00
0
1
b0 10 10 40 40 bf8040
1
t0 50 -20 101010
welcome!
1
r0 0 0 600 600 8000ff
(defun on-enter ()
  (print \"hi\"))
";

    #[test]
    fn test_from_source_reads_every_section() {
        let editor = LevelEditor::from_source(CANONICAL).unwrap();
        assert_eq!(editor.title(), "My Level");
        assert_eq!(editor.platforms().rects().len(), 2);
        assert_eq!(editor.goals().points().len(), 1);
        assert_eq!(editor.lava().rects().len(), 1);
        assert_eq!(editor.back_platforms().rects().len(), 0);
        assert_eq!(editor.boxes().rects().len(), 1);
        assert_eq!(editor.labels().labels().len(), 1);
        assert_eq!(editor.regions().rects().len(), 1);
        assert_eq!(editor.player().spawn(), vec2(0.0, 0.0));
        assert!(editor.script_source().starts_with("(defun on-enter"));
        assert!(editor.file_name().is_none());
        assert_eq!(crate::level::color_to_hex(editor.background_color()), "fffda5");
    }

    #[test]
    fn test_encode_round_trips_byte_for_byte() {
        let editor = LevelEditor::from_source(CANONICAL).unwrap();
        let bytes = editor.to_bytes().unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), CANONICAL);
    }

    #[test]
    fn test_truncated_section_fails_whole_load() {
        // Count line says 2 but only one data line follows
        let src = "t\nfffda5\n0 0 ff8080\n2\np0 0 0 10 10 404040\n";
        assert!(LevelEditor::from_source(src).is_err());
    }

    #[test]
    fn test_load_from_missing_file() {
        match LevelEditor::load_from("/nonexistent/level.txt") {
            Err(LoadError::Io(_)) => {}
            other => panic!("expected IO error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_zoom_wheel_clamped_at_floor() {
        let mut editor = LevelEditor::new();
        let camera = camera();
        editor.handle_event(&wheel(1.0), &camera).unwrap();
        editor.handle_event(&wheel(1.0), &camera).unwrap();
        assert!((editor.camera_zoom() - 1.2).abs() < 1e-5);
        for _ in 0..30 {
            editor.handle_event(&wheel(-1.0), &camera).unwrap();
        }
        assert_eq!(editor.camera_zoom(), MIN_ZOOM);
    }

    #[test]
    fn test_pan_only_while_dragging() {
        let mut editor = LevelEditor::new();
        let camera = camera();
        let motion = InputEvent::MouseMoved {
            pos: vec2(400.0, 300.0),
            delta: vec2(10.0, 5.0),
        };

        editor.handle_event(&motion, &camera).unwrap();
        assert_eq!(editor.camera_offset(), Vec2::ZERO);

        editor
            .handle_event(
                &InputEvent::MousePressed {
                    button: MouseButton::Middle,
                    pos: vec2(400.0, 300.0),
                },
                &camera,
            )
            .unwrap();
        editor.handle_event(&motion, &camera).unwrap();
        // At zoom 1 the world delta is the negated screen delta
        assert_eq!(editor.camera_offset(), vec2(-10.0, -5.0));

        editor
            .handle_event(
                &InputEvent::MouseReleased {
                    button: MouseButton::Middle,
                    pos: vec2(400.0, 300.0),
                },
                &camera,
            )
            .unwrap();
        editor.handle_event(&motion, &camera).unwrap();
        assert_eq!(editor.camera_offset(), vec2(-10.0, -5.0));
    }

    #[test]
    fn test_save_as_flow_writes_file_and_fixes_identity() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("foo.lvl");

        let mut editor = LevelEditor::new();
        let camera = camera();

        editor.handle_event(&key(KeyCode::S), &camera).unwrap();
        assert!(matches!(editor.state(), EditState::SaveAs(_)));

        type_str(&mut editor, &camera, path.to_str().unwrap());
        editor.handle_event(&key(KeyCode::Enter), &camera).unwrap();

        assert!(matches!(editor.state(), EditState::Editing));
        assert_eq!(editor.file_name(), Some(path.as_path()));
        assert!(path.exists());

        // A later save goes straight to disk, identity unchanged
        editor.handle_event(&key(KeyCode::S), &camera).unwrap();
        assert!(matches!(editor.state(), EditState::Editing));
        assert_eq!(editor.file_name(), Some(path.as_path()));
    }

    #[test]
    fn test_save_as_owns_all_input() {
        let mut editor = LevelEditor::new();
        let camera = camera();
        editor.handle_event(&key(KeyCode::S), &camera).unwrap();

        // Zoom, picker and layers are all untouched while prompting
        editor.handle_event(&wheel(1.0), &camera).unwrap();
        assert_eq!(editor.camera_zoom(), 1.0);

        let picker_rect = LayerPicker::hitbox(4);
        editor
            .handle_event(
                &InputEvent::MousePressed {
                    button: MouseButton::Left,
                    pos: vec2(picker_rect.x + 1.0, picker_rect.y + 1.0),
                },
                &camera,
            )
            .unwrap();
        assert_eq!(editor.active_layer(), LayerKind::Platforms);

        for event in [
            InputEvent::MousePressed {
                button: MouseButton::Left,
                pos: vec2(400.0, 300.0),
            },
            InputEvent::MouseMoved {
                pos: vec2(450.0, 350.0),
                delta: vec2(50.0, 50.0),
            },
            InputEvent::MouseReleased {
                button: MouseButton::Left,
                pos: vec2(450.0, 350.0),
            },
        ] {
            editor.handle_event(&event, &camera).unwrap();
        }
        assert!(editor.platforms().rects().is_empty());
    }

    #[test]
    fn test_picker_consumes_clicks_before_layers() {
        let mut editor = LevelEditor::new();
        let camera = camera();

        let rect = LayerPicker::hitbox(6); // Goals
        editor
            .handle_event(
                &InputEvent::MousePressed {
                    button: MouseButton::Left,
                    pos: vec2(rect.x + 2.0, rect.y + 2.0),
                },
                &camera,
            )
            .unwrap();
        assert_eq!(editor.active_layer(), LayerKind::Goals);
        // The click that changed layers did not also place a goal
        assert!(editor.goals().points().is_empty());
    }

    #[test]
    fn test_edited_level_survives_dump_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("edited.lvl");
        let camera = camera();

        let mut editor = LevelEditor::new();
        // Drag out a platform
        for event in [
            InputEvent::MousePressed {
                button: MouseButton::Left,
                pos: vec2(400.0, 300.0),
            },
            InputEvent::MouseMoved {
                pos: vec2(520.0, 340.0),
                delta: vec2(120.0, 40.0),
            },
            InputEvent::MouseReleased {
                button: MouseButton::Left,
                pos: vec2(520.0, 340.0),
            },
        ] {
            editor.handle_event(&event, &camera).unwrap();
        }
        // Switch to goals and place one
        let goals_rect = LayerPicker::hitbox(6);
        editor
            .handle_event(
                &InputEvent::MousePressed {
                    button: MouseButton::Left,
                    pos: vec2(goals_rect.x + 2.0, goals_rect.y + 2.0),
                },
                &camera,
            )
            .unwrap();
        editor
            .handle_event(
                &InputEvent::MousePressed {
                    button: MouseButton::Left,
                    pos: vec2(600.0, 200.0),
                },
                &camera,
            )
            .unwrap();

        editor.handle_event(&key(KeyCode::S), &camera).unwrap();
        type_str(&mut editor, &camera, path.to_str().unwrap());
        editor.handle_event(&key(KeyCode::Enter), &camera).unwrap();

        let loaded = LevelEditor::load_from(&path).unwrap();
        assert_eq!(loaded.title(), editor.title());
        assert_eq!(loaded.platforms().rects().len(), 1);
        assert_eq!(
            loaded.platforms().rects()[0].rect,
            editor.platforms().rects()[0].rect
        );
        assert_eq!(loaded.goals().points().len(), 1);
        assert_eq!(loaded.script_source(), editor.script_source());
        assert_eq!(loaded.file_name(), Some(path.as_path()));
    }
}
