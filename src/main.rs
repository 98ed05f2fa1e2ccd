//! lvledit: a layered 2D level editor
//!
//! Levels are stacks of independently-typed overlays (platforms, lava,
//! boxes, goals, a player spawn, labels, regions, a background color)
//! sharing one camera and one line-oriented save format with an embedded
//! script body. Middle-drag pans, the wheel zooms, `S` saves.

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod camera;
mod editor;
mod input;
mod level;
mod ui;

use macroquad::prelude::*;

use camera::Camera;
use editor::LevelEditor;
use input::InputPump;

fn window_conf() -> Conf {
    Conf {
        window_title: format!("lvledit v{}", VERSION),
        window_width: 1280,
        window_height: 720,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    crashlog::setup!(crashlog::cargo_metadata!().capitalized(), false);

    let mut editor = match std::env::args().nth(1) {
        Some(path) => match LevelEditor::load_from(&*path) {
            Ok(editor) => {
                println!("Loaded level `{}`", path);
                editor
            }
            Err(e) => {
                eprintln!("Failed to load `{}`: {}", path, e);
                std::process::exit(1);
            }
        },
        None => LevelEditor::new(),
    };

    let mut camera = Camera::new(screen_width(), screen_height());
    let mut pump = InputPump::new();

    loop {
        camera.resize(screen_width(), screen_height());
        editor.focus_camera(&mut camera);

        for event in pump.poll() {
            if let Err(e) = editor.handle_event(&event, &camera) {
                eprintln!("Input handling failed: {}", e);
            }
        }

        if let Err(e) = editor.render(&camera) {
            eprintln!("Render failed: {}", e);
        }

        next_frame().await
    }
}
