//! Screen-space UI support for the editor
//!
//! - Rectangle-based layout and hit testing
//! - Event-driven single-line text field (save-as filename entry)

mod rect;
mod text_input;

pub use rect::*;
pub use text_input::*;
