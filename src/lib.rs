pub mod cli;
pub mod config;
pub mod editor;
#[cfg(feature = "editor")]
pub mod editor_ui;
pub mod error;
pub mod events;
pub mod image_settings;
pub mod resources;
pub mod scripting;

pub use config::AppConfig;
pub use editor::{EditorKind, EditorPanel};
pub use error::EditorError;
