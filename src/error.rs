use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("Failed to read menu file {}", .path.display())]
    MenuRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed menu XML: {0}")]
    MenuXml(String),
    #[error("Menu item #{index}: {message}")]
    MenuItem { index: usize, message: String },
    #[error("Menu entry '{entry}' requires the editor master tag '{tag}'")]
    MasterTagInMenu { entry: String, tag: String },
    #[error("Element '{0}' not in editor menu list!")]
    MenuEntryNotFound(String),
    #[error("Failed to read settings file {}", .path.display())]
    SettingsRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{}:{line}: {message}", .path.display())]
    SettingsParse { path: PathBuf, line: usize, message: String },
}

pub type EditorResult<T> = Result<T, EditorError>;
