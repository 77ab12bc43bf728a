use std::fs;
use std::path::Path;

use indexmap::IndexSet;

use crate::editor::split_tags;
use crate::error::{EditorError, EditorResult};

/// Contents of an image's companion `.settings` file.
///
/// The format is line based: each non-blank line is `key value...`, `#` starts a comment.
/// Keys the editor does not care about are skipped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssetSettings {
    pub name: String,
    pub author: Option<String>,
    pub editor_tags: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub kind: Option<String>,
    pub obsolete: bool,
}

impl AssetSettings {
    pub fn load(path: impl AsRef<Path>) -> EditorResult<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path)
            .map_err(|source| EditorError::SettingsRead { path: path.to_path_buf(), source })?;
        let mut settings = Self::parse(&source, path)?;
        if settings.name.is_empty() {
            settings.name = path.file_stem().map(|stem| stem.to_string_lossy().into_owned()).unwrap_or_default();
        }
        Ok(settings)
    }

    /// `origin` is only used to label errors.
    pub fn parse(source: &str, origin: &Path) -> EditorResult<Self> {
        let mut settings = AssetSettings::default();
        for (idx, raw_line) in source.lines().enumerate() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (key, value) = match line.split_once(char::is_whitespace) {
                Some((key, value)) => (key, value.trim()),
                None => (line, ""),
            };
            let parse_error =
                |message: String| EditorError::SettingsParse { path: origin.to_path_buf(), line: idx + 1, message };
            match key {
                "name" => settings.name = value.to_string(),
                "author" => settings.author = Some(value.to_string()),
                "editor_tags" => settings.editor_tags = value.to_string(),
                "width" => {
                    settings.width =
                        Some(value.parse().map_err(|_| parse_error(format!("invalid width '{value}'")))?);
                }
                "height" => {
                    settings.height =
                        Some(value.parse().map_err(|_| parse_error(format!("invalid height '{value}'")))?);
                }
                "type" => settings.kind = Some(value.to_string()),
                "obsolete" => {
                    settings.obsolete = match value {
                        "" | "1" | "true" => true,
                        "0" | "false" => false,
                        other => return Err(parse_error(format!("invalid obsolete flag '{other}'"))),
                    };
                }
                other => log::debug!("{}: ignoring settings key '{other}'", origin.display()),
            }
        }
        Ok(settings)
    }

    pub fn tags(&self) -> IndexSet<String> {
        split_tags(&self.editor_tags)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.editor_tags.split(';').any(|candidate| candidate.trim() == tag)
    }

    pub fn size(&self) -> Option<(u32, u32)> {
        Some((self.width?, self.height?))
    }
}
