use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::editor::{EditorKind, PaletteLayout};

#[derive(Debug, Clone, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "PathsConfig::default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "PathsConfig::default_pixmaps_dir")]
    pub pixmaps_dir: PathBuf,
    #[serde(default = "PathsConfig::default_level_menu")]
    pub level_menu: PathBuf,
    #[serde(default = "PathsConfig::default_world_menu")]
    pub world_menu: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EditorConfig {
    #[serde(default = "EditorConfig::default_fade_duration")]
    pub fade_duration_secs: f32,
    #[serde(default = "EditorConfig::default_docked_x")]
    pub docked_x: f32,
    #[serde(default = "EditorConfig::default_retracted_x")]
    pub retracted_x: f32,
    #[serde(default = "EditorConfig::default_resting_opacity")]
    pub resting_opacity: f32,
    #[serde(default = "EditorConfig::default_asset_extension")]
    pub asset_extension: String,
    #[serde(default = "EditorConfig::default_settings_extension")]
    pub settings_extension: String,
    #[serde(default)]
    pub palette: PaletteLayout,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub editor: EditorConfig,
}

#[derive(Debug, Clone, Default)]
pub struct AppConfigOverrides {
    pub data_dir: Option<PathBuf>,
    pub fade_duration_secs: Option<f32>,
}

impl PathsConfig {
    fn default_data_dir() -> PathBuf {
        PathBuf::from("data")
    }

    fn default_pixmaps_dir() -> PathBuf {
        PathBuf::from("pixmaps")
    }

    fn default_level_menu() -> PathBuf {
        PathBuf::from("editor/level_menu.xml")
    }

    fn default_world_menu() -> PathBuf {
        PathBuf::from("editor/world_menu.xml")
    }

    /// Menu file of the given editor, relative to the data directory.
    pub fn menu_file(&self, kind: EditorKind) -> &Path {
        match kind {
            EditorKind::Level => &self.level_menu,
            EditorKind::World => &self.world_menu,
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_dir: Self::default_data_dir(),
            pixmaps_dir: Self::default_pixmaps_dir(),
            level_menu: Self::default_level_menu(),
            world_menu: Self::default_world_menu(),
        }
    }
}

impl EditorConfig {
    // Two seconds: the fade used to last `2 * speedfactor_fps` frames at a nominal 32 fps.
    const fn default_fade_duration() -> f32 {
        2.0
    }

    const fn default_docked_x() -> f32 {
        0.0
    }

    const fn default_retracted_x() -> f32 {
        -0.19
    }

    const fn default_resting_opacity() -> f32 {
        1.0
    }

    fn default_asset_extension() -> String {
        "png".to_string()
    }

    fn default_settings_extension() -> String {
        "settings".to_string()
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            fade_duration_secs: Self::default_fade_duration(),
            docked_x: Self::default_docked_x(),
            retracted_x: Self::default_retracted_x(),
            resting_opacity: Self::default_resting_opacity(),
            asset_extension: Self::default_asset_extension(),
            settings_extension: Self::default_settings_extension(),
            palette: PaletteLayout::default(),
        }
    }
}

impl AppConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes =
            fs::read(path).with_context(|| format!("Failed to read config file {}", path.display()))?;
        let cfg = serde_json::from_slice(&bytes)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(cfg)
    }

    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(cfg) => cfg,
            Err(err) => {
                log::warn!("Config load error: {err:?}. Falling back to defaults.");
                Self::default()
            }
        }
    }

    pub fn apply_overrides(&mut self, overrides: &AppConfigOverrides) {
        if let Some(data_dir) = &overrides.data_dir {
            self.paths.data_dir = data_dir.clone();
        }
        if let Some(fade) = overrides.fade_duration_secs {
            self.editor.fade_duration_secs = fade;
        }
    }
}

impl AppConfigOverrides {
    pub fn is_empty(&self) -> bool {
        self.data_dir.is_none() && self.fade_duration_secs.is_none()
    }

    pub fn applied_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.data_dir.is_some() {
            fields.push("data_dir");
        }
        if self.fade_duration_secs.is_some() {
            fields.push("fade_duration_secs");
        }
        fields
    }
}
