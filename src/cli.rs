use crate::config::AppConfigOverrides;
use crate::editor::EditorKind;
use anyhow::{anyhow, bail, Context, Result};
use std::env;
use std::path::PathBuf;

pub const DEFAULT_CONFIG_PATH: &str = "config/editor.json";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CliOverrides {
    config: Option<PathBuf>,
    editor: Option<EditorKind>,
    data_dir: Option<PathBuf>,
    fade: Option<f32>,
}

impl CliOverrides {
    pub fn parse_from_env() -> Result<Self> {
        Self::parse(env::args())
    }

    pub fn parse<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut overrides = CliOverrides::default();
        let mut args = args.into_iter().skip(1);
        while let Some(arg) = args.next() {
            let flag = arg.as_ref();
            let Some(key) = flag.strip_prefix("--") else {
                bail!("Unexpected argument '{flag}'. Use --config/--editor/--data-dir/--fade with values.");
            };
            let value = match args.next() {
                Some(value) => value.as_ref().to_string(),
                None => bail!("Expected a value after '{flag}'"),
            };
            match key {
                "config" => overrides.config = Some(PathBuf::from(value)),
                "editor" => {
                    overrides.editor = Some(
                        EditorKind::from_name(&value)
                            .ok_or_else(|| anyhow!("Invalid editor '{value}'. Use level or world."))?,
                    );
                }
                "data-dir" => overrides.data_dir = Some(PathBuf::from(value)),
                "fade" => {
                    let fade = value.parse::<f32>().with_context(|| format!("Invalid fade duration '{value}'"))?;
                    if !fade.is_finite() || fade <= 0.0 {
                        bail!("Fade duration must be a positive number of seconds, got '{value}'");
                    }
                    overrides.fade = Some(fade);
                }
                _ => bail!("Unknown flag '{flag}'. Supported flags: --config, --editor, --data-dir, --fade."),
            }
        }
        Ok(overrides)
    }

    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    pub fn editor_kind(&self) -> EditorKind {
        self.editor.unwrap_or(EditorKind::Level)
    }

    pub fn into_config_overrides(self) -> AppConfigOverrides {
        AppConfigOverrides { data_dir: self.data_dir, fade_duration_secs: self.fade }
    }
}
