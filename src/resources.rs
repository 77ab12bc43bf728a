use std::fs;
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::PathsConfig;

/// Where game data lives on disk. Passed explicitly to whoever needs to resolve assets.
#[derive(Debug, Clone)]
pub struct ResourcePaths {
    data_dir: PathBuf,
    pixmaps_dir: PathBuf,
}

impl ResourcePaths {
    pub fn new(data_dir: impl Into<PathBuf>, pixmaps_dir: impl AsRef<Path>) -> Self {
        let data_dir = data_dir.into();
        let pixmaps_dir = data_dir.join(pixmaps_dir);
        Self { data_dir, pixmaps_dir }
    }

    pub fn from_config(paths: &PathsConfig) -> Self {
        Self::new(&paths.data_dir, &paths.pixmaps_dir)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn pixmaps_dir(&self) -> &Path {
        &self.pixmaps_dir
    }

    pub fn data_file(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.data_dir.join(relative)
    }

    pub fn game_pixmap(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.pixmaps_dir.join(relative)
    }

    /// Companion settings file of a pixmap: same path, extension swapped.
    pub fn settings_path_for(&self, relative: impl AsRef<Path>, settings_extension: &str) -> PathBuf {
        let mut path = self.game_pixmap(relative);
        path.set_extension(settings_extension);
        path
    }

    /// `/`-joined path of `path` below the pixmaps root, or `None` if it lies elsewhere.
    pub fn relative_pixmap_path(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.pixmaps_dir).ok()?;
        let parts = relative
            .components()
            .map(|component| match component {
                Component::Normal(part) => part.to_str(),
                _ => None,
            })
            .collect::<Option<Vec<_>>>()?;
        Some(parts.join("/"))
    }

    /// Every pixmap below the pixmaps root with the given extension, sorted by path.
    pub fn pixmap_files(&self, extension: &str) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        collect_files(&self.pixmaps_dir, extension, &mut files)?;
        files.sort();
        Ok(files)
    }
}

fn collect_files(dir: &Path, extension: &str, out: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir).with_context(|| format!("Scanning {}", dir.display()))? {
        let entry = entry?;
        let path = entry.path();
        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            collect_files(&path, extension, out)?;
        } else if file_type.is_file()
            && path.extension().and_then(|ext| ext.to_str()).is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
        {
            out.push(path);
        }
    }
    Ok(())
}
