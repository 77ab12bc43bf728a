use serde::Deserialize;

use crate::image_settings::AssetSettings;

/// Geometry of a palette row: a label, a square thumbnail below it, then a gap.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PaletteLayout {
    #[serde(default = "PaletteLayout::default_label_height")]
    pub label_height: f32,
    #[serde(default = "PaletteLayout::default_image_size")]
    pub image_size: f32,
    #[serde(default = "PaletteLayout::default_row_gap")]
    pub row_gap: f32,
}

impl PaletteLayout {
    const fn default_label_height() -> f32 {
        24.0
    }

    const fn default_image_size() -> f32 {
        48.0
    }

    const fn default_row_gap() -> f32 {
        24.0
    }

    pub fn row_height(&self) -> f32 {
        self.label_height + self.image_size + self.row_gap
    }
}

impl Default for PaletteLayout {
    fn default() -> Self {
        Self {
            label_height: Self::default_label_height(),
            image_size: Self::default_image_size(),
            row_gap: Self::default_row_gap(),
        }
    }
}

/// A placeable graphic shown in a menu entry's palette.
#[derive(Debug, Clone, PartialEq)]
pub struct PaletteItem {
    pub label: String,
    /// Pixmap path relative to the pixmaps root, always `/`-separated.
    pub pixmap_path: String,
    /// Image name safe for toolkits that reserve `/` in resource names.
    pub image_key: String,
    pub label_y: f32,
    pub label_height: f32,
    /// Thumbnail top edge; the thumbnail is centered horizontally.
    pub image_y: f32,
    pub image_size: f32,
    /// Native pixel size of the graphic, when known.
    pub source_size: Option<(u32, u32)>,
}

impl PaletteItem {
    pub(crate) fn new(pixmap_path: &str, settings: &AssetSettings, y: f32, layout: &PaletteLayout) -> Self {
        let pixmap_path = pixmap_path.replace('\\', "/");
        Self {
            label: settings.name.clone(),
            image_key: escape_image_key(&pixmap_path),
            pixmap_path,
            label_y: y,
            label_height: layout.label_height,
            image_y: y + layout.label_height,
            image_size: layout.image_size,
            source_size: settings.size(),
        }
    }

    /// Horizontal thumbnail offset for a pane `pane_width` wide.
    pub fn image_x(&self, pane_width: f32) -> f32 {
        pane_width * 0.5 - self.image_size * 0.5
    }
}

pub fn escape_image_key(pixmap_path: &str) -> String {
    pixmap_path.replace('/', "+")
}
