//! Level and world editor panel: a tabbed palette of placeable graphics.
//!
//! The panel owns plain records only. A UI adapter (see `editor_ui`) draws them and
//! feeds pointer events back through [`EditorPanel::handle_event`].

mod hover;
mod matcher;
mod menu;
mod palette;

pub use hover::{HoverAnimator, HoverPhase, PanelAppearance};
pub use matcher::{find_target_entries, split_tags};
pub use menu::{parse_menu_file, parse_menu_str, Color, MenuEntry, HEADER_TAG};
pub use palette::{escape_image_key, PaletteItem, PaletteLayout};

use std::path::Path;

use crate::config::AppConfig;
use crate::error::{EditorError, EditorResult};
use crate::events::PanelEvent;
use crate::image_settings::AssetSettings;
use crate::resources::ResourcePaths;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorKind {
    Level,
    World,
}

impl EditorKind {
    /// Tag a graphic must carry to show up in this editor at all.
    pub fn master_tag(self) -> &'static str {
        match self {
            EditorKind::Level => "level",
            EditorKind::World => "world",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EditorKind::Level => "Level editor",
            EditorKind::World => "World editor",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "level" => Some(EditorKind::Level),
            "world" => Some(EditorKind::World),
            _ => None,
        }
    }
}

/// Externally visible state of the panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PanelState {
    Hidden,
    Active,
    FadingOut,
    Resting,
}

/// One row of the menu listbox.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MenuListRow<'a> {
    pub name: &'a str,
    pub color: Color,
    pub header: bool,
}

/// Outcome of offering one graphic to the panel.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AdmissionReport {
    /// The graphic has a settings file carrying the master tag.
    pub admitted: bool,
    /// Entries that received the graphic in this call. Entries already showing it are skipped,
    /// so this may be empty even when admitted.
    pub targets: Vec<String>,
}

pub struct EditorPanel {
    kind: EditorKind,
    settings_extension: String,
    asset_extension: String,
    layout: PaletteLayout,
    entries: Vec<MenuEntry>,
    hover: HoverAnimator,
    enabled: bool,
    initialized: bool,
    selected: Option<usize>,
    last_pick: Option<(String, String)>,
}

impl EditorPanel {
    pub fn new(kind: EditorKind, config: &AppConfig) -> Self {
        Self {
            kind,
            settings_extension: config.editor.settings_extension.clone(),
            asset_extension: config.editor.asset_extension.clone(),
            layout: config.editor.palette,
            entries: Vec::new(),
            hover: HoverAnimator::from_config(&config.editor),
            enabled: false,
            initialized: false,
            selected: None,
            last_pick: None,
        }
    }

    pub fn kind(&self) -> EditorKind {
        self.kind
    }

    pub fn master_tag(&self) -> &'static str {
        self.kind.master_tag()
    }

    pub fn entries(&self) -> &[MenuEntry] {
        &self.entries
    }

    pub fn layout(&self) -> &PaletteLayout {
        &self.layout
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Parses the menu file, then offers every pixmap below the pixmaps root to the palette.
    ///
    /// A missing or malformed menu file aborts initialisation.
    pub fn init(&mut self, menu_file: impl AsRef<Path>, resources: &ResourcePaths) -> anyhow::Result<()> {
        if self.initialized {
            self.unload();
        }
        let entries = parse_menu_file(menu_file.as_ref())?;
        self.install_menu(entries)?;
        self.load_image_items(resources)?;
        self.initialized = true;
        log::info!("{} ready with {} menu entries", self.kind.label(), self.entries.len());
        Ok(())
    }

    /// Replaces the menu with already parsed entries.
    pub fn install_menu(&mut self, entries: Vec<MenuEntry>) -> EditorResult<()> {
        let master = self.master_tag();
        if let Some(entry) = entries.iter().find(|entry| entry.required_tags().contains(master)) {
            return Err(EditorError::MasterTagInMenu { entry: entry.name().to_string(), tag: master.to_string() });
        }
        self.entries = entries;
        self.selected = self.entries.iter().position(|entry| !entry.is_header());
        Ok(())
    }

    /// Rows for the menu listbox, in menu file order.
    pub fn menu_list(&self) -> impl Iterator<Item = MenuListRow<'_>> + '_ {
        self.entries.iter().map(|entry| MenuListRow {
            name: entry.name(),
            color: entry.color(),
            header: entry.is_header(),
        })
    }

    /// Offers every pixmap below the pixmaps root; returns how many passed the admission gate.
    pub fn load_image_items(&mut self, resources: &ResourcePaths) -> anyhow::Result<usize> {
        let files = resources.pixmap_files(&self.asset_extension)?;
        let mut admitted = 0;
        for file in &files {
            let Some(relative) = resources.relative_pixmap_path(file) else {
                log::warn!("Skipping pixmap with a non UTF-8 path: {}", file.display());
                continue;
            };
            if self.try_admit(&relative, resources) {
                admitted += 1;
            }
        }
        log::debug!("{}: {admitted} of {} pixmaps admitted", self.kind.label(), files.len());
        Ok(admitted)
    }

    /// Adds a graphic (path relative to the pixmaps root) to every matching menu entry.
    ///
    /// Returns `false` when the graphic has no settings file or lacks the master tag.
    pub fn try_admit(&mut self, pixmap_path: &str, resources: &ResourcePaths) -> bool {
        self.admit(pixmap_path, resources).admitted
    }

    pub fn admit(&mut self, pixmap_path: &str, resources: &ResourcePaths) -> AdmissionReport {
        let settings_path = resources.settings_path_for(pixmap_path, &self.settings_extension);
        if !settings_path.is_file() {
            return AdmissionReport::default();
        }
        let mut settings = match AssetSettings::load(&settings_path) {
            Ok(settings) => settings,
            Err(err) => {
                log::warn!("Skipping {pixmap_path}: {err}");
                return AdmissionReport::default();
            }
        };
        if settings.size().is_none() {
            if let Ok((width, height)) = image::image_dimensions(resources.game_pixmap(pixmap_path)) {
                settings.width = Some(width);
                settings.height = Some(height);
            }
        }
        self.admit_with_settings(pixmap_path, &settings)
    }

    /// Admission for settings that were already parsed.
    pub fn admit_with_settings(&mut self, pixmap_path: &str, settings: &AssetSettings) -> AdmissionReport {
        if !settings.has_tag(self.master_tag()) {
            return AdmissionReport::default();
        }
        let tags = settings.tags();
        let layout = self.layout;
        let mut targets = Vec::new();
        for index in find_target_entries(&self.entries, &tags) {
            let entry = &mut self.entries[index];
            if entry.items().iter().any(|item| item.pixmap_path == pixmap_path) {
                continue;
            }
            entry.add_image_item(pixmap_path, settings, &layout);
            targets.push(entry.name().to_string());
        }
        if targets.is_empty() {
            log::debug!("{pixmap_path} carries '{}' but matches no menu entry", self.master_tag());
        }
        AdmissionReport { admitted: true, targets }
    }

    pub fn get_menu_entry(&self, name: &str) -> EditorResult<&MenuEntry> {
        self.entries
            .iter()
            .find(|entry| entry.name() == name)
            .ok_or_else(|| EditorError::MenuEntryNotFound(name.to_string()))
    }

    pub fn selected_entry(&self) -> Option<&MenuEntry> {
        self.selected.map(|index| &self.entries[index])
    }

    pub fn select_entry(&mut self, name: &str) -> EditorResult<()> {
        let index = self
            .entries
            .iter()
            .position(|entry| entry.name() == name)
            .ok_or_else(|| EditorError::MenuEntryNotFound(name.to_string()))?;
        if !self.entries[index].is_header() {
            self.selected = Some(index);
        }
        Ok(())
    }

    /// Last palette item picked through the UI, as `(entry, pixmap_path)`.
    pub fn take_pick(&mut self) -> Option<(String, String)> {
        self.last_pick.take()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn enable(&mut self) {
        if self.enabled {
            return;
        }
        self.enabled = true;
        log::info!("{} enabled", self.kind.label());
    }

    pub fn disable(&mut self) {
        if !self.enabled {
            return;
        }
        self.enabled = false;
        log::info!("{} disabled", self.kind.label());
    }

    pub fn toggle(&mut self) {
        if self.enabled {
            self.disable();
        } else {
            self.enable();
        }
    }

    pub fn state(&self) -> PanelState {
        if !self.enabled {
            return PanelState::Hidden;
        }
        match self.hover.phase() {
            HoverPhase::Active => PanelState::Active,
            HoverPhase::FadingOut { .. } => PanelState::FadingOut,
            HoverPhase::Resting => PanelState::Resting,
        }
    }

    pub fn hover(&self) -> &HoverAnimator {
        &self.hover
    }

    pub fn appearance(&self) -> PanelAppearance {
        self.hover.appearance()
    }

    /// Per-frame tick; `dt` is the frame time in seconds.
    pub fn update(&mut self, dt: f32) {
        if !self.enabled {
            return;
        }
        self.hover.update(dt);
    }

    pub fn draw(&self) {}

    /// Returns `true` when the event was consumed.
    pub fn handle_event(&mut self, event: &PanelEvent) -> bool {
        if !self.enabled {
            return false;
        }
        log::trace!("{}: {event}", self.kind.label());
        match event {
            PanelEvent::PointerEntered => {
                self.hover.pointer_entered();
                true
            }
            PanelEvent::PointerLeft => {
                self.hover.pointer_left();
                true
            }
            PanelEvent::EntrySelected { name } => self.select_entry(name).is_ok(),
            PanelEvent::ItemPicked { entry, pixmap_path } => {
                let known = self
                    .get_menu_entry(entry)
                    .map(|menu| menu.items().iter().any(|item| &item.pixmap_path == pixmap_path))
                    .unwrap_or(false);
                if known {
                    self.last_pick = Some((entry.clone(), pixmap_path.clone()));
                }
                known
            }
        }
    }

    /// Drops every menu entry and palette item. `init` must run again before reuse.
    pub fn unload(&mut self) {
        self.entries.clear();
        self.selected = None;
        self.last_pick = None;
        self.hover.reset();
        self.initialized = false;
    }
}
