use std::fs;
use std::path::Path;

use indexmap::IndexSet;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::matcher::split_tags;
use super::palette::{PaletteItem, PaletteLayout};
use crate::error::{EditorError, EditorResult};
use crate::image_settings::AssetSettings;

/// Tag that turns a menu item into a non-selectable section label.
pub const HEADER_TAG: &str = "header";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color { r: 0xFF, g: 0xFF, b: 0xFF, a: 0xFF };

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Accepts `RRGGBBAA` or `RRGGBB` (opaque), with an optional leading `#`.
    pub fn from_hex(raw: &str) -> Option<Self> {
        let hex = raw.trim().trim_start_matches('#');
        if !hex.is_ascii() || !(hex.len() == 6 || hex.len() == 8) {
            return None;
        }
        let channel = |idx: usize| u8::from_str_radix(&hex[idx..idx + 2], 16).ok();
        let a = if hex.len() == 8 { channel(6)? } else { 0xFF };
        Some(Self { r: channel(0)?, g: channel(2)?, b: channel(4)?, a })
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

#[derive(Debug, Clone)]
pub struct MenuEntry {
    name: String,
    color: Color,
    required_tags: IndexSet<String>,
    header: bool,
    items: Vec<PaletteItem>,
    next_y: f32,
}

impl MenuEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: Color::WHITE,
            required_tags: IndexSet::new(),
            header: false,
            items: Vec::new(),
            next_y: 0.0,
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_required_tags(tags);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn required_tags(&self) -> &IndexSet<String> {
        &self.required_tags
    }

    /// Replaces the tag set; the header flag follows the presence of [`HEADER_TAG`].
    pub fn set_required_tags<I, S>(&mut self, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_tags = tags.into_iter().map(Into::into).collect();
        self.header = self.required_tags.contains(HEADER_TAG);
    }

    pub fn is_header(&self) -> bool {
        self.header
    }

    pub fn items(&self) -> &[PaletteItem] {
        &self.items
    }

    /// Vertical offset where the next palette item will be placed.
    pub fn layout_cursor(&self) -> f32 {
        self.next_y
    }

    pub fn add_image_item(&mut self, pixmap_path: &str, settings: &AssetSettings, layout: &PaletteLayout) -> &PaletteItem {
        let item = PaletteItem::new(pixmap_path, settings, self.next_y, layout);
        self.next_y += layout.row_height();
        self.items.push(item);
        let last = self.items.len() - 1;
        &self.items[last]
    }
}

#[derive(Default)]
struct RawItem {
    name: Option<String>,
    tags: Option<String>,
    color: Option<String>,
}

impl RawItem {
    fn into_entry(self, index: usize) -> EditorResult<MenuEntry> {
        let item_error = |message: String| EditorError::MenuItem { index, message };
        let name = self.name.ok_or_else(|| item_error("missing 'name' property".to_string()))?;
        let tags = self.tags.ok_or_else(|| item_error(format!("'{name}' is missing the 'tags' property")))?;
        let color = match self.color.as_deref() {
            Some(raw) => {
                Color::from_hex(raw).ok_or_else(|| item_error(format!("'{name}' has invalid color '{raw}'")))?
            }
            None => Color::WHITE,
        };
        log::debug!("Found XML <item> '{name}'");
        let mut entry = MenuEntry::new(name);
        entry.set_color(color);
        entry.set_required_tags(split_tags(&tags));
        Ok(entry)
    }
}

pub fn parse_menu_file(path: impl AsRef<Path>) -> EditorResult<Vec<MenuEntry>> {
    let path = path.as_ref();
    let xml = fs::read_to_string(path)
        .map_err(|source| EditorError::MenuRead { path: path.to_path_buf(), source })?;
    parse_menu_str(&xml)
}

/// Reads every `<item>` directly below the document root, in document order.
pub fn parse_menu_str(xml: &str) -> EditorResult<Vec<MenuEntry>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut buffer = Vec::new();
    let mut entries: Vec<MenuEntry> = Vec::new();
    let mut depth = 0usize;
    let mut saw_root = false;
    let mut current: Option<RawItem> = None;
    let mut item_index = 0usize;

    loop {
        let event = reader
            .read_event_into(&mut buffer)
            .map_err(|err| EditorError::MenuXml(format!("at byte {}: {err}", reader.buffer_position())))?;
        match event {
            Event::Start(ref e) => {
                depth += 1;
                match depth {
                    1 => saw_root = true,
                    2 if e.name().as_ref() == b"item" => {
                        item_index += 1;
                        current = Some(RawItem::default());
                    }
                    3 if e.name().as_ref() == b"property" => {
                        if let Some(raw) = current.as_mut() {
                            read_property(e, raw, item_index)?;
                        }
                    }
                    _ => {}
                }
            }
            Event::Empty(ref e) => match depth {
                0 => saw_root = true,
                1 if e.name().as_ref() == b"item" => {
                    item_index += 1;
                    push_entry(&mut entries, RawItem::default(), item_index)?;
                }
                2 if e.name().as_ref() == b"property" => {
                    if let Some(raw) = current.as_mut() {
                        read_property(e, raw, item_index)?;
                    }
                }
                _ => {}
            },
            Event::End(ref e) => {
                if depth == 2 && e.name().as_ref() == b"item" {
                    if let Some(raw) = current.take() {
                        push_entry(&mut entries, raw, item_index)?;
                    }
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
        buffer.clear();
    }

    if !saw_root {
        return Err(EditorError::MenuXml("document has no root element".to_string()));
    }
    if depth != 0 {
        return Err(EditorError::MenuXml("unexpected end of document".to_string()));
    }
    Ok(entries)
}

fn push_entry(entries: &mut Vec<MenuEntry>, raw: RawItem, index: usize) -> EditorResult<()> {
    let entry = raw.into_entry(index)?;
    if entries.iter().any(|existing| existing.name() == entry.name()) {
        return Err(EditorError::MenuItem { index, message: format!("duplicate entry name '{}'", entry.name()) });
    }
    entries.push(entry);
    Ok(())
}

fn read_property(element: &BytesStart<'_>, raw: &mut RawItem, index: usize) -> EditorResult<()> {
    let mut key = None;
    let mut value = None;
    for attr in element.attributes() {
        let attr = attr.map_err(|err| EditorError::MenuXml(err.to_string()))?;
        let text = attr.unescape_value().map_err(|err| EditorError::MenuXml(err.to_string()))?.into_owned();
        match attr.key.as_ref() {
            b"name" => key = Some(text),
            b"value" => value = Some(text),
            _ => {}
        }
    }
    let Some(key) = key else {
        return Ok(());
    };
    let slot = match key.as_str() {
        "name" => &mut raw.name,
        "tags" => &mut raw.tags,
        "color" => &mut raw.color,
        _ => return Ok(()),
    };
    if slot.is_some() {
        return Ok(());
    }
    let value = value
        .ok_or_else(|| EditorError::MenuItem { index, message: format!("property '{key}' has no value") })?;
    *slot = Some(value);
    Ok(())
}
