//! egui front end for [`EditorPanel`]: draws the menu list and palette, reports pointer events.

use std::path::PathBuf;

use egui::{Color32, RichText, Sense};

use crate::editor::{Color, EditorPanel, PaletteItem};
use crate::events::PanelEvent;

const DEFAULT_PANEL_WIDTH: f32 = 320.0;
const MENU_COLUMN_WIDTH: f32 = 110.0;
const PANEL_MIN_HEIGHT: f32 = 240.0;
const ITEM_SPACING: f32 = 12.0;

fn color32(color: Color) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.a)
}

pub struct EditorPanelView {
    pixmaps_root: PathBuf,
    width: f32,
    pointer_inside: bool,
}

impl EditorPanelView {
    pub fn new(pixmaps_root: impl Into<PathBuf>) -> Self {
        Self { pixmaps_root: pixmaps_root.into(), width: DEFAULT_PANEL_WIDTH, pointer_inside: false }
    }

    pub fn with_width(mut self, width: f32) -> Self {
        self.width = width;
        self
    }

    /// Draws the panel for this frame; feed the returned events to [`EditorPanel::handle_event`].
    pub fn show(&mut self, ctx: &egui::Context, panel: &EditorPanel) -> Vec<PanelEvent> {
        let mut events = Vec::new();
        if !panel.is_enabled() {
            return events;
        }

        let appearance = panel.appearance();
        let screen = ctx.available_rect();
        let origin = egui::pos2(screen.min.x + appearance.x * self.width, screen.min.y);

        let area = egui::Area::new(egui::Id::new(("editor_panel", panel.kind().master_tag())))
            .fixed_pos(origin)
            .show(ctx, |ui| {
                ui.set_opacity(appearance.opacity);
                egui::Frame::window(ui.style()).show(ui, |ui| {
                    ui.set_width(self.width);
                    ui.set_min_height(PANEL_MIN_HEIGHT);
                    ui.horizontal_top(|ui| {
                        ui.vertical(|ui| {
                            ui.set_width(MENU_COLUMN_WIDTH);
                            self.menu_column(ui, panel, &mut events);
                        });
                        ui.separator();
                        ui.vertical(|ui| self.palette_column(ui, panel, &mut events));
                    });
                });
            });

        let inside = ctx.pointer_hover_pos().is_some_and(|pos| area.response.rect.contains(pos));
        if inside != self.pointer_inside {
            self.pointer_inside = inside;
            events.push(if inside { PanelEvent::PointerEntered } else { PanelEvent::PointerLeft });
        }
        events
    }

    fn menu_column(&self, ui: &mut egui::Ui, panel: &EditorPanel, events: &mut Vec<PanelEvent>) {
        let selected = panel.selected_entry().map(|entry| entry.name());
        for row in panel.menu_list() {
            if row.header {
                ui.label(RichText::new(row.name).strong());
                continue;
            }
            let text = RichText::new(row.name).color(color32(row.color));
            if ui.selectable_label(selected == Some(row.name), text).clicked() {
                events.push(PanelEvent::EntrySelected { name: row.name.to_string() });
            }
        }
    }

    fn palette_column(&self, ui: &mut egui::Ui, panel: &EditorPanel, events: &mut Vec<PanelEvent>) {
        let Some(entry) = panel.selected_entry() else {
            ui.weak("No palette");
            return;
        };
        egui::ScrollArea::vertical().id_salt(("palette", entry.name())).show(ui, |ui| {
            if entry.items().is_empty() {
                ui.weak("Empty");
            }
            for item in entry.items() {
                if self.palette_item(ui, item).clicked() {
                    events.push(PanelEvent::ItemPicked {
                        entry: entry.name().to_string(),
                        pixmap_path: item.pixmap_path.clone(),
                    });
                }
            }
        });
    }

    fn palette_item(&self, ui: &mut egui::Ui, item: &PaletteItem) -> egui::Response {
        ui.vertical_centered(|ui| {
            ui.label(item.label.as_str());
            let uri = format!("file://{}", self.pixmaps_root.join(&item.pixmap_path).display());
            let image = egui::Image::new(uri).fit_to_exact_size(egui::vec2(item.image_size, item.image_size));
            let response = ui.add(image.sense(Sense::click()));
            ui.add_space(ITEM_SPACING);
            response.on_hover_text(item.pixmap_path.as_str())
        })
        .inner
    }
}
