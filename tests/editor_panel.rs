use std::fs;
use std::path::Path;

use platformer_editor::config::AppConfig;
use platformer_editor::editor::{EditorKind, EditorPanel, MenuEntry, PanelState};
use platformer_editor::error::EditorError;
use platformer_editor::events::PanelEvent;
use platformer_editor::image_settings::AssetSettings;
use platformer_editor::resources::ResourcePaths;
use tempfile::TempDir;

const LEVEL_MENU: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<menu>
    <item>
        <property name="name" value="---Level---" />
        <property name="tags" value="header" />
    </item>
    <item>
        <property name="name" value="Ground" />
        <property name="tags" value="ground" />
        <property name="color" value="8B4513FF" />
    </item>
    <item>
        <property name="name" value="Snow" />
        <property name="tags" value="snow" />
        <property name="color" value="E0FFFF" />
    </item>
</menu>
"#;

struct GameData {
    dir: TempDir,
}

impl GameData {
    fn new() -> Self {
        let data = Self { dir: tempfile::tempdir().expect("temp dir") };
        fs::create_dir_all(data.root().join("editor")).expect("editor dir");
        fs::create_dir_all(data.root().join("pixmaps")).expect("pixmaps dir");
        fs::write(data.root().join("editor/level_menu.xml"), LEVEL_MENU).expect("menu file");
        data
    }

    fn root(&self) -> &Path {
        self.dir.path()
    }

    fn resources(&self) -> ResourcePaths {
        ResourcePaths::new(self.root(), "pixmaps")
    }

    fn menu(&self) -> std::path::PathBuf {
        self.root().join("editor/level_menu.xml")
    }

    /// Writes an (empty) pixmap and, when `settings` is given, its settings file.
    fn pixmap(&self, relative: &str, settings: Option<&str>) {
        let path = self.root().join("pixmaps").join(relative);
        fs::create_dir_all(path.parent().expect("parent")).expect("pixmap dir");
        fs::write(&path, b"").expect("pixmap");
        if let Some(settings) = settings {
            fs::write(path.with_extension("settings"), settings).expect("settings");
        }
    }
}

fn item_paths(panel: &EditorPanel, entry: &str) -> Vec<String> {
    let entry = panel.get_menu_entry(entry).expect("entry exists");
    entry.items().iter().map(|item| item.pixmap_path.clone()).collect()
}

#[test]
fn asset_is_admitted_once_to_every_matching_entry() {
    let data = GameData::new();
    data.pixmap("ground/snow/left.png", Some("name Snow Ground\neditor_tags level;ground;snow\n"));
    data.pixmap("world/ground/path.png", Some("name Path\neditor_tags world;ground\n"));
    data.pixmap("ground/green/middle.png", Some("name Green\neditor_tags level;ground;ground\n"));

    let mut panel = EditorPanel::new(EditorKind::Level, &AppConfig::default());
    panel.init(data.menu(), &data.resources()).expect("init panel");

    assert_eq!(item_paths(&panel, "Ground"), ["ground/green/middle.png", "ground/snow/left.png"]);
    assert_eq!(item_paths(&panel, "Snow"), ["ground/snow/left.png"]);
    assert!(item_paths(&panel, "---Level---").is_empty());
}

#[test]
fn palette_rows_advance_by_the_row_height() {
    let data = GameData::new();
    data.pixmap("a.png", Some("name A\neditor_tags level;ground\n"));
    data.pixmap("b.png", Some("name B\neditor_tags level;ground\n"));
    data.pixmap("c/d.png", Some("editor_tags level;ground\n"));

    let mut panel = EditorPanel::new(EditorKind::Level, &AppConfig::default());
    panel.init(data.menu(), &data.resources()).expect("init panel");

    let ground = panel.get_menu_entry("Ground").expect("ground entry");
    let offsets: Vec<(f32, f32)> = ground.items().iter().map(|item| (item.label_y, item.image_y)).collect();
    assert_eq!(offsets, [(0.0, 24.0), (96.0, 120.0), (192.0, 216.0)]);
    assert_eq!(ground.layout_cursor(), 288.0);

    let nested = &ground.items()[2];
    assert_eq!(nested.label, "d", "label falls back to the file stem");
    assert_eq!(nested.image_key, "c+d.png");
    assert_eq!(nested.image_x(200.0), 76.0);
}

#[test]
fn assets_without_settings_or_master_tag_are_rejected() {
    let data = GameData::new();
    data.pixmap("loose.png", None);
    data.pixmap("world_only.png", Some("editor_tags world;ground\n"));
    data.pixmap("substring.png", Some("editor_tags levels;ground\n"));
    let resources = data.resources();

    let mut panel = EditorPanel::new(EditorKind::Level, &AppConfig::default());
    panel.init(data.menu(), &resources).expect("init panel");

    assert!(!panel.try_admit("loose.png", &resources));
    assert!(!panel.try_admit("world_only.png", &resources));
    assert!(!panel.try_admit("substring.png", &resources), "master tag must match a whole tag");
    assert!(!panel.try_admit("missing.png", &resources));
    assert!(item_paths(&panel, "Ground").is_empty());
}

#[test]
fn offering_the_same_asset_again_does_not_duplicate_it() {
    let data = GameData::new();
    data.pixmap("snow.png", Some("editor_tags level;snow;ground\n"));
    let resources = data.resources();

    let mut panel = EditorPanel::new(EditorKind::Level, &AppConfig::default());
    panel.init(data.menu(), &resources).expect("init panel");
    assert!(panel.try_admit("snow.png", &resources));

    let report = panel.admit("snow.png", &resources);
    assert!(report.admitted);
    assert!(report.targets.is_empty(), "every entry already shows the asset");
    assert_eq!(panel.load_image_items(&resources).expect("rescan"), 1);

    assert_eq!(item_paths(&panel, "Snow"), ["snow.png"]);
    assert_eq!(item_paths(&panel, "Ground"), ["snow.png"]);
    let snow = panel.get_menu_entry("Snow").expect("snow entry");
    assert_eq!(snow.layout_cursor(), 96.0);
}

#[test]
fn unmatched_asset_still_reports_admission() {
    let data = GameData::new();
    data.pixmap("lonely.png", Some("editor_tags level;water\n"));
    let resources = data.resources();

    let mut panel = EditorPanel::new(EditorKind::Level, &AppConfig::default());
    panel.init(data.menu(), &resources).expect("init panel");

    let report = panel.admit("lonely.png", &resources);
    assert!(report.admitted);
    assert!(report.targets.is_empty());
    assert!(panel.entries().iter().all(|entry| entry.items().is_empty()));
}

#[test]
fn world_editor_uses_its_own_master_tag() {
    let mut panel = EditorPanel::new(EditorKind::World, &AppConfig::default());
    panel
        .install_menu(vec![MenuEntry::new("Paths").with_tags(["ground"])])
        .expect("install menu");

    let level_only = AssetSettings { editor_tags: "level;ground".into(), ..Default::default() };
    let world = AssetSettings { name: "Path".into(), editor_tags: "world;ground".into(), ..Default::default() };
    assert!(!panel.admit_with_settings("level.png", &level_only).admitted);
    let report = panel.admit_with_settings("path.png", &world);
    assert_eq!(report.targets, ["Paths"]);
}

#[test]
fn menu_requiring_the_master_tag_is_rejected() {
    let mut panel = EditorPanel::new(EditorKind::Level, &AppConfig::default());
    let err = panel.install_menu(vec![MenuEntry::new("Everything").with_tags(["level"])]).unwrap_err();
    assert!(matches!(err, EditorError::MasterTagInMenu { .. }));
}

#[test]
fn missing_menu_file_fails_initialisation() {
    let data = GameData::new();
    let mut panel = EditorPanel::new(EditorKind::Level, &AppConfig::default());
    let err = panel.init(data.root().join("editor/nope.xml"), &data.resources()).unwrap_err();
    assert!(matches!(err.downcast_ref::<EditorError>(), Some(EditorError::MenuRead { .. })));
    assert!(!panel.is_initialized());
}

#[test]
fn unknown_menu_entry_is_not_found() {
    let data = GameData::new();
    let mut panel = EditorPanel::new(EditorKind::Level, &AppConfig::default());
    panel.init(data.menu(), &data.resources()).expect("init panel");

    let err = panel.get_menu_entry("Nonexistent").unwrap_err();
    assert!(matches!(err, EditorError::MenuEntryNotFound(ref name) if name == "Nonexistent"));
    assert!(err.to_string().contains("not in editor menu list"));
}

#[test]
fn menu_list_preserves_order_colors_and_headers() {
    let data = GameData::new();
    let mut panel = EditorPanel::new(EditorKind::Level, &AppConfig::default());
    panel.init(data.menu(), &data.resources()).expect("init panel");

    let rows: Vec<(String, bool)> = panel.menu_list().map(|row| (row.name.to_string(), row.header)).collect();
    assert_eq!(
        rows,
        [("---Level---".to_string(), true), ("Ground".to_string(), false), ("Snow".to_string(), false)]
    );
    assert_eq!(panel.selected_entry().map(|entry| entry.name()), Some("Ground"), "headers are never selected");
}

#[test]
fn hover_state_follows_pointer_and_time() {
    let mut config = AppConfig::default();
    config.editor.resting_opacity = 0.3;
    let mut panel = EditorPanel::new(EditorKind::Level, &config);
    assert_eq!(panel.state(), PanelState::Hidden);

    assert!(!panel.handle_event(&PanelEvent::PointerEntered), "disabled panel ignores events");
    panel.update(10.0);
    assert_eq!(panel.state(), PanelState::Hidden);

    panel.enable();
    assert!(panel.handle_event(&PanelEvent::PointerEntered));
    assert_eq!(panel.state(), PanelState::Active);
    assert_eq!(panel.appearance().opacity, 1.0);
    assert_eq!(panel.appearance().x, 0.0);

    panel.handle_event(&PanelEvent::PointerLeft);
    panel.update(0.5);
    assert_eq!(panel.state(), PanelState::FadingOut);
    assert!((panel.appearance().opacity - 0.75).abs() < 1e-6);
    panel.update(0.5);
    panel.update(1.0);
    assert_eq!(panel.state(), PanelState::Resting);
    assert_eq!(panel.appearance().opacity, 0.3);
    assert_eq!(panel.appearance().x, -0.19);

    panel.disable();
    assert_eq!(panel.state(), PanelState::Hidden);
    panel.toggle();
    assert_eq!(panel.state(), PanelState::Resting, "enable/disable keep the hover state");
}

#[test]
fn picking_and_selecting_through_events() {
    let data = GameData::new();
    data.pixmap("snow.png", Some("editor_tags level;snow\n"));
    let mut panel = EditorPanel::new(EditorKind::Level, &AppConfig::default());
    panel.init(data.menu(), &data.resources()).expect("init panel");
    panel.enable();

    assert!(panel.handle_event(&PanelEvent::EntrySelected { name: "Snow".into() }));
    assert_eq!(panel.selected_entry().map(|entry| entry.name()), Some("Snow"));
    assert!(!panel.handle_event(&PanelEvent::EntrySelected { name: "Lava".into() }));

    let pick = PanelEvent::ItemPicked { entry: "Snow".into(), pixmap_path: "snow.png".into() };
    assert!(panel.handle_event(&pick));
    assert_eq!(panel.take_pick(), Some(("Snow".to_string(), "snow.png".to_string())));
    assert_eq!(panel.take_pick(), None);
    let bogus = PanelEvent::ItemPicked { entry: "Ground".into(), pixmap_path: "snow.png".into() };
    assert!(!panel.handle_event(&bogus));
}

#[test]
fn unload_releases_everything_and_init_can_run_again() {
    let data = GameData::new();
    data.pixmap("snow.png", Some("editor_tags level;snow\n"));
    let resources = data.resources();
    let mut panel = EditorPanel::new(EditorKind::Level, &AppConfig::default());
    panel.init(data.menu(), &resources).expect("init panel");

    panel.unload();
    assert!(panel.entries().is_empty());
    assert!(!panel.is_initialized());

    panel.init(data.menu(), &resources).expect("re-init panel");
    panel.init(data.menu(), &resources).expect("init twice");
    assert_eq!(item_paths(&panel, "Snow"), ["snow.png"], "re-init must not duplicate palette items");
}
