use anyhow::{Context, Result};
use platformer_editor::cli::CliOverrides;
use platformer_editor::config::AppConfig;
use platformer_editor::resources::ResourcePaths;
use platformer_editor::EditorPanel;

fn main() {
    env_logger::Builder::new().filter_level(log::LevelFilter::Info).parse_default_env().init();

    let cli = match CliOverrides::parse_from_env() {
        Ok(parsed) => parsed,
        Err(err) => {
            eprintln!("[cli] {err}");
            std::process::exit(2);
        }
    };
    if let Err(err) = run(cli) {
        log::error!("Application error: {err:?}");
        std::process::exit(1);
    }
}

fn run(cli: CliOverrides) -> Result<()> {
    let kind = cli.editor_kind();
    let mut config = AppConfig::load_or_default(cli.config_path());
    let overrides = cli.into_config_overrides();
    if !overrides.is_empty() {
        log::info!("Applying command line overrides: {}", overrides.applied_fields().join(", "));
        config.apply_overrides(&overrides);
    }

    let resources = ResourcePaths::from_config(&config.paths);
    log::info!("Game data in {}", resources.data_dir().display());
    let menu_file = resources.data_file(config.paths.menu_file(kind));
    let mut panel = EditorPanel::new(kind, &config);
    panel
        .init(&menu_file, &resources)
        .with_context(|| format!("Initialising the {} from {}", kind.label(), menu_file.display()))?;
    panel.enable();

    println!("{} (master tag '{}')", kind.label(), panel.master_tag());
    for entry in panel.entries() {
        if entry.is_header() {
            println!("== {} ==", entry.name());
            continue;
        }
        let color = entry.color();
        println!(
            "  {} [#{:02X}{:02X}{:02X}{:02X}] tags={} items={}",
            entry.name(),
            color.r,
            color.g,
            color.b,
            color.a,
            entry.required_tags().iter().cloned().collect::<Vec<_>>().join(";"),
            entry.items().len()
        );
        for item in entry.items() {
            println!("      {:>6.0}  {} ({})", item.label_y, item.label, item.pixmap_path);
        }
    }
    Ok(())
}
