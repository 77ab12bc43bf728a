use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use platformer_editor::scripting::{ObjectManager, ScriptHost};
use serde::Serialize;

const DEFAULT_DT: f32 = 1.0 / 60.0;

fn main() {
    env_logger::Builder::new().filter_level(log::LevelFilter::Info).parse_default_env().init();
    if let Err(err) = run_cli() {
        eprintln!("[script-runner] error: {err:?}");
        std::process::exit(1);
    }
}

#[derive(Serialize)]
struct ObjectReport {
    id: u32,
    class: &'static str,
    x: f32,
    y: f32,
    image_dir: String,
    spawned: bool,
}

#[derive(Serialize)]
struct RunReport {
    frames: u32,
    logs: Vec<String>,
    objects: Vec<ObjectReport>,
}

fn run_cli() -> Result<()> {
    let opts = parse_args()?;
    let objects = ObjectManager::shared();
    let mut host = ScriptHost::new(&opts.script, objects.clone())?;
    host.force_reload().with_context(|| format!("loading '{}'", opts.script.display()))?;

    let mut logs = host.take_logs();
    for frame in 0..opts.frames {
        host.update(opts.dt);
        logs.extend(host.take_logs());
        if let Some(err) = host.last_error() {
            bail!("script error on frame {frame}: {err}");
        }
    }

    let objects = objects.borrow();
    let report = RunReport {
        frames: opts.frames,
        logs,
        objects: objects
            .iter()
            .map(|(id, enemy)| ObjectReport {
                id: id.raw(),
                class: enemy.kind.class_name(),
                x: enemy.position.x,
                y: enemy.position.y,
                image_dir: enemy.image_dir.clone(),
                spawned: enemy.spawned,
            })
            .collect(),
    };

    if opts.json {
        serde_json::to_writer_pretty(std::io::stdout(), &report)?;
        println!();
        return Ok(());
    }
    for line in &report.logs {
        println!("[script] {line}");
    }
    println!("{} object(s) after {} frame(s):", report.objects.len(), report.frames);
    for object in &report.objects {
        println!(
            "  #{} {} at ({:.1}, {:.1}) images={}{}",
            object.id,
            object.class,
            object.x,
            object.y,
            object.image_dir,
            if object.spawned { " spawned" } else { "" }
        );
    }
    Ok(())
}

struct CliOptions {
    script: PathBuf,
    frames: u32,
    dt: f32,
    json: bool,
}

fn parse_args() -> Result<CliOptions> {
    let mut args = env::args().skip(1);
    let mut script = None;
    let mut frames = 1;
    let mut dt = DEFAULT_DT;
    let mut json = false;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--frames" => {
                let value = args.next().ok_or_else(|| anyhow!("--frames requires a value"))?;
                frames = value.parse().with_context(|| format!("invalid frame count '{value}'"))?;
            }
            "--dt" => {
                let value = args.next().ok_or_else(|| anyhow!("--dt requires a value"))?;
                dt = value.parse().with_context(|| format!("invalid frame time '{value}'"))?;
            }
            "--json" => json = true,
            "-h" | "--help" => {
                print_usage();
                std::process::exit(0);
            }
            other if other.starts_with("--") => bail!("unknown flag '{other}'"),
            other => {
                if script.replace(PathBuf::from(other)).is_some() {
                    bail!("only one script path may be given");
                }
            }
        }
    }
    let script = script.ok_or_else(|| anyhow!("missing script path (see --help)"))?;
    Ok(CliOptions { script, frames, dt, json })
}

fn print_usage() {
    eprintln!(
        "Script Runner

Usage:
  script_runner <script.rhai> [--frames N] [--dt SECONDS] [--json]

Runs a level script against an empty object manager and lists the objects it spawned.
"
    );
}
