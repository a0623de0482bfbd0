// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

use std::env;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{anyhow, bail, Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use pianoroll::config::{validate_config, ConfigWatcher};
use pianoroll::ui::App;
use pianoroll::{PianoRoll, RendererKind, RollConfig, View};

/// Simulated frame interval for headless runs
const HEADLESS_FRAME_MS: f64 = 16.0;

fn print_usage() {
    println!("pianoroll - Scrolling piano roll");
    println!();
    println!("Usage: pianoroll <ROLL_FILE> [OPTIONS]");
    println!();
    println!("ROLL_FILE is a .yaml/.yml or .toml roll file.");
    println!();
    println!("Options:");
    println!("  --headless <N>   Render N frames without a terminal and print a summary");
    println!("  --log <PATH>     Write logs to PATH (terminal mode)");
    println!("  --help           Show this help message");
    println!();
    println!("Keys: Space play/pause, Home start, Left/Right bar, Up/Down tempo,");
    println!("      +/- zoom, [/] grid resolution, q/Esc quit");
}

#[derive(Debug)]
struct Options {
    roll: PathBuf,
    headless: Option<u32>,
    log: Option<PathBuf>,
}

/// Parse arguments; `None` means help was requested
fn parse_args(args: &[String]) -> Result<Option<Options>> {
    let mut roll = None;
    let mut headless = None;
    let mut log = None;

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--help" | "-h" => return Ok(None),
            "--headless" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--headless requires a frame count"))?;
                headless = Some(
                    value
                        .parse()
                        .map_err(|_| anyhow!("Invalid frame count: {}", value))?,
                );
            }
            "--log" => {
                let value = iter.next().ok_or_else(|| anyhow!("--log requires a path"))?;
                log = Some(PathBuf::from(value));
            }
            other if other.starts_with('-') => bail!("Unknown option: {}", other),
            other => {
                if roll.replace(PathBuf::from(other)).is_some() {
                    bail!("Only one roll file may be given");
                }
            }
        }
    }

    let roll = roll.ok_or_else(|| anyhow!("Missing roll file"))?;
    Ok(Some(Options { roll, headless, log }))
}

fn init_logging(options: &Options) -> Result<()> {
    let filter = || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match (&options.log, options.headless) {
        (Some(path), _) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file: {:?}", path))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter())
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
                .ok();
        }
        (None, Some(_)) => {
            tracing_subscriber::fmt()
                .with_env_filter(filter())
                .with_writer(std::io::stderr)
                .try_init()
                .ok();
        }
        // Terminal mode without a log file: stderr would corrupt the screen
        (None, None) => {}
    }
    Ok(())
}

fn run_headless(mut config: RollConfig, frames: u32) -> Result<()> {
    config.renderer = RendererKind::Headless;
    let mut roll = PianoRoll::new(config).context("Failed to build piano roll")?;

    roll.play(None)?;
    for i in 0..frames {
        roll.frame(i as f64 * HEADLESS_FRAME_MS)?;
    }
    roll.pause();
    // Let the in-flight frame land
    roll.frame(frames as f64 * HEADLESS_FRAME_MS)?;

    let commands = match roll.view() {
        View::DrawList(commands) => commands.len(),
        View::Cells(_) => 0,
    };
    println!("Frames rendered: {}", roll.frames_rendered());
    println!("Draw commands:   {}", commands);
    println!("Grid lines:      {}", roll.vertical_line_count());
    println!("Position:        {}", roll.position());
    println!("Scroll x:        {:.3}", roll.note_layer_x());
    Ok(())
}

fn run_terminal(path: &Path, mut config: RollConfig) -> Result<()> {
    config.renderer = RendererKind::Terminal;
    let mut roll = PianoRoll::new(config).context("Failed to build piano roll")?;

    let watcher = match ConfigWatcher::new(path, None) {
        Ok(watcher) => Some(watcher),
        Err(e) => {
            warn!(error = %e, "hot reload disabled");
            None
        }
    };

    let mut app = App::new().context("Failed to set up terminal")?;
    app.run(&mut roll, watcher.as_ref())
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    let options = match parse_args(&args) {
        Ok(Some(options)) => options,
        Ok(None) => {
            print_usage();
            return Ok(());
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            print_usage();
            std::process::exit(1);
        }
    };

    init_logging(&options)?;

    let file = validate_config(&options.roll)?;
    info!(path = ?options.roll, notes = file.roll.notes.len(), "roll file loaded");

    match options.headless {
        Some(frames) => run_headless(file.roll, frames),
        None => run_terminal(&options.roll, file.roll),
    }
}
