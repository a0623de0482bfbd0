// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Terminal host for the piano roll.
//!
//! Drives a [`PianoRoll`] from a ratatui/crossterm loop: the roll's cell
//! view fills the screen above a one-line status bar, keys are mapped
//! through the [`Keymap`], and roll file reloads are applied through the
//! roll's setters.

mod transport;

pub use transport::{PositionWidget, RollStatus, StatusWidget};

use std::io::{self, Stdout};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{
        self as term, disable_raw_mode, enable_raw_mode, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use ratatui::{
    backend::CrosstermBackend,
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    widgets::Widget,
    Terminal,
};
use tracing::{info, warn};

use crate::config::{ConfigEvent, ConfigWatcher, RollConfig};
use crate::control::{ControlAction, Keymap, PianoRoll};
use crate::render::View;

/// How long transient status messages stay up
const STATUS_TIMEOUT: Duration = Duration::from_secs(3);
/// Input poll interval, one frame at 60 fps
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Copies a rasterized roll into the frame
pub struct CellsWidget<'a> {
    cells: &'a Buffer,
}

impl<'a> CellsWidget<'a> {
    pub fn new(cells: &'a Buffer) -> Self {
        Self { cells }
    }
}

impl Widget for CellsWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let src = self.cells.area;
        for y in 0..area.height.min(src.height) {
            for x in 0..area.width.min(src.width) {
                let from = self.cells.cell((src.x + x, src.y + y));
                let to = buf.cell_mut((area.x + x, area.y + y));
                if let (Some(from), Some(to)) = (from, to) {
                    *to = from.clone();
                }
            }
        }
    }
}

/// Apply a reloaded configuration through the roll's setters.
///
/// Only settings that differ between the `previous` and `new` file are
/// applied, so tempo, zoom or position changed from the keyboard survive
/// unrelated edits. Returns the names of the settings applied. Settings
/// that only take effect at construction are reported and left alone.
pub fn apply_reload(
    roll: &mut PianoRoll,
    previous: &RollConfig,
    new: &RollConfig,
) -> crate::error::Result<Vec<&'static str>> {
    new.validate()?;
    let mut changed = Vec::new();

    if new.notes != previous.notes {
        roll.set_notes(new.notes.clone())?;
        changed.push("notes");
    }
    if new.zoom != previous.zoom {
        roll.set_zoom(new.zoom)?;
        changed.push("zoom");
    }
    if new.resolution != previous.resolution {
        roll.set_resolution(new.resolution)?;
        changed.push("resolution");
    }
    if new.bpm != previous.bpm {
        roll.set_bpm(new.bpm)?;
        changed.push("bpm");
    }
    if new.time != previous.time {
        roll.seek(&new.time)?;
        changed.push("time");
    }

    let fixed = new.width != previous.width
        || new.height != previous.height
        || new.key_strip_width != previous.key_strip_width
        || new.note_color != previous.note_color
        || new.grid_line_color != previous.grid_line_color
        || new.background_color != previous.background_color
        || new.note_format != previous.note_format
        || new.antialias != previous.antialias
        || new.renderer != previous.renderer;
    if fixed {
        warn!("reload changed settings that need a restart; ignoring them");
    }

    Ok(changed)
}

/// Terminal UI application
pub struct App {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    keymap: Keymap,
    /// Rendered once; the keymap does not change while running
    help: String,
    running: bool,
    message: Option<(String, Instant)>,
}

impl App {
    /// Enter the alternate screen and raw mode
    pub fn new() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        let keymap = Keymap::new();
        let help = keymap.help_line();

        Ok(Self {
            terminal,
            keymap,
            help,
            running: true,
            message: None,
        })
    }

    /// Stop the app
    pub fn quit(&mut self) {
        self.running = false;
    }

    fn set_message(&mut self, message: impl Into<String>) {
        self.message = Some((message.into(), Instant::now()));
    }

    /// Run until the user quits
    pub fn run(&mut self, roll: &mut PianoRoll, watcher: Option<&ConfigWatcher>) -> Result<()> {
        let start = Instant::now();
        let mut loaded = roll.config().clone();
        self.fit_roll(roll)?;

        while self.running {
            self.handle_input(roll)?;

            if let Some(watcher) = watcher {
                for event in watcher.recv_all() {
                    self.handle_config_event(roll, &mut loaded, event);
                }
            }

            roll.frame(start.elapsed().as_secs_f64() * 1000.0)
                .context("frame failed")?;
            self.draw(roll)?;
        }
        Ok(())
    }

    /// Size the roll's cell surface to the screen minus the status line
    fn fit_roll(&mut self, roll: &mut PianoRoll) -> Result<()> {
        let (columns, rows) = term::size().context("failed to read terminal size")?;
        roll.resize_view(columns, roll_rows(rows))
            .context("failed to resize roll view")?;
        Ok(())
    }

    fn handle_input(&mut self, roll: &mut PianoRoll) -> Result<()> {
        if !event::poll(FRAME_INTERVAL)? {
            return Ok(());
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                let Some(action) = self.keymap.action(key.code, key.modifiers).cloned() else {
                    return Ok(());
                };
                if action == ControlAction::Quit {
                    self.quit();
                } else if let Err(e) = roll.apply(&action) {
                    warn!(?action, error = %e, "control action failed");
                    self.set_message(e.to_string());
                }
            }
            Event::Resize(_, _) => self.fit_roll(roll)?,
            _ => {}
        }
        Ok(())
    }

    fn handle_config_event(
        &mut self,
        roll: &mut PianoRoll,
        loaded: &mut RollConfig,
        event: ConfigEvent,
    ) {
        match event {
            ConfigEvent::Reloaded(file) => match apply_reload(roll, loaded, &file.roll) {
                Ok(changed) => {
                    *loaded = file.roll;
                    if !changed.is_empty() {
                        info!(?changed, "roll file reloaded");
                        self.set_message(format!("Reloaded: {}", changed.join(", ")));
                    }
                }
                Err(e) => {
                    warn!(error = %e, "reload rejected");
                    self.set_message(format!("Reload failed: {}", e));
                }
            },
            ConfigEvent::Error(e) => self.set_message(e),
            ConfigEvent::FileCreated(_) | ConfigEvent::FileDeleted(_) => {}
        }
    }

    fn draw(&mut self, roll: &PianoRoll) -> io::Result<()> {
        if self
            .message
            .as_ref()
            .map_or(false, |(_, at)| at.elapsed() > STATUS_TIMEOUT)
        {
            self.message = None;
        }

        let status = RollStatus {
            playing: roll.playing(),
            position: roll.position(),
            bpm: roll.config().bpm,
            zoom: roll.config().zoom,
            resolution: roll.config().resolution,
            message: self.message.as_ref().map(|(m, _)| m.clone()),
        };

        self.terminal.draw(|frame| {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(1), Constraint::Length(1)])
                .split(frame.area());

            if let View::Cells(cells) = roll.view() {
                frame.render_widget(CellsWidget::new(cells), chunks[0]);
            }
            frame.render_widget(StatusWidget::new(&status, &self.help), chunks[1]);
        })?;
        Ok(())
    }

    fn cleanup(&mut self) -> io::Result<()> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

/// Rows left for the roll under the status line; never zero
fn roll_rows(rows: u16) -> u16 {
    rows.saturating_sub(1).max(1)
}

impl Drop for App {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}
