// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Render backends.
//!
//! A backend receives the whole [`Scene`] on every paint and exposes the
//! result through a [`View`] the host can embed. Two modes are available,
//! selected by name:
//! - `Headless`: flattens the scene into absolute draw commands
//! - `Terminal`: rasterizes the scene into terminal cells

mod headless;
mod terminal;

pub use headless::{DrawCommand, HeadlessRenderer};
pub use terminal::{TerminalRenderer, DEFAULT_CELL_HEIGHT, DEFAULT_CELL_WIDTH};

use std::fmt;
use std::str::FromStr;

use ratatui::buffer::Buffer;
use serde::{Deserialize, Serialize};

use crate::config::RollConfig;
use crate::error::{Result, RollError};
use crate::scene::Scene;

/// Render backend mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RendererKind {
    #[default]
    Headless,
    Terminal,
}

impl RendererKind {
    pub fn name(self) -> &'static str {
        match self {
            RendererKind::Headless => "Headless",
            RendererKind::Terminal => "Terminal",
        }
    }
}

impl fmt::Display for RendererKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RendererKind {
    type Err = RollError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "headless" => Ok(RendererKind::Headless),
            "terminal" => Ok(RendererKind::Terminal),
            _ => Err(RollError::UnknownRenderer(s.to_string())),
        }
    }
}

impl TryFrom<String> for RendererKind {
    type Error = RollError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<RendererKind> for String {
    fn from(kind: RendererKind) -> Self {
        kind.name().to_string()
    }
}

/// Borrowed handle to a backend's latest output
#[derive(Debug, Clone, Copy)]
pub enum View<'a> {
    /// Flattened rectangles in paint order
    DrawList(&'a [DrawCommand]),
    /// Rasterized terminal cells
    Cells(&'a Buffer),
}

impl View<'_> {
    /// Number of draw commands, if this is a draw list
    pub fn draw_count(&self) -> Option<usize> {
        match self {
            View::DrawList(commands) => Some(commands.len()),
            View::Cells(_) => None,
        }
    }
}

/// A synchronous painter for piano roll scenes
pub trait RenderBackend {
    /// Which mode this backend implements
    fn kind(&self) -> RendererKind;

    /// Paint the scene now, replacing the previous output
    fn render(&mut self, scene: &Scene) -> Result<()>;

    /// The latest painted output
    fn view(&self) -> View<'_>;

    /// Frames painted so far
    fn frames(&self) -> u64;

    /// Change the output surface size in cells; backends without a cell
    /// surface ignore this
    fn resize(&mut self, _columns: u16, _rows: u16) {}
}

/// Create the backend for a renderer mode
pub fn create_renderer(kind: RendererKind, config: &RollConfig) -> Box<dyn RenderBackend> {
    match kind {
        RendererKind::Headless => Box::new(HeadlessRenderer::new()),
        RendererKind::Terminal => Box::new(TerminalRenderer::for_config(config)),
    }
}
