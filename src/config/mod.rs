// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Configuration system for the piano roll.
//!
//! This module provides the roll configuration record, note event data,
//! and loading of roll files from YAML or TOML.

pub mod watcher;

pub use watcher::{validate_config, ConfigEvent, ConfigWatcher};

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::RollError;
use crate::music::{Color, NoteColor, NoteFormat, PitchValue};
use crate::render::RendererKind;

/// Root of a roll file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RollFile {
    /// Roll display settings and note data
    pub roll: RollConfig,
}

impl RollFile {
    /// Load a roll file, picking the parser from the extension (`.toml` or YAML)
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read roll file: {:?}", path))?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml(&contents),
            Some("yaml") | Some("yml") | None => Self::from_yaml(&contents),
            Some(other) => bail!("Unsupported roll file extension: {:?}", other),
        }
    }

    /// Parse a roll file from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("Failed to parse YAML roll file")
    }

    /// Parse a roll file from a TOML string
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("Failed to parse TOML roll file")
    }

    /// Serialize to a YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize roll file to YAML")
    }

    /// Save to a YAML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml = self.to_yaml()?;
        fs::write(path.as_ref(), yaml)
            .with_context(|| format!("Failed to write roll file: {:?}", path.as_ref()))
    }
}

/// Piano roll configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RollConfig {
    /// Width of the whole roll in pixels
    #[serde(default = "default_width")]
    pub width: f64,
    /// Height of the whole roll in pixels
    #[serde(default = "default_height")]
    pub height: f64,
    /// Width of the piano key strip in pixels
    #[serde(default = "default_key_strip_width")]
    pub key_strip_width: f64,
    /// Single note color or pitch-class palette
    #[serde(default)]
    pub note_color: NoteColor,
    /// Color of the grid lines
    #[serde(default = "default_grid_line_color")]
    pub grid_line_color: Color,
    /// Background color
    #[serde(default)]
    pub background_color: Color,
    /// Tempo in beats per minute
    #[serde(default = "default_bpm")]
    pub bpm: f64,
    /// Whether the renderer smooths output
    #[serde(default = "default_antialias")]
    pub antialias: bool,
    /// Number of visible bars
    #[serde(default = "default_zoom")]
    pub zoom: u32,
    /// Vertical grid lines per bar
    #[serde(default = "default_resolution")]
    pub resolution: u32,
    /// Transport time at which playback begins
    #[serde(default = "default_time")]
    pub time: String,
    /// Render backend mode
    #[serde(default)]
    pub renderer: RendererKind,
    /// Notation of the note values in `notes`
    #[serde(default)]
    pub note_format: NoteFormat,
    /// Note events
    #[serde(default)]
    pub notes: Vec<NoteEvent>,
}

fn default_width() -> f64 {
    900.0
}
fn default_height() -> f64 {
    400.0
}
fn default_key_strip_width() -> f64 {
    125.0
}
fn default_grid_line_color() -> Color {
    Color(0x333333)
}
fn default_bpm() -> f64 {
    140.0
}
fn default_antialias() -> bool {
    true
}
fn default_zoom() -> u32 {
    4
}
fn default_resolution() -> u32 {
    2
}
fn default_time() -> String {
    "0:0:0".to_string()
}

impl Default for RollConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            key_strip_width: default_key_strip_width(),
            note_color: NoteColor::default(),
            grid_line_color: default_grid_line_color(),
            background_color: Color::BLACK,
            bpm: default_bpm(),
            antialias: default_antialias(),
            zoom: default_zoom(),
            resolution: default_resolution(),
            time: default_time(),
            renderer: RendererKind::default(),
            note_format: NoteFormat::default(),
            notes: Vec::new(),
        }
    }
}

impl RollConfig {
    /// Reject configurations that would produce degenerate geometry
    pub fn validate(&self) -> std::result::Result<(), RollError> {
        if !(self.width.is_finite() && self.width > 0.0) {
            return Err(RollError::InvalidConfig(format!(
                "width must be positive, got {}",
                self.width
            )));
        }
        if !(self.height.is_finite() && self.height > 0.0) {
            return Err(RollError::InvalidConfig(format!(
                "height must be positive, got {}",
                self.height
            )));
        }
        if !(self.key_strip_width.is_finite()
            && self.key_strip_width >= 0.0
            && self.key_strip_width < self.width)
        {
            return Err(RollError::InvalidConfig(format!(
                "key strip width must be in [0, {}), got {}",
                self.width, self.key_strip_width
            )));
        }
        validate_bpm(self.bpm)?;
        validate_zoom(self.zoom)?;
        validate_resolution(self.resolution)?;
        validate_grid_lines(self.zoom, self.resolution)?;
        if self.notes.is_empty() {
            return Err(RollError::EmptyNoteData);
        }
        Ok(())
    }
}

/// Tempo must be a positive finite number
pub fn validate_bpm(bpm: f64) -> std::result::Result<(), RollError> {
    if bpm.is_finite() && bpm > 0.0 {
        Ok(())
    } else {
        Err(RollError::InvalidConfig(format!(
            "tempo must be positive, got {}",
            bpm
        )))
    }
}

/// At least one bar must be visible
pub fn validate_zoom(zoom: u32) -> std::result::Result<(), RollError> {
    if zoom >= 1 {
        Ok(())
    } else {
        Err(RollError::InvalidConfig("zoom must be at least 1".to_string()))
    }
}

/// At least one vertical grid line per bar
pub fn validate_resolution(resolution: u32) -> std::result::Result<(), RollError> {
    if resolution >= 1 {
        Ok(())
    } else {
        Err(RollError::InvalidConfig(
            "resolution must be at least 1".to_string(),
        ))
    }
}

/// Cap on `zoom * resolution`, the size of the vertical grid line pool
pub const MAX_GRID_LINES: u32 = 4096;

/// The vertical pool must stay a reasonable size
pub fn validate_grid_lines(zoom: u32, resolution: u32) -> std::result::Result<(), RollError> {
    match zoom.checked_mul(resolution) {
        Some(lines) if lines <= MAX_GRID_LINES => Ok(()),
        _ => Err(RollError::InvalidConfig(format!(
            "zoom * resolution must be at most {}, got {} * {}",
            MAX_GRID_LINES, zoom, resolution
        ))),
    }
}

/// A note event: when it starts, which pitch, and how long it lasts.
///
/// Written in roll files as a 3-element list: `["0:2:0", "B4", "4n"]`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(from = "NoteTuple", into = "NoteTuple")]
pub struct NoteEvent {
    /// Transport time (`bar[:beat[:sixteenth]]`)
    pub time: String,
    /// Pitch in the configured note format
    pub pitch: PitchValue,
    /// Note length token
    pub duration: NoteLength,
}

type NoteTuple = (String, PitchValue, NoteLength);

impl From<NoteTuple> for NoteEvent {
    fn from((time, pitch, duration): NoteTuple) -> Self {
        Self {
            time,
            pitch,
            duration,
        }
    }
}

impl From<NoteEvent> for NoteTuple {
    fn from(event: NoteEvent) -> Self {
        (event.time, event.pitch, event.duration)
    }
}

impl NoteEvent {
    /// Create a note event
    pub fn new(
        time: impl Into<String>,
        pitch: impl Into<PitchValue>,
        duration: impl Into<NoteLength>,
    ) -> Self {
        Self {
            time: time.into(),
            pitch: pitch.into(),
            duration: duration.into(),
        }
    }
}

/// Note length as a divisor of a whole note (`1`, `4`, `"2n"`, `"8t"`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NoteLength {
    Number(f64),
    Text(String),
}

impl NoteLength {
    /// The whole-note divisor: the leading integer of the token
    pub fn divisor(&self) -> std::result::Result<u32, RollError> {
        let divisor = match self {
            NoteLength::Number(n) if n.is_finite() && *n >= 1.0 && *n <= u32::MAX as f64 => {
                n.trunc() as u32
            }
            NoteLength::Number(n) => {
                return Err(RollError::InvalidDuration(n.to_string()));
            }
            NoteLength::Text(s) => {
                let t = s.trim();
                let digits: String = t.chars().take_while(|c| c.is_ascii_digit()).collect();
                digits
                    .parse::<u32>()
                    .map_err(|_| RollError::InvalidDuration(s.clone()))?
            }
        };
        if divisor == 0 {
            return Err(RollError::InvalidDuration(format!("{:?}", self)));
        }
        Ok(divisor)
    }
}

impl From<&str> for NoteLength {
    fn from(s: &str) -> Self {
        NoteLength::Text(s.to_string())
    }
}

impl From<u32> for NoteLength {
    fn from(n: u32) -> Self {
        NoteLength::Number(n as f64)
    }
}
