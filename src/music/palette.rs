// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Colors and pitch-class color palettes for notes.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::pitch::{PitchClass, PitchResolver};
use crate::error::{Result, RollError};

/// 24-bit RGB color (`0xRRGGBB`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "ColorRepr", into = "u32")]
pub struct Color(pub u32);

impl Color {
    pub const BLACK: Color = Color(0x000000);
    pub const WHITE: Color = Color(0xFFFFFF);

    /// Build a color from components
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color(((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    /// Red, green and blue components
    pub fn components(self) -> (u8, u8, u8) {
        (
            ((self.0 >> 16) & 0xFF) as u8,
            ((self.0 >> 8) & 0xFF) as u8,
            (self.0 & 0xFF) as u8,
        )
    }

    /// Parse `#rrggbb`, `0xrrggbb` or bare hex digits
    pub fn parse(s: &str) -> Result<Self> {
        let t = s.trim();
        let digits = t
            .strip_prefix('#')
            .or_else(|| t.strip_prefix("0x"))
            .or_else(|| t.strip_prefix("0X"))
            .unwrap_or(t);
        if digits.is_empty() || digits.len() > 6 {
            return Err(RollError::InvalidConfig(format!("invalid color {:?}", s)));
        }
        u32::from_str_radix(digits, 16)
            .map(Color)
            .map_err(|_| RollError::InvalidConfig(format!("invalid color {:?}", s)))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.0)
    }
}

impl From<Color> for u32 {
    fn from(c: Color) -> u32 {
        c.0
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ColorRepr {
    Int(u32),
    Text(String),
}

impl TryFrom<ColorRepr> for Color {
    type Error = RollError;

    fn try_from(repr: ColorRepr) -> Result<Self> {
        match repr {
            ColorRepr::Int(v) if v <= 0xFFFFFF => Ok(Color(v)),
            ColorRepr::Int(v) => Err(RollError::InvalidConfig(format!(
                "color {:#x} exceeds 0xFFFFFF",
                v
            ))),
            ColorRepr::Text(s) => Color::parse(&s),
        }
    }
}

/// One palette entry: a note name and the color for its pitch class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaletteEntry {
    pub note: String,
    pub color: Color,
}

impl PaletteEntry {
    pub fn new(note: impl Into<String>, color: Color) -> Self {
        Self {
            note: note.into(),
            color,
        }
    }
}

/// Built-in palettes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamedPalette {
    /// D. D. Jameson's 1844 color-to-pitch scheme
    Jameson,
}

impl NamedPalette {
    /// Entries of this palette, in chromatic order
    pub fn entries(self) -> Vec<PaletteEntry> {
        match self {
            NamedPalette::Jameson => [
                ("C", 0xFF0000),
                ("C#", 0xFF4E00),
                ("D", 0xFF9900),
                ("D#", 0xFFC900),
                ("E", 0xFFFF00),
                ("F", 0x00CC00),
                ("F#", 0x00A383),
                ("G", 0x0000FF),
                ("G#", 0x3B00BC),
                ("A", 0x6600CC),
                ("A#", 0x8A00AE),
                ("B", 0xB200A0),
            ]
            .iter()
            .map(|&(note, rgb)| PaletteEntry::new(note, Color(rgb)))
            .collect(),
        }
    }
}

/// How notes are colored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NoteColor {
    /// Every note gets the same color
    Single(Color),
    /// A built-in palette keyed by pitch class
    Named(NamedPalette),
    /// Explicit note-name to color entries, in order
    Palette(Vec<PaletteEntry>),
}

impl Default for NoteColor {
    fn default() -> Self {
        NoteColor::Named(NamedPalette::Jameson)
    }
}

/// Color used when a palette has no entry for a note's pitch class
pub const UNMATCHED_NOTE_COLOR: Color = Color::WHITE;

/// A note color with palette entries resolved to pitch classes.
///
/// Resolution happens once per layer build; each note then looks up its
/// pitch class. When several entries share a pitch class, the last one wins.
#[derive(Debug, Clone, PartialEq)]
pub enum ColorMap {
    Single(Color),
    ByClass([Option<Color>; 12]),
}

impl ColorMap {
    /// Resolve palette note names through `resolver`
    pub fn resolve(color: &NoteColor, resolver: &dyn PitchResolver) -> Result<Self> {
        let entries = match color {
            NoteColor::Single(c) => return Ok(ColorMap::Single(*c)),
            NoteColor::Named(named) => named.entries(),
            NoteColor::Palette(entries) => entries.clone(),
        };

        let mut by_class = [None; 12];
        for entry in &entries {
            let pitch = resolver.resolve_name(&entry.note)?;
            by_class[pitch.chroma() as usize] = Some(entry.color);
        }
        Ok(ColorMap::ByClass(by_class))
    }

    /// Color for a note of the given pitch class
    pub fn color_for(&self, class: PitchClass) -> Color {
        match self {
            ColorMap::Single(c) => *c,
            ColorMap::ByClass(map) => map[class.chroma() as usize].unwrap_or(UNMATCHED_NOTE_COLOR),
        }
    }
}
