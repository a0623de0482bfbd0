// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Music theory utilities for the piano roll.
//!
//! This module provides pitch resolution across note notations and the
//! pitch-class color palettes used to paint notes.

pub mod palette;
pub mod pitch;

pub use palette::{Color, ColorMap, NamedPalette, NoteColor, PaletteEntry};
pub use pitch::{
    parse_note_name, KeyNumber, NoteFormat, Pitch, PitchClass, PitchResolver, PitchValue,
    StandardPitchResolver,
};
