// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Pitch resolution.
//!
//! Turns a note written in any supported notation (scientific or Helmholtz
//! name, piano key number, frequency, MIDI note number) into a canonical
//! [`Pitch`]: a piano key number (A0 = 1, A4 = 49) plus its pitch class.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RollError};

/// Piano key number (A0 = 1, C4 = 40, A4 = 49)
pub type KeyNumber = i32;

/// Key number of concert A (440 Hz)
pub const A4_KEY: KeyNumber = 49;

/// Frequency of concert A in Hz
pub const A4_FREQUENCY: f64 = 440.0;

/// Offset between MIDI note numbers and piano key numbers
pub const MIDI_KEY_OFFSET: i32 = 20;

/// Pitch classes (chroma) in chromatic order starting at C
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PitchClass {
    C,
    Cs, // C# / Db
    D,
    Ds, // D# / Eb
    E,
    F,
    Fs, // F# / Gb
    G,
    Gs, // G# / Ab
    A,
    As, // A# / Bb
    B,
}

impl PitchClass {
    /// All pitch classes in chromatic order
    pub const ALL: [PitchClass; 12] = [
        PitchClass::C,
        PitchClass::Cs,
        PitchClass::D,
        PitchClass::Ds,
        PitchClass::E,
        PitchClass::F,
        PitchClass::Fs,
        PitchClass::G,
        PitchClass::Gs,
        PitchClass::A,
        PitchClass::As,
        PitchClass::B,
    ];

    /// Pitch classes played on white piano keys
    pub const WHITE: [PitchClass; 7] = [
        PitchClass::C,
        PitchClass::D,
        PitchClass::E,
        PitchClass::F,
        PitchClass::G,
        PitchClass::A,
        PitchClass::B,
    ];

    /// Pitch classes played on black piano keys
    pub const BLACK: [PitchClass; 5] = [
        PitchClass::Cs,
        PitchClass::Ds,
        PitchClass::Fs,
        PitchClass::Gs,
        PitchClass::As,
    ];

    /// Chroma (0-11) for this pitch class
    pub fn chroma(self) -> u8 {
        self as u8
    }

    /// Pitch class from a chroma, wrapping modulo 12
    pub fn from_chroma(chroma: i32) -> Self {
        PitchClass::ALL[chroma.rem_euclid(12) as usize]
    }

    /// Whether this pitch class sits on a white key
    pub fn is_white(self) -> bool {
        PitchClass::WHITE.contains(&self)
    }

    /// Whether this pitch class sits on a black key
    pub fn is_black(self) -> bool {
        PitchClass::BLACK.contains(&self)
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [&str; 12] = [
            "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
        ];
        f.write_str(NAMES[self.chroma() as usize])
    }
}

/// Canonical pitch identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pitch {
    /// Piano key number
    pub key: KeyNumber,
    /// Pitch class of the key
    pub class: PitchClass,
}

impl Pitch {
    /// Build a pitch from a piano key number
    pub fn from_key(key: KeyNumber) -> Self {
        // A (chroma 9) sits on key 1
        Self {
            key,
            class: PitchClass::from_chroma(key + 8),
        }
    }

    /// Chroma (0-11)
    pub fn chroma(&self) -> u8 {
        self.class.chroma()
    }

    /// Scientific octave number (C4 = middle C)
    pub fn octave(&self) -> i32 {
        (self.key + MIDI_KEY_OFFSET).div_euclid(12) - 1
    }

    /// MIDI note number for this key
    pub fn midi(&self) -> i32 {
        self.key + MIDI_KEY_OFFSET
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.class, self.octave())
    }
}

/// Notation the note values in the note data are written in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum NoteFormat {
    /// Scientific (`C4`, `A#3`) or Helmholtz (`c'`, `C,`) note names
    #[default]
    String,
    /// Piano key numbers
    Key,
    /// Audio frequencies in Hz, snapped to the closest key
    Frequency,
    /// MIDI note numbers
    #[serde(rename = "MIDI")]
    Midi,
}

impl fmt::Display for NoteFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NoteFormat::String => "String",
            NoteFormat::Key => "Key",
            NoteFormat::Frequency => "Frequency",
            NoteFormat::Midi => "MIDI",
        })
    }
}

impl FromStr for NoteFormat {
    type Err = RollError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "string" => Ok(NoteFormat::String),
            "key" => Ok(NoteFormat::Key),
            "frequency" => Ok(NoteFormat::Frequency),
            "midi" => Ok(NoteFormat::Midi),
            other => Err(RollError::InvalidConfig(format!(
                "unknown note format {:?}",
                other
            ))),
        }
    }
}

/// A note value as written in the note data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PitchValue {
    Number(f64),
    Text(String),
}

impl PitchValue {
    /// Numeric reading of the value (numbers, or text that parses as one)
    fn as_number(&self) -> Option<f64> {
        match self {
            PitchValue::Number(n) => Some(*n),
            PitchValue::Text(s) => s.trim().parse::<f64>().ok(),
        }
    }
}

impl fmt::Display for PitchValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PitchValue::Number(n) => write!(f, "{}", n),
            PitchValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for PitchValue {
    fn from(s: &str) -> Self {
        PitchValue::Text(s.to_string())
    }
}

impl From<String> for PitchValue {
    fn from(s: String) -> Self {
        PitchValue::Text(s)
    }
}

impl From<i32> for PitchValue {
    fn from(n: i32) -> Self {
        PitchValue::Number(n as f64)
    }
}

impl From<f64> for PitchValue {
    fn from(n: f64) -> Self {
        PitchValue::Number(n)
    }
}

/// Resolves note values to canonical pitches
pub trait PitchResolver {
    /// Resolve `value`, written in `format`, to a pitch
    fn resolve(&self, value: &PitchValue, format: NoteFormat) -> Result<Pitch>;

    /// Resolve a note name (used for palette keys, which are always names)
    fn resolve_name(&self, name: &str) -> Result<Pitch> {
        self.resolve(&PitchValue::Text(name.to_string()), NoteFormat::String)
    }
}

/// Built-in resolver covering every [`NoteFormat`]
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardPitchResolver;

impl StandardPitchResolver {
    pub fn new() -> Self {
        Self
    }

    fn resolve_string(&self, value: &PitchValue) -> Result<Pitch> {
        match value {
            PitchValue::Text(s) => parse_note_name(s),
            PitchValue::Number(_) => Err(RollError::pitch(
                value.to_string(),
                NoteFormat::String,
                "expected a note name",
            )),
        }
    }

    fn resolve_integer(&self, value: &PitchValue, format: NoteFormat) -> Result<i32> {
        let n = value
            .as_number()
            .ok_or_else(|| RollError::pitch(value.to_string(), format, "not a number"))?;
        if !n.is_finite() || n.fract() != 0.0 {
            return Err(RollError::pitch(value.to_string(), format, "not an integer"));
        }
        if n.abs() > i32::MAX as f64 / 2.0 {
            return Err(RollError::pitch(value.to_string(), format, "out of range"));
        }
        Ok(n as i32)
    }

    fn resolve_frequency(&self, value: &PitchValue) -> Result<Pitch> {
        let hz = value.as_number().ok_or_else(|| {
            RollError::pitch(value.to_string(), NoteFormat::Frequency, "not a number")
        })?;
        if !hz.is_finite() || hz <= 0.0 {
            return Err(RollError::pitch(
                value.to_string(),
                NoteFormat::Frequency,
                "frequency must be positive",
            ));
        }
        let semitones = (12.0 * (hz / A4_FREQUENCY).log2()).round();
        Ok(Pitch::from_key(A4_KEY + semitones as i32))
    }
}

impl PitchResolver for StandardPitchResolver {
    fn resolve(&self, value: &PitchValue, format: NoteFormat) -> Result<Pitch> {
        match format {
            NoteFormat::String => self.resolve_string(value),
            NoteFormat::Key => Ok(Pitch::from_key(self.resolve_integer(value, format)?)),
            NoteFormat::Midi => {
                let midi = self.resolve_integer(value, format)?;
                if !(0..=127).contains(&midi) {
                    return Err(RollError::pitch(
                        value.to_string(),
                        format,
                        "MIDI note must be 0-127",
                    ));
                }
                Ok(Pitch::from_key(midi - MIDI_KEY_OFFSET))
            }
            NoteFormat::Frequency => self.resolve_frequency(value),
        }
    }
}

/// Parse a scientific (`Bb3`, `C#-1`) or Helmholtz (`c''`, `C,`) note name
pub fn parse_note_name(input: &str) -> Result<Pitch> {
    let fail = |reason: &str| RollError::pitch(input, NoteFormat::String, reason);

    let s = input.trim();
    let mut chars = s.chars().peekable();
    let letter = chars.next().ok_or_else(|| fail("empty note name"))?;
    let base = match letter.to_ascii_uppercase() {
        'C' => 0,
        'D' => 2,
        'E' => 4,
        'F' => 5,
        'G' => 7,
        'A' => 9,
        'B' => 11,
        _ => return Err(fail(&format!("unknown note letter {:?}", letter))),
    };

    let mut accidental: i32 = 0;
    while let Some(&c) = chars.peek() {
        let step = match c {
            '#' | '♯' => 1,
            'b' | '♭' => -1,
            'x' | '𝄪' => 2,
            _ => break,
        };
        accidental = accidental
            .checked_add(step)
            .ok_or_else(|| fail("too many accidentals"))?;
        chars.next();
    }

    let rest: String = chars.collect();
    let octave = if rest.is_empty() || rest.chars().all(|c| matches!(c, '\'' | '’' | ',')) {
        helmholtz_octave(letter, &rest).ok_or_else(|| fail("invalid Helmholtz octave marks"))?
    } else {
        rest.parse::<i32>()
            .map_err(|_| fail(&format!("invalid octave {:?}", rest)))?
    };

    // Scientific octave to MIDI, then MIDI to piano key
    let key = octave
        .checked_add(1)
        .and_then(|o| o.checked_mul(12))
        .and_then(|m| m.checked_add(base + accidental))
        .and_then(|m| m.checked_sub(MIDI_KEY_OFFSET))
        .ok_or_else(|| fail(&format!("octave {} out of range", octave)))?;
    Ok(Pitch::from_key(key))
}

/// Octave for Helmholtz notation: lowercase letters start at octave 3 and
/// rise with primes, uppercase letters start at octave 2 and fall with commas
fn helmholtz_octave(letter: char, marks: &str) -> Option<i32> {
    let primes = marks.chars().filter(|&c| c == '\'' || c == '’').count() as i32;
    let commas = marks.chars().filter(|&c| c == ',').count() as i32;
    if letter.is_ascii_lowercase() {
        (commas == 0).then_some(3 + primes)
    } else {
        (primes == 0).then_some(2 - commas)
    }
}
