// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Error types for the piano roll engine.

use thiserror::Error;

use crate::music::NoteFormat;

/// Errors produced while configuring, laying out or rendering a piano roll
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RollError {
    /// A numeric configuration value would produce degenerate geometry
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The roll needs at least one note to derive a pitch range
    #[error("note data is empty")]
    EmptyNoteData,

    /// A note could not be resolved to a key number
    #[error("cannot resolve {value:?} as {format} note: {reason}")]
    UnresolvablePitch {
        value: String,
        format: NoteFormat,
        reason: String,
    },

    /// A transport time string is not `bar[:beat[:sixteenth]]`
    #[error("malformed transport time {input:?}: {reason}")]
    MalformedTime { input: String, reason: String },

    /// A note duration does not yield a usable divisor
    #[error("invalid note duration: {0}")]
    InvalidDuration(String),

    /// Renderer mode name is not one of the supported modes
    #[error("unknown renderer {0:?} (expected \"Headless\" or \"Terminal\")")]
    UnknownRenderer(String),

    /// The render backend failed to paint
    #[error("render failed: {0}")]
    Render(String),
}

impl RollError {
    /// Shorthand for an unresolvable pitch
    pub fn pitch(value: impl Into<String>, format: NoteFormat, reason: impl Into<String>) -> Self {
        RollError::UnresolvablePitch {
            value: value.into(),
            format,
            reason: reason.into(),
        }
    }

    /// Shorthand for a malformed transport time
    pub fn time(input: impl Into<String>, reason: impl Into<String>) -> Self {
        RollError::MalformedTime {
            input: input.into(),
            reason: reason.into(),
        }
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, RollError>;
