// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Musical time to pixel coordinates.

use std::fmt;
use std::str::FromStr;

use super::Metrics;
use crate::error::{Result, RollError};

/// Beats in a bar (the roll assumes 4/4)
pub const BEATS_PER_BAR: f64 = 4.0;

/// Sixteenths in a beat
pub const SIXTEENTHS_PER_BEAT: f64 = 4.0;

/// Furthest position, in bars either side of zero, a time may name
pub const MAX_TRANSPORT_BARS: f64 = 1_000_000.0;

/// A musical position as bars, beats and sixteenths
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TransportTime {
    pub bar: f64,
    pub beat: f64,
    pub sixteenth: f64,
}

impl TransportTime {
    pub fn new(bar: f64, beat: f64, sixteenth: f64) -> Self {
        Self {
            bar,
            beat,
            sixteenth,
        }
    }

    /// Total length in sixteenths
    pub fn as_sixteenths(&self) -> f64 {
        (self.bar * BEATS_PER_BAR + self.beat) * SIXTEENTHS_PER_BEAT + self.sixteenth
    }

    /// Normalized position from a sixteenth count
    pub fn from_sixteenths(total: f64) -> Self {
        let per_bar = BEATS_PER_BAR * SIXTEENTHS_PER_BEAT;
        let bar = total.div_euclid(per_bar);
        let in_bar = total.rem_euclid(per_bar);
        Self {
            bar,
            beat: in_bar.div_euclid(SIXTEENTHS_PER_BEAT),
            sixteenth: in_bar.rem_euclid(SIXTEENTHS_PER_BEAT),
        }
    }
}

impl FromStr for TransportTime {
    type Err = RollError;

    /// Parse `bar[:beat[:sixteenth]]`; missing parts are zero, an empty
    /// string is the start of the song
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(Self::default());
        }

        let parts: Vec<&str> = trimmed.split(':').collect();
        if parts.len() > 3 {
            return Err(RollError::time(s, "expected at most bar:beat:sixteenth"));
        }

        let mut values = [0.0; 3];
        for (slot, part) in values.iter_mut().zip(&parts) {
            let part = part.trim();
            if part.is_empty() {
                return Err(RollError::time(s, "empty component"));
            }
            let value: f64 = part
                .parse()
                .map_err(|_| RollError::time(s, format!("component {:?} is not a number", part)))?;
            if !value.is_finite() {
                return Err(RollError::time(s, format!("component {:?} is not finite", part)));
            }
            *slot = value;
        }

        let time = Self::new(values[0], values[1], values[2]);
        let limit = MAX_TRANSPORT_BARS * BEATS_PER_BAR * SIXTEENTHS_PER_BEAT;
        if !(time.as_sixteenths().abs() <= limit) {
            return Err(RollError::time(
                s,
                format!("more than {} bars from the start", MAX_TRANSPORT_BARS),
            ));
        }
        Ok(time)
    }
}

impl fmt::Display for TransportTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.bar, self.beat, self.sixteenth)
    }
}

/// Which coordinate space a mapped x lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinateSpace {
    /// Local to the note layer: time zero is x = 0, later is further right
    NoteLayer,
    /// Note-layer offset that puts the time at the key strip's right edge;
    /// later times are further left since the roll scrolls right to left
    KeyStrip,
}

impl Metrics {
    /// Map a transport time to x in the given space
    pub fn time_to_x(&self, time: &TransportTime, space: CoordinateSpace) -> f64 {
        let x = self.bar_width * time.bar
            + self.beat_width * time.beat
            + self.sixteenth_width * time.sixteenth;
        match space {
            CoordinateSpace::NoteLayer => x,
            CoordinateSpace::KeyStrip => self.key_strip_width - x,
        }
    }

    /// Inverse of the key-strip mapping: the time at the key strip edge for a
    /// given note-layer offset
    pub fn x_to_time(&self, layer_x: f64) -> TransportTime {
        let elapsed = self.key_strip_width - layer_x;
        TransportTime::from_sixteenths(elapsed / self.sixteenth_width)
    }
}

/// Map an optional transport time string; a missing or blank time maps to 0
/// in either space
pub fn transport_time_to_x(
    time: Option<&str>,
    space: CoordinateSpace,
    metrics: &Metrics,
) -> Result<f64> {
    match time {
        None => Ok(0.0),
        Some(s) if s.trim().is_empty() => Ok(0.0),
        Some(s) => {
            let x = metrics.time_to_x(&s.parse()?, space);
            if x.is_finite() {
                Ok(x)
            } else {
                Err(RollError::time(s, "position is off the roll"))
            }
        }
    }
}
