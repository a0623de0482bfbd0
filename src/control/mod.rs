// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Control surface for the piano roll.
//!
//! This module provides:
//! - The [`PianoRoll`] handle with transport, setters and queries
//! - Control actions a host can map input onto
//! - The keymap that turns key presses into actions

pub mod keyboard;
pub mod roll;

pub use keyboard::{KeyPress, Keymap};
pub use roll::PianoRoll;

use crate::error::Result;
use crate::layout::{TransportTime, BEATS_PER_BAR, SIXTEENTHS_PER_BEAT};

/// Largest zoom reachable through [`ControlAction::AdjustZoom`]
pub const MAX_ZOOM: u32 = 64;
/// Largest resolution reachable through [`ControlAction::AdjustResolution`]
pub const MAX_RESOLUTION: u32 = 32;
/// Lowest tempo reachable through [`ControlAction::AdjustTempo`]
pub const MIN_TEMPO: f64 = 1.0;

/// Action that can be triggered by controls
#[derive(Debug, Clone, PartialEq)]
pub enum ControlAction {
    // Transport
    /// Toggle play/pause at the current position
    TogglePlay,
    /// Seek back to the start of the song
    SeekStart,
    /// Seek relative to the current position, in bars
    SeekBars(f64),

    // View
    /// Adjust tempo by delta BPM
    AdjustTempo(f64),
    /// Adjust the number of visible bars
    AdjustZoom(i32),
    /// Adjust grid lines per bar
    AdjustResolution(i32),

    /// Quit application
    Quit,
}

impl ControlAction {
    /// Label shown next to the action's keys in the status-line help
    pub fn hint(&self) -> &'static str {
        match self {
            ControlAction::TogglePlay => "Play/Pause",
            ControlAction::SeekStart => "Start",
            ControlAction::SeekBars(_) => "Bar",
            ControlAction::AdjustTempo(_) => "Tempo",
            ControlAction::AdjustZoom(_) => "Zoom",
            ControlAction::AdjustResolution(_) => "Grid",
            ControlAction::Quit => "Quit",
        }
    }
}

impl PianoRoll {
    /// Apply a control action. `Quit` is left to the host.
    pub fn apply(&mut self, action: &ControlAction) -> Result<()> {
        match action {
            ControlAction::TogglePlay => self.toggle(None),
            ControlAction::SeekStart => self.seek("0:0:0"),
            ControlAction::SeekBars(bars) => {
                let per_bar = BEATS_PER_BAR * SIXTEENTHS_PER_BEAT;
                let target = (self.position().as_sixteenths() + bars * per_bar).max(0.0);
                self.seek(&TransportTime::from_sixteenths(target).to_string())
            }
            ControlAction::AdjustTempo(delta) => {
                self.set_bpm((self.config().bpm + delta).max(MIN_TEMPO))
            }
            ControlAction::AdjustZoom(delta) => {
                self.set_zoom(step(self.config().zoom, *delta, MAX_ZOOM))
            }
            ControlAction::AdjustResolution(delta) => {
                self.set_resolution(step(self.config().resolution, *delta, MAX_RESOLUTION))
            }
            ControlAction::Quit => Ok(()),
        }
    }
}

fn step(value: u32, delta: i32, max: u32) -> u32 {
    (value as i64 + delta as i64).clamp(1, max as i64) as u32
}
