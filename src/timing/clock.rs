// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Playback clock.
//!
//! A small state machine driven by host frame timestamps (milliseconds, as
//! delivered by a "before next paint" scheduler). It never sleeps or spawns:
//! the host calls [`PlaybackClock::tick`] once per scheduled frame and the
//! clock answers with how far the roll moved and whether to schedule again.

use tracing::{debug, trace};

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockState {
    Stopped,
    Playing,
}

/// Whether the host should schedule another frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameRequest {
    Continue,
    Stop,
}

/// Result of one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    /// Milliseconds since the previous frame (zero on the first frame)
    pub elapsed_ms: f64,
    /// Pixels the roll scrolls left this frame
    pub movement: f64,
    pub request: FrameRequest,
}

/// Frame-driven playback clock
#[derive(Debug, Clone)]
pub struct PlaybackClock {
    state: ClockState,
    /// Timestamp of the previous frame in the current run
    last_timestamp: Option<f64>,
    /// A frame has been requested and not yet delivered
    frame_pending: bool,
}

impl PlaybackClock {
    /// Create a stopped clock
    pub fn new() -> Self {
        Self {
            state: ClockState::Stopped,
            last_timestamp: None,
            frame_pending: false,
        }
    }

    pub fn state(&self) -> ClockState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == ClockState::Playing
    }

    /// Whether the host owes the clock a frame
    pub fn frame_pending(&self) -> bool {
        self.frame_pending
    }

    pub fn last_timestamp(&self) -> Option<f64> {
        self.last_timestamp
    }

    /// Start playback. Returns `true` if the state changed.
    ///
    /// A new frame is only requested when none is outstanding, so a quick
    /// pause/play before the in-flight frame lands keeps a single frame chain.
    pub fn play(&mut self) -> bool {
        if self.is_playing() {
            return false;
        }
        self.state = ClockState::Playing;
        let chained = self.frame_pending;
        self.frame_pending = true;
        trace!(chained, "clock started");
        true
    }

    /// Stop playback. Returns `true` if the state changed.
    ///
    /// Only clears the flag that gates rescheduling; a frame already in
    /// flight still completes.
    pub fn pause(&mut self) -> bool {
        if !self.is_playing() {
            return false;
        }
        self.state = ClockState::Stopped;
        trace!(in_flight = self.frame_pending, "clock stopped");
        true
    }

    /// Advance to a frame timestamp.
    ///
    /// Returns `None` when no frame was requested. Otherwise the first frame
    /// of a run measures zero elapsed time; a non-monotonic timestamp is
    /// treated as zero elapsed too.
    pub fn tick(&mut self, timestamp_ms: f64, px_per_ms: f64) -> Option<Tick> {
        if !self.frame_pending {
            return None;
        }
        self.frame_pending = false;

        let last = self.last_timestamp.unwrap_or(timestamp_ms);
        if timestamp_ms < last {
            debug!(timestamp_ms, last, "frame timestamp went backwards");
        }
        let elapsed_ms = (timestamp_ms - last).max(0.0);
        let movement = elapsed_ms * px_per_ms;

        let request = if self.is_playing() {
            self.last_timestamp = Some(timestamp_ms);
            self.frame_pending = true;
            FrameRequest::Continue
        } else {
            self.last_timestamp = None;
            trace!(timestamp_ms, "frame chain ended");
            FrameRequest::Stop
        };

        Some(Tick {
            elapsed_ms,
            movement,
            request,
        })
    }
}

impl Default for PlaybackClock {
    fn default() -> Self {
        Self::new()
    }
}
