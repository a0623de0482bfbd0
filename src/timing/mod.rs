// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Timing and clock module.
//!
//! This module provides the frame-driven playback clock that turns host
//! frame timestamps into horizontal scroll.

pub mod clock;

pub use clock::{ClockState, FrameRequest, PlaybackClock, Tick};
