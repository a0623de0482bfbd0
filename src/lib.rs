// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Scrolling piano roll layout and animation engine.
//!
//! Turns a list of note events (time, pitch, duration) into a retained
//! scene of rectangles: pitch rows, a scrolling bar grid, note blocks and a
//! piano key strip. A frame-driven clock scrolls the notes right to left
//! at the configured tempo, and pluggable render backends paint the scene.

pub mod config;
pub mod control;
pub mod error;
pub mod layout;
pub mod music;
pub mod render;
pub mod scene;
pub mod timing;
pub mod ui;

pub use config::{NoteEvent, NoteLength, RollConfig, RollFile};
pub use control::{ControlAction, PianoRoll};
pub use error::{Result, RollError};
pub use layout::{CoordinateSpace, Metrics, PitchRange, TransportTime};
pub use music::{Color, NoteColor, NoteFormat, PitchResolver, PitchValue, StandardPitchResolver};
pub use render::{RenderBackend, RendererKind, View};
pub use scene::{Layer, LayerId, Scene, Shape};
pub use timing::FrameRequest;
