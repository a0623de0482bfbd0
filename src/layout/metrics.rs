// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Pixel-per-unit constants derived from configuration and pitch range.

use super::transport::{BEATS_PER_BAR, SIXTEENTHS_PER_BEAT};
use super::PitchRange;
use crate::config::RollConfig;

/// Grid lines are this fraction of a bar wide
const GRID_LINE_WIDTH_RATIO: f64 = 100.0;

/// Derived layout metrics.
///
/// Never stored apart from their inputs: any change to tempo, zoom,
/// resolution, dimensions or note data recomputes the whole set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metrics {
    pub width: f64,
    pub height: f64,
    pub key_strip_width: f64,
    pub zoom: u32,
    pub resolution: u32,
    /// Width right of the key strip
    pub usable_width: f64,
    pub bar_width: f64,
    pub beat_width: f64,
    pub sixteenth_width: f64,
    pub grid_line_width: f64,
    pub half_grid_line_width: f64,
    /// Distance between vertical grid lines
    pub grid_line_spacing: f64,
    pub beats_per_ms: f64,
    /// Horizontal scroll velocity
    pub scroll_px_per_ms: f64,
    /// Rows on the vertical axis
    pub pitch_span: i32,
    pub note_row_height: f64,
    /// Row height minus one grid line
    pub inner_note_height: f64,
}

impl Metrics {
    /// Compute all metrics from configuration and pitch range
    pub fn compute(config: &RollConfig, range: PitchRange) -> Self {
        let usable_width = config.width - config.key_strip_width;
        let zoom = config.zoom as f64;
        let bar_width = usable_width / zoom;
        let beat_width = usable_width / (zoom * BEATS_PER_BAR);
        let sixteenth_width = beat_width / SIXTEENTHS_PER_BEAT;
        let grid_line_width = bar_width / GRID_LINE_WIDTH_RATIO;
        let beats_per_ms = config.bpm / 60_000.0;
        let pitch_span = range.span();
        let note_row_height = config.height / pitch_span as f64;

        Self {
            width: config.width,
            height: config.height,
            key_strip_width: config.key_strip_width,
            zoom: config.zoom,
            resolution: config.resolution,
            usable_width,
            bar_width,
            beat_width,
            sixteenth_width,
            grid_line_width,
            half_grid_line_width: grid_line_width / 2.0,
            grid_line_spacing: bar_width / config.resolution as f64,
            beats_per_ms,
            scroll_px_per_ms: beat_width * beats_per_ms,
            pitch_span,
            note_row_height,
            inner_note_height: note_row_height - grid_line_width,
        }
    }

    /// Size of the vertical grid line pool
    pub fn vertical_line_count(&self) -> usize {
        (self.zoom as usize)
            .saturating_mul(self.resolution as usize)
            .saturating_add(1)
    }

    /// Size of the horizontal grid line set
    pub fn horizontal_line_count(&self) -> usize {
        self.pitch_span.max(0) as usize + 1
    }
}
