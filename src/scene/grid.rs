// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Grid lines.
//!
//! Horizontal lines separate pitch rows and are rebuilt whenever the pitch
//! range changes. Vertical lines are a fixed pool of `zoom * resolution + 1`
//! shapes that scroll with the notes; a line that slides under the key strip
//! is moved to the back of the pool, one spacing past the last line, so the
//! grid appears to scroll forever without allocating.

use super::{Layer, Shape};
use crate::layout::Metrics;
use crate::music::Color;

/// What one scroll step did to the vertical pool
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecycleOutcome {
    /// Lines moved from the front of the pool to the back
    pub recycled: usize,
    /// The whole pool fell behind the key strip and was laid out again
    pub reanchored: bool,
}

/// One full-width line per row boundary across the pitch span
pub fn build_horizontal_grid(metrics: &Metrics, color: Color) -> Layer {
    let count = metrics.horizontal_line_count();
    let mut layer = Layer::with_capacity(count);
    for row in 0..count {
        layer.push(Shape::rect(
            0.0,
            row as f64 * metrics.note_row_height - metrics.half_grid_line_width,
            metrics.width,
            metrics.grid_line_width,
            color,
        ));
    }
    layer
}

/// Anchor for the first vertical line: the note layer's x stepped by whole
/// grid spacings until it is the first position at or past the key strip.
///
/// Because the anchor keeps the note layer's phase, a rebuild after a seek
/// or zoom change lines up with the bars the notes are drawn against.
pub fn first_vertical_line_x(note_layer_x: f64, metrics: &Metrics) -> f64 {
    let spacing = metrics.grid_line_spacing;
    let edge = metrics.key_strip_width;
    let mut x = note_layer_x;

    if x < edge {
        x += ((edge - x) / spacing).floor() * spacing;
        while x < edge {
            x += spacing;
        }
    } else if x - spacing >= edge {
        x -= ((x - edge) / spacing).floor() * spacing;
        while x - spacing >= edge {
            x -= spacing;
        }
    }
    x
}

/// Build the vertical line pool anchored to the note layer's x
pub fn build_vertical_grid(note_layer_x: f64, metrics: &Metrics, color: Color) -> Layer {
    let count = metrics.vertical_line_count();
    let offset = first_vertical_line_x(note_layer_x, metrics);
    let mut layer = Layer::with_capacity(count);
    for i in 0..count {
        layer.push(vertical_line(
            offset + i as f64 * metrics.grid_line_spacing,
            metrics,
            color,
        ));
    }
    layer
}

fn vertical_line(origin: f64, metrics: &Metrics, color: Color) -> Shape {
    Shape::rect(
        origin - metrics.half_grid_line_width,
        0.0,
        metrics.grid_line_width,
        metrics.height,
        color,
    )
}

/// Scroll the vertical pool left by `movement` pixels and recycle lines
/// whose right edge slid past the key strip.
///
/// Several lines may fall off in one step after a long frame gap; each is
/// recycled in turn. If every line in the pool is still behind the key strip
/// after a full rotation, the pool is laid out again from its own phase.
pub fn advance_vertical_grid(layer: &mut Layer, movement: f64, metrics: &Metrics) -> RecycleOutcome {
    let mut outcome = RecycleOutcome::default();
    let count = layer.len();
    if count == 0 {
        return outcome;
    }

    for line in layer.shapes_mut().iter_mut() {
        line.x -= movement;
    }

    while outcome.recycled < count && is_behind_key_strip(layer.first(), metrics) {
        let shapes = layer.shapes_mut();
        if let Some(mut line) = shapes.pop_front() {
            let last_x = shapes.back().map_or(line.x, |l| l.x);
            line.x = last_x + metrics.grid_line_spacing;
            shapes.push_back(line);
        }
        outcome.recycled += 1;
    }

    if is_behind_key_strip(layer.first(), metrics) {
        let origin = layer
            .first()
            .map(|l| l.x + metrics.half_grid_line_width)
            .unwrap_or(metrics.key_strip_width);
        let offset = first_vertical_line_x(origin, metrics);
        for (i, line) in layer.shapes_mut().iter_mut().enumerate() {
            line.x = offset + i as f64 * metrics.grid_line_spacing - metrics.half_grid_line_width;
        }
        outcome.reanchored = true;
    }

    outcome
}

fn is_behind_key_strip(line: Option<&Shape>, metrics: &Metrics) -> bool {
    line.map_or(false, |l| l.x + metrics.grid_line_width < metrics.key_strip_width)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::tests::{approx_eq, sample_metrics};
    use crate::layout::{CoordinateSpace, TransportTime};
    use rand::{Rng, SeedableRng};

    fn positions(layer: &Layer) -> Vec<f64> {
        layer.shapes().iter().map(|s| s.x).collect()
    }

    fn assert_even_spacing(layer: &Layer, spacing: f64) {
        let xs = positions(layer);
        for pair in xs.windows(2) {
            assert!(
                (pair[1] - pair[0] - spacing).abs() < 1e-6,
                "spacing {} != {}",
                pair[1] - pair[0],
                spacing
            );
        }
    }

    #[test]
    fn test_horizontal_lines() {
        let m = sample_metrics();
        let layer = build_horizontal_grid(&m, Color(0x333333));
        assert_eq!(layer.len(), 13);
        let second = layer.shapes()[1];
        assert!(approx_eq(second.y, m.note_row_height - m.half_grid_line_width));
        assert!(approx_eq(second.height, m.grid_line_width));
        assert_eq!(second.width, m.width);
        assert_eq!(second.fill, Color(0x333333));
    }

    #[test]
    fn test_first_line_at_start() {
        let m = sample_metrics();
        let x = m.time_to_x(&TransportTime::default(), CoordinateSpace::KeyStrip);
        assert_eq!(first_vertical_line_x(x, &m), m.key_strip_width);
    }

    #[test]
    fn test_first_line_after_seek() {
        let m = sample_metrics();
        for t in ["1:0:0", "2:1:3", "7:3:1.5", "0:0:1"] {
            let time: TransportTime = t.parse().unwrap();
            let x = m.time_to_x(&time, CoordinateSpace::KeyStrip);
            let first = first_vertical_line_x(x, &m);
            assert!(first >= m.key_strip_width - 1e-9, "{}", t);
            assert!(first - m.grid_line_spacing < m.key_strip_width, "{}", t);
            let steps = (first - x) / m.grid_line_spacing;
            assert!((steps - steps.round()).abs() < 1e-6, "{}", t);
        }
    }

    #[test]
    fn test_first_line_steps_back_when_ahead() {
        let m = sample_metrics();
        let x = m.key_strip_width + 3.5 * m.grid_line_spacing;
        let first = first_vertical_line_x(x, &m);
        assert!(first >= m.key_strip_width);
        assert!(first - m.grid_line_spacing < m.key_strip_width);
    }

    #[test]
    fn test_vertical_pool() {
        let m = sample_metrics();
        let layer = build_vertical_grid(m.key_strip_width, &m, Color::WHITE);
        assert_eq!(layer.len(), m.vertical_line_count());
        assert!(approx_eq(layer.shapes()[0].x, m.key_strip_width - m.half_grid_line_width));
        assert_eq!(layer.shapes()[0].height, m.height);
        assert_even_spacing(&layer, m.grid_line_spacing);
    }

    #[test]
    fn test_single_recycle() {
        let m = sample_metrics();
        let mut layer = build_vertical_grid(m.key_strip_width, &m, Color::WHITE);
        let last_before = layer.last().map(|l| l.x).unwrap();

        // Not yet past the edge: right edge still touches the strip
        let outcome = advance_vertical_grid(&mut layer, m.half_grid_line_width, &m);
        assert_eq!(outcome.recycled, 0);

        let outcome = advance_vertical_grid(&mut layer, 2.0, &m);
        assert_eq!(outcome.recycled, 1);
        assert!(!outcome.reanchored);
        assert_eq!(layer.len(), m.vertical_line_count());
        let moved = m.half_grid_line_width + 2.0;
        let expected_last = last_before - moved + m.grid_line_spacing;
        assert!(approx_eq(layer.last().map(|l| l.x).unwrap(), expected_last));
        assert_even_spacing(&layer, m.grid_line_spacing);
    }

    #[test]
    fn test_multiple_recycles_in_one_step() {
        let m = sample_metrics();
        let mut layer = build_vertical_grid(m.key_strip_width, &m, Color::WHITE);
        let outcome = advance_vertical_grid(&mut layer, 3.5 * m.grid_line_spacing, &m);
        assert_eq!(outcome.recycled, 4);
        assert!(!outcome.reanchored);
        assert_even_spacing(&layer, m.grid_line_spacing);
        assert!(layer.first().unwrap().x + m.grid_line_width >= m.key_strip_width);
    }

    #[test]
    fn test_huge_gap_reanchors() {
        let m = sample_metrics();
        let mut layer = build_vertical_grid(m.key_strip_width, &m, Color::WHITE);
        let movement = 1000.25 * m.grid_line_spacing;
        let outcome = advance_vertical_grid(&mut layer, movement, &m);
        assert!(outcome.reanchored);
        assert_eq!(layer.len(), m.vertical_line_count());
        assert_even_spacing(&layer, m.grid_line_spacing);

        let first = layer.first().unwrap().x + m.half_grid_line_width;
        assert!(first >= m.key_strip_width - 1e-6);
        assert!(first - m.grid_line_spacing < m.key_strip_width);

        // Still in phase with where the notes scrolled to
        let note_x = m.key_strip_width - movement;
        let steps = (first - note_x) / m.grid_line_spacing;
        assert!((steps - steps.round()).abs() < 1e-6);
    }

    #[test]
    fn test_pool_size_constant_under_random_frames() {
        let m = sample_metrics();
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        let mut layer = build_vertical_grid(m.key_strip_width, &m, Color::WHITE);
        let mut note_x = m.key_strip_width;

        for _ in 0..5_000 {
            let elapsed: f64 = if rng.gen_bool(0.01) {
                rng.gen_range(1_000.0..60_000.0)
            } else {
                rng.gen_range(0.0..40.0)
            };
            let movement = elapsed * m.scroll_px_per_ms;
            note_x -= movement;
            advance_vertical_grid(&mut layer, movement, &m);

            assert_eq!(layer.len(), m.vertical_line_count());
            let front = layer.first().unwrap();
            assert!(front.x + m.grid_line_width >= m.key_strip_width - 1e-6);
        }

        assert_even_spacing(&layer, m.grid_line_spacing);
        let first = layer.first().unwrap().x + m.half_grid_line_width;
        let steps = (first - note_x) / m.grid_line_spacing;
        assert!((steps - steps.round()).abs() < 1e-4);
    }

    #[test]
    fn test_empty_pool_is_noop() {
        let m = sample_metrics();
        let mut layer = Layer::new();
        assert_eq!(advance_vertical_grid(&mut layer, 10.0, &m), RecycleOutcome::default());
    }
}
