// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Note rectangles.

use super::{Layer, Shape};
use crate::config::NoteEvent;
use crate::error::Result;
use crate::layout::{CoordinateSpace, Metrics, PitchRange, TransportTime};
use crate::music::{ColorMap, NoteFormat, PitchResolver};

/// Everything needed to lay out notes besides the notes themselves
pub struct NoteLayout<'a> {
    pub metrics: &'a Metrics,
    pub range: PitchRange,
    pub format: NoteFormat,
    pub resolver: &'a dyn PitchResolver,
    pub colors: &'a ColorMap,
}

/// Build the note layer with its scroll offset set to `layer_x`.
///
/// The layer is built completely before it is returned, so any malformed
/// time, pitch or duration fails without touching the live scene.
pub fn build_note_layer(notes: &[NoteEvent], layout: &NoteLayout<'_>, layer_x: f64) -> Result<Layer> {
    let mut layer = Layer::with_capacity(notes.len());
    layer.x = layer_x;

    for note in notes {
        layer.push(note_shape(note, layout)?);
    }
    Ok(layer)
}

fn note_shape(note: &NoteEvent, layout: &NoteLayout<'_>) -> Result<Shape> {
    let m = layout.metrics;
    let pitch = layout.resolver.resolve(&note.pitch, layout.format)?;
    let time: TransportTime = note.time.parse()?;
    let divisor = note.duration.divisor()?;

    let x = m.time_to_x(&time, CoordinateSpace::NoteLayer) + m.half_grid_line_width;
    let y = m.height - (pitch.key - layout.range.min) as f64 * m.note_row_height
        + m.half_grid_line_width;
    let width = m.bar_width / divisor as f64;

    Ok(Shape::rect(
        x,
        y,
        width,
        m.inner_note_height,
        layout.colors.color_for(pitch.class),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RollConfig;
    use crate::error::RollError;
    use crate::layout::tests::approx_eq;
    use crate::layout::resolve_pitch_range;
    use crate::music::{Color, NoteColor, PaletteEntry, StandardPitchResolver};

    fn build(notes: &[NoteEvent], color: NoteColor) -> Result<(Layer, Metrics)> {
        let resolver = StandardPitchResolver;
        let range = resolve_pitch_range(notes, NoteFormat::String, &resolver)?;
        let metrics = Metrics::compute(&RollConfig::default(), range);
        let colors = ColorMap::resolve(&color, &resolver)?;
        let layout = NoteLayout {
            metrics: &metrics,
            range,
            format: NoteFormat::String,
            resolver: &resolver,
            colors: &colors,
        };
        let layer = build_note_layer(notes, &layout, 125.0)?;
        Ok((layer, metrics))
    }

    #[test]
    fn test_single_note_geometry() {
        let notes = vec![NoteEvent::new("0:0:0", "C4", "2n")];
        let (layer, m) = build(&notes, NoteColor::Single(Color(0xdb000f))).unwrap();
        assert_eq!(layer.x, 125.0);
        let shape = layer.shapes()[0];
        assert!(approx_eq(shape.x, m.half_grid_line_width));
        assert!(approx_eq(shape.width, 96.875));
        assert!(approx_eq(shape.y, m.half_grid_line_width));
        assert!(approx_eq(shape.height, m.inner_note_height));
        assert_eq!(shape.fill, Color(0xdb000f));
    }

    #[test]
    fn test_higher_pitch_is_higher_on_screen() {
        let names = ["A3", "C4", "C#4", "E4", "G4", "B4", "C5"];
        let notes: Vec<NoteEvent> = names.iter().map(|n| NoteEvent::new("0", *n, "4n")).collect();
        let (layer, _) = build(&notes, NoteColor::default()).unwrap();
        let ys: Vec<f64> = layer.shapes().iter().map(|s| s.y).collect();
        assert!(ys.windows(2).all(|w| w[1] < w[0]));
    }

    #[test]
    fn test_note_x_follows_transport_time() {
        let notes = vec![
            NoteEvent::new("0:0:0", "C4", "4n"),
            NoteEvent::new("1:2:1", "C4", "8n"),
        ];
        let (layer, m) = build(&notes, NoteColor::default()).unwrap();
        let second = layer.shapes()[1];
        let expected = m.bar_width + 2.0 * m.beat_width + m.sixteenth_width + m.half_grid_line_width;
        assert!(approx_eq(second.x, expected));
        assert!(approx_eq(second.width, m.bar_width / 8.0));
    }

    #[test]
    fn test_palette_color_by_pitch_class() {
        let palette = NoteColor::Palette(vec![
            PaletteEntry::new("C", Color(0x111111)),
            PaletteEntry::new("E", Color(0x222222)),
            PaletteEntry::new("c", Color(0x333333)),
        ]);
        let notes = vec![
            NoteEvent::new("0", "C4", "4n"),
            NoteEvent::new("0", "E5", "4n"),
        ];
        let (layer, _) = build(&notes, palette).unwrap();
        assert_eq!(layer.shapes()[0].fill, Color(0x333333));
        assert_eq!(layer.shapes()[1].fill, Color(0x222222));
    }

    #[test]
    fn test_malformed_note_fails_whole_layer() {
        let notes = vec![
            NoteEvent::new("0", "C4", "4n"),
            NoteEvent::new("bar one", "D4", "4n"),
        ];
        assert!(matches!(
            build(&notes, NoteColor::default()),
            Err(RollError::MalformedTime { .. })
        ));

        let notes = vec![NoteEvent::new("0", "C4", "whole")];
        assert!(matches!(
            build(&notes, NoteColor::default()),
            Err(RollError::InvalidDuration(_))
        ));
    }
}
