// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Piano key strip.

use super::{Layer, Shape};
use crate::layout::{Metrics, PitchRange};
use crate::music::{Color, Pitch, PitchClass};

/// Key strip width divided by black key width
pub const BLACK_KEY_WIDTH_RATIO: f64 = 1.575;

/// White key outline width as a fraction of the row height
const WHITE_KEY_BORDER_RATIO: f64 = 10.0;

/// Shape of a white key, in rows
#[derive(Debug, Clone, Copy, PartialEq)]
struct WhiteKeyGeometry {
    /// Key height in rows
    height: f64,
    /// Shift from the key's own row, in rows (negative is up)
    y_offset: f64,
}

const WIDE: WhiteKeyGeometry = WhiteKeyGeometry {
    height: 2.0,
    y_offset: -0.5,
};
const NARROW: WhiteKeyGeometry = WhiteKeyGeometry {
    height: 1.5,
    y_offset: -0.5,
};
// No black key above: the key sits flush on its row
const FLUSH: WhiteKeyGeometry = WhiteKeyGeometry {
    height: 1.5,
    y_offset: 0.0,
};

/// White key geometry indexed by chroma; `None` for black keys
const WHITE_KEYS: [Option<WhiteKeyGeometry>; 12] = [
    Some(NARROW), // C
    None,         // C#
    Some(WIDE),   // D
    None,         // D#
    Some(FLUSH),  // E
    Some(NARROW), // F
    None,         // F#
    Some(WIDE),   // G
    None,         // G#
    Some(WIDE),   // A
    None,         // A#
    Some(FLUSH),  // B
];

fn white_key_geometry(class: PitchClass) -> Option<WhiteKeyGeometry> {
    WHITE_KEYS[class.chroma() as usize]
}

/// Build the key strip for every key from `range.min` to `range.max + 1`.
///
/// White keys are painted first so black keys cover their edges.
pub fn build_key_layer(metrics: &Metrics, range: PitchRange) -> Layer {
    let rh = metrics.note_row_height;
    let black_key_width = metrics.key_strip_width / BLACK_KEY_WIDTH_RATIO;
    let border = rh / WHITE_KEY_BORDER_RATIO;

    let mut white = Vec::new();
    let mut black = Vec::new();

    for key in range.min..=range.max + 1 {
        let class = Pitch::from_key(key).class;
        let y = metrics.height + (range.min - key) as f64 * rh;

        match white_key_geometry(class) {
            Some(geometry) => white.push(
                Shape::rect(
                    0.0,
                    y + geometry.y_offset * rh,
                    metrics.key_strip_width,
                    geometry.height * rh,
                    Color::WHITE,
                )
                .with_stroke(border, Color::BLACK),
            ),
            None => black.push(Shape::rect(0.0, y, black_key_width, rh, Color::BLACK)),
        }
    }

    let mut layer = Layer::with_capacity(white.len() + black.len());
    for shape in white.into_iter().chain(black) {
        layer.push(shape);
    }
    layer
}
