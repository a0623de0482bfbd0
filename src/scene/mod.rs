// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Retained scene graph for the piano roll.
//!
//! The engine never touches pixels. It builds layers of filled rectangles
//! and hands the whole [`Scene`] to a render backend. Layers are replaced
//! wholesale: a builder constructs a complete new layer before it is
//! swapped in, so a failed rebuild leaves the visible scene untouched.

pub mod grid;
pub mod keys;
pub mod notes;

pub use grid::{build_horizontal_grid, build_vertical_grid, first_vertical_line_x, RecycleOutcome};
pub use keys::build_key_layer;
pub use notes::build_note_layer;

use std::collections::VecDeque;

use crate::music::Color;

/// Outline drawn centered on a rectangle's edge
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub width: f64,
    pub color: Color,
}

/// A filled rectangle in its layer's coordinate space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shape {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill: Color,
    pub stroke: Option<Stroke>,
}

impl Shape {
    /// A filled rectangle without outline
    pub fn rect(x: f64, y: f64, width: f64, height: f64, fill: Color) -> Self {
        Self {
            x,
            y,
            width,
            height,
            fill,
            stroke: None,
        }
    }

    /// Add an outline
    pub fn with_stroke(mut self, width: f64, color: Color) -> Self {
        self.stroke = (width > 0.0).then_some(Stroke { width, color });
        self
    }
}

/// A container of shapes with its own offset
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layer {
    pub x: f64,
    pub y: f64,
    shapes: VecDeque<Shape>,
}

impl Layer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty layer with room for `capacity` shapes
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            shapes: VecDeque::with_capacity(capacity),
        }
    }

    /// Append a shape (painted above earlier shapes)
    pub fn push(&mut self, shape: Shape) {
        self.shapes.push_back(shape);
    }

    pub fn shapes(&self) -> &VecDeque<Shape> {
        &self.shapes
    }

    pub fn shapes_mut(&mut self) -> &mut VecDeque<Shape> {
        &mut self.shapes
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn first(&self) -> Option<&Shape> {
        self.shapes.front()
    }

    pub fn last(&self) -> Option<&Shape> {
        self.shapes.back()
    }
}

/// Layer slots, listed in paint order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerId {
    Background,
    HorizontalGrid,
    VerticalGrid,
    Notes,
    Keys,
}

impl LayerId {
    /// Paint order: earlier layers are covered by later ones
    pub const PAINT_ORDER: [LayerId; 5] = [
        LayerId::Background,
        LayerId::HorizontalGrid,
        LayerId::VerticalGrid,
        LayerId::Notes,
        LayerId::Keys,
    ];
}

/// The full piano roll scene
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    width: f64,
    height: f64,
    background: Layer,
    horizontal_grid: Layer,
    vertical_grid: Layer,
    notes: Layer,
    keys: Layer,
}

impl Scene {
    /// Create a scene with a solid background and empty content layers
    pub fn new(width: f64, height: f64, background: Color) -> Self {
        let mut bg = Layer::with_capacity(1);
        bg.push(Shape::rect(0.0, 0.0, width, height, background));
        Self {
            width,
            height,
            background: bg,
            horizontal_grid: Layer::new(),
            vertical_grid: Layer::new(),
            notes: Layer::new(),
            keys: Layer::new(),
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Borrow a layer
    pub fn layer(&self, id: LayerId) -> &Layer {
        match id {
            LayerId::Background => &self.background,
            LayerId::HorizontalGrid => &self.horizontal_grid,
            LayerId::VerticalGrid => &self.vertical_grid,
            LayerId::Notes => &self.notes,
            LayerId::Keys => &self.keys,
        }
    }

    /// Mutably borrow a layer
    pub fn layer_mut(&mut self, id: LayerId) -> &mut Layer {
        match id {
            LayerId::Background => &mut self.background,
            LayerId::HorizontalGrid => &mut self.horizontal_grid,
            LayerId::VerticalGrid => &mut self.vertical_grid,
            LayerId::Notes => &mut self.notes,
            LayerId::Keys => &mut self.keys,
        }
    }

    /// Swap in a fully built replacement, returning the old layer
    pub fn replace(&mut self, id: LayerId, layer: Layer) -> Layer {
        std::mem::replace(self.layer_mut(id), layer)
    }

    /// Layers in paint order
    pub fn layers(&self) -> impl Iterator<Item = (LayerId, &Layer)> + '_ {
        LayerId::PAINT_ORDER.iter().map(move |&id| (id, self.layer(id)))
    }

    /// Total number of shapes across all layers
    pub fn shape_count(&self) -> usize {
        self.layers().map(|(_, layer)| layer.len()).sum()
    }
}
