// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Headless backend producing a flat list of draw commands.

use super::{RenderBackend, RendererKind, View};
use crate::error::Result;
use crate::music::Color;
use crate::scene::{LayerId, Scene, Stroke};

/// One rectangle in scene coordinates (layer offsets applied)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCommand {
    pub layer: LayerId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill: Color,
    pub stroke: Option<Stroke>,
}

/// Backend that records what would be painted
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    commands: Vec<DrawCommand>,
    frames: u64,
}

impl HeadlessRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Commands belonging to one layer
    pub fn layer_commands(&self, layer: LayerId) -> impl Iterator<Item = &DrawCommand> + '_ {
        self.commands.iter().filter(move |c| c.layer == layer)
    }
}

impl RenderBackend for HeadlessRenderer {
    fn kind(&self) -> RendererKind {
        RendererKind::Headless
    }

    fn render(&mut self, scene: &Scene) -> Result<()> {
        self.commands.clear();
        self.commands.reserve(scene.shape_count());
        for (id, layer) in scene.layers() {
            self.commands.extend(layer.shapes().iter().map(|shape| DrawCommand {
                layer: id,
                x: layer.x + shape.x,
                y: layer.y + shape.y,
                width: shape.width,
                height: shape.height,
                fill: shape.fill,
                stroke: shape.stroke,
            }));
        }
        self.frames += 1;
        Ok(())
    }

    fn view(&self) -> View<'_> {
        View::DrawList(&self.commands)
    }

    fn frames(&self) -> u64 {
        self.frames
    }
}
