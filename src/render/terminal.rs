// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Terminal backend rasterizing the scene into ratatui cells.
//!
//! The scene is sampled on a coarse grid: one sample per cell, or two
//! stacked samples per cell drawn with an upper half block when antialias
//! is on. A rectangle paints every sample it overlaps, so one-pixel grid
//! lines stay visible at terminal resolution.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Color as TermColor;

use super::{RenderBackend, RendererKind, View};
use crate::config::RollConfig;
use crate::error::{Result, RollError};
use crate::music::Color;
use crate::scene::Scene;

/// Scene pixels per terminal column when sizing from a config
pub const DEFAULT_CELL_WIDTH: f64 = 8.0;
/// Scene pixels per terminal row when sizing from a config
pub const DEFAULT_CELL_HEIGHT: f64 = 16.0;

const UPPER_HALF_BLOCK: &str = "▀";

/// Backend painting into a ratatui [`Buffer`]
#[derive(Debug)]
pub struct TerminalRenderer {
    buffer: Buffer,
    antialias: bool,
    samples: Vec<Color>,
    frames: u64,
}

impl TerminalRenderer {
    /// Create a renderer with a fixed cell surface
    pub fn new(columns: u16, rows: u16, antialias: bool) -> Self {
        Self {
            buffer: Buffer::empty(Rect::new(0, 0, columns, rows)),
            antialias,
            samples: Vec::new(),
            frames: 0,
        }
    }

    /// Size the surface from the roll's pixel dimensions
    pub fn for_config(config: &RollConfig) -> Self {
        Self::new(
            cells_for(config.width, DEFAULT_CELL_WIDTH),
            cells_for(config.height, DEFAULT_CELL_HEIGHT),
            config.antialias,
        )
    }

    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    /// Sampled color at a column and sample row of the last frame
    pub fn sample(&self, column: usize, sample_row: usize) -> Option<Color> {
        let columns = self.buffer.area.width as usize;
        if column >= columns {
            return None;
        }
        self.samples.get(sample_row * columns + column).copied()
    }

    fn sample_rows(&self) -> usize {
        let rows = self.buffer.area.height as usize;
        if self.antialias {
            rows * 2
        } else {
            rows
        }
    }

    fn rasterize(&mut self, scene: &Scene) -> Result<()> {
        let columns = self.buffer.area.width as usize;
        let rows = self.sample_rows();
        if columns == 0 || rows == 0 {
            return Err(RollError::Render("terminal surface has no cells".to_string()));
        }
        if !(scene.width() > 0.0 && scene.height() > 0.0) {
            return Err(RollError::Render(format!(
                "scene has no area ({}x{})",
                scene.width(),
                scene.height()
            )));
        }

        let mut raster = Raster {
            samples: std::mem::take(&mut self.samples),
            columns,
            rows,
            sample_width: scene.width() / columns as f64,
            sample_height: scene.height() / rows as f64,
        };
        raster.samples.clear();
        raster.samples.resize(columns * rows, Color::BLACK);

        for (_, layer) in scene.layers() {
            for shape in layer.shapes() {
                let x = layer.x + shape.x;
                let y = layer.y + shape.y;
                match shape.stroke {
                    Some(stroke) => {
                        let half = stroke.width / 2.0;
                        raster.fill(
                            x - half,
                            y - half,
                            shape.width + stroke.width,
                            shape.height + stroke.width,
                            stroke.color,
                        );
                        raster.fill(
                            x + half,
                            y + half,
                            shape.width - stroke.width,
                            shape.height - stroke.width,
                            shape.fill,
                        );
                    }
                    None => raster.fill(x, y, shape.width, shape.height, shape.fill),
                }
            }
        }

        self.samples = raster.samples;
        Ok(())
    }

    fn write_cells(&mut self) {
        let area = self.buffer.area;
        let columns = area.width as usize;
        for row in 0..area.height {
            for col in 0..area.width {
                let index = |sample_row: usize| sample_row * columns + col as usize;
                let (top, bottom) = if self.antialias {
                    let r = row as usize * 2;
                    (self.samples[index(r)], self.samples[index(r + 1)])
                } else {
                    let s = self.samples[index(row as usize)];
                    (s, s)
                };
                if let Some(cell) = self.buffer.cell_mut((area.x + col, area.y + row)) {
                    if self.antialias {
                        cell.set_symbol(UPPER_HALF_BLOCK)
                            .set_fg(term_color(top))
                            .set_bg(term_color(bottom));
                    } else {
                        cell.set_symbol(" ")
                            .set_fg(term_color(top))
                            .set_bg(term_color(bottom));
                    }
                }
            }
        }
    }
}

impl RenderBackend for TerminalRenderer {
    fn kind(&self) -> RendererKind {
        RendererKind::Terminal
    }

    fn render(&mut self, scene: &Scene) -> Result<()> {
        self.rasterize(scene)?;
        self.write_cells();
        self.frames += 1;
        Ok(())
    }

    fn view(&self) -> View<'_> {
        View::Cells(&self.buffer)
    }

    fn frames(&self) -> u64 {
        self.frames
    }

    fn resize(&mut self, columns: u16, rows: u16) {
        if self.buffer.area.width != columns || self.buffer.area.height != rows {
            self.buffer = Buffer::empty(Rect::new(0, 0, columns, rows));
            self.samples.clear();
        }
    }
}

/// Sample grid being painted
struct Raster {
    samples: Vec<Color>,
    columns: usize,
    rows: usize,
    sample_width: f64,
    sample_height: f64,
}

impl Raster {
    fn fill(&mut self, x: f64, y: f64, width: f64, height: f64, color: Color) {
        if !(width > 0.0 && height > 0.0) {
            return;
        }
        let (c0, c1) = span(x, width, self.sample_width, self.columns);
        let (r0, r1) = span(y, height, self.sample_height, self.rows);
        for r in r0..r1 {
            let row = &mut self.samples[r * self.columns..(r + 1) * self.columns];
            for sample in &mut row[c0..c1] {
                *sample = color;
            }
        }
    }
}

/// Sample indices overlapped by `[start, start + len)`, clipped to `0..limit`
fn span(start: f64, len: f64, step: f64, limit: usize) -> (usize, usize) {
    let first = (start / step).floor().max(0.0);
    let last = ((start + len) / step).ceil().min(limit as f64);
    if last <= first {
        return (0, 0);
    }
    (first as usize, last as usize)
}

fn cells_for(pixels: f64, cell: f64) -> u16 {
    (pixels / cell).ceil().clamp(1.0, u16::MAX as f64) as u16
}

fn term_color(color: Color) -> TermColor {
    let (r, g, b) = color.components();
    TermColor::Rgb(r, g, b)
}
