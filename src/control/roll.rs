// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! The piano roll handle.
//!
//! [`PianoRoll`] owns the configuration, derived metrics, the retained
//! scene, the playback clock and the render backend. Every setter validates
//! its input and builds complete replacement layers before touching the
//! live scene, so a failed call leaves the roll exactly as it was.

use tracing::{debug, info, trace, warn};

use crate::config::{
    validate_bpm, validate_grid_lines, validate_resolution, validate_zoom, NoteEvent, RollConfig,
};
use crate::error::Result;
use crate::layout::{
    resolve_pitch_range, transport_time_to_x, CoordinateSpace, Metrics, PitchRange, TransportTime,
};
use crate::music::{ColorMap, PitchResolver, StandardPitchResolver};
use crate::render::{create_renderer, RenderBackend, RendererKind, View};
use crate::scene::grid::advance_vertical_grid;
use crate::scene::notes::NoteLayout;
use crate::scene::{
    build_horizontal_grid, build_key_layer, build_note_layer, build_vertical_grid, Layer, LayerId,
    Scene,
};
use crate::timing::{FrameRequest, PlaybackClock};

/// A live, animatable piano roll
pub struct PianoRoll {
    config: RollConfig,
    resolver: Box<dyn PitchResolver>,
    renderer: Box<dyn RenderBackend>,
    colors: ColorMap,
    range: PitchRange,
    metrics: Metrics,
    scene: Scene,
    clock: PlaybackClock,
}

impl PianoRoll {
    /// Build a roll with the standard pitch resolver and the configured
    /// render backend, painting the first frame
    pub fn new(config: RollConfig) -> Result<Self> {
        let renderer = create_renderer(config.renderer, &config);
        Self::with_parts(config, Box::new(StandardPitchResolver), renderer)
    }

    /// Build a roll from explicit collaborators
    pub fn with_parts(
        config: RollConfig,
        resolver: Box<dyn PitchResolver>,
        renderer: Box<dyn RenderBackend>,
    ) -> Result<Self> {
        config.validate()?;

        let range = resolve_pitch_range(&config.notes, config.note_format, resolver.as_ref())?;
        let metrics = Metrics::compute(&config, range);
        let colors = ColorMap::resolve(&config.note_color, resolver.as_ref())?;
        let layer_x =
            transport_time_to_x(Some(config.time.as_str()), CoordinateSpace::KeyStrip, &metrics)?;

        let mut scene = Scene::new(config.width, config.height, config.background_color);
        let notes = build_note_layer(
            &config.notes,
            &NoteLayout {
                metrics: &metrics,
                range,
                format: config.note_format,
                resolver: resolver.as_ref(),
                colors: &colors,
            },
            layer_x,
        )?;
        scene.replace(
            LayerId::HorizontalGrid,
            build_horizontal_grid(&metrics, config.grid_line_color),
        );
        scene.replace(
            LayerId::VerticalGrid,
            build_vertical_grid(layer_x, &metrics, config.grid_line_color),
        );
        scene.replace(LayerId::Notes, notes);
        scene.replace(LayerId::Keys, build_key_layer(&metrics, range));

        let mut roll = Self {
            config,
            resolver,
            renderer,
            colors,
            range,
            metrics,
            scene,
            clock: PlaybackClock::new(),
        };
        roll.render()?;

        info!(
            renderer = %roll.renderer.kind(),
            notes = roll.config.notes.len(),
            min_key = range.min,
            max_key = range.max,
            "piano roll created"
        );
        Ok(roll)
    }

    // Transport

    /// Start playback, first seeking to `time` if one is given
    pub fn play(&mut self, time: Option<&str>) -> Result<()> {
        if self.clock.is_playing() {
            return Ok(());
        }
        if let Some(t) = time.filter(|t| !t.trim().is_empty()) {
            self.seek(t)?;
        }
        self.clock.play();
        info!(position = %self.position(), "play");
        Ok(())
    }

    /// Stop playback; a frame already in flight still completes
    pub fn pause(&mut self) {
        if self.clock.pause() {
            info!(position = %self.position(), "pause");
        }
    }

    /// Pause if playing, otherwise play from `time` or the current position
    pub fn toggle(&mut self, time: Option<&str>) -> Result<()> {
        if self.clock.is_playing() {
            self.pause();
            Ok(())
        } else {
            self.play(time)
        }
    }

    /// Move the playback position without changing the playing state.
    ///
    /// Rebuilds the vertical grid anchored at the new position and renders.
    pub fn seek(&mut self, time: &str) -> Result<()> {
        let layer_x = transport_time_to_x(Some(time), CoordinateSpace::KeyStrip, &self.metrics)?;
        let grid = build_vertical_grid(layer_x, &self.metrics, self.config.grid_line_color);

        self.config.time = time.to_string();
        self.scene.layer_mut(LayerId::Notes).x = layer_x;
        self.scene.replace(LayerId::VerticalGrid, grid);
        self.render()?;

        info!(time, layer_x, "seek");
        Ok(())
    }

    /// Advance one host frame.
    ///
    /// Scrolls the notes and grid by the time elapsed since the previous
    /// frame and repaints. Returns whether the host should schedule another
    /// frame. A frame nobody asked for is ignored.
    pub fn frame(&mut self, timestamp_ms: f64) -> Result<FrameRequest> {
        let Some(tick) = self.clock.tick(timestamp_ms, self.metrics.scroll_px_per_ms) else {
            return Ok(FrameRequest::Stop);
        };

        self.scene.layer_mut(LayerId::Notes).x -= tick.movement;
        let outcome = advance_vertical_grid(
            self.scene.layer_mut(LayerId::VerticalGrid),
            tick.movement,
            &self.metrics,
        );
        if outcome.reanchored {
            warn!(
                elapsed_ms = tick.elapsed_ms,
                movement = tick.movement,
                "frame gap outran the grid pool, re-anchored vertical grid"
            );
        }
        trace!(
            timestamp_ms,
            movement = tick.movement,
            recycled = outcome.recycled,
            "frame"
        );

        self.render()?;
        Ok(tick.request)
    }

    // Setters

    /// Change the tempo. Only the scroll velocity changes; nothing is
    /// rebuilt or repainted.
    pub fn set_bpm(&mut self, bpm: f64) -> Result<()> {
        validate_bpm(bpm)?;
        self.config.bpm = bpm;
        self.metrics = Metrics::compute(&self.config, self.range);
        debug!(bpm, px_per_ms = self.metrics.scroll_px_per_ms, "tempo changed");
        Ok(())
    }

    /// Change the number of visible bars.
    ///
    /// Rebuilds both grids and the notes at the current scroll offset, then
    /// renders.
    pub fn set_zoom(&mut self, zoom: u32) -> Result<()> {
        validate_zoom(zoom)?;
        validate_grid_lines(zoom, self.config.resolution)?;
        let mut config = self.config.clone();
        config.zoom = zoom;
        let metrics = Metrics::compute(&config, self.range);
        let layer_x = self.note_layer_x();

        let notes = self.build_notes(&config.notes, &metrics, self.range, layer_x)?;
        let horizontal = build_horizontal_grid(&metrics, config.grid_line_color);
        let vertical = build_vertical_grid(layer_x, &metrics, config.grid_line_color);

        self.config = config;
        self.metrics = metrics;
        self.scene.replace(LayerId::HorizontalGrid, horizontal);
        self.scene.replace(LayerId::VerticalGrid, vertical);
        self.scene.replace(LayerId::Notes, notes);
        self.render()?;

        debug!(zoom, bar_width = metrics.bar_width, "zoom changed");
        Ok(())
    }

    /// Change the number of vertical grid lines per bar
    pub fn set_resolution(&mut self, resolution: u32) -> Result<()> {
        validate_resolution(resolution)?;
        validate_grid_lines(self.config.zoom, resolution)?;
        let mut config = self.config.clone();
        config.resolution = resolution;
        let metrics = Metrics::compute(&config, self.range);
        let vertical = build_vertical_grid(self.note_layer_x(), &metrics, config.grid_line_color);

        self.config = config;
        self.metrics = metrics;
        self.scene.replace(LayerId::VerticalGrid, vertical);
        self.render()?;

        debug!(resolution, lines = metrics.vertical_line_count(), "resolution changed");
        Ok(())
    }

    /// Replace the note data.
    ///
    /// The pitch range may change, so every y-dependent layer is rebuilt and
    /// the scroll offset returns to the current transport time.
    pub fn set_notes(&mut self, notes: Vec<NoteEvent>) -> Result<()> {
        let range = resolve_pitch_range(&notes, self.config.note_format, self.resolver.as_ref())?;
        let metrics = Metrics::compute(&self.config, range);
        let time = Some(self.config.time.as_str());
        let layer_x = transport_time_to_x(time, CoordinateSpace::KeyStrip, &metrics)?;

        let note_layer = self.build_notes(&notes, &metrics, range, layer_x)?;
        let horizontal = build_horizontal_grid(&metrics, self.config.grid_line_color);
        let vertical = build_vertical_grid(layer_x, &metrics, self.config.grid_line_color);
        let keys = build_key_layer(&metrics, range);

        self.config.notes = notes;
        self.range = range;
        self.metrics = metrics;
        self.scene.replace(LayerId::HorizontalGrid, horizontal);
        self.scene.replace(LayerId::VerticalGrid, vertical);
        self.scene.replace(LayerId::Notes, note_layer);
        self.scene.replace(LayerId::Keys, keys);
        self.render()?;

        debug!(
            notes = self.config.notes.len(),
            min_key = range.min,
            max_key = range.max,
            "note data replaced"
        );
        Ok(())
    }

    /// Resize the backend's cell surface and repaint
    pub fn resize_view(&mut self, columns: u16, rows: u16) -> Result<()> {
        self.renderer.resize(columns, rows);
        self.render()
    }

    // Queries

    pub fn playing(&self) -> bool {
        self.clock.is_playing()
    }

    /// Latest painted output
    pub fn view(&self) -> View<'_> {
        self.renderer.view()
    }

    pub fn renderer_kind(&self) -> RendererKind {
        self.renderer.kind()
    }

    /// Frames painted so far
    pub fn frames_rendered(&self) -> u64 {
        self.renderer.frames()
    }

    /// Transport position currently at the key strip edge
    pub fn position(&self) -> TransportTime {
        self.metrics.x_to_time(self.note_layer_x())
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn pitch_range(&self) -> PitchRange {
        self.range
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn config(&self) -> &RollConfig {
        &self.config
    }

    /// The note layer's x offset: the single scroll position
    pub fn note_layer_x(&self) -> f64 {
        self.scene.layer(LayerId::Notes).x
    }

    pub fn vertical_line_count(&self) -> usize {
        self.scene.layer(LayerId::VerticalGrid).len()
    }

    fn build_notes(
        &self,
        notes: &[NoteEvent],
        metrics: &Metrics,
        range: PitchRange,
        layer_x: f64,
    ) -> Result<Layer> {
        let layout = NoteLayout {
            metrics,
            range,
            format: self.config.note_format,
            resolver: self.resolver.as_ref(),
            colors: &self.colors,
        };
        build_note_layer(notes, &layout, layer_x)
    }

    fn render(&mut self) -> Result<()> {
        self.renderer.render(&self.scene)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RollError;
    use crate::layout::tests::approx_eq;
    use crate::render::HeadlessRenderer;

    fn roll() -> PianoRoll {
        let config = RollConfig {
            notes: vec![
                NoteEvent::new("0:0:0", "C4", "2n"),
                NoteEvent::new("0:2:0", "E4", "4n"),
                NoteEvent::new("1:0:0", "G4", "4n"),
            ],
            ..RollConfig::default()
        };
        PianoRoll::new(config).unwrap()
    }

    #[test]
    fn test_initial_scene() {
        let roll = roll();
        assert!(!roll.playing());
        assert_eq!(roll.note_layer_x(), 125.0);
        assert_eq!(roll.vertical_line_count(), 9);
        assert_eq!(roll.scene().layer(LayerId::Notes).len(), 3);
        assert_eq!(roll.frames_rendered(), 1);
        assert_eq!(roll.renderer_kind(), RendererKind::Headless);
    }

    #[test]
    fn test_rejects_bad_construction() {
        let empty = RollConfig::default();
        assert!(matches!(PianoRoll::new(empty), Err(RollError::EmptyNoteData)));

        let config = RollConfig {
            notes: vec![NoteEvent::new("0", "H9", "4n")],
            ..RollConfig::default()
        };
        assert!(matches!(
            PianoRoll::new(config),
            Err(RollError::UnresolvablePitch { .. })
        ));
    }

    #[test]
    fn test_frames_scroll_notes() {
        let mut roll = roll();
        roll.play(None).unwrap();
        assert_eq!(roll.frame(1000.0).unwrap(), FrameRequest::Continue);
        assert_eq!(roll.note_layer_x(), 125.0);

        roll.frame(1100.0).unwrap();
        let expected = 125.0 - 100.0 * roll.metrics().scroll_px_per_ms;
        assert!(approx_eq(roll.note_layer_x(), expected));
        assert_eq!(roll.vertical_line_count(), 9);
    }

    #[test]
    fn test_unrequested_frame_is_ignored() {
        let mut roll = roll();
        let frames = roll.frames_rendered();
        assert_eq!(roll.frame(16.0).unwrap(), FrameRequest::Stop);
        assert_eq!(roll.note_layer_x(), 125.0);
        assert_eq!(roll.frames_rendered(), frames);
    }

    #[test]
    fn test_pause_lets_in_flight_frame_finish() {
        let mut roll = roll();
        roll.play(None).unwrap();
        roll.frame(0.0).unwrap();
        roll.pause();
        assert!(!roll.playing());
        assert_eq!(roll.frame(50.0).unwrap(), FrameRequest::Stop);
        assert!(roll.note_layer_x() < 125.0);
        assert_eq!(roll.frame(60.0).unwrap(), FrameRequest::Stop);
    }

    #[test]
    fn test_play_with_time_seeks() {
        let mut roll = roll();
        roll.play(Some("1:0:0")).unwrap();
        assert!(roll.playing());
        let expected = 125.0 - roll.metrics().bar_width;
        assert!(approx_eq(roll.note_layer_x(), expected));
        assert_eq!(roll.config().time, "1:0:0");
    }

    #[test]
    fn test_malformed_seek_leaves_roll_untouched() {
        let mut roll = roll();
        let before = roll.scene().clone();
        assert!(matches!(roll.seek("one:two"), Err(RollError::MalformedTime { .. })));
        assert_eq!(roll.scene(), &before);
        assert!(roll.play(Some("x")).is_err());
        assert!(!roll.playing());
    }

    #[test]
    fn test_far_seek_is_rejected() {
        let mut roll = roll();
        let before = roll.scene().clone();
        for far in ["5e306", "-1e300"] {
            assert!(matches!(roll.seek(far), Err(RollError::MalformedTime { .. })), "{}", far);
            assert_eq!(roll.scene(), &before);
        }

        for edge in ["1000000", "-1000000"] {
            roll.seek(edge).unwrap();
            let m = *roll.metrics();
            let first = roll.scene().layer(LayerId::VerticalGrid).shapes()[0].x
                + m.half_grid_line_width;
            assert!(first.is_finite(), "{}", edge);
            assert!(first >= m.key_strip_width - 1e-6, "{}", edge);
            assert!(first - m.grid_line_spacing < m.key_strip_width, "{}", edge);
        }
    }

    #[test]
    fn test_bpm_only_changes_velocity() {
        let mut roll = roll();
        let frames = roll.frames_rendered();
        let scene = roll.scene().clone();
        roll.set_bpm(70.0).unwrap();
        assert_eq!(roll.scene(), &scene);
        assert_eq!(roll.frames_rendered(), frames);
        assert!(roll.set_bpm(0.0).is_err());
        assert_eq!(roll.config().bpm, 70.0);
    }

    #[test]
    fn test_resolution_rebuilds_vertical_grid() {
        let mut roll = roll();
        roll.set_resolution(4).unwrap();
        assert_eq!(roll.vertical_line_count(), 17);
        assert!(roll.set_resolution(0).is_err());
        assert_eq!(roll.vertical_line_count(), 17);
    }

    #[test]
    fn test_grid_line_limit() {
        let mut roll = roll();
        let before = roll.scene().clone();

        assert!(matches!(roll.set_zoom(u32::MAX), Err(RollError::InvalidConfig(_))));
        assert!(matches!(
            roll.set_resolution(u32::MAX),
            Err(RollError::InvalidConfig(_))
        ));
        // 4 bars * 1025 lines per bar is past the pool limit
        assert!(roll.set_resolution(1025).is_err());
        assert_eq!(roll.scene(), &before);
        assert_eq!(roll.config().zoom, 4);

        roll.set_resolution(1024).unwrap();
        assert_eq!(roll.vertical_line_count(), 4097);
    }

    #[test]
    fn test_huge_pitch_span_is_rejected() {
        let config = RollConfig {
            note_format: crate::music::NoteFormat::Key,
            notes: vec![
                NoteEvent::new("0", 1_000_000_000, "4n"),
                NoteEvent::new("0", -1_000_000_000, "4n"),
            ],
            ..RollConfig::default()
        };
        assert!(matches!(PianoRoll::new(config), Err(RollError::InvalidConfig(_))));

        let mut roll = roll();
        let notes = vec![NoteEvent::new("0", "C0", "4n"), NoteEvent::new("0", "C200", "4n")];
        assert!(matches!(roll.set_notes(notes), Err(RollError::InvalidConfig(_))));
        assert_eq!(roll.scene().layer(LayerId::Notes).len(), 3);
    }

    #[test]
    fn test_set_notes_resets_scroll() {
        let mut roll = roll();
        roll.play(None).unwrap();
        roll.frame(0.0).unwrap();
        roll.frame(500.0).unwrap();
        assert!(roll.note_layer_x() < 125.0);

        roll.set_notes(vec![NoteEvent::new("0", "A0", "1n"), NoteEvent::new("0", "C8", "1n")])
            .unwrap();
        assert_eq!(roll.note_layer_x(), 125.0);
        assert_eq!(roll.pitch_range(), PitchRange { min: 0, max: 88 });
        assert_eq!(roll.scene().layer(LayerId::Keys).len(), 90);

        let before = roll.scene().clone();
        assert!(matches!(roll.set_notes(Vec::new()), Err(RollError::EmptyNoteData)));
        assert_eq!(roll.scene(), &before);
    }

    #[test]
    fn test_with_parts_uses_given_renderer() {
        let config = RollConfig {
            notes: vec![NoteEvent::new("0", "C4", "4n")],
            renderer: RendererKind::Terminal,
            ..RollConfig::default()
        };
        let roll = PianoRoll::with_parts(
            config,
            Box::new(StandardPitchResolver),
            Box::new(HeadlessRenderer::new()),
        )
        .unwrap();
        assert_eq!(roll.renderer_kind(), RendererKind::Headless);
        assert!(roll.view().draw_count().unwrap() > 0);
    }
}
