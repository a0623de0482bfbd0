// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Integration tests for the piano roll
//!
//! These tests drive the public API the way a host would: load a roll,
//! feed it frames, and poke the control surface.

use std::fs;

use pianoroll::config::validate_config;
use pianoroll::layout::{transport_time_to_x, CoordinateSpace};
use pianoroll::music::parse_note_name;
use pianoroll::render::DrawCommand;
use pianoroll::{
    FrameRequest, LayerId, NoteEvent, PianoRoll, RollConfig, RollError, RollFile, View,
};
use tempfile::tempdir;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9 * (1.0 + a.abs().max(b.abs()))
}

fn c4_roll() -> PianoRoll {
    let config = RollConfig {
        width: 900.0,
        height: 400.0,
        key_strip_width: 125.0,
        zoom: 4,
        resolution: 2,
        notes: vec![NoteEvent::new("0:0:0", "C4", "2n")],
        ..RollConfig::default()
    };
    PianoRoll::new(config).unwrap()
}

fn melody_roll() -> PianoRoll {
    let notes = [
        ("0:0:0", "C4", "4n"),
        ("0:1:0", "D4", "4n"),
        ("0:2:0", "E4", "4n"),
        ("0:3:0", "F4", "4n"),
        ("1:0:0", "G4", "2n"),
        ("1:2:0", "A4", "8n"),
        ("1:2:2", "B4", "8n"),
        ("1:3:0", "C5", "4n"),
    ];
    let config = RollConfig {
        notes: notes
            .iter()
            .map(|(t, p, d)| NoteEvent::new(*t, *p, *d))
            .collect(),
        ..RollConfig::default()
    };
    PianoRoll::new(config).unwrap()
}

fn draw_list<'a>(roll: &'a PianoRoll) -> &'a [DrawCommand] {
    match roll.view() {
        View::DrawList(commands) => commands,
        View::Cells(_) => panic!("expected a draw list"),
    }
}

/// Single C4 half note on the default 900x400 roll
#[test]
fn test_single_note_scenario() {
    let roll = c4_roll();
    let c4 = parse_note_name("C4").unwrap().key;

    let range = roll.pitch_range();
    assert_eq!(range.min, c4 - 1);
    assert_eq!(range.max, c4);

    let m = roll.metrics();
    assert_eq!(m.bar_width, 193.75);
    let note = roll.scene().layer(LayerId::Notes).shapes()[0];
    assert_eq!(note.width, 96.875);
}

#[test]
fn test_bar_width_fills_usable_width() {
    for (width, strip, zoom) in [(900.0, 125.0, 4), (1280.0, 0.0, 3), (640.0, 80.5, 7)] {
        let config = RollConfig {
            width,
            key_strip_width: strip,
            zoom,
            notes: vec![NoteEvent::new("0", "A4", "4n")],
            ..RollConfig::default()
        };
        let roll = PianoRoll::new(config).unwrap();
        let m = roll.metrics();
        assert!(approx_eq(m.bar_width * zoom as f64 + strip, width));
    }
}

#[test]
fn test_higher_pitches_drawn_higher() {
    let roll = melody_roll();
    let notes = roll.scene().layer(LayerId::Notes);
    let ys: Vec<f64> = notes.shapes().iter().map(|s| s.y).collect();
    assert!(ys.windows(2).all(|w| w[1] < w[0]));
}

#[test]
fn test_transport_zero_points() {
    let roll = melody_roll();
    let m = roll.metrics();
    assert_eq!(
        transport_time_to_x(Some("0:0:0"), CoordinateSpace::NoteLayer, m).unwrap(),
        0.0
    );
    assert_eq!(transport_time_to_x(None, CoordinateSpace::NoteLayer, m).unwrap(), 0.0);
    assert_eq!(transport_time_to_x(None, CoordinateSpace::KeyStrip, m).unwrap(), 0.0);
}

/// Halving the tempo halves scroll velocity and rebuilds nothing
#[test]
fn test_tempo_change_scenario() {
    let mut roll = melody_roll();
    let before_velocity = roll.metrics().scroll_px_per_ms;
    let scene = roll.scene().clone();
    let frames = roll.frames_rendered();

    roll.set_bpm(70.0).unwrap();

    assert!(approx_eq(roll.metrics().scroll_px_per_ms, before_velocity / 2.0));
    assert_eq!(roll.scene(), &scene);
    assert_eq!(roll.frames_rendered(), frames);
}

/// Zoom rebuilds notes and grids but keeps the scroll offset
#[test]
fn test_zoom_change_scenario() {
    let mut roll = melody_roll();
    roll.play(None).unwrap();
    roll.frame(0.0).unwrap();
    roll.frame(750.0).unwrap();

    let x_before = roll.note_layer_x();
    let bar_before = roll.metrics().bar_width;
    let first_width = roll.scene().layer(LayerId::Notes).shapes()[0].width;

    roll.set_zoom(2).unwrap();

    assert_eq!(roll.note_layer_x(), x_before);
    assert!(approx_eq(roll.metrics().bar_width, bar_before * 2.0));
    let notes = roll.scene().layer(LayerId::Notes);
    assert!(approx_eq(notes.shapes()[0].width, first_width * 2.0));
    assert_eq!(roll.vertical_line_count(), 2 * 2 + 1);
    assert!(roll.playing());
}

/// Toggle while stopped starts from the unchanged position
#[test]
fn test_toggle_while_stopped_scenario() {
    let mut roll = melody_roll();
    roll.seek("1:2:0").unwrap();
    let x = roll.note_layer_x();

    roll.toggle(None).unwrap();
    assert!(roll.playing());
    assert_eq!(roll.note_layer_x(), x);

    assert_eq!(roll.frame(100.0).unwrap(), FrameRequest::Continue);
    assert_eq!(roll.note_layer_x(), x);

    roll.toggle(None).unwrap();
    assert!(!roll.playing());
}

#[test]
fn test_seek_round_trip() {
    let mut roll = melody_roll();
    for time in ["0:0:0", "1", "1:2", "2:3:1", "0:0:2.5", "12:1:3"] {
        roll.seek(time).unwrap();
        let expected =
            transport_time_to_x(Some(time), CoordinateSpace::KeyStrip, roll.metrics()).unwrap();
        assert_eq!(roll.note_layer_x(), expected, "{}", time);

        let m = roll.metrics();
        let first = roll.scene().layer(LayerId::VerticalGrid).shapes()[0].x
            + m.half_grid_line_width;
        assert!(first >= m.key_strip_width - 1e-9, "{}", time);
        assert!(first - m.grid_line_spacing < m.key_strip_width, "{}", time);
    }
    assert!(!roll.playing());
}

#[test]
fn test_seek_while_playing_keeps_playing() {
    let mut roll = melody_roll();
    roll.play(None).unwrap();
    roll.frame(0.0).unwrap();
    roll.seek("1:0:0").unwrap();
    assert!(roll.playing());
    assert_eq!(roll.frame(16.0).unwrap(), FrameRequest::Continue);
}

#[test]
fn test_line_count_constant_over_long_playback() {
    let mut roll = melody_roll();
    let expected = roll.vertical_line_count();
    roll.play(None).unwrap();

    let mut t = 0.0;
    for i in 0..2_000 {
        // Mostly steady frames with the occasional long stall
        t += if i % 500 == 499 { 30_000.0 } else { 16.7 };
        roll.frame(t).unwrap();
        assert_eq!(roll.vertical_line_count(), expected);
    }

    let m = *roll.metrics();
    let grid = roll.scene().layer(LayerId::VerticalGrid);
    let first = grid.first().unwrap();
    assert!(first.x + m.grid_line_width >= m.key_strip_width - 1e-6);
}

#[test]
fn test_draw_list_paint_order() {
    let roll = melody_roll();
    let commands = draw_list(&roll);
    assert_eq!(commands.len(), roll.scene().shape_count());

    let order: Vec<LayerId> = commands.iter().map(|c| c.layer).collect();
    let mut sorted = order.clone();
    sorted.sort_by_key(|id| LayerId::PAINT_ORDER.iter().position(|p| p == id));
    assert_eq!(order, sorted);
    assert_eq!(order.first(), Some(&LayerId::Background));
    assert_eq!(order.last(), Some(&LayerId::Keys));
}

#[test]
fn test_set_notes_rejects_bad_data_atomically() {
    let mut roll = melody_roll();
    let before = roll.scene().clone();

    let bad = vec![NoteEvent::new("0", "C4", "4n"), NoteEvent::new("0", "Q4", "4n")];
    assert!(matches!(
        roll.set_notes(bad),
        Err(RollError::UnresolvablePitch { .. })
    ));
    assert_eq!(roll.scene(), &before);

    let bad = vec![NoteEvent::new("1:x", "C4", "4n")];
    assert!(matches!(roll.set_notes(bad), Err(RollError::MalformedTime { .. })));
    assert_eq!(roll.scene(), &before);
}

#[test]
fn test_roll_file_to_headless_frames() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("roll.yaml");
    fs::write(
        &path,
        r##"
roll:
  bpm: 120
  zoom: 2
  resolution: 4
  note_color:
    - { note: C, color: 0xdb000f }
    - { note: G, color: "#00aaff" }
  notes:
    - ["0:0:0", "C4", "2n"]
    - ["0:2:0", "G4", "4n"]
    - ["1:0:0", "C5", "1n"]
"##,
    )
    .unwrap();

    let file = validate_config(&path).unwrap();
    let mut roll = PianoRoll::new(file.roll).unwrap();
    assert_eq!(roll.vertical_line_count(), 9);

    roll.play(None).unwrap();
    for i in 0..=60 {
        roll.frame(i as f64 * 16.0).unwrap();
    }
    // 960 ms at 120 BPM is 1.92 beats
    let position = roll.position();
    assert!(approx_eq(position.beat + position.sixteenth / 4.0, 1.92));

    let colors: Vec<u32> = roll
        .scene()
        .layer(LayerId::Notes)
        .shapes()
        .iter()
        .map(|s| s.fill.0)
        .collect();
    assert_eq!(colors, vec![0xdb000f, 0x00aaff, 0xdb000f]);
}

#[test]
fn test_roll_file_round_trip_through_yaml() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("saved.yaml");
    let file = RollFile {
        roll: RollConfig {
            bpm: 96.0,
            notes: vec![NoteEvent::new("0:1:0", "Eb4", "8n")],
            ..RollConfig::default()
        },
    };
    file.save(&path).unwrap();

    let loaded = validate_config(&path).unwrap();
    assert_eq!(loaded, file);
}
