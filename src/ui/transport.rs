// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Status line widgets.

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Paragraph, Widget},
};

use crate::layout::TransportTime;

/// Snapshot of the roll shown in the status line
#[derive(Debug, Clone, PartialEq)]
pub struct RollStatus {
    pub playing: bool,
    pub position: TransportTime,
    pub bpm: f64,
    pub zoom: u32,
    pub resolution: u32,
    /// Transient message (errors, reloads)
    pub message: Option<String>,
}

impl Default for RollStatus {
    fn default() -> Self {
        Self {
            playing: false,
            position: TransportTime::default(),
            bpm: 140.0,
            zoom: 4,
            resolution: 2,
            message: None,
        }
    }
}

/// One-line transport and view summary. `help` fills the tail of the
/// line whenever no message is up.
pub struct StatusWidget<'a> {
    status: &'a RollStatus,
    help: &'a str,
}

impl<'a> StatusWidget<'a> {
    pub fn new(status: &'a RollStatus, help: &'a str) -> Self {
        Self { status, help }
    }
}

impl Widget for StatusWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(8),  // Play/Stop indicator
                Constraint::Length(12), // Position
                Constraint::Length(11), // Tempo
                Constraint::Length(16), // Zoom and resolution
                Constraint::Min(0),     // Message or help
            ])
            .split(area);

        let (indicator, style) = if self.status.playing {
            ("▶ PLAY", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
        } else {
            ("■ STOP", Style::default().fg(Color::Yellow))
        };
        Paragraph::new(indicator).style(style).render(chunks[0], buf);

        PositionWidget::from_time(&self.status.position).render(chunks[1], buf);

        Paragraph::new(format!("{:.1} BPM", self.status.bpm))
            .style(Style::default().fg(Color::Magenta))
            .render(chunks[2], buf);

        Paragraph::new(format!(
            "{} bars /{}",
            self.status.zoom, self.status.resolution
        ))
        .style(Style::default().fg(Color::White))
        .render(chunks[3], buf);

        let (text, style) = match &self.status.message {
            Some(msg) => (msg.as_str(), Style::default().fg(Color::Yellow)),
            None => (self.help, Style::default().fg(Color::DarkGray)),
        };
        Paragraph::new(text).style(style).render(chunks[4], buf);
    }
}

/// Position display widget (1-based bar and beat, 0-based sixteenth)
pub struct PositionWidget {
    bar: i64,
    beat: i64,
    sixteenth: i64,
}

impl PositionWidget {
    /// Create a new position widget
    pub fn new(bar: i64, beat: i64, sixteenth: i64) -> Self {
        Self {
            bar,
            beat,
            sixteenth,
        }
    }

    /// Create from a transport position
    pub fn from_time(time: &TransportTime) -> Self {
        let normalized = TransportTime::from_sixteenths(time.as_sixteenths());
        Self::new(
            normalized.bar as i64 + 1,
            normalized.beat as i64 + 1,
            normalized.sixteenth.floor() as i64,
        )
    }
}

impl Widget for PositionWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let position = format!("{:03}:{:02}:{:02}", self.bar, self.beat, self.sixteenth);
        Paragraph::new(position)
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .render(area, buf);
    }
}
