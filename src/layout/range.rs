// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Visible pitch span derived from note data.

use crate::config::NoteEvent;
use crate::error::{Result, RollError};
use crate::music::{KeyNumber, NoteFormat, PitchResolver};

/// Widest pitch span the roll lays out (a little over eleven 88-key pianos)
pub const MAX_PITCH_SPAN: i64 = 1024;

/// Key-number span of the vertical axis.
///
/// `min` sits one key below the lowest note so a single-pitch roll still
/// has one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PitchRange {
    pub min: KeyNumber,
    pub max: KeyNumber,
}

impl PitchRange {
    /// Number of rows on the vertical axis (always >= 1)
    pub fn span(&self) -> i32 {
        self.max - self.min
    }

    /// Whether a key falls on a visible row
    pub fn contains(&self, key: KeyNumber) -> bool {
        key > self.min && key <= self.max
    }
}

/// Resolve every note and derive the pitch range.
///
/// Fails on empty note data or on the first unresolvable pitch.
pub fn resolve_pitch_range(
    notes: &[NoteEvent],
    format: NoteFormat,
    resolver: &dyn PitchResolver,
) -> Result<PitchRange> {
    let mut bounds: Option<(KeyNumber, KeyNumber)> = None;

    for note in notes {
        let key = resolver.resolve(&note.pitch, format)?.key;
        bounds = Some(match bounds {
            None => (key, key),
            Some((lo, hi)) => (lo.min(key), hi.max(key)),
        });
    }

    let (lo, hi) = bounds.ok_or(RollError::EmptyNoteData)?;
    let span = hi as i64 - lo as i64 + 1;
    let min = lo.checked_sub(1).filter(|_| span <= MAX_PITCH_SPAN).ok_or_else(|| {
        RollError::InvalidConfig(format!(
            "pitch span of {} keys ({} to {}) exceeds {}",
            span, lo, hi, MAX_PITCH_SPAN
        ))
    })?;
    Ok(PitchRange { min, max: hi })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::music::StandardPitchResolver;

    #[test]
    fn test_range_spans_notes() {
        let notes = vec![
            NoteEvent::new("0", "C4", "2n"),
            NoteEvent::new("0", "E4", "2n"),
            NoteEvent::new("0:2", "B4", "4n"),
        ];
        let range = resolve_pitch_range(&notes, NoteFormat::String, &StandardPitchResolver).unwrap();
        assert_eq!(range, PitchRange { min: 39, max: 51 });
        assert_eq!(range.span(), 12);
        assert!(range.contains(40));
        assert!(!range.contains(39));
    }

    #[test]
    fn test_single_pitch_has_one_row() {
        let notes = vec![NoteEvent::new("0", "C4", "2n"), NoteEvent::new("1", "C4", "2n")];
        let range = resolve_pitch_range(&notes, NoteFormat::String, &StandardPitchResolver).unwrap();
        assert_eq!(range, PitchRange { min: 39, max: 40 });
        assert_eq!(range.span(), 1);
    }

    #[test]
    fn test_empty_notes_fail() {
        let result = resolve_pitch_range(&[], NoteFormat::String, &StandardPitchResolver);
        assert_eq!(result, Err(RollError::EmptyNoteData));
    }

    #[test]
    fn test_unresolvable_pitch_fails() {
        let notes = vec![NoteEvent::new("0", "C4", "2n"), NoteEvent::new("0", "Q4", "2n")];
        let result = resolve_pitch_range(&notes, NoteFormat::String, &StandardPitchResolver);
        assert!(matches!(result, Err(RollError::UnresolvablePitch { .. })));
    }

    #[test]
    fn test_span_limit() {
        let notes = vec![
            NoteEvent::new("0", 1_000_000_000, "4n"),
            NoteEvent::new("0", -1_000_000_000, "4n"),
        ];
        let result = resolve_pitch_range(&notes, NoteFormat::Key, &StandardPitchResolver);
        assert!(matches!(result, Err(RollError::InvalidConfig(_))));

        let widest = vec![NoteEvent::new("0", 1, "4n"), NoteEvent::new("0", 1024, "4n")];
        let range = resolve_pitch_range(&widest, NoteFormat::Key, &StandardPitchResolver).unwrap();
        assert_eq!(range.span() as i64, MAX_PITCH_SPAN);

        let too_wide = vec![NoteEvent::new("0", 1, "4n"), NoteEvent::new("0", 1025, "4n")];
        assert!(resolve_pitch_range(&too_wide, NoteFormat::Key, &StandardPitchResolver).is_err());
    }

    #[test]
    fn test_midi_format() {
        let notes = vec![NoteEvent::new("0", 60, "4n"), NoteEvent::new("0", 72, "4n")];
        let range = resolve_pitch_range(&notes, NoteFormat::Midi, &StandardPitchResolver).unwrap();
        assert_eq!(range, PitchRange { min: 39, max: 52 });
    }
}
