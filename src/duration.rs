//! # Duration Model
//!
//! Converts a notated duration into a beat-count real number.
//!
//! A duration arrives in one of two encodings:
//! - an explicit tick value plus the active divisions-per-quarter-note
//! - a named duration class ("quarter", "eighth", ...) plus a dot count
//!
//! Beats are expressed relative to the time signature's beat type: in 4/4 a
//! quarter note is 1 beat, in 6/8 an eighth note is 1 beat.
//!
//! Unknown or missing encodings default to one quarter note. This is a
//! silent recovery, never an error: a partially malformed score must still
//! render something playable.

use crate::score::TimeSignature;

/// Named note duration classes
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum NoteType {
    Whole,
    Half,
    #[default]
    Quarter,
    Eighth,
    Sixteenth,
    ThirtySecond,
}

impl NoteType {
    /// Parse a MusicXML-style type name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "whole" => Some(NoteType::Whole),
            "half" => Some(NoteType::Half),
            "quarter" => Some(NoteType::Quarter),
            "eighth" => Some(NoteType::Eighth),
            "16th" | "sixteenth" => Some(NoteType::Sixteenth),
            "32nd" | "thirty-second" => Some(NoteType::ThirtySecond),
            _ => None,
        }
    }

    /// Returns the duration as a fraction of a whole note
    pub fn as_fraction(&self) -> f64 {
        match self {
            NoteType::Whole => 1.0,
            NoteType::Half => 0.5,
            NoteType::Quarter => 0.25,
            NoteType::Eighth => 0.125,
            NoteType::Sixteenth => 0.0625,
            NoteType::ThirtySecond => 0.03125,
        }
    }

    /// Returns duration in beats based on time signature.
    /// In 4/4 time: quarter = 1 beat, eighth = 0.5 beats, etc.
    /// In 6/8 time: eighth = 1 beat, quarter = 2 beats, etc.
    pub fn as_beats(&self, time_sig: &TimeSignature) -> f64 {
        // Fraction of a whole note that gets one beat
        let beat_value = 1.0 / time_sig.beat_type as f64;
        self.as_fraction() / beat_value
    }
}

/// Convert an explicit tick value to beats using the active
/// divisions-per-quarter-note.
///
/// Zero divisions is a malformed-input condition; falls back to one quarter
/// note.
pub fn ticks_to_beats(ticks: u32, divisions: u32, time_sig: &TimeSignature) -> f64 {
    if divisions == 0 {
        return NoteType::Quarter.as_beats(time_sig);
    }
    let quarter_notes = ticks as f64 / divisions as f64;
    quarter_notes * time_sig.beat_type as f64 / 4.0
}

/// Resolve a note event's duration to beats.
///
/// Prefers the explicit tick encoding; falls back to the named class with
/// dots applied (one dot = 1.5x, two dots = 1.75x); defaults to one quarter
/// note when neither encoding is usable.
pub fn resolve_beats(
    ticks: Option<u32>,
    divisions: u32,
    type_name: Option<&str>,
    dots: u8,
    time_sig: &TimeSignature,
) -> f64 {
    if let Some(ticks) = ticks {
        if divisions > 0 {
            return ticks_to_beats(ticks, divisions, time_sig);
        }
    }

    match type_name.and_then(NoteType::from_name) {
        Some(note_type) => {
            let base = note_type.as_beats(time_sig);
            // Each dot adds half of the previous value: 1.5, 1.75, ...
            let dot_factor = 2.0 - 0.5_f64.powi(dots as i32);
            base * dot_factor
        }
        None => NoteType::Quarter.as_beats(time_sig),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn common_time() -> TimeSignature {
        TimeSignature::default()
    }

    #[test]
    fn test_ticks_to_beats_common_time() {
        let ts = common_time();
        // divisions = 2: 2 ticks = quarter note = 1 beat
        assert_eq!(ticks_to_beats(2, 2, &ts), 1.0);
        assert_eq!(ticks_to_beats(1, 2, &ts), 0.5);
        assert_eq!(ticks_to_beats(8, 2, &ts), 4.0);
    }

    #[test]
    fn test_ticks_to_beats_compound_time() {
        let ts = TimeSignature {
            beats: 6,
            beat_type: 8,
        };
        // Eighth note (half a quarter) is one beat in 6/8
        assert_eq!(ticks_to_beats(1, 2, &ts), 1.0);
        assert_eq!(ticks_to_beats(2, 2, &ts), 2.0);
    }

    #[test]
    fn test_ticks_zero_divisions_defaults_to_quarter() {
        let ts = common_time();
        assert_eq!(ticks_to_beats(6, 0, &ts), 1.0);
    }

    #[test]
    fn test_named_types() {
        let ts = common_time();
        assert_eq!(resolve_beats(None, 0, Some("whole"), 0, &ts), 4.0);
        assert_eq!(resolve_beats(None, 0, Some("half"), 0, &ts), 2.0);
        assert_eq!(resolve_beats(None, 0, Some("quarter"), 0, &ts), 1.0);
        assert_eq!(resolve_beats(None, 0, Some("eighth"), 0, &ts), 0.5);
        assert_eq!(resolve_beats(None, 0, Some("16th"), 0, &ts), 0.25);
    }

    #[test]
    fn test_dotted_types() {
        let ts = common_time();
        assert_eq!(resolve_beats(None, 0, Some("quarter"), 1, &ts), 1.5);
        assert_eq!(resolve_beats(None, 0, Some("half"), 1, &ts), 3.0);
        assert_eq!(resolve_beats(None, 0, Some("quarter"), 2, &ts), 1.75);
    }

    #[test]
    fn test_unknown_encoding_defaults_to_one_beat() {
        let ts = common_time();
        assert_eq!(resolve_beats(None, 0, None, 0, &ts), 1.0);
        assert_eq!(resolve_beats(None, 0, Some("breve"), 0, &ts), 1.0);
    }

    #[test]
    fn test_ticks_preferred_over_type_name() {
        let ts = common_time();
        assert_eq!(resolve_beats(Some(4), 2, Some("quarter"), 0, &ts), 2.0);
    }
}
