//! # Timeline Reconstruction
//!
//! This module rebuilds a flat, time-ordered per-hand note sequence from the
//! interleaved, cursor-based event stream produced by the notation decoder.
//!
//! ## Pipeline
//! ```text
//! ScoreDocument (decoded events, per part per measure)
//!   └── cursor fold: attributes / note / backup / forward
//!         └── per-hand Vec<TimedNote> (emission order, not yet time order)
//!               └── time-slot flattener
//!                     └── MeasureData { right_hand, left_hand }
//! ```
//!
//! ## Cursor Semantics
//! Each part keeps one running time cursor in beats, reset to 0 at the start
//! of every measure. `backup` subtracts from it (clamped at 0), `forward`
//! adds, and a non-chord note advances it by its own duration. A chord note
//! shares the start time of the preceding non-chord note on its staff
//! (cursor minus the chord note's own duration) and never advances the
//! cursor. This is how multi-voice notation writes a second voice over the
//! same time span as a first.
//!
//! ## Time-Slot Flattening
//! Notes whose start times differ by less than one millibeat collapse into a
//! single slot. The shortest concurrent voice determines when the next
//! audible event begins, so the slot's resolved duration is the minimum over
//! its members. The first non-rest member becomes the primary note; every
//! other non-rest member contributes its pitch as a chord note.
//!
//! ## Failure Policy
//! There are no fatal conditions here. Unknown duration encodings default to
//! a quarter note, a missing staff defaults to 1, and negative cursor targets
//! clamp to 0. A practice tool must always show the student something rather
//! than block on a malformed score.

use serde::Deserialize;

use crate::duration::{resolve_beats, ticks_to_beats};
use crate::score::{
    KeySignature, MeasureData, Mode, NoteData, ParsedScore, Pitch, TimeSignature,
};

/// Two note start times closer than this are considered simultaneous
/// (one millibeat).
pub(crate) const SLOT_TOLERANCE: f64 = 0.001;

/// A decoded score: one event list per measure per part.
///
/// This is the hand-off shape from the (out-of-scope) notation-document
/// decoder; tag scanning and container handling happen before this point.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ScoreDocument {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub parts: Vec<PartEvents>,
}

/// The event stream of a single part, measure by measure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PartEvents {
    #[serde(default)]
    pub measures: Vec<Vec<MeasureEvent>>,
}

/// One cursor-scoped event inside a measure
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum MeasureEvent {
    /// Updates divisions, time signature, and key signature from this point
    /// forward
    Attributes(AttributesChange),
    /// A sounding note, chord note, or rest
    Note(NoteEvent),
    /// Move the cursor backward by a tick count (writes a second voice over
    /// an already-written span)
    Backup { duration: u32 },
    /// Move the cursor forward over a span with no sounding note
    Forward { duration: u32 },
}

/// Attribute changes: divisions per quarter note, time signature, key
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AttributesChange {
    #[serde(default)]
    pub divisions: Option<u32>,
    #[serde(default)]
    pub time: Option<TimeSignature>,
    #[serde(default)]
    pub key: Option<KeyChange>,
}

/// Key signature change as a fifths count plus optional mode
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct KeyChange {
    pub fifths: i8,
    #[serde(default)]
    pub mode: Option<Mode>,
}

/// A note event as decoded from the notation document
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct NoteEvent {
    /// `true` for rests; rests carry no pitch
    #[serde(default)]
    pub rest: bool,
    #[serde(default)]
    pub pitch: Option<Pitch>,
    /// Explicit duration in ticks (interpreted via the active divisions)
    #[serde(default)]
    pub duration: Option<u32>,
    /// Named duration class ("whole", "half", "quarter", ...)
    #[serde(default, rename = "type")]
    pub note_type: Option<String>,
    #[serde(default)]
    pub dots: u8,
    /// Shares the start time of the preceding non-chord note on this staff
    #[serde(default)]
    pub chord: bool,
    /// 1 = right hand, >= 2 = left hand; missing defaults to 1
    #[serde(default)]
    pub staff: Option<u8>,
    #[serde(default)]
    pub tie_start: bool,
    #[serde(default)]
    pub tie_end: bool,
}

/// A note with its reconstructed position in beats from the start of its
/// containing measure. Transient: never escapes this crate.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TimedNote {
    pub start_time: f64,
    pub note: NoteData,
}

/// Score-level attributes that apply from their point of appearance forward
struct ActiveAttributes {
    time: TimeSignature,
    key: KeySignature,
}

/// Reconstruct a full score from the decoded event stream.
///
/// Walks every part in measure lockstep, folds each measure's events through
/// the time cursor, and flattens the resulting per-hand timed notes into the
/// final `MeasureData` sequences. Never fails; malformed timing recovers
/// silently.
pub fn reconstruct(document: &ScoreDocument) -> ParsedScore {
    let mut attrs = ActiveAttributes {
        time: TimeSignature::default(),
        key: KeySignature::default(),
    };

    // Divisions persist across measures within a part
    let mut part_divisions: Vec<u32> = vec![1; document.parts.len()];

    let measure_count = document
        .parts
        .iter()
        .map(|part| part.measures.len())
        .max()
        .unwrap_or(0);

    let mut measures = Vec::with_capacity(measure_count);
    for index in 0..measure_count {
        let mut right = Vec::new();
        let mut left = Vec::new();

        for (part_index, part) in document.parts.iter().enumerate() {
            if let Some(events) = part.measures.get(index) {
                fold_measure(
                    events,
                    &mut part_divisions[part_index],
                    &mut attrs,
                    &mut right,
                    &mut left,
                );
            }
        }

        measures.push(MeasureData {
            number: index + 1,
            right_hand: flatten(right),
            left_hand: flatten(left),
        });
    }

    ParsedScore {
        title: document.title.clone(),
        time_signature: attrs.time,
        key_signature: attrs.key,
        measures,
    }
}

/// Fold one measure's events for one part, carrying the time cursor.
///
/// The cursor starts at 0 for every measure; output lands in `right`/`left`
/// in emission order.
fn fold_measure(
    events: &[MeasureEvent],
    divisions: &mut u32,
    attrs: &mut ActiveAttributes,
    right: &mut Vec<TimedNote>,
    left: &mut Vec<TimedNote>,
) {
    let mut cursor = 0.0_f64;

    for event in events {
        match event {
            MeasureEvent::Attributes(change) => {
                if let Some(d) = change.divisions {
                    *divisions = d;
                }
                if let Some(time) = change.time {
                    attrs.time = time;
                }
                if let Some(key) = &change.key {
                    attrs.key = KeySignature::from_fifths(key.fifths, key.mode.unwrap_or_default());
                }
            }
            MeasureEvent::Backup { duration } => {
                let beats = ticks_to_beats(*duration, *divisions, &attrs.time);
                // Negative targets are malformed input; clamp silently
                cursor = (cursor - beats).max(0.0);
            }
            MeasureEvent::Forward { duration } => {
                cursor += ticks_to_beats(*duration, *divisions, &attrs.time);
            }
            MeasureEvent::Note(note) => {
                let beats = resolve_beats(
                    note.duration,
                    *divisions,
                    note.note_type.as_deref(),
                    note.dots,
                    &attrs.time,
                );

                let start_time = if note.chord {
                    // Back-date to the preceding non-chord note's start
                    (cursor - beats).max(0.0)
                } else {
                    cursor
                };

                let data = if note.rest || note.pitch.is_none() {
                    // Rests carry no pitch meaning and never keep tie flags
                    NoteData::rest(beats)
                } else {
                    NoteData {
                        pitch: note.pitch,
                        duration: beats,
                        chord_notes: Vec::new(),
                        tie_start: note.tie_start,
                        tie_end: note.tie_end,
                    }
                };

                let timed = TimedNote {
                    start_time,
                    note: data,
                };
                if note.staff.unwrap_or(1) <= 1 {
                    right.push(timed);
                } else {
                    left.push(timed);
                }

                if !note.chord {
                    cursor += beats;
                }
            }
        }
    }
}

/// Collapse a hand's timed notes into one `NoteData` per time slot.
///
/// Sorts by start time, groups starts within [`SLOT_TOLERANCE`], resolves
/// each slot's duration as the minimum over its members, and merges
/// simultaneous non-rests into one primary note plus chord notes. A slot of
/// only rests emits a single rest.
pub(crate) fn flatten(mut notes: Vec<TimedNote>) -> Vec<NoteData> {
    notes.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));

    let mut flattened = Vec::new();
    let mut index = 0;
    while index < notes.len() {
        let slot_start = notes[index].start_time;
        let mut end = index;
        while end < notes.len() && notes[end].start_time - slot_start < SLOT_TOLERANCE {
            end += 1;
        }
        let slot = &notes[index..end];

        // The shortest concurrent voice determines the next audible event
        let slot_duration = slot
            .iter()
            .map(|timed| timed.note.duration)
            .fold(f64::INFINITY, f64::min);

        match slot.iter().position(|timed| !timed.note.is_rest()) {
            Some(primary_index) => {
                let mut primary = slot[primary_index].note.clone();
                primary.duration = slot_duration;
                for (offset, timed) in slot.iter().enumerate() {
                    if offset == primary_index || timed.note.is_rest() {
                        continue;
                    }
                    if let Some(pitch) = timed.note.pitch {
                        primary.chord_notes.push(pitch);
                    }
                    primary.chord_notes.extend(timed.note.chord_notes.iter().copied());
                }
                flattened.push(primary);
            }
            None => flattened.push(NoteData::rest(slot_duration)),
        }

        index = end;
    }

    flattened
}
