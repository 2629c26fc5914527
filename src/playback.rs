//! # Playback Timing Events
//!
//! Derives the flat timing-event sequence the audio playback collaborator
//! schedules from. Both hands are re-merged with the same
//! minimum-duration-at-same-time-slot rule the flattener uses within one
//! hand, applied a second time across hands: whichever hand moves first
//! determines when the next event fires, and pitches sounding together
//! collapse into one event.
//!
//! Rest-only slots advance time but produce no event, so the output is
//! strictly increasing in time.

use serde::Serialize;

use crate::score::{NoteData, ParsedScore};
use crate::timeline::{flatten, TimedNote};

/// One scheduled playback event: every pitch sounding at one time position
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingEvent {
    /// Beats from the start of the piece
    pub start_time: f64,
    /// Beats until the next audible event in either hand
    pub duration: f64,
    /// MIDI note numbers for every pitch in the slot, both hands
    pub midi_notes: Vec<u8>,
    /// 1-indexed measure this event falls in
    pub measure_number: usize,
    /// Beat position within the measure
    pub beat_in_measure: f64,
}

/// Merge both hands of every measure into one time-ordered event sequence.
pub fn timing_events(score: &ParsedScore) -> Vec<TimingEvent> {
    let beats_per_measure = score.time_signature.beats_per_measure();
    let mut events = Vec::new();

    for measure in &score.measures {
        let measure_start = (measure.number - 1) as f64 * beats_per_measure;

        let mut timed = timed_from_flat(&measure.right_hand);
        timed.extend(timed_from_flat(&measure.left_hand));
        let merged = flatten(timed);

        let mut elapsed = 0.0;
        for note in merged {
            if !note.is_rest() {
                let mut midi_notes = Vec::with_capacity(1 + note.chord_notes.len());
                if let Some(pitch) = note.pitch {
                    midi_notes.push(pitch.to_midi_note());
                }
                for pitch in &note.chord_notes {
                    midi_notes.push(pitch.to_midi_note());
                }
                events.push(TimingEvent {
                    start_time: measure_start + elapsed,
                    duration: note.duration,
                    midi_notes,
                    measure_number: measure.number,
                    beat_in_measure: elapsed,
                });
            }
            elapsed += note.duration;
        }
    }

    events
}

/// Rebuild in-measure start times for an already-flattened hand by prefix
/// summing its durations
fn timed_from_flat(hand: &[NoteData]) -> Vec<TimedNote> {
    let mut elapsed = 0.0;
    hand.iter()
        .map(|note| {
            let start_time = elapsed;
            elapsed += note.duration;
            TimedNote {
                start_time,
                note: note.clone(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::{
        KeySignature, MeasureData, NoteData, NoteName, Pitch, TimeSignature,
    };

    fn note(step: NoteName, octave: i8, duration: f64) -> NoteData {
        NoteData::note(Pitch::new(step, 0, octave), duration)
    }

    fn score(measures: Vec<MeasureData>) -> ParsedScore {
        ParsedScore {
            title: None,
            time_signature: TimeSignature::default(),
            key_signature: KeySignature::default(),
            measures,
        }
    }

    #[test]
    fn test_hands_merge_into_shared_slots() {
        // Right: whole C4; left: four quarters C3 D3 E3 F3
        let measures = vec![MeasureData {
            number: 1,
            right_hand: vec![note(NoteName::C, 4, 4.0)],
            left_hand: vec![
                note(NoteName::C, 3, 1.0),
                note(NoteName::D, 3, 1.0),
                note(NoteName::E, 3, 1.0),
                note(NoteName::F, 3, 1.0),
            ],
        }];
        let events = timing_events(&score(measures));

        assert_eq!(events.len(), 4);
        // First slot carries both hands, minimum duration wins
        assert_eq!(events[0].start_time, 0.0);
        assert_eq!(events[0].duration, 1.0);
        assert_eq!(events[0].midi_notes, vec![60, 48]);
        // Remaining slots are left hand alone
        assert_eq!(events[1].midi_notes, vec![50]);
        assert_eq!(events[3].start_time, 3.0);
    }

    #[test]
    fn test_rest_slots_advance_time_without_events() {
        let measures = vec![MeasureData {
            number: 1,
            right_hand: vec![
                note(NoteName::C, 4, 1.0),
                NoteData::rest(2.0),
                note(NoteName::D, 4, 1.0),
            ],
            left_hand: vec![NoteData::rest(4.0)],
        }];
        let events = timing_events(&score(measures));

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].start_time, 0.0);
        assert_eq!(events[1].start_time, 3.0);
        assert_eq!(events[1].beat_in_measure, 3.0);
    }

    #[test]
    fn test_events_strictly_increasing_across_measures() {
        let measure = |number| MeasureData {
            number,
            right_hand: vec![
                note(NoteName::C, 4, 2.0),
                note(NoteName::E, 4, 2.0),
            ],
            left_hand: vec![note(NoteName::C, 3, 4.0)],
        };
        let events = timing_events(&score(vec![measure(1), measure(2)]));

        assert_eq!(events.len(), 4);
        for window in events.windows(2) {
            assert!(window[1].start_time > window[0].start_time);
        }
        // Second measure starts at beat 4
        assert_eq!(events[2].start_time, 4.0);
        assert_eq!(events[2].measure_number, 2);
        assert_eq!(events[2].beat_in_measure, 0.0);
    }

    #[test]
    fn test_chord_notes_flow_into_midi_list() {
        let mut chord = note(NoteName::C, 4, 1.0);
        chord.chord_notes = vec![Pitch::new(NoteName::E, 0, 4), Pitch::new(NoteName::G, 0, 4)];
        let measures = vec![MeasureData {
            number: 1,
            right_hand: vec![chord, NoteData::rest(3.0)],
            left_hand: vec![NoteData::rest(4.0)],
        }];
        let events = timing_events(&score(measures));

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].midi_notes, vec![60, 64, 67]);
    }

    #[test]
    fn test_empty_score_yields_no_events() {
        assert!(timing_events(&ParsedScore::default()).is_empty());
    }
}
