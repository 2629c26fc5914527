//! # Score Data Model
//!
//! This module defines the value types shared by every stage of the engine.
//!
//! ## Type Hierarchy
//! ```text
//! ParsedScore
//!   ├── title: Option<String>
//!   ├── TimeSignature (beats, beat_type)
//!   ├── KeySignature (name, fifths, scale)
//!   └── Vec<MeasureData>
//!         ├── number (1-indexed)
//!         ├── right_hand: Vec<NoteData>   (staff 1)
//!         └── left_hand: Vec<NoteData>    (staff >= 2)
//!
//! NoteData
//!   ├── pitch: Option<Pitch>      (None = rest)
//!   ├── duration: f64             (beats, resolved slot duration)
//!   ├── chord_notes: Vec<Pitch>   (simultaneous pitches, no own duration)
//!   └── tie_start / tie_end: bool (note continues into / from the adjacent measure)
//! ```
//!
//! ## Key Concepts
//!
//! ### One primary + auxiliary chord notes
//! Simultaneous voices collapse into a single sounding event: one primary
//! `NoteData` carrying the slot's resolved duration, plus pitch-only
//! `chord_notes`. There is no nested note tree.
//!
//! ### Rests
//! A rest is a `NoteData` with `pitch: None`. Rests never carry chord notes
//! or tie flags.
//!
//! ## Related Modules
//! - `timeline` - builds `MeasureData` from the decoded event stream
//! - `ties` - scans measures for cross-measure tie groups
//! - `practice` - segments the measure count into practice steps

use serde::{Deserialize, Serialize};

/// Time signature (e.g., 4/4, 3/4, 6/8)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase", deserialize = "kebab-case"))]
pub struct TimeSignature {
    pub beats: u8,
    pub beat_type: u8,
}

impl Default for TimeSignature {
    fn default() -> Self {
        Self {
            beats: 4,
            beat_type: 4,
        }
    }
}

impl TimeSignature {
    /// Nominal measure length in beats
    pub fn beats_per_measure(&self) -> f64 {
        self.beats as f64
    }
}

/// Scale mode for key signature
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Major,
    Minor,
}

/// Key signature derived from a fifths count (-7 flats to +7 sharps)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeySignature {
    pub name: String,
    pub fifths: i8,
    pub scale: Mode,
}

impl Default for KeySignature {
    fn default() -> Self {
        Self::from_fifths(0, Mode::Major)
    }
}

impl KeySignature {
    /// Build a key signature from a MusicXML-style fifths count.
    ///
    /// Fifths outside -7..=7 fall back to C major / A minor; partially
    /// malformed scores must still render something playable.
    pub fn from_fifths(fifths: i8, scale: Mode) -> Self {
        let fifths = if (-7..=7).contains(&fifths) { fifths } else { 0 };

        // Circle of fifths, index 7 = no accidentals
        let major = [
            "Cb", "Gb", "Db", "Ab", "Eb", "Bb", "F", "C", "G", "D", "A", "E", "B", "F#", "C#",
        ];
        let minor = [
            "Abm", "Ebm", "Bbm", "Fm", "Cm", "Gm", "Dm", "Am", "Em", "Bm", "F#m", "C#m", "G#m",
            "D#m", "A#m",
        ];

        let idx = (fifths + 7) as usize;
        let name = match scale {
            Mode::Major => major[idx],
            Mode::Minor => minor[idx],
        };

        Self {
            name: name.to_string(),
            fifths,
            scale,
        }
    }
}

/// Note names A through G
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum NoteName {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
}

impl NoteName {
    /// Semitone offset within the octave (C = 0)
    pub fn semitone(&self) -> i16 {
        match self {
            NoteName::C => 0,
            NoteName::D => 2,
            NoteName::E => 4,
            NoteName::F => 5,
            NoteName::G => 7,
            NoteName::A => 9,
            NoteName::B => 11,
        }
    }
}

/// A concrete pitch: letter, chromatic alteration, octave
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase", deserialize = "kebab-case"))]
pub struct Pitch {
    pub step: NoteName,
    #[serde(default)]
    pub alter: i8,
    pub octave: i8,
}

impl Pitch {
    pub fn new(step: NoteName, alter: i8, octave: i8) -> Self {
        Self {
            step,
            alter,
            octave,
        }
    }

    /// Returns MIDI note number (C4 = 60, middle C).
    ///
    /// Takes into account: note letter, chromatic alteration, octave.
    /// Clamped to the valid MIDI range (0-127).
    pub fn to_midi_note(&self) -> u8 {
        let total = (self.octave as i16 + 1) * 12 + self.step.semitone() + self.alter as i16;
        total.clamp(0, 127) as u8
    }
}

/// One sounding event (or rest) in a flattened hand sequence.
///
/// Produced by the time-slot flattener; `duration` is always the minimum
/// duration among the notes that started at the same time position.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteData {
    /// `None` for rests
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pitch: Option<Pitch>,
    /// Resolved duration in beats
    pub duration: f64,
    /// Auxiliary pitches sounding simultaneously with this note
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub chord_notes: Vec<Pitch>,
    /// This note continues into the next measure
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub tie_start: bool,
    /// This note continues from the previous measure
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub tie_end: bool,
}

impl NoteData {
    /// A sounding note with no chord notes or ties
    pub fn note(pitch: Pitch, duration: f64) -> Self {
        Self {
            pitch: Some(pitch),
            duration,
            chord_notes: Vec::new(),
            tie_start: false,
            tie_end: false,
        }
    }

    /// A rest; rests carry no pitch meaning and never have chord notes or ties
    pub fn rest(duration: f64) -> Self {
        Self {
            pitch: None,
            duration,
            chord_notes: Vec::new(),
            tie_start: false,
            tie_end: false,
        }
    }

    pub fn is_rest(&self) -> bool {
        self.pitch.is_none()
    }
}

/// A single reconstructed measure with one flattened sequence per hand
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasureData {
    /// 1-indexed measure number
    pub number: usize,
    pub right_hand: Vec<NoteData>,
    pub left_hand: Vec<NoteData>,
}

/// A selected sub-range of the score, one note sequence per hand.
///
/// This is the only supported shape for handing a measure range to the
/// rendering and playback collaborators.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Passage {
    pub right_hand: Vec<NoteData>,
    pub left_hand: Vec<NoteData>,
}

/// A fully reconstructed score, ready for rendering, playback, and practice
/// segmentation
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedScore {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub time_signature: TimeSignature,
    pub key_signature: KeySignature,
    pub measures: Vec<MeasureData>,
}

impl ParsedScore {
    /// Select an inclusive range of measures by number.
    ///
    /// Out-of-bounds or inverted ranges yield an empty passage, never an
    /// error.
    pub fn measure_range(&self, start: usize, end: usize) -> Passage {
        let mut passage = Passage::default();
        for measure in &self.measures {
            if measure.number >= start && measure.number <= end {
                passage.right_hand.extend(measure.right_hand.iter().cloned());
                passage.left_hand.extend(measure.left_hand.iter().cloned());
            }
        }
        passage
    }

    /// Select an explicit set of measure numbers, concatenated in ascending
    /// measure order regardless of the order given.
    pub fn measures_by_numbers(&self, numbers: &[usize]) -> Passage {
        let mut passage = Passage::default();
        for measure in &self.measures {
            if numbers.contains(&measure.number) {
                passage.right_hand.extend(measure.right_hand.iter().cloned());
                passage.left_hand.extend(measure.left_hand.iter().cloned());
            }
        }
        passage
    }
}
