//! # Structural Validation
//!
//! Checks the duration-sum invariant over a reconstructed score: for every
//! measure, the flattened durations of each hand must sum to the nominal
//! beats-per-measure.
//!
//! The reconstruction pipeline never corrects or raises this itself;
//! malformed input flows through and produces an inconsistent total. This
//! validator is how callers detect that case when they care.
//!
//! ## Entry Point
//! `validate(score: &ParsedScore) -> Result<(), EtudeError>`

use crate::error::EtudeError;
use crate::score::{MeasureData, NoteData, ParsedScore};

/// Floating point tolerance for duration sums
const TOLERANCE: f64 = 0.001;

/// Validate the duration-sum invariant for every measure.
///
/// Returns the first violation found, naming the measure and hand.
pub fn validate(score: &ParsedScore) -> Result<(), EtudeError> {
    let expected = score.time_signature.beats_per_measure();
    for measure in &score.measures {
        validate_measure(measure, expected)?;
    }
    Ok(())
}

fn validate_measure(measure: &MeasureData, expected: f64) -> Result<(), EtudeError> {
    check_hand(&measure.right_hand, "right hand", measure.number, expected)?;
    check_hand(&measure.left_hand, "left hand", measure.number, expected)?;
    Ok(())
}

fn check_hand(
    hand: &[NoteData],
    label: &str,
    measure: usize,
    expected: f64,
) -> Result<(), EtudeError> {
    let total: f64 = hand.iter().map(|note| note.duration).sum();
    if (total - expected).abs() > TOLERANCE {
        return Err(EtudeError::SemanticError {
            measure,
            message: format!(
                "{} sums to {} beats, expected {}",
                label, total, expected
            ),
        });
    }
    Ok(())
}
