pub mod duration;
pub mod error;
pub mod playback;
pub mod practice;
pub mod score;
pub mod semantic;
pub mod ties;
pub mod timeline;

pub use error::*;
pub use playback::{timing_events, TimingEvent};
pub use practice::{generate_steps, generate_steps_with_ties, PracticeStep, StepType};
pub use score::*;
pub use semantic::validate;
pub use ties::{detect_tie_groups, TieGroup};
pub use timeline::{reconstruct, MeasureEvent, NoteEvent, PartEvents, ScoreDocument};

/// Reconstruct a score from the decoded event stream.
/// This is the main entry point for the library.
pub fn reconstruct_score(document: &ScoreDocument) -> ParsedScore {
    timeline::reconstruct(document)
}

/// Build the tie-aware practice curriculum for a reconstructed score.
pub fn practice_plan(score: &ParsedScore) -> Vec<PracticeStep> {
    let tie_groups = detect_tie_groups(&score.measures);
    generate_steps_with_ties(score.measures.len(), &tie_groups)
}
