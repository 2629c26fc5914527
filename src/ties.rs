//! # Tie Group Detection
//!
//! Scans the flattened measure sequences for notes tied across a barline and
//! produces the contiguous measure ranges that must never be split by a
//! practice chunk boundary.
//!
//! A measure *ends with a tie* when the last note of either hand carries
//! `tie_start`, and *starts with a tie* when the first note of either hand
//! carries `tie_end`. A forward scan keeps one open-group pointer:
//! - ends-with-tie while closed opens a group at that measure
//! - starts-with-tie while closed opens one retroactively one measure back
//!   (the tie began before this scan observed it)
//! - a measure that does not end with a tie closes the open group; groups
//!   spanning a single measure are dropped since they never force a split
//! - an open group at the end of the piece runs through the last measure
//!
//! The retroactive one-measure-back rule is a heuristic: a tie chain that
//! starts mid-piece without an observed ends-with-tie can be attributed one
//! measure late. Kept as-is; see DESIGN.md.

use serde::Serialize;

use crate::score::MeasureData;

/// An inclusive measure range bound together by cross-measure ties.
///
/// Always spans more than one measure (`start < end`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TieGroup {
    pub start: usize,
    pub end: usize,
}

impl TieGroup {
    /// Whether an inclusive measure range overlaps this group
    pub fn overlaps(&self, start: usize, end: usize) -> bool {
        !(end < self.start || start > self.end)
    }
}

fn ends_with_tie(measure: &MeasureData) -> bool {
    measure
        .right_hand
        .last()
        .map_or(false, |note| note.tie_start)
        || measure.left_hand.last().map_or(false, |note| note.tie_start)
}

fn starts_with_tie(measure: &MeasureData) -> bool {
    measure
        .right_hand
        .first()
        .map_or(false, |note| note.tie_end)
        || measure.left_hand.first().map_or(false, |note| note.tie_end)
}

/// Detect all tie groups in a piece, ordered by start measure.
///
/// Output groups never overlap: a group must close before the next can open.
pub fn detect_tie_groups(measures: &[MeasureData]) -> Vec<TieGroup> {
    let mut groups = Vec::new();
    let mut open_start: Option<usize> = None;

    for measure in measures {
        let number = measure.number;

        if open_start.is_none() && starts_with_tie(measure) {
            // The tie began before this scan observed it; assume one
            // measure earlier
            open_start = Some(number.saturating_sub(1).max(1));
        }

        if ends_with_tie(measure) {
            if open_start.is_none() {
                open_start = Some(number);
            }
            // Already open: the tie chain continues
        } else if let Some(start) = open_start.take() {
            if number > start {
                groups.push(TieGroup { start, end: number });
            }
        }
    }

    if let Some(start) = open_start {
        if let Some(last) = measures.last() {
            if last.number > start {
                groups.push(TieGroup {
                    start,
                    end: last.number,
                });
            }
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::{NoteData, NoteName, Pitch};

    fn plain_note() -> NoteData {
        NoteData::note(Pitch::new(NoteName::C, 0, 4), 4.0)
    }

    fn measure(number: usize, tie_start: bool, tie_end: bool) -> MeasureData {
        let mut note = plain_note();
        note.tie_start = tie_start;
        note.tie_end = tie_end;
        MeasureData {
            number,
            right_hand: vec![note],
            left_hand: vec![NoteData::rest(4.0)],
        }
    }

    #[test]
    fn test_no_ties_no_groups() {
        let measures: Vec<_> = (1..=4).map(|n| measure(n, false, false)).collect();
        assert!(detect_tie_groups(&measures).is_empty());
    }

    #[test]
    fn test_simple_two_measure_tie() {
        let measures = vec![
            measure(1, false, false),
            measure(2, true, false),
            measure(3, false, true),
            measure(4, false, false),
        ];
        assert_eq!(
            detect_tie_groups(&measures),
            vec![TieGroup { start: 2, end: 3 }]
        );
    }

    #[test]
    fn test_chained_ties_form_one_group() {
        // Measures 1-3 all tie into the next; group runs through measure 4
        let measures = vec![
            measure(1, true, false),
            measure(2, true, true),
            measure(3, true, true),
            measure(4, false, true),
        ];
        assert_eq!(
            detect_tie_groups(&measures),
            vec![TieGroup { start: 1, end: 4 }]
        );
    }

    #[test]
    fn test_retroactive_open_one_measure_back() {
        // Scan sees a tie-end with no open group; the start is assumed one
        // measure earlier
        let measures = vec![
            measure(1, false, false),
            measure(2, false, false),
            measure(3, false, true),
        ];
        assert_eq!(
            detect_tie_groups(&measures),
            vec![TieGroup { start: 2, end: 3 }]
        );
    }

    #[test]
    fn test_retroactive_open_clamped_to_first_measure() {
        let measures = vec![measure(1, false, true), measure(2, false, false)];
        // Opens at max(1, 0) = 1; measure 1 doesn't end with a tie, so the
        // group closes immediately but spans only measure 1 and is dropped
        assert!(detect_tie_groups(&measures).is_empty());
    }

    #[test]
    fn test_unclosed_group_runs_to_last_measure() {
        let measures = vec![
            measure(1, false, false),
            measure(2, true, false),
            measure(3, true, true),
        ];
        assert_eq!(
            detect_tie_groups(&measures),
            vec![TieGroup { start: 2, end: 3 }]
        );
    }

    #[test]
    fn test_left_hand_ties_count_too() {
        let mut first = measure(1, false, false);
        let mut tied = plain_note();
        tied.tie_start = true;
        first.left_hand = vec![tied];
        let mut second = measure(2, false, false);
        let mut ending = plain_note();
        ending.tie_end = true;
        second.left_hand = vec![ending];

        assert_eq!(
            detect_tie_groups(&[first, second]),
            vec![TieGroup { start: 1, end: 2 }]
        );
    }

    #[test]
    fn test_two_separate_groups() {
        let measures = vec![
            measure(1, true, false),
            measure(2, false, true),
            measure(3, false, false),
            measure(4, true, false),
            measure(5, false, true),
        ];
        assert_eq!(
            detect_tie_groups(&measures),
            vec![
                TieGroup { start: 1, end: 2 },
                TieGroup { start: 4, end: 5 },
            ]
        );
    }

    #[test]
    fn test_overlap_predicate() {
        let group = TieGroup { start: 3, end: 5 };
        assert!(group.overlaps(1, 3));
        assert!(group.overlaps(4, 4));
        assert!(group.overlaps(5, 8));
        assert!(!group.overlaps(1, 2));
        assert!(!group.overlaps(6, 9));
    }
}
