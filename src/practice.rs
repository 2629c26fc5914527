//! # Practice Step Generation
//!
//! Produces the ordered curriculum of practice chunks a student works
//! through: every measure alone, each adjacent pair, 4- and 8-measure
//! consolidations, and finally the full piece.
//!
//! The tie-aware variant widens every candidate chunk so that no chunk
//! boundary falls inside a tie group, then deduplicates: two different raw
//! candidates (a single measure and the pair containing it, say) often
//! expand to the same final range and must be emitted once.
//!
//! Steps are only created here; callers toggle `mastered` but never
//! construct or re-derive steps themselves.

use std::collections::HashSet;

use serde::Serialize;

use crate::ties::TieGroup;

/// What kind of chunk a practice step covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StepType {
    /// One measure alone
    Single,
    /// Two adjacent measures
    Pair,
    /// A longer span rehearsing previously learned material together
    Consolidate,
}

/// One chunk in the practice curriculum
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeStep {
    /// Distinct ascending measure numbers covered by this step
    pub measures: Vec<usize>,
    #[serde(rename = "type")]
    pub step_type: StepType,
    pub mastered: bool,
}

impl PracticeStep {
    fn from_range(start: usize, end: usize, step_type: StepType) -> Self {
        Self {
            measures: (start..=end).collect(),
            step_type,
            mastered: false,
        }
    }
}

/// Generate the plain practice curriculum over `measure_count` measures.
///
/// For each measure i: the single step, the pair with the next measure, a
/// 4-measure consolidation at every multiple of 4, and an 8-measure
/// consolidation at every multiple of 8. Pieces longer than 4 measures end
/// with one full-piece consolidation. A zero measure count yields an empty
/// list.
pub fn generate_steps(measure_count: usize) -> Vec<PracticeStep> {
    generate(measure_count, None)
}

/// Generate the practice curriculum with tie-aware chunk boundaries.
///
/// Identical traversal to [`generate_steps`], but every candidate range is
/// expanded over the overlapping tie groups before emission and duplicate
/// expanded ranges are dropped. An empty tie-group list behaves exactly like
/// plain mode.
pub fn generate_steps_with_ties(
    measure_count: usize,
    tie_groups: &[TieGroup],
) -> Vec<PracticeStep> {
    generate(measure_count, Some(tie_groups))
}

fn generate(measure_count: usize, tie_groups: Option<&[TieGroup]>) -> Vec<PracticeStep> {
    let mut steps = Vec::new();
    let mut emitted: HashSet<(usize, usize)> = HashSet::new();

    let mut push = |steps: &mut Vec<PracticeStep>, start: usize, end: usize, ty: StepType| {
        match tie_groups {
            Some(groups) => {
                let (start, end) = expand_range(start, end, groups);
                if emitted.insert((start, end)) {
                    steps.push(PracticeStep::from_range(start, end, ty));
                }
            }
            // Plain mode emits the raw traversal without expansion or dedup
            None => steps.push(PracticeStep::from_range(start, end, ty)),
        }
    };

    for i in 1..=measure_count {
        push(&mut steps, i, i, StepType::Single);
        if i < measure_count {
            push(&mut steps, i, i + 1, StepType::Pair);
        }
        if i % 4 == 0 {
            push(&mut steps, i - 3, i, StepType::Consolidate);
        }
        if i % 8 == 0 {
            push(&mut steps, i - 7, i, StepType::Consolidate);
        }
    }

    if measure_count > 4 {
        push(&mut steps, 1, measure_count, StepType::Consolidate);
    }

    steps
}

/// Widen a candidate range until it fully contains every overlapping tie
/// group, applied transitively when groups chain.
fn expand_range(mut start: usize, mut end: usize, tie_groups: &[TieGroup]) -> (usize, usize) {
    loop {
        let mut changed = false;
        for group in tie_groups {
            if group.overlaps(start, end) {
                if group.start < start {
                    start = group.start;
                    changed = true;
                }
                if group.end > end {
                    end = group.end;
                    changed = true;
                }
            }
        }
        if !changed {
            return (start, end);
        }
    }
}
