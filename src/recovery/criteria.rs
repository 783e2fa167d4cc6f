//! Victim selection criteria and the scoring/tie-break logic shared by
//! every strategy.
//!
//! Grounded on the reference codebase's `VictimSelectionStrategy` /
//! `select_victim` in `transaction/enhanced/deadlock_detector.rs` (same
//! enum-of-strategies-plus-scoring shape), with the exact score formulas
//! taken from the original C source's `recovery.c`.

use serde::{Deserialize, Serialize};

use crate::errors::{CoreError, CoreResult};
use crate::graph::GraphStore;

/// How to pick a victim among a set of candidate (deadlocked) processes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionCriteria {
    LowestPriority,
    FewestResources,
    MostResources,
    ShortestRuntime,
    LongestRuntime,
    MinimumCost,
}

/// `cost(p) = 10*priority + 20*(held units) + 15*(blocked dependents)`.
/// A "blocked dependent" is any other active process requesting a resource
/// `p` currently holds at least one instance of.
fn cost(graph: &GraphStore, process_id: usize) -> i64 {
    let priority = graph.process(process_id).map(|p| p.priority as i64).unwrap_or(0);
    let held_units = graph.total_held_units(process_id) as i64;

    let held_resources = graph.held_resources(process_id);
    let blocked_dependents = graph
        .processes()
        .filter(|other| other.id != process_id)
        .filter(|other| held_resources.iter().any(|&r| graph.is_requesting(other.id, r)))
        .count() as i64;

    10 * priority + 20 * held_units + 15 * blocked_dependents
}

fn score(graph: &GraphStore, criteria: SelectionCriteria, process_id: usize) -> i64 {
    match criteria {
        SelectionCriteria::LowestPriority => {
            let priority = graph.process(process_id).map(|p| p.priority as i64).unwrap_or(0);
            100 - priority
        }
        SelectionCriteria::FewestResources => graph.max_resources() as i64 - graph.total_held_units(process_id) as i64,
        SelectionCriteria::MostResources => graph.total_held_units(process_id) as i64,
        SelectionCriteria::ShortestRuntime => process_id as i64,
        SelectionCriteria::LongestRuntime => graph.max_processes() as i64 - process_id as i64,
        SelectionCriteria::MinimumCost => 1000 - cost(graph, process_id),
    }
}

/// Pick the highest-scoring eligible candidate; ties go to the lowest id.
///
/// `candidates` need not be sorted or deduplicated. When `preserve_critical`
/// is set, candidates whose priority is `>= critical_priority_threshold`
/// are excluded before scoring; if that leaves nothing eligible, the
/// strategy fails with [`CoreError::NoVictim`].
pub fn select_victim(
    graph: &GraphStore,
    candidates: &[usize],
    criteria: SelectionCriteria,
    preserve_critical: bool,
    critical_priority_threshold: u8,
) -> CoreResult<usize> {
    let mut eligible: Vec<usize> = candidates
        .iter()
        .copied()
        .filter(|&p| {
            if !preserve_critical {
                return true;
            }
            graph.process(p).map(|proc| proc.priority < critical_priority_threshold).unwrap_or(false)
        })
        .collect();
    eligible.sort_unstable();
    eligible.dedup();

    let mut iter = eligible.into_iter();
    let mut best = iter.next().ok_or(CoreError::NoVictim)?;
    let mut best_score = score(graph, criteria, best);

    for candidate in iter {
        let candidate_score = score(graph, criteria, candidate);
        if candidate_score > best_score {
            best = candidate;
            best_score = candidate_score;
        }
    }

    Ok(best)
}
