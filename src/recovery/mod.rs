//! The Recovery Engine: selects victims and mutates the [`GraphStore`] to
//! resolve a detected deadlock.
//!
//! Grounded on the reference codebase's `resolve_deadlocks` /
//! `select_victim` pair in `transaction/enhanced/deadlock_detector.rs`,
//! generalized to the five-strategy table and the recovery-option analysis
//! helper the original C source's `include/recovery.h` / `src/recovery.c`
//! define.

mod criteria;
mod strategy;

pub use criteria::{select_victim, SelectionCriteria};
pub use strategy::RecoveryStrategy;

use serde::{Deserialize, Serialize};

use crate::config::RecoveryConfig;
use crate::detect::{self, DeadlockResult};
use crate::graph::GraphStore;

/// One action taken (or attempted) during recovery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoveryAction {
    pub process_id: usize,
    pub resource_id: Option<usize>,
    pub strategy: RecoveryStrategy,
    pub description: String,
    pub success: bool,
}

/// The outcome of a [`recover`] call (or one of the strategy-specific
/// entry points below).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoveryResult {
    pub success: bool,
    pub actions: Vec<RecoveryAction>,
    pub processes_terminated: usize,
    pub resources_preempted: usize,
    pub iterations: usize,
    pub summary: String,
}

impl RecoveryResult {
    fn no_deadlock() -> Self {
        Self {
            success: true,
            actions: Vec::new(),
            processes_terminated: 0,
            resources_preempted: 0,
            iterations: 0,
            summary: "no deadlock present; nothing to recover".to_string(),
        }
    }
}

/// A read-only estimate of what a candidate strategy would do, computed on
/// a deep-copied graph. Never mutates `graph`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoveryAnalysis {
    pub estimated_terminations: usize,
    pub estimated_resources_freed: usize,
    /// 0-100, coarse: 100 means the candidate strategy fully resolved the
    /// deadlock on the snapshot.
    pub feasibility_score: u8,
}

/// A deterministic, non-random recommendation for how to recover from a
/// given detection result. See [`recommend_strategy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoveryRecommendation {
    pub strategy: RecoveryStrategy,
    pub criteria: SelectionCriteria,
}

/// Single entry point: dispatches to the strategy named in `config`.
/// Trivially successful with no actions if `deadlock` reports no deadlock.
pub fn recover(graph: &mut GraphStore, deadlock: &DeadlockResult, config: &RecoveryConfig) -> RecoveryResult {
    if !deadlock.deadlock_detected {
        return RecoveryResult::no_deadlock();
    }

    match config.strategy {
        RecoveryStrategy::TerminateAll => terminate_all(graph, deadlock),
        RecoveryStrategy::TerminateOne => terminate_one(graph, deadlock, config),
        RecoveryStrategy::TerminateIterative => terminate_iterative(graph, config),
        RecoveryStrategy::PreemptResources => preempt_all(graph, deadlock, config),
        RecoveryStrategy::Rollback => rollback(graph, deadlock, config),
    }
}

/// Remove every deadlocked process. Always succeeds if at least one process
/// was removed.
pub fn terminate_all(graph: &mut GraphStore, deadlock: &DeadlockResult) -> RecoveryResult {
    let mut actions = Vec::new();
    let mut terminated = 0usize;

    for &pid in &deadlock.deadlocked_processes {
        let released = graph.release_all(pid).unwrap_or(0);
        let ok = graph.remove_process(pid).is_ok();
        if ok {
            terminated += 1;
        }
        actions.push(RecoveryAction {
            process_id: pid,
            resource_id: None,
            strategy: RecoveryStrategy::TerminateAll,
            description: format!("terminated process {pid}, releasing {released} held instance(s)"),
            success: ok,
        });
    }

    RecoveryResult {
        success: terminated > 0,
        summary: format!("terminated {terminated} of {} deadlocked process(es)", deadlock.deadlocked_processes.len()),
        processes_terminated: terminated,
        resources_preempted: 0,
        iterations: 1,
        actions,
    }
}

/// Select a single victim and remove it. Does not re-check for deadlock.
pub fn terminate_one(graph: &mut GraphStore, deadlock: &DeadlockResult, config: &RecoveryConfig) -> RecoveryResult {
    match select_victim(graph, &deadlock.deadlocked_processes, config.criteria, config.preserve_critical, config.critical_priority_threshold) {
        Ok(victim) => {
            let released = graph.release_all(victim).unwrap_or(0);
            let ok = graph.remove_process(victim).is_ok();
            RecoveryResult {
                success: ok,
                actions: vec![RecoveryAction {
                    process_id: victim,
                    resource_id: None,
                    strategy: RecoveryStrategy::TerminateOne,
                    description: format!("terminated victim process {victim}, releasing {released} held instance(s)"),
                    success: ok,
                }],
                processes_terminated: if ok { 1 } else { 0 },
                resources_preempted: 0,
                iterations: 1,
                summary: format!("terminated victim process {victim}"),
            }
        }
        Err(_) => no_victim_result(RecoveryStrategy::TerminateOne),
    }
}

/// Loop: detect, terminate a victim, repeat until resolved or
/// `config.max_terminations` is reached.
pub fn terminate_iterative(graph: &mut GraphStore, config: &RecoveryConfig) -> RecoveryResult {
    let mut actions = Vec::new();
    let mut terminated = 0usize;
    let mut iterations = 0usize;

    loop {
        let detection = detect::detect(graph);
        if !detection.deadlock_detected {
            break;
        }
        if let Some(max) = config.max_terminations {
            if iterations >= max {
                break;
            }
        }

        match select_victim(graph, &detection.deadlocked_processes, config.criteria, config.preserve_critical, config.critical_priority_threshold) {
            Ok(victim) => {
                let released = graph.release_all(victim).unwrap_or(0);
                let ok = graph.remove_process(victim).is_ok();
                if ok {
                    terminated += 1;
                }
                actions.push(RecoveryAction {
                    process_id: victim,
                    resource_id: None,
                    strategy: RecoveryStrategy::TerminateIterative,
                    description: format!("iteration {iterations}: terminated process {victim}, releasing {released} instance(s)"),
                    success: ok,
                });
                iterations += 1;
            }
            Err(_) => {
                return RecoveryResult {
                    success: false,
                    summary: "terminate_iterative stopped: no eligible victim remained".to_string(),
                    processes_terminated: terminated,
                    resources_preempted: 0,
                    iterations,
                    actions,
                };
            }
        }
    }

    let resolved = !detect::detect(graph).deadlock_detected;
    RecoveryResult {
        success: resolved,
        summary: format!("terminated {terminated} process(es) over {iterations} iteration(s); resolved={resolved}"),
        processes_terminated: terminated,
        resources_preempted: 0,
        iterations,
        actions,
    }
}

/// Release a victim's holdings (a caller-chosen `subset`, or everything
/// when `subset` is `None`) and move it to `Blocked`. Does not re-check.
pub fn preempt_resources(
    graph: &mut GraphStore,
    deadlock: &DeadlockResult,
    config: &RecoveryConfig,
    subset: Option<&[usize]>,
) -> RecoveryResult {
    match select_victim(graph, &deadlock.deadlocked_processes, config.criteria, config.preserve_critical, config.critical_priority_threshold) {
        Ok(victim) => {
            let targets: Vec<usize> = match subset {
                Some(resources) => resources.to_vec(),
                None => graph.held_resources(victim),
            };

            let mut actions = Vec::new();
            let mut preempted = 0usize;
            for r in targets {
                let ok = graph.release(victim, r).is_ok();
                if ok {
                    preempted += 1;
                }
                actions.push(RecoveryAction {
                    process_id: victim,
                    resource_id: Some(r),
                    strategy: RecoveryStrategy::PreemptResources,
                    description: format!("preempted one instance of resource {r} from process {victim}"),
                    success: ok,
                });
            }

            graph.mark_blocked(victim);

            RecoveryResult {
                success: true,
                summary: format!("preempted {preempted} instance(s) from process {victim}; process moved to Blocked"),
                processes_terminated: 0,
                resources_preempted: preempted,
                iterations: 1,
                actions,
            }
        }
        Err(_) => no_victim_result(RecoveryStrategy::PreemptResources),
    }
}

/// Convenience wrapper: preempt every instance the victim holds.
pub fn preempt_all(graph: &mut GraphStore, deadlock: &DeadlockResult, config: &RecoveryConfig) -> RecoveryResult {
    preempt_resources(graph, deadlock, config, None)
}

/// Select a victim, release all its holdings, cancel all its requests, and
/// return it to `Running`. The slot is preserved.
pub fn rollback(graph: &mut GraphStore, deadlock: &DeadlockResult, config: &RecoveryConfig) -> RecoveryResult {
    match select_victim(graph, &deadlock.deadlocked_processes, config.criteria, config.preserve_critical, config.critical_priority_threshold) {
        Ok(victim) => {
            let released = graph.release_all(victim).unwrap_or(0);
            let requested = graph.requested_resources(victim);
            for r in &requested {
                let _ = graph.cancel_request(victim, *r);
            }
            graph.mark_running(victim);

            RecoveryResult {
                success: true,
                actions: vec![RecoveryAction {
                    process_id: victim,
                    resource_id: None,
                    strategy: RecoveryStrategy::Rollback,
                    description: format!(
                        "rolled back process {victim}: released {released} instance(s), cancelled {} request(s)",
                        requested.len()
                    ),
                    success: true,
                }],
                processes_terminated: 0,
                resources_preempted: 0,
                iterations: 1,
                summary: format!("rolled back process {victim} to a clean Running state"),
            }
        }
        Err(_) => no_victim_result(RecoveryStrategy::Rollback),
    }
}

fn no_victim_result(strategy: RecoveryStrategy) -> RecoveryResult {
    RecoveryResult {
        success: false,
        actions: Vec::new(),
        processes_terminated: 0,
        resources_preempted: 0,
        iterations: 0,
        summary: format!("{strategy:?}: no eligible victim found"),
    }
}

/// Deterministic, coarse recommendation for how to recover from `result`.
/// Never uses randomness; intentionally ignores fine-grained graph shape
/// beyond the thresholds below.
pub fn recommend_strategy(result: &DeadlockResult, graph: &GraphStore) -> Option<RecoveryRecommendation> {
    let n = result.deadlocked_processes.len();
    if n == 0 {
        return None;
    }

    let any_multi_instance_holder = result.deadlocked_processes.iter().any(|&p| graph.total_held_units(p) > 1);

    let recommendation = if n == 1 {
        RecoveryRecommendation { strategy: RecoveryStrategy::TerminateOne, criteria: SelectionCriteria::LowestPriority }
    } else if n <= 3 {
        RecoveryRecommendation { strategy: RecoveryStrategy::TerminateOne, criteria: SelectionCriteria::LowestPriority }
    } else if n >= 6 && any_multi_instance_holder {
        RecoveryRecommendation { strategy: RecoveryStrategy::PreemptResources, criteria: SelectionCriteria::MostResources }
    } else {
        RecoveryRecommendation { strategy: RecoveryStrategy::TerminateOne, criteria: SelectionCriteria::LowestPriority }
    };

    Some(recommendation)
}

/// Estimate the effect of `config`'s strategy without mutating `graph`:
/// runs it on a deep-copied snapshot and reports termination/resource/
/// feasibility estimates.
pub fn analyze_recovery_option(graph: &GraphStore, deadlock: &DeadlockResult, config: &RecoveryConfig) -> RecoveryAnalysis {
    let mut snapshot = graph.deep_copy();
    let before = snapshot.stats();
    let result = recover(&mut snapshot, deadlock, config);
    let after = snapshot.stats();
    let after_detection = detect::detect(&snapshot);

    let original_count = deadlock.deadlocked_processes.len().max(1);
    let remaining = after_detection.deadlocked_processes.len();
    let feasibility_score = if !after_detection.deadlock_detected {
        100
    } else {
        let resolved = original_count.saturating_sub(remaining);
        ((resolved * 100) / original_count) as u8
    };

    RecoveryAnalysis {
        estimated_terminations: result.processes_terminated,
        estimated_resources_freed: before.total_assignment_units.saturating_sub(after.total_assignment_units),
        feasibility_score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RecoveryConfig;

    fn deadlocked_pair() -> (GraphStore, usize, usize, usize, usize) {
        let mut g = GraphStore::default();
        let p1 = g.create_process("P1", 30).unwrap();
        let p2 = g.create_process("P2", 70).unwrap();
        let r1 = g.create_resource("R1", 1).unwrap();
        let r2 = g.create_resource("R2", 1).unwrap();
        g.allocate(p1, r1).unwrap();
        g.allocate(p2, r2).unwrap();
        g.request(p1, r2).unwrap();
        g.request(p2, r1).unwrap();
        (g, p1, p2, r1, r2)
    }

    #[test]
    fn no_deadlock_is_trivially_successful() {
        let mut g = GraphStore::default();
        let detection = detect::detect(&g);
        let result = recover(&mut g, &detection, &RecoveryConfig::default());
        assert!(result.success);
        assert!(result.actions.is_empty());
    }

    #[test]
    fn terminate_one_picks_the_lowest_priority_process() {
        let (mut g, p1, p2, r1, r2) = deadlocked_pair();
        let detection = detect::detect(&g);
        let config = RecoveryConfig { strategy: RecoveryStrategy::TerminateOne, criteria: SelectionCriteria::LowestPriority, ..Default::default() };

        let result = terminate_one(&mut g, &detection, &config);
        assert!(result.success);
        assert!(g.process(p1).is_none());
        assert!(g.process(p2).is_some());
        assert!(!detect::detect(&g).deadlock_detected);
        assert_eq!(g.resource(r1).unwrap().available, 1);
        assert_eq!(g.held_units(p2, r2), 1);
    }

    #[test]
    fn terminate_all_removes_every_deadlocked_process() {
        let (mut g, p1, p2, ..) = deadlocked_pair();
        let detection = detect::detect(&g);
        let result = terminate_all(&mut g, &detection);
        assert!(result.success);
        assert_eq!(result.processes_terminated, 2);
        assert!(g.process(p1).is_none());
        assert!(g.process(p2).is_none());
    }

    #[test]
    fn terminate_iterative_resolves_fully() {
        let (mut g, ..) = deadlocked_pair();
        let config = RecoveryConfig { strategy: RecoveryStrategy::TerminateIterative, max_terminations: None, ..Default::default() };
        let result = terminate_iterative(&mut g, &config);
        assert!(result.success);
        assert!(!detect::detect(&g).deadlock_detected);
    }

    #[test]
    fn preempt_resources_blocks_instead_of_removing() {
        let (mut g, p1, p2, r1, ..) = deadlocked_pair();
        let detection = detect::detect(&g);
        let config = RecoveryConfig { strategy: RecoveryStrategy::PreemptResources, criteria: SelectionCriteria::LowestPriority, ..Default::default() };
        let result = preempt_all(&mut g, &detection, &config);
        assert!(result.success);
        assert_eq!(result.resources_preempted, 1);
        assert!(g.process(p1).is_some());
        assert_eq!(g.process(p1).unwrap().state, crate::graph::ProcessState::Blocked);
        assert_eq!(g.resource(r1).unwrap().available, 1);
        // the victim's pending request is retained across preemption
        assert!(g.is_requesting(p1, g.requested_resources(p1)[0]) || g.requested_resources(p1).len() == 1);
        let _ = p2;
    }

    #[test]
    fn rollback_returns_victim_to_running_with_nothing_outstanding() {
        let (mut g, p1, ..) = deadlocked_pair();
        let detection = detect::detect(&g);
        let config = RecoveryConfig { strategy: RecoveryStrategy::Rollback, criteria: SelectionCriteria::LowestPriority, ..Default::default() };
        let result = rollback(&mut g, &detection, &config);
        assert!(result.success);
        assert!(g.held_resources(p1).is_empty());
        assert!(g.requested_resources(p1).is_empty());
        assert_eq!(g.process(p1).unwrap().state, crate::graph::ProcessState::Running);
    }

    #[test]
    fn recommend_strategy_for_single_process_is_terminate_one() {
        let (g, p1, ..) = deadlocked_pair();
        let mut detection = detect::detect(&g);
        detection.deadlocked_processes = vec![p1];
        let rec = recommend_strategy(&detection, &g).unwrap();
        assert_eq!(rec.strategy, RecoveryStrategy::TerminateOne);
    }

    #[test]
    fn recommend_strategy_returns_none_without_deadlock() {
        let g = GraphStore::default();
        let detection = detect::detect(&g);
        assert!(recommend_strategy(&detection, &g).is_none());
    }

    #[test]
    fn analyze_recovery_option_does_not_mutate_input_graph() {
        let (g, _p1, _p2, _r1, _r2) = deadlocked_pair();
        let detection = detect::detect(&g);
        let before = g.stats();
        let config = RecoveryConfig { strategy: RecoveryStrategy::TerminateAll, ..Default::default() };
        let analysis = analyze_recovery_option(&g, &detection, &config);
        assert_eq!(g.stats(), before);
        assert_eq!(analysis.estimated_terminations, 2);
        assert_eq!(analysis.feasibility_score, 100);
    }
}
