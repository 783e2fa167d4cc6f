//! The Orchestrator: a thin one-shot "detect then recover" composition of
//! the Graph Store, Cycle Detector, and Recovery Engine.
//!
//! Grounded on the `CMD_RECOVER` branch of the original C source's
//! `api_execute` (`src/api.c`): detect first, short-circuit if nothing is
//! deadlocked, otherwise hand the detection result to the recovery engine
//! with the caller's configuration. This module carries none of `api.c`'s
//! JSON envelope or command dispatch — those are external concerns handled
//! by collaborators — only the detect-then-recover control flow itself.

use crate::config::RecoveryConfig;
use crate::detect::{self, DeadlockResult};
use crate::graph::GraphStore;
use crate::recovery::{self, RecoveryResult};

/// The combined outcome of one orchestrated detect-then-recover pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectAndRecoverResult {
    pub detection: DeadlockResult,
    pub recovery: RecoveryResult,
}

/// Run detection, then — only if a deadlock was found — recovery, against
/// `graph`, mutating it in place via the recovery engine's public API.
///
/// Equivalent to calling [`detect::detect`] followed by [`recovery::recover`]
/// with the same detection result, bundled for callers that don't need to
/// inspect the detection on its own.
pub fn detect_and_recover(graph: &mut GraphStore, config: &RecoveryConfig) -> DetectAndRecoverResult {
    let detection = detect::detect(graph);
    let recovery = recovery::recover(graph, &detection, config);
    DetectAndRecoverResult { detection, recovery }
}

/// As [`detect_and_recover`], but uses [`detect::detect_all`] so the
/// recovery engine sees every recorded cycle (not just the first found)
/// when it extracts the deadlocked-process set.
pub fn detect_all_and_recover(graph: &mut GraphStore, max_cycles: usize, config: &RecoveryConfig) -> DetectAndRecoverResult {
    let detection = detect::detect_all(graph, max_cycles);
    let recovery = recovery::recover(graph, &detection, config);
    DetectAndRecoverResult { detection, recovery }
}

/// Detect, then recover using whatever [`recovery::recommend_strategy`]
/// suggests for the resulting deadlock set. Falls back to a trivially
/// successful no-op if nothing is deadlocked or if no recommendation is
/// available (same "no victim possible" shape as an empty deadlock set).
pub fn detect_and_recover_recommended(graph: &mut GraphStore) -> DetectAndRecoverResult {
    let detection = detect::detect(graph);
    let recommendation = recovery::recommend_strategy(&detection, graph);

    let config = match recommendation {
        Some(rec) => RecoveryConfig { strategy: rec.strategy, criteria: rec.criteria, ..RecoveryConfig::default() },
        None => RecoveryConfig::default(),
    };

    let recovery = recovery::recover(graph, &detection, &config);
    DetectAndRecoverResult { detection, recovery }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recovery::{RecoveryStrategy, SelectionCriteria};
    use crate::scenarios;

    #[test]
    fn detect_and_recover_is_a_no_op_without_deadlock() {
        let mut g = scenarios::no_deadlock(3);
        let config = RecoveryConfig::default();
        let outcome = detect_and_recover(&mut g, &config);
        assert!(!outcome.detection.deadlock_detected);
        assert!(outcome.recovery.success);
        assert!(outcome.recovery.actions.is_empty());
    }

    #[test]
    fn detect_and_recover_resolves_a_simple_deadlock() {
        let mut g = scenarios::simple_deadlock();
        let config = RecoveryConfig { strategy: RecoveryStrategy::TerminateAll, criteria: SelectionCriteria::LowestPriority, ..Default::default() };
        let outcome = detect_and_recover(&mut g, &config);
        assert!(outcome.detection.deadlock_detected);
        assert!(outcome.recovery.success);
        assert!(!detect::detect(&g).deadlock_detected);
    }

    #[test]
    fn detect_all_and_recover_sees_every_cycle() {
        let mut g = scenarios::multi_cycle();
        let config = RecoveryConfig { strategy: RecoveryStrategy::TerminateAll, ..Default::default() };
        let outcome = detect_all_and_recover(&mut g, 32, &config);
        assert_eq!(outcome.detection.cycles.len(), 2);
        assert_eq!(outcome.recovery.processes_terminated, 4);
    }

    #[test]
    fn recommended_recovery_resolves_a_single_process_deadlock() {
        let mut g = scenarios::simple_deadlock();
        let outcome = detect_and_recover_recommended(&mut g);
        assert!(outcome.recovery.success);
        assert!(!detect::detect(&g).deadlock_detected);
    }
}
