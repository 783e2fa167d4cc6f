//! Recovery strategies.
//!
//! Grounded on the reference codebase's `resolve_deadlocks` in
//! `transaction/enhanced/deadlock_detector.rs` (which only ever aborts a
//! transaction), generalized to the five-strategy table the original C
//! source's `include/recovery.h` exposes (terminate-all, terminate-one,
//! terminate-iterative, preempt, rollback).

use serde::{Deserialize, Serialize};

/// Which recovery strategy to apply to a detected deadlock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecoveryStrategy {
    /// Remove every deadlocked process.
    TerminateAll,
    /// Remove a single selected victim; does not re-check for deadlock.
    TerminateOne,
    /// Loop: detect, terminate a victim, repeat until resolved or bounded.
    TerminateIterative,
    /// Release a victim's holdings (fully or a caller-chosen subset) and
    /// move it to `Blocked` instead of removing it.
    PreemptResources,
    /// Release a victim's holdings, cancel its requests, return it to
    /// `Running`. The slot is preserved.
    Rollback,
}
