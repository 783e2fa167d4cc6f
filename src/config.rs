//! Typed configuration structs for the graph store, detector, and recovery
//! engine, each with a sane [`Default`] — the reference codebase's
//! convention for its own subsystem configs (see `DeadlockConfig` in
//! `transaction/enhanced/deadlock_detector.rs`) rather than a builder or a
//! loose bag of constructor arguments.

use serde::{Deserialize, Serialize};

use crate::recovery::{RecoveryStrategy, SelectionCriteria};

/// Capacity limits for a [`crate::graph::GraphStore`].
///
/// The source this crate is patterned on bakes `MAX_PROCESSES`/`MAX_RESOURCES`
/// in at 64/64 (see `rag.h`); this crate keeps that as the default but lets
/// callers raise or lower it per store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Maximum number of simultaneously active processes.
    pub max_processes: usize,
    /// Maximum number of simultaneously active resources.
    pub max_resources: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            max_processes: 64,
            max_resources: 64,
        }
    }
}

/// Bounds for the all-cycles enumeration in [`crate::detect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Maximum number of distinct cycles `detect_all` will record.
    pub max_cycles: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self { max_cycles: 32 }
    }
}

/// Configuration for a single [`crate::recovery::recover`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoveryConfig {
    pub strategy: RecoveryStrategy,
    pub criteria: SelectionCriteria,
    /// Upper bound on iterations for [`RecoveryStrategy::TerminateIterative`];
    /// `None` means loop until resolved.
    pub max_terminations: Option<usize>,
    /// When set, processes at or above `critical_priority_threshold` are
    /// never selected as victims.
    pub preserve_critical: bool,
    pub critical_priority_threshold: u8,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            strategy: RecoveryStrategy::TerminateOne,
            criteria: SelectionCriteria::LowestPriority,
            max_terminations: None,
            preserve_critical: false,
            critical_priority_threshold: 90,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graph_config_defaults_match_source() {
        let config = GraphConfig::default();
        assert_eq!(config.max_processes, 64);
        assert_eq!(config.max_resources, 64);
    }

    #[test]
    fn detector_config_defaults_match_source() {
        assert_eq!(DetectorConfig::default().max_cycles, 32);
    }
}
