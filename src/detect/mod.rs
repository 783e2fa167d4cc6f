//! The Cycle Detector: pure, read-only analysis over a [`GraphStore`]
//! snapshot. Never mutates the graph it is given.
//!
//! Grounded on the reference codebase's `transaction/enhanced/deadlock_detector.rs`
//! (the overall shape: a detection result type, a `detect` entry point,
//! single-id convenience queries) generalized to the full bipartite DFS the
//! original C source's `cycle_detector.c` performs, plus the independent
//! wait-for projection in [`waitfor`].

mod dfs;
mod waitfor;

pub use waitfor::{detect_cycle_in_wait_for, wait_for_graph};

use serde::{Deserialize, Serialize};

use crate::graph::GraphStore;

/// Which side of the bipartite graph a [`CycleNode`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    Process,
    Resource,
}

/// One node along a reported cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleNode {
    pub kind: NodeKind,
    pub id: usize,
}

impl CycleNode {
    fn process(id: usize) -> Self {
        Self { kind: NodeKind::Process, id }
    }

    fn resource(id: usize) -> Self {
        Self { kind: NodeKind::Resource, id }
    }

    fn is_process(&self, id: usize) -> bool {
        self.kind == NodeKind::Process && self.id == id
    }

    fn is_resource(&self, id: usize) -> bool {
        self.kind == NodeKind::Resource && self.id == id
    }
}

/// A single cycle, alternating process/resource/process/... nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cycle {
    pub nodes: Vec<CycleNode>,
}

impl Cycle {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn process_ids(&self) -> impl Iterator<Item = usize> + '_ {
        self.nodes.iter().filter(|n| n.kind == NodeKind::Process).map(|n| n.id)
    }

    pub fn resource_ids(&self) -> impl Iterator<Item = usize> + '_ {
        self.nodes.iter().filter(|n| n.kind == NodeKind::Resource).map(|n| n.id)
    }
}

/// The outcome of a detection pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeadlockResult {
    pub deadlock_detected: bool,
    pub cycles: Vec<Cycle>,
    /// Deduplicated, first-appearance order.
    pub deadlocked_processes: Vec<usize>,
    /// Deduplicated, first-appearance order.
    pub deadlocked_resources: Vec<usize>,
}

impl DeadlockResult {
    fn from_cycles(cycles: Vec<Cycle>) -> Self {
        let mut deadlocked_processes = Vec::new();
        let mut deadlocked_resources = Vec::new();

        for cycle in &cycles {
            for id in cycle.process_ids() {
                if !deadlocked_processes.contains(&id) {
                    deadlocked_processes.push(id);
                }
            }
            for id in cycle.resource_ids() {
                if !deadlocked_resources.contains(&id) {
                    deadlocked_resources.push(id);
                }
            }
        }

        Self {
            deadlock_detected: !cycles.is_empty(),
            cycles,
            deadlocked_processes,
            deadlocked_resources,
        }
    }
}

/// First-cycle DFS: stops at the first recorded cycle. Use this when only
/// existence matters or when the caller will act on a single witness.
pub fn detect(graph: &GraphStore) -> DeadlockResult {
    let cycles = dfs::run(graph, true, 1);
    DeadlockResult::from_cycles(cycles)
}

/// All-cycles enumeration, bounded by `max_cycles`. Color state is not
/// reset between recorded cycles, so this finds a set of edge-disjoint
/// witnesses, not every elementary cycle in the graph.
pub fn detect_all(graph: &GraphStore, max_cycles: usize) -> DeadlockResult {
    let cycles = dfs::run(graph, false, max_cycles);
    DeadlockResult::from_cycles(cycles)
}

/// Whether `process_id` participates in a deadlock cycle. Runs a single
/// first-cycle detection internally, so a process sitting only on a second,
/// disjoint cycle is not reported here — callers that need every cycle
/// should call [`detect_all`] directly and inspect its result.
pub fn is_process_deadlocked(graph: &GraphStore, process_id: usize) -> bool {
    detect(graph).deadlocked_processes.contains(&process_id)
}

/// Resource-side analogue of [`is_process_deadlocked`].
pub fn is_resource_in_deadlock(graph: &GraphStore, resource_id: usize) -> bool {
    detect(graph).deadlocked_resources.contains(&resource_id)
}

/// Coarse severity scalar for a detection result: the number of distinct
/// deadlocked processes across every recorded cycle.
pub fn deadlock_depth(result: &DeadlockResult) -> usize {
    result.deadlocked_processes.len()
}
