//! The Graph Store: owns every process, resource, and edge of the Resource
//! Allocation Graph, and is the only component allowed to mutate it.
//!
//! Grounded on the reference codebase's `transaction/enhanced/deadlock_detector.rs`
//! (wait-for bookkeeping shape) and `transaction/locking.rs` (lock-table /
//! holder bookkeeping), generalized here into the full bipartite RAG that
//! `include/rag.h` / `src/rag.c` in the original source describe: dense
//! slot ids, a request bitmap, and an assignment count matrix.

mod process;
mod resource;

pub use process::{Process, ProcessState};
pub use resource::Resource;

use crate::config::GraphConfig;
use crate::errors::{CoreError, CoreResult};

/// Aggregate counts over the current graph, used by collaborators that want
/// a one-shot summary instead of walking the store themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GraphStats {
    pub process_count: usize,
    pub resource_count: usize,
    pub pending_requests: usize,
    pub total_assignment_units: usize,
}

/// The Resource Allocation Graph store.
///
/// Processes and resources occupy dense, stable slot ids for as long as
/// they're active; a removed id may be reused by a later `create_*` call
/// (lowest free slot first), but the reused entity starts with an empty row.
#[derive(Debug, Clone)]
pub struct GraphStore {
    config: GraphConfig,
    processes: Vec<Option<Process>>,
    resources: Vec<Option<Resource>>,
    /// `request[p][r]` — process `p` is currently waiting for resource `r`.
    request: Vec<Vec<bool>>,
    /// `assignment[p][r]` — number of instances of resource `r` held by `p`.
    assignment: Vec<Vec<u32>>,
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new(GraphConfig::default())
    }
}

impl GraphStore {
    /// Create an empty store with the given capacity.
    pub fn new(config: GraphConfig) -> Self {
        let max_processes = config.max_processes;
        let max_resources = config.max_resources;
        Self {
            config,
            processes: (0..max_processes).map(|_| None).collect(),
            resources: (0..max_resources).map(|_| None).collect(),
            request: vec![vec![false; max_resources]; max_processes],
            assignment: vec![vec![0u32; max_resources]; max_processes],
        }
    }

    pub fn max_processes(&self) -> usize {
        self.config.max_processes
    }

    pub fn max_resources(&self) -> usize {
        self.config.max_resources
    }

    // ---------------------------------------------------------------
    // Process lifecycle
    // ---------------------------------------------------------------

    /// Create a new process. Returns the new process's id.
    pub fn create_process(&mut self, name: impl Into<String>, priority: u8) -> CoreResult<usize> {
        let slot = self
            .processes
            .iter()
            .position(|p| p.is_none())
            .ok_or(CoreError::CapacityExceeded)?;

        self.request[slot].iter_mut().for_each(|b| *b = false);
        self.assignment[slot].iter_mut().for_each(|a| *a = 0);
        self.processes[slot] = Some(Process::new(slot, name, priority));
        Ok(slot)
    }

    /// Remove a process: releases all its holdings and cancels all its
    /// requests before deactivating the slot.
    pub fn remove_process(&mut self, process_id: usize) -> CoreResult<()> {
        self.require_active_process(process_id)?;
        self.release_all(process_id)?;
        self.request[process_id].iter_mut().for_each(|b| *b = false);
        self.processes[process_id] = None;
        Ok(())
    }

    pub fn process(&self, process_id: usize) -> Option<&Process> {
        self.processes.get(process_id)?.as_ref()
    }

    /// Active processes in ascending id order.
    pub fn processes(&self) -> impl Iterator<Item = &Process> {
        self.processes.iter().filter_map(|p| p.as_ref())
    }

    // ---------------------------------------------------------------
    // Resource lifecycle
    // ---------------------------------------------------------------

    /// Create a new resource with `total` instances. Returns the new
    /// resource's id.
    pub fn create_resource(&mut self, name: impl Into<String>, total: u32) -> CoreResult<usize> {
        if total == 0 {
            return Err(CoreError::InvalidArgument);
        }
        let slot = self
            .resources
            .iter()
            .position(|r| r.is_none())
            .ok_or(CoreError::CapacityExceeded)?;

        for row in &mut self.request {
            row[slot] = false;
        }
        for row in &mut self.assignment {
            row[slot] = 0;
        }
        self.resources[slot] = Some(Resource::new(slot, name, total));
        Ok(slot)
    }

    /// Remove a resource. Fails while any process still holds an instance.
    pub fn remove_resource(&mut self, resource_id: usize) -> CoreResult<()> {
        self.require_active_resource(resource_id)?;

        let held = self
            .processes
            .iter()
            .enumerate()
            .any(|(p, slot)| slot.is_some() && self.assignment[p][resource_id] > 0);
        if held {
            return Err(CoreError::InUse(resource_id));
        }

        for p in 0..self.processes.len() {
            if self.request[p][resource_id] {
                self.request[p][resource_id] = false;
                self.settle_state_if_idle(p);
            }
        }
        self.resources[resource_id] = None;
        Ok(())
    }

    pub fn resource(&self, resource_id: usize) -> Option<&Resource> {
        self.resources.get(resource_id)?.as_ref()
    }

    /// Active resources in ascending id order.
    pub fn resources(&self) -> impl Iterator<Item = &Resource> {
        self.resources.iter().filter_map(|r| r.as_ref())
    }

    // ---------------------------------------------------------------
    // Edges
    // ---------------------------------------------------------------

    /// Record that `process_id` is waiting for one instance of `resource_id`.
    /// Idempotent. Moves the process to [`ProcessState::Waiting`].
    pub fn request(&mut self, process_id: usize, resource_id: usize) -> CoreResult<()> {
        self.require_active_process(process_id)?;
        self.require_active_resource(resource_id)?;
        self.request[process_id][resource_id] = true;
        self.set_state(process_id, ProcessState::Waiting);
        Ok(())
    }

    /// Cancel a pending request. Fails if no such request exists.
    ///
    /// The error taxonomy has no dedicated "edge not found" kind; a missing
    /// request edge is reported as [`CoreError::NotFound`] on the resource
    /// id, matching how the reference codebase's lock manager treats absent
    /// lock-table entries as a generic not-found case.
    pub fn cancel_request(&mut self, process_id: usize, resource_id: usize) -> CoreResult<()> {
        self.require_active_process(process_id)?;
        self.require_active_resource(resource_id)?;
        if !self.request[process_id][resource_id] {
            return Err(CoreError::NotFound(resource_id));
        }
        self.request[process_id][resource_id] = false;
        self.settle_state_if_idle(process_id);
        Ok(())
    }

    /// Allocate one instance of `resource_id` to `process_id`. Does not
    /// require a prior matching request.
    pub fn allocate(&mut self, process_id: usize, resource_id: usize) -> CoreResult<()> {
        self.require_active_process(process_id)?;
        self.require_active_resource(resource_id)?;

        let resource = self.resources[resource_id].as_mut().expect("checked active");
        if resource.available == 0 {
            return Err(CoreError::Unavailable(resource_id));
        }
        resource.available -= 1;
        self.assignment[process_id][resource_id] += 1;
        self.request[process_id][resource_id] = false;
        self.settle_state_if_idle(process_id);
        Ok(())
    }

    /// Release one instance of `resource_id` from `process_id`. Fails if the
    /// process does not hold an instance.
    ///
    /// As with [`Self::cancel_request`], "nothing to release" is reported
    /// through [`CoreError::NotFound`] rather than a dedicated kind.
    pub fn release(&mut self, process_id: usize, resource_id: usize) -> CoreResult<()> {
        self.require_active_process(process_id)?;
        self.require_active_resource(resource_id)?;
        if self.assignment[process_id][resource_id] == 0 {
            return Err(CoreError::NotFound(resource_id));
        }
        self.assignment[process_id][resource_id] -= 1;
        self.resources[resource_id].as_mut().expect("checked active").available += 1;
        Ok(())
    }

    /// Release every instance of every resource held by `process_id`.
    /// Returns the number of instances released.
    pub fn release_all(&mut self, process_id: usize) -> CoreResult<usize> {
        self.require_active_process(process_id)?;
        let mut released = 0usize;
        for r in 0..self.assignment[process_id].len() {
            let units = self.assignment[process_id][r];
            if units > 0 {
                self.assignment[process_id][r] = 0;
                self.resources[r].as_mut().expect("held resource must be active").available += units;
                released += units as usize;
            }
        }
        Ok(released)
    }

    // ---------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------

    pub fn is_requesting(&self, process_id: usize, resource_id: usize) -> bool {
        self.request
            .get(process_id)
            .and_then(|row| row.get(resource_id))
            .copied()
            .unwrap_or(false)
    }

    pub fn is_holding(&self, process_id: usize, resource_id: usize) -> bool {
        self.assignment
            .get(process_id)
            .and_then(|row| row.get(resource_id))
            .map(|&units| units > 0)
            .unwrap_or(false)
    }

    /// How many instances of `resource_id` are held by `process_id`.
    pub fn held_units(&self, process_id: usize, resource_id: usize) -> u32 {
        self.assignment
            .get(process_id)
            .and_then(|row| row.get(resource_id))
            .copied()
            .unwrap_or(0)
    }

    /// Total instances (summed across resources) held by `process_id`.
    pub fn total_held_units(&self, process_id: usize) -> u32 {
        self.assignment.get(process_id).map(|row| row.iter().sum()).unwrap_or(0)
    }

    pub fn held_resources(&self, process_id: usize) -> Vec<usize> {
        match self.assignment.get(process_id) {
            Some(row) => row.iter().enumerate().filter(|(_, &u)| u > 0).map(|(r, _)| r).collect(),
            None => Vec::new(),
        }
    }

    pub fn requested_resources(&self, process_id: usize) -> Vec<usize> {
        match self.request.get(process_id) {
            Some(row) => row.iter().enumerate().filter(|(_, &b)| b).map(|(r, _)| r).collect(),
            None => Vec::new(),
        }
    }

    pub fn holding_processes(&self, resource_id: usize) -> Vec<usize> {
        (0..self.processes.len())
            .filter(|&p| self.processes[p].is_some() && self.assignment[p].get(resource_id).copied().unwrap_or(0) > 0)
            .collect()
    }

    /// Whether `process_id` has at least one outstanding request. Used by
    /// the cycle detector as its DFS-root filter.
    pub fn has_pending_request(&self, process_id: usize) -> bool {
        self.request.get(process_id).map(|row| row.iter().any(|&b| b)).unwrap_or(false)
    }

    /// Deep-copy the entire store. Grounded on the original source's
    /// `rag_copy`: recovery planners use this to analyze candidate
    /// strategies on a snapshot without mutating the caller's graph (see
    /// [`crate::recovery::analyze_recovery_option`]). Equivalent to
    /// [`Clone::clone`]; kept as a named method so callers have an explicit,
    /// discoverable entry point for taking a snapshot.
    pub fn deep_copy(&self) -> Self {
        self.clone()
    }

    pub fn stats(&self) -> GraphStats {
        let process_count = self.processes().count();
        let resource_count = self.resources().count();
        let pending_requests = self.request.iter().flatten().filter(|&&b| b).count();
        let total_assignment_units = self.assignment.iter().flatten().map(|&u| u as usize).sum();
        GraphStats {
            process_count,
            resource_count,
            pending_requests,
            total_assignment_units,
        }
    }

    /// Force a process into [`ProcessState::Blocked`]. Used by the recovery
    /// engine's preemption strategy; not part of the invariant-preserving
    /// request/allocate/release surface, so it stays `pub(crate)`.
    pub(crate) fn mark_blocked(&mut self, process_id: usize) {
        self.set_state(process_id, ProcessState::Blocked);
    }

    /// Force a process back to [`ProcessState::Running`]. Used by the
    /// recovery engine's rollback strategy.
    pub(crate) fn mark_running(&mut self, process_id: usize) {
        self.set_state(process_id, ProcessState::Running);
    }

    // ---------------------------------------------------------------
    // Internal helpers
    // ---------------------------------------------------------------

    fn require_active_process(&self, process_id: usize) -> CoreResult<()> {
        match self.processes.get(process_id) {
            Some(Some(_)) => Ok(()),
            _ => Err(CoreError::NotFound(process_id)),
        }
    }

    fn require_active_resource(&self, resource_id: usize) -> CoreResult<()> {
        match self.resources.get(resource_id) {
            Some(Some(_)) => Ok(()),
            _ => Err(CoreError::NotFound(resource_id)),
        }
    }

    fn set_state(&mut self, process_id: usize, state: ProcessState) {
        if let Some(p) = self.processes[process_id].as_mut() {
            p.state = state;
        }
    }

    /// If `process_id` has no outstanding requests left, move it back to
    /// `Running` — even if it was `Blocked`. "No outstanding requests ⇒ not
    /// Waiting" is the invariant preserved here; `Blocked` is not sticky.
    fn settle_state_if_idle(&mut self, process_id: usize) {
        if self.has_pending_request(process_id) {
            return;
        }
        if let Some(p) = self.processes[process_id].as_mut() {
            if p.state != ProcessState::Terminated {
                p.state = ProcessState::Running;
            }
        }
    }
}
