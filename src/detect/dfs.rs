//! Three-color DFS over the bipartite Resource Allocation Graph.
//!
//! Grounded on the reference codebase's `dfs_detect_cycle` /
//! `extract_cycle` pair in `transaction/enhanced/deadlock_detector.rs`,
//! generalized from a process-only wait-for matrix to the full bipartite
//! graph the original C source's `cycle_detector.c` walks (request edges
//! process -> resource, assignment edges resource -> process).

use crate::graph::GraphStore;

use super::{Cycle, CycleNode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    White,
    Gray,
    Black,
}

struct DfsState {
    proc_color: Vec<Color>,
    res_color: Vec<Color>,
    path: Vec<CycleNode>,
    cycles: Vec<Cycle>,
    max_cycles: usize,
    stop_at_first: bool,
    stop: bool,
}

impl DfsState {
    fn new(max_processes: usize, max_resources: usize, stop_at_first: bool, max_cycles: usize) -> Self {
        Self {
            proc_color: vec![Color::White; max_processes],
            res_color: vec![Color::White; max_resources],
            path: Vec::new(),
            cycles: Vec::new(),
            max_cycles: max_cycles.max(1),
            stop_at_first,
            stop: false,
        }
    }

    fn record_cycle(&mut self, kind_matches: impl Fn(&CycleNode) -> bool) {
        let idx = self
            .path
            .iter()
            .position(|n| kind_matches(n))
            .expect("a gray node must already be on the path");
        self.cycles.push(Cycle { nodes: self.path[idx..].to_vec() });
        if self.stop_at_first || self.cycles.len() >= self.max_cycles {
            self.stop = true;
        }
    }
}

fn visit_process(pid: usize, graph: &GraphStore, state: &mut DfsState) {
    state.proc_color[pid] = Color::Gray;
    state.path.push(CycleNode::process(pid));

    for r in graph.requested_resources(pid) {
        if state.stop {
            break;
        }
        match state.res_color[r] {
            Color::White => visit_resource(r, graph, state),
            Color::Gray => state.record_cycle(|n| n.is_resource(r)),
            Color::Black => {}
        }
    }

    state.path.pop();
    state.proc_color[pid] = Color::Black;
}

fn visit_resource(rid: usize, graph: &GraphStore, state: &mut DfsState) {
    state.res_color[rid] = Color::Gray;
    state.path.push(CycleNode::resource(rid));

    for p in graph.holding_processes(rid) {
        if state.stop {
            break;
        }
        match state.proc_color[p] {
            Color::White => visit_process(p, graph, state),
            Color::Gray => state.record_cycle(|n| n.is_process(p)),
            Color::Black => {}
        }
    }

    state.path.pop();
    state.res_color[rid] = Color::Black;
}

/// Run the bipartite DFS. `stop_at_first` short-circuits after the first
/// recorded cycle; otherwise the traversal continues (without resetting
/// color state) until every root is exhausted or `max_cycles` is reached.
pub(super) fn run(graph: &GraphStore, stop_at_first: bool, max_cycles: usize) -> Vec<Cycle> {
    let mut state = DfsState::new(graph.max_processes(), graph.max_resources(), stop_at_first, max_cycles);

    let roots: Vec<usize> = graph
        .processes()
        .map(|p| p.id)
        .filter(|&pid| graph.has_pending_request(pid))
        .collect();

    for pid in roots {
        if state.stop {
            break;
        }
        if state.proc_color[pid] == Color::White {
            visit_process(pid, graph, &mut state);
        }
    }

    state.cycles
}
