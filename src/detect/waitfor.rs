//! Process-only wait-for graph projection and its independent cycle
//! detector.
//!
//! Grounded on the reference codebase's `DeadlockDetector` (which only ever
//! builds a process-to-process wait-for map, never the full bipartite
//! graph) and on the original C source's `detect_cycle_in_wait_for`, which
//! the design notes explicitly call out as an *explicit-stack* DFS distinct
//! from the recursive bipartite one in [`super::dfs`].

use crate::graph::GraphStore;

/// `matrix[p1][p2] == true` iff `p1` requests some resource currently held
/// (in at least one instance) by `p2`, and `p1 != p2`.
pub fn wait_for_graph(graph: &GraphStore) -> Vec<Vec<bool>> {
    let n = graph.max_processes();
    let mut matrix = vec![vec![false; n]; n];

    for p1 in graph.processes() {
        for r in graph.requested_resources(p1.id) {
            for &p2 in &graph.holding_processes(r) {
                if p2 != p1.id {
                    matrix[p1.id][p2] = true;
                }
            }
        }
    }

    matrix
}

/// Explicit-stack DFS over a wait-for matrix of size `n x n`. Returns the
/// first cycle found, as a sequence of process ids, or `None`.
///
/// Cycle order here is independent of [`super::dfs::run`]'s bipartite
/// traversal order; callers should only compare cycles by set membership,
/// not by the specific sequence of nodes returned.
pub fn detect_cycle_in_wait_for(matrix: &[Vec<bool>], n: usize) -> Option<Vec<usize>> {
    #[derive(Clone, Copy, PartialEq, Eq)]
    enum Color {
        White,
        Gray,
        Black,
    }

    let mut color = vec![Color::White; n];
    let mut path: Vec<usize> = Vec::new();
    // Each stack frame is (node, next neighbor index to examine).
    let mut stack: Vec<(usize, usize)> = Vec::new();

    for start in 0..n {
        if color[start] != Color::White {
            continue;
        }
        color[start] = Color::Gray;
        path.push(start);
        stack.push((start, 0));

        while let Some(&(node, idx)) = stack.last() {
            if idx >= n {
                stack.pop();
                path.pop();
                color[node] = Color::Black;
                continue;
            }
            stack.last_mut().unwrap().1 += 1;
            if !matrix[node][idx] {
                continue;
            }
            match color[idx] {
                Color::White => {
                    color[idx] = Color::Gray;
                    path.push(idx);
                    stack.push((idx, 0));
                }
                Color::Gray => {
                    let pos = path.iter().position(|&x| x == idx).expect("gray node is on path");
                    return Some(path[pos..].to_vec());
                }
                Color::Black => {}
            }
        }
    }

    None
}
