//! Deterministic scenario builders: the canonical deadlock/no-deadlock
//! fixtures used by the test suite and by educational front-ends.
//!
//! Grounded on the original C source's `src/simulator.c`
//! (`setup_simple_deadlock`, `setup_circular_wait`, `setup_dining_philosophers`,
//! `setup_random_scenario`); the multi-cycle and no-deadlock builders are
//! this crate's own composition of the same primitives (the source only
//! covers one disjoint-cycle case informally via two back-to-back
//! `setup_circular_wait(2)` calls in its test suite).

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::graph::GraphStore;

/// P1 holds R1, requests R2; P2 holds R2, requests R1. Both resources have
/// a single instance: the textbook two-process circular wait.
pub fn simple_deadlock() -> GraphStore {
    let mut g = GraphStore::default();
    let p1 = g.create_process("Process_1", 50).expect("fresh store has capacity");
    let p2 = g.create_process("Process_2", 50).expect("fresh store has capacity");
    let r1 = g.create_resource("Resource_A", 1).expect("fresh store has capacity");
    let r2 = g.create_resource("Resource_B", 1).expect("fresh store has capacity");

    g.allocate(p1, r1).expect("r1 has a free instance");
    g.allocate(p2, r2).expect("r2 has a free instance");
    g.request(p1, r2).expect("p1, r2 are active");
    g.request(p2, r1).expect("p2, r1 are active");

    g
}

/// `n` processes and `n` single-instance resources; process `i` holds
/// resource `i` and requests resource `(i+1) mod n`: an N-way circular wait.
/// `n` is clamped to `[2, 64]`, matching the original source's
/// `MAX_PROCESSES` clamp in `setup_circular_wait`.
pub fn circular_wait(n: usize) -> GraphStore {
    let n = n.clamp(2, 64);
    let mut g = GraphStore::default();
    let mut processes = Vec::with_capacity(n);
    let mut resources = Vec::with_capacity(n);

    for i in 0..n {
        processes.push(g.create_process(format!("Process_{}", i + 1), 50).expect("capacity"));
        resources.push(g.create_resource(format!("Resource_{}", (b'A' + i as u8) as char), 1).expect("capacity"));
    }
    for i in 0..n {
        g.allocate(processes[i], resources[i]).expect("single holder");
        g.request(processes[i], resources[(i + 1) % n]).expect("active ids");
    }

    g
}

/// The classic dining-philosophers setup: philosopher `i` picks up left
/// fork `i`, then requests right fork `(i+1) mod n`, yielding a cycle that
/// alternates philosophers and forks. `n` is clamped to `[2, 64]`, matching
/// `setup_dining_philosophers`'s `MAX_PROCESSES` clamp in the original
/// source.
pub fn dining_philosophers(n: usize) -> GraphStore {
    let n = n.clamp(2, 64);
    let mut g = GraphStore::default();
    let mut philosophers = Vec::with_capacity(n);
    let mut forks = Vec::with_capacity(n);

    for i in 0..n {
        philosophers.push(g.create_process(format!("Philosopher_{}", i + 1), 50).expect("capacity"));
        forks.push(g.create_resource(format!("Fork_{}", i + 1), 1).expect("capacity"));
    }
    for i in 0..n {
        let left = forks[i];
        let right = forks[(i + 1) % n];
        g.allocate(philosophers[i], left).expect("single holder");
        g.request(philosophers[i], right).expect("active ids");
    }

    g
}

/// Two independent 2-process cycles (P1<->P2 via R1/R2, P3<->P4 via R3/R4):
/// a graph with two edge-disjoint deadlocks for `detect_all` to enumerate.
pub fn multi_cycle() -> GraphStore {
    let mut g = GraphStore::default();
    for pair in 0..2 {
        let p1 = g.create_process(format!("Process_{}", pair * 2 + 1), 50).expect("capacity");
        let p2 = g.create_process(format!("Process_{}", pair * 2 + 2), 50).expect("capacity");
        let r1 = g.create_resource(format!("Resource_{}", pair * 2 + 1), 1).expect("capacity");
        let r2 = g.create_resource(format!("Resource_{}", pair * 2 + 2), 1).expect("capacity");

        g.allocate(p1, r1).expect("single holder");
        g.allocate(p2, r2).expect("single holder");
        g.request(p1, r2).expect("active ids");
        g.request(p2, r1).expect("active ids");
    }
    g
}

/// `n` processes, each holding its own single-instance resource with no
/// cross-requests: a forest, not a cycle.
pub fn no_deadlock(n: usize) -> GraphStore {
    let n = n.clamp(1, 64);
    let mut g = GraphStore::default();
    for i in 0..n {
        let p = g.create_process(format!("Process_{}", i + 1), 50).expect("capacity");
        let r = g.create_resource(format!("Resource_{}", i + 1), 1).expect("capacity");
        g.allocate(p, r).expect("single holder");
    }
    g
}

/// A bounded pseudo-random scenario, reproducible from an explicit seed.
/// Grounded on `setup_random_scenario` in the original source: each process
/// gets a random priority, each resource gets 1-3 instances, and every
/// process allocates 0-2 resources at random before issuing 1-2 requests.
/// Unlike the source (which falls back to `time(NULL)` for `seed == 0`),
/// this builder takes an explicit `u64` seed unconditionally — no implicit
/// OS randomness, so callers built on it stay deterministic.
pub fn random(num_processes: usize, num_resources: usize, seed: u64) -> GraphStore {
    let num_processes = num_processes.clamp(2, 64);
    let num_resources = num_resources.clamp(2, 64);
    let mut rng = StdRng::seed_from_u64(seed);
    let mut g = GraphStore::default();

    let mut processes = Vec::with_capacity(num_processes);
    for i in 0..num_processes {
        let priority = rng.gen_range(0..100);
        processes.push(g.create_process(format!("Process_{}", i + 1), priority).expect("capacity"));
    }

    let mut resources = Vec::with_capacity(num_resources);
    for i in 0..num_resources {
        let instances = 1 + rng.gen_range(0..3u32);
        resources.push(g.create_resource(format!("Resource_{}", (b'A' + i as u8) as char), instances).expect("capacity"));
    }

    for &p in &processes {
        let to_allocate = rng.gen_range(0..3);
        for _ in 0..to_allocate {
            let r = resources[rng.gen_range(0..num_resources)];
            let _ = g.allocate(p, r);
        }

        let to_request = 1 + rng.gen_range(0..2);
        for _ in 0..to_request {
            let r = resources[rng.gen_range(0..num_resources)];
            if !g.is_holding(p, r) && !g.is_requesting(p, r) {
                let _ = g.request(p, r);
            }
        }
    }

    g
}
