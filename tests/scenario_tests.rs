//! Canonical-scenario integration tests covering the textbook deadlock
//! setups (simple two-process deadlock, N-way circular wait, dining
//! philosophers, disjoint multi-cycle, no-deadlock) end to end through
//! detection and each recovery strategy.

use ragcore::config::RecoveryConfig;
use ragcore::detect;
use ragcore::recovery::{self, RecoveryStrategy, SelectionCriteria};
use ragcore::scenarios;

#[test]
fn simple_two_process_deadlock_is_detected() {
    let g = scenarios::simple_deadlock();
    let result = detect::detect(&g);
    assert!(result.deadlock_detected);
    assert_eq!(result.deadlocked_processes.len(), 2);
    assert_eq!(result.deadlocked_resources.len(), 2);
}

#[test]
fn terminate_one_lowest_priority_leaves_the_survivor_holding_its_resource() {
    let mut g = ragcore::GraphStore::default();
    let p1 = g.create_process("P1", 30).unwrap();
    let p2 = g.create_process("P2", 70).unwrap();
    let r1 = g.create_resource("R1", 1).unwrap();
    let r2 = g.create_resource("R2", 1).unwrap();
    g.allocate(p1, r1).unwrap();
    g.allocate(p2, r2).unwrap();
    g.request(p1, r2).unwrap();
    g.request(p2, r1).unwrap();

    let detection = detect::detect(&g);
    let config = RecoveryConfig { strategy: RecoveryStrategy::TerminateOne, criteria: SelectionCriteria::LowestPriority, ..Default::default() };
    let result = recovery::recover(&mut g, &detection, &config);

    assert!(result.success);
    assert!(g.process(p1).is_none());
    assert!(g.process(p2).is_some());
    assert!(!detect::detect(&g).deadlock_detected);
    assert_eq!(g.resource(r1).unwrap().available, 1);
    assert_eq!(g.held_units(p2, r2), 1);
}

#[test]
fn four_process_circular_wait_is_detected() {
    let g = scenarios::circular_wait(4);
    let result = detect::detect(&g);
    assert!(result.deadlock_detected);
    assert_eq!(result.deadlocked_processes.len(), 4);
    assert_eq!(result.deadlocked_resources.len(), 4);
}

#[test]
fn five_philosophers_produce_a_ten_node_cycle() {
    let g = scenarios::dining_philosophers(5);
    let result = detect::detect(&g);
    assert!(result.deadlock_detected);
    assert_eq!(result.cycles.len(), 1);
    assert_eq!(result.cycles[0].len(), 10);
}

#[test]
fn independent_holdings_are_not_a_deadlock() {
    let g = scenarios::no_deadlock(2);
    let result = detect::detect(&g);
    assert!(!result.deadlock_detected);
    assert!(detect::wait_for_graph(&g).iter().all(|row| row.iter().all(|&b| !b)));
}

#[test]
fn two_disjoint_cycles_are_both_recorded_by_detect_all() {
    let g = scenarios::multi_cycle();
    let result = detect::detect_all(&g, 32);
    assert_eq!(result.cycles.len(), 2);
    assert_eq!(result.deadlocked_processes.len(), 4);
}

#[test]
fn terminate_all_on_circular_wait_fully_resolves() {
    let mut g = scenarios::circular_wait(4);
    let detection = detect::detect(&g);
    let result = recovery::terminate_all(&mut g, &detection);
    assert!(result.success);
    assert_eq!(result.processes_terminated, 4);
    assert!(!detect::detect(&g).deadlock_detected);
}

#[test]
fn terminate_iterative_resolves_dining_philosophers_regardless_of_bound() {
    let mut g = scenarios::dining_philosophers(5);
    let config = RecoveryConfig { strategy: RecoveryStrategy::TerminateIterative, max_terminations: None, ..Default::default() };
    let result = recovery::terminate_iterative(&mut g, &config);
    assert!(result.success);
    assert!(!detect::detect(&g).deadlock_detected);
}

#[test]
fn rollback_on_multi_cycle_clears_one_pair_and_leaves_the_other_deadlocked() {
    let mut g = scenarios::multi_cycle();
    let detection = detect::detect_all(&g, 32);
    let config = RecoveryConfig { strategy: RecoveryStrategy::Rollback, criteria: SelectionCriteria::LowestPriority, ..Default::default() };
    let result = recovery::rollback(&mut g, &detection, &config);
    assert!(result.success);

    // Rollback touches exactly one victim; the other cycle is untouched.
    let remaining = detect::detect(&g);
    assert!(remaining.deadlock_detected);
    assert_eq!(remaining.deadlocked_processes.len(), 2);
}
