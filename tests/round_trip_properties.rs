//! Property-based tests for the graph store's round-trip laws: allocate and
//! release, request and cancel, rollback, and slot reuse should each leave
//! the store exactly as if the paired operations had never happened.
//!
//! Grounded on the reference codebase's `tests/property_tests.rs` (same
//! crate-level `proptest!` usage, asserting invariants over randomly
//! generated operation sequences rather than fixed fixtures).

use proptest::prelude::*;
use ragcore::graph::{GraphStore, ProcessState};

fn fresh_graph_with_one_process_and_resource(total: u32) -> (GraphStore, usize, usize) {
    let mut g = GraphStore::default();
    let p = g.create_process("P", 50).unwrap();
    let r = g.create_resource("R", total).unwrap();
    (g, p, r)
}

proptest! {
    #[test]
    fn allocate_release_round_trip_restores_counters(total in 1u32..20) {
        let (mut g, p, r) = fresh_graph_with_one_process_and_resource(total);
        let before = g.resource(r).unwrap().available;

        g.allocate(p, r).unwrap();
        g.release(p, r).unwrap();

        prop_assert_eq!(g.resource(r).unwrap().available, before);
        prop_assert_eq!(g.held_units(p, r), 0);
    }

    #[test]
    fn request_cancel_round_trip_restores_state(total in 1u32..20) {
        let (mut g, p, r) = fresh_graph_with_one_process_and_resource(total);

        g.request(p, r).unwrap();
        prop_assert_eq!(g.process(p).unwrap().state, ProcessState::Waiting);

        g.cancel_request(p, r).unwrap();
        prop_assert_eq!(g.process(p).unwrap().state, ProcessState::Running);
        prop_assert!(!g.is_requesting(p, r));
    }

    #[test]
    fn removed_process_slot_is_reused_with_an_empty_row(total in 1u32..20) {
        let (mut g, p, r) = fresh_graph_with_one_process_and_resource(total);
        g.allocate(p, r).unwrap();

        g.remove_process(p).unwrap();
        let reused = g.create_process("P-again", 10).unwrap();

        prop_assert_eq!(reused, p);
        prop_assert!(g.held_resources(reused).is_empty());
        prop_assert!(g.requested_resources(reused).is_empty());
    }

    /// `available[r] + sum of assignment[*][r] == total[r]` after an
    /// arbitrary sequence of allocate/release calls bounded by `total`.
    #[test]
    fn allocation_accounting_invariant_holds_after_random_sequences(
        total in 1u32..8,
        ops in prop::collection::vec(any::<bool>(), 0..40),
    ) {
        let mut g = GraphStore::default();
        let p = g.create_process("P", 50).unwrap();
        let r = g.create_resource("R", total).unwrap();

        for allocate in ops {
            if allocate {
                let _ = g.allocate(p, r);
            } else {
                let _ = g.release(p, r);
            }
        }

        let resource = g.resource(r).unwrap();
        prop_assert_eq!(resource.available + g.held_units(p, r), resource.total);
        prop_assert!(resource.available <= resource.total);
    }
}

#[test]
fn rollback_yields_no_outstanding_requests_no_holdings_and_running_state() {
    let mut g = GraphStore::default();
    let p = g.create_process("P", 50).unwrap();
    let r1 = g.create_resource("R1", 1).unwrap();
    let r2 = g.create_resource("R2", 1).unwrap();
    g.allocate(p, r1).unwrap();
    g.request(p, r2).unwrap();

    let released = g.release_all(p).unwrap();
    for r in g.requested_resources(p) {
        g.cancel_request(p, r).unwrap();
    }

    assert_eq!(released, 1);
    assert!(g.held_resources(p).is_empty());
    assert!(g.requested_resources(p).is_empty());
    assert_eq!(g.process(p).unwrap().state, ProcessState::Running);
}

#[test]
fn inactive_slots_have_an_entirely_zero_row_and_column() {
    let mut g = GraphStore::default();
    let p = g.create_process("P", 50).unwrap();
    let r = g.create_resource("R", 2).unwrap();
    g.allocate(p, r).unwrap();
    g.remove_process(p).unwrap();

    assert!(g.held_resources(p).is_empty());
    assert!(g.requested_resources(p).is_empty());
    assert!(g.holding_processes(r).is_empty());
}
