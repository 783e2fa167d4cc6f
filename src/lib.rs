//! Resource Allocation Graph core: deadlock detection and recovery for
//! OS-style educational simulators.
//!
//! This crate models resource allocation inside an operating-system-like
//! environment and decides, at any instant, whether the current pattern of
//! held and requested resources admits a run-to-completion schedule. Three
//! tightly coupled subsystems carry the engineering weight:
//!
//! - [`graph`] — the Resource Allocation Graph store: processes, resources,
//!   request/assignment edges, and the invariants that must survive every
//!   mutation.
//! - [`detect`] — a pure, read-only cycle detector over a graph snapshot:
//!   first-cycle DFS, bounded all-cycles enumeration, and a process-only
//!   wait-for graph projection.
//! - [`recovery`] — victim selection under pluggable criteria and the five
//!   recovery strategies (terminate-all, terminate-one, terminate-iterative,
//!   preempt-resources, rollback).
//!
//! [`orchestrator`] composes the three for one-shot "detect then recover"
//! flows, and [`scenarios`] builds the canonical textbook fixtures (simple
//! deadlock, circular wait, dining philosophers, multi-cycle, no-deadlock,
//! and a seeded random generator) used throughout the test suite.
//!
//! The core is silent and synchronous: nothing in `graph`, `detect`, or
//! `recovery` emits a tracing event or performs I/O (see [`logging`] for
//! the ambient hook collaborators may install at their own entry point),
//! and every public operation reports failure through [`errors::CoreError`]
//! rather than panicking.

pub mod config;
pub mod detect;
pub mod errors;
pub mod graph;
pub mod logging;
pub mod orchestrator;
pub mod recovery;
pub mod scenarios;

pub use config::{DetectorConfig, GraphConfig, RecoveryConfig};
pub use detect::{DeadlockResult, detect, detect_all, is_process_deadlocked, is_resource_in_deadlock};
pub use errors::{CoreError, CoreResult};
pub use graph::{GraphStats, GraphStore, Process, ProcessState, Resource};
pub use orchestrator::{DetectAndRecoverResult, detect_and_recover};
pub use recovery::{RecoveryResult, RecoveryStrategy, SelectionCriteria, recover};
