//! Error types for the Resource Allocation Graph core.
//!
//! Every public mutator and query in [`crate::graph`], [`crate::detect`], and
//! [`crate::recovery`] surfaces failures through [`CoreError`] rather than
//! panicking or silently proceeding past a broken invariant.

use thiserror::Error;

/// Errors produced by the graph store, detector, and recovery engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A referenced process or resource slot is inactive (or was never created).
    #[error("id {0} is not an active process or resource")]
    NotFound(usize),

    /// No free slot exists for a new process or resource.
    #[error("no free slot available (capacity exhausted)")]
    CapacityExceeded,

    /// A resource was created with a non-positive instance count.
    #[error("invalid argument: resource instance count must be >= 1")]
    InvalidArgument,

    /// `allocate` was attempted but the resource has no free instances.
    #[error("resource {0} has no available instances")]
    Unavailable(usize),

    /// `remove_resource` was attempted while a process still holds an instance.
    #[error("resource {0} is still held by at least one process")]
    InUse(usize),

    /// Recovery could not select a victim (empty or fully critical candidate set).
    #[error("no eligible victim process found")]
    NoVictim,
}

/// Result alias used throughout the core.
pub type CoreResult<T> = Result<T, CoreError>;
