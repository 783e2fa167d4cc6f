//! Process node of the Resource Allocation Graph.

use serde::{Deserialize, Serialize};

/// Lifecycle state of a process in the graph.
///
/// Creation yields [`ProcessState::Running`]; issuing a request moves a
/// process to [`ProcessState::Waiting`]; being fully satisfied moves it back
/// to `Running`. [`ProcessState::Blocked`] is reached only through resource
/// preemption and is not "sticky" — canceling the last outstanding request
/// on a blocked process still returns it to `Running` (see
/// [`crate::graph::GraphStore::cancel_request`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProcessState {
    Running,
    Waiting,
    Blocked,
    Terminated,
}

/// A process node: an abstract unit of execution that holds and requests
/// resources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Process {
    pub id: usize,
    pub name: String,
    pub priority: u8,
    pub state: ProcessState,
}

impl Process {
    pub(crate) fn new(id: usize, name: impl Into<String>, priority: u8) -> Self {
        Self {
            id,
            name: name.into(),
            priority,
            state: ProcessState::Running,
        }
    }
}
