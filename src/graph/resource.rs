//! Resource node of the Resource Allocation Graph.

use serde::{Deserialize, Serialize};

/// A resource node: a kind of asset with a fixed number of interchangeable
/// instances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub id: usize,
    pub name: String,
    pub total: u32,
    pub available: u32,
}

impl Resource {
    pub(crate) fn new(id: usize, name: impl Into<String>, total: u32) -> Self {
        Self {
            id,
            name: name.into(),
            total,
            available: total,
        }
    }
}
