//! Inventory mutations

use serde::Serialize;

use crate::error::InventoryError;
use crate::sink::InventorySink;

/// A single change to an inventory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Mutation {
    /// Register a host
    AddHost {
        /// Host name
        host: String,
    },
    /// Register a group
    AddGroup {
        /// Group name
        group: String,
    },
    /// Put a host into a group
    AddHostToGroup {
        /// Host name
        host: String,
        /// Group name
        group: String,
    },
    /// Set a host variable
    SetHostVariable {
        /// Host name
        host: String,
        /// Variable name
        name: String,
        /// Variable value
        value: String,
    },
}

impl Mutation {
    /// Apply this mutation to a sink
    ///
    /// # Errors
    /// Returns whatever the sink rejects.
    pub fn apply<S: InventorySink + ?Sized>(&self, sink: &mut S) -> Result<(), InventoryError> {
        match self {
            Mutation::AddHost { host } => sink.add_host(host),
            Mutation::AddGroup { group } => sink.add_group(group),
            Mutation::AddHostToGroup { host, group } => sink.add_host_to_group(host, group),
            Mutation::SetHostVariable { host, name, value } => {
                sink.set_host_variable(host, name, value)
            }
        }
    }
}

/// Apply mutations in order, stopping at the first rejection
///
/// # Errors
/// Returns the first error raised by the sink.
pub fn apply_all<S: InventorySink + ?Sized>(
    mutations: &[Mutation],
    sink: &mut S,
) -> Result<(), InventoryError> {
    mutations.iter().try_for_each(|m| m.apply(sink))
}
