//! homelab-inventory: Ansible inventory from the homelab machine database
//!
//! Selects machine records, turns their tags into groups and host variables,
//! and renders the result in Ansible's dynamic inventory format.

pub mod builder;
pub mod config;
pub mod error;
pub mod mutation;
pub mod output;
pub mod plugin;
pub mod sink;

pub use builder::{TagScope, select_records, transform};
pub use config::{CONFIG_ENV, PLUGIN_NAME, PluginConfig, accepts};
pub use error::{ConfigError, InventoryError};
pub use mutation::{Mutation, apply_all};
pub use output::{render_host, render_list};
pub use plugin::{build, build_with_store, populate};
pub use sink::{ALL_GROUP, Inventory, InventorySink, META_KEY, UNGROUPED_GROUP};
