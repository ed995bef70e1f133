//! Inventory sink and the in-memory inventory

use std::collections::{BTreeMap, BTreeSet};

use crate::error::InventoryError;

/// Group every host implicitly belongs to
pub const ALL_GROUP: &str = "all";

/// Group holding hosts that belong to no other group
pub const UNGROUPED_GROUP: &str = "ungrouped";

/// Top-level key of the rendered inventory that carries host variables
pub const META_KEY: &str = "_meta";

/// Receiver of inventory mutations
///
/// Implemented by whatever owns the inventory. Hosts and groups must be added
/// before they are referenced.
pub trait InventorySink {
    /// Register a host; adding an existing host is a no-op
    ///
    /// # Errors
    /// Returns an error if the sink rejects the host. `Inventory` rejects
    /// blank names with `InvalidHostName`.
    fn add_host(&mut self, host: &str) -> Result<(), InventoryError>;

    /// Register a group; adding an existing group is a no-op
    ///
    /// # Errors
    /// Returns an error if the sink rejects the group name. `Inventory`
    /// rejects blank names and `_meta` with `InvalidGroupName`.
    fn add_group(&mut self, group: &str) -> Result<(), InventoryError>;

    /// Add a registered host to a registered group
    ///
    /// # Errors
    /// Returns `UnknownHost` or `UnknownGroup` if either is missing.
    fn add_host_to_group(&mut self, host: &str, group: &str) -> Result<(), InventoryError>;

    /// Set a variable on a registered host, replacing any previous value
    ///
    /// # Errors
    /// Returns `UnknownHost` if the host is missing.
    fn set_host_variable(
        &mut self,
        host: &str,
        name: &str,
        value: &str,
    ) -> Result<(), InventoryError>;
}

/// Hosts, groups and host variables
///
/// Ordered collections keep rendering deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    /// Host name -> variables
    hosts: BTreeMap<String, BTreeMap<String, String>>,
    /// Group name -> member hosts
    groups: BTreeMap<String, BTreeSet<String>>,
}

impl Inventory {
    /// Create an empty inventory
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if nothing has been added
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty() && self.groups.is_empty()
    }

    /// Host names in order
    pub fn hosts(&self) -> impl Iterator<Item = &str> {
        self.hosts.keys().map(String::as_str)
    }

    /// Group names in order, excluding the implicit `all`
    pub fn groups(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    /// Check if a host is registered
    #[must_use]
    pub fn has_host(&self, host: &str) -> bool {
        self.hosts.contains_key(host)
    }

    /// Check if a group is registered
    #[must_use]
    pub fn has_group(&self, group: &str) -> bool {
        group == ALL_GROUP || self.groups.contains_key(group)
    }

    /// Members of a group
    #[must_use]
    pub fn group_members(&self, group: &str) -> Option<&BTreeSet<String>> {
        self.groups.get(group)
    }

    /// Groups a host belongs to, excluding `all`
    #[must_use]
    pub fn host_groups(&self, host: &str) -> Vec<&str> {
        self.groups
            .iter()
            .filter(|(_, members)| members.contains(host))
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Variables of a host
    #[must_use]
    pub fn host_vars(&self, host: &str) -> Option<&BTreeMap<String, String>> {
        self.hosts.get(host)
    }

    /// Single variable of a host
    #[must_use]
    pub fn host_var(&self, host: &str, name: &str) -> Option<&str> {
        self.hosts.get(host)?.get(name).map(String::as_str)
    }

    /// Hosts that belong to no group
    #[must_use]
    pub fn ungrouped_hosts(&self) -> Vec<&str> {
        self.hosts()
            .filter(|host| !self.groups.values().any(|members| members.contains(*host)))
            .collect()
    }
}

impl InventorySink for Inventory {
    fn add_host(&mut self, host: &str) -> Result<(), InventoryError> {
        if host.trim().is_empty() {
            return Err(InventoryError::InvalidHostName(host.to_string()));
        }
        self.hosts.entry(host.to_string()).or_default();
        Ok(())
    }

    fn add_group(&mut self, group: &str) -> Result<(), InventoryError> {
        if group.trim().is_empty() || group == META_KEY {
            return Err(InventoryError::InvalidGroupName(group.to_string()));
        }
        if group != ALL_GROUP {
            self.groups.entry(group.to_string()).or_default();
        }
        Ok(())
    }

    fn add_host_to_group(&mut self, host: &str, group: &str) -> Result<(), InventoryError> {
        if !self.hosts.contains_key(host) {
            return Err(InventoryError::UnknownHost(host.to_string()));
        }
        if group == ALL_GROUP {
            return Ok(());
        }

        let members = self
            .groups
            .get_mut(group)
            .ok_or_else(|| InventoryError::UnknownGroup(group.to_string()))?;
        members.insert(host.to_string());
        Ok(())
    }

    fn set_host_variable(
        &mut self,
        host: &str,
        name: &str,
        value: &str,
    ) -> Result<(), InventoryError> {
        let vars = self
            .hosts
            .get_mut(host)
            .ok_or_else(|| InventoryError::UnknownHost(host.to_string()))?;
        vars.insert(name.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_host_is_idempotent() {
        let mut inventory = Inventory::new();
        inventory.add_host("10.0.0.1").unwrap();
        inventory.set_host_variable("10.0.0.1", "env", "prod").unwrap();
        inventory.add_host("10.0.0.1").unwrap();

        assert_eq!(inventory.hosts().collect::<Vec<_>>(), vec!["10.0.0.1"]);
        assert_eq!(inventory.host_var("10.0.0.1", "env"), Some("prod"));
    }

    #[test]
    fn test_add_group_is_idempotent() {
        let mut inventory = Inventory::new();
        inventory.add_host("10.0.0.1").unwrap();
        inventory.add_group("web").unwrap();
        inventory.add_host_to_group("10.0.0.1", "web").unwrap();
        inventory.add_group("web").unwrap();
        inventory.add_host_to_group("10.0.0.1", "web").unwrap();

        assert_eq!(inventory.groups().collect::<Vec<_>>(), vec!["web"]);
        assert_eq!(inventory.group_members("web").unwrap().len(), 1);
    }

    #[test]
    fn test_empty_group_name_rejected() {
        let mut inventory = Inventory::new();

        let err = inventory.add_group("").unwrap_err();
        assert!(matches!(err, InventoryError::InvalidGroupName(_)));
    }

    #[test]
    fn test_meta_group_name_rejected() {
        let mut inventory = Inventory::new();

        let err = inventory.add_group(META_KEY).unwrap_err();
        assert!(matches!(err, InventoryError::InvalidGroupName(ref name) if name == "_meta"));
        assert!(!inventory.has_group(META_KEY));
    }

    #[test]
    fn test_empty_host_name_rejected() {
        let mut inventory = Inventory::new();

        for host in ["", "  "] {
            let err = inventory.add_host(host).unwrap_err();
            assert!(matches!(err, InventoryError::InvalidHostName(_)));
        }
        assert!(inventory.is_empty());
    }

    #[test]
    fn test_all_group_is_implicit() {
        let mut inventory = Inventory::new();
        inventory.add_host("10.0.0.1").unwrap();
        inventory.add_group(ALL_GROUP).unwrap();
        inventory.add_host_to_group("10.0.0.1", ALL_GROUP).unwrap();

        assert!(inventory.has_group(ALL_GROUP));
        assert_eq!(inventory.groups().count(), 0);
        assert_eq!(inventory.ungrouped_hosts(), vec!["10.0.0.1"]);
    }

    #[test]
    fn test_unknown_references() {
        let mut inventory = Inventory::new();
        inventory.add_group("web").unwrap();

        assert!(matches!(
            inventory.add_host_to_group("10.0.0.9", "web"),
            Err(InventoryError::UnknownHost(_))
        ));
        assert!(matches!(
            inventory.set_host_variable("10.0.0.9", "env", "prod"),
            Err(InventoryError::UnknownHost(_))
        ));

        inventory.add_host("10.0.0.9").unwrap();
        assert!(matches!(
            inventory.add_host_to_group("10.0.0.9", "db"),
            Err(InventoryError::UnknownGroup(_))
        ));
    }

    #[test]
    fn test_host_groups_and_ungrouped() {
        let mut inventory = Inventory::new();
        for host in ["10.0.0.1", "10.0.0.2", "10.0.0.3"] {
            inventory.add_host(host).unwrap();
        }
        inventory.add_group("web").unwrap();
        inventory.add_group("dns").unwrap();
        inventory.add_host_to_group("10.0.0.1", "web").unwrap();
        inventory.add_host_to_group("10.0.0.1", "dns").unwrap();
        inventory.add_host_to_group("10.0.0.2", "dns").unwrap();

        assert_eq!(inventory.host_groups("10.0.0.1"), vec!["dns", "web"]);
        assert_eq!(inventory.ungrouped_hosts(), vec!["10.0.0.3"]);
    }
}
