//! Ansible dynamic inventory rendering

use serde_json::{Map, Value, json};

use crate::sink::{ALL_GROUP, Inventory, META_KEY, UNGROUPED_GROUP};

/// Render the `--list` document
///
/// Groups map to `{"hosts": [...]}`, host variables live under
/// `_meta.hostvars`, and hosts without a group are listed in `ungrouped`.
#[must_use]
pub fn render_list(inventory: &Inventory) -> Value {
    let mut root = Map::new();

    let hostvars: Map<String, Value> = inventory
        .hosts()
        .map(|host| (host.to_string(), render_host(inventory, host)))
        .collect();
    root.insert(META_KEY.to_string(), json!({ "hostvars": hostvars }));

    let mut children = vec![UNGROUPED_GROUP.to_string()];
    children.extend(
        inventory
            .groups()
            .filter(|g| *g != UNGROUPED_GROUP)
            .map(str::to_string),
    );
    root.insert(ALL_GROUP.to_string(), json!({ "children": children }));

    for group in inventory.groups() {
        let hosts: Vec<&String> = inventory
            .group_members(group)
            .map(|members| members.iter().collect())
            .unwrap_or_default();
        root.insert(group.to_string(), json!({ "hosts": hosts }));
    }

    let mut ungrouped: Vec<String> = inventory
        .ungrouped_hosts()
        .into_iter()
        .map(str::to_string)
        .collect();
    if let Some(members) = inventory.group_members(UNGROUPED_GROUP) {
        ungrouped.extend(members.iter().cloned());
        ungrouped.sort();
        ungrouped.dedup();
    }
    root.insert(UNGROUPED_GROUP.to_string(), json!({ "hosts": ungrouped }));

    Value::Object(root)
}

/// Render the `--host` document: that host's variables, or `{}`
#[must_use]
pub fn render_host(inventory: &Inventory, host: &str) -> Value {
    let vars: Map<String, Value> = inventory
        .host_vars(host)
        .map(|vars| {
            vars.iter()
                .map(|(name, value)| (name.clone(), Value::String(value.clone())))
                .collect()
        })
        .unwrap_or_default();
    Value::Object(vars)
}
