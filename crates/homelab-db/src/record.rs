//! Machine record type definitions

use std::collections::BTreeMap;

use mongodb::bson::{self, Bson, Document};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Tag key that carries group membership
pub const GROUP_KEY: &str = "group";

/// Fields every stored machine document must carry
pub const REQUIRED_FIELDS: [&str; 7] = ["_id", "name", "ip", "mac", "network", "modules", "tags"];

/// A single tag mapping
///
/// Usually holds one key, but any number is allowed. `group` assigns group
/// membership; every other key becomes a host variable.
pub type Tag = BTreeMap<String, String>;

/// A machine as stored in the `machines` collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineRecord {
    /// Opaque document id
    #[serde(rename = "_id")]
    pub id: Bson,
    /// Human readable machine name
    pub name: String,
    /// IP address, used as the inventory host name
    pub ip: String,
    /// MAC address
    pub mac: String,
    /// Network the machine lives on
    pub network: String,
    /// Installed modules
    pub modules: Vec<String>,
    /// Tag mappings in stored order
    pub tags: Vec<Tag>,
}

impl MachineRecord {
    /// Decode a raw document
    ///
    /// `index` is the position of the document in its result set and is only
    /// used for error reporting.
    ///
    /// # Errors
    /// Returns `MissingField` if a required field is absent, `InvalidField` if a
    /// field has the wrong type.
    pub fn from_document(index: usize, doc: Document) -> Result<Self, StoreError> {
        if let Some(field) = REQUIRED_FIELDS.iter().find(|f| !doc.contains_key(**f)) {
            return Err(StoreError::MissingField {
                index,
                field: (*field).to_string(),
            });
        }

        bson::from_document(doc).map_err(|e| StoreError::InvalidField {
            index,
            reason: e.to_string(),
        })
    }

    /// Encode back into a document, keeping `_id` as stored
    ///
    /// # Errors
    /// Returns an error if BSON serialization fails.
    pub fn to_document(&self) -> Result<Document, StoreError> {
        bson::to_document(self).map_err(|e| StoreError::ParseError(e.to_string()))
    }

    /// Groups named by this record's tags, in tag order
    pub fn groups(&self) -> impl Iterator<Item = &str> {
        self.tags
            .iter()
            .filter_map(|tag| tag.get(GROUP_KEY))
            .map(String::as_str)
    }

    /// Check if any tag puts this record in `group`
    #[must_use]
    pub fn in_group(&self, group: &str) -> bool {
        self.groups().any(|g| g == group)
    }
}

/// Decode a whole result set, failing on the first malformed document
///
/// # Errors
/// Returns the decode error of the first malformed document.
pub fn decode_records(docs: Vec<Document>) -> Result<Vec<MachineRecord>, StoreError> {
    docs.into_iter()
        .enumerate()
        .map(|(index, doc)| MachineRecord::from_document(index, doc))
        .collect()
}
