//! In-process record store

use std::path::Path;

use async_trait::async_trait;
use mongodb::bson::{self, Document};
use tracing::{debug, instrument};

use crate::error::StoreError;
use crate::filter::RecordFilter;
use crate::record::{MachineRecord, decode_records};
use crate::traits::RecordStore;

/// Record store backed by raw documents held in memory
///
/// Documents are kept undecoded and go through the same filter and decode
/// path as server results, so malformed fixtures fail the same way.
#[derive(Debug, Clone, Default)]
pub struct MemoryRecordStore {
    documents: Vec<Document>,
}

impl MemoryRecordStore {
    /// Create a store over the given documents
    #[must_use]
    pub fn new(documents: Vec<Document>) -> Self {
        Self { documents }
    }

    /// Create a store from well-formed records
    ///
    /// # Errors
    /// Returns an error if a record cannot be encoded.
    pub fn from_records(records: &[MachineRecord]) -> Result<Self, StoreError> {
        let documents = records
            .iter()
            .map(MachineRecord::to_document)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(documents))
    }

    /// Parse a JSON array of machine documents
    ///
    /// # Errors
    /// Returns `ParseError` if the text is not a JSON array of objects.
    pub fn from_json_str(json: &str) -> Result<Self, StoreError> {
        let values: Vec<serde_json::Map<String, serde_json::Value>> =
            serde_json::from_str(json).map_err(|e| StoreError::ParseError(e.to_string()))?;

        let documents = values
            .iter()
            .map(|value| {
                bson::to_document(value).map_err(|e| StoreError::ParseError(e.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::new(documents))
    }

    /// Load a JSON fixture file
    ///
    /// # Errors
    /// Returns `ParseError` if the file cannot be read or parsed.
    pub fn from_json_file(path: &Path) -> Result<Self, StoreError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| StoreError::ParseError(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&content)
    }

    /// Append a raw document
    pub fn insert(&mut self, document: Document) {
        self.documents.push(document);
    }

    /// Number of stored documents
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Check if the store is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    #[instrument(skip(self, filter), fields(filter = %filter))]
    async fn fetch(&self, filter: &RecordFilter) -> Result<Vec<MachineRecord>, StoreError> {
        let matched: Vec<Document> = self
            .documents
            .iter()
            .filter(|doc| filter.matches(doc))
            .cloned()
            .collect();

        debug!(rows = matched.len(), "memory query completed");

        decode_records(matched)
    }

    fn store_type(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use mongodb::bson::doc;

    use super::*;

    fn machine(id: &str, ip: &str, tags: Vec<Document>) -> Document {
        doc! {
            "_id": id,
            "name": id,
            "ip": ip,
            "mac": "00:00:00:00:00:00",
            "network": "lab",
            "modules": [],
            "tags": tags,
        }
    }

    fn store() -> MemoryRecordStore {
        MemoryRecordStore::new(vec![
            machine("a", "10.0.0.1", vec![doc! { "group": "web" }]),
            machine("b", "10.0.0.2", vec![doc! { "group": "db", "env": "prod" }]),
            machine("c", "10.0.0.3", vec![doc! { "env": "dev" }, doc! { "group": "web" }]),
            machine("d", "10.0.0.4", vec![]),
        ])
    }

    #[tokio::test]
    async fn test_fetch_all() {
        let records = store().fetch_all().await.unwrap();

        let ips: Vec<_> = records.iter().map(|r| r.ip.as_str()).collect();
        assert_eq!(ips, vec!["10.0.0.1", "10.0.0.2", "10.0.0.3", "10.0.0.4"]);
    }

    #[tokio::test]
    async fn test_fetch_by_group_is_tagged_subset() {
        let store = store();
        let all = store.fetch_all().await.unwrap();

        for group in ["web", "db", "missing"] {
            let selected = store.fetch_by_group(group).await.unwrap();
            let expected: Vec<_> = all.iter().filter(|r| r.in_group(group)).cloned().collect();
            assert_eq!(selected, expected, "group {group}");
        }
    }

    #[tokio::test]
    async fn test_malformed_record_fails_fetch() {
        let mut store = store();
        store.insert(doc! { "_id": "e", "name": "broken" });

        let err = store.fetch_all().await.unwrap_err();
        assert!(matches!(err, StoreError::MissingField { index: 4, .. }));
    }

    #[tokio::test]
    async fn test_malformed_record_outside_filter_is_not_decoded() {
        let mut store = store();
        store.insert(doc! { "_id": "e", "tags": [{ "group": "lost" }] });

        let records = store.fetch_by_group("web").await.unwrap();
        assert_eq!(records.len(), 2);
    }

    #[tokio::test]
    async fn test_from_json_str() {
        let json = r#"[
            {"_id": "a", "name": "nas", "ip": "10.0.0.9", "mac": "m", "network": "lab",
             "modules": ["smb"], "tags": [{"group": "storage"}]}
        ]"#;

        let store = MemoryRecordStore::from_json_str(json).unwrap();
        assert_eq!(store.len(), 1);

        let records = store.fetch_by_group("storage").await.unwrap();
        assert_eq!(records[0].ip, "10.0.0.9");
    }

    #[test]
    fn test_from_json_str_rejects_non_array() {
        let err = MemoryRecordStore::from_json_str(r#"{"ip": "10.0.0.1"}"#).unwrap_err();
        assert!(matches!(err, StoreError::ParseError(_)));
    }

    #[tokio::test]
    async fn test_empty_store() {
        let store = MemoryRecordStore::default();

        assert!(store.is_empty());
        assert!(store.fetch_all().await.unwrap().is_empty());
    }
}
