//! Record store trait

use async_trait::async_trait;

use crate::error::StoreError;
use crate::filter::RecordFilter;
use crate::record::MachineRecord;

/// Read access to stored machine records
///
/// Every fetch decodes the full result set before returning, so a malformed
/// document fails the whole call.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetch records matching `filter`
    async fn fetch(&self, filter: &RecordFilter) -> Result<Vec<MachineRecord>, StoreError>;

    /// Fetch every record
    async fn fetch_all(&self) -> Result<Vec<MachineRecord>, StoreError> {
        self.fetch(&RecordFilter::all()).await
    }

    /// Fetch records tagged with `group`
    async fn fetch_by_group(&self, group: &str) -> Result<Vec<MachineRecord>, StoreError> {
        self.fetch(&RecordFilter::group(group)).await
    }

    /// Get store type name
    fn store_type(&self) -> &'static str;
}
