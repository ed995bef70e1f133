//! homelab-db: machine record store
//!
//! Typed machine records, the `RecordStore` trait, and its MongoDB and
//! in-memory implementations.

pub mod error;
pub mod filter;
pub mod memory;
pub mod mongo;
pub mod record;
pub mod traits;

pub use mongodb::bson;

pub use error::StoreError;
pub use filter::RecordFilter;
pub use memory::MemoryRecordStore;
pub use mongo::{ConnectionInfo, DEFAULT_COLLECTION, MongoRecordStore};
pub use record::{GROUP_KEY, MachineRecord, REQUIRED_FIELDS, Tag, decode_records};
pub use traits::RecordStore;
