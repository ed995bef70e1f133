//! Inventory plugin entry points
//!
//! The host framework calls [`accepts`] to decide whether a file is ours and
//! [`build`] to obtain the mutations for it. Nothing here depends on the
//! framework; it only needs an [`InventorySink`] to apply the result.

use std::path::Path;

use homelab_db::{MongoRecordStore, RecordStore};
use tracing::{info, instrument};

pub use crate::config::accepts;
use crate::builder::{select_records, transform};
use crate::config::PluginConfig;
use crate::error::InventoryError;
use crate::mutation::{Mutation, apply_all};
use crate::sink::InventorySink;

/// Connect to the configured MongoDB and compute the inventory mutations
///
/// # Errors
/// Returns a store error if the database is unreachable or a record is
/// malformed. No mutations are returned in that case.
#[instrument(skip(config), fields(target_group = ?config.target_group()))]
pub async fn build(config: &PluginConfig) -> Result<Vec<Mutation>, InventoryError> {
    let store = MongoRecordStore::connect(&config.connection).await?;
    build_with_store(config, &store).await
}

/// Compute the inventory mutations against any record store
///
/// # Errors
/// Returns the store error if selection fails.
#[instrument(skip(config, store), fields(store = store.store_type()))]
pub async fn build_with_store<S: RecordStore + ?Sized>(
    config: &PluginConfig,
    store: &S,
) -> Result<Vec<Mutation>, InventoryError> {
    let records = select_records(store, config.target_group()).await?;
    let mutations = transform(&records, config.tag_scope);

    info!(
        records = records.len(),
        mutations = mutations.len(),
        "inventory built"
    );

    Ok(mutations)
}

/// Load the file at `path`, build against `store`, and apply to `sink`
///
/// The sink is only touched once every record has been fetched and decoded.
///
/// # Errors
/// Returns a configuration error before any store access if the file is
/// rejected, otherwise the first store or sink error.
pub async fn populate<S, K>(path: &Path, store: &S, sink: &mut K) -> Result<(), InventoryError>
where
    S: RecordStore + ?Sized,
    K: InventorySink + ?Sized,
{
    let config = PluginConfig::load(path)?;
    let mutations = build_with_store(&config, store).await?;
    apply_all(&mutations, sink)
}
