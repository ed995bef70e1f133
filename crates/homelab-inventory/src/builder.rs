//! Record selection and record-to-inventory transformation

use homelab_db::{GROUP_KEY, MachineRecord, RecordFilter, RecordStore, StoreError};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::mutation::Mutation;

/// Which records have their tags applied
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagScope {
    /// Every record gets its groups and variables
    #[default]
    EveryRecord,
    /// Every record becomes a host, but only the last record's tags are applied
    LastRecord,
}

/// Fetch the records an inventory run works on
///
/// A non-empty `target_group` restricts the fetch to that group; otherwise
/// every record is returned.
///
/// # Errors
/// Returns the store error unchanged; nothing is returned on partial reads.
#[instrument(skip(store), fields(store = store.store_type()))]
pub async fn select_records<S: RecordStore + ?Sized>(
    store: &S,
    target_group: Option<&str>,
) -> Result<Vec<MachineRecord>, StoreError> {
    let filter = RecordFilter::from_target(target_group);

    let records = match filter.target_group() {
        Some(group) => store.fetch_by_group(group).await?,
        None => store.fetch_all().await?,
    };

    info!(records = records.len(), "records selected");
    Ok(records)
}

/// Turn records into inventory mutations
///
/// Each record's `ip` becomes a host. A `group` tag adds the host to that
/// group; any other tag key becomes a host variable. Keys are handled one by
/// one, so a mapping can carry a group and variables at once.
#[must_use]
pub fn transform(records: &[MachineRecord], scope: TagScope) -> Vec<Mutation> {
    let mut mutations = Vec::new();

    match scope {
        TagScope::EveryRecord => {
            for record in records {
                mutations.push(Mutation::AddHost {
                    host: record.ip.clone(),
                });
                push_tag_mutations(record, &mut mutations);
            }
        }
        TagScope::LastRecord => {
            for record in records {
                mutations.push(Mutation::AddHost {
                    host: record.ip.clone(),
                });
            }
            if let Some(last) = records.last() {
                push_tag_mutations(last, &mut mutations);
            }
        }
    }

    debug!(
        records = records.len(),
        mutations = mutations.len(),
        ?scope,
        "records transformed"
    );

    mutations
}

fn push_tag_mutations(record: &MachineRecord, out: &mut Vec<Mutation>) {
    for tag in &record.tags {
        for (key, value) in tag {
            if key == GROUP_KEY {
                out.push(Mutation::AddGroup {
                    group: value.clone(),
                });
                out.push(Mutation::AddHostToGroup {
                    host: record.ip.clone(),
                    group: value.clone(),
                });
            } else {
                out.push(Mutation::SetHostVariable {
                    host: record.ip.clone(),
                    name: key.clone(),
                    value: value.clone(),
                });
            }
        }
    }
}
