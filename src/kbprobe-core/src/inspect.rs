//! Read-only inspection of collections and sampled records.
//!
//! Nothing here formats output; rendering belongs to the caller.

use std::collections::BTreeSet;

use crate::error::Result;
use crate::models::{CollectionInfo, Record};
use crate::store::VectorStore;

/// Describe every collection, in listing order
pub async fn describe_collections<S>(store: &S) -> Result<Vec<CollectionInfo>>
where
    S: VectorStore + ?Sized,
{
    let names = store.list_collections().await?;

    let mut infos = Vec::with_capacity(names.len());
    for name in names {
        infos.push(store.collection_info(&name).await?);
    }

    tracing::debug!("Described {} collections", infos.len());
    Ok(infos)
}

/// First page of records from `collection`, at most `limit` (minimum 1)
pub async fn sample_records<S>(store: &S, collection: &str, limit: usize) -> Result<Vec<Record>>
where
    S: VectorStore + ?Sized,
{
    let page = store.scroll(collection, limit.max(1), None).await?;
    Ok(page.records)
}

/// Sorted union of payload keys across `records`
pub fn payload_fields(records: &[Record]) -> Vec<String> {
    records
        .iter()
        .flat_map(|r| r.payload.keys().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
