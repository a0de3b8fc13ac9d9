//! Batch reads.
//!
//! A key set becomes exactly one BatchGetItem request; the per-table result
//! list is turned back into `{ key, document }` pairs. Keys the store has no
//! item for are simply missing from the result. Requests above DynamoDB's
//! per-call key limit are not split: the store's validation error is
//! returned as is.

use std::collections::HashSet;

use jstor_core::storage::{BatchEntry, KeyValue, Result};
use tracing::{debug, warn};

use crate::commands::CommandBuilder;
use crate::conversions::{item_to_document, key_value};
use crate::transport::{BatchGetOutput, Transport};

/// Reads every key in `keys` with a single request.
///
/// Returns `Ok(None)` when the response has no result list for the table.
pub async fn batch_get<T: Transport + ?Sized>(
    transport: &T,
    commands: &CommandBuilder,
    keys: &[KeyValue],
) -> Result<Option<Vec<BatchEntry>>> {
    let keys = unique_keys(keys);
    if keys.is_empty() {
        return Ok(Some(Vec::new()));
    }

    debug!(table = commands.table_name(), keys = keys.len(), "batch get");
    let output = transport.batch_get(commands.batch_get(&keys)).await?;

    reassemble(output, commands)
}

/// Drops repeated keys, keeping first-seen order.
pub fn unique_keys(keys: &[KeyValue]) -> Vec<KeyValue> {
    let mut seen = HashSet::with_capacity(keys.len());
    keys.iter()
        .filter(|key| seen.insert(key.as_str()))
        .cloned()
        .collect()
}

/// Pairs each returned item with the key stored in it.
pub fn reassemble(
    mut output: BatchGetOutput,
    commands: &CommandBuilder,
) -> Result<Option<Vec<BatchEntry>>> {
    if output.unprocessed_keys > 0 {
        warn!(
            table = commands.table_name(),
            unprocessed = output.unprocessed_keys,
            "batch get left keys unprocessed; they are reported as absent"
        );
    }

    let Some(items) = output
        .responses
        .as_mut()
        .and_then(|responses| responses.remove(commands.table_name()))
    else {
        warn!(
            table = commands.table_name(),
            "batch get response has no result list for the table"
        );
        return Ok(None);
    };

    let attribute = commands.key_attribute().logical();
    let mut entries = Vec::with_capacity(items.len());
    for item in items {
        let Some(key) = key_value(&item, attribute) else {
            warn!(
                table = commands.table_name(),
                attribute, "batch get returned an item without a key; skipping"
            );
            continue;
        };
        entries.push(BatchEntry::new(key, item_to_document(item)?));
    }

    Ok(Some(entries))
}
