//! DynamoDB strategy implementation.
//!
//! Implements `StorageStrategy` from `jstor_core::storage` on top of any
//! [`Transport`].

use async_trait::async_trait;
use jstor_core::storage::{
    BatchEntry, Document, KeyValue, Result, StorageStrategy, StrategyError,
};
use tracing::{debug, warn};

use crate::batch;
use crate::commands::CommandBuilder;
use crate::config::StorageOptions;
use crate::conversions::{item_to_document, key_value};
use crate::transport::Transport;

/// DynamoDB-backed storage strategy.
///
/// Holds no mutable state: the transport is shared read-only by every
/// operation.
#[derive(Debug, Clone)]
pub struct DynamoDbStrategy<T> {
    options: StorageOptions,
    commands: CommandBuilder,
    transport: T,
}

impl<T: Transport> DynamoDbStrategy<T> {
    pub fn new(options: StorageOptions, transport: T) -> Self {
        let commands = CommandBuilder::from_options(&options);
        Self {
            options,
            commands,
            transport,
        }
    }

    pub fn options(&self) -> &StorageOptions {
        &self.options
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}

#[async_trait]
impl<T: Transport> StorageStrategy for DynamoDbStrategy<T> {
    async fn get(&self, key: &str) -> Result<Option<Document>> {
        debug!(table = self.commands.table_name(), key, "get");
        let item = self.transport.get(self.commands.get(key)).await?;
        item.map(item_to_document).transpose()
    }

    async fn save(&self, key: &str, document: &Document) -> Result<()> {
        debug!(table = self.commands.table_name(), key, "save");
        let command = self.commands.put(key, document)?;
        self.transport.put(command).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        debug!(table = self.commands.table_name(), key, "remove");
        self.transport.delete(self.commands.delete(key)).await
    }

    async fn keys(&self) -> Result<Vec<KeyValue>> {
        debug!(table = self.commands.table_name(), "keys");
        let output = self.transport.scan_keys(self.commands.scan_keys()).await?;

        let items = output.items.ok_or_else(|| {
            StrategyError::Enumeration("scan response has no item list".to_string())
        })?;

        if output.truncated {
            warn!(
                table = self.commands.table_name(),
                returned = items.len(),
                "key scan stopped before the end of the table; only the first page is returned"
            );
        }

        let attribute = self.commands.key_attribute().logical();
        items
            .iter()
            .map(|item| {
                key_value(item, attribute).ok_or_else(|| {
                    StrategyError::Enumeration(format!(
                        "scanned item has no usable `{attribute}` attribute"
                    ))
                })
            })
            .collect()
    }

    async fn batch(&self, keys: &[KeyValue]) -> Result<Option<Vec<BatchEntry>>> {
        batch::batch_get(&self.transport, &self.commands, keys).await
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use serde_json::json;

    use super::*;
    use crate::config::{EnvDefaults, StrategyOptions};
    use crate::inmemory::{Faults, InMemoryTransport, MAX_BATCH_GET_KEYS};

    fn document(value: serde_json::Value) -> Document {
        match value {
            serde_json::Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    fn strategy_with_key(key_attribute: &str) -> DynamoDbStrategy<InMemoryTransport> {
        let options = StrategyOptions {
            key_attribute: Some(key_attribute.to_string()),
            ..StrategyOptions::for_table("docs")
        };
        let options = StorageOptions::resolve(options, &EnvDefaults::default()).unwrap();
        DynamoDbStrategy::new(options, InMemoryTransport::new("docs", key_attribute))
    }

    fn strategy() -> DynamoDbStrategy<InMemoryTransport> {
        strategy_with_key("_id")
    }

    #[tokio::test]
    async fn test_save_and_get_round_trip() {
        let strategy = strategy();
        let doc = document(json!({ "title": "Notes", "pages": 3, "tags": ["a", "b"] }));

        strategy.save("doc-1", &doc).await.unwrap();

        let stored = strategy.get("doc-1").await.unwrap().unwrap();
        let mut expected = doc.clone();
        expected.insert("_id".to_string(), json!("doc-1"));
        assert_eq!(stored, expected);
    }

    #[tokio::test]
    async fn test_save_overwrites_key_attribute_in_document() {
        let strategy = strategy();
        let doc = document(json!({ "_id": "something-else", "title": "Notes" }));

        strategy.save("doc-1", &doc).await.unwrap();

        let stored = strategy.get("doc-1").await.unwrap().unwrap();
        assert_eq!(stored.get("_id"), Some(&json!("doc-1")));
        assert!(strategy.get("something-else").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_replaces_previous_document() {
        let strategy = strategy();
        strategy
            .save("doc-1", &document(json!({ "title": "Old", "draft": true })))
            .await
            .unwrap();

        strategy
            .save("doc-1", &document(json!({ "title": "New" })))
            .await
            .unwrap();

        let stored = strategy.get("doc-1").await.unwrap().unwrap();
        assert_eq!(stored, document(json!({ "_id": "doc-1", "title": "New" })));
    }

    #[tokio::test]
    async fn test_get_nonexistent() {
        let result = strategy().get("never-saved").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let strategy = strategy();
        strategy
            .save("doc-1", &document(json!({ "title": "Notes" })))
            .await
            .unwrap();

        strategy.remove("doc-1").await.unwrap();
        strategy.remove("doc-1").await.unwrap();

        assert!(strategy.get("doc-1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_keys_lists_every_saved_key() {
        let strategy = strategy();
        for key in ["a", "b", "c"] {
            strategy
                .save(key, &document(json!({ "value": key })))
                .await
                .unwrap();
        }

        let keys: HashSet<KeyValue> = strategy.keys().await.unwrap().into_iter().collect();

        assert_eq!(
            keys,
            HashSet::from(["a".to_string(), "b".to_string(), "c".to_string()])
        );
    }

    #[tokio::test]
    async fn test_keys_with_plain_key_attribute() {
        let strategy = strategy_with_key("sku");
        strategy
            .save("sku-1", &document(json!({ "price": 10 })))
            .await
            .unwrap();

        assert_eq!(strategy.keys().await.unwrap(), vec!["sku-1".to_string()]);
    }

    #[tokio::test]
    async fn test_keys_on_empty_table() {
        assert!(strategy().keys().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_keys_malformed_response_is_enumeration_error() {
        let strategy = strategy();
        strategy
            .transport()
            .set_faults(Faults {
                malformed_responses: true,
                ..Faults::default()
            })
            .await;

        let result = strategy.keys().await;
        assert!(matches!(result, Err(StrategyError::Enumeration(_))));
    }

    #[tokio::test]
    async fn test_keys_truncated_scan_returns_first_page() {
        let strategy = strategy();
        strategy
            .save("a", &document(json!({})))
            .await
            .unwrap();
        strategy
            .transport()
            .set_faults(Faults {
                truncated_scans: true,
                ..Faults::default()
            })
            .await;

        assert_eq!(strategy.keys().await.unwrap(), vec!["a".to_string()]);
    }

    #[tokio::test]
    async fn test_batch_omits_missing_keys() {
        let strategy = strategy();
        strategy
            .save("k1", &document(json!({ "n": 1 })))
            .await
            .unwrap();
        strategy
            .save("k3", &document(json!({ "n": 3 })))
            .await
            .unwrap();

        let keys = vec!["k1".to_string(), "k2".to_string(), "k3".to_string()];
        let mut entries = strategy.batch(&keys).await.unwrap().unwrap();
        entries.sort_by(|a, b| a.key.cmp(&b.key));

        assert_eq!(
            entries,
            vec![
                BatchEntry::new("k1", document(json!({ "_id": "k1", "n": 1 }))),
                BatchEntry::new("k3", document(json!({ "_id": "k3", "n": 3 }))),
            ]
        );
    }

    #[tokio::test]
    async fn test_batch_uses_single_request() {
        let strategy = strategy();
        let keys: Vec<KeyValue> = (0..10).map(|i| format!("k{i}")).collect();

        strategy.batch(&keys).await.unwrap();

        assert_eq!(strategy.transport().request_count(), 1);
    }

    #[tokio::test]
    async fn test_batch_collapses_duplicate_keys() {
        let strategy = strategy();
        strategy
            .save("k1", &document(json!({})))
            .await
            .unwrap();

        let keys = vec!["k1".to_string(), "k1".to_string()];
        let entries = strategy.batch(&keys).await.unwrap().unwrap();

        assert_eq!(entries.len(), 1);
    }

    #[tokio::test]
    async fn test_batch_empty_input_makes_no_request() {
        let strategy = strategy();

        let entries = strategy.batch(&[]).await.unwrap();

        assert_eq!(entries, Some(vec![]));
        assert_eq!(strategy.transport().request_count(), 0);
    }

    #[tokio::test]
    async fn test_batch_over_limit_is_transport_error() {
        let strategy = strategy();
        let keys: Vec<KeyValue> = (0..=MAX_BATCH_GET_KEYS).map(|i| format!("k{i}")).collect();

        let result = strategy.batch(&keys).await;

        assert!(matches!(
            result,
            Err(StrategyError::Transport {
                operation: "BatchGetItem",
                ..
            })
        ));
        assert_eq!(strategy.transport().request_count(), 1);
    }

    #[tokio::test]
    async fn test_batch_malformed_response_is_absent() {
        let strategy = strategy();
        strategy
            .transport()
            .set_faults(Faults {
                malformed_responses: true,
                ..Faults::default()
            })
            .await;

        let result = strategy.batch(&["k1".to_string()]).await.unwrap();
        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn test_transport_failures_propagate() {
        let strategy = strategy();
        strategy
            .transport()
            .set_faults(Faults {
                unavailable: true,
                ..Faults::default()
            })
            .await;

        assert!(matches!(
            strategy.get("a").await,
            Err(StrategyError::Transport { operation: "GetItem", .. })
        ));
        assert!(matches!(
            strategy.save("a", &document(json!({}))).await,
            Err(StrategyError::Transport { operation: "PutItem", .. })
        ));
        assert!(matches!(
            strategy.remove("a").await,
            Err(StrategyError::Transport { operation: "DeleteItem", .. })
        ));
        assert!(matches!(
            strategy.keys().await,
            Err(StrategyError::Transport { operation: "Scan", .. })
        ));
    }
}
