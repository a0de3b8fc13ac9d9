//! In-memory transport for testing.
//!
//! Stores items for a single table in a `HashMap` wrapped in
//! `Arc<RwLock<_>>` and mimics the DynamoDB validation rules the strategy
//! depends on: expression attribute names must be used and resolvable,
//! names that need a placeholder are rejected, batch reads are limited to
//! [`MAX_BATCH_GET_KEYS`] unique keys.
//!
//! # Example
//!
//! ```rust,ignore
//! use jstor_dynamodb::inmemory::InMemoryTransport;
//!
//! let transport = InMemoryTransport::new("docs", "_id");
//! // Bind a strategy with `bind_with_transport(&mut store, transport.clone())`...
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use jstor_core::storage::{Result, StrategyError};
use tokio::sync::RwLock;

use crate::commands::{BatchGetCommand, DeleteCommand, GetCommand, PutCommand, ScanCommand};
use crate::conversions::Item;
use crate::transport::{BatchGetOutput, ScanOutput, Transport};

/// Largest number of keys DynamoDB accepts in one BatchGetItem call.
pub const MAX_BATCH_GET_KEYS: usize = 100;

/// Failure modes that can be switched on for a test.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Faults {
    /// Every request fails as if the service were unreachable.
    pub unavailable: bool,
    /// Scans answer without an item list and batch reads without a result map.
    pub malformed_responses: bool,
    /// Scans report that more pages are available.
    pub truncated_scans: bool,
}

/// In-memory stand-in for one DynamoDB table.
#[derive(Debug, Clone)]
pub struct InMemoryTransport {
    table_name: String,
    key_attribute: String,
    items: Arc<RwLock<HashMap<String, Item>>>,
    faults: Arc<RwLock<Faults>>,
    requests: Arc<AtomicUsize>,
}

impl InMemoryTransport {
    /// Creates an empty table whose partition key is `key_attribute`.
    pub fn new(table_name: impl Into<String>, key_attribute: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            key_attribute: key_attribute.into(),
            items: Arc::new(RwLock::new(HashMap::new())),
            faults: Arc::new(RwLock::new(Faults::default())),
            requests: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub async fn set_faults(&self, faults: Faults) {
        *self.faults.write().await = faults;
    }

    /// Number of requests received so far, including failed ones.
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Raw copy of the stored item under `key`.
    pub async fn item(&self, key: &str) -> Option<Item> {
        self.items.read().await.get(key).cloned()
    }

    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }

    async fn begin(&self, operation: &'static str, table_name: &str) -> Result<Faults> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let faults = *self.faults.read().await;
        if faults.unavailable {
            return Err(StrategyError::transport(
                operation,
                "ServiceUnavailable: the service is currently unavailable",
            ));
        }
        if table_name != self.table_name {
            return Err(StrategyError::transport(
                operation,
                "ResourceNotFoundException: Requested resource not found",
            ));
        }
        Ok(faults)
    }

    fn key_of(&self, operation: &'static str, key: &Item) -> Result<String> {
        match key.get(&self.key_attribute) {
            Some(AttributeValue::S(value)) if key.len() == 1 => Ok(value.clone()),
            _ => Err(validation(
                operation,
                "The provided key element does not match the schema",
            )),
        }
    }

    fn projected_attribute(&self, command: &ScanCommand) -> Result<String> {
        let expression = command.projection_expression.trim();
        let names = command.expression_attribute_names.clone().unwrap_or_default();

        let attribute = if expression.starts_with('#') {
            names.get(expression).cloned().ok_or_else(|| {
                validation(
                    "Scan",
                    format!("An expression attribute name used in the document path is not defined; attribute name: {expression}"),
                )
            })?
        } else if is_plain_name(expression) {
            expression.to_string()
        } else {
            return Err(validation(
                "Scan",
                format!("Invalid ProjectionExpression: Syntax error; token: \"{expression}\""),
            ));
        };

        let unused: Vec<&String> = names.keys().filter(|name| *name != expression).collect();
        if !unused.is_empty() {
            return Err(validation(
                "Scan",
                format!("Value provided in ExpressionAttributeNames unused in expressions: keys: {unused:?}"),
            ));
        }

        Ok(attribute)
    }
}

fn validation(operation: &'static str, message: impl std::fmt::Display) -> StrategyError {
    StrategyError::transport(operation, format!("ValidationException: {message}"))
}

fn is_plain_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric())
}

#[async_trait]
impl Transport for InMemoryTransport {
    async fn get(&self, command: GetCommand) -> Result<Option<Item>> {
        self.begin("GetItem", &command.table_name).await?;
        let key = self.key_of("GetItem", &command.key)?;
        Ok(self.items.read().await.get(&key).cloned())
    }

    async fn put(&self, command: PutCommand) -> Result<()> {
        self.begin("PutItem", &command.table_name).await?;
        let key = match command.item.get(&self.key_attribute) {
            Some(AttributeValue::S(value)) => value.clone(),
            _ => {
                return Err(validation(
                    "PutItem",
                    format!("Missing the key {} in the item", self.key_attribute),
                ))
            }
        };
        self.items.write().await.insert(key, command.item);
        Ok(())
    }

    async fn delete(&self, command: DeleteCommand) -> Result<()> {
        self.begin("DeleteItem", &command.table_name).await?;
        let key = self.key_of("DeleteItem", &command.key)?;
        self.items.write().await.remove(&key);
        Ok(())
    }

    async fn scan_keys(&self, command: ScanCommand) -> Result<ScanOutput> {
        let faults = self.begin("Scan", &command.table_name).await?;
        let attribute = self.projected_attribute(&command)?;

        if faults.malformed_responses {
            return Ok(ScanOutput {
                items: None,
                truncated: false,
            });
        }

        let items = self
            .items
            .read()
            .await
            .values()
            .filter_map(|item| {
                item.get(&attribute)
                    .map(|value| HashMap::from([(attribute.clone(), value.clone())]))
            })
            .collect();

        Ok(ScanOutput {
            items: Some(items),
            truncated: faults.truncated_scans,
        })
    }

    async fn batch_get(&self, command: BatchGetCommand) -> Result<BatchGetOutput> {
        let faults = self.begin("BatchGetItem", &command.table_name).await?;

        if command.keys.is_empty() {
            return Err(validation(
                "BatchGetItem",
                "1 validation error detected: Keys must have length greater than or equal to 1",
            ));
        }
        if command.keys.len() > MAX_BATCH_GET_KEYS {
            return Err(validation(
                "BatchGetItem",
                "Too many items requested for the BatchGetItem call",
            ));
        }

        let mut seen = HashSet::new();
        let mut found = Vec::new();
        let items = self.items.read().await;
        for key in &command.keys {
            let key = self.key_of("BatchGetItem", key)?;
            if !seen.insert(key.clone()) {
                return Err(validation(
                    "BatchGetItem",
                    "Provided list of item keys contains duplicates",
                ));
            }
            if let Some(item) = items.get(&key) {
                found.push(item.clone());
            }
        }

        if faults.malformed_responses {
            return Ok(BatchGetOutput::default());
        }

        Ok(BatchGetOutput {
            responses: Some(HashMap::from([(command.table_name, found)])),
            unprocessed_keys: 0,
        })
    }
}
