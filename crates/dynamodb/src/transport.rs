//! Execution of commands against the backing store.

use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::config::Credentials as SdkCredentials;
use aws_sdk_dynamodb::types::KeysAndAttributes;
use aws_sdk_dynamodb::Client;
use jstor_core::storage::Result;

use crate::commands::{BatchGetCommand, DeleteCommand, GetCommand, PutCommand, ScanCommand};
use crate::config::StorageOptions;
use crate::conversions::Item;
use crate::error::{map_build_error, map_sdk_error};

/// Response of a key scan.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanOutput {
    /// `None` when the response carried no item list at all.
    pub items: Option<Vec<Item>>,
    /// The store stopped before the end of the table.
    pub truncated: bool,
}

/// Response of a batch read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchGetOutput {
    /// Items per table name. `None` when the response had no result map.
    pub responses: Option<HashMap<String, Vec<Item>>>,
    /// Number of keys the store did not process.
    pub unprocessed_keys: usize,
}

/// Executes commands. Retries, timeouts and authentication belong to the
/// implementation.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, command: GetCommand) -> Result<Option<Item>>;

    async fn put(&self, command: PutCommand) -> Result<()>;

    async fn delete(&self, command: DeleteCommand) -> Result<()>;

    async fn scan_keys(&self, command: ScanCommand) -> Result<ScanOutput>;

    async fn batch_get(&self, command: BatchGetCommand) -> Result<BatchGetOutput>;
}

#[async_trait]
impl Transport for Client {
    async fn get(&self, command: GetCommand) -> Result<Option<Item>> {
        let output = self
            .get_item()
            .table_name(command.table_name)
            .set_key(Some(command.key))
            .send()
            .await
            .map_err(|e| map_sdk_error(e, "GetItem"))?;

        Ok(output.item)
    }

    async fn put(&self, command: PutCommand) -> Result<()> {
        self.put_item()
            .table_name(command.table_name)
            .set_item(Some(command.item))
            .send()
            .await
            .map_err(|e| map_sdk_error(e, "PutItem"))?;

        Ok(())
    }

    async fn delete(&self, command: DeleteCommand) -> Result<()> {
        self.delete_item()
            .table_name(command.table_name)
            .set_key(Some(command.key))
            .send()
            .await
            .map_err(|e| map_sdk_error(e, "DeleteItem"))?;

        Ok(())
    }

    async fn scan_keys(&self, command: ScanCommand) -> Result<ScanOutput> {
        let output = self
            .scan()
            .table_name(command.table_name)
            .projection_expression(command.projection_expression)
            .set_expression_attribute_names(command.expression_attribute_names)
            .send()
            .await
            .map_err(|e| map_sdk_error(e, "Scan"))?;

        Ok(ScanOutput {
            truncated: output
                .last_evaluated_key
                .as_ref()
                .is_some_and(|key| !key.is_empty()),
            items: output.items,
        })
    }

    async fn batch_get(&self, command: BatchGetCommand) -> Result<BatchGetOutput> {
        let keys_and_attributes = KeysAndAttributes::builder()
            .set_keys(Some(command.keys))
            .build()
            .map_err(|e| map_build_error(e, "BatchGetItem"))?;

        let output = self
            .batch_get_item()
            .request_items(command.table_name, keys_and_attributes)
            .send()
            .await
            .map_err(|e| map_sdk_error(e, "BatchGetItem"))?;

        let unprocessed_keys = output
            .unprocessed_keys
            .as_ref()
            .map(|tables| tables.values().map(|k| k.keys().len()).sum::<usize>())
            .unwrap_or(0);

        Ok(BatchGetOutput {
            responses: output.responses,
            unprocessed_keys,
        })
    }
}

/// Creates a DynamoDB client from resolved options.
///
/// Without explicit credentials the SDK default provider chain applies.
pub async fn create_client(options: &StorageOptions) -> Client {
    let mut sdk_config_loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(options.region().to_string()));

    if let Some(endpoint) = options.endpoint_url() {
        sdk_config_loader = sdk_config_loader.endpoint_url(endpoint);
    }

    if let Some(credentials) = options.credentials() {
        sdk_config_loader = sdk_config_loader.credentials_provider(SdkCredentials::new(
            credentials.access_key_id.clone(),
            credentials.secret_access_key.clone(),
            credentials.session_token.clone(),
            None,
            "jstor-dynamodb",
        ));
    }

    let sdk_config = sdk_config_loader.load().await;
    Client::new(&sdk_config)
}
