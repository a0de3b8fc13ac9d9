//! Request payloads for each logical operation.
//!
//! Point reads, writes and deletes address the key directly in a key map and
//! never need an expression alias. Only the key scan embeds the key
//! attribute in an expression.

use std::collections::HashMap;

use jstor_core::storage::{Document, KeyValue, Result};

use crate::config::StorageOptions;
use crate::conversions::{document_to_item, key_item, Item};
use crate::keys::KeyAttribute;

/// GetItem request.
#[derive(Debug, Clone, PartialEq)]
pub struct GetCommand {
    pub table_name: String,
    pub key: Item,
}

/// PutItem request. Unconditional.
#[derive(Debug, Clone, PartialEq)]
pub struct PutCommand {
    pub table_name: String,
    pub item: Item,
}

/// DeleteItem request. Unconditional.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteCommand {
    pub table_name: String,
    pub key: Item,
}

/// Scan request projected to the key attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanCommand {
    pub table_name: String,
    pub projection_expression: String,
    pub expression_attribute_names: Option<HashMap<String, String>>,
}

/// BatchGetItem request against a single table.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchGetCommand {
    pub table_name: String,
    pub keys: Vec<Item>,
}

/// Builds commands for one table and key attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandBuilder {
    table_name: String,
    key_attribute: KeyAttribute,
}

impl CommandBuilder {
    pub fn new(table_name: impl Into<String>, key_attribute: KeyAttribute) -> Self {
        Self {
            table_name: table_name.into(),
            key_attribute,
        }
    }

    pub fn from_options(options: &StorageOptions) -> Self {
        Self::new(options.table(), options.key_attribute().clone())
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn key_attribute(&self) -> &KeyAttribute {
        &self.key_attribute
    }

    pub fn get(&self, key: &str) -> GetCommand {
        GetCommand {
            table_name: self.table_name.clone(),
            key: key_item(self.key_attribute.logical(), key),
        }
    }

    /// Marshals `document` with `key` injected under the key attribute.
    pub fn put(&self, key: &str, document: &Document) -> Result<PutCommand> {
        Ok(PutCommand {
            table_name: self.table_name.clone(),
            item: document_to_item(document, self.key_attribute.logical(), key)?,
        })
    }

    pub fn delete(&self, key: &str) -> DeleteCommand {
        DeleteCommand {
            table_name: self.table_name.clone(),
            key: key_item(self.key_attribute.logical(), key),
        }
    }

    pub fn scan_keys(&self) -> ScanCommand {
        ScanCommand {
            table_name: self.table_name.clone(),
            projection_expression: self.key_attribute.translated().to_string(),
            expression_attribute_names: self.key_attribute.expression_alias(),
        }
    }

    /// One request for every key, in the given order. No chunking.
    pub fn batch_get(&self, keys: &[KeyValue]) -> BatchGetCommand {
        BatchGetCommand {
            table_name: self.table_name.clone(),
            keys: keys
                .iter()
                .map(|key| key_item(self.key_attribute.logical(), key))
                .collect(),
        }
    }
}
