//! DynamoDB attribute conversion functions.
//!
//! Pure functions for converting between DynamoDB items and documents.
//! These are testable in isolation without DynamoDB access.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use jstor_core::storage::{Document, KeyValue, Result, StrategyError};

/// A DynamoDB item: attribute name to attribute value.
pub type Item = HashMap<String, AttributeValue>;

/// Builds the key map addressing `key` through `attribute`.
pub fn key_item(attribute: &str, key: &str) -> Item {
    HashMap::from([(attribute.to_string(), AttributeValue::S(key.to_string()))])
}

/// Marshals a document and sets `attribute` to `key` on the result.
///
/// Any value the document holds under `attribute` is replaced.
pub fn document_to_item(document: &Document, attribute: &str, key: &str) -> Result<Item> {
    let mut item: Item = serde_dynamo::to_item(document)
        .map_err(|e| StrategyError::Serialization(e.to_string()))?;
    item.insert(attribute.to_string(), AttributeValue::S(key.to_string()));
    Ok(item)
}

/// Unmarshals an item into a document.
pub fn item_to_document(item: Item) -> Result<Document> {
    serde_dynamo::from_item(item).map_err(|e| StrategyError::Serialization(e.to_string()))
}

/// Reads the key stored under `attribute`.
///
/// String and number keys are accepted; anything else yields `None`.
pub fn key_value(item: &Item, attribute: &str) -> Option<KeyValue> {
    match item.get(attribute)? {
        AttributeValue::S(value) => Some(value.clone()),
        AttributeValue::N(value) => Some(value.clone()),
        _ => None,
    }
}
