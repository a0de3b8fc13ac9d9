use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A stored record: an open mapping from attribute name to value.
pub type Document = Map<String, Value>;

/// Identifier the front-end uses to address a document.
pub type KeyValue = String;

/// One member of a batch read result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchEntry {
    pub key: KeyValue,
    pub document: Document,
}

impl BatchEntry {
    pub fn new(key: impl Into<KeyValue>, document: Document) -> Self {
        Self {
            key: key.into(),
            document,
        }
    }
}
