//! Key attribute naming.
//!
//! Attributes starting with `_` collide with DynamoDB's expression syntax,
//! so expressions refer to the key through a `#` placeholder instead.

use std::collections::HashMap;

/// Marker prefix of internal attribute names.
pub const RESERVED_MARKER: char = '_';

/// Prefix DynamoDB uses for expression attribute name placeholders.
pub const PLACEHOLDER_MARKER: char = '#';

/// The logical key attribute and the name used for it inside expressions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyAttribute {
    logical: String,
    translated: String,
}

impl KeyAttribute {
    pub fn new(logical: impl Into<String>) -> Self {
        let logical = logical.into();
        let translated = translate(&logical);
        Self {
            logical,
            translated,
        }
    }

    /// Attribute name under which the key is stored in each item.
    pub fn logical(&self) -> &str {
        &self.logical
    }

    /// Attribute name used in projection and filter expressions.
    pub fn translated(&self) -> &str {
        &self.translated
    }

    pub fn is_aliased(&self) -> bool {
        self.translated != self.logical
    }

    /// Expression attribute names needed by commands that embed the key in
    /// an expression. `None` when no alias is required.
    pub fn expression_alias(&self) -> Option<HashMap<String, String>> {
        self.is_aliased()
            .then(|| HashMap::from([(self.translated.clone(), self.logical.clone())]))
    }
}

/// Replaces a single leading [`RESERVED_MARKER`] with [`PLACEHOLDER_MARKER`].
pub fn translate(logical: &str) -> String {
    match logical.strip_prefix(RESERVED_MARKER) {
        Some(rest) => format!("{PLACEHOLDER_MARKER}{rest}"),
        None => logical.to_string(),
    }
}
