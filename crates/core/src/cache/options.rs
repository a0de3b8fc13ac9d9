use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default max-age for cached documents, in seconds.
pub const DEFAULT_DOCUMENT_MAX_AGE: u64 = 60;

/// Default max-age for cached key listings, in seconds.
pub const DEFAULT_KEYS_MAX_AGE: u64 = 15 * 60;

/// Caching rule for one kind of result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachePolicy {
    /// Max-age in seconds.
    pub max_age: u64,
}

impl CachePolicy {
    pub fn new(max_age: u64) -> Self {
        Self { max_age }
    }

    /// Get the max-age as a Duration.
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.max_age)
    }
}

/// Cache policies the front-end applies to strategy results.
///
/// `keys` governs key listings, `files` governs single documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheOptions {
    pub keys: CachePolicy,
    pub files: CachePolicy,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            keys: CachePolicy::new(DEFAULT_KEYS_MAX_AGE),
            files: CachePolicy::new(DEFAULT_DOCUMENT_MAX_AGE),
        }
    }
}

impl CacheOptions {
    /// Applies caller overrides on top of these options, field by field.
    pub fn merged_with(self, overrides: &CacheOverrides) -> Self {
        Self {
            keys: overrides.keys.unwrap_or(self.keys),
            files: overrides.files.unwrap_or(self.files),
        }
    }
}

/// Caller-supplied cache settings. Missing fields keep their defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheOverrides {
    #[serde(default)]
    pub keys: Option<CachePolicy>,
    #[serde(default)]
    pub files: Option<CachePolicy>,
}
