//! Configuration resolution.
//!
//! Caller options are merged with environment-derived defaults exactly once,
//! when the strategy is created. Precedence is explicit value, then
//! environment, then fixed default.

use std::env;
use std::fmt;

use jstor_core::cache::{CacheOptions, CacheOverrides};
use jstor_core::storage::{Result, StoreOptions, StrategyError};
use serde::{Deserialize, Serialize};

use crate::keys::KeyAttribute;

/// Region used when neither the caller nor the environment names one.
pub const FALLBACK_REGION: &str = "eu-west-1";

/// Logical key attribute used when the caller does not name one.
pub const DEFAULT_KEY_ATTRIBUTE: &str = "_id";

/// Caller-supplied credentials. Each field may be backfilled from the
/// environment.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialOptions {
    #[serde(default)]
    pub access_key_id: Option<String>,
    #[serde(default)]
    pub secret_access_key: Option<String>,
    #[serde(default)]
    pub session_token: Option<String>,
}

impl fmt::Debug for CredentialOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialOptions")
            .field("access_key_id", &self.access_key_id)
            .field(
                "secret_access_key",
                &self.secret_access_key.as_ref().map(|_| "** redacted **"),
            )
            .field(
                "session_token",
                &self.session_token.as_ref().map(|_| "** redacted **"),
            )
            .finish()
    }
}

/// Options accepted by the strategy factory.
///
/// Deserializes from the camelCase object shape used by store
/// configurations, e.g. `{ "table": "docs", "cacheOptions": { "files": { "maxAge": 1 } } }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyOptions {
    #[serde(default)]
    pub table: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    /// Custom endpoint URL (for local DynamoDB).
    #[serde(default)]
    pub endpoint_url: Option<String>,
    #[serde(default)]
    pub credentials: CredentialOptions,
    #[serde(default)]
    pub key_attribute: Option<String>,
    #[serde(default)]
    pub cache_options: CacheOverrides,
}

impl StrategyOptions {
    /// Creates options for the given table, everything else defaulted.
    pub fn for_table(table: impl Into<String>) -> Self {
        Self {
            table: Some(table.into()),
            ..Self::default()
        }
    }
}

/// Values read from the process environment.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct EnvDefaults {
    pub region: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub session_token: Option<String>,
    pub endpoint_url: Option<String>,
}

impl fmt::Debug for EnvDefaults {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvDefaults")
            .field("region", &self.region)
            .field("access_key_id", &self.access_key_id)
            .field(
                "secret_access_key",
                &self.secret_access_key.as_ref().map(|_| "** redacted **"),
            )
            .field(
                "session_token",
                &self.session_token.as_ref().map(|_| "** redacted **"),
            )
            .field("endpoint_url", &self.endpoint_url)
            .finish()
    }
}

impl EnvDefaults {
    /// Load defaults from environment variables.
    ///
    /// Environment variables:
    /// - `AWS_DEFAULT_REGION` - Region (falls back to `AWS_REGION`)
    /// - `AWS_ACCESS_KEY_ID` - Access key id
    /// - `AWS_SECRET_ACCESS_KEY` - Secret access key
    /// - `AWS_SESSION_TOKEN` - Session token for temporary credentials
    /// - `AWS_ENDPOINT_URL` - Custom endpoint (e.g. local DynamoDB)
    pub fn from_env() -> Self {
        Self {
            region: non_empty_var("AWS_DEFAULT_REGION").or_else(|| non_empty_var("AWS_REGION")),
            access_key_id: non_empty_var("AWS_ACCESS_KEY_ID"),
            secret_access_key: non_empty_var("AWS_SECRET_ACCESS_KEY"),
            session_token: non_empty_var("AWS_SESSION_TOKEN"),
            endpoint_url: non_empty_var("AWS_ENDPOINT_URL"),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}

/// Static credentials handed to the DynamoDB client.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"** redacted **")
            .field(
                "session_token",
                &self.session_token.as_ref().map(|_| "** redacted **"),
            )
            .finish()
    }
}

/// Fully resolved strategy configuration. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageOptions {
    table: String,
    region: String,
    endpoint_url: Option<String>,
    credentials: Option<Credentials>,
    key_attribute: KeyAttribute,
    cache_options: CacheOptions,
}

impl StorageOptions {
    /// Resolves caller options against environment defaults.
    ///
    /// Fails with [`StrategyError::Configuration`] when no table is given.
    /// Missing credentials are not an error here: the client falls back to
    /// the default provider chain and fails on first use if that finds none.
    pub fn resolve(options: StrategyOptions, env: &EnvDefaults) -> Result<Self> {
        let table = options
            .table
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| {
                StrategyError::Configuration(
                    "a table name is required to use the dynamodb strategy".to_string(),
                )
            })?;

        let region = options
            .region
            .filter(|r| !r.is_empty())
            .or_else(|| env.region.clone())
            .unwrap_or_else(|| FALLBACK_REGION.to_string());

        let endpoint_url = options
            .endpoint_url
            .filter(|u| !u.is_empty())
            .or_else(|| env.endpoint_url.clone());

        let credentials = resolve_credentials(options.credentials, env);

        let key_attribute = KeyAttribute::new(
            options
                .key_attribute
                .filter(|k| !k.is_empty())
                .unwrap_or_else(|| DEFAULT_KEY_ATTRIBUTE.to_string()),
        );

        let cache_options = CacheOptions::default().merged_with(&options.cache_options);

        Ok(Self {
            table,
            region,
            endpoint_url,
            credentials,
            key_attribute,
            cache_options,
        })
    }

    /// Resolves caller options against the process environment.
    pub fn from_env(options: StrategyOptions) -> Result<Self> {
        Self::resolve(options, &EnvDefaults::from_env())
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn endpoint_url(&self) -> Option<&str> {
        self.endpoint_url.as_deref()
    }

    /// Explicit credentials, if both halves of the pair were found.
    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    pub fn key_attribute(&self) -> &KeyAttribute {
        &self.key_attribute
    }

    pub fn cache_options(&self) -> CacheOptions {
        self.cache_options
    }

    /// Options pushed into the store front-end on bind.
    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            strategy: "dynamodb",
            cache_options: self.cache_options,
        }
    }
}

fn resolve_credentials(explicit: CredentialOptions, env: &EnvDefaults) -> Option<Credentials> {
    let access_key_id = explicit
        .access_key_id
        .filter(|v| !v.is_empty())
        .or_else(|| env.access_key_id.clone())?;
    let secret_access_key = explicit
        .secret_access_key
        .filter(|v| !v.is_empty())
        .or_else(|| env.secret_access_key.clone())?;
    let session_token = explicit
        .session_token
        .filter(|v| !v.is_empty())
        .or_else(|| env.session_token.clone());

    Some(Credentials {
        access_key_id,
        secret_access_key,
        session_token,
    })
}
