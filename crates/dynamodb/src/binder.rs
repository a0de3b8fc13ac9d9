//! Strategy factory.
//!
//! [`strategy_dynamodb`] resolves the configuration up front, so a missing
//! table fails before any client exists. Binding then hands the merged
//! cache defaults to the front-end and attaches a client.

use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use jstor_core::storage::{Result, StoreFrontEnd, StrategyBinder};
use tracing::info;

use crate::config::{EnvDefaults, StorageOptions, StrategyOptions};
use crate::strategy::DynamoDbStrategy;
use crate::transport::{create_client, Transport};

/// Creates a binder, reading environment defaults once.
pub fn strategy_dynamodb(options: StrategyOptions) -> Result<DynamoDbBinder> {
    DynamoDbBinder::with_env(options, &EnvDefaults::from_env())
}

/// A resolved, not yet bound, DynamoDB strategy.
#[derive(Debug, Clone)]
pub struct DynamoDbBinder {
    options: StorageOptions,
}

impl DynamoDbBinder {
    pub fn new(options: StorageOptions) -> Self {
        Self { options }
    }

    /// Resolves `options` against explicit environment defaults.
    pub fn with_env(options: StrategyOptions, env: &EnvDefaults) -> Result<Self> {
        Ok(Self::new(StorageOptions::resolve(options, env)?))
    }

    pub fn options(&self) -> &StorageOptions {
        &self.options
    }

    /// Binds to `store` using a caller-supplied transport.
    pub fn bind_with_transport<T: Transport>(
        self,
        store: &mut dyn StoreFrontEnd,
        transport: T,
    ) -> DynamoDbStrategy<T> {
        store.set_options(self.options.store_options());
        DynamoDbStrategy::new(self.options, transport)
    }
}

#[async_trait]
impl StrategyBinder for DynamoDbBinder {
    type Strategy = DynamoDbStrategy<Client>;

    async fn bind(self, store: &mut dyn StoreFrontEnd) -> Result<Self::Strategy> {
        let client = create_client(&self.options).await;
        info!(
            table = self.options.table(),
            region = self.options.region(),
            endpoint = self.options.endpoint_url(),
            explicit_credentials = self.options.credentials().is_some(),
            "dynamodb client attached"
        );
        Ok(self.bind_with_transport(store, client))
    }
}

#[cfg(test)]
mod tests {
    use jstor_core::cache::{CacheOverrides, CachePolicy, DEFAULT_KEYS_MAX_AGE};
    use jstor_core::storage::{StorageStrategy, StoreOptions, StrategyError};
    use serde_json::json;

    use super::*;
    use crate::inmemory::InMemoryTransport;

    /// Front-end double that records the options it receives.
    #[derive(Debug, Default)]
    struct RecordingStore {
        options: Option<StoreOptions>,
    }

    impl StoreFrontEnd for RecordingStore {
        fn set_options(&mut self, options: StoreOptions) {
            self.options = Some(options);
        }
    }

    #[test]
    fn test_missing_table_fails_without_a_client() {
        let options: StrategyOptions =
            serde_json::from_str(r#"{ "region": "eu-west-1" }"#).unwrap();

        let result = DynamoDbBinder::with_env(options, &EnvDefaults::default());

        assert!(matches!(result, Err(StrategyError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_bind_pushes_merged_cache_options() {
        let options = StrategyOptions {
            cache_options: CacheOverrides {
                keys: None,
                files: Some(CachePolicy::new(1)),
            },
            ..StrategyOptions::for_table("docs")
        };
        let binder = DynamoDbBinder::with_env(options, &EnvDefaults::default()).unwrap();
        let mut store = RecordingStore::default();

        let strategy =
            binder.bind_with_transport(&mut store, InMemoryTransport::new("docs", "_id"));

        let pushed = store.options.unwrap();
        assert_eq!(pushed.strategy, "dynamodb");
        assert_eq!(pushed.cache_options.files.max_age, 1);
        assert_eq!(pushed.cache_options.keys.max_age, DEFAULT_KEYS_MAX_AGE);
        assert_eq!(strategy.options().table(), "docs");
    }

    #[tokio::test]
    async fn test_bound_strategy_serves_operations() {
        let binder =
            DynamoDbBinder::with_env(StrategyOptions::for_table("docs"), &EnvDefaults::default())
                .unwrap();
        let mut store = RecordingStore::default();
        let strategy =
            binder.bind_with_transport(&mut store, InMemoryTransport::new("docs", "_id"));

        let document = match json!({ "title": "Notes" }) {
            serde_json::Value::Object(map) => map,
            _ => unreachable!(),
        };
        strategy.save("doc-1", &document).await.unwrap();

        assert_eq!(strategy.keys().await.unwrap(), vec!["doc-1".to_string()]);
    }

    #[tokio::test]
    async fn test_bind_attaches_sdk_client() {
        let env = EnvDefaults {
            access_key_id: Some("AKIDEXAMPLE".to_string()),
            secret_access_key: Some("secret".to_string()),
            endpoint_url: Some("http://localhost:8000".to_string()),
            ..EnvDefaults::default()
        };
        let binder = DynamoDbBinder::with_env(StrategyOptions::for_table("docs"), &env).unwrap();
        let mut store = RecordingStore::default();

        let strategy = binder.bind(&mut store).await.unwrap();

        assert!(store.options.is_some());
        assert_eq!(
            strategy.transport().config().region().map(|r| r.as_ref()),
            Some("eu-west-1")
        );
    }
}
