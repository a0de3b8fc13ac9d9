use async_trait::async_trait;

use crate::cache::CacheOptions;

use super::{BatchEntry, Document, KeyValue, Result};

/// Operations a backing technology must provide to a store front-end.
///
/// Calls are independent of each other; implementations hold no
/// per-operation locks and give no ordering guarantee between concurrent
/// calls on the same key.
#[async_trait]
pub trait StorageStrategy: Send + Sync {
    /// Gets the document stored under `key`, or `None` if there is none.
    async fn get(&self, key: &str) -> Result<Option<Document>>;

    /// Stores `document` under `key`, replacing any previous document.
    ///
    /// The stored copy carries `key` in the key attribute; the caller's
    /// document is left untouched.
    async fn save(&self, key: &str, document: &Document) -> Result<()>;

    /// Removes the document under `key`. Removing a missing key succeeds.
    async fn remove(&self, key: &str) -> Result<()>;

    /// Lists every stored key. Order is unspecified.
    async fn keys(&self) -> Result<Vec<KeyValue>>;

    /// Reads several documents in one round trip.
    ///
    /// Keys without a document are omitted from the result. `None` means the
    /// backing store answered with an unexpected shape.
    async fn batch(&self, keys: &[KeyValue]) -> Result<Option<Vec<BatchEntry>>>;
}

/// Options a strategy pushes into the front-end when it is bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOptions {
    /// Name of the strategy, for diagnostics.
    pub strategy: &'static str,
    pub cache_options: CacheOptions,
}

/// The store front-end, as seen by a strategy.
///
/// The front-end owns caching and TTL enforcement using the received
/// [`CacheOptions`].
pub trait StoreFrontEnd: Send {
    fn set_options(&mut self, options: StoreOptions);
}

/// Attaches a strategy to a front-end.
#[async_trait]
pub trait StrategyBinder: Send {
    type Strategy: StorageStrategy;

    /// Pushes the strategy's options into `store` and returns the ready
    /// strategy.
    async fn bind(self, store: &mut dyn StoreFrontEnd) -> Result<Self::Strategy>;
}
