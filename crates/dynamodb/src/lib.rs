//! DynamoDB storage strategy for jstor.
//!
//! Lets a jstor store front-end keep its documents in a DynamoDB table. Each
//! document is one item; the store key lives in a configurable attribute
//! (`_id` by default).
//!
//! # Example
//!
//! ```rust,ignore
//! use jstor_core::storage::{StorageStrategy, StrategyBinder};
//! use jstor_dynamodb::{strategy_dynamodb, StrategyOptions};
//!
//! let binder = strategy_dynamodb(StrategyOptions::for_table("jstor-dynamodb-test"))?;
//! let strategy = binder.bind(&mut store).await?;
//! let keys = strategy.keys().await?;
//! ```
//!
//! # Feature Flags
//!
//! - `inmemory`: exposes [`inmemory::InMemoryTransport`], a single-table
//!   stand-in for DynamoDB used in tests.

mod batch;
mod binder;
mod commands;
mod config;
mod conversions;
mod error;
mod keys;
mod strategy;
mod transport;

#[cfg(any(test, feature = "inmemory"))]
pub mod inmemory;

pub use binder::{strategy_dynamodb, DynamoDbBinder};
pub use commands::{
    BatchGetCommand, CommandBuilder, DeleteCommand, GetCommand, PutCommand, ScanCommand,
};
pub use config::{
    CredentialOptions, Credentials, EnvDefaults, StorageOptions, StrategyOptions,
    DEFAULT_KEY_ATTRIBUTE, FALLBACK_REGION,
};
pub use conversions::Item;
pub use keys::KeyAttribute;
pub use strategy::DynamoDbStrategy;
pub use transport::{create_client, BatchGetOutput, ScanOutput, Transport};
