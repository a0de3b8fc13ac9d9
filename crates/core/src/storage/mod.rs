mod error;
mod traits;
mod types;

pub use error::{Result, StrategyError};
pub use traits::{StorageStrategy, StoreFrontEnd, StoreOptions, StrategyBinder};
pub use types::{BatchEntry, Document, KeyValue};
