mod options;

pub use options::{
    CacheOptions, CacheOverrides, CachePolicy, DEFAULT_DOCUMENT_MAX_AGE, DEFAULT_KEYS_MAX_AGE,
};
