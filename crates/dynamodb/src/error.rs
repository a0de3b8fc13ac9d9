//! DynamoDB error mapping.
//!
//! Maps AWS SDK errors to `StrategyError` from `jstor_core::storage`. The
//! service error code and message are passed through as-is; retries are the
//! SDK's business.

use std::error::Error;
use std::fmt::Debug;

use aws_sdk_dynamodb::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use jstor_core::storage::StrategyError;

/// Map an SDK error from `operation` to a transport error.
pub fn map_sdk_error<E, R>(err: SdkError<E, R>, operation: &'static str) -> StrategyError
where
    E: ProvideErrorMetadata + Error + Send + Sync + 'static,
    R: Debug + Send + Sync + 'static,
{
    let message = match (err.code(), err.message()) {
        (Some(code), Some(message)) => format!("{code}: {message}"),
        (Some(code), None) => code.to_string(),
        _ => DisplayErrorContext(&err).to_string(),
    };
    StrategyError::transport(operation, message)
}

/// Map a request construction error to a transport error.
pub fn map_build_error(err: impl std::fmt::Display, operation: &'static str) -> StrategyError {
    StrategyError::transport(operation, format!("invalid request: {err}"))
}
