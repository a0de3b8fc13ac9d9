//! Storage contract shared by jstor strategies.
//!
//! A strategy adapts one backing technology to the operations a store
//! front-end needs: point reads, writes and deletes, key enumeration and
//! batch reads. The front-end owns result caching; strategies only
//! contribute cache-policy defaults through [`storage::StoreFrontEnd`].

pub mod cache;
pub mod storage;
