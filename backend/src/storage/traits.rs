//! # Storage Traits
//!
//! The key-value abstraction the record store is written against.

use async_trait::async_trait;

use crate::error::AppResult;

/// A durable string-to-string map, in the spirit of browser local storage
#[async_trait]
pub trait KeyValueStorage: Send + Sync {
    /// Read the value stored under `key`
    async fn get_item(&self, key: &str) -> AppResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    /// Fails with `StorageFull` when the write would exceed the quota.
    async fn set_item(&self, key: &str, value: &str) -> AppResult<()>;

    /// Remove `key`. Returns true if something was removed.
    async fn remove_item(&self, key: &str) -> AppResult<bool>;

    /// All stored keys in alphabetical order
    async fn list_keys(&self) -> AppResult<Vec<String>>;
}
