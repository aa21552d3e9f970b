use async_trait::async_trait;
use std::time::Duration;

/// Key-value cache with optional per-entry expiry.
#[async_trait]
pub trait Cache<K, V>: Send + Sync {
    /// Returns the value for `key` unless it is missing or expired.
    async fn get(&self, key: &K) -> Option<V>;

    /// Stores `value`, expiring after `ttl` when given.
    async fn put(&self, key: K, value: V, ttl: Option<Duration>);
}
