use crate::core::cache::Cache;
use async_trait::async_trait;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::debug;

struct CacheValue<V> {
    value: V,
    expires_at: Option<Instant>,
}

/// In-memory cache with per-entry expiry, shared behind a Mutex.
///
/// Nothing is persisted; the cache lives as long as the process.
pub struct MemoryCache<K, V>
where
    K: Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    inner: Arc<Mutex<HashMap<K, CacheValue<V>>>>,
}

impl<K, V> MemoryCache<K, V>
where
    K: Eq + Hash + Send + Sync,
    V: Clone + Send + Sync,
{
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    #[cfg(test)]
    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.is_empty()
    }
}

impl<K, V> Default for MemoryCache<K, V>
where
    K: Eq + Hash + Send + Sync,
    V: Clone + Send + Sync,
{
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<K, V> Cache<K, V> for MemoryCache<K, V>
where
    K: Eq + Hash + Send + Sync + std::fmt::Debug + 'static,
    V: Clone + Send + Sync + 'static,
{
    async fn get(&self, key: &K) -> Option<V> {
        let mut cache = self.inner.lock().await;
        let expired = match cache.get(key) {
            Some(entry) => entry.expires_at.is_some_and(|expiry| expiry <= Instant::now()),
            None => {
                debug!("Cache MISS for key: {:?}", key);
                return None;
            }
        };

        if expired {
            debug!("Cache entry expired for key: {:?}", key);
            cache.remove(key);
            return None;
        }

        debug!("Cache HIT for key: {:?}", key);
        cache.get(key).map(|entry| entry.value.clone())
    }

    async fn put(&self, key: K, value: V, ttl: Option<Duration>) {
        let expires_at = ttl.map(|duration| Instant::now() + duration);
        let cache_value = CacheValue { value, expires_at };

        let mut cache = self.inner.lock().await;
        debug!("Cache PUT for key: {:?}", key);
        cache.insert(key, cache_value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use tokio::time::sleep;

    const FOREX: &str = "quotes/forex?";

    #[tokio::test]
    async fn test_cache_get_put() {
        let cache = MemoryCache::<String, Value>::new();
        assert!(cache.get(&FOREX.to_string()).await.is_none());

        let quotes = json!([{"symbol": "EURUSD", "changesPercentage": 0.12}]);
        cache.put(FOREX.to_string(), quotes.clone(), None).await;

        assert_eq!(cache.get(&FOREX.to_string()).await, Some(quotes));
        assert!(
            cache
                .get(&"company-screener?limit=50".to_string())
                .await
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_cache_ttl_expiration() {
        let cache = MemoryCache::<String, Value>::new();

        cache
            .put(FOREX.to_string(), json!([]), Some(Duration::from_millis(10)))
            .await;
        assert_eq!(cache.get(&FOREX.to_string()).await, Some(json!([])));

        sleep(Duration::from_millis(20)).await;
        assert!(cache.get(&FOREX.to_string()).await.is_none());
        // expired entries are evicted on read
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_cache_put_overwrites() {
        let cache = MemoryCache::<String, Value>::new();

        cache.put(FOREX.to_string(), json!({"v": 1}), None).await;
        cache
            .put(
                FOREX.to_string(),
                json!({"v": 2}),
                Some(Duration::from_secs(300)),
            )
            .await;

        assert_eq!(cache.get(&FOREX.to_string()).await, Some(json!({"v": 2})));
        assert_eq!(cache.len().await, 1);
    }
}
