//! Typed cache wrapper around Moka.

use std::hash::Hash;
use std::sync::Arc;

use moka::sync::Cache;
use tokio::time::Instant;

use super::CacheConfig;

/// A value tagged with the instant it was fetched.
///
/// Stored as one cache value so the timestamp and the snapshot are always
/// replaced together.
#[derive(Debug, Clone)]
pub struct Stamped<V> {
    pub value: V,
    pub refreshed_at: Instant,
}

impl<V> Stamped<V> {
    pub fn new(value: V, refreshed_at: Instant) -> Self {
        Self {
            value,
            refreshed_at,
        }
    }

    /// Whether this entry is at least `ttl` old at `now`.
    pub fn is_expired(&self, now: Instant, ttl: std::time::Duration) -> bool {
        now.saturating_duration_since(self.refreshed_at) >= ttl
    }
}

/// A typed cache wrapper that provides a clean API over Moka.
///
/// Cloning is cheap and shares the same underlying cache.
pub struct TypedCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    inner: Arc<Cache<K, V>>,
    name: Arc<str>,
}

// Manual Clone implementation that doesn't require K: Clone, V: Clone
impl<K, V> Clone for TypedCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            name: Arc::clone(&self.name),
        }
    }
}

impl<K, V> TypedCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Create a new typed cache with the given name and config.
    pub fn new(name: impl Into<Arc<str>>, config: &CacheConfig) -> Self {
        Self {
            inner: Arc::new(Cache::builder().max_capacity(config.max_capacity).build()),
            name: name.into(),
        }
    }

    /// Insert a key-value pair into the cache.
    pub fn insert(&self, key: K, value: V) {
        self.inner.insert(key, value);
    }

    /// Get a value from the cache.
    pub fn get(&self, key: &K) -> Option<V> {
        self.inner.get(key)
    }
}

impl<K, V> std::fmt::Debug for TypedCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypedCache")
            .field("name", &self.name)
            .field("entry_count", &self.inner.entry_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_stamped_expiry_boundary() {
        let entry = Stamped::new(1, Instant::now());
        let ttl = Duration::from_secs(10);

        assert!(!entry.is_expired(Instant::now(), ttl));
        tokio::time::advance(Duration::from_secs(9)).await;
        assert!(!entry.is_expired(Instant::now(), ttl));
        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(entry.is_expired(Instant::now(), ttl));
    }

    #[test]
    fn test_insert_replaces_value() {
        let config = CacheConfig::snapshot(Duration::from_secs(1));
        let cache: TypedCache<&'static str, u32> = TypedCache::new("t", &config);
        cache.insert("k", 1);
        cache.insert("k", 2);
        assert_eq!(cache.get(&"k"), Some(2));
    }
}
