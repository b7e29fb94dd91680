//! Cache configuration.

use std::time::Duration;

/// Default refresh window for cached views.
pub const DEFAULT_TTL: Duration = Duration::from_secs(60);

/// Configuration for a cache instance.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of entries in the cache.
    pub max_capacity: u64,

    /// Maximum age of an entry before it must be refreshed.
    ///
    /// Entries are not evicted when they go stale; the owner of the cache
    /// decides when to refresh so a failed refresh can keep serving the
    /// old value.
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 16,
            ttl: DEFAULT_TTL,
        }
    }
}

impl CacheConfig {
    /// Config for a view holding one snapshot under a fixed key.
    pub fn snapshot(ttl: Duration) -> Self {
        Self::default().ttl(ttl)
    }

    /// Set time-to-live for cache entries.
    #[must_use]
    pub fn ttl(mut self, duration: Duration) -> Self {
        self.ttl = duration;
        self
    }
}
