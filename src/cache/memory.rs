//! In-process cache on moka with per-entry TTLs.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use glob::Pattern;
use moka::sync::Cache;
use tracing::debug;

use super::error::CacheError;
use super::CacheStore;

#[derive(Clone)]
struct StoredValue {
    data: Arc<Vec<u8>>,
    expires_at: Option<Instant>,
}

impl StoredValue {
    fn is_expired(&self, now: Instant) -> bool {
        matches!(self.expires_at, Some(deadline) if deadline <= now)
    }
}

/// In-memory [`CacheStore`] with LRU eviction and lazy TTL expiry.
///
/// Expired entries are dropped on read; eviction pressure comes from moka's
/// capacity bound.
pub struct MemoryCache {
    entries: Cache<String, StoredValue>,
}

impl std::fmt::Debug for MemoryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryCache")
            .field("entries", &self.entries.entry_count())
            .finish()
    }
}

impl MemoryCache {
    const DEFAULT_CAPACITY: u64 = 50_000;

    /// Creates a cache with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Creates a cache bounded to `capacity` entries.
    pub fn with_capacity(capacity: u64) -> Self {
        Self {
            entries: Cache::builder().max_capacity(capacity).build(),
        }
    }

    /// Returns the number of resident entries (including not-yet-reaped
    /// expired ones).
    pub fn len(&self) -> u64 {
        // moka buffers writes; flush so the count reflects recent inserts.
        self.entries.run_pending_tasks();
        self.entries.entry_count()
    }

    /// Returns `true` when no entries are resident.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        match self.entries.get(key) {
            Some(stored) if stored.is_expired(Instant::now()) => {
                self.entries.invalidate(key);
                Ok(None)
            }
            Some(stored) => Ok(Some(stored.data.as_ref().clone())),
            None => Ok(None),
        }
    }

    async fn set(
        &self,
        key: &str,
        value: Vec<u8>,
        ttl: Option<Duration>,
    ) -> Result<(), CacheError> {
        let stored = StoredValue {
            data: Arc::new(value),
            expires_at: ttl.map(|ttl| Instant::now() + ttl),
        };
        self.entries.insert(key.to_owned(), stored);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.entries.invalidate(key);
        Ok(())
    }

    async fn delete_by_pattern(&self, pattern: &str) -> Result<u64, CacheError> {
        let matcher = Pattern::new(pattern).map_err(|source| CacheError::InvalidPattern {
            pattern: pattern.to_owned(),
            source,
        })?;

        // moka buffers writes; flush so iteration sees recent inserts.
        self.entries.run_pending_tasks();

        let matching: Vec<String> = self
            .entries
            .iter()
            .filter(|(key, _)| matcher.matches(key))
            .map(|(key, _)| key.as_ref().clone())
            .collect();

        let removed = matching.len() as u64;
        for key in matching {
            self.entries.invalidate(&key);
        }

        debug!(pattern, removed, "Invalidated cache entries by pattern");
        Ok(removed)
    }
}
