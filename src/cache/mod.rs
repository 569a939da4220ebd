//! Key/value cache collaborator.
//!
//! The engine memoizes content analyses and embedding vectors through the
//! [`CacheStore`] seam so deployments can swap in a shared store. The bundled
//! [`MemoryCache`] keeps everything in-process with per-entry TTLs.

mod error;
mod memory;


pub use error::CacheError;
pub use memory::MemoryCache;

use std::time::Duration;

use async_trait::async_trait;

/// Byte-oriented key/value store with TTL and pattern invalidation.
///
/// Values are opaque bytes; callers serialize with serde at the seam. All
/// operations are infallible no-ops for missing keys.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Returns the value for `key`, or `None` if absent or expired.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    /// Stores `value` under `key`. `None` TTL means no expiry.
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>)
    -> Result<(), CacheError>;

    /// Removes `key` if present.
    async fn delete(&self, key: &str) -> Result<(), CacheError>;

    /// Removes every key matching a glob `pattern`, returning the count.
    async fn delete_by_pattern(&self, pattern: &str) -> Result<u64, CacheError>;
}
