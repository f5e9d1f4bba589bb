//! Response cache keyed by statement fingerprint.
//!
//! Only normalized results are cached. A cache is created once per process
//! and injected into the controller as `Arc<dyn CacheProvider>`; the
//! controller only reads and writes it when a request opts in.
//!
//! # Concurrency
//!
//! Concurrent `get`/`set` on the same fingerprint are safe. Two requests that
//! miss together both execute and both store; the later `set` wins.

mod hash;
pub use hash::Fingerprint;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use moka::sync::Cache;

use crate::normalize::Record;

/// Expiry applied when no timeout is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Longest accepted entry lifetime (30 days).
pub const MAX_TIMEOUT: Duration = Duration::from_secs(30 * 24 * 60 * 60);

/// Entry cap applied when none is configured.
pub const DEFAULT_MAX_ENTRIES: u64 = 10_000;

/// Normalized rows shared between the cache and its readers.
pub type CachedRows = Arc<Vec<Record>>;

/// Shared store for normalized query results.
pub trait CacheProvider: Send + Sync {
    /// Return the live entry for `key`, if any.
    fn get(&self, key: &Fingerprint) -> Option<CachedRows>;

    /// Store `rows` under `key`, replacing any previous entry.
    fn set(&self, key: Fingerprint, rows: CachedRows);
}

/// In-process cache with a per-entry time-to-live and an entry cap.
///
/// Expired entries are never returned and are evicted during moka's
/// housekeeping, which runs as the cache is used. Past the cap, the least
/// valuable entries are evicted.
pub struct MemoryCache {
    entries: Cache<Fingerprint, CachedRows>,
    timeout: Duration,
    max_entries: u64,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_limits(timeout, DEFAULT_MAX_ENTRIES)
    }

    /// Timeouts above [`MAX_TIMEOUT`] are clamped to it.
    pub fn with_limits(timeout: Duration, max_entries: u64) -> Self {
        let timeout = timeout.min(MAX_TIMEOUT);
        let entries = Cache::builder()
            .time_to_live(timeout)
            .max_capacity(max_entries)
            .build();
        Self {
            entries,
            timeout,
            max_entries,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn max_entries(&self) -> u64 {
        self.max_entries
    }

    /// Number of live entries, after applying pending evictions.
    pub fn len(&self) -> u64 {
        self.entries.run_pending_tasks();
        self.entries.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MemoryCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryCache")
            .field("timeout", &self.timeout)
            .field("max_entries", &self.max_entries)
            .finish_non_exhaustive()
    }
}

impl CacheProvider for MemoryCache {
    fn get(&self, key: &Fingerprint) -> Option<CachedRows> {
        self.entries.get(key)
    }

    fn set(&self, key: Fingerprint, rows: CachedRows) {
        self.entries.insert(key, rows);
    }
}
