use std::fmt;
use std::time::{Duration, Instant};

use moka::Expiry;
use moka::sync::Cache;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::kernel::error::Result;

/// Key/value cache holding JSON values.
pub trait CacheStore: Send + Sync {
    fn driver(&self) -> &str;

    /// The stored value, `None` when missing or expired.
    fn get(&self, key: &str) -> Option<Value>;

    /// Store `value`; `ttl = None` keeps it until forgotten or flushed.
    fn put(&self, key: &str, value: Value, ttl: Option<Duration>);

    fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Remove `key`, returning whether it was present.
    fn forget(&self, key: &str) -> bool;

    fn flush(&self);

    /// Live entries.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Typed access on top of [`CacheStore`].
pub trait CacheExt: CacheStore {
    /// Deserialize the cached value. A value that no longer matches `T` is
    /// treated as a miss.
    fn get_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.get(key)?;
        match serde_json::from_value(value) {
            Ok(typed) => Some(typed),
            Err(e) => {
                log::warn!("Ignoring cached '{}': {}", key, e);
                None
            }
        }
    }

    fn put_as<T: Serialize>(&self, key: &str, value: &T, ttl: Option<Duration>) -> Result<()> {
        self.put(key, serde_json::to_value(value)?, ttl);
        Ok(())
    }
}

impl<C: CacheStore + ?Sized> CacheExt for C {}

/// Longest TTL honoured. Longer ones, including overflowing ones, are
/// clamped to it.
pub const MAX_TTL: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

#[derive(Clone)]
struct Entry {
    value: Value,
    ttl: Option<Duration>,
}

/// Expires each entry after the TTL it was stored with.
struct EntryExpiry;

impl Expiry<String, Entry> for EntryExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        entry: &Entry,
        _created_at: Instant,
    ) -> Option<Duration> {
        entry.ttl
    }

    // An overwrite restarts the clock with the new entry's TTL.
    fn expire_after_update(
        &self,
        _key: &String,
        entry: &Entry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        entry.ttl
    }
}

/// Process-local cache backed by moka.
#[derive(Clone)]
pub struct MemoryCache {
    entries: Cache<String, Entry>,
    default_ttl: Option<Duration>,
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MemoryCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryCache")
            .field("default_ttl", &self.default_ttl)
            .field("entries", &self.entries.entry_count())
            .finish()
    }
}

impl MemoryCache {
    pub fn new() -> Self {
        Self {
            entries: Cache::builder().expire_after(EntryExpiry).build(),
            default_ttl: None,
        }
    }

    /// TTL applied by [`CacheStore::put`] when none is given. Clamped to
    /// [`MAX_TTL`].
    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = Some(ttl.min(MAX_TTL));
        self
    }

    pub fn default_ttl(&self) -> Option<Duration> {
        self.default_ttl
    }
}

impl CacheStore for MemoryCache {
    fn driver(&self) -> &str {
        "memory"
    }

    fn get(&self, key: &str) -> Option<Value> {
        self.entries.get(key).map(|entry| entry.value)
    }

    fn put(&self, key: &str, value: Value, ttl: Option<Duration>) {
        let ttl = ttl.map(|ttl| ttl.min(MAX_TTL)).or(self.default_ttl);
        self.entries.insert(key.to_string(), Entry { value, ttl });
    }

    fn forget(&self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    fn flush(&self) {
        self.entries.invalidate_all();
        self.entries.run_pending_tasks();
    }

    // `entry_count` lags behind pending evictions; iteration skips expired
    // and invalidated entries.
    fn len(&self) -> usize {
        self.entries.iter().count()
    }
}
