//! Response cache
//!
//! Scraped payloads are cached as JSON values behind the [`Cache`]
//! trait, so the in-process store can later be swapped for a shared
//! one without touching the handlers. Entries carry a per-key TTL and
//! expire lazily on read.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

/// How long a cached homepage stays fresh
pub const HOMEPAGE_TTL: Duration = Duration::from_secs(300);

/// How long cached movie details stay fresh
pub const MOVIE_TTL: Duration = Duration::from_secs(600);

/// How long a cached category page stays fresh
pub const CATEGORY_TTL: Duration = Duration::from_secs(300);

/// How long the cached navigation stays fresh
pub const NAV_TTL: Duration = Duration::from_secs(600);

/// Keyed JSON store with per-entry expiry
pub trait Cache: Send + Sync {
    /// Fetch a value if present and unexpired
    fn get_value(&self, key: &str) -> Option<Value>;

    /// Store a value with a time-to-live
    fn set_value(&self, key: &str, value: Value, ttl: Duration);
}

impl dyn Cache {
    /// Typed read through the JSON cache
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.get_value(key)
            .and_then(|value| serde_json::from_value(value).ok())
    }

    /// Typed write through the JSON cache
    ///
    /// Values that fail to serialize are logged and skipped.
    pub fn put_json<T: Serialize>(&self, key: &str, value: &T, ttl: Duration) {
        match serde_json::to_value(value) {
            Ok(json) => self.set_value(key, json, ttl),
            Err(err) => tracing::warn!(key, error = %err, "failed to serialize cache entry"),
        }
    }
}

struct CacheEntry {
    expires_at: Instant,
    value: Value,
}

/// In-process cache backed by a `HashMap` behind an `RwLock`
#[derive(Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Cache for MemoryCache {
    fn get_value(&self, key: &str) -> Option<Value> {
        let now = Instant::now();

        {
            let entries = self.entries.read().ok()?;
            match entries.get(key) {
                Some(entry) if entry.expires_at > now => return Some(entry.value.clone()),
                Some(_) => {}
                None => return None,
            }
        }

        // Recheck under the write lock; another writer may have
        // refreshed the key in the meantime.
        if let Ok(mut entries) = self.entries.write() {
            if entries.get(key).is_some_and(|entry| entry.expires_at <= now) {
                entries.remove(key);
            }
        }

        None
    }

    fn set_value(&self, key: &str, value: Value, ttl: Duration) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(
                key.to_string(),
                CacheEntry {
                    expires_at: Instant::now() + ttl,
                    value,
                },
            );
        }
    }
}
