//! Time-bounded in-memory cache for upstream responses
//!
//! Keys are request URLs. Entries expire `ttl` after they were stored and are
//! only evicted when a lookup finds them stale.

use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// A cached response body
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub key: String,
    pub payload: Value,
    pub fetched_at: DateTime<Utc>,
}

impl CacheEntry {
    /// Whether the entry is still inside its validity window
    pub fn is_fresh(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        // A timestamp in the future (clock step) counts as age zero
        let age = (now - self.fetched_at).to_std().unwrap_or_default();
        age < ttl
    }
}

/// Diagnostic snapshot of the cache
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub size: usize,
    pub keys: Vec<String>,
}

/// Process-lifetime response cache
#[derive(Debug)]
pub struct CacheStore {
    entries: Mutex<HashMap<String, CacheEntry>>,
    ttl: Duration,
}

impl CacheStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Get a fresh payload, evicting the entry if it has expired
    pub fn get(&self, key: &str) -> Option<Value> {
        let mut entries = self.lock();
        let fresh = entries.get(key)?.is_fresh(self.ttl, Utc::now());
        if fresh {
            entries.get(key).map(|e| e.payload.clone())
        } else {
            entries.remove(key);
            log::debug!("Evicted expired cache entry: {}", key);
            None
        }
    }

    /// Store a payload stamped with the current time
    pub fn insert(&self, key: &str, payload: Value) {
        let entry = CacheEntry {
            key: key.to_string(),
            payload,
            fetched_at: Utc::now(),
        };
        self.lock().insert(key.to_string(), entry);
    }

    /// Check for an entry without evicting or cloning it
    pub fn contains(&self, key: &str) -> bool {
        self.lock().contains_key(key)
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Size and keys (sorted) of every stored entry, expired or not
    pub fn stats(&self) -> CacheStats {
        let entries = self.lock();
        let mut keys: Vec<String> = entries.keys().cloned().collect();
        keys.sort();
        CacheStats {
            size: entries.len(),
            keys,
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;
