//! Bounded, time-limited cache of resolved suggestion lists.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use serde::Serialize;
use ukaddr_core::{AddressSuggestion, SearchOptions};

/// Snapshot of what the cache currently holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub size: usize,
    pub keys: Vec<String>,
}

#[derive(Debug)]
struct Entry {
    inserted: Instant,
    suggestions: Vec<AddressSuggestion>,
}

/// Entries older than `ttl` read as misses. Inserting sweeps expired
/// entries, then evicts the oldest one while the map is at capacity.
#[derive(Debug)]
pub struct SuggestionCache {
    ttl: Duration,
    max_entries: usize,
    entries: Mutex<HashMap<String, Entry>>,
}

/// `lowercase(query) + "_" + JSON(options)`.
#[must_use]
pub fn cache_key(query: &str, options: &SearchOptions) -> String {
    let options_json = serde_json::to_string(options).unwrap_or_default();
    format!("{}_{options_json}", query.to_lowercase())
}

impl SuggestionCache {
    /// `max_entries` is clamped to at least one.
    #[must_use]
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            ttl,
            max_entries: max_entries.max(1),
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Entry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<Vec<AddressSuggestion>> {
        self.get_at(key, Instant::now())
    }

    pub fn insert(&self, key: String, suggestions: Vec<AddressSuggestion>) {
        self.insert_at(key, suggestions, Instant::now());
    }

    fn get_at(&self, key: &str, now: Instant) -> Option<Vec<AddressSuggestion>> {
        let mut entries = self.lock();
        let fresh = entries
            .get(key)
            .map(|e| now.saturating_duration_since(e.inserted) < self.ttl)?;
        if fresh {
            entries.get(key).map(|e| e.suggestions.clone())
        } else {
            entries.remove(key);
            None
        }
    }

    fn insert_at(&self, key: String, suggestions: Vec<AddressSuggestion>, now: Instant) {
        let mut entries = self.lock();
        let ttl = self.ttl;
        entries.retain(|_, e| now.saturating_duration_since(e.inserted) < ttl);

        while entries.len() >= self.max_entries && !entries.contains_key(&key) {
            let Some(oldest) = entries
                .iter()
                .min_by_key(|(_, e)| e.inserted)
                .map(|(k, _)| k.clone())
            else {
                break;
            };
            tracing::debug!(key = %oldest, "evicting oldest cache entry");
            entries.remove(&oldest);
        }

        entries.insert(
            key,
            Entry {
                inserted: now,
                suggestions,
            },
        );
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        let entries = self.lock();
        let mut keys: Vec<String> = entries.keys().cloned().collect();
        keys.sort();
        CacheStats {
            size: entries.len(),
            keys,
        }
    }
}
