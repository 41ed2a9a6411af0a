//! Memoization of computed tables
//!
//! Entries are keyed by `(scope, snapshot version)`. A lookup for one
//! version never returns a value computed from another, and the first
//! lookup for a newer version drops everything older.

use crate::types::{Gameweek, LeagueId, UserId};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

/// What a cached value was computed for
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheScope {
    Season,
    LeagueTable(LeagueId),
    AllLeagueTables,
    Trophies(UserId),
    Profile(UserId),
    Chaos(UserId),
    GameweekLeaderboard(Gameweek),
    SeasonLeaderboard(Gameweek),
    FormLeaderboard { end_gw: Gameweek, length: u32 },
}

#[derive(Debug)]
struct CacheEntry<V> {
    value: Arc<V>,
    /// Insertion order, used to evict the oldest entry at capacity
    seq: u64,
}

/// Cache hit/miss counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub version: u64,
}

pub struct TableCache<V> {
    entries: DashMap<(CacheScope, u64), CacheEntry<V>>,
    max_entries: usize,
    version: AtomicU64,
    next_seq: AtomicU64,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<V> TableCache<V> {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: DashMap::new(),
            max_entries: max_entries.max(1),
            version: AtomicU64::new(0),
            next_seq: AtomicU64::new(0),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Cached value for `(scope, version)`, computing and storing it on a miss.
    ///
    /// `compute` runs without any map lock held, so it may use other caches.
    /// Values for a version older than the newest one seen are computed but
    /// not stored.
    pub fn get_or_compute<F>(&self, scope: CacheScope, version: u64, compute: F) -> Arc<V>
    where
        F: FnOnce() -> V,
    {
        self.observe_version(version);

        let key = (scope, version);
        if let Some(entry) = self.entries.get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Arc::clone(&entry.value);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        debug!("Cache miss for {:?} at v{}", key.0, version);
        let value = Arc::new(compute());

        if version < self.version.load(Ordering::Acquire) {
            return value;
        }

        if self.entries.len() >= self.max_entries {
            self.evict_oldest();
        }
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        // A concurrent caller may have stored the same key first; keep theirs
        let stored = {
            let entry = self
                .entries
                .entry(key.clone())
                .or_insert_with(|| CacheEntry { value: Arc::clone(&value), seq });
            Arc::clone(&entry.value)
        };

        // A newer version may have purged between the check above and the insert
        if version < self.version.load(Ordering::Acquire) {
            self.entries.remove(&key);
        }
        stored
    }

    fn observe_version(&self, version: u64) {
        let previous = self.version.fetch_max(version, Ordering::AcqRel);
        if version > previous {
            let before = self.entries.len();
            self.entries.retain(|(_, v), _| *v >= version);
            info!(
                "Snapshot version advanced v{} -> v{}, dropped {} cached tables",
                previous,
                version,
                before.saturating_sub(self.entries.len())
            );
        }
    }

    fn evict_oldest(&self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|e| e.value().seq)
            .map(|e| e.key().clone());
        if let Some(key) = oldest {
            self.entries.remove(&key);
        }
    }

    /// Peek without computing
    pub fn get(&self, scope: &CacheScope, version: u64) -> Option<Arc<V>> {
        self.entries.get(&(scope.clone(), version)).map(|e| Arc::clone(&e.value))
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            version: self.version.load(Ordering::Relaxed),
        }
    }
}
