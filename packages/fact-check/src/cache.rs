//! TTL-bounded verdict cache with insertion-order eviction.
//!
//! Entries expire `ttl` after they were stored. When a new key would push
//! the cache past capacity, the oldest inserted entry is evicted first,
//! regardless of how recently it was read. Reads take a shared lock, so
//! concurrent lookups don't serialize; the lock is never held across an
//! await point.

use indexmap::IndexMap;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

use crate::error::{CacheError, CacheResult};
use crate::types::config::CacheConfig;
use crate::types::verdict::Verdict;

/// Normalized cache key: lower-cased, trimmed statement and context.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(claim_text: &str, context: &str) -> Self {
        let key = format!("{}\u{1f}{}", claim_text.trim(), context.trim());
        Self(key.to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A cached verdict and when it was stored.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub verdict: Verdict,
    pub stored_at: Instant,
    seq: u64,
}

impl CacheEntry {
    fn is_fresh(&self, now: Instant, ttl: Duration) -> bool {
        now.duration_since(self.stored_at) < ttl
    }
}

/// Hit/miss counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

/// Entries plus their insertion order.
///
/// `order` may hold stale records for keys that were re-inserted or removed;
/// a record is live only while its `seq` matches the entry's. Every
/// operation in `put` is amortized O(1).
#[derive(Debug, Default)]
struct Store {
    entries: IndexMap<CacheKey, CacheEntry>,
    order: VecDeque<(u64, CacheKey)>,
    next_seq: u64,
}

impl Store {
    fn is_live(&self, seq: u64, key: &CacheKey) -> bool {
        self.entries.get(key).is_some_and(|entry| entry.seq == seq)
    }

    /// Evict the oldest live insertion. Returns false when nothing is left.
    fn evict_oldest(&mut self) -> bool {
        while let Some((seq, key)) = self.order.pop_front() {
            if self.is_live(seq, &key) {
                self.entries.swap_remove(&key);
                debug!(key = key.as_str(), "evicted oldest cache entry");
                return true;
            }
        }
        false
    }

    /// Drop stale order records once they outnumber live ones.
    fn compact(&mut self) {
        if self.order.len() > 2 * self.entries.len().max(16) {
            let entries = &self.entries;
            self.order
                .retain(|(seq, key)| entries.get(key).is_some_and(|e| e.seq == *seq));
        }
    }
}

/// Process-lifetime verdict cache.
#[derive(Debug)]
pub struct ResultCache {
    store: RwLock<Store>,
    ttl: Duration,
    capacity: usize,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ResultCache {
    /// Create a cache. A capacity of zero disables storage.
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            store: RwLock::new(Store::default()),
            ttl,
            capacity,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.ttl(), config.capacity)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Look up a fresh verdict.
    pub fn get(&self, key: &CacheKey) -> CacheResult<Option<Verdict>> {
        let store = self.store.read().map_err(|_| CacheError::Poisoned)?;
        let found = store
            .entries
            .get(key)
            .filter(|entry| entry.is_fresh(Instant::now(), self.ttl))
            .map(|entry| entry.verdict.clone());

        let counter = if found.is_some() {
            &self.hits
        } else {
            &self.misses
        };
        counter.fetch_add(1, Ordering::Relaxed);

        Ok(found)
    }

    /// Store a verdict, evicting the oldest insertion if full.
    ///
    /// Insertion order matches storage time, so expired entries are always
    /// the first to go.
    pub fn put(&self, key: CacheKey, verdict: Verdict) -> CacheResult<()> {
        if self.capacity == 0 {
            return Ok(());
        }

        let now = Instant::now();
        let mut store = self.store.write().map_err(|_| CacheError::Poisoned)?;

        // Re-inserting moves the key to the newest position
        store.entries.swap_remove(&key);

        while store.entries.len() >= self.capacity && store.evict_oldest() {}

        let seq = store.next_seq;
        store.next_seq += 1;
        store.order.push_back((seq, key.clone()));
        store.entries.insert(
            key,
            CacheEntry {
                verdict,
                stored_at: now,
                seq,
            },
        );
        store.compact();
        Ok(())
    }

    /// Drop every expired entry. Returns how many were removed.
    pub fn purge_expired(&self) -> CacheResult<usize> {
        let now = Instant::now();
        let mut store = self.store.write().map_err(|_| CacheError::Poisoned)?;
        let before = store.entries.len();
        let ttl = self.ttl;
        store.entries.retain(|_, entry| entry.is_fresh(now, ttl));
        let entries = &store.entries;
        let live: VecDeque<(u64, CacheKey)> = store
            .order
            .iter()
            .filter(|(seq, key)| entries.get(key).is_some_and(|e| e.seq == *seq))
            .cloned()
            .collect();
        let removed = before - store.entries.len();
        store.order = live;
        Ok(removed)
    }

    pub fn clear(&self) -> CacheResult<()> {
        let mut store = self.store.write().map_err(|_| CacheError::Poisoned)?;
        store.entries.clear();
        store.order.clear();
        Ok(())
    }

    /// Number of stored entries, including expired ones not yet purged.
    pub fn len(&self) -> usize {
        self.store.read().map(|s| s.entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.len(),
        }
    }
}
