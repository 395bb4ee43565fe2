//! Move cache keyed by Zobrist hash.
//!
//! A cache stores the legal move list of a position under its hash so that
//! a board reaching the same position again can skip generation. Boards
//! receive a cache explicitly through [`Board::with_cache`](crate::Board::with_cache);
//! without one they simply recompute.
//!
//! The cache trusts the hash: two positions that collide share an entry.

use crate::config::MoveCacheConfig;
use crate::Move;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use thiserror::Error;

const BYTES_PER_MB: u64 = 1024 * 1024;

/// Errors raised by a move cache.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// An entry for this hash already exists.
    #[error("move list for hash {0:#018x} is already cached")]
    DuplicateHash(u64),
}

/// Storage for computed move lists, shared between threads.
pub trait MoveCache: Send + Sync {
    /// Returns the cached move list for `hash`, counting a hit or a miss.
    fn get(&self, hash: u64) -> Option<Arc<[Move]>>;

    /// Stores the move list for `hash`.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::DuplicateHash`] if `hash` is already present.
    fn insert(&self, hash: u64, moves: Arc<[Move]>) -> Result<(), CacheError>;

    /// Number of lookups that found an entry.
    fn hits(&self) -> u64;

    /// Number of lookups that found nothing.
    fn misses(&self) -> u64;

    /// Approximate size of the stored lists in megabytes, rounded up.
    fn size_mb(&self) -> u64;

    /// Size ceiling in megabytes.
    fn max_size_mb(&self) -> u64;

    /// Number of cached positions.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every entry.
    fn clear(&self);
}

/// Hash map cache that flushes itself entirely once its estimated size
/// passes the ceiling.
///
/// Sizes are estimates accumulated per entry, not measured allocations.
#[derive(Debug)]
pub struct DefaultMoveCache {
    entries: RwLock<HashMap<u64, Arc<[Move]>>>,
    hits: AtomicU64,
    misses: AtomicU64,
    size_bytes: AtomicU64,
    max_size_mb: u64,
}

impl DefaultMoveCache {
    /// Default ceiling in megabytes.
    pub const DEFAULT_MAX_SIZE_MB: u64 = 1024;

    /// Creates an empty cache with the default ceiling.
    pub fn new() -> Self {
        Self::with_max_size_mb(Self::DEFAULT_MAX_SIZE_MB)
    }

    /// Creates an empty cache with the given ceiling.
    pub fn with_max_size_mb(max_size_mb: u64) -> Self {
        DefaultMoveCache {
            entries: RwLock::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            size_bytes: AtomicU64::new(0),
            max_size_mb,
        }
    }

    /// Creates an empty cache configured from the `[move_cache]` section.
    pub fn from_config(config: &MoveCacheConfig) -> Self {
        Self::with_max_size_mb(config.max_size_mb)
    }

    /// Estimated footprint of one entry: key, list header and moves.
    #[inline]
    pub fn entry_size(moves: &[Move]) -> u64 {
        (4 + 8 + moves.len() * std::mem::size_of::<Move>()) as u64
    }

    /// Estimated size of the stored lists in bytes.
    pub fn size_bytes(&self) -> u64 {
        self.size_bytes.load(Ordering::Relaxed)
    }
}

impl Default for DefaultMoveCache {
    fn default() -> Self {
        Self::new()
    }
}

impl MoveCache for DefaultMoveCache {
    fn get(&self, hash: u64) -> Option<Arc<[Move]>> {
        let found = self
            .entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(&hash)
            .cloned();
        match found {
            Some(_) => self.hits.fetch_add(1, Ordering::Relaxed),
            None => self.misses.fetch_add(1, Ordering::Relaxed),
        };
        found
    }

    fn insert(&self, hash: u64, moves: Arc<[Move]>) -> Result<(), CacheError> {
        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if entries.contains_key(&hash) {
            return Err(CacheError::DuplicateHash(hash));
        }

        let size = Self::entry_size(&moves);
        entries.insert(hash, moves);
        let total = self.size_bytes.fetch_add(size, Ordering::Relaxed) + size;

        if total > self.max_size_mb * BYTES_PER_MB {
            tracing::debug!(
                "Flushing move cache: {} entries, ~{} bytes over the {} MB ceiling",
                entries.len(),
                total,
                self.max_size_mb
            );
            entries.clear();
            self.size_bytes.store(0, Ordering::Relaxed);
        }
        Ok(())
    }

    fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    fn size_mb(&self) -> u64 {
        self.size_bytes().div_ceil(BYTES_PER_MB)
    }

    fn max_size_mb(&self) -> u64 {
        self.max_size_mb
    }

    fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    fn clear(&self) {
        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        entries.clear();
        self.size_bytes.store(0, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Board;

    fn startpos_moves() -> Arc<[Move]> {
        Arc::from(Board::startpos().legal_moves())
    }

    #[test]
    fn get_counts_hits_and_misses() {
        let cache = DefaultMoveCache::new();
        assert!(cache.get(1).is_none());
        cache.insert(1, startpos_moves()).unwrap();
        assert_eq!(cache.get(1).map(|m| m.len()), Some(20));
        assert!(cache.get(2).is_none());
        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.misses(), 2);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn duplicate_insert_is_rejected() {
        let cache = DefaultMoveCache::new();
        cache.insert(7, startpos_moves()).unwrap();
        assert_eq!(
            cache.insert(7, startpos_moves()),
            Err(CacheError::DuplicateHash(7))
        );
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn size_is_estimated_per_entry() {
        let cache = DefaultMoveCache::new();
        assert_eq!(cache.size_mb(), 0);
        let moves = startpos_moves();
        let expected = DefaultMoveCache::entry_size(&moves);
        assert_eq!(expected, (12 + 20 * std::mem::size_of::<Move>()) as u64);
        cache.insert(1, Arc::clone(&moves)).unwrap();
        cache.insert(2, moves).unwrap();
        assert_eq!(cache.size_bytes(), 2 * expected);
        assert_eq!(cache.size_mb(), 1);
        assert_eq!(cache.max_size_mb(), DefaultMoveCache::DEFAULT_MAX_SIZE_MB);
    }

    #[test]
    fn exceeding_the_ceiling_flushes_everything() {
        let cache = DefaultMoveCache::with_max_size_mb(0);
        cache.insert(1, startpos_moves()).unwrap();
        assert!(cache.is_empty());
        assert_eq!(cache.size_bytes(), 0);
        // A flushed hash can be inserted again.
        cache.insert(1, startpos_moves()).unwrap();
        assert!(cache.get(1).is_none());
    }

    #[test]
    fn clear_resets_size() {
        let cache = DefaultMoveCache::new();
        cache.insert(1, startpos_moves()).unwrap();
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.size_bytes(), 0);
        assert!(cache.get(1).is_none());
    }

    #[test]
    fn from_config_uses_ceiling() {
        let cache = DefaultMoveCache::from_config(&MoveCacheConfig { max_size_mb: 16 });
        assert_eq!(cache.max_size_mb(), 16);
    }

    #[test]
    fn concurrent_inserts_and_lookups() {
        let cache = DefaultMoveCache::new();
        let moves = startpos_moves();
        std::thread::scope(|scope| {
            for thread in 0..4u64 {
                let cache = &cache;
                let moves = Arc::clone(&moves);
                scope.spawn(move || {
                    for i in 0..100u64 {
                        let hash = thread * 1000 + i;
                        cache.insert(hash, Arc::clone(&moves)).unwrap();
                        assert!(cache.get(hash).is_some());
                    }
                });
            }
        });
        assert_eq!(cache.len(), 400);
        assert_eq!(cache.hits(), 400);
    }
}
