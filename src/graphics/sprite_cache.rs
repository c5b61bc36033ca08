//! Memo of transformed sprite images.
//!
//! Entries are keyed by the full draw request and hold a transformed image
//! plus its identically transformed mask. Eviction is sweep-based: once an
//! insert would push the cache past its cap, every entry older than the
//! maximum age is dropped in one pass. Younger entries survive even if the
//! cache stays over the cap, so this is deliberately not an LRU.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::graphics::bitmap::Bitmap;

/// Default maximum number of entries before a sweep is attempted.
pub const DEFAULT_MAX_ENTRIES: usize = 1000;
/// Default age after which an entry may be swept.
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(60);

/// Everything that determines a transformed sprite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransformKey {
    pub sprite: i32,
    pub width: i32,
    pub height: i32,
    pub dest_width: i32,
    pub dest_height: i32,
    /// Whole degrees in `0..360`.
    pub rotation: i32,
    pub flip_x: bool,
    pub flip_y: bool,
}

impl TransformKey {
    /// True when the draw needs no matrix at all.
    pub fn is_identity(&self) -> bool {
        self.rotation == 0 && !self.flip_x && !self.flip_y
    }
}

#[derive(Debug)]
pub struct CachedTransform {
    pub image: Bitmap,
    pub mask: Bitmap,
    last_used: Instant,
}

impl CachedTransform {
    pub fn new(image: Bitmap, mask: Bitmap) -> Self {
        Self {
            image,
            mask,
            last_used: Instant::now(),
        }
    }

    pub fn last_used(&self) -> Instant {
        self.last_used
    }
}

/// Hit/miss counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub swept: u64,
}

#[derive(Debug)]
pub struct TransformCache {
    entries: HashMap<TransformKey, CachedTransform>,
    max_entries: usize,
    max_age: Duration,
    stats: CacheStats,
}

impl TransformCache {
    pub fn new(max_entries: usize, max_age: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            max_entries,
            max_age,
            stats: CacheStats::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    /// Refresh an entry's timestamp. Returns false (and counts a miss) when
    /// the key is not cached.
    pub fn touch(&mut self, key: &TransformKey) -> bool {
        self.touch_at(key, Instant::now())
    }

    pub(crate) fn touch_at(&mut self, key: &TransformKey, now: Instant) -> bool {
        match self.entries.get_mut(key) {
            Some(entry) => {
                entry.last_used = now;
                self.stats.hits += 1;
                true
            }
            None => {
                self.stats.misses += 1;
                false
            }
        }
    }

    /// Look an entry up without touching it or the counters.
    pub fn peek(&self, key: &TransformKey) -> Option<&CachedTransform> {
        self.entries.get(key)
    }

    /// Store a freshly computed transform, sweeping first if the cache is
    /// about to exceed its cap.
    pub fn insert(&mut self, key: TransformKey, entry: CachedTransform) {
        self.insert_at(key, entry, Instant::now());
    }

    pub(crate) fn insert_at(&mut self, key: TransformKey, mut entry: CachedTransform, now: Instant) {
        if !self.entries.contains_key(&key) && self.entries.len() + 1 > self.max_entries {
            self.sweep_at(now);
        }
        entry.last_used = now;
        self.entries.insert(key, entry);
    }

    /// Drop every entry older than the maximum age. Returns how many went.
    pub fn sweep(&mut self) -> usize {
        self.sweep_at(Instant::now())
    }

    pub(crate) fn sweep_at(&mut self, now: Instant) -> usize {
        let max_age = self.max_age;
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| now.saturating_duration_since(entry.last_used) <= max_age);
        let removed = before - self.entries.len();
        if removed > 0 {
            self.stats.swept += removed as u64;
            log::debug!(
                "transform cache: swept {} entries, {} remain",
                removed,
                self.entries.len()
            );
        }
        removed
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for TransformCache {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES, DEFAULT_MAX_AGE)
    }
}
