use std::sync::Arc;
use std::time::Instant;

use lru::LruCache;
use tracing::{debug, trace};

use crate::bidi::TextDirection;
use crate::config::{EngineConfig, DEBUG_CACHES};
use crate::layout::{LayoutKey, LayoutValue};
use crate::paint::Paint;
use crate::shaping::TextShaper;

/// Bounded LRU of shaped runs, accounted in bytes.
///
/// Entries are charged `key.size() + value.size()` against `max_size`;
/// `size` tracks the live total and every removal path goes through one
/// helper so the accounting cannot drift. The engine wraps this cache in a
/// mutex held for the whole `get`, which also makes it the shaper's
/// single-threading boundary.
pub struct TextLayoutCache {
    shaper: TextShaper,
    cache: LruCache<LayoutKey, Arc<LayoutValue>>,
    size: usize,
    max_size: usize,
    debug: bool,
    dump_interval: u32,
    hit_count: u32,
    nanos_saved: i64,
    start_time: Instant,
}

impl TextLayoutCache {
    pub fn new(shaper: TextShaper, config: &EngineConfig) -> Self {
        let debug = config.debug_level & DEBUG_CACHES != 0;
        debug!(
            debug_level = config.debug_level,
            max_bytes = config.cache_max_bytes,
            "layout cache initialised"
        );
        Self {
            shaper,
            cache: LruCache::unbounded(),
            size: 0,
            max_size: config.cache_max_bytes,
            debug,
            dump_interval: config.dump_stats_every_n_hits,
            hit_count: 0,
            nanos_saved: 0,
            start_time: Instant::now(),
        }
    }

    /// Look up the shaped value for a styled run, shaping and admitting it on
    /// a miss. An entry bigger than the whole budget is computed and returned
    /// without being admitted.
    pub fn get(
        &mut self,
        paint: &Paint,
        text: &[u16],
        start: usize,
        count: usize,
        context_count: usize,
        dir: TextDirection,
    ) -> Option<Arc<LayoutValue>> {
        let lookup_start = self.debug.then(Instant::now);
        let key = LayoutKey::new(paint, text, start, count, context_count, dir);

        if let Some(value) = self.cache.get(&key) {
            let value = value.clone();
            if let Some(t0) = lookup_start {
                self.record_hit(&value, t0);
            }
            return Some(value);
        }

        let shape_start = lookup_start.map(|_| Instant::now());
        let mut value = LayoutValue::new(context_count);
        self.shaper
            .compute_values(&mut value, paint, text, start, count, context_count, dir);
        if let Some(t0) = shape_start {
            value.set_elapsed(t0.elapsed());
        }
        let value = Arc::new(value);

        let entry_size = key.size() + value.size();
        if entry_size > self.max_size {
            // Still serve the request; the result is just not worth a whole
            // cache generation.
            debug!(
                entry_size,
                max_size = self.max_size,
                "computed but not caching oversize entry"
            );
            return Some(value);
        }

        while self.size + entry_size > self.max_size {
            if !self.evict_oldest() {
                panic!(
                    "layout cache failed to evict while over budget: \
                     size={}, entry_size={}, max_size={}, entries={}",
                    self.size,
                    entry_size,
                    self.max_size,
                    self.cache.len()
                );
            }
        }
        self.size += entry_size;
        if self.cache.put(key, value.clone()).is_some() {
            panic!(
                "duplicate layout cache entry for a key that missed under the same lock: \
                 start={start}, count={count}, context_count={context_count}"
            );
        }
        trace!(
            entry_size,
            used = self.size,
            remaining = self.max_size - self.size,
            "cache miss, entry added"
        );
        Some(value)
    }

    /// Shape without touching the cache; the cache-disabled path.
    pub fn compute_fresh(
        &mut self,
        paint: &Paint,
        text: &[u16],
        start: usize,
        count: usize,
        context_count: usize,
        dir: TextDirection,
    ) -> Arc<LayoutValue> {
        let mut value = LayoutValue::new(context_count);
        self.shaper
            .compute_values(&mut value, paint, text, start, count, context_count, dir);
        Arc::new(value)
    }

    /// Drop every entry and forward the purge to the shaper. Outstanding
    /// value handles stay valid through their shared ownership.
    pub fn purge(&mut self) {
        self.cache.clear();
        self.size = 0;
        self.shaper.purge();
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn entry_count(&self) -> usize {
        self.cache.len()
    }

    pub fn hit_count(&self) -> u32 {
        self.hit_count
    }

    fn evict_oldest(&mut self) -> bool {
        match self.cache.pop_lru() {
            Some((key, value)) => {
                let freed = key.size() + value.size();
                self.size -= freed;
                trace!(freed, remaining = self.size, "evicted oldest entry");
                true
            }
            None => false,
        }
    }

    fn record_hit(&mut self, value: &LayoutValue, lookup_start: Instant) {
        let through_cache = lookup_start.elapsed();
        self.nanos_saved +=
            value.elapsed().as_nanos() as i64 - through_cache.as_nanos() as i64;
        self.hit_count = self.hit_count.wrapping_add(1);
        trace!(
            hit = self.hit_count,
            compute_ns = value.elapsed().as_nanos() as u64,
            lookup_ns = through_cache.as_nanos() as u64,
            "cache hit"
        );
        if self.dump_interval > 0 && self.hit_count % self.dump_interval == 0 {
            self.dump_stats();
        }
    }

    fn dump_stats(&self) {
        let remaining = self.max_size - self.size;
        let actual: usize = self
            .cache
            .iter()
            .map(|(key, value)| key.size() + value.size())
            .sum();
        debug!(
            running_secs = self.start_time.elapsed().as_secs(),
            entries = self.cache.len(),
            max_size = self.max_size,
            used = self.size,
            used_actual = actual,
            remaining,
            remaining_percent = 100.0 * remaining as f32 / self.max_size.max(1) as f32,
            hits = self.hit_count,
            saved_ms = self.nanos_saved as f64 * 1e-6,
            "layout cache stats"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{mock_shaper, mock_typeface};

    fn utf16(s: &str) -> Vec<u16> {
        s.encode_utf16().collect()
    }

    fn cache_with_budget(max_bytes: usize) -> TextLayoutCache {
        let config = EngineConfig {
            cache_max_bytes: max_bytes,
            ..EngineConfig::default()
        };
        TextLayoutCache::new(mock_shaper(), &config)
    }

    fn get(cache: &mut TextLayoutCache, text: &str) -> Arc<LayoutValue> {
        let units = utf16(text);
        let paint = Paint::new(Some(mock_typeface(7)));
        cache
            .get(&paint, &units, 0, units.len(), units.len(), TextDirection::Ltr)
            .expect("cache get")
    }

    fn entry_size(cache: &mut TextLayoutCache, text: &str) -> usize {
        let units = utf16(text);
        let paint = Paint::new(Some(mock_typeface(7)));
        let key = LayoutKey::new(&paint, &units, 0, units.len(), units.len(), TextDirection::Ltr);
        let value = get(cache, text);
        key.size() + value.size()
    }

    #[test]
    fn hit_returns_the_same_shared_value() {
        let mut cache = cache_with_budget(1 << 20);
        let first = get(&mut cache, "hello");
        let second = get(&mut cache, "hello");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.entry_count(), 1);
    }

    #[test]
    fn size_tracks_live_entries_exactly() {
        let mut cache = cache_with_budget(1 << 20);
        assert_eq!(cache.size(), 0);
        let a = entry_size(&mut cache, "aaaa");
        assert_eq!(cache.size(), a);
        let b = entry_size(&mut cache, "bbbbbbbb");
        assert_eq!(cache.size(), a + b);
        let actual: usize = cache
            .cache
            .iter()
            .map(|(k, v)| k.size() + v.size())
            .sum();
        assert_eq!(cache.size(), actual);
    }

    #[test]
    fn eviction_keeps_the_most_recent_entries() {
        // Find the size of one entry, then budget for exactly two.
        let mut probe = cache_with_budget(1 << 20);
        let one = entry_size(&mut probe, "run-A");
        let mut cache = cache_with_budget(2 * one);

        get(&mut cache, "run-A");
        get(&mut cache, "run-B");
        assert_eq!(cache.entry_count(), 2);
        get(&mut cache, "run-C");
        assert_eq!(cache.entry_count(), 2);
        assert_eq!(cache.size(), 2 * one);

        // B and C survive; A was the least recently used.
        let b = get(&mut cache, "run-B");
        let b_again = get(&mut cache, "run-B");
        assert!(Arc::ptr_eq(&b, &b_again));
        let units = utf16("run-A");
        let paint = Paint::new(Some(mock_typeface(7)));
        let key = LayoutKey::new(&paint, &units, 0, 5, 5, TextDirection::Ltr);
        assert!(cache.cache.peek(&key).is_none());
    }

    #[test]
    fn oversize_entry_is_served_but_not_admitted() {
        let mut probe = cache_with_budget(1 << 20);
        let one = entry_size(&mut probe, "small");
        let mut cache = cache_with_budget(one);

        get(&mut cache, "small");
        assert_eq!(cache.size(), one);

        let huge = "x".repeat(4096);
        let value = get(&mut cache, &huge);
        assert_eq!(value.advances().len(), 4096);
        assert!(value.total_advance() > 0.0);
        // The small entry is untouched and accounting is unchanged.
        assert_eq!(cache.size(), one);
        assert_eq!(cache.entry_count(), 1);
    }

    #[test]
    fn purge_zeroes_size_and_forgets_entries() {
        let mut cache = cache_with_budget(1 << 20);
        let first = get(&mut cache, "hello");
        cache.purge();
        assert_eq!(cache.size(), 0);
        assert_eq!(cache.entry_count(), 0);
        // Old handles stay usable; the next get is a fresh miss.
        assert_eq!(first.advances().len(), 5);
        let second = get(&mut cache, "hello");
        assert!(!Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn values_survive_eviction_while_held() {
        let mut probe = cache_with_budget(1 << 20);
        let one = entry_size(&mut probe, "run-A");
        let mut cache = cache_with_budget(one);

        let held = get(&mut cache, "run-A");
        get(&mut cache, "run-B"); // evicts A
        assert!(held.total_advance() > 0.0);
        assert_eq!(held.advances().len(), 5);
    }
}
