use std::sync::Arc;
use std::sync::OnceLock;

use parking_lot::Mutex;
use tracing::error;

use crate::bidi::TextDirection;
use crate::config::EngineConfig;
use crate::font::FontHost;
use crate::layout::{LayoutValue, TextLayoutCache};
use crate::paint::Paint;
use crate::shaping::{RustybuzzBackend, ShapeBackend, TextShaper};

/// Facade over the layout cache and shaper.
///
/// One engine serves all renderer threads: the cache mutex is held across
/// the whole lookup (including shaping on a miss), which is also what makes
/// the shaper's scratch state safe. Returned values are immutable and
/// shared, so callers read them without the lock.
///
/// Prefer constructing an engine and passing it through application context;
/// [`install_global`]/[`global`] exist as a process-wide shim for callers
/// that cannot thread one through.
pub struct TextLayoutEngine {
    cache_enabled: bool,
    inner: Mutex<TextLayoutCache>,
}

impl TextLayoutEngine {
    /// Engine with the rustybuzz backend and default configuration.
    pub fn new(host: Arc<dyn FontHost>) -> Self {
        Self::with_config(host, EngineConfig::default())
    }

    pub fn with_config(host: Arc<dyn FontHost>, config: EngineConfig) -> Self {
        Self::with_backend(host, Box::new(RustybuzzBackend::new()), config)
    }

    /// Engine with a custom shaping backend.
    pub fn with_backend(
        host: Arc<dyn FontHost>,
        backend: Box<dyn ShapeBackend>,
        config: EngineConfig,
    ) -> Self {
        let shaper = TextShaper::new(host, backend);
        Self {
            cache_enabled: config.cache_enabled,
            inner: Mutex::new(TextLayoutCache::new(shaper, &config)),
        }
    }

    /// Measured glyph sequence for the window `[start, start + count)` of
    /// `text[..context_count]`, served from the cache when possible.
    ///
    /// Returns `None` for out-of-range windows; the caller is expected to
    /// treat the cache as advisory and cope.
    pub fn get_value(
        &self,
        paint: &Paint,
        text: &[u16],
        start: usize,
        count: usize,
        context_count: usize,
        dir: TextDirection,
    ) -> Option<Arc<LayoutValue>> {
        if start + count > context_count || context_count > text.len() {
            error!(
                start,
                count,
                context_count,
                text_len = text.len(),
                "rejecting layout request with an invalid window"
            );
            return None;
        }
        let mut inner = self.inner.lock();
        let value = if self.cache_enabled {
            inner.get(paint, text, start, count, context_count, dir)
        } else {
            Some(inner.compute_fresh(paint, text, start, count, context_count, dir))
        };
        if value.is_none() {
            error!(start, count, context_count, "no layout value produced");
        }
        value
    }

    /// Drop all cached layout values and shaper faces. Outstanding value
    /// handles remain valid.
    pub fn purge_caches(&self) {
        self.inner.lock().purge();
    }

    /// Live cache bytes; zero right after a purge.
    pub fn cache_size(&self) -> usize {
        self.inner.lock().size()
    }
}

static GLOBAL: OnceLock<TextLayoutEngine> = OnceLock::new();

/// Install the process-wide engine. The first installation wins; later calls
/// return the already-installed engine and drop theirs.
pub fn install_global(engine: TextLayoutEngine) -> &'static TextLayoutEngine {
    GLOBAL.get_or_init(|| engine)
}

/// The process-wide engine, if one has been installed.
pub fn global() -> Option<&'static TextLayoutEngine> {
    GLOBAL.get()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{mock_engine, mock_engine_with, MockBackend, MockHost};

    fn utf16(s: &str) -> Vec<u16> {
        s.encode_utf16().collect()
    }

    #[test]
    fn get_value_round_trips_through_the_cache() {
        let engine = mock_engine();
        let text = utf16("hello");
        let paint = Paint::default();
        let first = engine
            .get_value(&paint, &text, 0, 5, 5, TextDirection::Ltr)
            .unwrap();
        let second = engine
            .get_value(&paint, &text, 0, 5, 5, TextDirection::Ltr)
            .unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn disabled_cache_always_shapes_fresh() {
        let config = EngineConfig {
            cache_enabled: false,
            ..EngineConfig::default()
        };
        let engine = mock_engine_with(MockHost::new(), MockBackend::new(), config);
        let text = utf16("hello");
        let paint = Paint::default();
        let first = engine
            .get_value(&paint, &text, 0, 5, 5, TextDirection::Ltr)
            .unwrap();
        let second = engine
            .get_value(&paint, &text, 0, 5, 5, TextDirection::Ltr)
            .unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(first.advances(), second.advances());
        assert_eq!(engine.cache_size(), 0);
    }

    #[test]
    fn invalid_window_is_surfaced_as_none() {
        let engine = mock_engine();
        let text = utf16("hi");
        let paint = Paint::default();
        assert!(engine
            .get_value(&paint, &text, 1, 5, 2, TextDirection::Ltr)
            .is_none());
        assert!(engine
            .get_value(&paint, &text, 0, 2, 3, TextDirection::Ltr)
            .is_none());
    }

    #[test]
    fn purge_empties_the_cache_and_next_get_misses() {
        let engine = mock_engine();
        let text = utf16("hello");
        let paint = Paint::default();
        let first = engine
            .get_value(&paint, &text, 0, 5, 5, TextDirection::Ltr)
            .unwrap();
        engine.purge_caches();
        assert_eq!(engine.cache_size(), 0);
        let second = engine
            .get_value(&paint, &text, 0, 5, 5, TextDirection::Ltr)
            .unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn concurrent_lookups_are_serialised_not_corrupted() {
        let engine = Arc::new(mock_engine());
        let mut handles = Vec::new();
        for worker in 0..4 {
            let engine = engine.clone();
            handles.push(std::thread::spawn(move || {
                let paint = Paint::default();
                for i in 0..50 {
                    let text = utf16(&format!("w{worker} line {}", i % 5));
                    let count = text.len();
                    let value = engine
                        .get_value(&paint, &text, 0, count, count, TextDirection::Ltr)
                        .unwrap();
                    assert_eq!(value.advances().len(), count);
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }
    }
}
