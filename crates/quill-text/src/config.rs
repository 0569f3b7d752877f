use serde::{Deserialize, Serialize};

/// Debug bit enabling cache-statistics collection and periodic dumps.
pub const DEBUG_CACHES: u32 = 1 << 0;

/// Engine configuration.
///
/// Deserializable so embedders can slot it into their own config files;
/// [`load`](Self::load) applies environment overrides on top of the defaults
/// for quick experiments without a config plumbing change.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Byte budget for the layout cache.
    pub cache_max_bytes: usize,
    /// When false, every lookup shapes from scratch.
    pub cache_enabled: bool,
    /// Debug bitset; see [`DEBUG_CACHES`].
    pub debug_level: u32,
    /// Dump cache statistics every N hits (0 disables the dump).
    pub dump_stats_every_n_hits: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cache_max_bytes: 2 * 1024 * 1024,
            cache_enabled: true,
            debug_level: 0,
            dump_stats_every_n_hits: 100,
        }
    }
}

impl EngineConfig {
    /// Defaults with environment overrides applied.
    pub fn load() -> Self {
        let mut config = Self::default();
        config.merge_with_env();
        config
    }

    /// Override fields from `QUILL_TEXT_*` environment variables, ignoring
    /// values that do not parse.
    pub fn merge_with_env(&mut self) {
        if let Ok(val) = std::env::var("QUILL_TEXT_CACHE_BYTES") {
            if let Ok(bytes) = val.parse() {
                self.cache_max_bytes = bytes;
            }
        }
        if let Ok(val) = std::env::var("QUILL_TEXT_CACHE_ENABLED") {
            if let Ok(enabled) = val.parse() {
                self.cache_enabled = enabled;
            }
        }
        if let Ok(val) = std::env::var("QUILL_TEXT_DEBUG") {
            if let Ok(level) = val.parse() {
                self.debug_level = level;
            }
        }
        if let Ok(val) = std::env::var("QUILL_TEXT_DUMP_INTERVAL") {
            if let Ok(interval) = val.parse() {
                self.dump_stats_every_n_hits = interval;
            }
        }
    }
}
