//! Deterministic host and backend doubles for pipeline and cache tests.
//!
//! The mock backend emits one glyph per character cluster (configurable to
//! more, to exercise the overflow retry), with a fixed 600/1000-em advance on
//! the cluster's first glyph and zero width for ZWSP/ZWNJ/ZWJ. Glyph ids are
//! the character's code point, so tests can see exactly what was shaped.

use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::Arc;

use unicode_script::Script;

use crate::config::EngineConfig;
use crate::engine::TextLayoutEngine;
use crate::font::{FontHost, Typeface, TypefaceStyle};
use crate::shaping::backend::{fill_log_clusters, scale};
use crate::shaping::{ShapeBackend, ShapeFace, ShapeItem, TextShaper};
use crate::unicode::char_at;

pub(crate) const MOCK_UPEM: u32 = 1000;
pub(crate) const MOCK_ADVANCE_UNITS: i32 = 600;

pub(crate) fn mock_typeface(id: u32) -> Arc<Typeface> {
    Arc::new(Typeface::new(
        id,
        TypefaceStyle::Normal,
        Arc::from(Vec::<u8>::new()),
        0,
    ))
}

pub(crate) struct MockHost {
    default: Arc<Typeface>,
    /// Returned by `typeface_for_script` when set.
    pub fallback: Option<Arc<Typeface>>,
    /// Base glyph count reported for non-ASCII characters.
    pub fallback_base: u32,
}

impl MockHost {
    pub fn new() -> Self {
        Self {
            default: mock_typeface(1),
            fallback: None,
            fallback_base: 0,
        }
    }

    /// Host that requires a fallback (with the given glyph-id base) for every
    /// non-ASCII character, serving it from typeface 99.
    pub fn with_fallback(base: u32) -> Self {
        Self {
            default: mock_typeface(1),
            fallback: Some(mock_typeface(99)),
            fallback_base: base,
        }
    }
}

impl FontHost for MockHost {
    fn default_typeface(&self) -> Arc<Typeface> {
        self.default.clone()
    }

    fn typeface_for_script(&self, _script: Script, _style: TypefaceStyle) -> Option<Arc<Typeface>> {
        self.fallback.clone()
    }

    fn units_per_em(&self, _font_id: u32) -> u32 {
        MOCK_UPEM
    }

    fn base_glyph_count(&self, first: char) -> u32 {
        if (first as u32) >= 0x80 {
            self.fallback_base
        } else {
            0
        }
    }
}

pub(crate) struct MockBackend {
    /// Glyphs emitted per cluster; values above 1 overflow the initial
    /// 1.5×-run-length arrays and exercise the retry loop.
    pub glyphs_per_cluster: usize,
    /// Shape calls observed, for retry-count assertions.
    pub calls: Arc<AtomicUsize>,
    /// Last pixels-per-em programmed onto the item, packed `x << 16 | y`.
    pub seen_ppem: Arc<AtomicU32>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            glyphs_per_cluster: 1,
            calls: Arc::new(AtomicUsize::new(0)),
            seen_ppem: Arc::new(AtomicU32::new(0)),
        }
    }

    pub fn with_glyphs_per_cluster(glyphs_per_cluster: usize) -> Self {
        Self {
            glyphs_per_cluster,
            ..Self::new()
        }
    }
}

fn is_zero_width(c: char) -> bool {
    matches!(c, '\u{200B}' | '\u{200C}' | '\u{200D}')
}

impl ShapeBackend for MockBackend {
    fn new_face(&self, typeface: &Typeface) -> Option<ShapeFace> {
        Some(ShapeFace {
            typeface_id: typeface.id(),
            data: typeface.data(),
            index: typeface.index(),
        })
    }

    fn shape(&mut self, _face: &ShapeFace, text: &[u16], item: &mut ShapeItem) -> bool {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.seen_ppem.store(
            (item.x_ppem as u32) << 16 | item.y_ppem as u32,
            Ordering::Relaxed,
        );
        let run = &text[item.run_start..item.run_start + item.run_len];

        let mut chars: Vec<(usize, char)> = Vec::new();
        let mut i = 0;
        while i < run.len() {
            let (c, len) = char_at(run, i);
            chars.push((i, c));
            i += len;
        }

        let needed = chars.len() * self.glyphs_per_cluster;
        if needed > item.glyph_capacity() {
            item.num_glyphs = needed;
            return false;
        }

        let mut glyph_clusters = Vec::with_capacity(needed);
        let mut g = 0;
        for &(offset, c) in &chars {
            let advance = if is_zero_width(c) {
                0
            } else {
                scale(MOCK_ADVANCE_UNITS, item.x_scale)
            };
            for extra in 0..self.glyphs_per_cluster {
                item.glyphs[g] = (c as u32 as u16).wrapping_add(extra as u16);
                item.advances[g] = if extra == 0 { advance } else { 0 };
                item.offsets[g] = (0, 0);
                glyph_clusters.push(offset as u32);
                g += 1;
            }
        }
        fill_log_clusters(&glyph_clusters, run.len(), &mut item.log_clusters);
        item.num_glyphs = needed;
        true
    }
}

/// Advance in pixels the mock backend produces for one regular cluster at
/// the given paint settings.
pub(crate) fn mock_cluster_advance(text_size: f32, text_scale_x: f32) -> f32 {
    let em_scale = (64u32 << 16) as f32 / MOCK_UPEM as f32;
    let x_scale = (em_scale * text_scale_x * text_size) as i32;
    scale(MOCK_ADVANCE_UNITS, x_scale) as f32 / 64.0
}

pub(crate) fn mock_shaper() -> TextShaper {
    TextShaper::new(Arc::new(MockHost::new()), Box::new(MockBackend::new()))
}

pub(crate) fn mock_engine() -> TextLayoutEngine {
    mock_engine_with(MockHost::new(), MockBackend::new(), EngineConfig::default())
}

pub(crate) fn mock_engine_with(
    host: MockHost,
    backend: MockBackend,
    config: EngineConfig,
) -> TextLayoutEngine {
    TextLayoutEngine::with_backend(Arc::new(host), Box::new(backend), config)
}
