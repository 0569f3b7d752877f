use std::borrow::Cow;
use std::sync::Arc;

use tracing::{trace, warn};
use unicode_script::Script;

use crate::bidi::{self, TextDirection};
use crate::font::{FaceCache, FontHost, Typeface};
use crate::layout::{GlyphPosition, LayoutValue};
use crate::paint::Paint;
use crate::shaping::{
    fixed_to_f32, script_run_next, script_run_prev, ShapeBackend, ShapeItem, ScriptRun,
};
use crate::unicode::{char_at, mirror_char, normalize_marks};

/// Stateful shaping pipeline: bidi partitioning, combining-mark
/// normalisation, RTL mirroring, script itemisation, fallback selection and
/// the shape call itself, stitched into one advance/position stream.
///
/// All scratch state lives in instance fields, so a shaper must not be used
/// from two threads at once; the layout cache serialises access by holding
/// its lock across the whole computation.
pub struct TextShaper {
    host: Arc<dyn FontHost>,
    backend: Box<dyn ShapeBackend>,
    face_cache: FaceCache,
    default_typeface: Arc<Typeface>,
    item: ShapeItem,
    nfc_scratch: Vec<u16>,
}

impl TextShaper {
    pub fn new(host: Arc<dyn FontHost>, backend: Box<dyn ShapeBackend>) -> Self {
        let default_typeface = host.default_typeface();
        Self {
            host,
            backend,
            face_cache: FaceCache::new(),
            default_typeface,
            item: ShapeItem::new(),
            nfc_scratch: Vec::new(),
        }
    }

    /// Shape the window `[start, start + count)` of `text[..context_count]`
    /// into `value`: per-code-unit advances over the whole context, glyphs
    /// and positions in visual order, and the total advance.
    pub fn compute_values(
        &mut self,
        value: &mut LayoutValue,
        paint: &Paint,
        text: &[u16],
        start: usize,
        count: usize,
        context_count: usize,
        dir: TextDirection,
    ) {
        value.total_advance = 0.0;
        value.advances.clear();
        value.advances.resize(context_count, 0.0);
        value.glyphs.clear();
        value.positions.clear();
        if count == 0 {
            return;
        }

        let context = &text[..context_count];
        self.item.language.clone_from(&paint.language);
        for run in bidi::visual_runs(dir, context, start, count) {
            trace!(
                start = run.start,
                len = run.len,
                rtl = run.rtl,
                "processing visual run"
            );
            self.process_run(
                paint,
                &context[run.start..run.start + run.len],
                run.start,
                run.rtl,
                value,
            );
        }
    }

    /// Drop the face sub-cache and re-acquire the default typeface.
    pub fn purge(&mut self) {
        self.face_cache.purge();
        self.default_typeface = self.host.default_typeface();
    }

    /// Shape one bidi run. `context_offset` is the run's absolute start
    /// within the context, used to index the advance array.
    fn process_run(
        &mut self,
        paint: &Paint,
        chars: &[u16],
        context_offset: usize,
        rtl: bool,
        value: &mut LayoutValue,
    ) {
        if chars.is_empty() {
            return;
        }

        let mut run_text = Cow::from(chars);
        normalize_marks(&mut run_text, &mut self.nfc_scratch);
        if rtl {
            for i in 0..run_text.len() {
                if let Some(mirrored) = mirror_char(run_text[i]) {
                    run_text.to_mut()[i] = mirrored;
                }
            }
        }
        let run_text: &[u16] = &run_text;

        let mut total_advance = value.total_advance;
        let mut cursor = if rtl { run_text.len() } else { 0 };
        loop {
            let script_run = if rtl {
                script_run_prev(run_text, &mut cursor)
            } else {
                script_run_next(run_text, &mut cursor)
            };
            let Some(script_run) = script_run else { break };
            if script_run.len == 0 {
                continue;
            }

            let base_glyph_count = self.shape_script_run(paint, run_text, script_run, rtl);
            let glyph_count = self.item.num_glyphs;
            if glyph_count == 0 {
                continue;
            }

            // One advance per cluster, assigned to the cluster's first code
            // unit; remaining units keep their zero.
            let mut run_advance = 0.0f32;
            let mut cluster_start = 0usize;
            for i in 0..script_run.len {
                let cluster = self.item.log_clusters[i];
                let next = if i == script_run.len - 1 {
                    glyph_count
                } else {
                    self.item.log_clusters[i + 1]
                };
                if cluster != next {
                    let advance: f32 = self.item.advances[cluster..next]
                        .iter()
                        .map(|&a| fixed_to_f32(a))
                        .sum();
                    run_advance += advance;
                    value.advances[context_offset + script_run.start + cluster_start] = advance;
                    cluster_start = i + 1;
                }
            }

            // Glyphs in visual order, offset so fallback-font ids stay
            // distinguishable from primary-font ids.
            for i in 0..glyph_count {
                let src = if rtl { glyph_count - 1 - i } else { i };
                value
                    .glyphs
                    .push((base_glyph_count as u16).wrapping_add(self.item.glyphs[src]));
            }

            // Positions continue from the advance accumulated so far. Scale
            // is already baked into x_scale/y_scale; the paint's skew is not,
            // so it is applied to the offsets here.
            let skew = paint.text_skew_x;
            let mut x = total_advance;
            for i in 0..glyph_count {
                let src = if rtl { glyph_count - 1 - i } else { i };
                let (xo, yo) = self.item.offsets[src];
                let (xo, yo) = (fixed_to_f32(xo), fixed_to_f32(yo));
                value.positions.push(GlyphPosition {
                    x: x + xo + yo * skew,
                    y: yo,
                });
                x += fixed_to_f32(self.item.advances[src]);
            }

            total_advance += run_advance;
        }
        value.total_advance = total_advance;
    }

    /// Select the typeface for one script run, program the scaled metrics and
    /// run the backend, growing the glyph arrays on overflow. Returns the
    /// base glyph count (non-zero when a fallback font was required).
    fn shape_script_run(
        &mut self,
        paint: &Paint,
        text: &[u16],
        script_run: ScriptRun,
        rtl: bool,
    ) -> u32 {
        self.item.run_start = script_run.start;
        self.item.run_len = script_run.len;
        self.item.script = script_run.script;
        self.item.rtl = rtl;

        // Fallback is only ever needed for complex scripts; the base glyph
        // count keys off the first non-space character of the run.
        let mut base_glyph_count = 0u32;
        if is_complex_script(script_run.script) {
            if let Some(first) =
                first_non_space_char(&text[script_run.start..script_run.start + script_run.len])
            {
                base_glyph_count = self.host.base_glyph_count(first);
            }
        }

        let typeface = if base_glyph_count != 0 {
            let style = paint
                .typeface
                .as_ref()
                .map(|t| t.style())
                .unwrap_or_default();
            self.host
                .typeface_for_script(script_run.script, style)
                .unwrap_or_else(|| {
                    trace!(script = ?script_run.script, "no fallback typeface, using default");
                    self.default_typeface.clone()
                })
        } else {
            paint
                .typeface
                .clone()
                .unwrap_or_else(|| self.default_typeface.clone())
        };

        let text_size = paint.text_size;
        let scale_x = paint.text_scale_x;
        self.item.x_ppem = (scale_x * text_size + 0.5).floor() as u16;
        self.item.y_ppem = text_size as u16;
        let upem = self.host.units_per_em(typeface.id()).max(1);
        // Design space to 64ths of a pixel, 16.16 fixed.
        let em_scale = (64u32 << 16) as f32 / upem as f32;
        self.item.x_scale = (em_scale * scale_x * text_size) as i32;
        self.item.y_scale = (em_scale * text_size) as i32;

        let Some(face) = self.face_cache.face_for(&typeface, self.backend.as_ref()) else {
            warn!(typeface = typeface.id(), "typeface data is not a usable font");
            self.item.num_glyphs = 0;
            return base_glyph_count;
        };

        debug_assert!(self.item.run_len > 0);
        let mut size = script_run.len * 3 / 2;
        loop {
            self.item.prepare_glyphs(size.max(1));
            if self.backend.shape(&face, text, &mut self.item) {
                break;
            }
            // The backend reported the required capacity; doubling it halves
            // the number of future reallocations.
            size = self.item.num_glyphs * 2;
        }
        base_glyph_count
    }
}

/// Scripts outside this set may need a fallback font with its own glyph-id
/// space.
fn is_complex_script(script: Script) -> bool {
    !matches!(
        script,
        Script::Common | Script::Greek | Script::Cyrillic | Script::Hangul | Script::Inherited
    )
}

/// First non-space character of a run; if the run is all spaces, the last
/// character decoded.
fn first_non_space_char(run: &[u16]) -> Option<char> {
    let mut i = 0;
    let mut current = None;
    while i < run.len() {
        let (c, len) = char_at(run, i);
        current = Some(c);
        if c != ' ' {
            break;
        }
        i += len;
    }
    current
}
