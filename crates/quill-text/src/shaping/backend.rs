use std::sync::Arc;

use rustybuzz::ttf_parser::Tag;
use rustybuzz::{Face, Script as HbScript, UnicodeBuffer};
use tracing::warn;
use unicode_script::Script;

use crate::font::Typeface;
use crate::shaping::ShapeItem;
use crate::unicode::char_at;

/// Prepared face handle held by the [`FaceCache`](crate::font::FaceCache).
///
/// Cloning is cheap; the font bytes are shared.
#[derive(Debug, Clone)]
pub struct ShapeFace {
    pub typeface_id: u32,
    pub data: Arc<[u8]>,
    pub index: u32,
}

/// The low-level shaper consumed by the pipeline.
///
/// `shape` fills the item's caller-allocated glyph arrays for
/// `item.text[run_start..run_start + run_len]` in **logical** order. When the
/// arrays are too small it stores the required capacity in `item.num_glyphs`
/// and returns `false`; the caller grows the arrays and retries.
pub trait ShapeBackend: Send {
    /// Prepare a reusable face handle, or `None` when the typeface data is
    /// not a usable font.
    fn new_face(&self, typeface: &Typeface) -> Option<ShapeFace>;

    fn shape(&mut self, face: &ShapeFace, text: &[u16], item: &mut ShapeItem) -> bool;
}

/// [`ShapeBackend`] on rustybuzz.
///
/// The `rustybuzz::Face` is rebuilt from the shared font bytes per call; the
/// parse is cheap and keeps the handle free of self-references.
#[derive(Debug, Default)]
pub struct RustybuzzBackend {
    cluster_scratch: Vec<u32>,
}

impl RustybuzzBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ShapeBackend for RustybuzzBackend {
    fn new_face(&self, typeface: &Typeface) -> Option<ShapeFace> {
        let data = typeface.data();
        if Face::from_slice(&data, typeface.index()).is_none() {
            return None;
        }
        Some(ShapeFace {
            typeface_id: typeface.id(),
            data,
            index: typeface.index(),
        })
    }

    fn shape(&mut self, face: &ShapeFace, text: &[u16], item: &mut ShapeItem) -> bool {
        let run = &text[item.run_start..item.run_start + item.run_len];
        let Some(mut hb_face) = Face::from_slice(&face.data, face.index) else {
            // new_face validated this data; a failure here means the handle
            // was built by another backend. Shape nothing.
            warn!(typeface = face.typeface_id, "face data no longer parses");
            item.num_glyphs = 0;
            return true;
        };
        // Hinting-sensitive advance rounding keys off the pixel size.
        if item.x_ppem != 0 || item.y_ppem != 0 {
            hb_face.set_pixels_per_em(Some((item.x_ppem, item.y_ppem)));
        }

        let mut buffer = UnicodeBuffer::new();
        let mut i = 0;
        while i < run.len() {
            let (c, len) = char_at(run, i);
            buffer.add(c, i as u32);
            i += len;
        }
        buffer.set_direction(if item.rtl {
            rustybuzz::Direction::RightToLeft
        } else {
            rustybuzz::Direction::LeftToRight
        });
        if let Some(script) = hb_script(item.script) {
            buffer.set_script(script);
        }
        if !item.language.is_empty() {
            if let Ok(language) = item.language.parse::<rustybuzz::Language>() {
                buffer.set_language(language);
            }
        }

        let glyphs = rustybuzz::shape(&hb_face, &[], buffer);
        let infos = glyphs.glyph_infos();
        let positions = glyphs.glyph_positions();
        let needed = infos.len();
        if needed > item.glyph_capacity() {
            item.num_glyphs = needed;
            return false;
        }

        // rustybuzz emits visual order; flip RTL output back to logical
        // order, which is what the pipeline's own reversal expects.
        self.cluster_scratch.clear();
        for out_i in 0..needed {
            let src = if item.rtl { needed - 1 - out_i } else { out_i };
            let info = &infos[src];
            let pos = &positions[src];
            item.glyphs[out_i] = info.glyph_id as u16;
            item.advances[out_i] = scale(pos.x_advance, item.x_scale);
            item.offsets[out_i] = (scale(pos.x_offset, item.x_scale), -scale(pos.y_offset, item.y_scale));
            self.cluster_scratch.push(info.cluster);
        }
        fill_log_clusters(&self.cluster_scratch, run.len(), &mut item.log_clusters);
        item.num_glyphs = needed;
        true
    }
}

/// Font design units to 26.6 pixels through a 16.16 scale factor.
pub(crate) fn scale(units: i32, scale: i32) -> i32 {
    ((units as i64 * scale as i64) >> 16) as i32
}

fn hb_script(script: Script) -> Option<HbScript> {
    let name = script.short_name().as_bytes();
    let tag: [u8; 4] = name.try_into().ok()?;
    HbScript::from_iso15924_tag(Tag::from_bytes(&tag))
}

/// Derive the per-code-unit cluster map from per-glyph cluster values
/// (logical order, non-decreasing): each code unit maps to the first glyph
/// of the cluster covering it.
pub(crate) fn fill_log_clusters(clusters: &[u32], run_len: usize, out: &mut Vec<usize>) {
    out.clear();
    out.resize(run_len, 0);
    if clusters.is_empty() {
        return;
    }
    // Cluster boundaries: (code-unit offset, first glyph index).
    let mut bounds: Vec<(usize, usize)> = Vec::new();
    for (glyph, &cluster) in clusters.iter().enumerate() {
        if glyph == 0 || cluster != clusters[glyph - 1] {
            bounds.push((cluster as usize, glyph));
        }
    }
    let mut b = 0;
    for (unit, slot) in out.iter_mut().enumerate() {
        while b + 1 < bounds.len() && bounds[b + 1].0 <= unit {
            b += 1;
        }
        *slot = bounds[b].1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_clusters_identity_mapping() {
        let mut out = Vec::new();
        fill_log_clusters(&[0, 1, 2], 3, &mut out);
        assert_eq!(out, vec![0, 1, 2]);
    }

    #[test]
    fn log_clusters_ligature_spans_units() {
        // Three code units collapsed into one glyph at cluster 0.
        let mut out = Vec::new();
        fill_log_clusters(&[0], 3, &mut out);
        assert_eq!(out, vec![0, 0, 0]);
    }

    #[test]
    fn log_clusters_multi_glyph_cluster_points_at_first() {
        // One code unit decomposed into two glyphs, then a plain one.
        let mut out = Vec::new();
        fill_log_clusters(&[0, 0, 1], 2, &mut out);
        assert_eq!(out, vec![0, 2]);
    }

    #[test]
    fn scale_converts_units_to_26_6() {
        // 1000 upem, 16px: em_scale = 64<<16/1000; one full em advances
        // 16 * 64 64ths.
        let em_scale = ((64i64 << 16) / 1000) as i32;
        let x_scale = em_scale * 16;
        assert_eq!(scale(1000, x_scale), (16 * 64) as i32 - 1); // truncation
        assert!((scale(500, x_scale) - 8 * 64).abs() <= 1);
    }
}
