use std::sync::Arc;

use unicode_script::Script;

use crate::font::{Typeface, TypefaceStyle};

/// The external font host consumed by the shaping pipeline.
///
/// The pipeline never selects fonts itself; it asks the host for a default
/// typeface, for a per-script fallback, and for the glyph-id offset that
/// distinguishes fallback-font glyphs from primary-font glyphs.
pub trait FontHost: Send + Sync {
    /// Typeface used when the paint carries none or a fallback lookup fails.
    fn default_typeface(&self) -> Arc<Typeface>;

    /// A typeface covering `script` at the requested style, if the host has
    /// one. The returned typeface stays owned by the host's own cache; the
    /// pipeline holds it only for the duration of a shape call.
    fn typeface_for_script(&self, script: Script, style: TypefaceStyle) -> Option<Arc<Typeface>>;

    /// Design-space units per em of the font with this id.
    fn units_per_em(&self, font_id: u32) -> u32;

    /// Glyph-id offset to apply when `first` must be shaped with a fallback
    /// font, or 0 when the primary font covers it.
    fn base_glyph_count(&self, first: char) -> u32;
}
