use std::sync::Arc;

use crate::font::Typeface;

/// Glyph hinting requested for shaping and rasterization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(u8)]
pub enum Hinting {
    None = 0,
    Slight = 1,
    #[default]
    Normal = 2,
    Full = 3,
}

/// Vertical-metrics variant of a font family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(u8)]
pub enum FontVariant {
    #[default]
    Default = 0,
    Compact = 1,
    Elegant = 2,
}

/// Style state of a text run: everything that influences the shaped result
/// and therefore participates in the layout-cache key.
///
/// A `None` typeface means "use the engine's default typeface".
#[derive(Debug, Clone)]
pub struct Paint {
    pub typeface: Option<Arc<Typeface>>,
    /// Text size in pixels per em.
    pub text_size: f32,
    /// Horizontal skew (italic slant), applied to glyph offsets.
    pub text_skew_x: f32,
    /// Horizontal scale multiplier (condensed/expanded text).
    pub text_scale_x: f32,
    /// Renderer flag bits (antialiasing, fake bold, ...). Opaque to the
    /// pipeline but part of the cache key.
    pub flags: u32,
    pub hinting: Hinting,
    pub variant: FontVariant,
    /// BCP-47 language tag, empty when unspecified.
    pub language: String,
}

impl Paint {
    pub fn new(typeface: Option<Arc<Typeface>>) -> Self {
        Self {
            typeface,
            ..Self::default()
        }
    }

    pub fn with_text_size(mut self, text_size: f32) -> Self {
        self.text_size = text_size;
        self
    }
}

impl Default for Paint {
    fn default() -> Self {
        Self {
            typeface: None,
            text_size: 16.0,
            text_skew_x: 0.0,
            text_scale_x: 1.0,
            flags: 0,
            hinting: Hinting::default(),
            variant: FontVariant::default(),
            language: String::new(),
        }
    }
}
