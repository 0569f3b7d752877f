use std::sync::Arc;

/// Style class of a typeface, used when asking the host for a fallback face
/// matching the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(u8)]
pub enum TypefaceStyle {
    #[default]
    Normal = 0,
    Bold = 1,
    Italic = 2,
    BoldItalic = 3,
}

/// A loaded typeface: identity plus the raw font bytes the shaping backend
/// builds its face from.
///
/// The id is assigned by the [`FontHost`](crate::font::FontHost) and is the
/// identity used by the cache key and the face sub-cache; two typefaces with
/// the same id are treated as the same font.
#[derive(Debug, Clone)]
pub struct Typeface {
    id: u32,
    style: TypefaceStyle,
    /// Full font file contents.
    data: Arc<[u8]>,
    /// Font index within the file (for collections).
    index: u32,
}

impl Typeface {
    pub fn new(id: u32, style: TypefaceStyle, data: Arc<[u8]>, index: u32) -> Self {
        Self {
            id,
            style,
            data,
            index,
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn style(&self) -> TypefaceStyle {
        self.style
    }

    pub fn data(&self) -> Arc<[u8]> {
        self.data.clone()
    }

    pub fn index(&self) -> u32 {
        self.index
    }
}
