use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::mem;

use crate::bidi::TextDirection;
use crate::paint::{FontVariant, Hinting, Paint};

/// Semantic fingerprint of a styled run: the full context text plus every
/// style input that influences shaping.
///
/// The key owns its copy of the context, so it stays valid however long the
/// cache retains it. Equality, hashing and ordering cover exactly the fields
/// that affect the shaped result; float fields compare by bit pattern so the
/// three relations always agree.
#[derive(Debug, Clone)]
pub struct LayoutKey {
    text: Box<[u16]>,
    start: usize,
    count: usize,
    dir: TextDirection,
    typeface_id: Option<u32>,
    text_size: f32,
    text_skew_x: f32,
    text_scale_x: f32,
    flags: u32,
    hinting: Hinting,
    variant: FontVariant,
    language: Box<str>,
}

impl LayoutKey {
    pub fn new(
        paint: &Paint,
        text: &[u16],
        start: usize,
        count: usize,
        context_count: usize,
        dir: TextDirection,
    ) -> Self {
        debug_assert!(start + count <= context_count && context_count <= text.len());
        Self {
            text: text[..context_count].into(),
            start,
            count,
            dir,
            typeface_id: paint.typeface.as_ref().map(|t| t.id()),
            text_size: paint.text_size,
            text_skew_x: paint.text_skew_x,
            text_scale_x: paint.text_scale_x,
            flags: paint.flags,
            hinting: paint.hinting,
            variant: paint.variant,
            language: paint.language.as_str().into(),
        }
    }

    pub fn text(&self) -> &[u16] {
        &self.text
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn context_count(&self) -> usize {
        self.text.len()
    }

    pub fn dir(&self) -> TextDirection {
        self.dir
    }

    /// Byte footprint charged against the cache budget.
    pub fn size(&self) -> usize {
        mem::size_of::<Self>() + mem::size_of::<u16>() * self.text.len()
    }
}

impl PartialEq for LayoutKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for LayoutKey {}

impl Hash for LayoutKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.start.hash(state);
        self.count.hash(state);
        self.typeface_id.hash(state);
        self.text_size.to_bits().hash(state);
        self.text_skew_x.to_bits().hash(state);
        self.text_scale_x.to_bits().hash(state);
        self.flags.hash(state);
        self.hinting.hash(state);
        self.dir.hash(state);
        self.variant.hash(state);
        self.language.hash(state);
        self.text.hash(state);
    }
}

impl Ord for LayoutKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.start
            .cmp(&other.start)
            .then_with(|| self.count.cmp(&other.count))
            .then_with(|| self.text.len().cmp(&other.text.len()))
            .then_with(|| self.typeface_id.cmp(&other.typeface_id))
            .then_with(|| self.text_size.total_cmp(&other.text_size))
            .then_with(|| self.text_skew_x.total_cmp(&other.text_skew_x))
            .then_with(|| self.text_scale_x.total_cmp(&other.text_scale_x))
            .then_with(|| self.flags.cmp(&other.flags))
            .then_with(|| self.hinting.cmp(&other.hinting))
            .then_with(|| self.dir.cmp(&other.dir))
            .then_with(|| self.variant.cmp(&other.variant))
            .then_with(|| self.language.cmp(&other.language))
            .then_with(|| self.text.cmp(&other.text))
    }
}

impl PartialOrd for LayoutKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
