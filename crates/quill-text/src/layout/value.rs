use std::mem;
use std::time::Duration;

use swash::GlyphId;

/// Position of one glyph in the run's local coordinate frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphPosition {
    pub x: f32,
    pub y: f32,
}

/// Shaped result of a styled run, read-only once built.
///
/// `advances` has one entry per context code unit, with each cluster's
/// advance on its first code unit and zero elsewhere. `glyphs` and
/// `positions` run in visual order, concatenated across script runs. Values
/// are shared (`Arc`) between the cache and any caller still holding one, so
/// purging the cache never invalidates an outstanding handle.
#[derive(Debug)]
pub struct LayoutValue {
    pub(crate) advances: Vec<f32>,
    pub(crate) glyphs: Vec<GlyphId>,
    pub(crate) positions: Vec<GlyphPosition>,
    pub(crate) total_advance: f32,
    pub(crate) elapsed: Duration,
}

impl LayoutValue {
    /// Pre-reserves capacity proportional to the context so shaping rarely
    /// reallocates: one advance and one glyph slot per code unit, one
    /// position pair per expected glyph.
    pub fn new(context_count: usize) -> Self {
        Self {
            advances: Vec::with_capacity(context_count),
            glyphs: Vec::with_capacity(context_count),
            positions: Vec::with_capacity(context_count),
            total_advance: 0.0,
            elapsed: Duration::ZERO,
        }
    }

    pub fn advances(&self) -> &[f32] {
        &self.advances
    }

    pub fn glyphs(&self) -> &[GlyphId] {
        &self.glyphs
    }

    pub fn positions(&self) -> &[GlyphPosition] {
        &self.positions
    }

    pub fn total_advance(&self) -> f32 {
        self.total_advance
    }

    /// Build cost of the last computation; zero unless cache statistics are
    /// enabled.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub(crate) fn set_elapsed(&mut self, elapsed: Duration) {
        self.elapsed = elapsed;
    }

    /// Byte footprint charged against the cache budget. Capacities govern
    /// residency, so they are what gets counted, not lengths.
    pub fn size(&self) -> usize {
        mem::size_of::<Self>()
            + mem::size_of::<f32>() * self.advances.capacity()
            + mem::size_of::<GlyphId>() * self.glyphs.capacity()
            + mem::size_of::<GlyphPosition>() * self.positions.capacity()
    }
}
