use unicode_script::Script;

/// Shaper-owned scratch state for one script-run shape call.
///
/// The glyph arrays are caller-allocated: the shaper grows them through
/// [`prepare_glyphs`](Self::prepare_glyphs) and the backend fills them,
/// reporting the required capacity through `num_glyphs` when they are too
/// small. All fixed-point values are 26.6 (64ths of a pixel); the scale
/// factors are 16.16 conversions from font design units.
#[derive(Debug)]
pub struct ShapeItem {
    /// Script run window within the run text passed to the backend.
    pub run_start: usize,
    pub run_len: usize,
    pub script: Script,
    pub rtl: bool,
    /// BCP-47 language tag for shaping, empty when unspecified.
    pub language: String,

    /// Pixel sizes programmed onto the shaping face; hinting-sensitive
    /// advance rounding keys off these. The x size carries the text scale.
    pub x_ppem: u16,
    pub y_ppem: u16,
    /// 16.16 scale from design units to 26.6 pixels, x axis (includes text
    /// scale).
    pub x_scale: i32,
    pub y_scale: i32,

    /// Glyph ids in logical order, without any base-glyph-count offset.
    pub glyphs: Vec<u16>,
    /// Per-glyph advances, 26.6.
    pub advances: Vec<i32>,
    /// Per-glyph (x, y) offsets, 26.6.
    pub offsets: Vec<(i32, i32)>,
    /// For each code unit of the script run, the index of the first glyph of
    /// the cluster covering it. Sized to `run_len` by the backend.
    pub log_clusters: Vec<usize>,
    /// Out: glyphs produced, or the required capacity after an overflow.
    pub num_glyphs: usize,
}

impl ShapeItem {
    pub fn new() -> Self {
        Self {
            run_start: 0,
            run_len: 0,
            script: Script::Common,
            rtl: false,
            language: String::new(),
            x_ppem: 0,
            y_ppem: 0,
            x_scale: 0,
            y_scale: 0,
            glyphs: Vec::new(),
            advances: Vec::new(),
            offsets: Vec::new(),
            log_clusters: Vec::new(),
            num_glyphs: 0,
        }
    }

    /// Current glyph-array capacity.
    pub fn glyph_capacity(&self) -> usize {
        self.glyphs.len()
    }

    /// Grow the glyph arrays to hold at least `size` glyphs and reset the
    /// output count.
    pub fn prepare_glyphs(&mut self, size: usize) {
        if size > self.glyphs.len() {
            self.glyphs.resize(size, 0);
            self.advances.resize(size, 0);
            self.offsets.resize(size, (0, 0));
        }
        self.num_glyphs = 0;
    }
}

impl Default for ShapeItem {
    fn default() -> Self {
        Self::new()
    }
}
