pub mod runs;

pub use runs::{visual_runs, VisualRun};

/// Directionality hint for a styled run, part of the cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum TextDirection {
    /// Left-to-right paragraph level; embedded runs still resolve.
    Ltr = 0,
    /// Right-to-left paragraph level; embedded runs still resolve.
    Rtl = 1,
    /// Detect the paragraph level from the text, defaulting to LTR.
    DefaultLtr = 2,
    /// Detect the paragraph level from the text, defaulting to RTL.
    DefaultRtl = 3,
    /// Treat every character as LTR; no bidi analysis at all.
    ForceLtr = 4,
    /// Treat every character as RTL; no bidi analysis at all.
    ForceRtl = 5,
}

impl TextDirection {
    /// The direction this hint implies when the text itself gives no answer.
    pub(crate) fn fallback_rtl(self) -> bool {
        matches!(
            self,
            TextDirection::Rtl | TextDirection::DefaultRtl | TextDirection::ForceRtl
        )
    }
}
