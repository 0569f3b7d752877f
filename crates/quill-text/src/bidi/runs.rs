use tracing::warn;
use unicode_bidi::utf16::BidiInfo;
use unicode_bidi::{BidiClass, BidiDataSource, HardcodedBidiData, Level, LTR_LEVEL, RTL_LEVEL};

use crate::bidi::TextDirection;
use crate::unicode::char_at;

/// A maximal single-direction run within the shaping window, in code units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisualRun {
    /// Absolute start within the context.
    pub start: usize,
    pub len: usize,
    pub rtl: bool,
}

/// Resolve a direction hint over the full context and return the visual runs
/// clipped to the window `[start, start + count)`, in visual order.
///
/// Force hints skip bidi analysis entirely. Anything the bidi pass cannot
/// handle degrades to a single run whose direction comes from the resolved
/// paragraph level, or from the hint when no level was resolved.
pub fn visual_runs(
    dir: TextDirection,
    text: &[u16],
    start: usize,
    count: usize,
) -> Vec<VisualRun> {
    let single = |rtl: bool| {
        vec![VisualRun {
            start,
            len: count,
            rtl,
        }]
    };

    let level = match dir {
        TextDirection::ForceLtr => return single(false),
        TextDirection::ForceRtl => return single(true),
        TextDirection::Ltr => Some(LTR_LEVEL),
        TextDirection::Rtl => Some(RTL_LEVEL),
        TextDirection::DefaultLtr => None,
        TextDirection::DefaultRtl => {
            // The library's auto-detection defaults to LTR when the text has
            // no strong character; honour the RTL default of this hint.
            if has_strong_char(text) {
                None
            } else {
                Some(RTL_LEVEL)
            }
        }
    };

    let info = BidiInfo::new(text, level);
    if info.paragraphs.len() != 1 {
        warn!(
            paragraphs = info.paragraphs.len(),
            "context is not a single paragraph, using one run"
        );
        let rtl = info
            .paragraphs
            .first()
            .map(|p| p.level.is_rtl())
            .unwrap_or(dir.fallback_rtl());
        return single(rtl);
    }

    let para = &info.paragraphs[0];
    let para_rtl = para.level.is_rtl();
    let (levels, runs) = info.visual_runs(para, para.range.clone());
    if runs.len() <= 1 {
        return single(para_rtl);
    }

    let end = start + count;
    let mut out = Vec::with_capacity(runs.len());
    for run in runs {
        let clipped_start = run.start.max(start);
        let clipped_end = run.end.min(end);
        if clipped_start >= clipped_end {
            continue;
        }
        let rtl = levels
            .get(run.start)
            .copied()
            .unwrap_or(Level::ltr())
            .is_rtl();
        out.push(VisualRun {
            start: clipped_start,
            len: clipped_end - clipped_start,
            rtl,
        });
    }
    if out.is_empty() {
        return single(para_rtl);
    }
    out
}

/// Whether the text contains a strong directional character (L, R or AL).
fn has_strong_char(text: &[u16]) -> bool {
    let data = HardcodedBidiData;
    let mut i = 0;
    while i < text.len() {
        let (c, len) = char_at(text, i);
        if matches!(
            data.bidi_class(c),
            BidiClass::L | BidiClass::R | BidiClass::AL
        ) {
            return true;
        }
        i += len;
    }
    false
}
