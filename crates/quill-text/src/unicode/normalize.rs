//! Combining-mark normalisation for shaping runs.
//!
//! Fonts without precomposed forms shape base+mark sequences poorly, so each
//! base-plus-diacritics chunk is NFC-normalised before shaping. The code-unit
//! count of the run must not change (callers expect one advance slot per code
//! unit), so the tail of each collapsed chunk is filled with zero-width
//! spaces. ZWNJ and ZWJ are not usable as filler because fallback fonts often
//! lack those glyphs.

use std::borrow::Cow;

use unicode_normalization::UnicodeNormalization;

/// U+200B ZERO WIDTH SPACE, the width-free filler code unit.
pub const ZWSP: u16 = 0x200B;

/// Whether a code unit lies in the Combining Diacritical Marks block.
pub fn is_combining_diacritical(unit: u16) -> bool {
    (0x0300..=0x036F).contains(&unit)
}

/// Scan a run right-to-left for combining diacritical marks and NFC-normalise
/// each base+marks chunk in place, padding collapsed chunks with [`ZWSP`].
///
/// The run is only copied once the first chunk actually changes; `scratch`
/// holds the per-chunk NFC output between calls. A chunk with no leading base
/// character aborts the scan; a chunk whose NFC form would be longer than the
/// source span is left untouched.
pub fn normalize_marks(run: &mut Cow<'_, [u16]>, scratch: &mut Vec<u16>) {
    let mut i = run.len() as isize - 1;
    while i >= 0 {
        if !is_combining_diacritical(run[i as usize]) {
            i -= 1;
            continue;
        }
        // Walk back to the base character carrying this mark sequence.
        let mut j = i - 1;
        while j >= 0 && is_combining_diacritical(run[j as usize]) {
            j -= 1;
        }
        if j < 0 {
            // Mark with no base in this run; shape the original text.
            break;
        }
        let (start, end) = (j as usize, i as usize);
        if nfc_utf16(&run[start..=end], scratch) {
            let span = end - start + 1;
            if scratch.len() <= span {
                let out = run.to_mut();
                out[start..start + scratch.len()].copy_from_slice(scratch);
                for unit in &mut out[start + scratch.len()..=end] {
                    *unit = ZWSP;
                }
            }
        }
        i = j - 1;
    }
}

/// NFC-normalise a UTF-16 slice into `out`. Returns false (leaving `out`
/// cleared) when the slice contains unpaired surrogates.
fn nfc_utf16(src: &[u16], out: &mut Vec<u16>) -> bool {
    out.clear();
    let mut decoded = String::with_capacity(src.len());
    for unit in char::decode_utf16(src.iter().copied()) {
        match unit {
            Ok(c) => decoded.push(c),
            Err(_) => return false,
        }
    }
    let mut buf = [0u16; 2];
    for c in decoded.nfc() {
        out.extend_from_slice(c.encode_utf16(&mut buf));
    }
    true
}
