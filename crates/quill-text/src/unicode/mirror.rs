//! Bracket mirroring for right-to-left runs.
//!
//! Full Unicode mirroring is more extensive than this; the table below covers
//! the paired brackets, quotes and angle forms that show up in practice.
//! Mirroring is applied to the run text before shaping because script-run
//! splitting separates brackets from the surrounding script.

/// Return the mirrored counterpart of a BMP code unit, if it has one.
pub fn mirror_char(unit: u16) -> Option<u16> {
    let mirrored = match unit {
        0x0028 => 0x0029, // ( )
        0x0029 => 0x0028,
        0x003C => 0x003E, // < >
        0x003E => 0x003C,
        0x005B => 0x005D, // [ ]
        0x005D => 0x005B,
        0x007B => 0x007D, // { }
        0x007D => 0x007B,
        0x00AB => 0x00BB, // « »
        0x00BB => 0x00AB,
        0x2039 => 0x203A, // ‹ ›
        0x203A => 0x2039,
        0x2045 => 0x2046, // ⁅ ⁆
        0x2046 => 0x2045,
        0x207D => 0x207E, // superscript parens
        0x207E => 0x207D,
        0x208D => 0x208E, // subscript parens
        0x208E => 0x208D,
        0x2264 => 0x2265, // ≤ ≥
        0x2265 => 0x2264,
        0x2329 => 0x232A, // 〈 〉
        0x232A => 0x2329,
        0x27E6 => 0x27E7, // ⟦ ⟧
        0x27E7 => 0x27E6,
        0x27E8 => 0x27E9, // ⟨ ⟩
        0x27E9 => 0x27E8,
        0x27EA => 0x27EB, // ⟪ ⟫
        0x27EB => 0x27EA,
        0x3008 => 0x3009, // CJK angle brackets
        0x3009 => 0x3008,
        0x300A => 0x300B,
        0x300B => 0x300A,
        0x300C => 0x300D, // 「 」
        0x300D => 0x300C,
        0x300E => 0x300F, // 『 』
        0x300F => 0x300E,
        0x3010 => 0x3011, // 【 】
        0x3011 => 0x3010,
        0x3014 => 0x3015, // 〔 〕
        0x3015 => 0x3014,
        0xFF08 => 0xFF09, // fullwidth parens
        0xFF09 => 0xFF08,
        0xFF1C => 0xFF1E, // fullwidth < >
        0xFF1E => 0xFF1C,
        0xFF3B => 0xFF3D, // fullwidth [ ]
        0xFF3D => 0xFF3B,
        0xFF5B => 0xFF5D, // fullwidth { }
        0xFF5D => 0xFF5B,
        _ => return None,
    };
    Some(mirrored)
}

/// Whether this code unit participates in bidi mirroring.
pub fn is_mirrored(unit: u16) -> bool {
    mirror_char(unit).is_some()
}
