//! Script-run iteration over UTF-16 text.
//!
//! A script run is a maximal substring sharing one Unicode script, with
//! Common/Inherited/Unknown characters merging into the surrounding run so
//! punctuation and marks never split a word. RTL runs are walked backwards so
//! script runs come out in visual order.

use unicode_script::{Script, UnicodeScript};

use crate::unicode::{char_at, char_before};

/// One script run within a bidi run, in code units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptRun {
    pub start: usize,
    pub len: usize,
    pub script: Script,
}

/// Whether this script attaches to whatever surrounds it.
fn is_generic(script: Script) -> bool {
    matches!(
        script,
        Script::Common | Script::Inherited | Script::Unknown
    )
}

/// Next script run at or after `*cursor`; advances the cursor past it.
pub fn script_run_next(text: &[u16], cursor: &mut usize) -> Option<ScriptRun> {
    if *cursor >= text.len() {
        return None;
    }
    let start = *cursor;
    let mut run_script = Script::Common;
    let mut i = start;
    while i < text.len() {
        let (c, len) = char_at(text, i);
        let script = c.script();
        if !is_generic(script) {
            if is_generic(run_script) {
                run_script = script;
            } else if script != run_script {
                break;
            }
        }
        i += len;
    }
    *cursor = i;
    Some(ScriptRun {
        start,
        len: i - start,
        script: run_script,
    })
}

/// Script run ending at `*end` (exclusive); moves the cursor before it.
pub fn script_run_prev(text: &[u16], end: &mut usize) -> Option<ScriptRun> {
    if *end == 0 {
        return None;
    }
    let stop = *end;
    let mut run_script = Script::Common;
    let mut i = stop;
    while i > 0 {
        let (c, len) = char_before(text, i);
        let script = c.script();
        if !is_generic(script) {
            if is_generic(run_script) {
                run_script = script;
            } else if script != run_script {
                break;
            }
        }
        i -= len;
    }
    *end = i;
    Some(ScriptRun {
        start: i,
        len: stop - i,
        script: run_script,
    })
}
