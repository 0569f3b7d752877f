pub mod backend;
pub mod item;
pub mod script;
pub mod shaper;

pub use backend::{RustybuzzBackend, ShapeBackend, ShapeFace};
pub use item::ShapeItem;
pub use script::{script_run_next, script_run_prev, ScriptRun};
pub use shaper::TextShaper;

/// Convert a 26.6 fixed-point value (64ths of a pixel) to pixels.
pub(crate) fn fixed_to_f32(v: i32) -> f32 {
    v as f32 / 64.0
}
