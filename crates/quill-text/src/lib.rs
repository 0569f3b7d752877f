//! quill-text: a text-layout cache and shaping pipeline.
//!
//! Given a styled run (UTF-16 context, shaping window, direction hint and
//! paint), the engine produces its measured glyph sequence: per-cluster
//! advances, glyph ids and positions in visual order, and the total advance.
//! Results are cached in a byte-accounted LRU keyed by the run's semantic
//! fingerprint, so repeated draws of the same run skip bidi analysis,
//! normalisation, script splitting and shaping entirely.
//!
//! ```no_run
//! use std::sync::Arc;
//! use quill_text::{Paint, SystemFontHost, TextDirection, TextLayoutEngine};
//!
//! let host = Arc::new(SystemFontHost::new()?);
//! let engine = TextLayoutEngine::new(host);
//! let text: Vec<u16> = "Hello".encode_utf16().collect();
//! let paint = Paint::default();
//! if let Some(value) = engine.get_value(&paint, &text, 0, 5, 5, TextDirection::Ltr) {
//!     println!("width = {}", value.total_advance());
//! }
//! # Ok::<(), quill_text::FontError>(())
//! ```

pub mod bidi;
pub mod config;
pub mod engine;
pub mod font;
pub mod layout;
pub mod paint;
pub mod shaping;
pub mod unicode;

#[cfg(test)]
pub(crate) mod testutil;

pub use bidi::TextDirection;
pub use config::{EngineConfig, DEBUG_CACHES};
pub use engine::{global, install_global, TextLayoutEngine};
pub use font::{FaceCache, FontError, FontHost, SystemFontHost, Typeface, TypefaceStyle};
pub use layout::{GlyphPosition, LayoutKey, LayoutValue, TextLayoutCache};
pub use paint::{FontVariant, Hinting, Paint};
pub use shaping::{RustybuzzBackend, ShapeBackend, ShapeFace, ShapeItem, TextShaper};
