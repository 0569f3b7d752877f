pub mod cache;
pub mod key;
pub mod value;

pub use cache::TextLayoutCache;
pub use key::LayoutKey;
pub use value::{GlyphPosition, LayoutValue};
