pub mod face_cache;
pub mod host;
pub mod system;
pub mod typeface;

pub use face_cache::FaceCache;
pub use host::FontHost;
pub use system::SystemFontHost;
pub use typeface::{Typeface, TypefaceStyle};

use thiserror::Error;

/// Errors that can occur while working with fonts.
#[derive(Debug, Error)]
pub enum FontError {
    #[error("font I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid font data")]
    InvalidFont,
    #[error("no usable system font found")]
    NoSystemFont,
}

/// Convenient result alias for font-related operations.
pub type Result<T> = std::result::Result<T, FontError>;
