use std::path::Path;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use hashbrown::HashMap;
use parking_lot::RwLock;
use swash::FontRef;
use tracing::debug;
use unicode_script::Script;

use crate::font::{FontError, FontHost, Result, Typeface, TypefaceStyle};

/// Font host backed by the system font database.
///
/// Serves one default face and answers units-per-em queries through `swash`.
/// This host carries no per-script fallback database, so
/// `typeface_for_script` reports none and the pipeline falls back to the
/// default typeface; richer embedders supply their own [`FontHost`]
/// implementation.
pub struct SystemFontHost {
    default: Arc<Typeface>,
    units_per_em: RwLock<HashMap<u32, u32>>,
    next_id: AtomicU32,
}

impl SystemFontHost {
    /// Host using the platform's generic sans-serif face.
    ///
    /// The `QUILL_TEXT_FONT` environment variable, when set to a font file
    /// path, overrides the system lookup.
    pub fn new() -> Result<Self> {
        Self::with_families(&[])
    }

    /// Host preferring the given family names, tried in order before the
    /// generic sans-serif face. The `QUILL_TEXT_FONT` override applies here
    /// too.
    pub fn with_families(preferred: &[&str]) -> Result<Self> {
        use fontdb::{Database, Family, Query, Stretch, Style, Weight};

        if let Ok(path) = std::env::var("QUILL_TEXT_FONT") {
            debug!(path = %path, "default typeface overridden from environment");
            return Self::from_file(path);
        }

        let mut db = Database::new();
        db.load_system_fonts();

        let mut families: Vec<Family> = preferred.iter().copied().map(Family::Name).collect();
        families.push(Family::SansSerif);
        let id = db
            .query(&Query {
                families: &families,
                weight: Weight::NORMAL,
                stretch: Stretch::Normal,
                style: Style::Normal,
            })
            .ok_or(FontError::NoSystemFont)?;
        let (bytes, index) = db
            .with_face_data(id, |data, index| (data.to_vec(), index))
            .ok_or(FontError::NoSystemFont)?;
        Self::from_parts(bytes, index)
    }

    /// Host whose default typeface comes from a font file on disk.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::from_parts(bytes, 0)
    }

    fn from_parts(bytes: Vec<u8>, index: u32) -> Result<Self> {
        let mut host = Self {
            default: Arc::new(Typeface::new(
                0,
                TypefaceStyle::Normal,
                Arc::from(bytes),
                index,
            )),
            units_per_em: RwLock::new(HashMap::new()),
            next_id: AtomicU32::new(1),
        };
        host.default = host.register(host.default.clone())?;
        Ok(host)
    }

    /// Record a typeface with this host, assigning it a fresh id and reading
    /// its units-per-em. Embedders can use this to hand application fonts to
    /// paints while keeping units-per-em lookups working.
    pub fn register(&self, typeface: Arc<Typeface>) -> Result<Arc<Typeface>> {
        let data = typeface.data();
        let font =
            FontRef::from_index(&data, typeface.index() as usize).ok_or(FontError::InvalidFont)?;
        let upem = font.metrics(&[]).units_per_em as u32;
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.units_per_em.write().insert(id, upem);
        Ok(Arc::new(Typeface::new(
            id,
            typeface.style(),
            data,
            typeface.index(),
        )))
    }
}

impl FontHost for SystemFontHost {
    fn default_typeface(&self) -> Arc<Typeface> {
        self.default.clone()
    }

    fn typeface_for_script(&self, _script: Script, _style: TypefaceStyle) -> Option<Arc<Typeface>> {
        None
    }

    fn units_per_em(&self, font_id: u32) -> u32 {
        self.units_per_em
            .read()
            .get(&font_id)
            .copied()
            .unwrap_or(0)
    }

    fn base_glyph_count(&self, _first: char) -> u32 {
        0
    }
}
