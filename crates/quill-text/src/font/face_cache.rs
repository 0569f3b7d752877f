use hashbrown::HashMap;

use crate::font::Typeface;
use crate::shaping::{ShapeBackend, ShapeFace};

/// Per-typeface sub-cache of shaping face handles, keyed by font id.
///
/// Faces are created through the backend on first sight of a typeface and
/// kept until [`purge`](Self::purge). The cache deliberately holds no
/// reference to the typefaces themselves; their lifetimes are managed by the
/// host.
#[derive(Debug, Default)]
pub struct FaceCache {
    faces: HashMap<u32, ShapeFace>,
}

impl FaceCache {
    pub fn new() -> Self {
        Self {
            faces: HashMap::new(),
        }
    }

    /// Get the face handle for a typeface, creating one through the backend
    /// if this typeface has not been seen yet. Returns `None` when the
    /// backend cannot open the font data.
    pub fn face_for(
        &mut self,
        typeface: &Typeface,
        backend: &dyn ShapeBackend,
    ) -> Option<ShapeFace> {
        if let Some(face) = self.faces.get(&typeface.id()) {
            return Some(face.clone());
        }
        let face = backend.new_face(typeface)?;
        self.faces.insert(typeface.id(), face.clone());
        Some(face)
    }

    /// Drop every cached face handle.
    pub fn purge(&mut self) {
        self.faces.clear();
    }

    pub fn len(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }
}
