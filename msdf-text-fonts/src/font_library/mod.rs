//! Font discovery and loading.
//!
//! [`FontLibrary`] is the entry point of the outline provider: it owns the
//! font database used for system lookups and hands out [`FontFace`]s loaded
//! from files, raw bytes or installed families. Faces are independent of the
//! library once loaded and are released on drop.

mod face;
mod memory;

use std::path::Path;

use fontdb::Database;

use crate::error::FontLoadError;

pub use face::FontFace;
pub use memory::MemoryFont;

/// Loads font faces for atlas construction.
pub struct FontLibrary {
    /// Font database for system font queries
    font_db: Database,
    /// Whether system fonts have been scanned into `font_db`
    system_fonts_loaded: bool,
}

impl Default for FontLibrary {
    fn default() -> Self {
        Self::new()
    }
}

impl FontLibrary {
    /// Create an empty library. System fonts are scanned lazily on the first
    /// [`load_system_font`](Self::load_system_font) call.
    pub fn new() -> Self {
        FontLibrary {
            font_db: Database::new(),
            system_fonts_loaded: false,
        }
    }

    /// Load face 0 of the font file at `path`.
    pub fn load_font(&self, path: &Path) -> Result<FontFace, FontLoadError> {
        log::info!("Loading font file {:?}", path);
        let data = std::fs::read(path).map_err(|source| FontLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "font".to_string());
        FontFace::from_data(data, 0, name)
    }

    /// Load a face from raw bytes.
    pub fn load_font_data(&self, data: Vec<u8>, index: u32) -> Result<FontFace, FontLoadError> {
        FontFace::from_data(data, index, format!("memory font #{}", index))
    }

    /// Load the regular face of an installed font family.
    pub fn load_system_font(&mut self, family: &str) -> Result<FontFace, FontLoadError> {
        if !self.system_fonts_loaded {
            self.font_db.load_system_fonts();
            self.system_fonts_loaded = true;
            log::info!("Loaded {} system fonts", self.font_db.len());
        }

        let families = [fontdb::Family::Name(family)];
        let query = fontdb::Query {
            families: &families,
            weight: fontdb::Weight::NORMAL,
            stretch: fontdb::Stretch::Normal,
            style: fontdb::Style::Normal,
        };
        let face_id = self
            .font_db
            .query(&query)
            .ok_or_else(|| FontLoadError::NotFound(family.to_string()))?;

        let loaded = self
            .font_db
            .with_face_data(face_id, |data, index| {
                FontFace::from_data(data.to_vec(), index, family)
            })
            .ok_or_else(|| FontLoadError::NotFound(family.to_string()))?;

        match &loaded {
            Ok(_) => log::info!("Successfully loaded system font: {}", family),
            Err(e) => log::warn!("System font '{}' could not be parsed: {}", family, e),
        }
        loaded
    }

    /// Number of faces known to the database
    pub fn font_count(&self) -> usize {
        self.font_db.len()
    }
}
