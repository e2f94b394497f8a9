//! Font descriptors and the font database

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use fontdb::{Database, Family};

use crate::{Result, TextError};

/// A loaded typeface plus the metrics PXL uses to position text.
///
/// `default_height` is the nominal pixel size the face was designed for and
/// `default_ascent` a per-font correction (usually zero or negative). Text is
/// drawn with its baseline at `top + default_ascent + default_height`, so
/// callers place text by its visual top-left corner.
#[derive(Clone)]
pub struct FontInfo {
    name: Arc<str>,
    data: Arc<Vec<u8>>,
    index: u32,
    default_height: f32,
    default_ascent: f32,
}

impl FontInfo {
    /// Create a font from raw font file bytes.
    ///
    /// The face is parsed once here so a broken font fails at load time.
    pub fn from_bytes(
        name: &str,
        data: Vec<u8>,
        index: u32,
        default_height: f32,
        default_ascent: f32,
    ) -> Result<Self> {
        if !default_height.is_finite() || default_height <= 0.0 {
            return Err(TextError::InvalidParameter(format!(
                "default height must be positive, got {default_height}"
            )));
        }
        if !default_ascent.is_finite() {
            return Err(TextError::InvalidParameter(format!(
                "default ascent must be finite, got {default_ascent}"
            )));
        }

        ttf_parser::Face::parse(&data, index).map_err(|e| TextError::FontParsing {
            name: name.to_string(),
            reason: e.to_string(),
        })?;

        tracing::debug!(font = name, bytes = data.len(), "loaded font");

        Ok(Self {
            name: Arc::from(name),
            data: Arc::new(data),
            index,
            default_height,
            default_ascent,
        })
    }

    /// Load a font file from disk.
    pub fn from_file(path: &Path, default_height: f32, default_ascent: f32) -> Result<Self> {
        let data = std::fs::read(path)
            .map_err(|e| TextError::FontNotFound(format!("{}: {e}", path.display())))?;
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("font")
            .to_string();
        Self::from_bytes(&name, data, 0, default_height, default_ascent)
    }

    /// Font name (file stem or family name)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw font data
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Face index within a font collection
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Nominal pixel height
    pub fn default_height(&self) -> f32 {
        self.default_height
    }

    /// Ascent correction
    pub fn default_ascent(&self) -> f32 {
        self.default_ascent
    }

    /// Baseline for text whose visual top edge is at `top`.
    pub fn baseline(&self, top: f32) -> f32 {
        top + self.default_ascent + self.default_height
    }

    /// Parse the face for glyph lookup.
    pub fn face(&self) -> Result<ttf_parser::Face<'_>> {
        ttf_parser::Face::parse(&self.data, self.index).map_err(|e| TextError::FontParsing {
            name: self.name.to_string(),
            reason: e.to_string(),
        })
    }
}

impl fmt::Debug for FontInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontInfo")
            .field("name", &self.name)
            .field("index", &self.index)
            .field("bytes", &self.data.len())
            .field("default_height", &self.default_height)
            .field("default_ascent", &self.default_ascent)
            .finish()
    }
}

impl PartialEq for FontInfo {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
            && self.index == other.index
            && self.default_height == other.default_height
            && self.default_ascent == other.default_ascent
    }
}

/// Font query for matching
#[derive(Debug, Clone)]
pub struct FontQuery {
    /// Font families to try (in order)
    pub families: Vec<String>,
    /// Nominal pixel height for the resulting `FontInfo`
    pub height: f32,
    /// Ascent correction for the resulting `FontInfo`
    pub ascent: f32,
}

impl FontQuery {
    /// Create a new font query
    pub fn new(families: &[&str]) -> Self {
        Self {
            families: families.iter().map(|s| s.to_string()).collect(),
            height: 8.0,
            ascent: 0.0,
        }
    }

    /// Set the nominal pixel height
    pub fn height(mut self, height: f32) -> Self {
        self.height = height;
        self
    }

    /// Set the ascent correction
    pub fn ascent(mut self, ascent: f32) -> Self {
        self.ascent = ascent;
        self
    }
}

impl Default for FontQuery {
    fn default() -> Self {
        Self::new(&["monospace"])
    }
}

fn to_family(name: &str) -> Family<'_> {
    match name.to_ascii_lowercase().as_str() {
        "serif" => Family::Serif,
        "sans-serif" => Family::SansSerif,
        "monospace" => Family::Monospace,
        "cursive" => Family::Cursive,
        "fantasy" => Family::Fantasy,
        _ => Family::Name(name),
    }
}

/// Font database for loading and matching fonts
pub struct FontDatabase {
    db: Database,
}

impl FontDatabase {
    /// Create a new empty font database
    pub fn new() -> Self {
        Self { db: Database::new() }
    }

    /// Create a font database with system fonts loaded
    pub fn with_system_fonts() -> Self {
        let mut db = Database::new();
        db.load_system_fonts();
        tracing::debug!(faces = db.len(), "loaded system fonts");
        Self { db }
    }

    /// Load a font from memory
    pub fn load_font_data(&mut self, data: Vec<u8>) {
        self.db.load_font_data(data);
    }

    /// Resolve a query into a `FontInfo`.
    pub fn query(&self, query: &FontQuery) -> Result<FontInfo> {
        let families: Vec<Family<'_>> = query.families.iter().map(|f| to_family(f)).collect();
        let id = self
            .db
            .query(&fontdb::Query {
                families: &families,
                ..Default::default()
            })
            .ok_or_else(|| TextError::FontNotFound(query.families.join(", ")))?;

        let name = self
            .db
            .face(id)
            .and_then(|face| face.families.first().map(|(name, _)| name.clone()))
            .unwrap_or_else(|| query.families.join(", "));

        let (data, index) = self
            .db
            .with_face_data(id, |data, index| (data.to_vec(), index))
            .ok_or_else(|| TextError::FontNotFound(name.clone()))?;

        FontInfo::from_bytes(&name, data, index, query.height, query.ascent)
    }

    /// Number of loaded fonts
    pub fn len(&self) -> usize {
        self.db.len()
    }

    /// Check if database is empty
    pub fn is_empty(&self) -> bool {
        self.db.len() == 0
    }
}

impl Default for FontDatabase {
    fn default() -> Self {
        Self::new()
    }
}
