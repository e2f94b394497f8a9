//! PXL Text - Fonts and Glyph Runs
//!
//! This crate provides the text side of the PXL rendering core:
//! - Font descriptors with the nominal pixel height and ascent correction
//!   used to place text by its visual top-left corner
//! - Font loading from memory, files and the system font database (fontdb)
//! - Glyph run layout and outlining into tiny-skia paths (ttf-parser)

pub mod font;
pub mod layout;
pub mod outline;

pub use font::{FontDatabase, FontInfo, FontQuery};
pub use layout::{GlyphRun, PositionedGlyph, TextStyle, layout_run, measure, outline_run};
pub use outline::GlyphOutliner;

/// Text error types
#[derive(Debug, Clone, thiserror::Error)]
pub enum TextError {
    #[error("Font not found: {0}")]
    FontNotFound(String),

    #[error("Failed to parse font '{name}': {reason}")]
    FontParsing { name: String, reason: String },

    #[error("Invalid text parameter: {0}")]
    InvalidParameter(String),
}

pub type Result<T> = std::result::Result<T, TextError>;
