//! Glyph run layout
//!
//! Pixel fonts need neither shaping nor line breaking: characters map to
//! glyphs through the cmap and the pen advances by the horizontal metrics.

use ttf_parser::GlyphId;

use crate::outline::GlyphOutliner;
use crate::{FontInfo, Result, TextError};

/// Style applied to a glyph run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    /// Pixel size; `None` uses the font's nominal height
    pub size: Option<f32>,
    /// Horizontal scale factor
    pub scale_x: f32,
    /// Horizontal skew (negative leans right)
    pub skew_x: f32,
    /// Round the baseline to whole pixels
    pub baseline_snap: bool,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            size: None,
            scale_x: 1.0,
            skew_x: 0.0,
            baseline_snap: false,
        }
    }
}

impl TextStyle {
    /// Effective pixel size for `font`
    pub fn size_for(&self, font: &FontInfo) -> f32 {
        self.size.unwrap_or(font.default_height())
    }

    fn validate(&self) -> Result<()> {
        if let Some(size) = self.size {
            if !size.is_finite() || size < 0.0 {
                return Err(TextError::InvalidParameter(format!("size {size}")));
            }
        }
        if !self.scale_x.is_finite() || !self.skew_x.is_finite() {
            return Err(TextError::InvalidParameter("scale/skew must be finite".into()));
        }
        Ok(())
    }
}

/// A glyph with its pen position relative to the run origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionedGlyph {
    pub glyph_id: u16,
    pub x: f32,
}

/// Laid out glyphs plus the total advance
#[derive(Debug, Clone, Default)]
pub struct GlyphRun {
    pub glyphs: Vec<PositionedGlyph>,
    pub advance: f32,
    /// Font units to pixels
    pub scale: f32,
}

/// Lay out `text` on a single line.
pub fn layout_run(font: &FontInfo, text: &str, style: &TextStyle) -> Result<GlyphRun> {
    style.validate()?;
    let face = font.face()?;
    let scale = style.size_for(font) / f32::from(face.units_per_em());

    let mut glyphs = Vec::with_capacity(text.len());
    let mut pen = 0.0f32;
    for ch in text.chars() {
        // Missing characters fall back to .notdef
        let glyph = face.glyph_index(ch).unwrap_or(GlyphId(0));
        glyphs.push(PositionedGlyph { glyph_id: glyph.0, x: pen });
        let advance = face.glyph_hor_advance(glyph).unwrap_or(0);
        pen += f32::from(advance) * scale * style.scale_x;
    }

    Ok(GlyphRun { glyphs, advance: pen, scale })
}

/// Width of `text` in pixels
pub fn measure(font: &FontInfo, text: &str, style: &TextStyle) -> Result<f32> {
    layout_run(font, text, style).map(|run| run.advance)
}

/// Outline `text` whose visual top-left corner is at (`x`, `top`).
///
/// Returns `None` when the run has no visible contours (e.g. only spaces).
pub fn outline_run(
    font: &FontInfo,
    text: &str,
    x: f32,
    top: f32,
    style: &TextStyle,
) -> Result<Option<tiny_skia::Path>> {
    let run = layout_run(font, text, style)?;
    let face = font.face()?;

    let mut baseline = font.baseline(top);
    if style.baseline_snap {
        baseline = baseline.round();
    }

    let mut outliner = GlyphOutliner::new(run.scale, style.scale_x, style.skew_x, baseline);
    for glyph in &run.glyphs {
        outliner.set_pen(x + glyph.x);
        face.outline_glyph(GlyphId(glyph.glyph_id), &mut outliner);
    }

    Ok(outliner.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FontDatabase, FontQuery};

    fn system_font() -> Option<FontInfo> {
        let db = FontDatabase::with_system_fonts();
        if db.is_empty() {
            return None;
        }
        db.query(&FontQuery::default().height(10.0)).ok()
    }

    #[test]
    fn test_default_style() {
        let style = TextStyle::default();
        assert_eq!(style.scale_x, 1.0);
        assert!(style.size.is_none());
    }

    #[test]
    fn test_measure_grows_with_text() {
        let Some(font) = system_font() else { return };
        let style = TextStyle::default();
        let short = measure(&font, "A", &style).unwrap();
        let long = measure(&font, "AAAA", &style).unwrap();
        assert!(long > short);
    }

    #[test]
    fn test_scale_x_stretches_run() {
        let Some(font) = system_font() else { return };
        let normal = measure(&font, "HELLO", &TextStyle::default()).unwrap();
        let wide = measure(&font, "HELLO", &TextStyle { scale_x: 2.0, ..Default::default() }).unwrap();
        assert!((wide - normal * 2.0).abs() < 1e-3);
    }

    #[test]
    fn test_outline_below_top() {
        let Some(font) = system_font() else { return };
        let Some(path) = outline_run(&font, "H", 0.0, 0.0, &TextStyle::default()).unwrap() else {
            return;
        };
        // Glyph sits on the baseline at top + ascent + height
        assert!(path.bounds().bottom() <= font.baseline(0.0) + 1.0);
    }

    #[test]
    fn test_negative_size_rejected() {
        let Some(font) = system_font() else { return };
        let style = TextStyle { size: Some(-1.0), ..Default::default() };
        assert!(matches!(layout_run(&font, "x", &style), Err(TextError::InvalidParameter(_))));
    }
}
