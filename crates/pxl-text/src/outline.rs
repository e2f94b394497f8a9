//! Glyph outlining into tiny-skia paths

use ttf_parser::OutlineBuilder;

/// Converts ttf-parser outlines to a single tiny-skia path.
///
/// Font units are scaled to pixels, the Y axis is flipped around the
/// baseline and an optional horizontal scale and skew are applied. Several
/// glyphs can be appended by moving the pen between `outline_glyph` calls.
pub struct GlyphOutliner {
    builder: tiny_skia::PathBuilder,
    scale: f32,
    scale_x: f32,
    skew_x: f32,
    pen_x: f32,
    baseline: f32,
}

impl GlyphOutliner {
    pub fn new(scale: f32, scale_x: f32, skew_x: f32, baseline: f32) -> Self {
        Self {
            builder: tiny_skia::PathBuilder::new(),
            scale,
            scale_x,
            skew_x,
            pen_x: 0.0,
            baseline,
        }
    }

    /// Move the pen to the origin of the next glyph
    pub fn set_pen(&mut self, x: f32) {
        self.pen_x = x;
    }

    fn transform_x(&self, x: f32, y: f32) -> f32 {
        self.pen_x + x * self.scale * self.scale_x - self.skew_x * y * self.scale
    }

    fn transform_y(&self, y: f32) -> f32 {
        self.baseline - y * self.scale // Flip Y axis
    }

    /// Finish the path; `None` when no glyph produced any contour
    pub fn finish(self) -> Option<tiny_skia::Path> {
        self.builder.finish()
    }
}

impl OutlineBuilder for GlyphOutliner {
    fn move_to(&mut self, x: f32, y: f32) {
        self.builder.move_to(self.transform_x(x, y), self.transform_y(y));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.builder.line_to(self.transform_x(x, y), self.transform_y(y));
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.builder.quad_to(
            self.transform_x(x1, y1), self.transform_y(y1),
            self.transform_x(x, y), self.transform_y(y),
        );
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.builder.cubic_to(
            self.transform_x(x1, y1), self.transform_y(y1),
            self.transform_x(x2, y2), self.transform_y(y2),
            self.transform_x(x, y), self.transform_y(y),
        );
    }

    fn close(&mut self) {
        self.builder.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outline_square() {
        // 1000 units/em at 10px => scale 0.01
        let mut outliner = GlyphOutliner::new(0.01, 1.0, 0.0, 10.0);
        outliner.set_pen(2.0);
        outliner.move_to(0.0, 0.0);
        outliner.line_to(500.0, 0.0);
        outliner.line_to(500.0, 500.0);
        outliner.line_to(0.0, 500.0);
        outliner.close();

        let path = outliner.finish().unwrap();
        let bounds = path.bounds();
        assert!((bounds.left() - 2.0).abs() < 1e-4);
        assert!((bounds.right() - 7.0).abs() < 1e-4);
        assert!((bounds.top() - 5.0).abs() < 1e-4);
        assert!((bounds.bottom() - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_empty_outline() {
        let outliner = GlyphOutliner::new(1.0, 1.0, 0.0, 0.0);
        assert!(outliner.finish().is_none());
    }
}
