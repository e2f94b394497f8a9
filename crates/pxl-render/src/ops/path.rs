//! Arbitrary paths

use tiny_skia::PathBuilder;

use crate::paint::{PaintDescriptor, ShapeStyle};
use crate::{Canvas, Color, DrawOperation, Point, RenderContext, Result};

/// Path built from move/line/curve commands, filled then stroked
#[derive(Debug, Clone)]
pub struct PathOp {
    builder: PathBuilder,
    pub(crate) style: ShapeStyle,
}

impl PathOp {
    pub fn new() -> Self {
        Self {
            builder: PathBuilder::new(),
            style: ShapeStyle {
                fill: PaintDescriptor::fill(Color::TRANSPARENT).smooth_default(),
                stroke: PaintDescriptor::stroke(Color::LIME),
                blend: Default::default(),
            },
        }
    }

    pub fn move_to(&mut self, x: f32, y: f32) -> Result<&mut Self> {
        Point::new(x, y).validate("path point")?;
        self.builder.move_to(x, y);
        Ok(self)
    }

    pub fn line_to(&mut self, x: f32, y: f32) -> Result<&mut Self> {
        Point::new(x, y).validate("path point")?;
        self.builder.line_to(x, y);
        Ok(self)
    }

    pub fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) -> Result<&mut Self> {
        Point::new(x1, y1).validate("path control point")?;
        Point::new(x, y).validate("path point")?;
        self.builder.quad_to(x1, y1, x, y);
        Ok(self)
    }

    pub fn cubic_to(
        &mut self,
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        x: f32,
        y: f32,
    ) -> Result<&mut Self> {
        Point::new(x1, y1).validate("path control point")?;
        Point::new(x2, y2).validate("path control point")?;
        Point::new(x, y).validate("path point")?;
        self.builder.cubic_to(x1, y1, x2, y2, x, y);
        Ok(self)
    }

    pub fn close(&mut self) -> &mut Self {
        self.builder.close();
        self
    }
}

impl Default for PathOp {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawOperation for PathOp {
    fn name(&self) -> &'static str {
        "path"
    }

    fn commit(&mut self, canvas: &mut Canvas) -> Result<()> {
        let builder = std::mem::replace(&mut self.builder, PathBuilder::new());
        match builder.finish() {
            Some(path) => self.style.draw_path(canvas, &path),
            // Fewer than two points
            None => Ok(()),
        }
    }
}

impl RenderContext {
    /// Empty path to be built fluently
    pub fn path(&mut self) -> Result<&mut PathOp> {
        self.begin(PathOp::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triangle_fill() {
        let mut ctx = RenderContext::new(10, 10, 30).unwrap();
        ctx.path()
            .unwrap()
            .move_to(0.0, 0.0)
            .unwrap()
            .line_to(10.0, 0.0)
            .unwrap()
            .line_to(0.0, 10.0)
            .unwrap()
            .close()
            .fill()
            .solid(Color::YELLOW)
            .stroke()
            .solid(Color::TRANSPARENT);
        ctx.flush().unwrap();
        assert_eq!(ctx.canvas().pixel(1, 1), Some(Color::YELLOW));
        assert_eq!(ctx.canvas().pixel(8, 8), Some(Color::TRANSPARENT));
    }

    #[test]
    fn test_non_finite_point() {
        let mut ctx = RenderContext::new(4, 4, 30).unwrap();
        assert!(ctx.path().unwrap().line_to(f32::NAN, 0.0).is_err());
    }

    #[test]
    fn test_empty_path_is_noop() {
        let mut ctx = RenderContext::new(4, 4, 30).unwrap();
        ctx.path().unwrap();
        ctx.flush().unwrap();
        assert_eq!(ctx.commits(), 1);
    }
}
