//! Single pixels

use tiny_skia::Rect;

use crate::geometry::{finite, non_negative};
use crate::paint::{PaintDescriptor, PaintProxy, PaintRole, Styled};
use crate::{BlendMode, Canvas, Color, DrawOperation, RenderContext, Result};

/// Stroke-painted point covering the pixel cell under (x, y).
///
/// Wider strokes grow the square from that cell's top-left corner.
#[derive(Debug, Clone)]
pub struct Point {
    x: f32,
    y: f32,
    stroke: PaintDescriptor,
    blend: BlendMode,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Result<Self> {
        Ok(Self {
            x: finite("x", x)?,
            y: finite("y", y)?,
            stroke: PaintDescriptor::stroke(Color::LIME),
            blend: BlendMode::SourceOver,
        })
    }

    pub fn x(&mut self, x: f32) -> Result<&mut Self> {
        self.x = finite("x", x)?;
        Ok(self)
    }

    pub fn y(&mut self, y: f32) -> Result<&mut Self> {
        self.y = finite("y", y)?;
        Ok(self)
    }

    pub fn stroke(&mut self) -> PaintProxy<'_, Self> {
        PaintProxy::new(self, PaintRole::Stroke)
    }

    pub fn blend(&mut self, blend: BlendMode) -> &mut Self {
        self.blend = blend;
        self
    }
}

impl Styled for Point {
    fn paint_mut(&mut self, _role: PaintRole) -> &mut PaintDescriptor {
        &mut self.stroke
    }
}

impl DrawOperation for Point {
    fn name(&self) -> &'static str {
        "point"
    }

    fn commit(&mut self, canvas: &mut Canvas) -> Result<()> {
        let paint = self.stroke.resolve(canvas.width(), canvas.height())?;
        if !paint.is_visible() {
            return Ok(());
        }
        let size = paint.width().max(1.0);
        if let Some(cell) = Rect::from_xywh(self.x.floor(), self.y.floor(), size, size) {
            let mut skia = paint.to_skia(self.blend);
            skia.anti_alias = false;
            canvas.fill_rect(cell, &skia);
        }
        Ok(())
    }
}

/// Plain-colored pixel, or a `size`×`size` square for sizes above one
#[derive(Debug, Clone)]
pub struct Pxl {
    x: f32,
    y: f32,
    color: Color,
    size: f32,
    blend: BlendMode,
}

impl Pxl {
    pub fn new(x: f32, y: f32) -> Result<Self> {
        Ok(Self {
            x: finite("x", x)?,
            y: finite("y", y)?,
            color: Color::LIME,
            size: 1.0,
            blend: BlendMode::SourceOver,
        })
    }

    pub fn x(&mut self, x: f32) -> Result<&mut Self> {
        self.x = finite("x", x)?;
        Ok(self)
    }

    pub fn y(&mut self, y: f32) -> Result<&mut Self> {
        self.y = finite("y", y)?;
        Ok(self)
    }

    pub fn color(&mut self, color: Color) -> &mut Self {
        self.color = color;
        self
    }

    pub fn size(&mut self, size: f32) -> Result<&mut Self> {
        self.size = non_negative("size", size)?;
        Ok(self)
    }

    pub fn blend(&mut self, blend: BlendMode) -> &mut Self {
        self.blend = blend;
        self
    }
}

impl DrawOperation for Pxl {
    fn name(&self) -> &'static str {
        "pxl"
    }

    fn commit(&mut self, canvas: &mut Canvas) -> Result<()> {
        if self.color.a == 0 {
            return Ok(());
        }
        let rect = if self.size <= 1.0 {
            Rect::from_xywh(self.x.floor(), self.y.floor(), 1.0, 1.0)
        } else {
            Rect::from_xywh(self.x, self.y, self.size, self.size)
        };
        let Some(rect) = rect else {
            return Ok(());
        };

        let mut paint = tiny_skia::Paint::default();
        paint.set_color(self.color.to_skia());
        paint.blend_mode = self.blend.to_skia();
        paint.anti_alias = false;
        canvas.fill_rect(rect, &paint);
        Ok(())
    }
}

impl RenderContext {
    /// Point painted with its stroke paint
    pub fn point(&mut self, x: f32, y: f32) -> Result<&mut Point> {
        self.begin(Point::new(x, y)?)
    }

    /// Single pixel in a plain color
    pub fn pxl(&mut self, x: f32, y: f32) -> Result<&mut Pxl> {
        self.begin(Pxl::new(x, y)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_fills_one_cell() {
        let mut ctx = RenderContext::new(4, 4, 30).unwrap();
        ctx.point(1.0, 2.0).unwrap().stroke().solid(Color::RED);
        ctx.flush().unwrap();
        assert_eq!(ctx.canvas().pixel(1, 2), Some(Color::RED));
        assert_eq!(ctx.canvas().pixel(0, 2), Some(Color::TRANSPARENT));
        assert_eq!(ctx.canvas().pixel(2, 2), Some(Color::TRANSPARENT));
        assert_eq!(ctx.canvas().pixel(1, 1), Some(Color::TRANSPARENT));
    }

    #[test]
    fn test_wide_point() {
        let mut ctx = RenderContext::new(4, 4, 30).unwrap();
        ctx.point(0.0, 0.0).unwrap().stroke().width(2.0).unwrap().solid(Color::BLUE);
        ctx.flush().unwrap();
        assert_eq!(ctx.canvas().pixel(1, 1), Some(Color::BLUE));
        assert_eq!(ctx.canvas().pixel(2, 2), Some(Color::TRANSPARENT));
    }

    #[test]
    fn test_pxl_sizes() {
        let mut ctx = RenderContext::new(6, 6, 30).unwrap();
        ctx.pxl(0.0, 0.0).unwrap().color(Color::RED);
        ctx.pxl(2.0, 2.0).unwrap().color(Color::BLUE).size(3.0).unwrap();
        ctx.flush().unwrap();
        assert_eq!(ctx.canvas().pixel(0, 0), Some(Color::RED));
        assert_eq!(ctx.canvas().pixel(1, 0), Some(Color::TRANSPARENT));
        assert_eq!(ctx.canvas().pixel(4, 4), Some(Color::BLUE));
        assert_eq!(ctx.canvas().pixel(5, 5), Some(Color::TRANSPARENT));
    }

    #[test]
    fn test_transparent_point_skipped() {
        let mut ctx = RenderContext::new(2, 2, 30).unwrap();
        ctx.clear(Color::WHITE).unwrap();
        ctx.point(0.0, 0.0).unwrap().stroke().solid(Color::TRANSPARENT);
        ctx.flush().unwrap();
        assert_eq!(ctx.canvas().pixel(0, 0), Some(Color::WHITE));
    }
}
