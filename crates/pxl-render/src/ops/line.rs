//! Straight lines

use tiny_skia::PathBuilder;

use crate::geometry::finite;
use crate::paint::{PaintDescriptor, ShapeStyle};
use crate::{Canvas, Color, DrawOperation, Point, RenderContext, Result};

/// Stroked segment; lime, 1px, aliased by default
#[derive(Debug, Clone)]
pub struct Line {
    from: Point,
    to: Point,
    pub(crate) style: ShapeStyle,
}

impl Line {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Result<Self> {
        Ok(Self {
            from: Point::new(finite("x1", x1)?, finite("y1", y1)?),
            to: Point::new(finite("x2", x2)?, finite("y2", y2)?),
            style: ShapeStyle {
                fill: PaintDescriptor::fill(Color::TRANSPARENT),
                stroke: PaintDescriptor::stroke(Color::LIME),
                blend: Default::default(),
            },
        })
    }

    pub fn start(&mut self, x: f32, y: f32) -> Result<&mut Self> {
        self.from = Point::new(x, y).validate("line start")?;
        Ok(self)
    }

    pub fn end(&mut self, x: f32, y: f32) -> Result<&mut Self> {
        self.to = Point::new(x, y).validate("line end")?;
        Ok(self)
    }

    pub fn color(&mut self, color: Color) -> &mut Self {
        self.style.stroke.set_solid(color);
        self
    }

    pub fn thickness(&mut self, thickness: f32) -> Result<&mut Self> {
        self.style.stroke.set_width(thickness)?;
        Ok(self)
    }

    pub fn anti_alias(&mut self, anti_alias: bool) -> &mut Self {
        self.style.stroke.set_anti_alias(anti_alias);
        self
    }
}

impl DrawOperation for Line {
    fn name(&self) -> &'static str {
        "line"
    }

    fn commit(&mut self, canvas: &mut Canvas) -> Result<()> {
        let mut pb = PathBuilder::new();
        pb.move_to(self.from.x, self.from.y);
        pb.line_to(self.to.x, self.to.y);
        match pb.finish() {
            Some(path) => self.style.draw_path(canvas, &path),
            None => Ok(()),
        }
    }
}

impl RenderContext {
    pub fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) -> Result<&mut Line> {
        self.begin(Line::new(x1, y1, x2, y2)?)
    }
}
