//! Circles

use tiny_skia::PathBuilder;

use crate::geometry::{finite, non_negative};
use crate::paint::{PaintDescriptor, ShapeStyle};
use crate::{Canvas, Color, DrawOperation, Point, RenderContext, Result};

/// Circle; filled lime with no stroke until configured
#[derive(Debug, Clone)]
pub struct Circle {
    center: Point,
    radius: f32,
    pub(crate) style: ShapeStyle,
}

impl Circle {
    pub fn new(center_x: f32, center_y: f32, radius: f32) -> Result<Self> {
        Ok(Self {
            center: Point::new(finite("center x", center_x)?, finite("center y", center_y)?),
            radius: non_negative("radius", radius)?,
            style: ShapeStyle {
                fill: PaintDescriptor::fill(Color::LIME).smooth_default(),
                stroke: PaintDescriptor::stroke(Color::TRANSPARENT),
                blend: Default::default(),
            },
        })
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn center_x(&mut self, x: f32) -> Result<&mut Self> {
        self.center.x = finite("center x", x)?;
        Ok(self)
    }

    pub fn center_y(&mut self, y: f32) -> Result<&mut Self> {
        self.center.y = finite("center y", y)?;
        Ok(self)
    }

    pub fn radius(&mut self, radius: f32) -> Result<&mut Self> {
        self.radius = non_negative("radius", radius)?;
        Ok(self)
    }
}

impl DrawOperation for Circle {
    fn name(&self) -> &'static str {
        "circle"
    }

    fn commit(&mut self, canvas: &mut Canvas) -> Result<()> {
        if self.radius == 0.0 {
            return Ok(());
        }
        let Some(path) = PathBuilder::from_circle(self.center.x, self.center.y, self.radius) else {
            return Ok(());
        };
        self.style.draw_path(canvas, &path)
    }
}

impl RenderContext {
    pub fn circle(&mut self, center_x: f32, center_y: f32, radius: f32) -> Result<&mut Circle> {
        self.begin(Circle::new(center_x, center_y, radius)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RenderError;

    #[test]
    fn test_negative_radius() {
        let mut ctx = RenderContext::new(8, 8, 30).unwrap();
        assert!(matches!(ctx.circle(4.0, 4.0, -1.0), Err(RenderError::InvalidParameter(_))));
        let circle = ctx.circle(4.0, 4.0, 1.0).unwrap();
        assert!(circle.radius(f32::INFINITY).is_err());
    }

    #[test]
    fn test_default_fill_is_lime() {
        let mut ctx = RenderContext::new(9, 9, 30).unwrap();
        ctx.circle(4.5, 4.5, 3.0).unwrap();
        ctx.flush().unwrap();
        assert_eq!(ctx.canvas().pixel(4, 4), Some(Color::LIME));
        assert_eq!(ctx.canvas().pixel(0, 0), Some(Color::TRANSPARENT));
    }

    #[test]
    fn test_zero_radius_draws_nothing() {
        let mut ctx = RenderContext::new(4, 4, 30).unwrap();
        ctx.circle(2.0, 2.0, 0.0).unwrap();
        let bytes = ctx.export_rgba().unwrap();
        assert!(bytes.iter().all(|&b| b == 0));
    }
}
