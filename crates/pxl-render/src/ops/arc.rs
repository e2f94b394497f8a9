//! Pie-wedge arcs

use std::f32::consts::PI;

use tiny_skia::{Path, PathBuilder};

use crate::geometry::{finite, non_negative};
use crate::paint::{PaintDescriptor, ShapeStyle};
use crate::{Canvas, Color, DrawOperation, RenderContext, Result};

/// Wedge of the oval inscribed in (x, y, width, height): center, arc, close.
///
/// Angles are in degrees, clockwise from the positive x axis.
#[derive(Debug, Clone)]
pub struct Arc {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    start_angle: f32,
    sweep_angle: f32,
    pub(crate) style: ShapeStyle,
}

impl Arc {
    pub fn new(
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        start_angle: f32,
        sweep_angle: f32,
    ) -> Result<Self> {
        Ok(Self {
            x: finite("x", x)?,
            y: finite("y", y)?,
            width: non_negative("width", width)?,
            height: non_negative("height", height)?,
            start_angle: finite("start angle", start_angle)?,
            sweep_angle: finite("sweep angle", sweep_angle)?,
            style: ShapeStyle {
                fill: PaintDescriptor::fill(Color::TRANSPARENT).smooth_default(),
                stroke: PaintDescriptor::stroke(Color::LIME),
                blend: Default::default(),
            },
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

    pub fn width(&mut self, width: f32) -> Result<&mut Self> {
        self.width = non_negative("width", width)?;
        Ok(self)
    }

    pub fn height(&mut self, height: f32) -> Result<&mut Self> {
        self.height = non_negative("height", height)?;
        Ok(self)
    }

    pub fn start_angle(&mut self, degrees: f32) -> Result<&mut Self> {
        self.start_angle = finite("start angle", degrees)?;
        Ok(self)
    }

    pub fn sweep_angle(&mut self, degrees: f32) -> Result<&mut Self> {
        self.sweep_angle = finite("sweep angle", degrees)?;
        Ok(self)
    }

    fn path(&self) -> Option<Path> {
        let (rx, ry) = (self.width / 2.0, self.height / 2.0);
        let (cx, cy) = (self.x + rx, self.y + ry);
        let sweep = self.sweep_angle.clamp(-360.0, 360.0).to_radians();
        let start = self.start_angle.to_radians();

        let at = |a: f32| (cx + rx * a.cos(), cy + ry * a.sin());

        let mut pb = PathBuilder::new();
        pb.move_to(cx, cy);
        let (sx, sy) = at(start);
        pb.line_to(sx, sy);

        // One cubic per quarter turn at most
        let segments = (sweep.abs() / (PI / 2.0)).ceil().max(1.0) as usize;
        let step = sweep / segments as f32;
        let k = 4.0 / 3.0 * (step / 4.0).tan();
        let mut a0 = start;
        for _ in 0..segments {
            let a1 = a0 + step;
            let (x0, y0) = at(a0);
            let (x1, y1) = at(a1);
            pb.cubic_to(
                x0 - k * rx * a0.sin(),
                y0 + k * ry * a0.cos(),
                x1 + k * rx * a1.sin(),
                y1 - k * ry * a1.cos(),
                x1,
                y1,
            );
            a0 = a1;
        }
        pb.close();
        pb.finish()
    }
}

impl DrawOperation for Arc {
    fn name(&self) -> &'static str {
        "arc"
    }

    fn commit(&mut self, canvas: &mut Canvas) -> Result<()> {
        match self.path() {
            Some(path) => self.style.draw_path(canvas, &path),
            None => Ok(()),
        }
    }
}

impl RenderContext {
    /// Wedge of the oval bounded by (x, y, width, height)
    pub fn arc(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        start_angle: f32,
        sweep_angle: f32,
    ) -> Result<&mut Arc> {
        self.begin(Arc::new(x, y, width, height, start_angle, sweep_angle)?)
    }

    /// Wedge of the circle around (center_x, center_y)
    pub fn arc_center(
        &mut self,
        center_x: f32,
        center_y: f32,
        radius: f32,
        start_angle: f32,
        sweep_angle: f32,
    ) -> Result<&mut Arc> {
        non_negative("radius", radius)?;
        self.arc(
            center_x - radius,
            center_y - radius,
            radius * 2.0,
            radius * 2.0,
            start_angle,
            sweep_angle,
        )
    }
}
