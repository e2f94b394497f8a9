//! Rectangles and the background fill

use tiny_skia::PathBuilder;

use crate::geometry::{finite, sorted_rect};
use crate::paint::{PaintDescriptor, PaintProxy, PaintRole, ShapeStyle};
use crate::{Canvas, Color, DrawOperation, RenderContext, Result};

/// Axis-aligned rectangle between two corners
#[derive(Debug, Clone)]
pub struct Rect {
    x1: f32,
    y1: f32,
    x2: f32,
    y2: f32,
    pub(crate) style: ShapeStyle,
}

impl Rect {
    pub fn from_xyxy(x1: f32, y1: f32, x2: f32, y2: f32) -> Result<Self> {
        Ok(Self {
            x1: finite("x1", x1)?,
            y1: finite("y1", y1)?,
            x2: finite("x2", x2)?,
            y2: finite("y2", y2)?,
            style: ShapeStyle {
                fill: PaintDescriptor::fill(Color::TRANSPARENT).smooth_default(),
                stroke: PaintDescriptor::stroke(Color::LIME).smooth_default(),
                blend: Default::default(),
            },
        })
    }

    pub fn from_xywh(x: f32, y: f32, width: f32, height: f32) -> Result<Self> {
        finite("width", width)?;
        finite("height", height)?;
        Self::from_xyxy(x, y, x + width, y + height)
    }

    pub fn x(&mut self, x: f32) -> Result<&mut Self> {
        let w = self.x2 - self.x1;
        self.x1 = finite("x", x)?;
        self.x2 = x + w;
        Ok(self)
    }

    pub fn y(&mut self, y: f32) -> Result<&mut Self> {
        let h = self.y2 - self.y1;
        self.y1 = finite("y", y)?;
        self.y2 = y + h;
        Ok(self)
    }

    pub fn width(&mut self, width: f32) -> Result<&mut Self> {
        self.x2 = self.x1 + finite("width", width)?;
        Ok(self)
    }

    pub fn height(&mut self, height: f32) -> Result<&mut Self> {
        self.y2 = self.y1 + finite("height", height)?;
        Ok(self)
    }

    /// Corners as (left, top, right, bottom)
    pub fn bounds(&self) -> (f32, f32, f32, f32) {
        (
            self.x1.min(self.x2),
            self.y1.min(self.y2),
            self.x1.max(self.x2),
            self.y1.max(self.y2),
        )
    }
}

impl DrawOperation for Rect {
    fn name(&self) -> &'static str {
        "rect"
    }

    fn commit(&mut self, canvas: &mut Canvas) -> Result<()> {
        let Some(rect) = sorted_rect(self.x1, self.y1, self.x2, self.y2) else {
            return Ok(());
        };
        let path = PathBuilder::from_rect(rect);
        self.style.draw_path(canvas, &path)
    }
}

impl RenderContext {
    /// Rectangle from its top-left corner and size
    pub fn rect_xywh(&mut self, x: f32, y: f32, width: f32, height: f32) -> Result<&mut Rect> {
        self.begin(Rect::from_xywh(x, y, width, height)?)
    }

    /// Rectangle from two opposite corners
    pub fn rect_xyxy(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) -> Result<&mut Rect> {
        self.begin(Rect::from_xyxy(x1, y1, x2, y2)?)
    }

    /// Full-canvas rectangle without stroke; hands back its fill paint
    pub fn background(&mut self) -> Result<PaintProxy<'_, Rect>> {
        let mut rect = Rect::from_xywh(0.0, 0.0, self.width_f(), self.height_f())?;
        rect.style.stroke = PaintDescriptor::stroke(Color::TRANSPARENT);
        let rect = self.begin(rect)?;
        Ok(PaintProxy::new(rect, PaintRole::Fill))
    }
}
