//! Text runs

use pxl_text::{TextError, TextStyle};

use crate::geometry::{finite, non_negative};
use crate::paint::{PaintDescriptor, ShapeStyle};
use crate::{Canvas, Color, DrawOperation, FontInfo, RenderContext, Result};

/// Glyph edge treatment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Edging {
    /// Hard pixel edges
    #[default]
    Alias,
    AntiAlias,
}

/// Single-line glyph run placed by its visual top-left corner
#[derive(Debug, Clone)]
pub struct Text {
    text: String,
    x: f32,
    y: f32,
    font: FontInfo,
    text_style: TextStyle,
    embolden: bool,
    pub(crate) style: ShapeStyle,
}

impl Text {
    pub fn new(text: impl Into<String>, x: f32, y: f32, font: FontInfo) -> Result<Self> {
        Ok(Self {
            text: text.into(),
            x: finite("x", x)?,
            y: finite("y", y)?,
            font,
            text_style: TextStyle::default(),
            embolden: false,
            style: ShapeStyle {
                fill: PaintDescriptor::fill(Color::WHITE),
                stroke: PaintDescriptor::stroke(Color::TRANSPARENT),
                blend: Default::default(),
            },
        })
    }

    pub fn text(&mut self, text: impl Into<String>) -> &mut Self {
        self.text = text.into();
        self
    }

    pub fn x(&mut self, x: f32) -> Result<&mut Self> {
        self.x = finite("x", x)?;
        Ok(self)
    }

    pub fn y(&mut self, y: f32) -> Result<&mut Self> {
        self.y = finite("y", y)?;
        Ok(self)
    }

    /// Pixel size; the font's nominal height when unset
    pub fn size(&mut self, size: f32) -> Result<&mut Self> {
        self.text_style.size = Some(non_negative("text size", size)?);
        Ok(self)
    }

    pub fn scale_x(&mut self, scale_x: f32) -> Result<&mut Self> {
        self.text_style.scale_x = finite("scale x", scale_x)?;
        Ok(self)
    }

    pub fn skew_x(&mut self, skew_x: f32) -> Result<&mut Self> {
        self.text_style.skew_x = finite("skew x", skew_x)?;
        Ok(self)
    }

    pub fn embolden(&mut self, embolden: bool) -> &mut Self {
        self.embolden = embolden;
        self
    }

    pub fn baseline_snap(&mut self, snap: bool) -> &mut Self {
        self.text_style.baseline_snap = snap;
        self
    }

    pub fn font(&mut self, font: FontInfo) -> &mut Self {
        self.font = font;
        self
    }

    pub fn edging(&mut self, edging: Edging) -> &mut Self {
        self.style.fill.set_anti_alias(edging == Edging::AntiAlias);
        self
    }

    pub fn text_style(&self) -> &TextStyle {
        &self.text_style
    }

    /// Run width in pixels
    pub fn measure(&self) -> Result<f32> {
        Ok(pxl_text::measure(&self.font, &self.text, &self.text_style)?)
    }
}

impl DrawOperation for Text {
    fn name(&self) -> &'static str {
        "text"
    }

    fn commit(&mut self, canvas: &mut Canvas) -> Result<()> {
        let Some(path) =
            pxl_text::outline_run(&self.font, &self.text, self.x, self.y, &self.text_style)?
        else {
            return Ok(());
        };
        self.style.draw_path(canvas, &path)?;

        if self.embolden {
            let fill = self.style.fill.resolve(canvas.width(), canvas.height())?;
            if fill.is_visible() {
                let width = self.text_style.size_for(&self.font) / 24.0;
                canvas.stroke_path(&path, &fill.to_skia(self.style.blend), width);
            }
        }
        Ok(())
    }
}

impl RenderContext {
    /// Text in the context's default font
    pub fn text(&mut self, text: impl Into<String>, x: f32, y: f32) -> Result<&mut Text> {
        let font = self
            .font()
            .cloned()
            .ok_or_else(|| TextError::FontNotFound("no default font set on context".into()))?;
        self.text_with_font(text, x, y, font)
    }

    pub fn text_with_font(
        &mut self,
        text: impl Into<String>,
        x: f32,
        y: f32,
        font: FontInfo,
    ) -> Result<&mut Text> {
        self.begin(Text::new(text, x, y, font)?)
    }
}
