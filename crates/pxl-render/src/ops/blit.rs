//! Raw pixel blits

use crate::{BlendMode, Canvas, Color, DrawOperation, RenderError, Result};

/// Composites an owned buffer of straight colors at an offset
#[derive(Debug, Clone)]
pub struct Blit {
    buffer: Vec<Color>,
    width: u32,
    height: u32,
    x: i32,
    y: i32,
    blend: BlendMode,
}

impl Blit {
    pub fn new(
        buffer: Vec<Color>,
        width: u32,
        height: u32,
        x: i32,
        y: i32,
        blend: BlendMode,
    ) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidDimensions { width, height });
        }
        if buffer.len() != width as usize * height as usize {
            return Err(RenderError::InvalidParameter(format!(
                "buffer holds {} pixels, expected {width}x{height}",
                buffer.len()
            )));
        }
        Ok(Self { buffer, width, height, x, y, blend })
    }

    pub fn offset(&mut self, x: i32, y: i32) -> &mut Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn blend(&mut self, blend: BlendMode) -> &mut Self {
        self.blend = blend;
        self
    }
}

impl DrawOperation for Blit {
    fn name(&self) -> &'static str {
        "blit"
    }

    fn commit(&mut self, canvas: &mut Canvas) -> Result<()> {
        canvas.blit(&self.buffer, self.width, self.height, self.x, self.y, self.blend)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RenderContext;

    #[test]
    fn test_size_mismatch() {
        assert!(Blit::new(vec![Color::RED; 3], 2, 2, 0, 0, BlendMode::Source).is_err());
        assert!(matches!(
            Blit::new(Vec::new(), 0, 2, 0, 0, BlendMode::Source),
            Err(RenderError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_blit_is_deferred() {
        let mut ctx = RenderContext::new(3, 3, 30).unwrap();
        ctx.blit(&[Color::RED; 4], 2, 2, 1, 1, BlendMode::SourceOver).unwrap();
        assert_eq!(ctx.canvas().pixel(2, 2), Some(Color::TRANSPARENT));
        ctx.flush().unwrap();
        assert_eq!(ctx.canvas().pixel(2, 2), Some(Color::RED));
        assert_eq!(ctx.canvas().pixel(0, 0), Some(Color::TRANSPARENT));
    }
}
