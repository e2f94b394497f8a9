//! Canvas - tiny-skia backed pixel surface
//!
//! The canvas stores premultiplied RGBA8 samples in row-major order. All
//! pixel values crossing its public surface are straight [`Color`]s.

use tiny_skia::{FillRule, Paint, Path, Pixmap, PixmapPaint, Rect, Stroke, Transform};

use crate::{BlendMode, Color, RenderError, Result};

/// Pixel canvas
#[derive(Clone)]
pub struct Canvas {
    pixmap: Pixmap,
}

impl Canvas {
    /// Create a transparent canvas
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let pixmap =
            Pixmap::new(width, height).ok_or(RenderError::InvalidDimensions { width, height })?;
        Ok(Self { pixmap })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Number of pixels
    pub fn len(&self) -> usize {
        self.pixmap.pixels().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fill the whole canvas with `color`, replacing what was there
    pub fn clear(&mut self, color: Color) {
        self.pixmap.fill(color.to_skia());
    }

    /// Straight color at (x, y)
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        self.pixmap.pixel(x, y).map(Color::demultiply)
    }

    pub(crate) fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub(crate) fn fill_path(&mut self, path: &Path, paint: &Paint) {
        self.pixmap
            .fill_path(path, paint, FillRule::Winding, Transform::identity(), None);
    }

    pub(crate) fn stroke_path(&mut self, path: &Path, paint: &Paint, width: f32) {
        let stroke = Stroke { width, ..Stroke::default() };
        self.pixmap
            .stroke_path(path, paint, &stroke, Transform::identity(), None);
    }

    pub(crate) fn fill_rect(&mut self, rect: Rect, paint: &Paint) {
        self.pixmap.fill_rect(rect, paint, Transform::identity(), None);
    }

    /// Copy the canvas into `out` as straight colors.
    pub fn snapshot_into(&self, out: &mut [Color]) -> Result<()> {
        let pixels = self.pixmap.pixels();
        if out.len() != pixels.len() {
            return Err(RenderError::InvalidParameter(format!(
                "snapshot buffer holds {} pixels, canvas has {}",
                out.len(),
                pixels.len()
            )));
        }
        for (dst, src) in out.iter_mut().zip(pixels) {
            *dst = Color::demultiply(*src);
        }
        Ok(())
    }

    /// Straight RGBA bytes, row-major, 4 bytes per pixel
    pub fn to_rgba(&self) -> Vec<u8> {
        self.pixmap
            .pixels()
            .iter()
            .flat_map(|p| {
                let c = Color::demultiply(*p);
                [c.r, c.g, c.b, c.a]
            })
            .collect()
    }

    /// Composite a `width`×`height` straight-color buffer at (`x`, `y`).
    ///
    /// Parts falling outside the canvas are clipped. `Source` writes samples
    /// directly; every other mode goes through the rasterizer's blender.
    pub(crate) fn blit(
        &mut self,
        src: &[Color],
        width: u32,
        height: u32,
        x: i32,
        y: i32,
        blend: BlendMode,
    ) -> Result<()> {
        if src.len() != width as usize * height as usize {
            return Err(RenderError::InvalidParameter(format!(
                "buffer holds {} pixels, expected {}x{}",
                src.len(),
                width,
                height
            )));
        }

        if blend == BlendMode::Source {
            self.copy_rows(src, width, height, x, y);
            return Ok(());
        }

        let mut layer = Pixmap::new(width, height)
            .ok_or(RenderError::InvalidDimensions { width, height })?;
        for (dst, color) in layer.pixels_mut().iter_mut().zip(src) {
            *dst = color.premultiply();
        }

        let paint = PixmapPaint {
            blend_mode: blend.to_skia(),
            ..PixmapPaint::default()
        };
        self.pixmap
            .draw_pixmap(x, y, layer.as_ref(), &paint, Transform::identity(), None);
        Ok(())
    }

    fn copy_rows(&mut self, src: &[Color], width: u32, height: u32, x: i32, y: i32) {
        let canvas_w = i64::from(self.width());
        let canvas_h = i64::from(self.height());
        let x0 = i64::from(x).max(0);
        let x1 = (i64::from(x) + i64::from(width)).min(canvas_w);
        if x0 >= x1 {
            return;
        }

        let dst = self.pixmap.pixels_mut();
        for row in 0..i64::from(height) {
            let dy = i64::from(y) + row;
            if dy < 0 || dy >= canvas_h {
                continue;
            }
            let src_row = (row * i64::from(width)) as usize;
            for dx in x0..x1 {
                let sx = (dx - i64::from(x)) as usize;
                dst[(dy * canvas_w + dx) as usize] = src[src_row + sx].premultiply();
            }
        }
    }

    /// Copy the sub-region `[x, x+width) × [y, y+height)` into a new canvas.
    pub fn crop(&self, x: u32, y: u32, width: u32, height: u32) -> Result<Canvas> {
        let fits_x = x.checked_add(width).is_some_and(|r| r <= self.width());
        let fits_y = y.checked_add(height).is_some_and(|b| b <= self.height());
        if !fits_x || !fits_y {
            return Err(RenderError::InvalidParameter(format!(
                "region {x},{y} {width}x{height} exceeds {}x{} canvas",
                self.width(),
                self.height()
            )));
        }

        let mut out = Canvas::new(width, height)?;
        let src = self.pixmap.pixels();
        let stride = self.width() as usize;
        let dst = out.pixmap.pixels_mut();
        for row in 0..height as usize {
            let from = (y as usize + row) * stride + x as usize;
            let to = row * width as usize;
            dst[to..to + width as usize].copy_from_slice(&src[from..from + width as usize]);
        }
        Ok(out)
    }
}

impl std::fmt::Debug for Canvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Canvas")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient_canvas(w: u32, h: u32) -> (Canvas, Vec<Color>) {
        let mut canvas = Canvas::new(w, h).unwrap();
        let colors: Vec<Color> = (0..w * h)
            .map(|i| Color::rgb((i % 256) as u8, (i * 7 % 256) as u8, 0))
            .collect();
        canvas.blit(&colors, w, h, 0, 0, BlendMode::Source).unwrap();
        (canvas, colors)
    }

    #[test]
    fn test_zero_size_rejected() {
        assert!(matches!(
            Canvas::new(0, 4),
            Err(RenderError::InvalidDimensions { width: 0, height: 4 })
        ));
    }

    #[test]
    fn test_new_is_transparent() {
        let canvas = Canvas::new(3, 2).unwrap();
        assert_eq!(canvas.len(), 6);
        assert_eq!(canvas.pixel(2, 1), Some(Color::TRANSPARENT));
        assert_eq!(canvas.pixel(3, 0), None);
    }

    #[test]
    fn test_clear_and_export() {
        let mut canvas = Canvas::new(2, 1).unwrap();
        canvas.clear(Color::RED);
        assert_eq!(canvas.to_rgba(), vec![255, 0, 0, 255, 255, 0, 0, 255]);
    }

    #[test]
    fn test_snapshot_size_mismatch() {
        let canvas = Canvas::new(2, 2).unwrap();
        let mut out = vec![Color::TRANSPARENT; 3];
        assert!(canvas.snapshot_into(&mut out).is_err());
    }

    #[test]
    fn test_source_blit_is_exact() {
        let (canvas, colors) = gradient_canvas(5, 4);
        let mut out = vec![Color::TRANSPARENT; 20];
        canvas.snapshot_into(&mut out).unwrap();
        assert_eq!(out, colors);
    }

    #[test]
    fn test_blit_clips_offset() {
        let mut canvas = Canvas::new(4, 4).unwrap();
        let src = vec![Color::BLUE; 4];
        canvas.blit(&src, 2, 2, 3, -1, BlendMode::Source).unwrap();
        assert_eq!(canvas.pixel(3, 0), Some(Color::BLUE));
        assert_eq!(canvas.pixel(3, 1), Some(Color::TRANSPARENT));
        assert_eq!(canvas.pixel(2, 0), Some(Color::TRANSPARENT));
    }

    #[test]
    fn test_source_over_keeps_transparent_areas() {
        let mut canvas = Canvas::new(2, 1).unwrap();
        canvas.clear(Color::BLUE);
        canvas
            .blit(&[Color::RED, Color::TRANSPARENT], 2, 1, 0, 0, BlendMode::SourceOver)
            .unwrap();
        assert_eq!(canvas.pixel(0, 0), Some(Color::RED));
        assert_eq!(canvas.pixel(1, 0), Some(Color::BLUE));
    }

    #[test]
    fn test_crop_copies_rows() {
        let (canvas, colors) = gradient_canvas(6, 6);
        let part = canvas.crop(2, 2, 3, 2).unwrap();
        assert_eq!(part.width(), 3);
        assert_eq!(part.pixel(0, 0), Some(colors[2 * 6 + 2]));
        assert_eq!(part.pixel(2, 1), Some(colors[3 * 6 + 4]));
    }

    #[test]
    fn test_crop_out_of_bounds() {
        let canvas = Canvas::new(4, 4).unwrap();
        assert!(canvas.crop(2, 2, 3, 1).is_err());
        assert!(canvas.crop(u32::MAX, 0, 2, 1).is_err());
    }
}
