//! PXL Render - Rendering Core
//!
//! Composes still or animated frames for a fixed-size pixel matrix using
//! tiny-skia as the rasterizer.
//!
//! This crate provides:
//! - Render contexts owning a tiny-skia canvas and frame metadata
//! - A single pending-operation slot with exactly-once, in-order commits
//! - Fluent draw operations (rects, circles, arcs, lines, points, paths, text)
//! - Deferred paint descriptors (solid, gradients, noise, image patterns)
//! - A raw pixel buffer view that coexists with vector drawing
//! - Layers (fork/spawn) composited back with offset and blend mode
//! - A per-thread scoped registry for handle-free scene code
//!
//! # Example
//! ```rust,ignore
//! use pxl_render::{Color, RenderContext};
//!
//! let mut ctx = RenderContext::new(24, 24, 30)?;
//! ctx.background()?.solid(Color::BLUE);
//! ctx.circle(12.0, 12.0, 10.0)?.fill().solid(Color::YELLOW);
//! let frame = ctx.export_rgba()?;
//! ```

mod blend;
mod canvas;
mod context;
mod geometry;
mod layer;
mod operation;
mod pixels;
mod procedural;
pub mod ops;
pub mod paint;
pub mod scope;

pub use blend::{BlendMode, TileMode};
pub use canvas::Canvas;
pub use context::{ContextId, FrameInfo, RenderConfig, RenderContext, grid};
pub use geometry::Point;
pub use layer::Layer;
pub use operation::{BufferBinding, BufferId, DrawOperation, OpState, PixelCommit};
pub use paint::{
    GradientStops, NoiseKind, PaintDescriptor, PaintProxy, PaintRole, PaintSource, ResolvedPaint,
    ShapeStyle, Styled,
};
pub use pixels::{PixelCell, Pixels};
pub use scope::{ScopeError, register_for_thread, scope, unregister_for_thread, with_current};

pub use pxl_text::{FontInfo, TextStyle};

/// Color (straight RGBA, 8 bits per channel)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Color = Color { r: 0, g: 0, b: 0, a: 0 };
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 255 };
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255, a: 255 };
    pub const RED: Color = Color { r: 255, g: 0, b: 0, a: 255 };
    pub const GREEN: Color = Color { r: 0, g: 128, b: 0, a: 255 };
    pub const LIME: Color = Color { r: 0, g: 255, b: 0, a: 255 };
    pub const BLUE: Color = Color { r: 0, g: 0, b: 255, a: 255 };
    pub const YELLOW: Color = Color { r: 255, g: 255, b: 0, a: 255 };
    pub const ORANGE: Color = Color { r: 255, g: 165, b: 0, a: 255 };
    pub const GOLD: Color = Color { r: 255, g: 215, b: 0, a: 255 };
    pub const DARK_ORANGE: Color = Color { r: 255, g: 140, b: 0, a: 255 };
    pub const LIGHT_BLUE: Color = Color { r: 173, g: 216, b: 230, a: 255 };
    pub const DARK_BLUE: Color = Color { r: 0, g: 0, b: 139, a: 255 };
    pub const CYAN: Color = Color { r: 0, g: 255, b: 255, a: 255 };
    pub const MAGENTA: Color = Color { r: 255, g: 0, b: 255, a: 255 };
    pub const GRAY: Color = Color { r: 128, g: 128, b: 128, a: 255 };

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with a different alpha
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Create from hex string (e.g., "#ff0000")
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.is_ascii() {
            return None;
        }

        match hex.len() {
            3 => {
                let r = u8::from_str_radix(&hex[0..1], 16).ok()?;
                let g = u8::from_str_radix(&hex[1..2], 16).ok()?;
                let b = u8::from_str_radix(&hex[2..3], 16).ok()?;
                Some(Color::rgb(r * 17, g * 17, b * 17))
            }
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                Some(Color::rgb(r, g, b))
            }
            8 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                let a = u8::from_str_radix(&hex[6..8], 16).ok()?;
                Some(Color::rgba(r, g, b, a))
            }
            _ => None,
        }
    }

    pub(crate) fn to_skia(self) -> tiny_skia::Color {
        tiny_skia::Color::from_rgba8(self.r, self.g, self.b, self.a)
    }

    pub(crate) fn premultiply(self) -> tiny_skia::PremultipliedColorU8 {
        tiny_skia::ColorU8::from_rgba(self.r, self.g, self.b, self.a).premultiply()
    }

    pub(crate) fn demultiply(pixel: tiny_skia::PremultipliedColorU8) -> Self {
        let c = pixel.demultiply();
        Color::rgba(c.red(), c.green(), c.blue(), c.alpha())
    }
}

/// Rendering error types
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("No render context is active on this thread")]
    NoActiveContext,

    #[error("The active render context is already borrowed")]
    ContextBusy,

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Linear pixel buffer access outside `[0, width * height)`
    #[error("Index out of range: {index} (len {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// Coordinate form of [`RenderError::IndexOutOfRange`]: (x, y) access
    /// outside `[0, width) × [0, height)`
    #[error("Pixel ({x}, {y}) out of range for {width}x{height}")]
    PixelOutOfRange { x: i64, y: i64, width: u32, height: u32 },

    #[error("Draw operation committed twice")]
    DoubleCommit,

    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Layer belongs to another context")]
    ParentMismatch,

    #[error("Text error: {0}")]
    Text(#[from] pxl_text::TextError),

    #[error("Internal error: {0}")]
    Internal(&'static str),
}

impl RenderError {
    /// Pixel buffer access outside the buffer, by index or by coordinates
    pub fn is_out_of_range(&self) -> bool {
        matches!(
            self,
            RenderError::IndexOutOfRange { .. } | RenderError::PixelOutOfRange { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, RenderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_constants() {
        assert_eq!(Color::WHITE.r, 255);
        assert_eq!(Color::BLACK.r, 0);
        assert_eq!(Color::TRANSPARENT.a, 0);
    }

    #[test]
    fn test_color_from_hex() {
        assert_eq!(Color::from_hex("#ff0000"), Some(Color::RED));
        assert_eq!(Color::from_hex("00ff00"), Some(Color::LIME));
        assert_eq!(Color::from_hex("#f00"), Some(Color::RED));
        assert_eq!(Color::from_hex("#00ff0080"), Some(Color::LIME.with_alpha(0x80)));
        assert_eq!(Color::from_hex("#12345"), None);
        assert_eq!(Color::from_hex("#gg0000"), None);
    }

    #[test]
    fn test_premultiply_round_trip() {
        for a in [0u8, 1, 77, 128, 254, 255] {
            let c = Color::rgba(200, 100, 50, a);
            let p = c.premultiply();
            let back = Color::demultiply(p);
            // Re-premultiplying is lossless even where the straight value is not
            assert_eq!(back.premultiply(), p);
        }
    }
}
