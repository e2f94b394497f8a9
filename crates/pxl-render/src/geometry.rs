//! Geometry primitives and parameter validation

use crate::{RenderError, Result};

/// 2D point in canvas pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub(crate) fn to_skia(self) -> tiny_skia::Point {
        tiny_skia::Point::from_xy(self.x, self.y)
    }

    pub(crate) fn validate(self, name: &str) -> Result<Self> {
        finite(name, self.x)?;
        finite(name, self.y)?;
        Ok(self)
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Point::new(x, y)
    }
}

/// Reject NaN and infinities.
pub(crate) fn finite(name: &str, value: f32) -> Result<f32> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(RenderError::InvalidParameter(format!("{name} must be finite, got {value}")))
    }
}

/// Reject non-finite and negative values (radii, widths).
pub(crate) fn non_negative(name: &str, value: f32) -> Result<f32> {
    finite(name, value)?;
    if value < 0.0 {
        return Err(RenderError::InvalidParameter(format!(
            "{name} must not be negative, got {value}"
        )));
    }
    Ok(value)
}

/// Axis-aligned rect from two corners in any order.
pub(crate) fn sorted_rect(x1: f32, y1: f32, x2: f32, y2: f32) -> Option<tiny_skia::Rect> {
    tiny_skia::Rect::from_ltrb(x1.min(x2), y1.min(y2), x1.max(x2), y1.max(y2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finite() {
        assert!(finite("x", 1.0).is_ok());
        assert!(finite("x", f32::NAN).is_err());
        assert!(finite("x", f32::INFINITY).is_err());
    }

    #[test]
    fn test_non_negative() {
        assert_eq!(non_negative("r", 0.0).unwrap(), 0.0);
        assert!(matches!(non_negative("r", -0.5), Err(RenderError::InvalidParameter(_))));
    }

    #[test]
    fn test_sorted_rect() {
        let rect = sorted_rect(10.0, 8.0, 2.0, 4.0).unwrap();
        assert_eq!(rect.left(), 2.0);
        assert_eq!(rect.top(), 4.0);
        assert_eq!(rect.width(), 8.0);
    }
}
