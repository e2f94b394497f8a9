//! Blend and Tile Modes
//!
//! Porter-Duff and separable/non-separable blend modes for drawing and pixel
//! blits, and tile modes for gradients and patterns.

use serde::{Deserialize, Serialize};

/// Blend mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlendMode {
    /// Replace destination with transparent
    Clear,
    /// Replace destination with source
    Source,
    /// Keep destination, ignore source
    Destination,
    /// Source over destination (default alpha blending)
    #[default]
    SourceOver,
    DestinationOver,
    SourceIn,
    DestinationIn,
    SourceOut,
    DestinationOut,
    SourceAtop,
    DestinationAtop,
    Xor,
    Plus,
    Modulate,
    Screen,
    Overlay,
    Darken,
    Lighten,
    ColorDodge,
    ColorBurn,
    HardLight,
    SoftLight,
    Difference,
    Exclusion,
    Multiply,
    Hue,
    Saturation,
    Color,
    Luminosity,
}

impl BlendMode {
    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        Some(match s {
            "clear" => Self::Clear,
            "source" | "copy" => Self::Source,
            "destination" => Self::Destination,
            "source-over" => Self::SourceOver,
            "destination-over" => Self::DestinationOver,
            "source-in" => Self::SourceIn,
            "destination-in" => Self::DestinationIn,
            "source-out" => Self::SourceOut,
            "destination-out" => Self::DestinationOut,
            "source-atop" => Self::SourceAtop,
            "destination-atop" => Self::DestinationAtop,
            "xor" => Self::Xor,
            "plus" | "lighter" => Self::Plus,
            "modulate" => Self::Modulate,
            "screen" => Self::Screen,
            "overlay" => Self::Overlay,
            "darken" => Self::Darken,
            "lighten" => Self::Lighten,
            "color-dodge" => Self::ColorDodge,
            "color-burn" => Self::ColorBurn,
            "hard-light" => Self::HardLight,
            "soft-light" => Self::SoftLight,
            "difference" => Self::Difference,
            "exclusion" => Self::Exclusion,
            "multiply" => Self::Multiply,
            "hue" => Self::Hue,
            "saturation" => Self::Saturation,
            "color" => Self::Color,
            "luminosity" => Self::Luminosity,
            _ => return None,
        })
    }

    /// Convert to string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Clear => "clear",
            Self::Source => "source",
            Self::Destination => "destination",
            Self::SourceOver => "source-over",
            Self::DestinationOver => "destination-over",
            Self::SourceIn => "source-in",
            Self::DestinationIn => "destination-in",
            Self::SourceOut => "source-out",
            Self::DestinationOut => "destination-out",
            Self::SourceAtop => "source-atop",
            Self::DestinationAtop => "destination-atop",
            Self::Xor => "xor",
            Self::Plus => "plus",
            Self::Modulate => "modulate",
            Self::Screen => "screen",
            Self::Overlay => "overlay",
            Self::Darken => "darken",
            Self::Lighten => "lighten",
            Self::ColorDodge => "color-dodge",
            Self::ColorBurn => "color-burn",
            Self::HardLight => "hard-light",
            Self::SoftLight => "soft-light",
            Self::Difference => "difference",
            Self::Exclusion => "exclusion",
            Self::Multiply => "multiply",
            Self::Hue => "hue",
            Self::Saturation => "saturation",
            Self::Color => "color",
            Self::Luminosity => "luminosity",
        }
    }

    pub(crate) fn to_skia(self) -> tiny_skia::BlendMode {
        use tiny_skia::BlendMode as Sk;
        match self {
            Self::Clear => Sk::Clear,
            Self::Source => Sk::Source,
            Self::Destination => Sk::Destination,
            Self::SourceOver => Sk::SourceOver,
            Self::DestinationOver => Sk::DestinationOver,
            Self::SourceIn => Sk::SourceIn,
            Self::DestinationIn => Sk::DestinationIn,
            Self::SourceOut => Sk::SourceOut,
            Self::DestinationOut => Sk::DestinationOut,
            Self::SourceAtop => Sk::SourceAtop,
            Self::DestinationAtop => Sk::DestinationAtop,
            Self::Xor => Sk::Xor,
            Self::Plus => Sk::Plus,
            Self::Modulate => Sk::Modulate,
            Self::Screen => Sk::Screen,
            Self::Overlay => Sk::Overlay,
            Self::Darken => Sk::Darken,
            Self::Lighten => Sk::Lighten,
            Self::ColorDodge => Sk::ColorDodge,
            Self::ColorBurn => Sk::ColorBurn,
            Self::HardLight => Sk::HardLight,
            Self::SoftLight => Sk::SoftLight,
            Self::Difference => Sk::Difference,
            Self::Exclusion => Sk::Exclusion,
            Self::Multiply => Sk::Multiply,
            Self::Hue => Sk::Hue,
            Self::Saturation => Sk::Saturation,
            Self::Color => Sk::Color,
            Self::Luminosity => Sk::Luminosity,
        }
    }
}

/// How gradients and patterns continue outside their defined range
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TileMode {
    /// Extend the edge color
    #[default]
    Clamp,
    Repeat,
    Mirror,
}

impl TileMode {
    pub(crate) fn to_skia(self) -> tiny_skia::SpreadMode {
        match self {
            TileMode::Clamp => tiny_skia::SpreadMode::Pad,
            TileMode::Repeat => tiny_skia::SpreadMode::Repeat,
            TileMode::Mirror => tiny_skia::SpreadMode::Reflect,
        }
    }

    /// Map an unbounded gradient parameter into `[0, 1]`
    pub(crate) fn apply(self, t: f32) -> f32 {
        match self {
            TileMode::Clamp => t.clamp(0.0, 1.0),
            TileMode::Repeat => t - t.floor(),
            TileMode::Mirror => {
                let m = t.rem_euclid(2.0);
                if m > 1.0 { 2.0 - m } else { m }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(BlendMode::from_str("source-over"), Some(BlendMode::SourceOver));
        assert_eq!(BlendMode::from_str("multiply"), Some(BlendMode::Multiply));
        assert_eq!(BlendMode::from_str("copy"), Some(BlendMode::Source));
        assert_eq!(BlendMode::from_str("nope"), None);
    }

    #[test]
    fn test_names_round_trip() {
        for mode in [BlendMode::Clear, BlendMode::DestinationAtop, BlendMode::Luminosity] {
            assert_eq!(BlendMode::from_str(mode.as_str()), Some(mode));
        }
    }

    #[test]
    fn test_tile_apply() {
        assert_eq!(TileMode::Clamp.apply(1.5), 1.0);
        assert_eq!(TileMode::Repeat.apply(1.25), 0.25);
        assert_eq!(TileMode::Mirror.apply(1.25), 0.75);
        assert_eq!(TileMode::Mirror.apply(-0.25), 0.25);
    }
}
