//! Paint descriptors
//!
//! A [`PaintDescriptor`] records *how* a fill or stroke should look without
//! building any backend object. The fluent [`PaintProxy`] replaces the
//! recorded [`PaintSource`] on every call, so the last write before commit
//! wins. Resolution happens once, at commit, and is a pure function of the
//! descriptor and the canvas size.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tiny_skia::{
    FilterQuality, GradientStop, LinearGradient, Paint, Path, Pattern, Pixmap, RadialGradient,
    Shader, Transform,
};

use crate::geometry::{finite, non_negative};
use crate::{procedural, BlendMode, Canvas, Color, Point, RenderError, Result, TileMode};

/// Octave limit for procedural noise
pub const MAX_NOISE_OCTAVES: u32 = 16;

/// Which half of a shape a descriptor paints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaintRole {
    Fill,
    Stroke,
}

/// Ordered gradient colors with optional explicit positions.
///
/// Without positions the colors are spread evenly over `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawStops")]
pub struct GradientStops {
    colors: Vec<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    positions: Option<Vec<f32>>,
}

/// Unchecked stops as read from a document
#[derive(Deserialize)]
struct RawStops {
    colors: Vec<Color>,
    #[serde(default)]
    positions: Option<Vec<f32>>,
}

impl TryFrom<RawStops> for GradientStops {
    type Error = RenderError;

    fn try_from(raw: RawStops) -> Result<Self> {
        let stops = GradientStops { colors: raw.colors, positions: raw.positions };
        stops.validate()?;
        Ok(stops)
    }
}

impl GradientStops {
    pub fn new(colors: impl Into<Vec<Color>>) -> Self {
        Self { colors: colors.into(), positions: None }
    }

    pub fn with_positions(colors: impl Into<Vec<Color>>, positions: impl Into<Vec<f32>>) -> Self {
        Self { colors: colors.into(), positions: Some(positions.into()) }
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn positions(&self) -> Option<&[f32]> {
        self.positions.as_deref()
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Check stop count, position count and ordering.
    pub fn validate(&self) -> Result<()> {
        if self.colors.is_empty() {
            return Err(RenderError::InvalidParameter("gradient needs at least one color".into()));
        }
        let Some(positions) = &self.positions else {
            return Ok(());
        };
        if positions.len() != self.colors.len() {
            return Err(RenderError::InvalidParameter(format!(
                "{} gradient positions for {} colors",
                positions.len(),
                self.colors.len()
            )));
        }
        let mut previous = 0.0f32;
        for &pos in positions {
            finite("gradient position", pos)?;
            if !(0.0..=1.0).contains(&pos) || pos < previous {
                return Err(RenderError::InvalidParameter(format!(
                    "gradient positions must be non-decreasing within [0, 1], got {positions:?}"
                )));
            }
            previous = pos;
        }
        Ok(())
    }

    /// Position of stop `i`; stops without an explicit position are spread evenly
    pub fn position(&self, i: usize) -> f32 {
        if let Some(&pos) = self.positions.as_ref().and_then(|p| p.get(i)) {
            return pos;
        }
        match self.colors.len() {
            0 | 1 => 0.0,
            n => i as f32 / (n - 1) as f32,
        }
    }

    /// Color at parameter `t` (already tiled into `[0, 1]`)
    pub fn sample(&self, t: f32) -> Color {
        let n = self.colors.len();
        match n {
            0 => return Color::TRANSPARENT,
            1 => return self.colors[0],
            _ => {}
        }
        if t <= self.position(0) {
            return self.colors[0];
        }
        for i in 1..n {
            let (p0, p1) = (self.position(i - 1), self.position(i));
            if t <= p1 {
                let f = if p1 > p0 { (t - p0) / (p1 - p0) } else { 1.0 };
                return mix(self.colors[i - 1], self.colors[i], f);
            }
        }
        self.colors[n - 1]
    }

    /// Last color, used when a gradient collapses to a single color
    pub fn last(&self) -> Color {
        self.colors.last().copied().unwrap_or(Color::TRANSPARENT)
    }

    fn max_alpha(&self) -> u8 {
        self.colors.iter().map(|c| c.a).max().unwrap_or(0)
    }

    fn to_skia(&self) -> Vec<GradientStop> {
        self.colors
            .iter()
            .enumerate()
            .map(|(i, c)| GradientStop::new(self.position(i), c.to_skia()))
            .collect()
    }
}

impl From<Vec<Color>> for GradientStops {
    fn from(colors: Vec<Color>) -> Self {
        Self::new(colors)
    }
}

impl From<&[Color]> for GradientStops {
    fn from(colors: &[Color]) -> Self {
        Self::new(colors)
    }
}

impl<const N: usize> From<[Color; N]> for GradientStops {
    fn from(colors: [Color; N]) -> Self {
        Self::new(colors)
    }
}

fn mix(a: Color, b: Color, t: f32) -> Color {
    let ch = |x: u8, y: u8| (f32::from(x) + (f32::from(y) - f32::from(x)) * t).round() as u8;
    Color::rgba(ch(a.r, b.r), ch(a.g, b.g), ch(a.b, b.b), ch(a.a, b.a))
}

/// Procedural noise flavor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NoiseKind {
    /// Smooth fractal sum
    Fractal,
    /// Sum of absolute values, sharper ridges
    Turbulence,
}

/// What a descriptor paints with
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum PaintSource {
    Solid(Color),
    Linear {
        start: Point,
        end: Point,
        stops: GradientStops,
        #[serde(default)]
        tile: TileMode,
    },
    Radial {
        center: Point,
        radius: f32,
        stops: GradientStops,
        #[serde(default)]
        tile: TileMode,
    },
    /// Two-point conical gradient between two circles
    Conical {
        start: Point,
        start_radius: f32,
        end: Point,
        end_radius: f32,
        stops: GradientStops,
        #[serde(default)]
        tile: TileMode,
    },
    /// Angular gradient; angles in degrees, clockwise from +x
    Sweep {
        center: Point,
        start_angle: f32,
        end_angle: f32,
        stops: GradientStops,
        #[serde(default)]
        tile: TileMode,
    },
    Noise {
        noise: NoiseKind,
        frequency_x: f32,
        frequency_y: f32,
        octaves: u32,
        seed: u32,
    },
    /// Tiled image anchored at `origin`
    #[serde(skip)]
    Image {
        image: Arc<Pixmap>,
        tile: TileMode,
        origin: Point,
    },
}

impl PaintSource {
    /// Check every numeric parameter for its domain.
    pub fn validate(&self) -> Result<()> {
        match self {
            PaintSource::Solid(_) => Ok(()),
            PaintSource::Linear { start, end, stops, .. } => {
                start.validate("gradient start")?;
                end.validate("gradient end")?;
                stops.validate()
            }
            PaintSource::Radial { center, radius, stops, .. } => {
                center.validate("gradient center")?;
                non_negative("gradient radius", *radius)?;
                stops.validate()
            }
            PaintSource::Conical { start, start_radius, end, end_radius, stops, .. } => {
                start.validate("gradient start")?;
                end.validate("gradient end")?;
                non_negative("gradient start radius", *start_radius)?;
                non_negative("gradient end radius", *end_radius)?;
                stops.validate()
            }
            PaintSource::Sweep { center, start_angle, end_angle, stops, .. } => {
                center.validate("sweep center")?;
                finite("sweep start angle", *start_angle)?;
                finite("sweep end angle", *end_angle)?;
                if start_angle == end_angle {
                    return Err(RenderError::InvalidParameter(
                        "sweep start and end angle must differ".into(),
                    ));
                }
                stops.validate()
            }
            PaintSource::Noise { frequency_x, frequency_y, octaves, .. } => {
                non_negative("noise frequency", *frequency_x)?;
                non_negative("noise frequency", *frequency_y)?;
                if *octaves == 0 || *octaves > MAX_NOISE_OCTAVES {
                    return Err(RenderError::InvalidParameter(format!(
                        "noise octaves must be 1..={MAX_NOISE_OCTAVES}, got {octaves}"
                    )));
                }
                Ok(())
            }
            PaintSource::Image { origin, .. } => origin.validate("image origin").map(|_| ()),
        }
    }

    /// Largest alpha the source can produce
    fn max_alpha(&self) -> u8 {
        match self {
            PaintSource::Solid(color) => color.a,
            PaintSource::Linear { stops, .. }
            | PaintSource::Radial { stops, .. }
            | PaintSource::Conical { stops, .. }
            | PaintSource::Sweep { stops, .. } => stops.max_alpha(),
            PaintSource::Noise { .. } | PaintSource::Image { .. } => 255,
        }
    }

    fn shading(&self, width: u32, height: u32) -> Result<Shading> {
        let shading = match self {
            PaintSource::Solid(color) => Shading::Solid(*color),
            PaintSource::Linear { start, end, stops, tile } => LinearGradient::new(
                start.to_skia(),
                end.to_skia(),
                stops.to_skia(),
                tile.to_skia(),
                Transform::identity(),
            )
            .map_or(Shading::Solid(stops.last()), Shading::Shader),
            PaintSource::Radial { center, radius, stops, tile } => RadialGradient::new(
                center.to_skia(),
                center.to_skia(),
                *radius,
                stops.to_skia(),
                tile.to_skia(),
                Transform::identity(),
            )
            .map_or(Shading::Solid(stops.last()), Shading::Shader),
            PaintSource::Conical { start, start_radius, end, end_radius, stops, tile }
                if *start_radius == 0.0 =>
            {
                RadialGradient::new(
                    start.to_skia(),
                    end.to_skia(),
                    *end_radius,
                    stops.to_skia(),
                    tile.to_skia(),
                    Transform::identity(),
                )
                .map_or(Shading::Solid(stops.last()), Shading::Shader)
            }
            PaintSource::Conical { start, start_radius, end, end_radius, stops, tile } => {
                Shading::texture(procedural::conical(
                    *start, *start_radius, *end, *end_radius, stops, *tile, width, height,
                )?)
            }
            PaintSource::Sweep { center, start_angle, end_angle, stops, tile } => {
                Shading::texture(procedural::sweep(
                    *center, *start_angle, *end_angle, stops, *tile, width, height,
                )?)
            }
            PaintSource::Noise { noise, frequency_x, frequency_y, octaves, seed } => {
                Shading::texture(procedural::noise(
                    *noise, *frequency_x, *frequency_y, *octaves, *seed, width, height,
                )?)
            }
            PaintSource::Image { image, tile, origin } => Shading::Texture {
                pixmap: Arc::clone(image),
                tile: *tile,
                transform: Transform::from_translate(origin.x, origin.y),
            },
        };
        Ok(shading)
    }
}

/// Deferred fill or stroke description owned by a draw operation
///
/// The default paint carries its own anti-aliasing flag. A configured source
/// is aliased unless anti-aliasing was requested explicitly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaintDescriptor {
    role: PaintRole,
    default: Color,
    default_anti_alias: bool,
    source: Option<PaintSource>,
    width: f32,
    anti_alias: Option<bool>,
}

impl PaintDescriptor {
    /// Descriptor resolving to `default` until configured
    pub fn new(role: PaintRole, default: Color) -> Self {
        Self {
            role,
            default,
            default_anti_alias: false,
            source: None,
            width: 1.0,
            anti_alias: None,
        }
    }

    pub fn fill(default: Color) -> Self {
        Self::new(PaintRole::Fill, default)
    }

    pub fn stroke(default: Color) -> Self {
        Self::new(PaintRole::Stroke, default)
    }

    /// Anti-alias the default paint
    pub fn smooth_default(mut self) -> Self {
        self.default_anti_alias = true;
        self
    }

    pub fn role(&self) -> PaintRole {
        self.role
    }

    /// The configured source, if any call replaced the default
    pub fn source(&self) -> Option<&PaintSource> {
        self.source.as_ref()
    }

    pub fn is_configured(&self) -> bool {
        self.source.is_some()
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    /// Effective anti-aliasing flag
    pub fn anti_alias(&self) -> bool {
        match (self.anti_alias, &self.source) {
            (Some(explicit), _) => explicit,
            (None, Some(_)) => false,
            (None, None) => self.default_anti_alias,
        }
    }

    /// Replace the paint source. Invalid parameters leave the descriptor untouched.
    pub fn set_source(&mut self, source: PaintSource) -> Result<()> {
        source.validate()?;
        self.source = Some(source);
        Ok(())
    }

    pub fn set_width(&mut self, width: f32) -> Result<()> {
        self.width = non_negative("stroke width", width)?;
        Ok(())
    }

    /// Replace the paint source with a solid color
    pub fn set_solid(&mut self, color: Color) {
        self.source = Some(PaintSource::Solid(color));
    }

    pub fn set_anti_alias(&mut self, anti_alias: bool) {
        self.anti_alias = Some(anti_alias);
    }

    /// Forget the configured source and modifiers
    pub fn reset(&mut self) {
        self.source = None;
        self.anti_alias = None;
        self.width = 1.0;
    }

    /// Build the immutable paint for a `width`×`height` canvas
    pub fn resolve(&self, width: u32, height: u32) -> Result<ResolvedPaint> {
        non_negative("stroke width", self.width)?;
        let source = self.source.as_ref();
        if let Some(source) = source {
            source.validate()?;
        }
        let alpha = source.map_or(self.default.a, PaintSource::max_alpha);
        let shading = match source {
            Some(source) => source.shading(width, height)?,
            None => Shading::Solid(self.default),
        };
        Ok(ResolvedPaint {
            shading,
            alpha,
            width: self.width,
            anti_alias: self.anti_alias(),
        })
    }
}

enum Shading {
    Solid(Color),
    Shader(Shader<'static>),
    Texture { pixmap: Arc<Pixmap>, tile: TileMode, transform: Transform },
}

impl Shading {
    fn texture(pixmap: Pixmap) -> Self {
        Shading::Texture {
            pixmap: Arc::new(pixmap),
            tile: TileMode::Clamp,
            transform: Transform::identity(),
        }
    }
}

/// Immutable paint ready for rasterization
pub struct ResolvedPaint {
    shading: Shading,
    alpha: u8,
    width: f32,
    anti_alias: bool,
}

impl ResolvedPaint {
    /// Effective alpha; zero means nothing would be drawn
    pub fn alpha(&self) -> u8 {
        self.alpha
    }

    pub fn is_visible(&self) -> bool {
        self.alpha > 0
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn anti_alias(&self) -> bool {
        self.anti_alias
    }

    /// Solid color, when the paint is one
    pub fn color(&self) -> Option<Color> {
        match self.shading {
            Shading::Solid(color) => Some(color),
            _ => None,
        }
    }

    pub(crate) fn to_skia(&self, blend: BlendMode) -> Paint<'_> {
        let shader = match &self.shading {
            Shading::Solid(color) => Shader::SolidColor(color.to_skia()),
            Shading::Shader(shader) => shader.clone(),
            Shading::Texture { pixmap, tile, transform } => Pattern::new(
                Pixmap::as_ref(pixmap),
                tile.to_skia(),
                FilterQuality::Nearest,
                1.0,
                *transform,
            ),
        };
        Paint {
            shader,
            blend_mode: blend.to_skia(),
            anti_alias: self.anti_alias,
            ..Paint::default()
        }
    }
}

impl std::fmt::Debug for ResolvedPaint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedPaint")
            .field("color", &self.color())
            .field("alpha", &self.alpha)
            .field("width", &self.width)
            .field("anti_alias", &self.anti_alias)
            .finish()
    }
}

/// A draw operation with configurable paints
pub trait Styled {
    fn paint_mut(&mut self, role: PaintRole) -> &mut PaintDescriptor;
}

/// Fluent access to one paint slot of `P`.
///
/// Paint-setting methods hand `P` back so configuration can continue on the
/// operation itself.
pub struct PaintProxy<'a, P: Styled + ?Sized> {
    owner: &'a mut P,
    role: PaintRole,
}

impl<'a, P: Styled + ?Sized> PaintProxy<'a, P> {
    pub fn new(owner: &'a mut P, role: PaintRole) -> Self {
        Self { owner, role }
    }

    fn descriptor(&mut self) -> &mut PaintDescriptor {
        self.owner.paint_mut(self.role)
    }

    /// Stroke width in pixels
    pub fn width(mut self, width: f32) -> Result<Self> {
        self.descriptor().set_width(width)?;
        Ok(self)
    }

    pub fn anti_alias(mut self, anti_alias: bool) -> Self {
        self.descriptor().set_anti_alias(anti_alias);
        self
    }

    /// Paint with any source
    pub fn source(mut self, source: PaintSource) -> Result<&'a mut P> {
        self.descriptor().set_source(source)?;
        Ok(self.owner)
    }

    pub fn solid(mut self, color: Color) -> &'a mut P {
        self.descriptor().set_solid(color);
        self.owner
    }

    pub fn linear_gradient(
        self,
        start: impl Into<Point>,
        end: impl Into<Point>,
        stops: impl Into<GradientStops>,
    ) -> Result<&'a mut P> {
        self.source(PaintSource::Linear {
            start: start.into(),
            end: end.into(),
            stops: stops.into(),
            tile: TileMode::Clamp,
        })
    }

    /// Left-to-right gradient over `width` pixels
    pub fn horizontal_gradient(
        self,
        width: f32,
        stops: impl Into<GradientStops>,
    ) -> Result<&'a mut P> {
        self.linear_gradient(Point::ZERO, Point::new(width, 0.0), stops)
    }

    /// Top-to-bottom gradient over `height` pixels
    pub fn vertical_gradient(
        self,
        height: f32,
        stops: impl Into<GradientStops>,
    ) -> Result<&'a mut P> {
        self.linear_gradient(Point::ZERO, Point::new(0.0, height), stops)
    }

    pub fn radial_gradient(
        self,
        center: impl Into<Point>,
        radius: f32,
        stops: impl Into<GradientStops>,
    ) -> Result<&'a mut P> {
        self.source(PaintSource::Radial {
            center: center.into(),
            radius,
            stops: stops.into(),
            tile: TileMode::Clamp,
        })
    }

    pub fn conical_gradient(
        self,
        start: impl Into<Point>,
        start_radius: f32,
        end: impl Into<Point>,
        end_radius: f32,
        stops: impl Into<GradientStops>,
    ) -> Result<&'a mut P> {
        self.source(PaintSource::Conical {
            start: start.into(),
            start_radius,
            end: end.into(),
            end_radius,
            stops: stops.into(),
            tile: TileMode::Clamp,
        })
    }

    /// Full-turn sweep around `center`
    pub fn sweep_gradient(
        self,
        center: impl Into<Point>,
        stops: impl Into<GradientStops>,
    ) -> Result<&'a mut P> {
        self.source(PaintSource::Sweep {
            center: center.into(),
            start_angle: 0.0,
            end_angle: 360.0,
            stops: stops.into(),
            tile: TileMode::Clamp,
        })
    }

    pub fn fractal_noise(
        self,
        frequency_x: f32,
        frequency_y: f32,
        octaves: u32,
        seed: u32,
    ) -> Result<&'a mut P> {
        self.source(PaintSource::Noise {
            noise: NoiseKind::Fractal,
            frequency_x,
            frequency_y,
            octaves,
            seed,
        })
    }

    pub fn turbulence(
        self,
        frequency_x: f32,
        frequency_y: f32,
        octaves: u32,
        seed: u32,
    ) -> Result<&'a mut P> {
        self.source(PaintSource::Noise {
            noise: NoiseKind::Turbulence,
            frequency_x,
            frequency_y,
            octaves,
            seed,
        })
    }

    pub fn image_pattern(mut self, image: Arc<Pixmap>, tile: TileMode) -> &'a mut P {
        self.descriptor().source = Some(PaintSource::Image { image, tile, origin: Point::ZERO });
        self.owner
    }
}

/// Fill and stroke descriptors plus blend mode shared by every shape
#[derive(Debug, Clone)]
pub struct ShapeStyle {
    pub fill: PaintDescriptor,
    pub stroke: PaintDescriptor,
    pub blend: BlendMode,
}

impl ShapeStyle {
    pub fn new(fill: Color, stroke: Color) -> Self {
        Self {
            fill: PaintDescriptor::fill(fill),
            stroke: PaintDescriptor::stroke(stroke),
            blend: BlendMode::SourceOver,
        }
    }

    pub fn descriptor_mut(&mut self, role: PaintRole) -> &mut PaintDescriptor {
        match role {
            PaintRole::Fill => &mut self.fill,
            PaintRole::Stroke => &mut self.stroke,
        }
    }

    /// Fill then stroke `path`, skipping paints with zero effective alpha.
    pub(crate) fn draw_path(&self, canvas: &mut Canvas, path: &Path) -> Result<()> {
        let (w, h) = (canvas.width(), canvas.height());

        let fill = self.fill.resolve(w, h)?;
        if fill.is_visible() {
            canvas.fill_path(path, &fill.to_skia(self.blend));
        }

        let stroke = self.stroke.resolve(w, h)?;
        if stroke.is_visible() {
            canvas.stroke_path(path, &stroke.to_skia(self.blend), stroke.width());
        }
        Ok(())
    }
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self::new(Color::TRANSPARENT, Color::LIME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Swatch {
        style: ShapeStyle,
    }

    impl Styled for Swatch {
        fn paint_mut(&mut self, role: PaintRole) -> &mut PaintDescriptor {
            self.style.descriptor_mut(role)
        }
    }

    impl Swatch {
        fn fill(&mut self) -> PaintProxy<'_, Self> {
            PaintProxy::new(self, PaintRole::Fill)
        }
    }

    #[test]
    fn test_unconfigured_resolves_default() {
        let fill = PaintDescriptor::fill(Color::TRANSPARENT).resolve(4, 4).unwrap();
        assert_eq!(fill.alpha(), 0);
        assert!(!fill.is_visible());

        let stroke = PaintDescriptor::stroke(Color::LIME).resolve(4, 4).unwrap();
        assert_eq!(stroke.color(), Some(Color::LIME));
    }

    #[test]
    fn test_last_write_wins() {
        let mut swatch = Swatch { style: ShapeStyle::default() };
        swatch.fill().solid(Color::RED);
        swatch
            .fill()
            .linear_gradient(Point::ZERO, Point::new(4.0, 0.0), [Color::RED, Color::BLUE])
            .unwrap();
        assert!(matches!(swatch.style.fill.source(), Some(PaintSource::Linear { .. })));
        let resolved = swatch.style.fill.resolve(4, 4).unwrap();
        assert_eq!(resolved.color(), None);
    }

    #[test]
    fn test_invalid_radius_keeps_previous() {
        let mut swatch = Swatch { style: ShapeStyle::default() };
        swatch.fill().solid(Color::RED);
        let err = swatch.fill().radial_gradient(Point::new(1.0, 1.0), -2.0, [Color::RED]);
        assert!(matches!(err, Err(RenderError::InvalidParameter(_))));
        assert!(matches!(swatch.style.fill.source(), Some(PaintSource::Solid(Color::RED))));
    }

    #[test]
    fn test_configured_paint_is_aliased() {
        let mut desc = PaintDescriptor::fill(Color::LIME).smooth_default();
        assert!(desc.anti_alias());
        desc.set_source(PaintSource::Solid(Color::RED)).unwrap();
        assert!(!desc.anti_alias());
        desc.set_anti_alias(true);
        assert!(desc.resolve(2, 2).unwrap().anti_alias());
    }

    #[test]
    fn test_width_validation() {
        let mut swatch = Swatch { style: ShapeStyle::default() };
        assert!(swatch.fill().width(f32::NAN).is_err());
        assert!(swatch.fill().width(3.0).is_ok());
        assert_eq!(swatch.style.fill.width(), 3.0);
    }

    #[test]
    fn test_stops_validation() {
        assert!(GradientStops::new(Vec::<Color>::new()).validate().is_err());
        assert!(GradientStops::with_positions([Color::RED, Color::BLUE], [0.0]).validate().is_err());
        assert!(GradientStops::with_positions([Color::RED, Color::BLUE], [0.6, 0.2]).validate().is_err());
        assert!(GradientStops::with_positions([Color::RED, Color::BLUE], [0.0, 1.5]).validate().is_err());
        assert!(GradientStops::with_positions([Color::RED, Color::BLUE], [0.2, 0.8]).validate().is_ok());
    }

    #[test]
    fn test_stops_sample() {
        let stops = GradientStops::from([Color::BLACK, Color::WHITE]);
        assert_eq!(stops.sample(0.0), Color::BLACK);
        assert_eq!(stops.sample(1.0), Color::WHITE);
        assert_eq!(stops.sample(0.5), Color::rgb(128, 128, 128));

        let single = GradientStops::from([Color::RED]);
        assert_eq!(single.sample(0.7), Color::RED);
    }

    #[test]
    fn test_gradient_alpha() {
        let mut desc = PaintDescriptor::fill(Color::LIME);
        desc.set_source(PaintSource::Linear {
            start: Point::ZERO,
            end: Point::new(4.0, 0.0),
            stops: GradientStops::from([Color::TRANSPARENT, Color::TRANSPARENT]),
            tile: TileMode::Clamp,
        })
        .unwrap();
        assert!(!desc.resolve(4, 4).unwrap().is_visible());
    }

    #[test]
    fn test_noise_octaves() {
        let mut swatch = Swatch { style: ShapeStyle::default() };
        assert!(swatch.fill().fractal_noise(0.1, 0.1, 0, 1).is_err());
        assert!(swatch.fill().turbulence(0.1, 0.1, MAX_NOISE_OCTAVES + 1, 1).is_err());
        assert!(swatch.fill().turbulence(0.1, 0.1, 4, 1).is_ok());
    }

    #[test]
    fn test_sweep_equal_angles() {
        let source = PaintSource::Sweep {
            center: Point::ZERO,
            start_angle: 90.0,
            end_angle: 90.0,
            stops: GradientStops::from([Color::RED]),
            tile: TileMode::Clamp,
        };
        assert!(source.validate().is_err());
    }

    #[test]
    fn test_source_serializes_by_kind() {
        let source = PaintSource::Radial {
            center: Point::new(2.0, 3.0),
            radius: 4.0,
            stops: GradientStops::from([Color::RED, Color::BLUE]),
            tile: TileMode::Mirror,
        };
        let json = serde_json::to_string(&source).unwrap();
        assert!(json.contains("\"kind\":\"radial\""));
        assert!(json.contains("\"tile\":\"mirror\""));

        let back: PaintSource = serde_json::from_str(&json).unwrap();
        assert!(matches!(back, PaintSource::Radial { radius, .. } if radius == 4.0));
    }

    #[test]
    fn test_short_positions_do_not_panic() {
        let stops = GradientStops::with_positions([Color::RED, Color::BLUE], [0.0]);
        assert!(stops.validate().is_err());
        // The missing position falls back to even spacing
        assert_eq!(stops.position(1), 1.0);
        assert_eq!(stops.sample(0.5), Color::rgba(128, 0, 128, 255));
    }

    #[test]
    fn test_deserialized_stops_are_validated() {
        let mut descriptor = PaintDescriptor::fill(Color::BLACK);
        descriptor
            .set_source(PaintSource::Linear {
                start: Point::ZERO,
                end: Point::new(4.0, 0.0),
                stops: GradientStops::with_positions([Color::RED, Color::BLUE], [0.0, 1.0]),
                tile: TileMode::Clamp,
            })
            .unwrap();
        let mut value = serde_json::to_value(&descriptor).unwrap();
        assert!(serde_json::from_value::<PaintDescriptor>(value.clone()).is_ok());

        value["source"]["stops"]["positions"] = serde_json::json!([0.0]);
        assert!(serde_json::from_value::<PaintDescriptor>(value).is_err());
    }

    #[test]
    fn test_resolve_rejects_deserialized_width() {
        let mut value = serde_json::to_value(PaintDescriptor::stroke(Color::LIME)).unwrap();
        value["width"] = serde_json::json!(-2.0);
        let descriptor: PaintDescriptor = serde_json::from_value(value).unwrap();
        assert!(matches!(descriptor.resolve(4, 4), Err(RenderError::InvalidParameter(_))));
    }
}
