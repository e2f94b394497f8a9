//! Procedural textures for shaders tiny-skia does not provide
//!
//! Two-point conical gradients with a non-zero start radius, sweep gradients
//! and Perlin noise are evaluated per pixel center into a canvas-sized
//! pixmap, which is then drawn through a pattern shader.

use std::f32::consts::PI;

use tiny_skia::Pixmap;

use crate::paint::{GradientStops, NoiseKind};
use crate::{Color, Point, RenderError, Result, TileMode};

/// Evaluate `f` at every pixel center of a `width`×`height` texture.
fn render(width: u32, height: u32, f: impl Fn(f32, f32) -> Color) -> Result<Pixmap> {
    let mut pixmap =
        Pixmap::new(width, height).ok_or(RenderError::InvalidDimensions { width, height })?;
    let stride = width as usize;
    for (i, px) in pixmap.pixels_mut().iter_mut().enumerate() {
        let x = (i % stride) as f32 + 0.5;
        let y = (i / stride) as f32 + 0.5;
        *px = f(x, y).premultiply();
    }
    Ok(pixmap)
}

/// Two-point conical gradient between circles (c0, r0) and (c1, r1).
///
/// Solves |p - c(t)| = r(t) for the largest t with r(t) >= 0. Points not
/// covered by any circle of the family stay transparent.
pub(crate) fn conical(
    start: Point,
    start_radius: f32,
    end: Point,
    end_radius: f32,
    stops: &GradientStops,
    tile: TileMode,
    width: u32,
    height: u32,
) -> Result<Pixmap> {
    let (dcx, dcy) = (end.x - start.x, end.y - start.y);
    let dr = end_radius - start_radius;
    let a = dcx * dcx + dcy * dcy - dr * dr;

    render(width, height, |x, y| {
        let (px, py) = (x - start.x, y - start.y);
        let b = px * dcx + py * dcy + start_radius * dr;
        let c = px * px + py * py - start_radius * start_radius;

        let t = if a.abs() < 1e-6 {
            // Linear case: 2bt = c
            if b.abs() < 1e-6 {
                return Color::TRANSPARENT;
            }
            Some(c / (2.0 * b))
        } else {
            let disc = b * b - a * c;
            if disc < 0.0 {
                return Color::TRANSPARENT;
            }
            let root = disc.sqrt();
            let (t1, t2) = ((b + root) / a, (b - root) / a);
            let (hi, lo) = if t1 > t2 { (t1, t2) } else { (t2, t1) };
            [hi, lo].into_iter().find(|t| start_radius + t * dr >= 0.0)
        };

        match t {
            Some(t) if start_radius + t * dr >= 0.0 => stops.sample(tile.apply(t)),
            _ => Color::TRANSPARENT,
        }
    })
}

/// Sweep gradient around `center` from `start_angle` to `end_angle` degrees,
/// clockwise in canvas coordinates.
pub(crate) fn sweep(
    center: Point,
    start_angle: f32,
    end_angle: f32,
    stops: &GradientStops,
    tile: TileMode,
    width: u32,
    height: u32,
) -> Result<Pixmap> {
    let span = end_angle - start_angle;
    render(width, height, |x, y| {
        let mut angle = (y - center.y).atan2(x - center.x) * 180.0 / PI;
        if angle < 0.0 {
            angle += 360.0;
        }
        let t = (angle - start_angle) / span;
        stops.sample(tile.apply(t))
    })
}

/// Fractal noise or turbulence, one independent noise field per channel.
pub(crate) fn noise(
    kind: NoiseKind,
    frequency_x: f32,
    frequency_y: f32,
    octaves: u32,
    seed: u32,
    width: u32,
    height: u32,
) -> Result<Pixmap> {
    let fields: [Perlin; 4] = std::array::from_fn(|i| Perlin::new(seed.wrapping_add(i as u32)));

    render(width, height, |x, y| {
        let mut channels = [0u8; 4];
        for (field, out) in fields.iter().zip(channels.iter_mut()) {
            let mut sum = 0.0;
            let mut scale = 1.0;
            for _ in 0..octaves {
                let n = field.sample(x * frequency_x * scale, y * frequency_y * scale);
                let n = match kind {
                    NoiseKind::Fractal => n,
                    NoiseKind::Turbulence => n.abs(),
                };
                sum += n / scale;
                scale *= 2.0;
            }
            let value = match kind {
                NoiseKind::Fractal => (sum + 1.0) * 0.5,
                NoiseKind::Turbulence => sum,
            };
            *out = (value.clamp(0.0, 1.0) * 255.0).round() as u8;
        }
        Color::rgba(channels[0], channels[1], channels[2], channels[3])
    })
}

/// Classic 2D gradient noise
struct Perlin {
    perm: [u8; 512],
}

impl Perlin {
    fn new(seed: u32) -> Self {
        let mut table: [u8; 256] = std::array::from_fn(|i| i as u8);
        // xorshift32 driven Fisher-Yates
        let mut state = seed.wrapping_mul(0x9E37_79B9) | 1;
        for i in (1..256).rev() {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            table.swap(i, state as usize % (i + 1));
        }

        let mut perm = [0u8; 512];
        for (i, p) in perm.iter_mut().enumerate() {
            *p = table[i & 255];
        }
        Self { perm }
    }

    fn gradient(hash: u8, x: f32, y: f32) -> f32 {
        match hash & 7 {
            0 => x + y,
            1 => x - y,
            2 => -x + y,
            3 => -x - y,
            4 => x,
            5 => -x,
            6 => y,
            _ => -y,
        }
    }

    fn fade(t: f32) -> f32 {
        t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
    }

    /// Noise value, roughly in `[-1, 1]`
    fn sample(&self, x: f32, y: f32) -> f32 {
        let xf = x.floor();
        let yf = y.floor();
        let xi = (xf as i64 & 255) as usize;
        let yi = (yf as i64 & 255) as usize;
        let (dx, dy) = (x - xf, y - yf);
        let (u, v) = (Self::fade(dx), Self::fade(dy));

        let p = &self.perm;
        let aa = p[p[xi] as usize + yi];
        let ab = p[p[xi] as usize + yi + 1];
        let ba = p[p[xi + 1] as usize + yi];
        let bb = p[p[xi + 1] as usize + yi + 1];

        let x1 = lerp(u, Self::gradient(aa, dx, dy), Self::gradient(ba, dx - 1.0, dy));
        let x2 = lerp(
            u,
            Self::gradient(ab, dx, dy - 1.0),
            Self::gradient(bb, dx - 1.0, dy - 1.0),
        );
        lerp(v, x1, x2)
    }
}

fn lerp(t: f32, a: f32, b: f32) -> f32 {
    a + t * (b - a)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stops() -> GradientStops {
        GradientStops::from([Color::BLACK, Color::WHITE])
    }

    fn straight(pixmap: &Pixmap, x: u32, y: u32) -> Color {
        Color::demultiply(pixmap.pixel(x, y).unwrap())
    }

    #[test]
    fn test_sweep_starts_at_start_color() {
        let pix = sweep(Point::new(0.0, 0.0), 0.0, 360.0, &stops(), TileMode::Clamp, 8, 8).unwrap();
        // Pixel (7, 0) sits just below the positive x axis
        assert!(straight(&pix, 7, 0).r < 40);
        // Pixel (0, 7) is a quarter turn away
        let quarter = straight(&pix, 0, 7).r;
        assert!((50..90).contains(&quarter), "{quarter}");
    }

    #[test]
    fn test_conical_concentric_matches_radial() {
        let pix = conical(
            Point::new(8.0, 8.0),
            2.0,
            Point::new(8.0, 8.0),
            6.0,
            &stops(),
            TileMode::Clamp,
            16,
            16,
        )
        .unwrap();
        // Inside the start circle clamps to the first stop
        assert_eq!(straight(&pix, 8, 8), Color::BLACK);
        // Far outside clamps to the last stop
        assert_eq!(straight(&pix, 0, 0), Color::WHITE);
        // Pixel center (12.5, 8.5) lies ~4.53 from the center: t ~ 0.63
        let mid = straight(&pix, 12, 8).r;
        assert!((150..172).contains(&mid), "{mid}");
    }

    #[test]
    fn test_noise_deterministic() {
        let a = noise(NoiseKind::Fractal, 0.2, 0.2, 3, 7, 6, 6).unwrap();
        let b = noise(NoiseKind::Fractal, 0.2, 0.2, 3, 7, 6, 6).unwrap();
        assert_eq!(a.data(), b.data());
        let c = noise(NoiseKind::Fractal, 0.2, 0.2, 3, 8, 6, 6).unwrap();
        assert_ne!(a.data(), c.data());
    }

    #[test]
    fn test_perlin_bounded() {
        let field = Perlin::new(1);
        for i in 0..32 {
            let v = field.sample(i as f32 * 0.37, i as f32 * 0.11);
            assert!(v.abs() <= 2.0);
        }
    }
}
