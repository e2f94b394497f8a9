//! pxl-preview: render the built-in demo scenes to PNG files
//!
//! Usage: `pxl-preview [config.json] [scene...]`
//!
//! Scenes: smiley, layers, noise. Without scene names all of them run.

use std::path::PathBuf;

use anyhow::{Context, bail};
use pxl_render::{BlendMode, Color, GradientStops, Point, RenderContext, with_current};
use pxl_session::{PngSink, Session, SessionConfig};
use tracing_subscriber::EnvFilter;

type Scene = fn(&mut RenderContext) -> pxl_render::Result<()>;

const SCENES: &[(&str, Scene)] = &[
    ("smiley", smiley as Scene),
    ("layers", layers as Scene),
    ("noise", noise as Scene),
];

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let mut config = if args.first().is_some_and(|a| a.ends_with(".json")) {
        let path = PathBuf::from(args.remove(0));
        SessionConfig::load(&path).with_context(|| format!("loading {}", path.display()))?
    } else {
        SessionConfig::default()
    };
    // A preview without a frame limit renders a single frame
    config.frames.get_or_insert(1);
    let output = config.output_dir.clone().unwrap_or_else(|| PathBuf::from("pxl-preview"));

    let selected: Vec<(&str, Scene)> = if args.is_empty() {
        SCENES.to_vec()
    } else {
        let mut selected = Vec::new();
        for name in &args {
            match SCENES.iter().find(|(scene, _)| *scene == name.as_str()) {
                Some(entry) => selected.push(*entry),
                None => bail!("unknown scene '{name}', expected one of smiley, layers, noise"),
            }
        }
        selected
    };

    for (name, scene) in selected {
        let mut session = Session::new(config.clone())?;
        let mut sink = PngSink::numbered(output.join(name), name)?;
        let stats = session
            .run(|| with_current(scene)?, &mut [&mut sink])
            .with_context(|| format!("rendering scene '{name}'"))?;
        println!(
            "{name}: {} frame(s) written to {}",
            stats.frames,
            sink.dir().display()
        );
    }
    Ok(())
}

/// Gradient smiley face with a seconds counter when a font is available
fn smiley(ctx: &mut RenderContext) -> pxl_render::Result<()> {
    let (w, h) = (ctx.width_f(), ctx.height_f());
    let center = Point::new(w / 2.0, h / 2.0);
    let radius = w.min(h) * 10.0 / 24.0;

    ctx.rect_xywh(0.0, 0.0, w, h)?
        .fill()
        .radial_gradient(center, radius * 1.7, [Color::LIGHT_BLUE, Color::DARK_BLUE])?;

    ctx.circle(center.x, center.y, radius)?
        .fill()
        .radial_gradient(
            Point::new(center.x - 2.0, center.y - 2.0),
            radius * 1.2,
            [Color::YELLOW, Color::GOLD, Color::ORANGE],
        )?
        .stroke()
        .solid(Color::DARK_ORANGE);

    for eye_x in [center.x - 3.0, center.x + 3.0] {
        let eye = Point::new(eye_x, center.y - 2.0);
        ctx.circle(eye.x, eye.y, 1.5)?
            .fill()
            .radial_gradient(eye, 1.5, [Color::WHITE, Color::BLUE, Color::BLACK])?;
    }

    let maroon = Color::rgb(128, 0, 0);
    ctx.rect_xywh(center.x - 4.0, center.y + 3.0, 8.0, 2.5)?
        .fill()
        .linear_gradient(
            Point::new(0.0, center.y + 3.0),
            Point::new(0.0, center.y + 5.5),
            [Color::RED, Color::rgb(139, 0, 0)],
        )?
        .stroke()
        .solid(maroon);

    let pink = Color::rgb(255, 192, 203);
    for cheek_x in [center.x - 5.0, center.x + 5.0] {
        let cheek = Point::new(cheek_x, center.y + 1.0);
        ctx.circle(cheek.x, cheek.y, 1.5)?.fill().radial_gradient(
            cheek,
            1.5,
            GradientStops::new([pink, Color::rgb(255, 182, 193), pink.with_alpha(0)]),
        )?;
    }

    if ctx.font().is_some() {
        let seconds = ctx.elapsed().as_secs() % 60;
        ctx.text(seconds.to_string(), 4.0, 4.0)?.fill().solid(Color::BLACK);
    }
    Ok(())
}

/// Random pixels under a spawned, box-blurred layer
fn layers(ctx: &mut RenderContext) -> pxl_render::Result<()> {
    ctx.background()?.solid(Color::BLUE);

    let mut seed = 0x2545_f491_u32 ^ ctx.cycle_no() as u32;
    let mut next = move || {
        seed ^= seed << 13;
        seed ^= seed >> 17;
        seed ^= seed << 5;
        seed
    };
    {
        let mut px = ctx.pixels()?;
        for color in px.as_mut_slice() {
            let v = next();
            *color = Color::rgb(v as u8, (v >> 8) as u8, (v >> 16) as u8);
        }
    }

    let mut layer = ctx.spawn(Color::TRANSPARENT)?;
    let (w, h) = (layer.width_f(), layer.height_f());
    layer
        .rect_xywh(w / 4.0, h / 3.0, w / 2.0, h / 3.0)?
        .fill()
        .solid(Color::WHITE)
        .stroke()
        .solid(Color::TRANSPARENT);

    {
        let mut px = layer.pixels()?;
        let (width, height) = (px.width() as i32, px.height() as i32);
        let source = px.as_slice().to_vec();
        for y in 0..height {
            for x in 0..width {
                let mut sum = [0u32; 4];
                let mut count = 0;
                for dy in -1..=1 {
                    for dx in -1..=1 {
                        let (nx, ny) = (x + dx, y + dy);
                        if nx < 0 || ny < 0 || nx >= width || ny >= height {
                            continue;
                        }
                        let c = source[(ny * width + nx) as usize];
                        sum[0] += u32::from(c.r);
                        sum[1] += u32::from(c.g);
                        sum[2] += u32::from(c.b);
                        sum[3] += u32::from(c.a);
                        count += 1;
                    }
                }
                let avg = |i: usize| (sum[i] / count) as u8;
                px.set_xy(x, y, Color::rgba(avg(0), avg(1), avg(2), avg(3)))?;
            }
        }
    }

    layer.apply_to(ctx, 0, 0, BlendMode::SourceOver)
}

/// Animated turbulence with a sweep-gradient ring
fn noise(ctx: &mut RenderContext) -> pxl_render::Result<()> {
    let seed = ctx.cycle_no() as u32;
    ctx.background()?.turbulence(0.15, 0.15, 3, seed)?;

    let (w, h) = (ctx.width_f(), ctx.height_f());
    ctx.circle(w / 2.0, h / 2.0, w.min(h) / 3.0)?
        .fill()
        .solid(Color::TRANSPARENT)
        .stroke()
        .width(2.0)?
        .sweep_gradient(
            Point::new(w / 2.0, h / 2.0),
            [Color::RED, Color::YELLOW, Color::LIME, Color::CYAN, Color::BLUE, Color::MAGENTA, Color::RED],
        )?
        .blend(BlendMode::Screen);
    Ok(())
}
