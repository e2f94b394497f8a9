//! Session
//!
//! Owns the root render context and runs scenes against it, one frame at a
//! time.

use pxl_render::{RenderContext, RenderError, ScopeError, scope};
use pxl_text::{FontDatabase, FontQuery};
use tracing::{debug, info, warn};

use crate::{FontSettings, Frame, FrameClock, FrameSink, Result, SessionConfig, SessionError};

/// Whether the frame loop keeps going after a frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Control {
    #[default]
    Continue,
    Stop,
}

/// Anything a scene may return
pub trait SceneOutcome {
    fn into_control(self) -> Result<Control>;
}

impl SceneOutcome for () {
    fn into_control(self) -> Result<Control> {
        Ok(Control::Continue)
    }
}

impl SceneOutcome for Control {
    fn into_control(self) -> Result<Control> {
        Ok(self)
    }
}

impl<T: SceneOutcome> SceneOutcome for pxl_render::Result<T> {
    fn into_control(self) -> Result<Control> {
        self?.into_control()
    }
}

impl<T: SceneOutcome> SceneOutcome for Result<T> {
    fn into_control(self) -> Result<Control> {
        self?.into_control()
    }
}

/// Counters from one `run`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub frames: u64,
    pub sink_failures: u64,
    pub dropped: u64,
}

/// A rendering session: root context, clock and frame export
#[derive(Debug)]
pub struct Session {
    config: SessionConfig,
    ctx: Option<RenderContext>,
    clock: FrameClock,
}

impl Session {
    pub fn new(config: SessionConfig) -> Result<Self> {
        config.validate()?;
        let mut ctx = RenderContext::with_config(&config.render_config())?;
        if let Some(font) = &config.font {
            load_font(&mut ctx, font)?;
        }
        let clock = FrameClock::new(config.fps, config.clock);
        Ok(Self { config, ctx: Some(ctx), clock })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The root context between frames
    pub fn context(&self) -> Result<&RenderContext> {
        self.ctx.as_ref().ok_or(SessionError::ContextLost)
    }

    pub fn context_mut(&mut self) -> Result<&mut RenderContext> {
        self.ctx.as_mut().ok_or(SessionError::ContextLost)
    }

    /// Render one frame.
    ///
    /// The canvas is cleared, the root context becomes current on this
    /// thread while `scene` runs, and the flushed result is exported.
    pub fn render_frame<R>(&mut self, scene: impl FnOnce() -> R) -> Result<(Frame, R)> {
        let mut ctx = self.ctx.take().ok_or(SessionError::ContextLost)?;
        let now = self.clock.tick();
        let cycle_no = ctx.begin_frame(now);
        if let Err(e) = ctx.clear(self.config.clear) {
            self.ctx = Some(ctx);
            return Err(e.into());
        }

        let (mut ctx, result) = match scope(ctx, scene) {
            Ok(done) => done,
            Err(ScopeError { error, ctx }) => {
                // Only a scene that unregistered the root context itself loses it
                self.ctx = ctx;
                return Err(error.into());
            }
        };
        let exported = ctx.export_rgba();
        let (width, height) = (ctx.width(), ctx.height());
        self.ctx = Some(ctx);
        let frame = Frame { cycle_no, width, height, rgba: exported? };
        Ok((frame, result))
    }

    /// Render frames until the configured count is reached or the scene
    /// returns [`Control::Stop`], sending each frame to every sink.
    ///
    /// Sink failures are logged and counted. Scene and render errors end the
    /// run.
    pub fn run<R: SceneOutcome>(
        &mut self,
        mut scene: impl FnMut() -> R,
        sinks: &mut [&mut dyn FrameSink],
    ) -> Result<RunStats> {
        let mut stats = RunStats::default();
        let dropped_before = self.clock.dropped();
        info!(
            width = self.config.width,
            height = self.config.height,
            fps = self.config.fps,
            frames = ?self.config.frames,
            "session started"
        );

        loop {
            if self.config.frames.is_some_and(|limit| stats.frames >= limit) {
                break;
            }

            let (frame, outcome) = self.render_frame(&mut scene)?;
            stats.frames += 1;

            for sink in sinks.iter_mut() {
                if let Err(e) = sink.send(&frame) {
                    stats.sink_failures += 1;
                    warn!(sink = sink.name(), cycle = frame.cycle_no, error = %e, "sink failed");
                }
            }

            if outcome.into_control()? == Control::Stop {
                debug!(cycle = frame.cycle_no, "scene requested stop");
                break;
            }
        }

        stats.dropped = self.clock.dropped() - dropped_before;
        info!(
            frames = stats.frames,
            sink_failures = stats.sink_failures,
            dropped = stats.dropped,
            "session stopped"
        );
        Ok(stats)
    }

    /// Take the root context out of the session
    pub fn into_context(self) -> Result<RenderContext> {
        self.ctx.ok_or(SessionError::ContextLost)
    }
}

/// Look up the configured default font; a missing font fails the session.
fn load_font(ctx: &mut RenderContext, settings: &FontSettings) -> Result<()> {
    let families: Vec<&str> = settings.families.iter().map(String::as_str).collect();
    let query = FontQuery::new(&families).height(settings.height).ascent(settings.ascent);
    let font = FontDatabase::with_system_fonts().query(&query).map_err(RenderError::Text)?;
    ctx.set_font(font);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ClockMode, MemorySink};
    use pxl_render::{Color, with_current};

    fn fixed(frames: Option<u64>) -> SessionConfig {
        SessionConfig { frames, clock: ClockMode::Fixed, ..Default::default() }
    }

    #[test]
    fn test_render_frame_exports_scene() {
        let mut session = Session::new(fixed(None)).unwrap();
        let (frame, ()) = session
            .render_frame(|| {
                with_current(|ctx| {
                    ctx.pxl(1.0, 1.0).unwrap().color(Color::RED);
                })
                .unwrap();
            })
            .unwrap();
        assert_eq!(frame.cycle_no, 0);
        assert_eq!(frame.rgba.len(), 24 * 24 * 4);
        assert_eq!(frame.pixel(1, 1), Some([255, 0, 0, 255]));
        assert_eq!(frame.pixel(0, 0), Some([0, 0, 0, 255]));
    }

    #[test]
    fn test_frames_start_cleared() {
        let mut session = Session::new(fixed(None)).unwrap();
        session.render_frame(|| with_current(|ctx| ctx.clear(Color::WHITE))).unwrap();
        let (frame, ()) = session.render_frame(|| ()).unwrap();
        assert_eq!(frame.cycle_no, 1);
        assert_eq!(frame.pixel(5, 5), Some([0, 0, 0, 255]));
    }

    #[test]
    fn test_run_frame_limit() {
        let mut session = Session::new(fixed(Some(4))).unwrap();
        let mut sink = MemorySink::new();
        let stats = session.run(|| (), &mut [&mut sink]).unwrap();
        assert_eq!(stats.frames, 4);
        let cycles: Vec<u64> = sink.frames().iter().map(|f| f.cycle_no).collect();
        assert_eq!(cycles, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_scene_stops_run() {
        let mut session = Session::new(fixed(None)).unwrap();
        let mut calls = 0;
        let stats = session
            .run(
                || {
                    calls += 1;
                    if calls == 3 { Control::Stop } else { Control::Continue }
                },
                &mut [],
            )
            .unwrap();
        assert_eq!(stats.frames, 3);
    }

    #[test]
    fn test_scene_error_ends_run() {
        let mut session = Session::new(fixed(Some(10))).unwrap();
        let result = session.run(
            || with_current(|ctx| ctx.circle(0.0, 0.0, -1.0).map(|_| ()))?,
            &mut [],
        );
        assert!(matches!(result, Err(SessionError::Render(RenderError::InvalidParameter(_)))));
        // The context survives scene errors
        assert!(session.context().is_ok());
    }

    struct FailingSink;

    impl FrameSink for FailingSink {
        fn name(&self) -> &str {
            "failing"
        }

        fn send(&mut self, _frame: &Frame) -> Result<()> {
            Err(SessionError::Sink { sink: "failing".into(), reason: "offline".into() })
        }
    }

    #[test]
    fn test_sink_failures_are_counted() {
        let mut session = Session::new(fixed(Some(2))).unwrap();
        let mut failing = FailingSink;
        let mut memory = MemorySink::new();
        let stats = session.run(|| (), &mut [&mut failing, &mut memory]).unwrap();
        assert_eq!(stats.sink_failures, 2);
        assert_eq!(memory.frames().len(), 2);
    }

    #[test]
    fn test_invalid_config() {
        let config = SessionConfig { fps: 0, ..Default::default() };
        assert!(matches!(Session::new(config), Err(SessionError::Config(_))));
    }

    #[test]
    fn test_missing_font_fails_session() {
        let config = SessionConfig {
            font: Some(FontSettings {
                families: vec!["Definitely Not A Font XYZ".to_string()],
                ..Default::default()
            }),
            ..fixed(None)
        };
        let result = Session::new(config);
        assert!(matches!(
            result,
            Err(SessionError::Render(RenderError::Text(pxl_text::TextError::FontNotFound(_))))
        ));
    }

    struct BrokenOp;

    impl pxl_render::DrawOperation for BrokenOp {
        fn name(&self) -> &'static str {
            "broken"
        }

        fn commit(&mut self, _canvas: &mut pxl_render::Canvas) -> pxl_render::Result<()> {
            Err(RenderError::InvalidParameter("cannot draw".into()))
        }
    }

    #[test]
    fn test_failed_flush_keeps_context() {
        let mut session = Session::new(fixed(None)).unwrap();
        let result = session.render_frame(|| with_current(|ctx| ctx.begin(BrokenOp).map(|_| ())));
        assert!(matches!(result, Err(SessionError::Render(RenderError::InvalidParameter(_)))));
        // The next frame renders on the same root context
        let (frame, ()) = session.render_frame(|| ()).unwrap();
        assert_eq!(frame.cycle_no, 1);
        assert_eq!(frame.pixel(0, 0), Some([0, 0, 0, 255]));
    }
}
