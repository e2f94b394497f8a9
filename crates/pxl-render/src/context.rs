//! Render context
//!
//! Owns the canvas, the pending-operation slot, the pixel cache and the
//! frame metadata for one rendering session.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::operation::{Pending, PendingOp, PixelCommit};
use crate::ops::Blit;
use crate::pixels::{PixelCache, Pixels};
use crate::{
    BlendMode, BufferBinding, Canvas, Color, DrawOperation, FontInfo, RenderError, Result,
};

static NEXT_CONTEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque render context identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextId(u64);

impl ContextId {
    fn next() -> Self {
        ContextId(NEXT_CONTEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Context creation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    /// Initial canvas color
    pub clear: Color,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 24,
            height: 24,
            fps: 30,
            clear: Color::BLACK,
        }
    }
}

/// Frame timing, stable for the duration of one scene invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameInfo {
    /// Session start, relative to the host clock's origin
    pub start_time: Duration,
    /// Time of the current frame on the same clock
    pub now: Duration,
    /// Zero-based frame counter
    pub cycle_no: u64,
    pub fps: u32,
    begun: bool,
}

impl FrameInfo {
    pub fn new(start_time: Duration, fps: u32) -> Self {
        Self { start_time, now: start_time, cycle_no: 0, fps, begun: false }
    }

    /// Time since the session started
    pub fn elapsed(&self) -> Duration {
        self.now.saturating_sub(self.start_time)
    }

    fn advance(&mut self, now: Duration) {
        if self.begun {
            self.cycle_no += 1;
        }
        self.begun = true;
        self.now = now;
    }
}

/// Rendering session state for one canvas
pub struct RenderContext {
    id: ContextId,
    canvas: Canvas,
    pending: Pending,
    pixels: Option<PixelCache>,
    frame: FrameInfo,
    font: Option<FontInfo>,
    commits: u64,
}

impl RenderContext {
    /// Create a transparent context of `width`×`height` pixels
    pub fn new(width: u32, height: u32, fps: u32) -> Result<Self> {
        Self::with_frame(width, height, FrameInfo::new(Duration::ZERO, fps))
    }

    pub fn with_config(config: &RenderConfig) -> Result<Self> {
        let mut ctx = Self::new(config.width, config.height, config.fps)?;
        ctx.canvas.clear(config.clear);
        Ok(ctx)
    }

    pub(crate) fn with_frame(width: u32, height: u32, frame: FrameInfo) -> Result<Self> {
        Self::from_canvas(Canvas::new(width, height)?, frame)
    }

    pub(crate) fn from_canvas(canvas: Canvas, frame: FrameInfo) -> Result<Self> {
        if frame.fps == 0 {
            return Err(RenderError::InvalidParameter("fps must be positive".into()));
        }
        Ok(Self {
            id: ContextId::next(),
            canvas,
            pending: Pending::Empty,
            pixels: None,
            frame,
            font: None,
            commits: 0,
        })
    }

    pub fn id(&self) -> ContextId {
        self.id
    }

    pub fn width(&self) -> u32 {
        self.canvas.width()
    }

    pub fn height(&self) -> u32 {
        self.canvas.height()
    }

    pub fn width_f(&self) -> f32 {
        self.canvas.width() as f32
    }

    pub fn height_f(&self) -> f32 {
        self.canvas.height() as f32
    }

    /// Committed canvas state; the pending operation is not reflected
    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn frame(&self) -> &FrameInfo {
        &self.frame
    }

    pub fn now(&self) -> Duration {
        self.frame.now
    }

    pub fn start_time(&self) -> Duration {
        self.frame.start_time
    }

    pub fn cycle_no(&self) -> u64 {
        self.frame.cycle_no
    }

    pub fn elapsed(&self) -> Duration {
        self.frame.elapsed()
    }

    pub fn fps(&self) -> u32 {
        self.frame.fps
    }

    /// Restart the frame clock at `start_time`
    pub fn reset_clock(&mut self, start_time: Duration) {
        self.frame = FrameInfo::new(start_time, self.frame.fps);
    }

    /// Advance to the next frame at time `now`
    pub fn begin_frame(&mut self, now: Duration) -> u64 {
        self.frame.advance(now);
        trace!(cycle = self.frame.cycle_no, "begin frame");
        self.frame.cycle_no
    }

    /// Number of operations committed so far
    pub fn commits(&self) -> u64 {
        self.commits
    }

    /// Font used by text operations that name none
    pub fn font(&self) -> Option<&FontInfo> {
        self.font.as_ref()
    }

    pub fn set_font(&mut self, font: FontInfo) {
        debug!(font = %font.name(), "default font set");
        self.font = Some(font);
    }

    pub(crate) fn inherit(&mut self, parent: &RenderContext) {
        self.font = parent.font.clone();
    }

    /// What occupies the pending slot
    pub fn binding(&self) -> BufferBinding {
        self.pending.binding()
    }

    /// Commit the pending operation, if any, and install `op`.
    pub fn begin<T: DrawOperation + 'static>(&mut self, op: T) -> Result<&mut T> {
        self.flush()?;
        trace!(op = op.name(), "begin");
        self.pending = Pending::Vector(PendingOp::new(Box::new(op)));

        match &mut self.pending {
            Pending::Vector(pending) => {
                let op: &mut dyn DrawOperation = &mut *pending.op;
                op.as_any_mut()
                    .downcast_mut::<T>()
                    .ok_or(RenderError::Internal("pending operation has unexpected type"))
            }
            _ => Err(RenderError::Internal("pending slot lost its operation")),
        }
    }

    /// Commit the pending operation and leave the slot empty.
    pub fn flush(&mut self) -> Result<()> {
        let (width, height) = (self.width(), self.height());
        match std::mem::replace(&mut self.pending, Pending::Empty) {
            Pending::Empty => return Ok(()),
            Pending::Vector(mut pending) => {
                trace!(op = pending.op.name(), "commit");
                pending.commit(&mut self.canvas)?;
            }
            Pending::Pixels(commit) => {
                let cache = self
                    .pixels
                    .as_ref()
                    .filter(|cache| cache.id == commit.buffer)
                    .ok_or(RenderError::Internal("pixel commit without its buffer"))?;
                trace!(blend = commit.blend.as_str(), "commit pixels");
                self.canvas
                    .blit(&cache.data, width, height, commit.x, commit.y, commit.blend)?;
            }
        }
        self.commits += 1;
        Ok(())
    }

    /// Flush, then copy the canvas into `into` (straight colors, row-major)
    pub fn snapshot_pixels(&mut self, into: &mut [Color]) -> Result<()> {
        self.flush()?;
        self.canvas.snapshot_into(into)
    }

    /// Flush, then export straight RGBA bytes, row-major, 4 bytes per pixel
    pub fn export_rgba(&mut self) -> Result<Vec<u8>> {
        self.flush()?;
        Ok(self.canvas.to_rgba())
    }

    /// Acquire the cached pixel buffer.
    ///
    /// If the buffer is already pending write-back it is returned as is.
    /// Otherwise the pending operation is committed, the canvas copied into
    /// the buffer and a write-back installed in the slot.
    pub fn pixels(&mut self) -> Result<Pixels<'_>> {
        let (width, height) = (self.width(), self.height());
        let bound = match (self.pending.binding(), &self.pixels) {
            (BufferBinding::PixelBound(id), Some(cache)) => cache.id == id,
            _ => false,
        };

        if !bound {
            self.flush()?;
            let cache = self.pixels.get_or_insert_with(|| PixelCache::new(width, height));
            self.canvas.snapshot_into(&mut cache.data)?;
            let buffer = cache.id;
            debug!(?buffer, "pixel buffer acquired");
            self.pending = Pending::Pixels(PixelCommit {
                buffer,
                x: 0,
                y: 0,
                blend: BlendMode::Source,
            });
        }

        match (&mut self.pending, &mut self.pixels) {
            (Pending::Pixels(commit), Some(cache)) => {
                Ok(Pixels::new(&mut cache.data, commit, width, height))
            }
            _ => Err(RenderError::Internal("pixel buffer not bound")),
        }
    }

    /// Flush, then composite a full-size buffer over the canvas
    pub fn set_pixels(&mut self, buffer: &[Color], blend: BlendMode) -> Result<()> {
        let (width, height) = (self.width(), self.height());
        self.blit(buffer, width, height, 0, 0, blend)
    }

    /// Composite a `width`×`height` buffer at (`x`, `y`).
    ///
    /// The blit is a draw operation: it commits whatever was pending and is
    /// itself committed by the next operation or flush.
    pub fn blit(
        &mut self,
        buffer: &[Color],
        width: u32,
        height: u32,
        x: i32,
        y: i32,
        blend: BlendMode,
    ) -> Result<()> {
        let op = Blit::new(buffer.to_vec(), width, height, x, y, blend)?;
        self.begin(op)?;
        Ok(())
    }

    /// Flush, then replace every pixel with `color`
    pub fn clear(&mut self, color: Color) -> Result<()> {
        self.flush()?;
        self.canvas.clear(color);
        Ok(())
    }

    pub(crate) fn canvas_flushed(&mut self) -> Result<&Canvas> {
        self.flush()?;
        Ok(&self.canvas)
    }
}

impl std::fmt::Debug for RenderContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderContext")
            .field("id", &self.id)
            .field("width", &self.width())
            .field("height", &self.height())
            .field("binding", &self.binding())
            .field("frame", &self.frame)
            .finish()
    }
}

/// Every `(x, y)` of a `size`×`size` grid, row by row
pub fn grid(size: u32) -> impl Iterator<Item = (u32, u32)> {
    (0..size).flat_map(move |y| (0..size).map(move |x| (x, y)))
}
