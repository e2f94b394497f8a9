//! Layers: child contexts composited back onto their parent

use std::ops::{Deref, DerefMut};

use tracing::debug;

use crate::context::ContextId;
use crate::{BlendMode, Canvas, Color, RenderContext, RenderError, Result, scope};

/// A child render context drawn independently and applied explicitly.
///
/// Dropping a layer without applying it discards its pixels.
#[derive(Debug)]
pub struct Layer {
    ctx: RenderContext,
    parent: ContextId,
}

impl Layer {
    /// Identity of the context this layer was created from
    pub fn parent(&self) -> ContextId {
        self.parent
    }

    /// Composite onto `parent` at (`x`, `y`).
    ///
    /// The composite is queued as a blit on the parent and commits with the
    /// parent's next operation or flush. Pixels falling outside the parent
    /// are clipped.
    pub fn apply_to(
        &mut self,
        parent: &mut RenderContext,
        x: i32,
        y: i32,
        blend: BlendMode,
    ) -> Result<()> {
        if parent.id() != self.parent {
            return Err(RenderError::ParentMismatch);
        }
        let (width, height) = (self.ctx.width(), self.ctx.height());
        let mut pixels = vec![Color::TRANSPARENT; self.ctx.canvas().len()];
        self.ctx.snapshot_pixels(&mut pixels)?;
        debug!(parent = ?self.parent, width, height, x, y, blend = blend.as_str(), "apply layer");
        parent.blit(&pixels, width, height, x, y, blend)
    }

    /// Composite onto the context active on this thread
    pub fn apply(&mut self, x: i32, y: i32, blend: BlendMode) -> Result<()> {
        scope::with_current(|parent| self.apply_to(parent, x, y, blend))?
    }

    pub fn into_context(self) -> RenderContext {
        self.ctx
    }
}

impl Deref for Layer {
    type Target = RenderContext;

    fn deref(&self) -> &RenderContext {
        &self.ctx
    }
}

impl DerefMut for Layer {
    fn deref_mut(&mut self) -> &mut RenderContext {
        &mut self.ctx
    }
}

impl RenderContext {
    fn layer(&self, canvas: Canvas) -> Result<Layer> {
        let mut ctx = RenderContext::from_canvas(canvas, *self.frame())?;
        ctx.inherit(self);
        Ok(Layer { ctx, parent: self.id() })
    }

    /// Blank layer of the same size, cleared to `clear`
    pub fn spawn(&self, clear: Color) -> Result<Layer> {
        self.spawn_sized(self.width(), self.height(), clear)
    }

    /// Blank `width`×`height` layer cleared to `clear`
    pub fn spawn_sized(&self, width: u32, height: u32, clear: Color) -> Result<Layer> {
        let mut canvas = Canvas::new(width, height)?;
        canvas.clear(clear);
        debug!(parent = ?self.id(), width, height, "spawn layer");
        self.layer(canvas)
    }

    /// Layer holding a copy of the current pixels
    pub fn fork(&mut self) -> Result<Layer> {
        let (width, height) = (self.width(), self.height());
        self.fork_region(0, 0, width, height)
    }

    /// Layer holding a copy of the region at (`x`, `y`). The region must lie
    /// inside the canvas.
    pub fn fork_region(&mut self, x: u32, y: u32, width: u32, height: u32) -> Result<Layer> {
        let canvas = self.canvas_flushed()?.crop(x, y, width, height)?;
        debug!(parent = ?self.id(), x, y, width, height, "fork layer");
        self.layer(canvas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_spawn_is_blank() {
        let mut parent = RenderContext::new(8, 8, 30).unwrap();
        parent.clear(Color::RED).unwrap();
        let layer = parent.spawn_sized(4, 2, Color::BLUE).unwrap();
        assert_eq!(layer.width(), 4);
        assert_eq!(layer.height(), 2);
        assert_eq!(layer.canvas().pixel(3, 1), Some(Color::BLUE));
        assert_eq!(layer.parent(), parent.id());
        assert_ne!(layer.id(), parent.id());
    }

    #[test]
    fn test_fork_sees_pending_drawing() {
        let mut parent = RenderContext::new(8, 8, 30).unwrap();
        parent.rect_xywh(0.0, 0.0, 8.0, 8.0).unwrap().fill().solid(Color::RED);
        let layer = parent.fork().unwrap();
        assert_eq!(layer.canvas().pixel(4, 4), Some(Color::RED));
    }

    #[test]
    fn test_fork_out_of_bounds() {
        let mut parent = RenderContext::new(8, 8, 30).unwrap();
        assert!(parent.fork_region(6, 6, 4, 4).is_err());
    }

    #[test]
    fn test_layer_inherits_frame() {
        let mut parent = RenderContext::new(8, 8, 25).unwrap();
        parent.begin_frame(Duration::from_millis(40));
        parent.begin_frame(Duration::from_millis(80));
        let layer = parent.spawn(Color::TRANSPARENT).unwrap();
        assert_eq!(layer.cycle_no(), 1);
        assert_eq!(layer.now(), Duration::from_millis(80));
        assert_eq!(layer.fps(), 25);
    }

    #[test]
    fn test_apply_to_other_context() {
        let parent = RenderContext::new(4, 4, 30).unwrap();
        let mut other = RenderContext::new(4, 4, 30).unwrap();
        let mut layer = parent.spawn(Color::RED).unwrap();
        assert!(matches!(
            layer.apply_to(&mut other, 0, 0, BlendMode::SourceOver),
            Err(RenderError::ParentMismatch)
        ));
    }

    #[test]
    fn test_apply_with_offset_clips() {
        let mut parent = RenderContext::new(4, 4, 30).unwrap();
        let mut layer = parent.spawn_sized(2, 2, Color::RED).unwrap();
        layer.apply_to(&mut parent, 3, 3, BlendMode::SourceOver).unwrap();
        parent.flush().unwrap();
        assert_eq!(parent.canvas().pixel(3, 3), Some(Color::RED));
        assert_eq!(parent.canvas().pixel(2, 2), Some(Color::TRANSPARENT));
    }
}
