//! Draw operations and the pending-operation slot
//!
//! A render context holds at most one uncommitted operation. Beginning a new
//! one commits the previous occupant, which keeps commits in begin order.

use std::any::Any;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::{BlendMode, Canvas, RenderError, Result};

/// Downcast support for boxed operations
pub trait AsAnyMut {
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAnyMut for T {
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A configurable, one-shot unit of rendering work
pub trait DrawOperation: AsAnyMut + Send {
    /// Short name for logs
    fn name(&self) -> &'static str;

    /// Rasterize onto `canvas`. Called at most once per operation.
    fn commit(&mut self, canvas: &mut Canvas) -> Result<()>;
}

/// Lifecycle of a pending operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpState {
    Configured,
    Committed,
}

/// An operation owned by the slot together with its state
pub(crate) struct PendingOp {
    pub(crate) op: Box<dyn DrawOperation>,
    state: OpState,
}

impl PendingOp {
    pub(crate) fn new(op: Box<dyn DrawOperation>) -> Self {
        Self { op, state: OpState::Configured }
    }

    #[cfg(test)]
    pub(crate) fn state(&self) -> OpState {
        self.state
    }

    pub(crate) fn commit(&mut self, canvas: &mut Canvas) -> Result<()> {
        if self.state == OpState::Committed {
            return Err(RenderError::DoubleCommit);
        }
        self.state = OpState::Committed;
        self.op.commit(canvas)
    }
}

static NEXT_BUFFER_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a cached pixel buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferId(u64);

impl BufferId {
    pub(crate) fn next() -> Self {
        BufferId(NEXT_BUFFER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Write-back of the cached pixel buffer into the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelCommit {
    pub buffer: BufferId,
    pub x: i32,
    pub y: i32,
    pub blend: BlendMode,
}

/// What the pending slot currently holds, as seen from the pixel cache
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferBinding {
    /// Slot is empty
    None,
    /// A vector operation is pending
    VectorPending,
    /// The cached buffer is pending write-back
    PixelBound(BufferId),
}

pub(crate) enum Pending {
    Empty,
    Vector(PendingOp),
    Pixels(PixelCommit),
}

impl Pending {
    pub(crate) fn binding(&self) -> BufferBinding {
        match self {
            Pending::Empty => BufferBinding::None,
            Pending::Vector(_) => BufferBinding::VectorPending,
            Pending::Pixels(commit) => BufferBinding::PixelBound(commit.buffer),
        }
    }
}
