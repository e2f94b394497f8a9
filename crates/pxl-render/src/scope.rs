//! Per-thread context stack
//!
//! Scene code draws on "the current context" without threading a handle
//! through every call. Each thread owns its own stack, so contexts rendered
//! on different threads never see each other.

use std::cell::RefCell;

use tracing::trace;

use crate::{RenderContext, RenderError, Result};

thread_local! {
    static CONTEXTS: RefCell<Vec<RenderContext>> = const { RefCell::new(Vec::new()) };
}

/// A context that could not be made current, or whose scope failed.
///
/// The context is handed back whenever it survived, so a caller that owns a
/// root context can keep using it after the error.
#[derive(Debug, thiserror::Error)]
#[error("{error}")]
pub struct ScopeError {
    pub error: RenderError,
    pub ctx: Option<RenderContext>,
}

impl ScopeError {
    fn returning(error: RenderError, ctx: RenderContext) -> Self {
        Self { error, ctx: Some(ctx) }
    }
}

impl From<ScopeError> for RenderError {
    fn from(e: ScopeError) -> Self {
        e.error
    }
}

/// Make `ctx` the current context of this thread.
///
/// Fails with `ContextBusy` from inside `with_current`; the context comes back
/// in the error.
pub fn register_for_thread(ctx: RenderContext) -> std::result::Result<(), ScopeError> {
    CONTEXTS.with(|stack| match stack.try_borrow_mut() {
        Ok(mut stack) => {
            trace!(id = ?ctx.id(), depth = stack.len() + 1, "register context");
            stack.push(ctx);
            Ok(())
        }
        Err(_) => Err(ScopeError::returning(RenderError::ContextBusy, ctx)),
    })
}

/// Remove and return the current context of this thread
pub fn unregister_for_thread() -> Result<RenderContext> {
    CONTEXTS.with(|stack| {
        let mut stack = stack.try_borrow_mut().map_err(|_| RenderError::ContextBusy)?;
        let ctx = stack.pop().ok_or(RenderError::NoActiveContext)?;
        trace!(id = ?ctx.id(), depth = stack.len(), "unregister context");
        Ok(ctx)
    })
}

/// Lend the current context to `f`.
///
/// Fails with `NoActiveContext` outside a scope and with `ContextBusy` when
/// called from inside another `with_current`.
pub fn with_current<R>(f: impl FnOnce(&mut RenderContext) -> R) -> Result<R> {
    CONTEXTS.with(|stack| {
        let mut stack = stack.try_borrow_mut().map_err(|_| RenderError::ContextBusy)?;
        let ctx = stack.last_mut().ok_or(RenderError::NoActiveContext)?;
        Ok(f(ctx))
    })
}

/// Number of contexts registered on this thread
pub fn depth() -> usize {
    CONTEXTS.with(|stack| stack.try_borrow().map_or(0, |stack| stack.len()))
}

/// Pops everything above `depth` when dropped, including on unwind
struct ScopeGuard {
    depth: usize,
    armed: bool,
}

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        CONTEXTS.with(|stack| {
            if let Ok(mut stack) = stack.try_borrow_mut() {
                stack.truncate(self.depth - 1);
            }
        });
    }
}

/// Run `scene` with `ctx` as the current context.
///
/// The pending operation is flushed after the scene returns and the context
/// is handed back together with the scene's result. A failed flush returns
/// the context inside the error.
pub fn scope<R>(
    ctx: RenderContext,
    scene: impl FnOnce() -> R,
) -> std::result::Result<(RenderContext, R), ScopeError> {
    register_for_thread(ctx)?;
    let mut guard = ScopeGuard { depth: depth(), armed: true };

    let result = scene();

    guard.armed = false;
    let popped = CONTEXTS.with(|stack| {
        let mut stack = stack.try_borrow_mut().map_err(|_| RenderError::ContextBusy)?;
        if stack.len() < guard.depth {
            return Err(RenderError::Internal("scoped context was unregistered by the scene"));
        }
        // Contexts the scene registered but never removed are dropped
        stack.truncate(guard.depth);
        stack.pop().ok_or(RenderError::NoActiveContext)
    });
    let mut ctx = popped.map_err(|error| ScopeError { error, ctx: None })?;
    match ctx.flush() {
        Ok(()) => Ok((ctx, result)),
        Err(error) => Err(ScopeError::returning(error, ctx)),
    }
}
