//! PXL Session - Frame Loop and Export
//!
//! Drives a root render context frame by frame and hands every finished
//! frame to one or more sinks.
//!
//! This crate provides:
//! - Session configuration (serde, optional JSON file)
//! - A frame clock paced to the target frame rate
//! - The scene entry point that installs the context for the current thread
//! - Frame sinks: in-memory capture and PNG preview output
//!
//! # Example
//! ```rust,ignore
//! use pxl_render::{Color, with_current};
//! use pxl_session::{MemorySink, Session, SessionConfig};
//!
//! let mut session = Session::new(SessionConfig { frames: Some(3), ..Default::default() })?;
//! let mut sink = MemorySink::new();
//! session.run(|| with_current(|ctx| ctx.circle(12.0, 12.0, 8.0).map(|_| ()))?, &mut [&mut sink])?;
//! ```

mod clock;
mod config;
mod session;
mod sink;

pub use clock::{ClockMode, FrameClock};
pub use config::{FontSettings, SessionConfig};
pub use session::{Control, RunStats, SceneOutcome, Session};
pub use sink::{Frame, FrameSink, MemorySink, PngSink};

/// Session version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Session error types
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Render error: {0}")]
    Render(#[from] pxl_render::RenderError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image encoding failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("Sink '{sink}' rejected frame: {reason}")]
    Sink { sink: String, reason: String },

    #[error("Render context was lost by an earlier failure")]
    ContextLost,
}

pub type Result<T> = std::result::Result<T, SessionError>;
