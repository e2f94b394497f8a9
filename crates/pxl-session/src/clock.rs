//! Frame Clock
//!
//! Produces the frame time handed to each scene invocation.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::warn;

/// How frame times advance
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClockMode {
    /// Wall clock, sleeping until each frame is due
    #[default]
    RealTime,
    /// Exactly one frame interval per tick, no sleeping
    Fixed,
}

/// Frame timing relative to the session start
#[derive(Debug)]
pub struct FrameClock {
    mode: ClockMode,
    interval: Duration,
    started: Instant,
    next_due: Duration,
    ticks: u64,
    dropped: u64,
}

impl FrameClock {
    pub fn new(fps: u32, mode: ClockMode) -> Self {
        Self {
            mode,
            interval: Duration::from_secs(1) / fps.max(1),
            started: Instant::now(),
            next_due: Duration::ZERO,
            ticks: 0,
            dropped: 0,
        }
    }

    /// Time between frames
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Frames that started more than one interval late
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Wait for the next frame and return its time since the session start.
    pub fn tick(&mut self) -> Duration {
        let due = self.next_due;
        self.ticks += 1;
        self.next_due = due + self.interval;

        match self.mode {
            ClockMode::Fixed => due,
            ClockMode::RealTime => {
                let elapsed = self.started.elapsed();
                if elapsed < due {
                    std::thread::sleep(due - elapsed);
                    return due;
                }
                if elapsed > due + self.interval {
                    // Skip the backlog instead of rendering a burst
                    self.dropped += 1;
                    warn!(
                        late_ms = (elapsed - due).as_millis() as u64,
                        frame = self.ticks,
                        "frame started late"
                    );
                    self.next_due = elapsed + self.interval;
                }
                elapsed
            }
        }
    }
}
