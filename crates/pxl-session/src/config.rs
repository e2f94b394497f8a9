//! Session Configuration

use std::path::{Path, PathBuf};

use pxl_render::{Color, RenderConfig};
use serde::{Deserialize, Serialize};

use crate::{ClockMode, Result, SessionError};

/// Default font looked up in the system font database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontSettings {
    /// Families to try, in order
    pub families: Vec<String>,
    /// Nominal pixel height
    pub height: f32,
    /// Ascent correction
    pub ascent: f32,
}

impl Default for FontSettings {
    fn default() -> Self {
        Self {
            families: vec!["monospace".to_string()],
            height: 8.0,
            ascent: 0.0,
        }
    }
}

/// Session configuration options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Canvas width in pixels
    pub width: u32,

    /// Canvas height in pixels
    pub height: u32,

    /// Target frame rate
    pub fps: u32,

    /// Frames to render; `None` runs until the scene stops
    pub frames: Option<u64>,

    /// Color every frame starts from
    pub clear: Color,

    /// Real-time pacing or fixed steps
    pub clock: ClockMode,

    /// Where preview images go
    pub output_dir: Option<PathBuf>,

    /// Default font for text operations
    pub font: Option<FontSettings>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            width: 24,
            height: 24,
            fps: 30,
            frames: None,
            clear: Color::BLACK,
            clock: ClockMode::RealTime,
            output_dir: None,
            font: None,
        }
    }
}

impl SessionConfig {
    /// Parse a JSON document; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: SessionConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(SessionError::Config(format!(
                "canvas must not be empty, got {}x{}",
                self.width, self.height
            )));
        }
        if self.fps == 0 {
            return Err(SessionError::Config("fps must be positive".into()));
        }
        if self.frames == Some(0) {
            return Err(SessionError::Config("frames must be positive when set".into()));
        }
        Ok(())
    }

    /// Settings for the root render context
    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            width: self.width,
            height: self.height,
            fps: self.fps,
            clear: self.clear,
        }
    }
}
