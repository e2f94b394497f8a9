//! Frame Sinks
//!
//! A sink is where finished frames leave the session: a device link, a
//! simulator, a preview window. Only the boundary lives here, plus two local
//! sinks.

use std::path::{Path, PathBuf};

use image::RgbaImage;
use tracing::debug;

use crate::{Result, SessionError};

/// A finished frame: straight RGBA, row-major, 4 bytes per pixel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub cycle_no: u64,
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl Frame {
    /// RGBA bytes of pixel (`x`, `y`)
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.rgba.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

/// Receiver of finished frames
pub trait FrameSink {
    /// Name used in logs
    fn name(&self) -> &str;

    fn send(&mut self, frame: &Frame) -> Result<()>;
}

/// Keeps every frame in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    frames: Vec<Frame>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn last(&self) -> Option<&Frame> {
        self.frames.last()
    }

    pub fn into_frames(self) -> Vec<Frame> {
        self.frames
    }
}

impl FrameSink for MemorySink {
    fn name(&self) -> &str {
        "memory"
    }

    fn send(&mut self, frame: &Frame) -> Result<()> {
        self.frames.push(frame.clone());
        Ok(())
    }
}

/// Writes frames as PNG files
#[derive(Debug)]
pub struct PngSink {
    dir: PathBuf,
    prefix: String,
    overwrite: bool,
    written: u64,
}

impl PngSink {
    /// One numbered file per frame: `<dir>/<prefix>-000042.png`
    pub fn numbered(dir: impl Into<PathBuf>, prefix: &str) -> Result<Self> {
        Self::create(dir.into(), prefix, false)
    }

    /// A single `<dir>/<prefix>.png` replaced on every frame
    pub fn single(dir: impl Into<PathBuf>, prefix: &str) -> Result<Self> {
        Self::create(dir.into(), prefix, true)
    }

    fn create(dir: PathBuf, prefix: &str, overwrite: bool) -> Result<Self> {
        if prefix.is_empty() || prefix.contains(['/', '\\']) {
            return Err(SessionError::Config(format!("invalid file prefix '{prefix}'")));
        }
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir, prefix: prefix.to_string(), overwrite, written: 0 })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn written(&self) -> u64 {
        self.written
    }

    /// Path the given frame is written to
    pub fn path_for(&self, frame: &Frame) -> PathBuf {
        if self.overwrite {
            self.dir.join(format!("{}.png", self.prefix))
        } else {
            self.dir.join(format!("{}-{:06}.png", self.prefix, frame.cycle_no))
        }
    }
}

impl FrameSink for PngSink {
    fn name(&self) -> &str {
        "png"
    }

    fn send(&mut self, frame: &Frame) -> Result<()> {
        let image = RgbaImage::from_raw(frame.width, frame.height, frame.rgba.clone())
            .ok_or_else(|| SessionError::Sink {
                sink: self.name().to_string(),
                reason: format!(
                    "{} bytes do not form a {}x{} image",
                    frame.rgba.len(),
                    frame.width,
                    frame.height
                ),
            })?;
        let path = self.path_for(frame);
        image.save_with_format(&path, image::ImageFormat::Png)?;
        self.written += 1;
        debug!(path = %path.display(), cycle = frame.cycle_no, "frame written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(cycle_no: u64) -> Frame {
        Frame { cycle_no, width: 2, height: 1, rgba: vec![255, 0, 0, 255, 0, 0, 255, 255] }
    }

    #[test]
    fn test_frame_pixel() {
        let frame = frame(0);
        assert_eq!(frame.pixel(1, 0), Some([0, 0, 255, 255]));
        assert_eq!(frame.pixel(2, 0), None);
    }

    #[test]
    fn test_memory_sink() {
        let mut sink = MemorySink::new();
        sink.send(&frame(0)).unwrap();
        sink.send(&frame(1)).unwrap();
        assert_eq!(sink.frames().len(), 2);
        assert_eq!(sink.last().unwrap().cycle_no, 1);
    }

    #[test]
    fn test_png_paths() {
        let dir = std::env::temp_dir().join(format!("pxl-png-paths-{}", std::process::id()));
        let numbered = PngSink::numbered(&dir, "scene").unwrap();
        assert_eq!(numbered.path_for(&frame(42)), dir.join("scene-000042.png"));
        let single = PngSink::single(&dir, "scene").unwrap();
        assert_eq!(single.path_for(&frame(42)), dir.join("scene.png"));
        assert!(PngSink::single(&dir, "a/b").is_err());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_png_round_trip() {
        let dir = std::env::temp_dir().join(format!("pxl-png-write-{}", std::process::id()));
        let mut sink = PngSink::numbered(&dir, "frame").unwrap();
        let frame = frame(3);
        sink.send(&frame).unwrap();

        let decoded = image::open(sink.path_for(&frame)).unwrap().into_rgba8();
        assert_eq!(decoded.dimensions(), (2, 1));
        assert_eq!(decoded.into_raw(), frame.rgba);
        assert_eq!(sink.written(), 1);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_malformed_frame() {
        let dir = std::env::temp_dir().join(format!("pxl-png-bad-{}", std::process::id()));
        let mut sink = PngSink::single(&dir, "bad").unwrap();
        let bad = Frame { cycle_no: 0, width: 4, height: 4, rgba: vec![0; 3] };
        assert!(matches!(sink.send(&bad), Err(SessionError::Sink { .. })));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
