//! Pixel buffer view
//!
//! Each render context owns one cached buffer of straight colors. Acquiring
//! it snapshots the canvas (after committing pending vector work) and installs
//! a write-back commit in the pending slot; acquiring again while that commit
//! is still pending hands back the same buffer untouched.

use crate::operation::{BufferId, PixelCommit};
use crate::{BlendMode, Color, RenderError, Result};

/// Buffer storage owned by a render context, allocated once
pub(crate) struct PixelCache {
    pub(crate) id: BufferId,
    pub(crate) data: Vec<Color>,
}

impl PixelCache {
    pub(crate) fn new(width: u32, height: u32) -> Self {
        Self {
            id: BufferId::next(),
            data: vec![Color::TRANSPARENT; width as usize * height as usize],
        }
    }
}

/// One pixel with its coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelCell {
    pub x: u32,
    pub y: u32,
    pub color: Color,
}

/// Mutable view of a context's pixel buffer.
///
/// Writes are visible to reads through the view immediately and reach the
/// canvas when the context next commits its pending slot.
pub struct Pixels<'a> {
    data: &'a mut [Color],
    commit: &'a mut PixelCommit,
    width: u32,
    height: u32,
}

impl<'a> Pixels<'a> {
    pub(crate) fn new(
        data: &'a mut [Color],
        commit: &'a mut PixelCommit,
        width: u32,
        height: u32,
    ) -> Self {
        Self { data, commit, width, height }
    }

    pub fn id(&self) -> BufferId {
        self.commit.buffer
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn check_index(&self, index: usize) -> Result<usize> {
        if index < self.data.len() {
            Ok(index)
        } else {
            Err(RenderError::IndexOutOfRange { index, len: self.data.len() })
        }
    }

    fn check_xy(&self, x: i32, y: i32) -> Result<usize> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return Err(RenderError::PixelOutOfRange {
                x: i64::from(x),
                y: i64::from(y),
                width: self.width,
                height: self.height,
            });
        }
        Ok(y as usize * self.width as usize + x as usize)
    }

    /// Color at linear offset `y * width + x`
    pub fn get(&self, index: usize) -> Result<Color> {
        Ok(self.data[self.check_index(index)?])
    }

    pub fn set(&mut self, index: usize, color: Color) -> Result<()> {
        let index = self.check_index(index)?;
        self.data[index] = color;
        Ok(())
    }

    pub fn get_xy(&self, x: i32, y: i32) -> Result<Color> {
        Ok(self.data[self.check_xy(x, y)?])
    }

    pub fn set_xy(&mut self, x: i32, y: i32, color: Color) -> Result<()> {
        let index = self.check_xy(x, y)?;
        self.data[index] = color;
        Ok(())
    }

    /// Every pixel in row-major order.
    ///
    /// Each call starts a fresh pass over the current contents.
    pub fn cells(&self) -> impl Iterator<Item = PixelCell> + '_ {
        let width = self.width as usize;
        self.data.iter().enumerate().map(move |(i, &color)| PixelCell {
            x: (i % width) as u32,
            y: (i / width) as u32,
            color,
        })
    }

    pub fn as_slice(&self) -> &[Color] {
        &*self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [Color] {
        &mut *self.data
    }

    pub fn fill(&mut self, color: Color) {
        self.data.fill(color);
    }

    /// Blend mode used when the buffer is written back
    pub fn blend_mode(&mut self, blend: BlendMode) -> &mut Self {
        self.commit.blend = blend;
        self
    }

    pub fn current_blend_mode(&self) -> BlendMode {
        self.commit.blend
    }
}
