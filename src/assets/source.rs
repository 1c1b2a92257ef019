use std::sync::{Arc, Mutex};

use crate::foundation::error::{PixmapError, PixmapResult};
use crate::render::buffer::{PixelBuffer, byte_len};

/// A decoded image or video handle a surface can be bootstrapped from.
///
/// Surfaces only call [`FrameSource::draw_onto`] once, when they materialize.
pub trait FrameSource: Send + Sync {
    /// Width of the current frame in pixels.
    fn width(&self) -> u32;

    /// Height of the current frame in pixels.
    fn height(&self) -> u32;

    /// Overwrite `target` with the current frame placed at `(x, y)`.
    fn draw_onto(&self, target: &mut PixelBuffer, x: i32, y: i32) -> PixmapResult<()>;
}

/// Shared handle to a frame source.
pub type SourceHandle = Arc<dyn FrameSource>;

/// Decoded raster image in straight RGBA8.
#[derive(Clone, Debug)]
pub struct DecodedImage {
    width: u32,
    height: u32,
    rgba8: Arc<Vec<u8>>,
}

impl DecodedImage {
    /// Wrap straight RGBA8 bytes; the length must be `width * height * 4`.
    pub fn from_rgba8(width: u32, height: u32, rgba8: Vec<u8>) -> PixmapResult<Self> {
        if rgba8.len() != byte_len(width, height) {
            return Err(PixmapError::validation(
                "decoded image byte length mismatch",
            ));
        }
        Ok(Self {
            width,
            height,
            rgba8: Arc::new(rgba8),
        })
    }

    /// Pixel bytes in row-major straight RGBA8.
    pub fn rgba8(&self) -> &[u8] {
        &self.rgba8
    }
}

impl FrameSource for DecodedImage {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn draw_onto(&self, target: &mut PixelBuffer, x: i32, y: i32) -> PixmapResult<()> {
        target.blit_replace(x, y, self.width, self.height, &self.rgba8)
    }
}

/// A video element whose current frame can be swapped by the decoder feeding it.
#[derive(Debug)]
pub struct VideoFrame {
    width: u32,
    height: u32,
    current: Mutex<Vec<u8>>,
}

impl VideoFrame {
    /// Create a video handle showing `rgba8` as its current frame.
    pub fn new(width: u32, height: u32, rgba8: Vec<u8>) -> PixmapResult<Self> {
        if rgba8.len() != byte_len(width, height) {
            return Err(PixmapError::validation("video frame byte length mismatch"));
        }
        Ok(Self {
            width,
            height,
            current: Mutex::new(rgba8),
        })
    }

    /// Replace the current frame.
    pub fn set_frame(&self, rgba8: Vec<u8>) -> PixmapResult<()> {
        if rgba8.len() != byte_len(self.width, self.height) {
            return Err(PixmapError::validation("video frame byte length mismatch"));
        }
        *self.current.lock().unwrap_or_else(|e| e.into_inner()) = rgba8;
        Ok(())
    }
}

impl FrameSource for VideoFrame {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn draw_onto(&self, target: &mut PixelBuffer, x: i32, y: i32) -> PixmapResult<()> {
        let frame = self.current.lock().unwrap_or_else(|e| e.into_inner());
        target.blit_replace(x, y, self.width, self.height, &frame)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/source.rs"]
mod tests;
