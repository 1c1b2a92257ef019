use crate::foundation::error::PixmapResult;

/// Reads back a region of the active render target.
pub trait FramebufferReader {
    /// Return `width * height` tightly packed RGBA8888 pixels of the region at `(x, y)`.
    fn read_rgba8(&self, x: i32, y: i32, width: u32, height: u32) -> PixmapResult<Vec<u8>>;
}
