use crate::foundation::error::{PixmapError, PixmapResult};

/// Straight-alpha RGBA8888 pixel storage, row-major and tightly packed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Allocate a fully transparent buffer.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; byte_len(width, height)],
        }
    }

    /// Wrap existing RGBA8888 bytes; the length must be `width * height * 4`.
    pub fn from_rgba8(width: u32, height: u32, data: Vec<u8>) -> PixmapResult<Self> {
        let expected = byte_len(width, height);
        if data.len() != expected {
            return Err(PixmapError::validation(format!(
                "expected {expected} rgba8 bytes for {width}x{height}, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA8888 bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Read one pixel; `None` outside the buffer.
    pub fn get(&self, x: i32, y: i32) -> Option<[u8; 4]> {
        let i = self.index(x, y)?;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    /// Write one pixel; writes outside the buffer are ignored.
    pub fn put(&mut self, x: i32, y: i32, px: [u8; 4]) {
        if let Some(i) = self.index(x, y) {
            self.data[i..i + 4].copy_from_slice(&px);
        }
    }

    /// Reset every pixel to transparent black.
    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    /// Overwrite the pixels under a `src_width x src_height` RGBA8888 block placed at `(x, y)`.
    ///
    /// Parts of the block outside the buffer are dropped. This is the replace-semantics copy used
    /// to bootstrap a surface from its source.
    pub fn blit_replace(
        &mut self,
        x: i32,
        y: i32,
        src_width: u32,
        src_height: u32,
        src: &[u8],
    ) -> PixmapResult<()> {
        if src.len() != byte_len(src_width, src_height) {
            return Err(PixmapError::validation(
                "blit_replace expects src bytes matching width*height*4",
            ));
        }

        let x0 = i64::from(x).max(0);
        let y0 = i64::from(y).max(0);
        let x1 = (i64::from(x) + i64::from(src_width)).min(i64::from(self.width));
        let y1 = (i64::from(y) + i64::from(src_height)).min(i64::from(self.height));
        if x0 >= x1 || y0 >= y1 {
            return Ok(());
        }

        let row_bytes = ((x1 - x0) as usize) * 4;
        for dy in y0..y1 {
            let sy = (dy - i64::from(y)) as usize;
            let sx = (x0 - i64::from(x)) as usize;
            let s = (sy * src_width as usize + sx) * 4;
            let d = ((dy as usize) * self.width as usize + x0 as usize) * 4;
            self.data[d..d + row_bytes].copy_from_slice(&src[s..s + row_bytes]);
        }
        Ok(())
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        Some(((y as usize) * (self.width as usize) + (x as usize)) * 4)
    }
}

pub(crate) fn byte_len(width: u32, height: u32) -> usize {
    (width as usize)
        .saturating_mul(height as usize)
        .saturating_mul(4)
}

#[cfg(test)]
#[path = "../../tests/unit/render/buffer.rs"]
mod tests;
