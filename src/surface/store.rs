use crate::assets::source::SourceHandle;
use crate::foundation::error::{PixmapError, PixmapResult};
use crate::render::buffer::PixelBuffer;

/// Where a surface's initial pixels come from.
pub(crate) enum Origin {
    /// Raw dimensions; starts fully transparent.
    Blank,
    /// Decoded image handle.
    Image(SourceHandle),
    /// Video frame handle; its frame at materialization time is copied.
    Video(SourceHandle),
    /// Already captured RGBA8888 bytes.
    Captured(PixelBuffer),
}

impl Origin {
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Origin::Blank => "blank",
            Origin::Image(_) => "image",
            Origin::Video(_) => "video",
            Origin::Captured(_) => "captured",
        }
    }

    /// Produce the initial buffer. Sources are copied with replace semantics; a failed copy
    /// leaves the origin untouched.
    fn materialize(&mut self, width: u32, height: u32) -> PixmapResult<PixelBuffer> {
        match self {
            Origin::Blank => Ok(PixelBuffer::new(width, height)),
            Origin::Image(src) | Origin::Video(src) => {
                let mut buf = PixelBuffer::new(width, height);
                src.draw_onto(&mut buf, 0, 0)?;
                Ok(buf)
            }
            Origin::Captured(buf) => Ok(std::mem::replace(buf, PixelBuffer::new(0, 0))),
        }
    }
}

/// Lazily materialized pixel storage.
pub(crate) enum BackingStore {
    Pending(Origin),
    Ready(PixelBuffer),
}

impl BackingStore {
    pub(crate) fn is_ready(&self) -> bool {
        matches!(self, BackingStore::Ready(_))
    }

    /// The image/video handle while the store has not been materialized yet.
    pub(crate) fn pending_source(&self) -> Option<&SourceHandle> {
        match self {
            BackingStore::Pending(Origin::Image(src) | Origin::Video(src)) => Some(src),
            _ => None,
        }
    }

    /// Materialize on first call; later calls return the same buffer.
    #[tracing::instrument(level = "debug", skip(self))]
    pub(crate) fn ensure(&mut self, width: u32, height: u32) -> PixmapResult<&mut PixelBuffer> {
        if let BackingStore::Pending(origin) = self {
            tracing::debug!(origin = origin.kind(), "materializing surface");
            let buf = origin.materialize(width, height)?;
            *self = BackingStore::Ready(buf);
        }
        match self {
            BackingStore::Ready(buf) => Ok(buf),
            BackingStore::Pending(_) => Err(PixmapError::validation(
                "backing store is still pending after materialization",
            )),
        }
    }
}

/// Snapshot of the buffer used to answer pixel reads.
#[derive(Debug, Default)]
pub(crate) struct PixelCache {
    snapshot: Option<Vec<u8>>,
}

impl PixelCache {
    pub(crate) fn invalidate(&mut self) {
        self.snapshot = None;
    }

    pub(crate) fn is_present(&self) -> bool {
        self.snapshot.is_some()
    }

    pub(crate) fn get_or_build(&mut self, buf: &PixelBuffer) -> &[u8] {
        self.snapshot
            .get_or_insert_with(|| buf.as_bytes().to_vec())
            .as_slice()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/surface/store.rs"]
mod tests;
