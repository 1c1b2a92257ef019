use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::foundation::core::SurfaceId;
use crate::foundation::error::{PixmapError, PixmapResult};

/// What a registry knows about a live surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SurfaceInfo {
    /// Identity assigned at registration.
    pub id: SurfaceId,
    /// Surface width in pixels.
    pub width: u32,
    /// Surface height in pixels.
    pub height: u32,
}

/// Owner of surface identities.
///
/// Surfaces register themselves on construction and unregister on [`crate::Surface::dispose`].
/// Identities must never be reused within the registry's lifetime.
pub trait SurfaceRegistry: Send + Sync {
    /// Assign a fresh identity to a new surface.
    fn register(&self, width: u32, height: u32) -> SurfaceId;

    /// Look up a live surface; disposed or unknown identities fail with `NotFound`.
    fn lookup(&self, id: SurfaceId) -> PixmapResult<SurfaceInfo>;

    /// Forget a surface; unknown identities fail with `NotFound`.
    fn unregister(&self, id: SurfaceId) -> PixmapResult<()>;

    /// Number of live surfaces.
    fn live_count(&self) -> usize;
}

/// Registry handle passed to surface constructors.
pub type SharedRegistry = Arc<dyn SurfaceRegistry>;

/// In-process registry backed by a monotonic counter and a map of live surfaces.
#[derive(Debug, Default)]
pub struct InMemoryRegistry {
    next_id: AtomicU64,
    live: Mutex<BTreeMap<SurfaceId, SurfaceInfo>>,
}

impl InMemoryRegistry {
    /// Create an empty registry whose first identity is `#0`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience constructor returning a [`SharedRegistry`].
    pub fn shared() -> SharedRegistry {
        Arc::new(Self::new())
    }

    fn live(&self) -> std::sync::MutexGuard<'_, BTreeMap<SurfaceId, SurfaceInfo>> {
        self.live.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl SurfaceRegistry for InMemoryRegistry {
    fn register(&self, width: u32, height: u32) -> SurfaceId {
        let id = SurfaceId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.live().insert(id, SurfaceInfo { id, width, height });
        tracing::debug!(%id, width, height, "registered surface");
        id
    }

    fn lookup(&self, id: SurfaceId) -> PixmapResult<SurfaceInfo> {
        self.live()
            .get(&id)
            .copied()
            .ok_or(PixmapError::NotFound(id))
    }

    fn unregister(&self, id: SurfaceId) -> PixmapResult<()> {
        if self.live().remove(&id).is_none() {
            return Err(PixmapError::NotFound(id));
        }
        tracing::debug!(%id, "unregistered surface");
        Ok(())
    }

    fn live_count(&self) -> usize {
        self.live().len()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/surface/registry.rs"]
mod tests;
