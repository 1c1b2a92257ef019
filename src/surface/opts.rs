use crate::foundation::core::Color;
use crate::foundation::error::{PixmapError, PixmapResult};
use crate::render::blend::{Blending, Filter};

/// Drawing state a host can apply to a surface in one step, e.g. from a JSON config.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SurfaceOpts {
    /// Blending policy for subsequent draws.
    pub blending: Blending,
    /// Resampling kernel for scaled blits.
    pub filter: Filter,
    /// Draw color; `None` keeps the surface's current color.
    pub color: Option<Color>,
}

impl Default for SurfaceOpts {
    fn default() -> Self {
        Self {
            blending: Blending::SourceOver,
            filter: Filter::Bilinear,
            color: None,
        }
    }
}

impl SurfaceOpts {
    /// Parse options from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> PixmapResult<Self> {
        serde_json::from_str(json).map_err(|e| PixmapError::serde(e.to_string()))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/surface/opts.rs"]
mod tests;
