use crate::foundation::core::SurfaceId;

/// Convenience result type used across pixcanvas.
pub type PixmapResult<T> = Result<T, PixmapError>;

/// Top-level error taxonomy used by surface APIs.
#[derive(thiserror::Error, Debug)]
pub enum PixmapError {
    /// A required image/video source could not be resolved or decoded.
    #[error("resource unavailable: {0}")]
    ResourceUnavailable(String),

    /// A pixel read addressed coordinates outside the surface.
    #[error("pixel ({x}, {y}) is out of bounds for a {width}x{height} surface")]
    OutOfBounds {
        /// Requested x coordinate.
        x: i32,
        /// Requested y coordinate.
        y: i32,
        /// Surface width.
        width: u32,
        /// Surface height.
        height: u32,
    },

    /// Registry lookup on a disposed or unknown identity.
    #[error("surface {0} not found")]
    NotFound(SurfaceId),

    /// Invalid caller-provided data (sizes, byte lengths, options).
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing or deserializing options.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PixmapError {
    /// Build a [`PixmapError::ResourceUnavailable`] value.
    pub fn resource_unavailable(msg: impl Into<String>) -> Self {
        Self::ResourceUnavailable(msg.into())
    }

    /// Build a [`PixmapError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`PixmapError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Build a [`PixmapError::OutOfBounds`] value.
    pub fn out_of_bounds(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self::OutOfBounds {
            x,
            y,
            width,
            height,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
