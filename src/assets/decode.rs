use std::path::Path;

use crate::assets::source::DecodedImage;
use crate::foundation::error::{PixmapError, PixmapResult};

/// Decode encoded image bytes (any format the `image` crate understands) into straight RGBA8.
pub fn decode_image(bytes: &[u8]) -> PixmapResult<DecodedImage> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| PixmapError::resource_unavailable(format!("couldn't decode image: {e}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    DecodedImage::from_rgba8(width, height, rgba.into_raw())
}

/// Read and decode an image file.
pub fn load_image(path: impl AsRef<Path>) -> PixmapResult<DecodedImage> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| {
        PixmapError::resource_unavailable(format!(
            "couldn't load image '{}': {e}",
            path.display()
        ))
    })?;
    decode_image(&bytes)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
