use std::sync::Arc;

use crate::assets::source::DecodedImage;
use crate::foundation::error::PixmapError;
use crate::surface::pixmap::Surface;
use crate::surface::registry::SharedRegistry;

/// Completion callback handed to an [`ImageFetcher`].
pub type FetchCallback = Box<dyn FnOnce(anyhow::Result<DecodedImage>) + Send>;

/// Fetches and decodes a remote image.
///
/// Implementations may call `on_done` synchronously or from another thread, exactly once.
pub trait ImageFetcher {
    /// Start fetching `url`.
    fn fetch(&self, url: &str, on_done: FetchCallback);
}

/// Receives the outcome of [`download_from_url`].
pub trait DownloadListener: Send {
    /// Called with a surface built from the downloaded image.
    fn download_complete(&mut self, surface: Surface);

    /// Called when fetching, decoding or surface construction failed.
    fn download_failed(&mut self, error: PixmapError);
}

/// Fetch an image and deliver it to `listener` as a new surface.
///
/// Exactly one listener method is invoked per call.
pub fn download_from_url(
    registry: &SharedRegistry,
    fetcher: &dyn ImageFetcher,
    url: &str,
    mut listener: Box<dyn DownloadListener>,
) {
    let registry = Arc::clone(registry);
    let target = url.to_owned();
    fetcher.fetch(
        url,
        Box::new(move |result| {
            let surface = result
                .map_err(|e| {
                    PixmapError::resource_unavailable(format!(
                        "couldn't download image '{target}': {e:#}"
                    ))
                })
                .and_then(|image| Surface::from_image(&registry, Arc::new(image)));
            match surface {
                Ok(surface) => listener.download_complete(surface),
                Err(error) => {
                    tracing::warn!(url = %target, %error, "image download failed");
                    listener.download_failed(error);
                }
            }
        }),
    );
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fetch.rs"]
mod tests;
