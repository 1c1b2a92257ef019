//! Pixcanvas is a software drawing surface for RGBA8888 pixmaps.
//!
//! A [`Surface`] owns a fixed-size pixel grid and a small amount of drawing state:
//!
//! - a draw color, set from packed `0xRRGGBBAA` or float components
//! - a [`Blending`] policy: source-over compositing or replace
//! - a [`Filter`] used when blits scale their source
//!
//! Shapes are rasterized into coverage masks with `vello_cpu` and composited in straight alpha.
//! Surfaces built from decoded images or video frames defer allocating pixels until their
//! first draw or read. Identities are handed out by a [`SurfaceRegistry`].
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod foundation;
mod render;
mod surface;

pub use crate::foundation::core::{Color, Format, SurfaceId, pack_rgba8888, unpack_rgba8888};
pub use crate::foundation::error::{PixmapError, PixmapResult};

pub use crate::assets::capture::FramebufferReader;
pub use crate::assets::decode::{decode_image, load_image};
pub use crate::assets::fetch::{DownloadListener, FetchCallback, ImageFetcher, download_from_url};
pub use crate::assets::source::{DecodedImage, FrameSource, SourceHandle, VideoFrame};
pub use crate::render::blend::{Blending, Filter};
pub use crate::render::buffer::PixelBuffer;
pub use crate::surface::opts::SurfaceOpts;
pub use crate::surface::pixmap::Surface;
pub use crate::surface::registry::{InMemoryRegistry, SharedRegistry, SurfaceInfo, SurfaceRegistry};
