use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::assets::capture::FramebufferReader;
use crate::assets::decode::{decode_image, load_image};
use crate::assets::source::SourceHandle;
use crate::foundation::core::{Color, Format, SurfaceId, pack_rgba8888};
use crate::foundation::error::{PixmapError, PixmapResult};
use crate::render::blend::{self, Blending, Filter};
use crate::render::buffer::PixelBuffer;
use crate::render::compositor::{IRect, sample_region};
use crate::render::raster::{Coverage, DrawType, Shape, rasterize};
use crate::surface::color::ColorState;
use crate::surface::opts::SurfaceOpts;
use crate::surface::registry::SharedRegistry;
use crate::surface::store::{BackingStore, Origin, PixelCache};

/// A fixed-size RGBA8888 drawing surface.
///
/// Pixel storage is allocated lazily: surfaces built from an image or video handle keep the
/// handle until the first draw or read, then copy its current frame into a fresh buffer.
/// Every mutating call invalidates the pixel cache used by [`Surface::get_pixel`].
///
/// Surfaces are registered with a [`crate::SurfaceRegistry`] on construction. Dropping a
/// surface does not unregister it; call [`Surface::dispose`].
pub struct Surface {
    id: SurfaceId,
    width: u32,
    height: u32,
    declared_format: Format,
    store: BackingStore,
    color: ColorState,
    blending: Blending,
    filter: Filter,
    cache: PixelCache,
    registry: SharedRegistry,
}

impl fmt::Debug for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Surface")
            .field("id", &self.id)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("declared_format", &self.declared_format)
            .field("materialized", &self.store.is_ready())
            .field("cached", &self.cache.is_present())
            .field("blending", &self.blending)
            .field("filter", &self.filter)
            .field("color", &self.color.style())
            .finish()
    }
}

impl Surface {
    /// Create a transparent surface. `format` is recorded as metadata only.
    pub fn new(
        registry: &SharedRegistry,
        width: u32,
        height: u32,
        format: Format,
    ) -> PixmapResult<Self> {
        Self::with_origin(registry, width, height, format, Origin::Blank)
    }

    /// Create a surface sized to a decoded image; the image is copied on first use.
    pub fn from_image(registry: &SharedRegistry, image: SourceHandle) -> PixmapResult<Self> {
        let (w, h) = (image.width(), image.height());
        Self::with_origin(registry, w, h, Format::Rgba8888, Origin::Image(image))
    }

    /// Create a surface sized to a video; the frame current at first use is copied.
    pub fn from_video(registry: &SharedRegistry, video: SourceHandle) -> PixmapResult<Self> {
        let (w, h) = (video.width(), video.height());
        Self::with_origin(registry, w, h, Format::Rgba8888, Origin::Video(video))
    }

    /// Decode encoded image bytes into a new surface.
    pub fn from_encoded(registry: &SharedRegistry, bytes: &[u8]) -> PixmapResult<Self> {
        let image = decode_image(bytes)?;
        Self::from_image(registry, Arc::new(image))
    }

    /// Load and decode an image file into a new surface.
    pub fn from_file(registry: &SharedRegistry, path: impl AsRef<Path>) -> PixmapResult<Self> {
        let image = load_image(path)?;
        Self::from_image(registry, Arc::new(image))
    }

    /// Capture a region of the current render target into an already materialized surface.
    pub fn from_framebuffer(
        registry: &SharedRegistry,
        reader: &dyn FramebufferReader,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    ) -> PixmapResult<Self> {
        validate_dimensions(width, height)?;
        let bytes = reader.read_rgba8(x, y, width, height)?;
        let captured = PixelBuffer::from_rgba8(width, height, bytes)?;
        let mut surface = Self::with_origin(
            registry,
            width,
            height,
            Format::Rgba8888,
            Origin::Captured(captured),
        )?;
        surface.store.ensure(width, height)?;
        Ok(surface)
    }

    fn with_origin(
        registry: &SharedRegistry,
        width: u32,
        height: u32,
        declared_format: Format,
        origin: Origin,
    ) -> PixmapResult<Self> {
        validate_dimensions(width, height)?;
        let id = registry.register(width, height);
        Ok(Self {
            id,
            width,
            height,
            declared_format,
            store: BackingStore::Pending(origin),
            color: ColorState::default(),
            blending: Blending::default(),
            filter: Filter::default(),
            cache: PixelCache::default(),
            registry: Arc::clone(registry),
        })
    }

    /// Identity assigned by the registry.
    pub fn id(&self) -> SurfaceId {
        self.id
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The drawing format, always [`Format::Rgba8888`].
    pub fn format(&self) -> Format {
        Format::Rgba8888
    }

    /// The format requested at construction.
    pub fn declared_format(&self) -> Format {
        self.declared_format
    }

    /// Whether pixel storage has been allocated.
    pub fn is_materialized(&self) -> bool {
        self.store.is_ready()
    }

    /// The image or video handle this surface will copy from, while it is not materialized.
    ///
    /// Uploaders can use the handle directly instead of forcing a pixel buffer.
    pub fn unmaterialized_source(&self) -> Option<&SourceHandle> {
        self.store.pending_source()
    }

    /// Current blending policy.
    pub fn blending(&self) -> Blending {
        self.blending
    }

    /// Set the blending policy for subsequent draws.
    pub fn set_blending(&mut self, blending: Blending) {
        self.blending = blending;
    }

    /// Current resampling filter.
    pub fn filter(&self) -> Filter {
        self.filter
    }

    /// Set the resampling filter used by scaled blits.
    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
    }

    /// Apply a batch of drawing options.
    pub fn configure(&mut self, opts: &SurfaceOpts) {
        self.blending = opts.blending;
        self.filter = opts.filter;
        if let Some(color) = opts.color {
            self.color.set_color(color);
        }
    }

    /// Current draw color as `(r, g, b, a)` with `a` in `[0, 1]`.
    pub fn color(&self) -> (u8, u8, u8, f32) {
        self.color.rgba()
    }

    /// Paint-style token of the current color, e.g. `rgba(255,0,0,1.0)`.
    pub fn color_style(&self) -> &str {
        self.color.style()
    }

    /// Set the draw color from a packed `0xRRGGBBAA` value.
    pub fn set_color_rgba8888(&mut self, packed: u32) {
        self.color.set_packed(packed);
    }

    /// Set the draw color from float components in `[0, 1]`.
    pub fn set_color_rgba(&mut self, r: f32, g: f32, b: f32, a: f32) {
        self.color.set_components(r, g, b, a);
    }

    /// Set the draw color.
    pub fn set_color(&mut self, color: Color) {
        self.color.set_color(color);
    }

    /// Clear the whole surface to transparent, then fill it with the current color.
    pub fn fill(&mut self) -> PixmapResult<()> {
        self.store.ensure(self.width, self.height)?.clear();
        self.cache.invalidate();
        self.fill_rectangle(0, 0, self.width as i32, self.height as i32)
    }

    /// Draw one pixel with the current color.
    pub fn draw_pixel(&mut self, x: i32, y: i32) -> PixmapResult<()> {
        self.fill_rectangle(x, y, 1, 1)
    }

    /// Set the color from `0xRRGGBBAA`, then draw one pixel.
    pub fn draw_pixel_with(&mut self, x: i32, y: i32, packed: u32) -> PixmapResult<()> {
        self.set_color_rgba8888(packed);
        self.draw_pixel(x, y)
    }

    /// Stroke a line between two points.
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32) -> PixmapResult<()> {
        self.paint_shape(Shape::Line { x0, y0, x1, y1 }, DrawType::Stroke)
    }

    /// Stroke a rectangle outline with its top-left corner at `(x, y)`.
    pub fn draw_rectangle(&mut self, x: i32, y: i32, width: i32, height: i32) -> PixmapResult<()> {
        self.paint_shape(
            Shape::Rect {
                x,
                y,
                width,
                height,
            },
            DrawType::Stroke,
        )
    }

    /// Fill a rectangle with its top-left corner at `(x, y)`.
    pub fn fill_rectangle(&mut self, x: i32, y: i32, width: i32, height: i32) -> PixmapResult<()> {
        self.paint_shape(
            Shape::Rect {
                x,
                y,
                width,
                height,
            },
            DrawType::Fill,
        )
    }

    /// Stroke a circle outline.
    pub fn draw_circle(&mut self, cx: i32, cy: i32, radius: i32) -> PixmapResult<()> {
        self.paint_shape(Shape::Circle { cx, cy, radius }, DrawType::Stroke)
    }

    /// Fill a circle.
    pub fn fill_circle(&mut self, cx: i32, cy: i32, radius: i32) -> PixmapResult<()> {
        self.paint_shape(Shape::Circle { cx, cy, radius }, DrawType::Fill)
    }

    /// Fill a triangle.
    pub fn fill_triangle(
        &mut self,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        x3: i32,
        y3: i32,
    ) -> PixmapResult<()> {
        self.paint_shape(
            Shape::Triangle {
                points: [(x1, y1), (x2, y2), (x3, y3)],
            },
            DrawType::Fill,
        )
    }

    /// Draw all of `src` with its top-left corner at `(x, y)`.
    pub fn draw_pixmap(&mut self, src: &mut Surface, x: i32, y: i32) -> PixmapResult<()> {
        let (w, h) = (src.width as i32, src.height as i32);
        self.blit(src, IRect::new(0, 0, w, h), IRect::new(x, y, w, h))
    }

    /// Draw a region of `src` unscaled with its top-left corner at `(x, y)`.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_pixmap_region(
        &mut self,
        src: &mut Surface,
        x: i32,
        y: i32,
        src_x: i32,
        src_y: i32,
        src_width: i32,
        src_height: i32,
    ) -> PixmapResult<()> {
        self.blit(
            src,
            IRect::new(src_x, src_y, src_width, src_height),
            IRect::new(x, y, src_width, src_height),
        )
    }

    /// Draw a region of `src` stretched into the destination rectangle, resampled with the
    /// current [`Filter`] when the sizes differ.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_pixmap_scaled(
        &mut self,
        src: &mut Surface,
        src_x: i32,
        src_y: i32,
        src_width: i32,
        src_height: i32,
        dst_x: i32,
        dst_y: i32,
        dst_width: i32,
        dst_height: i32,
    ) -> PixmapResult<()> {
        self.blit(
            src,
            IRect::new(src_x, src_y, src_width, src_height),
            IRect::new(dst_x, dst_y, dst_width, dst_height),
        )
    }

    /// Packed `0xRRGGBBAA` value of the pixel at `(x, y)`.
    pub fn get_pixel(&mut self, x: i32, y: i32) -> PixmapResult<u32> {
        let (width, height) = (self.width, self.height);
        let buf = self.store.ensure(width, height)?;
        if x < 0 || y < 0 || x as u32 >= width || y as u32 >= height {
            return Err(PixmapError::out_of_bounds(x, y, width, height));
        }
        let pixels = self.cache.get_or_build(buf);
        let i = ((y as usize) * (width as usize) + (x as usize)) * 4;
        Ok(pack_rgba8888([
            pixels[i],
            pixels[i + 1],
            pixels[i + 2],
            pixels[i + 3],
        ]))
    }

    /// Snapshot of all pixels as straight RGBA8888 bytes.
    pub fn pixels(&mut self) -> PixmapResult<&[u8]> {
        let buf = self.store.ensure(self.width, self.height)?;
        Ok(self.cache.get_or_build(buf))
    }

    /// Overwrite every pixel from tightly packed RGBA8888 bytes.
    pub fn set_pixels(&mut self, rgba8: &[u8]) -> PixmapResult<()> {
        if self.width == 0 || self.height == 0 {
            return Ok(());
        }
        let buf = self.store.ensure(self.width, self.height)?;
        buf.blit_replace(0, 0, self.width, self.height, rgba8)?;
        self.cache.invalidate();
        Ok(())
    }

    /// Unregister this surface. Its identity is never handed out again.
    pub fn dispose(self) -> PixmapResult<()> {
        self.registry.unregister(self.id)
    }

    /// Rasterize `shape` once and run it through the blending protocol.
    ///
    /// Replace blending punches the covered region to transparent with the clear color under
    /// destination-out, then paints the same mask with the draw color. Source-over paints once.
    fn paint_shape(&mut self, shape: Shape, draw: DrawType) -> PixmapResult<()> {
        let (width, height) = (self.width, self.height);
        let paint = self.color.paint();
        let buf = self.store.ensure(width, height)?;
        let mask = rasterize(&shape, draw, width, height);
        if self.blending == Blending::Replace {
            blend::punch(buf, &mask);
        }
        blend::paint_solid(buf, &mask, paint);
        self.cache.invalidate();
        Ok(())
    }

    fn blit(&mut self, src: &mut Surface, src_rect: IRect, dst_rect: IRect) -> PixmapResult<()> {
        let src_buf = src.store.ensure(src.width, src.height)?;
        let (width, height) = (self.width, self.height);
        let buf = self.store.ensure(width, height)?;

        let visible = dst_rect.clip_to(width, height);
        let mask = match visible {
            Some(v) => Coverage::rect(v.x, v.y, v.width, v.height, width, height),
            None => Coverage::empty(),
        };
        if self.blending == Blending::Replace {
            blend::punch(buf, &mask);
        }

        match visible {
            Some(v) if !src_rect.is_empty() => {
                let tile = sample_region(src_buf, src_rect, dst_rect, v, self.filter);
                blend::paint_tile(buf, &mask, &tile, v.x, v.y);
            }
            _ => tracing::trace!(?src_rect, ?dst_rect, "blit paints nothing"),
        }

        self.cache.invalidate();
        Ok(())
    }
}

fn validate_dimensions(width: u32, height: u32) -> PixmapResult<()> {
    let max = u32::from(u16::MAX);
    if width > max || height > max {
        return Err(PixmapError::validation(format!(
            "surface {width}x{height} exceeds {max}x{max}"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/surface/pixmap.rs"]
mod tests;
