use image::RgbaImage;

use crate::render::blend::Filter;
use crate::render::buffer::PixelBuffer;

/// Integer rectangle with a signed origin; sizes may be negative before normalization.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct IRect {
    pub(crate) x: i64,
    pub(crate) y: i64,
    pub(crate) width: i64,
    pub(crate) height: i64,
}

impl IRect {
    pub(crate) fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x: i64::from(x),
            y: i64::from(y),
            width: i64::from(width),
            height: i64::from(height),
        }
    }

    /// Flip negative extents so the origin is the top-left corner.
    pub(crate) fn normalized(self) -> Self {
        let (x, width) = if self.width < 0 {
            (self.x + self.width, -self.width)
        } else {
            (self.x, self.width)
        };
        let (y, height) = if self.height < 0 {
            (self.y + self.height, -self.height)
        } else {
            (self.y, self.height)
        };
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub(crate) fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// The part of this rectangle inside a `width x height` surface, if any.
    pub(crate) fn clip_to(self, width: u32, height: u32) -> Option<IRect> {
        let r = self.normalized();
        let x0 = r.x.max(0);
        let y0 = r.y.max(0);
        let x1 = (r.x + r.width).min(i64::from(width));
        let y1 = (r.y + r.height).min(i64::from(height));
        (x0 < x1 && y0 < y1).then_some(IRect {
            x: x0,
            y: y0,
            width: x1 - x0,
            height: y1 - y0,
        })
    }
}

/// Resample `src_rect` of `src` onto `dst_rect`, producing only the `visible` window.
///
/// `visible` is the part of `dst_rect` that lands on the destination surface; pixel `(i, j)` of
/// the result belongs at `(visible.x + i, visible.y + j)`. Work and memory are bounded by the
/// window, not by either rectangle.
///
/// Source pixels outside `src` read as transparent. When the sizes match the copy is exact;
/// otherwise `filter` picks the kernel. Bilinear sampling interpolates premultiplied pixels so
/// transparent neighbours do not bleed their color, and clamps at the edges of `src_rect`.
pub(crate) fn sample_region(
    src: &PixelBuffer,
    src_rect: IRect,
    dst_rect: IRect,
    visible: IRect,
    filter: Filter,
) -> RgbaImage {
    let src_rect = src_rect.normalized();
    let dst_rect = dst_rect.normalized();
    let win_w = u32::try_from(visible.width).unwrap_or(0);
    let win_h = u32::try_from(visible.height).unwrap_or(0);
    let mut tile = RgbaImage::new(win_w, win_h);
    if src_rect.is_empty() || dst_rect.is_empty() {
        return tile;
    }

    let unscaled = src_rect.width == dst_rect.width && src_rect.height == dst_rect.height;
    for (tx, ty, px) in tile.enumerate_pixels_mut() {
        // Offset inside the destination rectangle.
        let u = visible.x + i64::from(tx) - dst_rect.x;
        let v = visible.y + i64::from(ty) - dst_rect.y;
        px.0 = if unscaled {
            read(src, src_rect.x + u, src_rect.y + v)
        } else {
            match filter {
                Filter::Nearest => {
                    let sx = nearest_index(u, src_rect.width, dst_rect.width);
                    let sy = nearest_index(v, src_rect.height, dst_rect.height);
                    read(src, src_rect.x + sx, src_rect.y + sy)
                }
                Filter::Bilinear => {
                    let fx = sample_coord(u, src_rect.width, dst_rect.width);
                    let fy = sample_coord(v, src_rect.height, dst_rect.height);
                    bilinear(src, src_rect, fx, fy)
                }
            }
        };
    }
    tile
}

fn read(src: &PixelBuffer, x: i64, y: i64) -> [u8; 4] {
    match (i32::try_from(x), i32::try_from(y)) {
        (Ok(x), Ok(y)) => src.get(x, y).unwrap_or([0; 4]),
        _ => [0; 4],
    }
}

/// Source index whose pixel center is nearest to destination pixel `d` under a `s / dst` scale.
fn nearest_index(d: i64, s: i64, dst: i64) -> i64 {
    let idx = (i128::from(2 * d + 1) * i128::from(s)) / (2 * i128::from(dst));
    (idx as i64).min(s - 1)
}

/// Continuous source coordinate of destination pixel center `d`, clamped to `[0, s - 1]`.
fn sample_coord(d: i64, s: i64, dst: i64) -> f64 {
    let x = (d as f64 + 0.5) * (s as f64) / (dst as f64) - 0.5;
    x.clamp(0.0, (s - 1) as f64)
}

fn bilinear(src: &PixelBuffer, rect: IRect, fx: f64, fy: f64) -> [u8; 4] {
    let (x0, y0) = (fx.floor(), fy.floor());
    let (wx, wy) = (fx - x0, fy - y0);
    let (x0, y0) = (x0 as i64, y0 as i64);
    let x1 = (x0 + 1).min(rect.width - 1);
    let y1 = (y0 + 1).min(rect.height - 1);

    let mut acc = [0.0f64; 4];
    for (sx, sy, w) in [
        (x0, y0, (1.0 - wx) * (1.0 - wy)),
        (x1, y0, wx * (1.0 - wy)),
        (x0, y1, (1.0 - wx) * wy),
        (x1, y1, wx * wy),
    ] {
        if w == 0.0 {
            continue;
        }
        let [r, g, b, a] = read(src, rect.x + sx, rect.y + sy);
        let alpha = f64::from(a);
        acc[0] += f64::from(r) * alpha / 255.0 * w;
        acc[1] += f64::from(g) * alpha / 255.0 * w;
        acc[2] += f64::from(b) * alpha / 255.0 * w;
        acc[3] += alpha * w;
    }
    unpremultiply(acc)
}

fn unpremultiply(acc: [f64; 4]) -> [u8; 4] {
    let a = acc[3].round().clamp(0.0, 255.0);
    if a == 0.0 {
        return [0; 4];
    }
    let channel = |c: f64| (c * 255.0 / acc[3]).round().clamp(0.0, 255.0) as u8;
    [channel(acc[0]), channel(acc[1]), channel(acc[2]), a as u8]
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
