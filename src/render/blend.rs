use crate::foundation::core::Color;
use crate::foundation::math::{div_round_u32, mul_div255_u8};
use crate::render::buffer::PixelBuffer;
use crate::render::raster::Coverage;

/// Straight-alpha RGBA8 pixel.
pub(crate) type Rgba8 = [u8; 4];

/// Opaque white used as the punch paint. Only its alpha matters under destination-out.
pub(crate) const CLEAR_COLOR: Color = Color::WHITE;

/// How paint is combined with the pixels already on a surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Blending {
    /// Painted pixels overwrite the destination, alpha included.
    #[serde(alias = "none")]
    Replace,
    /// Standard source-over alpha compositing.
    #[default]
    SourceOver,
}

/// Resampling kernel used when a blit scales its source.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Filter {
    /// Nearest-neighbour sampling.
    #[serde(alias = "nearest_neighbour")]
    Nearest,
    /// Smoothed (triangle kernel) sampling.
    #[default]
    #[serde(alias = "bi_linear")]
    Bilinear,
}

/// Source-over in straight alpha.
///
/// `sa = src_a * coverage / 255`, then
/// `out_a = round(den / 255)` and `out_c = round((sc*sa*255 + dc*da*(255-sa)) / den)` where
/// `den = sa*255 + da*(255-sa)`. All divisions round half up.
pub(crate) fn over(dst: Rgba8, src: Rgba8, coverage: u8) -> Rgba8 {
    let sa = mul_div255_u8(u16::from(src[3]), u16::from(coverage));
    if sa == 0 {
        return dst;
    }

    let sa = u32::from(sa);
    let da = u32::from(dst[3]);
    let inv = 255 - sa;
    let den = sa * 255 + da * inv;
    if den == 0 {
        return [0, 0, 0, 0];
    }

    let mut out = [0u8; 4];
    for i in 0..3 {
        let num = u32::from(src[i]) * sa * 255 + u32::from(dst[i]) * da * inv;
        out[i] = div_round_u32(num, den).min(255) as u8;
    }
    out[3] = div_round_u32(den, 255).min(255) as u8;
    out
}

/// Destination-out: removes `punch_alpha * coverage` worth of destination alpha.
pub(crate) fn dest_out(dst: Rgba8, punch_alpha: u8, coverage: u8) -> Rgba8 {
    let erase = mul_div255_u8(u16::from(punch_alpha), u16::from(coverage));
    if erase == 0 {
        return dst;
    }
    let a = mul_div255_u8(u16::from(dst[3]), 255 - u16::from(erase));
    if a == 0 {
        return [0, 0, 0, 0];
    }
    [dst[0], dst[1], dst[2], a]
}

/// Punch step of the replace protocol: erase the covered region with [`CLEAR_COLOR`].
pub(crate) fn punch(buf: &mut PixelBuffer, mask: &Coverage) {
    let punch_alpha = (CLEAR_COLOR.a.clamp(0.0, 1.0) * 255.0) as u8;
    for_each_covered(buf, mask, |dst, _, _, cov| dest_out(dst, punch_alpha, cov));
}

/// Paint step: composite a solid color through the coverage mask.
pub(crate) fn paint_solid(buf: &mut PixelBuffer, mask: &Coverage, color: Rgba8) {
    for_each_covered(buf, mask, |dst, _, _, cov| over(dst, color, cov));
}

/// Paint step for blits: composite `tile` at the mask origin, one tile pixel per mask pixel.
///
/// `tile` is `tile_width` wide and addressed relative to `(tile_x, tile_y)` in surface space.
pub(crate) fn paint_tile(
    buf: &mut PixelBuffer,
    mask: &Coverage,
    tile: &image::RgbaImage,
    tile_x: i64,
    tile_y: i64,
) {
    for_each_covered(buf, mask, |dst, x, y, cov| {
        let tx = i64::from(x) - tile_x;
        let ty = i64::from(y) - tile_y;
        if tx < 0 || ty < 0 || tx >= i64::from(tile.width()) || ty >= i64::from(tile.height()) {
            return dst;
        }
        let src = tile.get_pixel(tx as u32, ty as u32).0;
        over(dst, src, cov)
    });
}

fn for_each_covered(
    buf: &mut PixelBuffer,
    mask: &Coverage,
    mut f: impl FnMut(Rgba8, u32, u32, u8) -> Rgba8,
) {
    let width = buf.width() as usize;
    let data = buf.as_bytes_mut();
    for (x, y, cov) in mask.iter() {
        if cov == 0 {
            continue;
        }
        let i = ((y as usize) * width + (x as usize)) * 4;
        let dst = [data[i], data[i + 1], data[i + 2], data[i + 3]];
        let out = f(dst, x, y, cov);
        data[i..i + 4].copy_from_slice(&out);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/blend.rs"]
mod tests;
