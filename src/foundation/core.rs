use std::fmt;

pub use kurbo::{BezPath, Point, Rect};

/// Process-unique surface identity handed out by a [`crate::SurfaceRegistry`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SurfaceId(pub u64);

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Declared pixel formats.
///
/// Surfaces always draw in RGBA8888; the declared format is kept as metadata for uploaders.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Format {
    /// 8-bit alpha only.
    Alpha,
    /// 8-bit intensity.
    Intensity,
    /// 8-bit luminance plus 8-bit alpha.
    LuminanceAlpha,
    /// Packed 16-bit RGB.
    Rgb565,
    /// Packed 16-bit RGBA.
    Rgba4444,
    /// 24-bit RGB.
    Rgb888,
    /// 32-bit RGBA, the internal representation.
    #[default]
    Rgba8888,
}

/// A color with float components in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Color {
    /// Red component.
    pub r: f32,
    /// Green component.
    pub g: f32,
    /// Blue component.
    pub b: f32,
    /// Alpha component.
    pub a: f32,
}

impl Color {
    /// Opaque white.
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);
    /// Opaque black.
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0, 1.0);
    /// Fully transparent black.
    pub const CLEAR: Color = Color::new(0.0, 0.0, 0.0, 0.0);
    /// Opaque red.
    pub const RED: Color = Color::new(1.0, 0.0, 0.0, 1.0);
    /// Opaque green.
    pub const GREEN: Color = Color::new(0.0, 1.0, 0.0, 1.0);
    /// Opaque blue.
    pub const BLUE: Color = Color::new(0.0, 0.0, 1.0, 1.0);

    /// Build a color from float components.
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Unpack a `0xRRGGBBAA` value.
    pub fn from_rgba8888(packed: u32) -> Self {
        let [r, g, b, a] = unpack_rgba8888(packed);
        Self::new(
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
            f32::from(a) / 255.0,
        )
    }

    /// Pack into `0xRRGGBBAA`, truncating each clamped component scaled by 255.
    pub fn to_rgba8888(self) -> u32 {
        fn to_u8(x: f32) -> u8 {
            (x.clamp(0.0, 1.0) * 255.0) as u8
        }
        pack_rgba8888([to_u8(self.r), to_u8(self.g), to_u8(self.b), to_u8(self.a)])
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Pack straight RGBA8 channels into `0xRRGGBBAA`.
pub fn pack_rgba8888(px: [u8; 4]) -> u32 {
    u32::from_be_bytes(px)
}

/// Split `0xRRGGBBAA` into straight RGBA8 channels.
pub fn unpack_rgba8888(packed: u32) -> [u8; 4] {
    packed.to_be_bytes()
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
