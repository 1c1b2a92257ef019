use crate::foundation::core::{Color, unpack_rgba8888};
use crate::foundation::math::alpha_to_u8;

/// Current draw color plus its eagerly computed paint-style token.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ColorState {
    r: u8,
    g: u8,
    b: u8,
    a: f32,
    style: String,
}

impl Default for ColorState {
    fn default() -> Self {
        Self::from_parts(255, 255, 255, 0.0)
    }
}

impl ColorState {
    fn from_parts(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self {
            r,
            g,
            b,
            a,
            style: make_style(r, g, b, a),
        }
    }

    /// `0xRRGGBBAA`.
    pub(crate) fn set_packed(&mut self, packed: u32) {
        let [r, g, b, a] = unpack_rgba8888(packed);
        *self = Self::from_parts(r, g, b, f32::from(a) / 255.0);
    }

    /// Float components in `[0, 1]`; r, g, b are truncated after scaling by 255.
    pub(crate) fn set_components(&mut self, r: f32, g: f32, b: f32, a: f32) {
        fn to_u8(x: f32) -> u8 {
            (x.clamp(0.0, 1.0) * 255.0) as u8
        }
        *self = Self::from_parts(to_u8(r), to_u8(g), to_u8(b), a.clamp(0.0, 1.0));
    }

    pub(crate) fn set_color(&mut self, color: Color) {
        self.set_components(color.r, color.g, color.b, color.a);
    }

    pub(crate) fn rgba(&self) -> (u8, u8, u8, f32) {
        (self.r, self.g, self.b, self.a)
    }

    pub(crate) fn style(&self) -> &str {
        &self.style
    }

    /// The color as a straight RGBA8 paint.
    pub(crate) fn paint(&self) -> [u8; 4] {
        [self.r, self.g, self.b, alpha_to_u8(self.a)]
    }
}

pub(crate) fn make_style(r: u8, g: u8, b: u8, a: f32) -> String {
    format!("rgba({r},{g},{b},{a:?})")
}

#[cfg(test)]
#[path = "../../tests/unit/surface/color.rs"]
mod tests;
