use kurbo::{PathEl, Shape as _};

use crate::foundation::core::{BezPath, Point, Rect};

/// Stroke width used for every outline. Not configurable.
pub(crate) const STROKE_WIDTH: f64 = 1.0;

const PATH_TOLERANCE: f64 = 0.1;

/// Whether a shape fills its interior or strokes its outline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum DrawType {
    Fill,
    Stroke,
}

/// Primitive geometry in integer surface coordinates (y down).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Shape {
    Rect {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },
    Line {
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
    },
    Circle {
        cx: i32,
        cy: i32,
        radius: i32,
    },
    Triangle {
        points: [(i32, i32); 3],
    },
}

impl Shape {
    /// Geometry that can never produce coverage for the given draw type.
    pub(crate) fn is_degenerate(&self, draw: DrawType) -> bool {
        match *self {
            Shape::Rect { width, height, .. } => match draw {
                DrawType::Fill => width == 0 || height == 0,
                DrawType::Stroke => width == 0 && height == 0,
            },
            Shape::Line { x0, y0, x1, y1 } => x0 == x1 && y0 == y1,
            Shape::Circle { radius, .. } => radius <= 0,
            Shape::Triangle { points } => {
                let [(ax, ay), (bx, by), (cx, cy)] = points.map(|(x, y)| (i64::from(x), i64::from(y)));
                let cross = (bx - ax) * (cy - ay) - (by - ay) * (cx - ax);
                match draw {
                    DrawType::Fill => cross == 0,
                    DrawType::Stroke => points[0] == points[1] && points[1] == points[2],
                }
            }
        }
    }

    pub(crate) fn to_path(&self) -> BezPath {
        match *self {
            Shape::Rect {
                x,
                y,
                width,
                height,
            } => Rect::new(
                f64::from(x),
                f64::from(y),
                f64::from(x) + f64::from(width),
                f64::from(y) + f64::from(height),
            )
            .abs()
            .to_path(PATH_TOLERANCE),
            Shape::Line { x0, y0, x1, y1 } => {
                let mut p = BezPath::new();
                p.move_to(pt(x0, y0));
                p.line_to(pt(x1, y1));
                p
            }
            Shape::Circle { cx, cy, radius } => {
                kurbo::Circle::new(pt(cx, cy), f64::from(radius.max(0))).to_path(PATH_TOLERANCE)
            }
            Shape::Triangle { points } => {
                let mut p = BezPath::new();
                p.move_to(pt(points[0].0, points[0].1));
                p.line_to(pt(points[1].0, points[1].1));
                p.line_to(pt(points[2].0, points[2].1));
                p.close_path();
                p
            }
        }
    }
}

fn pt(x: i32, y: i32) -> Point {
    Point::new(f64::from(x), f64::from(y))
}

/// Per-pixel coverage (0..=255) over an axis-aligned window of the surface.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Coverage {
    x0: u32,
    y0: u32,
    width: u32,
    height: u32,
    alpha: Vec<u8>,
}

impl Coverage {
    pub(crate) fn empty() -> Self {
        Self::default()
    }

    /// Full coverage of a rectangle, clipped to a `surface_w x surface_h` surface.
    pub(crate) fn rect(
        x: i64,
        y: i64,
        width: i64,
        height: i64,
        surface_w: u32,
        surface_h: u32,
    ) -> Self {
        let Some((x0, y0, w, h)) = clip_window(
            x,
            y,
            x.saturating_add(width),
            y.saturating_add(height),
            surface_w,
            surface_h,
        ) else {
            return Self::empty();
        };
        Self {
            x0,
            y0,
            width: w,
            height: h,
            alpha: vec![255; (w as usize) * (h as usize)],
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.alpha.iter().all(|&a| a == 0)
    }

    /// `(x, y, coverage)` in surface coordinates.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (u32, u32, u8)> + '_ {
        let w = self.width.max(1) as usize;
        self.alpha.iter().enumerate().map(move |(i, &a)| {
            let x = self.x0 + (i % w) as u32;
            let y = self.y0 + (i / w) as u32;
            (x, y, a)
        })
    }
}

/// Rasterize a shape into a coverage mask clipped to the surface.
///
/// Only the shape's bounding window is rendered: the path is painted opaque white into a
/// window-sized `vello_cpu` context and the resulting alpha channel becomes the mask.
pub(crate) fn rasterize(shape: &Shape, draw: DrawType, surface_w: u32, surface_h: u32) -> Coverage {
    if shape.is_degenerate(draw) {
        return Coverage::empty();
    }

    let path = shape.to_path();
    let margin = match draw {
        DrawType::Fill => 0.0,
        DrawType::Stroke => STROKE_WIDTH / 2.0 + 1.0,
    };
    let bbox = path.bounding_box().inflate(margin, margin);
    let Some((x0, y0, w, h)) = clip_window(
        bbox.x0.floor() as i64,
        bbox.y0.floor() as i64,
        bbox.x1.ceil() as i64,
        bbox.y1.ceil() as i64,
        surface_w,
        surface_h,
    ) else {
        return Coverage::empty();
    };

    // The window is clipped to the surface, whose dimensions are validated to fit u16.
    let (Ok(w16), Ok(h16)) = (u16::try_from(w), u16::try_from(h)) else {
        return Coverage::empty();
    };

    let mut ctx = vello_cpu::RenderContext::new(w16, h16);
    ctx.set_transform(vello_cpu::kurbo::Affine::translate((
        -f64::from(x0),
        -f64::from(y0),
    )));
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(255, 255, 255, 255));
    let cpu_path = bezpath_to_cpu(&path);
    match draw {
        DrawType::Fill => ctx.fill_path(&cpu_path),
        DrawType::Stroke => {
            ctx.set_stroke(vello_cpu::kurbo::Stroke::new(STROKE_WIDTH));
            ctx.stroke_path(&cpu_path);
        }
    }
    ctx.flush();

    let mut mask = vello_cpu::Pixmap::new(w16, h16);
    ctx.render_to_pixmap(&mut mask);
    let alpha = mask
        .data_as_u8_slice()
        .chunks_exact(4)
        .map(|px| px[3])
        .collect();

    Coverage {
        x0,
        y0,
        width: w,
        height: h,
        alpha,
    }
}

/// Clip the half-open window `[x0, x1) x [y0, y1)` to the surface.
fn clip_window(
    x0: i64,
    y0: i64,
    x1: i64,
    y1: i64,
    surface_w: u32,
    surface_h: u32,
) -> Option<(u32, u32, u32, u32)> {
    let (x0, x1) = (x0.min(x1), x0.max(x1));
    let (y0, y1) = (y0.min(y1), y0.max(y1));
    let cx0 = x0.clamp(0, i64::from(surface_w));
    let cy0 = y0.clamp(0, i64::from(surface_h));
    let cx1 = x1.clamp(0, i64::from(surface_w));
    let cy1 = y1.clamp(0, i64::from(surface_h));
    if cx0 >= cx1 || cy0 >= cy1 {
        return None;
    }
    Some((
        cx0 as u32,
        cy0 as u32,
        (cx1 - cx0) as u32,
        (cy1 - cy0) as u32,
    ))
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
