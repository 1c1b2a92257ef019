use super::*;
use crate::assets::source::{DecodedImage, VideoFrame};
use crate::surface::registry::InMemoryRegistry;

const RED: u32 = 0xff00_00ff;

fn surface(width: u32, height: u32) -> Surface {
    Surface::new(&InMemoryRegistry::shared(), width, height, Format::Rgba8888).unwrap()
}

fn image(width: u32, height: u32, px: [u8; 4]) -> SourceHandle {
    let bytes = px.repeat((width * height) as usize);
    Arc::new(DecodedImage::from_rgba8(width, height, bytes).unwrap())
}

#[test]
fn new_surface_is_lazy_and_transparent() {
    let mut s = Surface::new(&InMemoryRegistry::shared(), 3, 2, Format::Rgb565).unwrap();
    assert!(!s.is_materialized());
    assert_eq!(s.format(), Format::Rgba8888);
    assert_eq!(s.declared_format(), Format::Rgb565);
    assert_eq!(s.get_pixel(2, 1).unwrap(), 0);
    assert!(s.is_materialized());
    assert_eq!(s.pixels().unwrap().len(), 3 * 2 * 4);
}

#[test]
fn default_state_matches_fresh_surface() {
    let s = surface(1, 1);
    assert_eq!(s.color(), (255, 255, 255, 0.0));
    assert_eq!(s.color_style(), "rgba(255,255,255,0.0)");
    assert_eq!(s.blending(), Blending::SourceOver);
    assert_eq!(s.filter(), Filter::Bilinear);
}

#[test]
fn setters_do_not_materialize() {
    let mut s = surface(2, 2);
    s.set_blending(Blending::Replace);
    s.set_filter(Filter::Nearest);
    s.set_color_rgba8888(RED);
    assert_eq!(s.color_style(), "rgba(255,0,0,1.0)");
    assert!(!s.is_materialized());
}

#[test]
fn oversized_surfaces_are_rejected_before_registration() {
    let reg = InMemoryRegistry::shared();
    let err = Surface::new(&reg, 70_000, 1, Format::Rgba8888).unwrap_err();
    assert!(matches!(err, PixmapError::Validation(_)));
    assert_eq!(reg.live_count(), 0);
}

#[test]
fn replace_overwrites_alpha() {
    let mut s = surface(2, 2);
    s.set_color_rgba8888(RED);
    s.fill().unwrap();
    s.set_blending(Blending::Replace);
    s.draw_pixel_with(0, 0, 0x00ff_0080).unwrap();
    assert_eq!(s.get_pixel(0, 0).unwrap(), 0x00ff_0080);
    assert_eq!(s.get_pixel(1, 1).unwrap(), RED);
}

#[test]
fn source_over_composites() {
    let mut s = surface(2, 2);
    s.set_color_rgba8888(RED);
    s.fill().unwrap();
    s.draw_pixel_with(0, 0, 0x00ff_0080).unwrap();
    assert_eq!(s.get_pixel(0, 0).unwrap(), 0x7f80_00ff);
}

#[test]
fn fill_clears_before_painting() {
    let mut s = surface(2, 2);
    s.set_color_rgba8888(RED);
    s.fill().unwrap();
    s.set_color_rgba8888(0x1020_3080);
    s.fill().unwrap();
    for y in 0..2 {
        for x in 0..2 {
            assert_eq!(s.get_pixel(x, y).unwrap(), 0x1020_3080);
        }
    }
}

#[test]
fn out_of_range_reads_fail() {
    let mut s = surface(2, 2);
    for (x, y) in [(-1, 0), (0, -1), (2, 0), (0, 2)] {
        assert!(matches!(
            s.get_pixel(x, y),
            Err(PixmapError::OutOfBounds { width: 2, height: 2, .. })
        ));
    }
}

#[test]
fn reads_see_every_mutation() {
    let mut s = surface(2, 2);
    assert_eq!(s.get_pixel(1, 1).unwrap(), 0);
    s.set_color_rgba8888(RED);
    s.fill_rectangle(1, 1, 1, 1).unwrap();
    assert_eq!(s.get_pixel(1, 1).unwrap(), RED);
    s.set_pixels(&[0u8; 16]).unwrap();
    assert_eq!(s.get_pixel(1, 1).unwrap(), 0);
}

#[test]
fn degenerate_shapes_leave_pixels_untouched() {
    let mut s = surface(4, 4);
    s.set_color_rgba8888(RED);
    s.set_blending(Blending::Replace);
    s.fill_rectangle(1, 1, 0, 0).unwrap();
    s.draw_line(2, 2, 2, 2).unwrap();
    s.fill_circle(2, 2, 0).unwrap();
    s.draw_circle(2, 2, -3).unwrap();
    s.fill_triangle(0, 0, 1, 1, 2, 2).unwrap();
    assert!(s.is_materialized());
    assert!(s.pixels().unwrap().iter().all(|&b| b == 0));
}

#[test]
fn stroked_rectangle_leaves_interior_empty() {
    let mut s = surface(10, 10);
    s.set_color_rgba8888(RED);
    s.draw_rectangle(1, 1, 8, 8).unwrap();
    assert_eq!(s.get_pixel(5, 5).unwrap(), 0);
    let edge = s.get_pixel(1, 4).unwrap() | s.get_pixel(0, 4).unwrap();
    assert_ne!(edge & 0xff, 0);
}

#[test]
fn image_surface_copies_source_on_first_use() {
    let reg = InMemoryRegistry::shared();
    let mut s = Surface::from_image(&reg, image(2, 1, [1, 2, 3, 4])).unwrap();
    assert_eq!((s.width(), s.height()), (2, 1));
    assert!(s.unmaterialized_source().is_some());
    assert_eq!(s.get_pixel(1, 0).unwrap(), 0x0102_0304);
    assert!(s.unmaterialized_source().is_none());
}

#[test]
fn video_surface_snapshots_frame_at_materialization() {
    let reg = InMemoryRegistry::shared();
    let video = Arc::new(VideoFrame::new(1, 1, vec![1, 1, 1, 255]).unwrap());
    let mut s = Surface::from_video(&reg, video.clone()).unwrap();
    video.set_frame(vec![9, 9, 9, 255]).unwrap();
    assert_eq!(s.get_pixel(0, 0).unwrap(), 0x0909_09ff);
    video.set_frame(vec![5, 5, 5, 255]).unwrap();
    assert_eq!(s.get_pixel(0, 0).unwrap(), 0x0909_09ff);
}

#[test]
fn unscaled_blit_copies_exactly() {
    let reg = InMemoryRegistry::shared();
    let mut src = Surface::from_image(&reg, image(2, 2, [10, 20, 30, 255])).unwrap();
    let mut dst = Surface::new(&reg, 4, 4, Format::Rgba8888).unwrap();
    dst.draw_pixmap(&mut src, 1, 1).unwrap();
    assert_eq!(dst.get_pixel(1, 1).unwrap(), 0x0a14_1eff);
    assert_eq!(dst.get_pixel(2, 2).unwrap(), 0x0a14_1eff);
    assert_eq!(dst.get_pixel(0, 0).unwrap(), 0);
    assert_eq!(dst.get_pixel(3, 3).unwrap(), 0);
}

#[test]
fn region_blit_reads_only_the_region() {
    let reg = InMemoryRegistry::shared();
    let mut src = Surface::new(&reg, 2, 1, Format::Rgba8888).unwrap();
    src.set_pixels(&[255, 0, 0, 255, 0, 0, 255, 255]).unwrap();
    let mut dst = Surface::new(&reg, 2, 1, Format::Rgba8888).unwrap();
    dst.draw_pixmap_region(&mut src, 0, 0, 1, 0, 1, 1).unwrap();
    assert_eq!(dst.get_pixel(0, 0).unwrap(), 0x0000_ffff);
    assert_eq!(dst.get_pixel(1, 0).unwrap(), 0);
}

#[test]
fn replace_blit_with_empty_source_still_clears_destination() {
    let reg = InMemoryRegistry::shared();
    let mut src = surface(2, 2);
    let mut dst = Surface::new(&reg, 4, 4, Format::Rgba8888).unwrap();
    dst.set_color_rgba8888(RED);
    dst.fill().unwrap();
    dst.set_blending(Blending::Replace);
    dst.draw_pixmap_scaled(&mut src, 0, 0, 0, 0, 1, 1, 2, 2).unwrap();
    assert_eq!(dst.get_pixel(1, 1).unwrap(), 0);
    assert_eq!(dst.get_pixel(2, 2).unwrap(), 0);
    assert_eq!(dst.get_pixel(0, 0).unwrap(), RED);
    assert_eq!(dst.get_pixel(3, 3).unwrap(), RED);
}

#[test]
fn configure_applies_options() {
    let mut s = surface(1, 1);
    let opts = SurfaceOpts::from_json(
        r#"{"blending":"replace","filter":"nearest","color":{"r":0.0,"g":0.0,"b":1.0,"a":1.0}}"#,
    )
    .unwrap();
    s.configure(&opts);
    assert_eq!(s.blending(), Blending::Replace);
    assert_eq!(s.filter(), Filter::Nearest);
    assert_eq!(s.color(), (0, 0, 255, 1.0));
}

#[test]
fn dispose_unregisters() {
    let reg = InMemoryRegistry::shared();
    let s = Surface::new(&reg, 1, 1, Format::Rgba8888).unwrap();
    let id = s.id();
    assert!(reg.lookup(id).is_ok());
    s.dispose().unwrap();
    assert!(matches!(reg.lookup(id), Err(PixmapError::NotFound(_))));
}

#[test]
fn huge_region_blit_touches_only_the_surface() {
    let reg = InMemoryRegistry::shared();
    let mut src = Surface::from_image(&reg, image(2, 2, [0, 0, 255, 255])).unwrap();
    let mut dst = Surface::new(&reg, 4, 4, Format::Rgba8888).unwrap();
    dst.draw_pixmap_region(&mut src, 0, 0, 0, 0, i32::MAX, i32::MAX)
        .unwrap();
    assert_eq!(dst.get_pixel(1, 1).unwrap(), 0x0000_ffff);
    assert_eq!(dst.get_pixel(2, 0).unwrap(), 0);
    assert_eq!(dst.get_pixel(3, 3).unwrap(), 0);

    dst.set_blending(Blending::Replace);
    dst.draw_pixmap_region(&mut src, i32::MIN, i32::MIN, 0, 0, i32::MAX, i32::MAX)
        .unwrap();
    assert_eq!(dst.get_pixel(1, 1).unwrap(), 0x0000_ffff);
}

#[test]
fn huge_scaled_blit_samples_only_the_visible_window() {
    let reg = InMemoryRegistry::shared();
    for filter in [Filter::Nearest, Filter::Bilinear] {
        let mut src = Surface::from_image(&reg, image(2, 2, [0, 0, 255, 255])).unwrap();
        let mut dst = Surface::new(&reg, 4, 4, Format::Rgba8888).unwrap();
        dst.set_filter(filter);
        dst.draw_pixmap_scaled(&mut src, 0, 0, 2, 2, 0, 0, i32::MAX, i32::MAX)
            .unwrap();
        assert!(
            dst.pixels()
                .unwrap()
                .chunks_exact(4)
                .all(|p| p == [0, 0, 255, 255]),
            "{filter:?}"
        );

        dst.set_blending(Blending::Replace);
        dst.draw_pixmap_scaled(&mut src, 0, 0, i32::MAX, i32::MAX, 0, 0, 4, 4)
            .unwrap();
        assert!(dst.pixels().unwrap().iter().all(|&b| b == 0), "{filter:?}");
    }
}

#[test]
fn replace_blit_copies_translucent_source_exactly() {
    let reg = InMemoryRegistry::shared();
    for filter in [Filter::Nearest, Filter::Bilinear] {
        let mut src = Surface::from_image(&reg, image(2, 2, [0, 255, 0, 0x40])).unwrap();
        let mut dst = Surface::new(&reg, 6, 6, Format::Rgba8888).unwrap();
        dst.set_color_rgba8888(RED);
        dst.fill().unwrap();
        dst.set_blending(Blending::Replace);
        dst.set_filter(filter);

        dst.draw_pixmap_scaled(&mut src, 0, 0, 2, 2, 1, 1, 4, 4).unwrap();
        for y in 0..6 {
            for x in 0..6 {
                let inside = (1..5).contains(&x) && (1..5).contains(&y);
                let want = if inside { 0x00ff_0040 } else { RED };
                assert_eq!(dst.get_pixel(x, y).unwrap(), want, "{filter:?} at {x},{y}");
            }
        }

        dst.fill().unwrap();
        dst.draw_pixmap(&mut src, 4, 4).unwrap();
        assert_eq!(dst.get_pixel(4, 4).unwrap(), 0x00ff_0040);
        assert_eq!(dst.get_pixel(5, 5).unwrap(), 0x00ff_0040);
        assert_eq!(dst.get_pixel(3, 3).unwrap(), RED);
    }
}
