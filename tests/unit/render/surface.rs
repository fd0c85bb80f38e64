use super::*;

use std::sync::Arc;

fn solid_source(width: u32, height: u32, premul: [u8; 4]) -> SourceImage {
    let mut data = Vec::with_capacity(width as usize * height as usize * 4);
    for _ in 0..width * height {
        data.extend_from_slice(&premul);
    }
    SourceImage {
        width,
        height,
        rgba8_premul: Arc::new(data),
    }
}

fn full_region(source: &SourceImage) -> CropRect {
    CropRect::new(0, 0, source.width, source.height)
}

#[test]
fn over_opacity_zero_is_noop() {
    let dst = [1, 2, 3, 4];
    assert_eq!(over(dst, [200, 200, 200, 200], 0.0), dst);
}

#[test]
fn over_transparent_src_is_noop() {
    let dst = [10, 20, 30, 40];
    assert_eq!(over(dst, [0, 0, 0, 0], 1.0), dst);
}

#[test]
fn over_opaque_src_replaces_dst() {
    assert_eq!(over([0, 0, 0, 255], [255, 0, 0, 255], 1.0), [255, 0, 0, 255]);
}

#[test]
fn over_transparent_dst_returns_src() {
    assert_eq!(over([0, 0, 0, 0], [100, 110, 120, 200], 1.0), [100, 110, 120, 200]);
}

#[test]
fn unpremultiply_round_trips_opaque_and_transparent() {
    assert_eq!(unpremultiply([10, 20, 30, 255]), [10, 20, 30, 255]);
    assert_eq!(unpremultiply([0, 0, 0, 0]), [0, 0, 0, 0]);
    assert_eq!(unpremultiply([128, 128, 128, 128]), [255, 255, 255, 128]);
}

#[test]
fn filled_surface_holds_premultiplied_background() {
    let surface = Surface::filled(2, 2, Rgba8::new(255, 255, 255, 128));
    assert_eq!(surface.get(0, 0), [128, 128, 128, 128]);
    assert_eq!(surface.get(1, 1), [128, 128, 128, 128]);
}

#[test]
fn draw_image_covers_exact_axis_aligned_block() {
    // A 2x scaled 4x4 source centered on a 16x16 surface covers exactly the
    // central 8x8 block.
    let source = solid_source(4, 4, [0, 255, 0, 255]);
    let view = SourceView::new(&source, full_region(&source));
    let mut surface = Surface::new(16, 16);

    let matrix = Affine::translate((8.0, 8.0));
    surface.draw_image(&view, 8.0, 8.0, matrix, Sampling::Nearest, 1.0);

    for y in 0..16 {
        for x in 0..16 {
            let inside = (4..12).contains(&x) && (4..12).contains(&y);
            let expected = if inside { [0, 255, 0, 255] } else { [0, 0, 0, 0] };
            assert_eq!(surface.get(x, y), expected, "pixel ({x}, {y})");
        }
    }
}

#[test]
fn draw_image_applies_layer_opacity() {
    let source = solid_source(2, 2, [255, 0, 0, 255]);
    let view = SourceView::new(&source, full_region(&source));
    let mut surface = Surface::new(2, 2);

    let matrix = Affine::translate((1.0, 1.0));
    surface.draw_image(&view, 2.0, 2.0, matrix, Sampling::Nearest, 0.5);

    let px = surface.get(0, 0);
    assert_eq!(px[3], 128);
    assert_eq!(px[0], 128);
}

#[test]
fn draw_image_ignores_degenerate_matrices() {
    let source = solid_source(2, 2, [255, 0, 0, 255]);
    let view = SourceView::new(&source, full_region(&source));
    let mut surface = Surface::new(4, 4);

    surface.draw_image(
        &view,
        2.0,
        2.0,
        Affine::scale_non_uniform(0.0, 1.0),
        Sampling::Nearest,
        1.0,
    );
    assert_eq!(surface, Surface::new(4, 4));
}

#[test]
fn composite_over_clips_outside_target() {
    let mut surface = Surface::new(4, 4);
    let src = vec![255u8; 2 * 2 * 4];
    surface.composite_over(2, 2, &src, 3, 3).unwrap();

    assert_eq!(surface.get(3, 3), [255, 255, 255, 255]);
    assert_eq!(surface.get(2, 2), [0, 0, 0, 0]);
}

#[test]
fn composite_over_rejects_bad_length() {
    let mut surface = Surface::new(4, 4);
    assert!(surface.composite_over(2, 2, &[0u8; 3], 0, 0).is_err());
}

#[test]
fn scale_nearest_doubles_blocks_exactly() {
    let mut small = Surface::new(2, 1);
    small.put_premul(0, 0, [255, 0, 0, 255]);
    small.put_premul(1, 0, [0, 0, 255, 255]);

    let big = small.scale_nearest(4, 2);
    for y in 0..2 {
        assert_eq!(big.get(0, y), [255, 0, 0, 255]);
        assert_eq!(big.get(1, y), [255, 0, 0, 255]);
        assert_eq!(big.get(2, y), [0, 0, 255, 255]);
        assert_eq!(big.get(3, y), [0, 0, 255, 255]);
    }
}

#[test]
fn crop_reads_transparent_outside() {
    let mut surface = Surface::new(2, 2);
    surface.put_premul(0, 0, [9, 9, 9, 255]);

    let cropped = surface.crop(-1, -1, 3, 3);
    assert_eq!(cropped.get(0, 0), [0, 0, 0, 0]);
    assert_eq!(cropped.get(1, 1), [9, 9, 9, 255]);
}

#[test]
fn source_view_respects_crop_window() {
    // 2x1 source: left texel red, right texel blue; view only the right one.
    let mut data = Vec::new();
    data.extend_from_slice(&[255, 0, 0, 255]);
    data.extend_from_slice(&[0, 0, 255, 255]);
    let source = SourceImage {
        width: 2,
        height: 1,
        rgba8_premul: Arc::new(data),
    };

    let view = SourceView::new(&source, CropRect::new(1, 0, 1, 1));
    let cell = view.to_surface();
    assert_eq!((cell.width(), cell.height()), (1, 1));
    assert_eq!(cell.get(0, 0), [0, 0, 255, 255]);
}

#[test]
fn to_rgba_image_unpremultiplies() {
    let mut surface = Surface::new(1, 1);
    surface.put_premul(0, 0, [64, 64, 64, 128]);
    let img = surface.to_rgba_image();
    assert_eq!(img.get_pixel(0, 0).0, [128, 128, 128, 128]);
}
