use super::*;

use std::path::{Path, PathBuf};

fn write_png(dir: &Path, name: &str, width: u32, height: u32, color: [u8; 4]) -> PathBuf {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba(color));
    let path = dir.join(name);
    img.save(&path).unwrap();
    path
}

fn enabled_settings() -> RasterSettings {
    RasterSettings {
        enabled: true,
        ..RasterSettings::default()
    }
}

#[test]
fn below_activation_zoom_matches_smooth_path_exactly() {
    let dir = tempfile::tempdir().unwrap();
    let red = write_png(dir.path(), "red.png", 4, 4, [255, 0, 0, 255]);
    let canvas = Canvas::new(8, 8).unwrap();
    let mut cache = ImageCache::new(8);

    let mut frame = FrameData::new(&red);
    frame.rotation = 30.0;
    let layers = [StackLayer::opaque(&frame)];
    let view = ViewState { zoom: 1.0 };

    let pixelated = render_preview(canvas, &layers, &mut cache, &view, &enabled_settings());
    let smooth = render_preview(
        canvas,
        &layers,
        &mut cache,
        &view,
        &RasterSettings::default(),
    );

    assert!(!pixelated.pixelated);
    assert_eq!(pixelated.surface, smooth.surface);
}

#[test]
fn pixelated_path_upscales_canvas_pixels_as_blocks() {
    let dir = tempfile::tempdir().unwrap();
    let red = write_png(dir.path(), "red.png", 2, 2, [255, 0, 0, 255]);
    let canvas = Canvas::new(4, 4).unwrap();
    let mut cache = ImageCache::new(8);

    let frame = FrameData::new(&red);
    let layers = [StackLayer::opaque(&frame)];
    let view = ViewState { zoom: 2.0 };
    let mut settings = enabled_settings();
    settings.show_grid = false;

    let preview = render_preview(canvas, &layers, &mut cache, &view, &settings);
    assert!(preview.pixelated);
    assert_eq!((preview.surface.width(), preview.surface.height()), (8, 8));

    // The 2x2 frame sits on canvas pixels 1..3; zoomed, view pixels 2..6.
    for y in 0..8u32 {
        for x in 0..8u32 {
            let inside = (2..6).contains(&x) && (2..6).contains(&y);
            let expected = if inside { [255, 0, 0, 255] } else { [0, 0, 0, 0] };
            assert_eq!(preview.surface.get(x, y), expected, "pixel ({x}, {y})");
        }
    }
}

#[test]
fn out_of_canvas_content_is_cropped_not_shifted() {
    let dir = tempfile::tempdir().unwrap();
    let red = write_png(dir.path(), "red.png", 4, 4, [255, 0, 0, 255]);
    let canvas = Canvas::new(4, 4).unwrap();
    let mut cache = ImageCache::new(8);

    // Push the frame half off the left edge; the visible half must land on
    // the left canvas pixels, not snap back inside.
    let mut frame = FrameData::new(&red);
    frame.position = crate::foundation::core::Point::new(-2.0, 0.0);
    let layers = [StackLayer::opaque(&frame)];
    let view = ViewState { zoom: 2.0 };
    let mut settings = enabled_settings();
    settings.show_grid = false;

    let preview = render_preview(canvas, &layers, &mut cache, &view, &settings);
    assert_eq!(preview.surface.get(0, 4), [255, 0, 0, 255]);
    assert_eq!(preview.surface.get(4, 4), [0, 0, 0, 0]);
}

#[test]
fn grid_lines_appear_above_threshold_only() {
    let dir = tempfile::tempdir().unwrap();
    let red = write_png(dir.path(), "red.png", 2, 2, [255, 0, 0, 255]);
    let canvas = Canvas::new(2, 2).unwrap();
    let mut cache = ImageCache::new(8);
    let frame = FrameData::new(&red);
    let layers = [StackLayer::opaque(&frame)];

    let mut settings = enabled_settings();
    settings.grid_color = Rgba8::opaque(1, 2, 3);
    settings.scale_threshold = 3.0;

    let below = render_preview(canvas, &layers, &mut cache, &ViewState { zoom: 2.0 }, &settings);
    assert_eq!(below.surface.get(0, 0), [255, 0, 0, 255]);

    let above = render_preview(canvas, &layers, &mut cache, &ViewState { zoom: 4.0 }, &settings);
    // Boundary columns/rows carry the grid color; cell interiors stay red.
    assert_eq!(above.surface.get(0, 1), [1, 2, 3, 255]);
    assert_eq!(above.surface.get(4, 1), [1, 2, 3, 255]);
    assert_eq!(above.surface.get(1, 4), [1, 2, 3, 255]);
    assert_eq!(above.surface.get(1, 1), [255, 0, 0, 255]);
}

#[test]
fn overlay_geometry_is_view_space_and_sharp() {
    let dir = tempfile::tempdir().unwrap();
    let red = write_png(dir.path(), "red.png", 4, 4, [255, 0, 0, 255]);
    let canvas = Canvas::new(8, 8).unwrap();
    let mut cache = ImageCache::new(8);
    let frame = FrameData::new(&red);
    let view = ViewState { zoom: 2.0 };

    let overlay = overlay_geometry(
        canvas,
        &[&frame],
        &mut cache,
        Some(&AnchorMode::CanvasCenter),
        &view,
    );

    assert_eq!(overlay.canvas_border[0], Point::new(0.0, 0.0));
    assert_eq!(overlay.canvas_border[2], Point::new(16.0, 16.0));
    assert_eq!(overlay.selection_outlines.len(), 1);
    assert_eq!(overlay.selection_outlines[0][0], Point::new(4.0, 4.0));
    assert_eq!(overlay.anchor_marker, Some(Point::new(8.0, 8.0)));
}
