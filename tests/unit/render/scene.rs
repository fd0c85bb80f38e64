use super::*;

use std::path::{Path, PathBuf};

use crate::foundation::core::Vec2;

fn write_png(dir: &Path, name: &str, width: u32, height: u32, color: [u8; 4]) -> PathBuf {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba(color));
    let path = dir.join(name);
    img.save(&path).unwrap();
    path
}

fn centered_target(width: u32, height: u32) -> Affine {
    Affine::translate(Vec2::new(f64::from(width) / 2.0, f64::from(height) / 2.0))
}

#[test]
fn stack_draws_layers_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let red = write_png(dir.path(), "red.png", 4, 4, [255, 0, 0, 255]);
    let blue = write_png(dir.path(), "blue.png", 2, 2, [0, 0, 255, 255]);
    let mut cache = ImageCache::new(8);

    let bottom = FrameData::new(&red);
    let top = FrameData::new(&blue);
    let layers = [StackLayer::opaque(&bottom), StackLayer::opaque(&top)];

    let mut target = Surface::new(4, 4);
    render_stack(
        &layers,
        &mut cache,
        centered_target(4, 4),
        Sampling::Nearest,
        &mut target,
    );

    // The smaller blue frame draws over the red center; corners stay red.
    assert_eq!(target.get(0, 0), [255, 0, 0, 255]);
    assert_eq!(target.get(1, 1), [0, 0, 255, 255]);
    assert_eq!(target.get(2, 2), [0, 0, 255, 255]);
    assert_eq!(target.get(3, 3), [255, 0, 0, 255]);
}

#[test]
fn unreadable_sources_leave_a_gap_not_a_panic() {
    let dir = tempfile::tempdir().unwrap();
    let red = write_png(dir.path(), "red.png", 2, 2, [255, 0, 0, 255]);
    let mut cache = ImageCache::new(8);

    let missing = FrameData::new(dir.path().join("missing.png"));
    let present = FrameData::new(&red);
    let layers = [StackLayer::opaque(&missing), StackLayer::opaque(&present)];

    let mut target = Surface::new(2, 2);
    render_stack(
        &layers,
        &mut cache,
        centered_target(2, 2),
        Sampling::Nearest,
        &mut target,
    );
    assert_eq!(target.get(0, 0), [255, 0, 0, 255]);
}

#[test]
fn degenerate_frames_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let red = write_png(dir.path(), "red.png", 2, 2, [255, 0, 0, 255]);
    let mut cache = ImageCache::new(8);

    let mut tiny = FrameData::new(&red);
    tiny.scale = 1e-6;
    let layers = [StackLayer::opaque(&tiny)];

    let mut target = Surface::new(2, 2);
    render_stack(
        &layers,
        &mut cache,
        centered_target(2, 2),
        Sampling::Nearest,
        &mut target,
    );
    assert_eq!(target, Surface::new(2, 2));
}

#[test]
fn onion_layers_fall_off_with_distance() {
    let frames: Vec<FrameData> = (0..5)
        .map(|i| FrameData::new(format!("f{i}.png")))
        .collect();

    let layers = onion_layers(&frames, 2, 2, 1, 0.3);
    let sources: Vec<&str> = layers
        .iter()
        .map(|l| l.frame.source.to_str().unwrap())
        .collect();
    assert_eq!(sources, vec!["f1.png", "f0.png", "f3.png"]);

    assert!((layers[0].opacity - 0.7).abs() < 1e-9);
    assert!((layers[1].opacity - 0.4).abs() < 1e-9);
    assert!((layers[2].opacity - 0.7).abs() < 1e-9);
}

#[test]
fn onion_layers_skip_disabled_and_floor_opacity() {
    let mut frames: Vec<FrameData> = (0..4)
        .map(|i| FrameData::new(format!("f{i}.png")))
        .collect();
    frames[1].disabled = true;

    let layers = onion_layers(&frames, 2, 2, 0, 0.6);
    let sources: Vec<&str> = layers
        .iter()
        .map(|l| l.frame.source.to_str().unwrap())
        .collect();
    // f1 is disabled; f0 sits at distance 2 with floored opacity.
    assert_eq!(sources, vec!["f0.png"]);
    assert!((layers[0].opacity - 0.05).abs() < 1e-9);
}

#[test]
fn onion_layers_out_of_range_current_is_empty() {
    let frames = vec![FrameData::new("a.png")];
    assert!(onion_layers(&frames, 9, 2, 2, 0.3).is_empty());
}
