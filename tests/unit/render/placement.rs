use super::*;
use crate::model::frame::CropRect;

fn frame() -> FrameData {
    FrameData::new("a.png")
}

fn close(a: Point, b: Point) -> bool {
    (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
}

#[test]
fn effective_dimensions_follow_scale_and_aspect() {
    let mut f = frame();
    f.scale = 2.0;
    f.aspect_ratio = 0.5;
    let placement = frame_placement(&f, 100, 50);
    assert_eq!(placement.width, 200.0);
    assert_eq!(placement.height, 200.0);
}

#[test]
fn crop_overrides_source_dimensions() {
    let mut f = frame();
    f.scale = 2.0;
    f.crop = Some(CropRect::new(0, 0, 10, 20));
    let placement = frame_placement(&f, 100, 50);
    assert_eq!(placement.width, 20.0);
    assert_eq!(placement.height, 40.0);
}

#[test]
fn matrix_translates_local_origin_to_position() {
    let mut f = frame();
    f.position = Point::new(7.0, -3.0);
    let placement = frame_placement(&f, 10, 10);
    assert!(close(placement.matrix * Point::ZERO, Point::new(7.0, -3.0)));
}

#[test]
fn mirror_signs_flip_one_axis_each() {
    let mut f = frame();
    f.scale = -1.0;
    let placement = frame_placement(&f, 10, 10);
    // Horizontal mirror: local +x maps to -x, +y stays +y.
    assert!(close(placement.matrix * Point::new(1.0, 0.0), Point::new(-1.0, 0.0)));
    assert!(close(placement.matrix * Point::new(0.0, 1.0), Point::new(0.0, 1.0)));

    f.scale = 1.0;
    f.aspect_ratio = -1.0;
    let placement = frame_placement(&f, 10, 10);
    assert!(close(placement.matrix * Point::new(1.0, 0.0), Point::new(1.0, 0.0)));
    assert!(close(placement.matrix * Point::new(0.0, 1.0), Point::new(0.0, -1.0)));
}

#[test]
fn rotation_spins_corners_about_position() {
    let mut f = frame();
    f.rotation = 90.0;
    let placement = frame_placement(&f, 10, 10);
    // Local +x maps to +y under a 90 degree rotation.
    assert!(close(placement.matrix * Point::new(5.0, 0.0), Point::new(0.0, 5.0)));
}

#[test]
fn corners_span_the_effective_rect() {
    let mut f = frame();
    f.scale = 2.0;
    let placement = frame_placement(&f, 10, 20);
    let corners = placement.corners();
    assert!(close(corners[0], Point::new(-10.0, -20.0)));
    assert!(close(corners[2], Point::new(10.0, 20.0)));
}

#[test]
fn degenerate_when_effective_size_rounds_to_zero() {
    let mut f = frame();
    f.scale = 0.001;
    assert!(frame_placement(&f, 100, 100).is_degenerate());

    f.scale = 1.0;
    assert!(!frame_placement(&f, 100, 100).is_degenerate());

    f.aspect_ratio = 0.0;
    assert!(frame_placement(&f, 100, 100).is_degenerate());
}
