use super::*;

fn png_bytes(pixels: &[[u8; 4]], width: u32, height: u32) -> Vec<u8> {
    let mut img = image::RgbaImage::new(width, height);
    for (px, src) in img.pixels_mut().zip(pixels) {
        px.0 = *src;
    }
    let mut bytes = Vec::new();
    img.write_to(
        &mut std::io::Cursor::new(&mut bytes),
        image::ImageFormat::Png,
    )
    .unwrap();
    bytes
}

#[test]
fn decode_image_premultiplies_alpha() {
    let bytes = png_bytes(&[[255, 255, 255, 128], [10, 20, 30, 255]], 2, 1);
    let decoded = decode_image(&bytes).unwrap();

    assert_eq!((decoded.width, decoded.height), (2, 1));
    assert_eq!(&decoded.rgba8_premul[0..4], &[128, 128, 128, 128]);
    assert_eq!(&decoded.rgba8_premul[4..8], &[10, 20, 30, 255]);
}

#[test]
fn decode_image_zeroes_fully_transparent_pixels() {
    let bytes = png_bytes(&[[200, 100, 50, 0]], 1, 1);
    let decoded = decode_image(&bytes).unwrap();
    assert_eq!(&decoded.rgba8_premul[0..4], &[0, 0, 0, 0]);
}

#[test]
fn decode_image_rejects_garbage() {
    assert!(decode_image(b"not an image").is_err());
}

#[test]
fn load_image_reports_missing_file() {
    let err = load_image(std::path::Path::new("/definitely/not/here.png"));
    assert!(err.is_err());
}
