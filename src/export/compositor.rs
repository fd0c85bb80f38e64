use image::RgbaImage;
use image::imageops::{self, FilterType};

use crate::assets::cache::ImageCache;
use crate::foundation::core::{Canvas, Rgba8};
use crate::model::frame::FrameData;
use crate::render::placement::frame_placement;
use crate::render::surface::Surface;

/// Why a frame contributed no pixels to its composed canvas.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SkipReason {
    /// The source path was unreadable or undecodable.
    #[error("source image missing or unreadable")]
    MissingSource,
    /// Effective width or height rounds to zero.
    #[error("effective size rounds to zero")]
    DegenerateTransform,
    /// Any other per-frame failure; the batch continues without this frame.
    #[error("frame could not be composed: {0}")]
    Other(String),
}

/// One composed canvas plus whether its frame was skipped.
///
/// A skipped frame still yields a background-filled canvas (the "transparent
/// gap" policy) so batch exports keep their frame count.
#[derive(Clone, Debug)]
pub struct ComposedFrame {
    /// Canvas-sized premultiplied pixel buffer.
    pub surface: Surface,
    /// Set when the frame contributed no pixels.
    pub skipped: Option<SkipReason>,
}

/// Render one frame onto a background-filled canvas, batch-quality.
///
/// The geometry comes from the same placement routine the interactive paths
/// use; the resampling is deliberately different — `Lanczos3` for scaling and
/// bilinear rotation instead of the preview's nearest-neighbor:
///
/// 1. fill a canvas-sized buffer with `background`;
/// 2. crop per the frame's clamped crop rect;
/// 3. resize to the rounded effective dimensions;
/// 4. mirror flips (horizontal iff `scale < 0`, vertical iff
///    `aspect_ratio < 0`) before rotation;
/// 5. rotate with bounding-box auto-expansion;
/// 6. alpha-composite centered at `canvas_center + position`.
#[tracing::instrument(skip(frame, cache), fields(source = %frame.source.display()))]
pub fn compose_frame(
    frame: &FrameData,
    canvas: Canvas,
    background: Rgba8,
    cache: &mut ImageCache,
) -> ComposedFrame {
    let mut surface = Surface::filled(canvas.width, canvas.height, background);

    let Some(source) = cache.get(&frame.source) else {
        tracing::warn!("skipping frame: source missing");
        return ComposedFrame {
            surface,
            skipped: Some(SkipReason::MissingSource),
        };
    };

    let placement = frame_placement(frame, source.width, source.height);
    if placement.is_degenerate() {
        tracing::warn!("skipping frame: degenerate transform");
        return ComposedFrame {
            surface,
            skipped: Some(SkipReason::DegenerateTransform),
        };
    }

    let Some(full) = RgbaImage::from_raw(
        source.width,
        source.height,
        source.rgba8_premul.as_ref().clone(),
    ) else {
        tracing::warn!("skipping frame: source buffer length mismatch");
        return ComposedFrame {
            surface,
            skipped: Some(SkipReason::Other("source buffer length mismatch".into())),
        };
    };

    let content = frame.content_rect(source.width, source.height);
    let cropped = if content.x == 0
        && content.y == 0
        && content.width == source.width
        && content.height == source.height
    {
        full
    } else {
        imageops::crop_imm(&full, content.x, content.y, content.width, content.height).to_image()
    };

    let target_w = placement.width.round() as u32;
    let target_h = placement.height.round() as u32;
    let resized = if (target_w, target_h) == (cropped.width(), cropped.height()) {
        cropped
    } else {
        imageops::resize(&cropped, target_w, target_h, FilterType::Lanczos3)
    };

    let flipped = match (frame.mirrored_h(), frame.mirrored_v()) {
        (false, false) => resized,
        (true, false) => imageops::flip_horizontal(&resized),
        (false, true) => imageops::flip_vertical(&resized),
        (true, true) => imageops::flip_vertical(&imageops::flip_horizontal(&resized)),
    };

    let rotated = if frame.rotation == 0.0 {
        flipped
    } else {
        rotate_expand(&flipped, frame.rotation)
    };

    let dest_x = (f64::from(canvas.width) / 2.0 + frame.position.x
        - f64::from(rotated.width()) / 2.0)
        .round() as i64;
    let dest_y = (f64::from(canvas.height) / 2.0 + frame.position.y
        - f64::from(rotated.height()) / 2.0)
        .round() as i64;

    let skipped = match surface.composite_over(
        rotated.width(),
        rotated.height(),
        rotated.as_raw(),
        dest_x,
        dest_y,
    ) {
        Ok(()) => None,
        Err(err) => {
            tracing::warn!(%err, "skipping frame: composite failed");
            Some(SkipReason::Other(err.to_string()))
        }
    };

    ComposedFrame { surface, skipped }
}

/// Rotate a premultiplied RGBA buffer about its center by `degrees`, expanding
/// the output to the rotated bounding box. Bilinear sampling; pixels falling
/// outside the input read transparent.
pub(crate) fn rotate_expand(img: &RgbaImage, degrees: f64) -> RgbaImage {
    let theta = degrees.to_radians();
    let (sin, cos) = theta.sin_cos();

    let w = f64::from(img.width());
    let h = f64::from(img.height());
    // The epsilon keeps quarter-turn sizes exact: cos(90°) is ~6e-17 in f64,
    // which would otherwise push ceil() one pixel wide.
    let out_w = (w * cos.abs() + h * sin.abs() - 1e-9).ceil().max(1.0) as u32;
    let out_h = (w * sin.abs() + h * cos.abs() - 1e-9).ceil().max(1.0) as u32;

    let cx_in = w / 2.0;
    let cy_in = h / 2.0;
    let cx_out = f64::from(out_w) / 2.0;
    let cy_out = f64::from(out_h) / 2.0;

    let mut out = RgbaImage::new(out_w, out_h);
    for y in 0..out_h {
        for x in 0..out_w {
            let dx = f64::from(x) + 0.5 - cx_out;
            let dy = f64::from(y) + 0.5 - cy_out;
            // Inverse of the forward rotation the placement matrix applies.
            let sx = dx * cos + dy * sin + cx_in;
            let sy = -dx * sin + dy * cos + cy_in;
            let px = bilinear_premul(img, sx, sy);
            out.put_pixel(x, y, image::Rgba(px));
        }
    }
    out
}

/// Bilinear sample of a premultiplied buffer at continuous pixel coordinates;
/// out-of-bounds texels are transparent.
fn bilinear_premul(img: &RgbaImage, sx: f64, sy: f64) -> [u8; 4] {
    let x = sx - 0.5;
    let y = sy - 0.5;
    let x0 = x.floor();
    let y0 = y.floor();
    let fx = (x - x0) as f32;
    let fy = (y - y0) as f32;
    let x0 = x0 as i64;
    let y0 = y0 as i64;

    let texel = |tx: i64, ty: i64| -> [u8; 4] {
        if tx < 0 || ty < 0 || tx >= i64::from(img.width()) || ty >= i64::from(img.height()) {
            return [0, 0, 0, 0];
        }
        img.get_pixel(tx as u32, ty as u32).0
    };

    let p00 = texel(x0, y0);
    let p10 = texel(x0 + 1, y0);
    let p01 = texel(x0, y0 + 1);
    let p11 = texel(x0 + 1, y0 + 1);

    let mut px = [0u8; 4];
    for c in 0..4 {
        let top = f32::from(p00[c]) * (1.0 - fx) + f32::from(p10[c]) * fx;
        let bottom = f32::from(p01[c]) * (1.0 - fx) + f32::from(p11[c]) * fx;
        px[c] = (top * (1.0 - fy) + bottom * fy).round().clamp(0.0, 255.0) as u8;
    }
    px
}

#[cfg(test)]
#[path = "../../tests/unit/export/compositor.rs"]
mod tests;
