use std::path::PathBuf;

use crate::foundation::core::{Point, normalize_deg};

/// Rectangular crop in source-image pixel space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CropRect {
    /// Left edge in source pixels.
    pub x: u32,
    /// Top edge in source pixels.
    pub y: u32,
    /// Width in source pixels.
    pub width: u32,
    /// Height in source pixels.
    pub height: u32,
}

impl CropRect {
    /// Construct a crop rectangle.
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Clamp against the source dimensions.
    ///
    /// Returns `None` when the rect is zero-area or lies entirely outside the
    /// source — the "no crop" fallback. Partially out-of-bounds rects are
    /// clamped to the source bounds.
    pub fn clamped(self, source_w: u32, source_h: u32) -> Option<CropRect> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        if self.x >= source_w || self.y >= source_h {
            return None;
        }
        let width = self.width.min(source_w - self.x);
        let height = self.height.min(source_h - self.y);
        Some(CropRect {
            x: self.x,
            y: self.y,
            width,
            height,
        })
    }
}

/// One positioned, transformed instance of a source image in the stack.
///
/// Mirroring is sign-encoded in the stored fields: `scale < 0` mirrors
/// horizontally, `aspect_ratio < 0` mirrors vertically. The derived accessors
/// ([`FrameData::mirrored_h`], [`FrameData::effective_scale_x`], …) expose the
/// readable view while the signed fields stay the storage representation.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FrameData {
    /// Path to the source raster image.
    pub source: PathBuf,
    /// Position in canvas-centered coordinates.
    pub position: Point,
    /// Uniform width scale; sign encodes horizontal mirror.
    pub scale: f64,
    /// Height stretch relative to width; sign encodes vertical mirror.
    pub aspect_ratio: f64,
    /// Rotation in degrees, normalized to `(-180, 180]`.
    pub rotation: f64,
    /// Optional crop in source pixel space.
    pub crop: Option<CropRect>,
    /// Excluded from default export/playback when set.
    pub disabled: bool,
}

impl FrameData {
    /// New untransformed frame referencing `source`.
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            position: Point::ZERO,
            scale: 1.0,
            aspect_ratio: 1.0,
            rotation: 0.0,
            crop: None,
            disabled: false,
        }
    }

    /// Horizontal scale magnitude.
    pub fn effective_scale_x(&self) -> f64 {
        self.scale.abs()
    }

    /// Vertical scale magnitude.
    pub fn effective_scale_y(&self) -> f64 {
        (self.scale / self.aspect_ratio).abs()
    }

    /// Whether the frame is mirrored horizontally.
    pub fn mirrored_h(&self) -> bool {
        self.scale < 0.0
    }

    /// Whether the frame is mirrored vertically.
    pub fn mirrored_v(&self) -> bool {
        self.aspect_ratio < 0.0
    }

    /// Set rotation, keeping it normalized to `(-180, 180]`.
    pub fn set_rotation(&mut self, degrees: f64) {
        self.rotation = normalize_deg(degrees);
    }

    /// The source region this frame actually shows.
    ///
    /// Applies the stored crop clamped to the given source dimensions; invalid
    /// crops fall back to the full source.
    pub fn content_rect(&self, source_w: u32, source_h: u32) -> CropRect {
        self.crop
            .and_then(|c| c.clamped(source_w, source_h))
            .unwrap_or(CropRect {
                x: 0,
                y: 0,
                width: source_w,
                height: source_h,
            })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/frame.rs"]
mod tests;
