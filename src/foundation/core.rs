use crate::foundation::error::{FramestackError, FramestackResult};

pub use kurbo::{Affine, Point, Rect, Vec2};

/// Output canvas dimensions in integer pixels.
///
/// Frame positions are expressed in canvas-centered coordinates: the origin is
/// the canvas center, not the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Construct a canvas, rejecting zero dimensions.
    pub fn new(width: u32, height: u32) -> FramestackResult<Self> {
        if width == 0 || height == 0 {
            return Err(FramestackError::validation(
                "canvas dimensions must be > 0",
            ));
        }
        Ok(Self { width, height })
    }

    /// Canvas center in top-left pixel coordinates.
    pub fn center(self) -> Point {
        Point::new(f64::from(self.width) / 2.0, f64::from(self.height) / 2.0)
    }
}

/// Straight (non-premultiplied) RGBA8 color.
///
/// Used for host-facing configuration: export backgrounds, grid lines. Render
/// surfaces store premultiplied pixels; convert with [`Rgba8::premultiplied`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8 {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    /// Construct from channel values.
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Construct an opaque color.
    pub fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Convert to premultiplied RGBA8 bytes.
    pub fn premultiplied(self) -> [u8; 4] {
        fn premul(c: u8, a: u8) -> u8 {
            ((u16::from(c) * u16::from(a) + 127) / 255) as u8
        }

        [
            premul(self.r, self.a),
            premul(self.g, self.a),
            premul(self.b, self.a),
            self.a,
        ]
    }
}

/// Normalize an angle in degrees to the half-open interval `(-180, 180]`.
pub fn normalize_deg(deg: f64) -> f64 {
    let r = deg % 360.0;
    if r > 180.0 {
        r - 360.0
    } else if r <= -180.0 {
        r + 360.0
    } else {
        r
    }
}
