use crate::foundation::core::{Affine, Point};
use crate::model::frame::FrameData;

/// Result of placing a frame: draw matrix plus effective on-canvas size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    /// Maps the centered local rectangle
    /// `[-width/2, -height/2] … [width/2, height/2]` into canvas-centered
    /// space.
    pub matrix: Affine,
    /// Effective width before rotation, in canvas pixels.
    pub width: f64,
    /// Effective height before rotation, in canvas pixels.
    pub height: f64,
}

impl Placement {
    /// True when the placed frame would cover no pixels (effective width or
    /// height rounds to zero, or the transform is non-finite).
    pub fn is_degenerate(&self) -> bool {
        !self.width.is_finite()
            || !self.height.is_finite()
            || self.width.round() < 1.0
            || self.height.round() < 1.0
    }

    /// Canvas-space corners of the placed rectangle, in local
    /// top-left / top-right / bottom-right / bottom-left order.
    pub fn corners(&self) -> [Point; 4] {
        let hw = self.width / 2.0;
        let hh = self.height / 2.0;
        [
            self.matrix * Point::new(-hw, -hh),
            self.matrix * Point::new(hw, -hh),
            self.matrix * Point::new(hw, hh),
            self.matrix * Point::new(-hw, hh),
        ]
    }
}

/// Compute the placement for a frame over a source of the given dimensions.
///
/// This is the single placement-geometry routine: the interactive canvas, the
/// pixel-art preview, and the batch compositor all call it and must never
/// re-derive it.
///
/// Mirroring is carried as scale signs inside the matrix (x by `sign(scale)`,
/// y by `sign(aspect_ratio)`) rather than a separate flip step, so matrix
/// composition stays associative and a horizontal mirror flips exactly one
/// axis.
pub fn frame_placement(frame: &FrameData, source_w: u32, source_h: u32) -> Placement {
    let content = frame.content_rect(source_w, source_h);
    let width = frame.effective_scale_x() * f64::from(content.width);
    let height = frame.effective_scale_y() * f64::from(content.height);

    let sign_x = if frame.mirrored_h() { -1.0 } else { 1.0 };
    let sign_y = if frame.mirrored_v() { -1.0 } else { 1.0 };

    let matrix = Affine::translate(frame.position.to_vec2())
        * Affine::rotate(frame.rotation.to_radians())
        * Affine::scale_non_uniform(sign_x, sign_y);

    Placement {
        matrix,
        width,
        height,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/placement.rs"]
mod tests;
