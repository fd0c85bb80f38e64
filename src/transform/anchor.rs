use crate::foundation::core::{Point, Vec2};
use crate::model::frame::FrameData;

/// Pivot-selection state for the next transform operation.
///
/// Modeled as a tagged union so illegal mode/payload combinations are
/// unrepresentable. The state is transient UI state: it is recomputed whenever
/// the active selection or mode changes and does not outlive the selection
/// that produced it.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum AnchorMode {
    /// Pivot at the canvas center `(0, 0)`.
    CanvasCenter,
    /// Pivot at the primary selected frame's position.
    ImageCenter,
    /// Fixed canvas-space point; does not move with the frame.
    CustomCanvas(Point),
    /// Offset in the primary frame's pre-rotation local frame; the anchor
    /// marker travels rigidly with the image through rotation/translation.
    CustomImage(Vec2),
}

impl AnchorMode {
    /// Resolve the active pivot point in canvas space.
    pub fn resolve(&self, primary: &FrameData) -> Point {
        match *self {
            AnchorMode::CanvasCenter => Point::ZERO,
            AnchorMode::ImageCenter => primary.position,
            AnchorMode::CustomCanvas(p) => p,
            AnchorMode::CustomImage(off) => primary.position + rotate_vec(off, primary.rotation),
        }
    }

    /// Switch into [`AnchorMode::CustomCanvas`], freezing the currently
    /// resolved pivot so the marker does not jump.
    pub fn into_custom_canvas(self, primary: &FrameData) -> AnchorMode {
        AnchorMode::CustomCanvas(self.resolve(primary))
    }

    /// Switch into [`AnchorMode::CustomImage`], preserving the visual pivot.
    ///
    /// The stored offset is expressed in the frame's pre-rotation local frame:
    /// `off = Rotate(-rotation) · (P - position)`.
    pub fn into_custom_image(self, primary: &FrameData) -> AnchorMode {
        let p = self.resolve(primary);
        AnchorMode::CustomImage(rotate_vec(p - primary.position, -primary.rotation))
    }

    /// Rebind a [`AnchorMode::CustomImage`] offset so the marker sits at
    /// `marker` (canvas space) relative to the frame's current transform.
    pub(crate) fn rebound_to(marker: Point, primary: &FrameData) -> AnchorMode {
        AnchorMode::CustomImage(rotate_vec(marker - primary.position, -primary.rotation))
    }
}

/// Rotate a vector by `degrees` (same convention as the placement matrix).
pub(crate) fn rotate_vec(v: Vec2, degrees: f64) -> Vec2 {
    let (sin, cos) = degrees.to_radians().sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

#[cfg(test)]
#[path = "../../tests/unit/transform/anchor.rs"]
mod tests;
