use crate::foundation::core::{Canvas, Point, Vec2};
use crate::foundation::error::{FramestackError, FramestackResult};
use crate::model::frame::FrameData;
use crate::model::project::Project;
use crate::transform::anchor::{AnchorMode, rotate_vec};

/// Mirror axis selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    /// Flip left/right.
    Horizontal,
    /// Flip top/bottom.
    Vertical,
}

/// One user-initiated transform applied to the whole selection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TransformOp {
    /// Move by a canvas-space delta.
    Translate {
        /// Horizontal delta.
        dx: f64,
        /// Vertical delta.
        dy: f64,
    },
    /// Scale about the pivot.
    Scale {
        /// Multiplicative scale factor.
        factor: f64,
    },
    /// Rotate about the pivot.
    Rotate {
        /// Rotation delta in degrees.
        degrees: f64,
    },
    /// Mirror about the pivot along an axis.
    Mirror {
        /// Reflection axis.
        axis: Axis,
    },
}

/// Apply `op` to every selected frame, each independently, about a shared
/// pivot.
///
/// The pivot is resolved **once** from the first selected frame and applied to
/// the whole group — with `ImageCenter` a multi-selection pivots around the
/// first member rather than each frame around itself. After the operation the
/// anchor state is updated so a `CustomImage` marker keeps tracking the
/// selection rigidly.
pub fn apply(
    op: TransformOp,
    anchor: &mut AnchorMode,
    project: &mut Project,
    selection: &[usize],
) -> FramestackResult<()> {
    let Some(&primary) = selection.first() else {
        return Ok(());
    };
    if let Some(&bad) = selection.iter().find(|&&i| i >= project.frames.len()) {
        return Err(FramestackError::validation(format!(
            "selection index {bad} out of range ({} frames)",
            project.frames.len()
        )));
    }

    let pivot = anchor.resolve(&project.frames[primary]);
    for &i in selection {
        apply_to_frame(op, pivot, &mut project.frames[i]);
    }

    if matches!(*anchor, AnchorMode::CustomImage(_)) {
        // The marker is a canvas point glued to the image content, so it moves
        // under the same canvas-space map as the frame positions. For pivoted
        // ops the marker *is* the pivot and stays fixed.
        let marker = match op {
            TransformOp::Translate { dx, dy } => pivot + Vec2::new(dx, dy),
            _ => pivot,
        };
        *anchor = AnchorMode::rebound_to(marker, &project.frames[primary]);
    }

    Ok(())
}

fn apply_to_frame(op: TransformOp, pivot: Point, frame: &mut FrameData) {
    match op {
        TransformOp::Translate { dx, dy } => {
            frame.position.x += dx;
            frame.position.y += dy;
        }
        TransformOp::Scale { factor } => {
            frame.scale *= factor;
            frame.position = pivot + (frame.position - pivot) * factor;
        }
        TransformOp::Rotate { degrees } => {
            frame.set_rotation(frame.rotation + degrees);
            frame.position = pivot + rotate_vec(frame.position - pivot, degrees);
        }
        TransformOp::Mirror { axis } => {
            match axis {
                Axis::Horizontal => {
                    frame.scale = -frame.scale;
                    frame.position.x = pivot.x - (frame.position.x - pivot.x);
                }
                Axis::Vertical => {
                    frame.aspect_ratio = -frame.aspect_ratio;
                    frame.position.y = pivot.y - (frame.position.y - pivot.y);
                }
            }
            // Content-mirror rule: negating rotation keeps the reflected image
            // oriented correctly.
            frame.set_rotation(-frame.rotation);
        }
    }
}

/// Axis selector for [`fit_to_canvas`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FitAxis {
    /// Fill the canvas width.
    Width,
    /// Fill the canvas height.
    Height,
}

/// Set the frame's scale magnitude so its content fills the canvas along one
/// axis, preserving mirror state. `content_w`/`content_h` are the crop-or-source
/// dimensions.
pub fn fit_to_canvas(
    frame: &mut FrameData,
    content_w: u32,
    content_h: u32,
    canvas: Canvas,
    axis: FitAxis,
) {
    let magnitude = match axis {
        FitAxis::Width if content_w > 0 => f64::from(canvas.width) / f64::from(content_w),
        FitAxis::Height if content_h > 0 => f64::from(canvas.height) / f64::from(content_h),
        _ => return,
    };
    frame.scale = magnitude.copysign(frame.scale);
}

/// Reset the height stretch to 1, preserving the vertical mirror sign.
pub fn reset_aspect_ratio(frame: &mut FrameData) {
    frame.aspect_ratio = 1.0_f64.copysign(frame.aspect_ratio);
}

/// Derive `scale` from a desired on-canvas pixel width, preserving mirror
/// state.
pub fn set_target_width(frame: &mut FrameData, content_w: u32, target_w: u32) {
    if content_w == 0 || target_w == 0 {
        return;
    }
    let magnitude = f64::from(target_w) / f64::from(content_w);
    frame.scale = magnitude.copysign(frame.scale);
}

/// Derive `aspect_ratio` from a desired on-canvas pixel height, preserving
/// mirror state.
pub fn set_target_height(frame: &mut FrameData, content_h: u32, target_h: u32) {
    if content_h == 0 || target_h == 0 {
        return;
    }
    let magnitude = frame.effective_scale_x() * f64::from(content_h) / f64::from(target_h);
    frame.aspect_ratio = magnitude.copysign(frame.aspect_ratio);
}

/// Snap the frame position to whole canvas pixels.
pub fn integerize(frame: &mut FrameData) {
    frame.position.x = frame.position.x.round();
    frame.position.y = frame.position.y.round();
}

#[cfg(test)]
#[path = "../../tests/unit/transform/operator.rs"]
mod tests;
