use crate::assets::cache::ImageCache;
use crate::foundation::core::Affine;
use crate::model::frame::FrameData;
use crate::render::placement::frame_placement;
use crate::render::surface::{Sampling, SourceView, Surface};

/// One entry in the interactive draw stack: a frame plus its layer opacity.
///
/// The host assembles the stack in draw order — reference frame first, then
/// onion skins, then the active selection.
#[derive(Clone, Copy, Debug)]
pub struct StackLayer<'a> {
    /// Frame to draw.
    pub frame: &'a FrameData,
    /// Layer opacity in `[0, 1]`.
    pub opacity: f64,
}

impl<'a> StackLayer<'a> {
    /// Fully opaque layer.
    pub fn opaque(frame: &'a FrameData) -> Self {
        Self {
            frame,
            opacity: 1.0,
        }
    }
}

/// Draw `layers` in order into `target`.
///
/// `canvas_to_target` maps canvas-centered coordinates into target pixel
/// space; each frame's full draw matrix is `canvas_to_target · placement`.
/// Frames with unreadable sources or degenerate placements are skipped so one
/// bad asset never blanks the whole preview.
pub fn render_stack(
    layers: &[StackLayer<'_>],
    cache: &mut ImageCache,
    canvas_to_target: Affine,
    sampling: Sampling,
    target: &mut Surface,
) {
    for layer in layers {
        let Some(source) = cache.get(&layer.frame.source) else {
            tracing::debug!(source = %layer.frame.source.display(), "skipping unreadable frame");
            continue;
        };
        let placement = frame_placement(layer.frame, source.width, source.height);
        if placement.is_degenerate() {
            continue;
        }
        let content = layer.frame.content_rect(source.width, source.height);
        let view = SourceView::new(&source, content);
        target.draw_image(
            &view,
            placement.width,
            placement.height,
            canvas_to_target * placement.matrix,
            sampling,
            layer.opacity,
        );
    }
}

/// Build onion-skin layers around the frame at `current`.
///
/// Takes up to `before` earlier and `after` later non-disabled neighbors;
/// opacity falls off by `opacity_step` per step of distance, floored at 0.05
/// so distant skins stay faintly visible.
pub fn onion_layers(
    frames: &[FrameData],
    current: usize,
    before: usize,
    after: usize,
    opacity_step: f64,
) -> Vec<StackLayer<'_>> {
    let mut layers = Vec::new();
    if current >= frames.len() {
        return layers;
    }

    let skin_opacity = |distance: usize| (1.0 - distance as f64 * opacity_step).max(0.05);

    for distance in 1..=before {
        let Some(idx) = current.checked_sub(distance) else {
            break;
        };
        if frames[idx].disabled {
            continue;
        }
        layers.push(StackLayer {
            frame: &frames[idx],
            opacity: skin_opacity(distance),
        });
    }

    for distance in 1..=after {
        let idx = current + distance;
        if idx >= frames.len() {
            break;
        }
        if frames[idx].disabled {
            continue;
        }
        layers.push(StackLayer {
            frame: &frames[idx],
            opacity: skin_opacity(distance),
        });
    }

    layers
}

#[cfg(test)]
#[path = "../../tests/unit/render/scene.rs"]
mod tests;
