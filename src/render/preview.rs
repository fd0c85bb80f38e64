use crate::assets::cache::ImageCache;
use crate::foundation::core::{Affine, Canvas, Point, Rgba8, Vec2};
use crate::model::frame::FrameData;
use crate::render::placement::frame_placement;
use crate::render::scene::{StackLayer, render_stack};
use crate::render::surface::{Sampling, Surface};
use crate::transform::anchor::AnchorMode;

/// Pixel-art preview configuration; mirrors the host's rasterization settings
/// dialog, passed in as plain state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RasterSettings {
    /// Master toggle for the pixelated preview.
    pub enabled: bool,
    /// Grid line color.
    pub grid_color: Rgba8,
    /// Zoom level above which grid lines appear.
    pub scale_threshold: f64,
    /// Whether grid lines are drawn at all.
    pub show_grid: bool,
}

impl Default for RasterSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            grid_color: Rgba8::opaque(0, 0, 0),
            scale_threshold: 1.5,
            show_grid: true,
        }
    }
}

/// View zoom state. The preview buffer is produced in canvas-anchored view
/// pixels (canvas size × zoom); the host applies panning when blitting, which
/// keeps grid lines anchored to the canvas origin rather than the viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewState {
    /// View pixels per canvas pixel.
    pub zoom: f64,
}

impl ViewState {
    /// Affine from canvas-centered coordinates to view pixels.
    pub fn canvas_to_view(&self, canvas: Canvas) -> Affine {
        Affine::scale(self.zoom)
            * Affine::translate(Vec2::new(
                f64::from(canvas.width) / 2.0,
                f64::from(canvas.height) / 2.0,
            ))
    }
}

/// Result of a preview render.
#[derive(Clone, Debug, PartialEq)]
pub struct Preview {
    /// View-sized pixel buffer.
    pub surface: Surface,
    /// Whether the pixel-art path produced this buffer.
    pub pixelated: bool,
}

/// Always-sharp overlay primitives in view space, drawn by the host on top of
/// the preview buffer — never through the pixelated path.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OverlayGeometry {
    /// Canvas border corners.
    pub canvas_border: [Point; 4],
    /// One corner quad per selected frame.
    pub selection_outlines: Vec<[Point; 4]>,
    /// Resolved anchor marker, when a selection is active.
    pub anchor_marker: Option<Point>,
}

/// Render the interactive preview of a frame stack.
///
/// The pixelated path activates iff `settings.enabled && view.zoom > 1.0`:
/// the stack is rendered at exact canvas resolution with nearest sampling
/// (into a buffer covering every out-of-canvas frame extent, then cropped to
/// the canvas rectangle) and upscaled to view pixels with nearest-neighbor
/// only. Below the activation point the smooth path renders the same stack —
/// through the same placement matrices — at view resolution with bilinear
/// sampling, so at `zoom = 1.0` output is identical whether rasterization is
/// enabled or not.
pub fn render_preview(
    canvas: Canvas,
    layers: &[StackLayer<'_>],
    cache: &mut ImageCache,
    view: &ViewState,
    settings: &RasterSettings,
) -> Preview {
    let out_w = (f64::from(canvas.width) * view.zoom).round().max(1.0) as u32;
    let out_h = (f64::from(canvas.height) * view.zoom).round().max(1.0) as u32;

    if settings.enabled && view.zoom > 1.0 {
        let (bx, by, bw, bh) = content_bounds(canvas, layers, cache);
        let mut buf = Surface::new(bw, bh);
        let to_buf = Affine::translate(Vec2::new(
            f64::from(canvas.width) / 2.0 - bx as f64,
            f64::from(canvas.height) / 2.0 - by as f64,
        ));
        render_stack(layers, cache, to_buf, Sampling::Nearest, &mut buf);

        let canvas_buf = buf.crop(-bx, -by, canvas.width, canvas.height);
        let mut out = canvas_buf.scale_nearest(out_w, out_h);

        if settings.show_grid && view.zoom > settings.scale_threshold {
            draw_grid(&mut out, canvas, view.zoom, settings.grid_color);
        }

        Preview {
            surface: out,
            pixelated: true,
        }
    } else {
        let mut out = Surface::new(out_w, out_h);
        render_stack(
            layers,
            cache,
            view.canvas_to_view(canvas),
            Sampling::Bilinear,
            &mut out,
        );
        Preview {
            surface: out,
            pixelated: false,
        }
    }
}

/// Compute the always-sharp overlay geometry for the current view.
pub fn overlay_geometry(
    canvas: Canvas,
    selection: &[&FrameData],
    cache: &mut ImageCache,
    anchor: Option<&AnchorMode>,
    view: &ViewState,
) -> OverlayGeometry {
    let to_view = view.canvas_to_view(canvas);
    let hw = f64::from(canvas.width) / 2.0;
    let hh = f64::from(canvas.height) / 2.0;

    let canvas_border = [
        to_view * Point::new(-hw, -hh),
        to_view * Point::new(hw, -hh),
        to_view * Point::new(hw, hh),
        to_view * Point::new(-hw, hh),
    ];

    let mut selection_outlines = Vec::with_capacity(selection.len());
    for frame in selection {
        let Some(source) = cache.get(&frame.source) else {
            continue;
        };
        let placement = frame_placement(frame, source.width, source.height);
        let corners = placement.corners();
        selection_outlines.push([
            to_view * corners[0],
            to_view * corners[1],
            to_view * corners[2],
            to_view * corners[3],
        ]);
    }

    let anchor_marker = match (anchor, selection.first()) {
        (Some(mode), Some(primary)) => Some(to_view * mode.resolve(primary)),
        _ => None,
    };

    OverlayGeometry {
        canvas_border,
        selection_outlines,
        anchor_marker,
    }
}

/// Integer-aligned bounding box (canvas top-left pixel coordinates) covering
/// the canvas rectangle and every frame extent.
fn content_bounds(
    canvas: Canvas,
    layers: &[StackLayer<'_>],
    cache: &mut ImageCache,
) -> (i64, i64, u32, u32) {
    let cw = f64::from(canvas.width);
    let ch = f64::from(canvas.height);
    let mut min_x = 0.0_f64;
    let mut min_y = 0.0_f64;
    let mut max_x = cw;
    let mut max_y = ch;

    for layer in layers {
        let Some(source) = cache.get(&layer.frame.source) else {
            continue;
        };
        let placement = frame_placement(layer.frame, source.width, source.height);
        if placement.is_degenerate() {
            continue;
        }
        for corner in placement.corners() {
            min_x = min_x.min(corner.x + cw / 2.0);
            min_y = min_y.min(corner.y + ch / 2.0);
            max_x = max_x.max(corner.x + cw / 2.0);
            max_y = max_y.max(corner.y + ch / 2.0);
        }
    }

    // Snap to the canvas pixel grid so the later crop is exact.
    let x0 = min_x.floor() as i64;
    let y0 = min_y.floor() as i64;
    let x1 = max_x.ceil() as i64;
    let y1 = max_y.ceil() as i64;
    (x0, y0, (x1 - x0).max(1) as u32, (y1 - y0).max(1) as u32)
}

/// Overlay 1-pixel grid lines at source-pixel boundaries.
fn draw_grid(out: &mut Surface, canvas: Canvas, zoom: f64, color: Rgba8) {
    let premul = color.premultiplied();

    for i in 0..=canvas.width {
        let x = (f64::from(i) * zoom).round() as i64;
        if x < 0 || x >= i64::from(out.width()) {
            continue;
        }
        for y in 0..out.height() {
            out.put_premul(x as u32, y, premul);
        }
    }

    for j in 0..=canvas.height {
        let y = (f64::from(j) * zoom).round() as i64;
        if y < 0 || y >= i64::from(out.height()) {
            continue;
        }
        for x in 0..out.width() {
            out.put_premul(x, y as u32, premul);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/preview.rs"]
mod tests;
