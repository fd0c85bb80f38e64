//! Framestack is a headless frame transform and compositing engine.
//!
//! A host application places a stack of raster images ("frames") on a
//! fixed-size canvas, transforms them about a chosen pivot, and exports the
//! result as a PNG sequence, a sprite sheet, or an animated GIF.
//!
//! # Pipeline overview
//!
//! 1. **Model**: [`Project`] holds the canvas and the ordered [`FrameData`]
//!    stack (order is both z-order and export order).
//! 2. **Transform**: [`AnchorMode`] resolves the pivot, [`apply`] mutates the
//!    selection about it.
//! 3. **Place**: [`frame_placement`] turns a frame's stored transform into an
//!    affine matrix plus effective on-canvas dimensions.
//! 4. **Render**: [`render_stack`] / [`render_preview`] draw through that
//!    matrix for interactive feedback, including the pixel-art preview.
//! 5. **Export**: [`ExportJob`] reproduces the same geometry offline and
//!    persists frames per the selected [`ExportMode`].
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **One geometry routine**: placement is computed in exactly one place
//!   ([`frame_placement`]) and shared by the interactive canvas, the pixel-art
//!   preview, and the batch compositor.
//! - **Premultiplied RGBA8** end-to-end: decoded sources and render surfaces
//!   hold premultiplied pixels; conversion to straight alpha happens only at
//!   encode time.
//! - **No hidden globals**: the image cache is an explicitly owned object
//!   ([`ImageCache`]) passed by handle into every render and export path.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod export;
mod foundation;
mod import;
mod model;
mod render;
mod transform;

pub use assets::cache::{ImageCache, SourceImage};
pub use assets::decode::{decode_image, load_image};
pub use export::compositor::{ComposedFrame, SkipReason, compose_frame};
pub use export::job::{ExportJob, ExportMode, ExportProgress, FilenamePolicy};
pub use export::range::parse_frame_ranges;
pub use foundation::core::{Affine, Canvas, Point, Rect, Rgba8, Vec2, normalize_deg};
pub use foundation::error::{FramestackError, FramestackResult};
pub use import::gif::extract_gif_frames;
pub use import::slice::{grid_crops, slice_sheet, slice_sheet_to_files};
pub use model::frame::{CropRect, FrameData};
pub use model::project::Project;
pub use render::placement::{Placement, frame_placement};
pub use render::preview::{
    OverlayGeometry, Preview, RasterSettings, ViewState, overlay_geometry, render_preview,
};
pub use render::scene::{StackLayer, onion_layers, render_stack};
pub use render::surface::{Sampling, SourceView, Surface};
pub use transform::anchor::AnchorMode;
pub use transform::operator::{
    Axis, FitAxis, TransformOp, apply, fit_to_canvas, integerize, reset_aspect_ratio,
    set_target_height, set_target_width,
};
