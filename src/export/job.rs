use std::collections::HashSet;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::Context;
use image::RgbaImage;
use image::codecs::gif::{GifEncoder, Repeat};

use crate::assets::cache::ImageCache;
use crate::export::compositor::compose_frame;
use crate::foundation::core::Rgba8;
use crate::foundation::error::{FramestackError, FramestackResult};
use crate::model::project::Project;
use crate::render::surface::Surface;

/// Filename policy for sequence export.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilenamePolicy {
    /// Keep the source basename; later collisions get a numeric suffix before
    /// the extension, in encounter order (`name.png`, `name_1.png`, …).
    Original,
    /// Number frames sequentially as `frame_0000.png`, `frame_0001.png`, ….
    Sequential,
}

/// Output mode for an export run, with its per-mode host settings.
#[derive(Clone, Debug, PartialEq)]
pub enum ExportMode {
    /// One raster file per frame in `dir`.
    Sequence {
        /// Output directory; created if absent.
        dir: PathBuf,
        /// Filename policy.
        policy: FilenamePolicy,
    },
    /// One sheet image laying frames out in a fixed grid.
    SpriteSheet {
        /// Output file path.
        path: PathBuf,
        /// Number of grid columns.
        cols: u32,
        /// Pixel padding around and between cells.
        padding: u32,
    },
    /// One animated GIF, infinite loop.
    Gif {
        /// Output file path.
        path: PathBuf,
        /// Playback rate; per-frame delay is `round(1000 / fps)` ms.
        fps: u32,
    },
}

/// Progress yielded after each composed frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExportProgress {
    /// 1-based count of frames processed so far.
    pub current: usize,
    /// Total frames in this run.
    pub total: usize,
}

/// Cooperative export driver.
///
/// The job is an [`Iterator`] yielding progress after each written frame, so
/// the host can keep its UI responsive between steps; cancellation is simply
/// dropping the iterator. Each iteration's buffers are independent; no mutable
/// state is shared across frames beyond the accumulating output. IO failures
/// are fatal for the run: the job yields `Err` once and then fuses; partially
/// written files are left in place.
#[derive(Debug)]
pub struct ExportJob<'a> {
    project: &'a Project,
    cache: &'a mut ImageCache,
    indices: Vec<usize>,
    mode: ExportMode,
    background: Rgba8,
    cursor: usize,
    used_names: HashSet<String>,
    sheet: Option<Surface>,
    gif_frames: Vec<RgbaImage>,
    failed: bool,
}

impl<'a> ExportJob<'a> {
    /// Prepare an export run over `indices` (0-based positions into the
    /// project's frame list, already filtered by the host's range selection).
    ///
    /// An empty index list is a valid run that writes nothing — callers see
    /// `total() == 0` and must not reinterpret it as "export all".
    pub fn new(
        project: &'a Project,
        cache: &'a mut ImageCache,
        indices: Vec<usize>,
        mode: ExportMode,
        background: Rgba8,
    ) -> FramestackResult<Self> {
        if let Some(&bad) = indices.iter().find(|&&i| i >= project.frames.len()) {
            return Err(FramestackError::validation(format!(
                "export index {bad} out of range ({} frames)",
                project.frames.len()
            )));
        }

        let sheet = match mode {
            ExportMode::Sequence { ref dir, .. } => {
                std::fs::create_dir_all(dir)
                    .with_context(|| format!("create export directory '{}'", dir.display()))
                    .map_err(FramestackError::from)?;
                None
            }
            ExportMode::SpriteSheet { cols, padding, .. } => {
                if cols == 0 {
                    return Err(FramestackError::validation("sprite sheet cols must be > 0"));
                }
                if indices.is_empty() {
                    None
                } else {
                    let n = indices.len() as u32;
                    let rows = n.div_ceil(cols);
                    let fw = project.canvas.width;
                    let fh = project.canvas.height;
                    let sheet_w = cols * fw + (cols + 1) * padding;
                    let sheet_h = rows * fh + (rows + 1) * padding;
                    Some(Surface::new(sheet_w, sheet_h))
                }
            }
            ExportMode::Gif { fps, .. } => {
                if fps == 0 {
                    return Err(FramestackError::validation("gif fps must be > 0"));
                }
                None
            }
        };

        Ok(Self {
            project,
            cache,
            indices,
            mode,
            background,
            cursor: 0,
            used_names: HashSet::new(),
            sheet,
            gif_frames: Vec::new(),
            failed: false,
        })
    }

    /// Total frames in this run.
    pub fn total(&self) -> usize {
        self.indices.len()
    }

    /// Drive the job to completion; returns the number of frames processed.
    pub fn run(mut self) -> FramestackResult<usize> {
        let mut written = 0;
        while let Some(step) = self.next() {
            step?;
            written += 1;
        }
        Ok(written)
    }

    fn step(&mut self) -> FramestackResult<ExportProgress> {
        let frame_index = self.indices[self.cursor];
        let frame = &self.project.frames[frame_index];
        let composed = compose_frame(frame, self.project.canvas, self.background, self.cache);
        let is_last = self.cursor + 1 == self.indices.len();
        let mode = self.mode.clone();

        match mode {
            ExportMode::Sequence { dir, policy } => {
                let name = self.output_name(frame_index, policy);
                let path = dir.join(name);
                save_rgba(&composed.surface.to_rgba_image(), &path)?;
            }
            ExportMode::SpriteSheet {
                path,
                cols,
                padding,
            } => {
                let fw = self.project.canvas.width;
                let fh = self.project.canvas.height;
                let col = self.cursor as u32 % cols;
                let row = self.cursor as u32 / cols;
                let cell_x = i64::from(col * fw + (col + 1) * padding);
                let cell_y = i64::from(row * fh + (row + 1) * padding);
                if let Some(sheet) = self.sheet.as_mut() {
                    sheet.composite_over(fw, fh, composed.surface.data(), cell_x, cell_y)?;
                }
                if is_last {
                    if let Some(sheet) = self.sheet.take() {
                        save_rgba(&sheet.to_rgba_image(), &path)?;
                    }
                }
            }
            ExportMode::Gif { path, fps } => {
                self.gif_frames.push(composed.surface.to_rgba_image());
                if is_last {
                    self.encode_gif(&path, fps)?;
                }
            }
        }

        self.cursor += 1;
        Ok(ExportProgress {
            current: self.cursor,
            total: self.indices.len(),
        })
    }

    fn output_name(&mut self, frame_index: usize, policy: FilenamePolicy) -> String {
        match policy {
            FilenamePolicy::Sequential => format!("frame_{:04}.png", self.cursor),
            FilenamePolicy::Original => {
                let base = self.project.frames[frame_index]
                    .source
                    .file_name()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| format!("frame_{:04}.png", self.cursor));

                let path = Path::new(&base);
                let stem = path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| base.clone());
                let dot_ext = path
                    .extension()
                    .map(|e| format!(".{}", e.to_string_lossy()))
                    .unwrap_or_default();

                let mut name = base;
                let mut suffix = 1;
                while self.used_names.contains(&name) {
                    name = format!("{stem}_{suffix}{dot_ext}");
                    suffix += 1;
                }
                self.used_names.insert(name.clone());
                name
            }
        }
    }

    fn encode_gif(&mut self, path: &Path, fps: u32) -> FramestackResult<()> {
        let delay_ms = (1000.0 / f64::from(fps)).round() as u32;
        let file = File::create(path)
            .with_context(|| format!("create gif '{}'", path.display()))
            .map_err(FramestackError::from)?;

        let mut encoder = GifEncoder::new(BufWriter::new(file));
        encoder
            .set_repeat(Repeat::Infinite)
            .map_err(|err| FramestackError::export(format!("gif repeat: {err}")))?;

        for img in self.gif_frames.drain(..) {
            let frame = image::Frame::from_parts(
                img,
                0,
                0,
                image::Delay::from_numer_denom_ms(delay_ms, 1),
            );
            encoder
                .encode_frame(frame)
                .map_err(|err| FramestackError::export(format!("gif frame: {err}")))?;
        }
        Ok(())
    }
}

impl Iterator for ExportJob<'_> {
    type Item = FramestackResult<ExportProgress>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.cursor >= self.indices.len() {
            return None;
        }
        match self.step() {
            Ok(progress) => Some(Ok(progress)),
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}

fn save_rgba(img: &RgbaImage, path: &Path) -> FramestackResult<()> {
    img.save(path)
        .map_err(|err| FramestackError::export(format!("write '{}': {err}", path.display())))
}

#[cfg(test)]
#[path = "../../tests/unit/export/job.rs"]
mod tests;
