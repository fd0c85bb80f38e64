use std::path::Path;

use anyhow::Context;

use crate::assets::cache::ImageCache;
use crate::foundation::error::{FramestackError, FramestackResult};
use crate::model::frame::{CropRect, FrameData};
use crate::render::surface::SourceView;

/// Partition a sheet into a uniform `cols × rows` grid of crops, row-major.
///
/// Cell size is the integer quotient; remainder pixels at the right/bottom
/// edges are dropped. Returns an empty list when the grid cannot fit.
pub fn grid_crops(source_w: u32, source_h: u32, cols: u32, rows: u32) -> Vec<CropRect> {
    if cols == 0 || rows == 0 {
        return Vec::new();
    }
    let tile_w = source_w / cols;
    let tile_h = source_h / rows;
    if tile_w == 0 || tile_h == 0 {
        return Vec::new();
    }

    let mut crops = Vec::with_capacity(cols as usize * rows as usize);
    for row in 0..rows {
        for col in 0..cols {
            crops.push(CropRect::new(col * tile_w, row * tile_h, tile_w, tile_h));
        }
    }
    crops
}

/// Virtual slice: one crop-referencing frame per sheet cell.
///
/// All resulting frames point at the same source file; the crop rect selects
/// the cell, so nothing is written to disk.
pub fn slice_sheet(
    path: &Path,
    cache: &mut ImageCache,
    cols: u32,
    rows: u32,
) -> FramestackResult<Vec<FrameData>> {
    let source = cache.get(path).ok_or_else(|| {
        FramestackError::validation(format!("cannot read sheet '{}'", path.display()))
    })?;

    Ok(grid_crops(source.width, source.height, cols, rows)
        .into_iter()
        .map(|crop| {
            let mut frame = FrameData::new(path);
            frame.crop = Some(crop);
            frame
        })
        .collect())
}

/// Real slice: write each sheet cell as `{stem}_{i:03}.png` under `out_dir`
/// and return crop-free frames pointing at the new files.
pub fn slice_sheet_to_files(
    path: &Path,
    cache: &mut ImageCache,
    cols: u32,
    rows: u32,
    out_dir: &Path,
) -> FramestackResult<Vec<FrameData>> {
    let source = cache.get(path).ok_or_else(|| {
        FramestackError::validation(format!("cannot read sheet '{}'", path.display()))
    })?;

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("create slice directory '{}'", out_dir.display()))?;

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "slice".to_string());

    let mut frames = Vec::new();
    for (i, crop) in grid_crops(source.width, source.height, cols, rows)
        .into_iter()
        .enumerate()
    {
        let cell = SourceView::new(&source, crop).to_surface();
        let out_path = out_dir.join(format!("{stem}_{i:03}.png"));
        cell.to_rgba_image().save(&out_path).map_err(|err| {
            FramestackError::export(format!("write '{}': {err}", out_path.display()))
        })?;
        frames.push(FrameData::new(out_path));
    }
    Ok(frames)
}

#[cfg(test)]
#[path = "../../tests/unit/import/slice.rs"]
mod tests;
