use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::Context;
use image::AnimationDecoder;
use image::codecs::gif::GifDecoder;

use crate::foundation::error::{FramestackError, FramestackResult};
use crate::model::frame::FrameData;

/// Extract an animated GIF into per-frame PNGs under `out_dir` and return one
/// frame entry per extracted image, in animation order.
pub fn extract_gif_frames(gif_path: &Path, out_dir: &Path) -> FramestackResult<Vec<FrameData>> {
    let file = File::open(gif_path)
        .with_context(|| format!("open gif '{}'", gif_path.display()))?;
    let decoder = GifDecoder::new(BufReader::new(file)).context("decode gif header")?;
    let frames = decoder.into_frames().collect_frames().context("decode gif frames")?;

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("create frames directory '{}'", out_dir.display()))?;

    let stem = gif_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "frames".to_string());

    let mut out = Vec::with_capacity(frames.len());
    for (i, frame) in frames.into_iter().enumerate() {
        let buffer = frame.into_buffer();
        let out_path = out_dir.join(format!("{stem}_{i:03}.png"));
        buffer.save(&out_path).map_err(|err| {
            FramestackError::export(format!("write '{}': {err}", out_path.display()))
        })?;
        out.push(FrameData::new(out_path));
    }
    Ok(out)
}
