use crate::assets::cache::SourceImage;
use crate::foundation::core::{Affine, Point, Rgba8};
use crate::foundation::error::{FramestackError, FramestackResult};
use crate::model::frame::CropRect;

/// Sampling mode for affine image draws.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sampling {
    /// Nearest-neighbor lookup; no anti-aliasing. Used by the pixel-art
    /// preview path.
    Nearest,
    /// Bilinear filtering on premultiplied pixels. Used by the smooth
    /// interactive path.
    Bilinear,
}

/// Borrowed view of a premultiplied source region consumed by draw calls.
///
/// Texel lookups are clamped to the region edges, so the crop window never
/// bleeds into neighboring sheet cells.
#[derive(Clone, Copy, Debug)]
pub struct SourceView<'a> {
    data: &'a [u8],
    source_w: u32,
    region: CropRect,
}

impl<'a> SourceView<'a> {
    /// View `region` of a decoded source image.
    pub fn new(source: &'a SourceImage, region: CropRect) -> Self {
        Self {
            data: source.rgba8_premul.as_slice(),
            source_w: source.width,
            region,
        }
    }

    /// Region width in source pixels.
    pub fn width(&self) -> u32 {
        self.region.width
    }

    /// Region height in source pixels.
    pub fn height(&self) -> u32 {
        self.region.height
    }

    /// Premultiplied texel at region-local integer coordinates, edge-clamped.
    fn texel(&self, x: i64, y: i64) -> [u8; 4] {
        let x = x.clamp(0, i64::from(self.region.width) - 1) as u32 + self.region.x;
        let y = y.clamp(0, i64::from(self.region.height) - 1) as u32 + self.region.y;
        let idx = (y as usize * self.source_w as usize + x as usize) * 4;
        match self.data.get(idx..idx + 4) {
            Some(px) => [px[0], px[1], px[2], px[3]],
            None => [0, 0, 0, 0],
        }
    }

    /// Bilinear sample at continuous region-local coordinates (in pixels).
    fn sample_bilinear(&self, u: f64, v: f64) -> [u8; 4] {
        let x = u - 0.5;
        let y = v - 0.5;
        let x0 = x.floor();
        let y0 = y.floor();
        let fx = (x - x0) as f32;
        let fy = (y - y0) as f32;
        let x0 = x0 as i64;
        let y0 = y0 as i64;

        let p00 = self.texel(x0, y0);
        let p10 = self.texel(x0 + 1, y0);
        let p01 = self.texel(x0, y0 + 1);
        let p11 = self.texel(x0 + 1, y0 + 1);

        let mut out = [0u8; 4];
        for c in 0..4 {
            let top = f32::from(p00[c]) * (1.0 - fx) + f32::from(p10[c]) * fx;
            let bottom = f32::from(p01[c]) * (1.0 - fx) + f32::from(p11[c]) * fx;
            out[c] = (top * (1.0 - fy) + bottom * fy).round().clamp(0.0, 255.0) as u8;
        }
        out
    }

    /// Copy the region out into its own surface.
    pub fn to_surface(&self) -> Surface {
        let mut out = Surface::new(self.region.width, self.region.height);
        for y in 0..self.region.height {
            for x in 0..self.region.width {
                let px = self.texel(i64::from(x), i64::from(y));
                out.put_premul(x, y, px);
            }
        }
        out
    }
}

/// CPU render target holding premultiplied RGBA8 pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct Surface {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Surface {
    /// New fully transparent surface.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 4],
        }
    }

    /// New surface filled with a background color.
    pub fn filled(width: u32, height: u32, background: Rgba8) -> Self {
        let mut surface = Self::new(width, height);
        surface.clear(background);
        surface
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Premultiplied pixel bytes in row-major RGBA8.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Fill the whole surface with a background color.
    pub fn clear(&mut self, background: Rgba8) {
        let premul = background.premultiplied();
        for px in self.data.chunks_exact_mut(4) {
            px.copy_from_slice(&premul);
        }
    }

    /// Premultiplied pixel at (x, y); transparent outside the surface.
    pub fn get(&self, x: u32, y: u32) -> [u8; 4] {
        if x >= self.width || y >= self.height {
            return [0, 0, 0, 0];
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        [
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ]
    }

    /// Store a premultiplied pixel, replacing the destination.
    pub fn put_premul(&mut self, x: u32, y: u32, premul: [u8; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        self.data[idx..idx + 4].copy_from_slice(&premul);
    }

    /// Source-over composite a premultiplied pixel at (x, y).
    pub fn blend_pixel(&mut self, x: u32, y: u32, src: [u8; 4], opacity: f32) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        let dst = [
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ];
        let out = over(dst, src, opacity);
        self.data[idx..idx + 4].copy_from_slice(&out);
    }

    /// Source-over composite a premultiplied RGBA8 buffer with its top-left
    /// corner at `(dx, dy)`; areas falling outside this surface are clipped.
    pub fn composite_over(
        &mut self,
        src_w: u32,
        src_h: u32,
        src_data: &[u8],
        dx: i64,
        dy: i64,
    ) -> FramestackResult<()> {
        if src_data.len() != src_w as usize * src_h as usize * 4 {
            return Err(FramestackError::render(
                "composite_over expects a matching rgba8 buffer length",
            ));
        }

        for sy in 0..i64::from(src_h) {
            let ty = dy + sy;
            if ty < 0 || ty >= i64::from(self.height) {
                continue;
            }
            for sx in 0..i64::from(src_w) {
                let tx = dx + sx;
                if tx < 0 || tx >= i64::from(self.width) {
                    continue;
                }
                let sidx = (sy as usize * src_w as usize + sx as usize) * 4;
                let src = [
                    src_data[sidx],
                    src_data[sidx + 1],
                    src_data[sidx + 2],
                    src_data[sidx + 3],
                ];
                if src[3] == 0 && src[0] == 0 && src[1] == 0 && src[2] == 0 {
                    continue;
                }
                self.blend_pixel(tx as u32, ty as u32, src, 1.0);
            }
        }
        Ok(())
    }

    /// Draw a source region through an affine matrix by inverse mapping.
    ///
    /// `matrix` maps the centered local rectangle
    /// `[-width/2, -height/2] … [width/2, height/2]` (effective pixels) into
    /// this surface's pixel space; callers compose it from a placement matrix
    /// and a canvas-to-surface transform.
    pub fn draw_image(
        &mut self,
        src: &SourceView<'_>,
        width: f64,
        height: f64,
        matrix: Affine,
        sampling: Sampling,
        opacity: f64,
    ) {
        if !width.is_finite() || !height.is_finite() || width <= 0.0 || height <= 0.0 {
            return;
        }
        if matrix.determinant().abs() < 1e-12 {
            return;
        }
        let opacity = opacity.clamp(0.0, 1.0) as f32;
        if opacity <= 0.0 {
            return;
        }

        let inv = matrix.inverse();
        let hw = width / 2.0;
        let hh = height / 2.0;

        let corners = [
            matrix * Point::new(-hw, -hh),
            matrix * Point::new(hw, -hh),
            matrix * Point::new(hw, hh),
            matrix * Point::new(-hw, hh),
        ];
        let min_x = corners.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
        let max_x = corners.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
        let min_y = corners.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
        let max_y = corners.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);

        let x0 = min_x.floor().max(0.0) as u32;
        let y0 = min_y.floor().max(0.0) as u32;
        let x1 = max_x.ceil().min(f64::from(self.width)).max(0.0) as u32;
        let y1 = max_y.ceil().min(f64::from(self.height)).max(0.0) as u32;
        if x0 >= x1 || y0 >= y1 {
            return;
        }

        let sx_per = f64::from(src.width()) / width;
        let sy_per = f64::from(src.height()) / height;

        for py in y0..y1 {
            for px in x0..x1 {
                let local = inv * Point::new(f64::from(px) + 0.5, f64::from(py) + 0.5);
                if local.x < -hw || local.x >= hw || local.y < -hh || local.y >= hh {
                    continue;
                }
                let u = (local.x + hw) * sx_per;
                let v = (local.y + hh) * sy_per;
                let texel = match sampling {
                    Sampling::Nearest => src.texel(u.floor() as i64, v.floor() as i64),
                    Sampling::Bilinear => src.sample_bilinear(u, v),
                };
                self.blend_pixel(px, py, texel, opacity);
            }
        }
    }

    /// Nearest-neighbor rescale to the given dimensions.
    pub fn scale_nearest(&self, out_w: u32, out_h: u32) -> Surface {
        let mut out = Surface::new(out_w, out_h);
        if self.width == 0 || self.height == 0 {
            return out;
        }
        for y in 0..out_h {
            let sy = (u64::from(y) * u64::from(self.height) / u64::from(out_h.max(1))) as u32;
            let sy = sy.min(self.height - 1);
            for x in 0..out_w {
                let sx = (u64::from(x) * u64::from(self.width) / u64::from(out_w.max(1))) as u32;
                let sx = sx.min(self.width - 1);
                out.put_premul(x, y, self.get(sx, sy));
            }
        }
        out
    }

    /// Copy out a sub-rectangle; areas outside this surface read transparent.
    pub fn crop(&self, x: i64, y: i64, width: u32, height: u32) -> Surface {
        let mut out = Surface::new(width, height);
        for oy in 0..height {
            let sy = y + i64::from(oy);
            if sy < 0 || sy >= i64::from(self.height) {
                continue;
            }
            for ox in 0..width {
                let sx = x + i64::from(ox);
                if sx < 0 || sx >= i64::from(self.width) {
                    continue;
                }
                out.put_premul(ox, oy, self.get(sx as u32, sy as u32));
            }
        }
        out
    }

    /// Convert to a straight-alpha `image` buffer for encoding.
    pub fn to_rgba_image(&self) -> image::RgbaImage {
        let mut out = image::RgbaImage::new(self.width, self.height);
        for (px, src) in out.pixels_mut().zip(self.data.chunks_exact(4)) {
            px.0 = unpremultiply([src[0], src[1], src[2], src[3]]);
        }
        out
    }
}

/// Source-over for premultiplied RGBA8 with an extra opacity factor.
pub(crate) fn over(dst: [u8; 4], src: [u8; 4], opacity: f32) -> [u8; 4] {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src == [0, 0, 0, 0] {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }
    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = sa.saturating_add(mul_div255(u16::from(dst[3]), inv));
    for i in 0..3 {
        let sc = mul_div255(u16::from(src[i]), op);
        let dc = mul_div255(u16::from(dst[i]), inv);
        out[i] = sc.saturating_add(dc);
    }
    out
}

/// Convert one premultiplied pixel back to straight alpha.
pub(crate) fn unpremultiply(premul: [u8; 4]) -> [u8; 4] {
    let a = premul[3];
    if a == 0 {
        return [0, 0, 0, 0];
    }
    let a16 = u16::from(a);
    let un = |c: u8| -> u8 { ((u16::from(c) * 255 + a16 / 2) / a16).min(255) as u8 };
    [un(premul[0]), un(premul[1]), un(premul[2]), a]
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
