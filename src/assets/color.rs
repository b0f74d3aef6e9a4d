//! Planar YUV 4:2:0 <-> packed RGBA8 conversions (BT.601, limited range).
//!
//! Chroma planes are `ceil(w/2) x ceil(h/2)`; luma pixel `(x, y)` reads chroma sample
//! `(x / 2, y / 2)` with no interpolation.

use crate::encode::sink::check_frame_len;
use crate::foundation::error::{MediaError, MediaResult};

/// Borrowed view of an I420 picture, as produced by a decoder.
#[derive(Clone, Copy, Debug)]
pub struct Yuv420Ref<'a> {
    /// Display width in pixels.
    pub width: u32,
    /// Display height in pixels.
    pub height: u32,
    /// Luma plane.
    pub y: &'a [u8],
    /// Cb plane.
    pub u: &'a [u8],
    /// Cr plane.
    pub v: &'a [u8],
    /// Bytes per luma row.
    pub y_stride: usize,
    /// Bytes per Cb row.
    pub u_stride: usize,
    /// Bytes per Cr row.
    pub v_stride: usize,
}

/// Mutable view of an I420 picture, as handed to an encoder.
#[derive(Debug)]
pub struct Yuv420Mut<'a> {
    /// Display width in pixels.
    pub width: u32,
    /// Display height in pixels.
    pub height: u32,
    /// Luma plane.
    pub y: &'a mut [u8],
    /// Cb plane.
    pub u: &'a mut [u8],
    /// Cr plane.
    pub v: &'a mut [u8],
    /// Bytes per luma row.
    pub y_stride: usize,
    /// Bytes per Cb row.
    pub u_stride: usize,
    /// Bytes per Cr row.
    pub v_stride: usize,
}

/// How the exporter interprets the bytes it is given.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputColor {
    /// Straight RGBA8; converted with the BT.601 forward transform.
    #[default]
    Rgba,
    /// Already YUV, packed as Y in R, Cb in G, Cr in B; alpha ignored.
    PackedYuv,
}

fn clip(x: f32) -> u8 {
    // `as i32` truncates toward zero before the clamp.
    (x as i32).clamp(0, 255) as u8
}

/// Convert one limited-range YUV sample to RGB.
pub fn yuv_to_rgb(y: u8, u: u8, v: u8) -> [u8; 3] {
    let c = 1.164 * (f32::from(y) - 16.0);
    let d = f32::from(u) - 128.0;
    let e = f32::from(v) - 128.0;
    [
        clip(c + 1.596 * e),
        clip(c - 0.391 * d - 0.813 * e),
        clip(c + 2.017 * d),
    ]
}

/// Convert one RGB sample to limited-range YUV, rounding to nearest.
pub fn rgb_to_yuv(r: u8, g: u8, b: u8) -> [u8; 3] {
    let (r, g, b) = (f32::from(r), f32::from(g), f32::from(b));
    let y = 0.257 * r + 0.504 * g + 0.098 * b + 16.0;
    let u = -0.148 * r - 0.291 * g + 0.439 * b + 128.0;
    let v = 0.439 * r - 0.368 * g - 0.071 * b + 128.0;
    [
        y.round().clamp(0.0, 255.0) as u8,
        u.round().clamp(0.0, 255.0) as u8,
        v.round().clamp(0.0, 255.0) as u8,
    ]
}

/// Expand an I420 picture into tightly packed, fully opaque RGBA8.
pub fn yuv420_to_rgba(src: &Yuv420Ref<'_>) -> Vec<u8> {
    let (w, h) = (src.width as usize, src.height as usize);
    let mut out = vec![0u8; w * h * 4];
    if w == 0 {
        return out;
    }
    for (row, line) in out.chunks_exact_mut(w * 4).enumerate() {
        let y_row = &src.y[row * src.y_stride..];
        let u_row = &src.u[(row / 2) * src.u_stride..];
        let v_row = &src.v[(row / 2) * src.v_stride..];
        for (col, px) in line.chunks_exact_mut(4).enumerate() {
            let [r, g, b] = yuv_to_rgb(y_row[col], u_row[col / 2], v_row[col / 2]);
            px.copy_from_slice(&[r, g, b, 255]);
        }
    }
    out
}

/// Fill `dst` from tightly packed RGBA8 `rgba` of `dst.width x dst.height` pixels.
///
/// Luma is per pixel; each chroma sample is the truncating mean of its 2x2 block. Blocks on an
/// odd right/bottom edge reuse the edge texel.
///
/// Fails with [`MediaError::Validation`] if `rgba` or any destination plane is too small.
pub fn rgba_to_yuv420(
    rgba: &[u8],
    input: InputColor,
    dst: &mut Yuv420Mut<'_>,
) -> MediaResult<()> {
    check_frame_len(rgba, dst.width, dst.height)?;
    let (w, h) = (dst.width as usize, dst.height as usize);
    if w == 0 || h == 0 {
        return Ok(());
    }
    let (cw, chh) = (w.div_ceil(2), h.div_ceil(2));
    for (name, plane, stride, pw, ph) in [
        ("y", dst.y.len(), dst.y_stride, w, h),
        ("u", dst.u.len(), dst.u_stride, cw, chh),
        ("v", dst.v.len(), dst.v_stride, cw, chh),
    ] {
        if stride < pw || plane < stride * (ph - 1) + pw {
            return Err(MediaError::validation(format!(
                "{name} plane of {plane} bytes (stride {stride}) can't hold {pw}x{ph}"
            )));
        }
    }

    let yuv_at = |x: usize, y: usize| -> [u8; 3] {
        let i = (y * w + x) * 4;
        match input {
            InputColor::Rgba => rgb_to_yuv(rgba[i], rgba[i + 1], rgba[i + 2]),
            InputColor::PackedYuv => [rgba[i], rgba[i + 1], rgba[i + 2]],
        }
    };

    for y in 0..h {
        let line = &mut dst.y[y * dst.y_stride..y * dst.y_stride + w];
        for (x, luma) in line.iter_mut().enumerate() {
            *luma = yuv_at(x, y)[0];
        }
    }

    for cy in 0..h.div_ceil(2) {
        for cx in 0..w.div_ceil(2) {
            let (x0, y0) = (cx * 2, cy * 2);
            let (x1, y1) = ((x0 + 1).min(w - 1), (y0 + 1).min(h - 1));
            let (mut su, mut sv) = (0u32, 0u32);
            for (x, y) in [(x0, y0), (x1, y0), (x0, y1), (x1, y1)] {
                let [_, u, v] = yuv_at(x, y);
                su += u32::from(u);
                sv += u32::from(v);
            }
            dst.u[cy * dst.u_stride + cx] = (su / 4) as u8;
            dst.v[cy * dst.v_stride + cx] = (sv / 4) as u8;
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/color.rs"]
mod tests;
