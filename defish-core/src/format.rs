//! Output framing: circular mask, border padding, rotation.
//!
//! The pipeline applies these in a fixed order, mask then pad then rotate.
//! Padding before rotation keeps corners exposed by the rotation inside the
//! frame, and masking before padding keeps the lens circle centered in the
//! un-padded region.

use ndarray::{Array3, s};
use rayon::prelude::*;

use crate::geometry::FrameGeometry;
use crate::params::{Background, FrameFormat, LensParameters};
use crate::resample::sample_bilinear;

/// Zero every pixel farther than `radius` from `(cx, cy)`.
///
/// The boundary itself is kept: only strictly greater distances are masked.
pub fn apply_circular_mask(img: &mut Array3<u8>, cx: f64, cy: f64, radius: f64) {
    let (h, w, ch) = img.dim();
    for j in 0..h {
        let dy = j as f64 - cy;
        for i in 0..w {
            let dx = i as f64 - cx;
            if dx.hypot(dy) > radius {
                for c in 0..ch {
                    img[[j, i, c]] = 0;
                }
            }
        }
    }
}

/// Surround the frame with a uniform zero border of `pad` pixels.
pub fn add_padding(img: &Array3<u8>, pad: u32) -> Array3<u8> {
    let pad = pad as usize;
    let (h, w, ch) = img.dim();
    let mut out = Array3::zeros((h + 2 * pad, w + 2 * pad, ch));
    out.slice_mut(s![pad..pad + h, pad..pad + w, ..]).assign(img);
    out
}

/// Rotate the frame about its own center, counterclockwise for positive
/// angles, zero-filling the exposed areas.
///
/// Uses the same bilinear discipline as the projection resampler, with the
/// rotation inverted per destination pixel.
pub fn rotate(img: &Array3<u8>, angle_deg: f64) -> Array3<u8> {
    let (h, w, ch) = img.dim();
    let cx = (w as f64 - 1.0) / 2.0;
    let cy = (h as f64 - 1.0) / 2.0;
    let (sin, cos) = angle_deg.to_radians().sin_cos();
    let view = img.view();

    let mut buf = vec![0u8; h * w * ch];
    buf.par_chunks_mut(w * ch).enumerate().for_each(|(j, row)| {
        let dy = j as f64 - cy;
        for (i, pix) in row.chunks_mut(ch).enumerate() {
            let dx = i as f64 - cx;
            let sx = cx + dx * cos - dy * sin;
            let sy = cy + dx * sin + dy * cos;
            sample_bilinear(&view, sx as f32, sy as f32, Background::Zero, pix);
        }
    });

    Array3::from_shape_vec((h, w, ch), buf).expect("pixel buffer matches frame shape")
}

/// Apply the configured framing steps to a resampled square frame.
pub fn format_frame(
    mut img: Array3<u8>,
    geom: &FrameGeometry,
    params: &LensParameters,
) -> Array3<u8> {
    if params.format == FrameFormat::Circular {
        apply_circular_mask(&mut img, geom.cx, geom.cy, geom.radius);
    }
    if params.pad > 0 {
        img = add_padding(&img, params.pad);
    }
    let angle = params.angle.rem_euclid(360.0);
    if angle != 0.0 {
        img = rotate(&img, angle);
    }
    img
}
