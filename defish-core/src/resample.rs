//! Bilinear sampling of the source frame at fractional coordinates.

use ndarray::{Array3, ArrayView3};
use rayon::prelude::*;

use crate::params::Background;
use crate::remap::RemapGrid;

/// Sample `src` at fractional `(x, y)` into one destination pixel.
///
/// Coordinates exactly on the frame edge are valid; past the edge the
/// `background` policy decides between a zero pixel and the clamped edge
/// sample. Non-finite coordinates always produce a zero pixel.
pub(crate) fn sample_bilinear(
    src: &ArrayView3<'_, u8>,
    x: f32,
    y: f32,
    background: Background,
    out: &mut [u8],
) {
    let (h, w, ch) = src.dim();
    let x_max = (w - 1) as f32;
    let y_max = (h - 1) as f32;

    if !x.is_finite() || !y.is_finite() {
        out[..ch].fill(0);
        return;
    }

    let (x, y) = match background {
        Background::Zero => {
            if x < 0.0 || y < 0.0 || x > x_max || y > y_max {
                out[..ch].fill(0);
                return;
            }
            (x, y)
        }
        Background::Clamp => (x.clamp(0.0, x_max), y.clamp(0.0, y_max)),
    };

    let x0 = x.floor() as usize;
    let y0 = y.floor() as usize;
    let x1 = (x0 + 1).min(w - 1);
    let y1 = (y0 + 1).min(h - 1);
    let fx = x - x0 as f32;
    let fy = y - y0 as f32;

    for c in 0..ch {
        let p00 = src[[y0, x0, c]] as f32;
        let p10 = src[[y0, x1, c]] as f32;
        let p01 = src[[y1, x0, c]] as f32;
        let p11 = src[[y1, x1, c]] as f32;

        let top = p00 * (1.0 - fx) + p10 * fx;
        let bot = p01 * (1.0 - fx) + p11 * fx;
        let value = top * (1.0 - fy) + bot * fy;
        out[c] = value.round().clamp(0.0, 255.0) as u8;
    }
}

/// Resample the square source frame through a remap grid.
///
/// `src` is the cropped `[side, side, channels]` frame; the output has the
/// same shape. Rows are processed in parallel, each pixel independently, so
/// the result does not depend on thread scheduling.
pub fn resample(src: ArrayView3<'_, u8>, grid: &RemapGrid, background: Background) -> Array3<u8> {
    let side = grid.side();
    let ch = src.dim().2;

    let mut buf = vec![0u8; side * side * ch];
    buf.par_chunks_mut(side * ch).enumerate().for_each(|(j, row)| {
        for (i, pix) in row.chunks_mut(ch).enumerate() {
            let (x, y) = grid.source_at(j, i);
            sample_bilinear(&src, x, y, background, pix);
        }
    });

    Array3::from_shape_vec((side, side, ch), buf).expect("pixel buffer matches frame shape")
}
