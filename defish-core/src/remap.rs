//! Per-pixel source-coordinate grid for the square output frame.

use ndarray::{Array3, ArrayView3};
use rayon::prelude::*;

use crate::geometry::FrameGeometry;
use crate::params::LensParameters;
use crate::projection::perspective_focal;

/// Fractional source coordinate for every destination pixel.
///
/// Stored as a `[side, side, 2]` array, last axis `(x, y)` in cropped-frame
/// pixels. Coordinates may land outside the frame; the resampler decides what
/// those become. A non-finite pair marks a pixel with no defined source and
/// always resolves to background. The grid is plain data and never mutated
/// after construction.
#[derive(Debug, Clone)]
pub struct RemapGrid {
    coords: Array3<f32>,
}

impl RemapGrid {
    /// Compute the grid for one conversion.
    ///
    /// Pure function of the geometry and parameters; rows are filled in
    /// parallel but the result is identical to a serial fill.
    pub fn build(geom: &FrameGeometry, params: &LensParameters) -> Self {
        let side = geom.side;
        let span = geom.span();
        let ifoc = params.dtype.focal(params.fov, span);
        let ofoc = perspective_focal(params.pfov, span);
        let (cx, cy) = (geom.cx, geom.cy);
        let dtype = params.dtype;

        let mut buf = vec![0.0f32; side * side * 2];
        buf.par_chunks_mut(side * 2).enumerate().for_each(|(j, row)| {
            let yd = j as f64 - cy;
            for (i, pix) in row.chunks_mut(2).enumerate() {
                let xd = i as f64 - cx;
                let rd = xd.hypot(yd);
                let (xs, ys) = if rd == 0.0 {
                    // Displacement is zero, the center maps to itself.
                    (cx, cy)
                } else {
                    let phi = (rd / ofoc).atan();
                    let rr = dtype.source_radius(ifoc, phi);
                    (cx + xd * rr / rd, cy + yd * rr / rd)
                };
                pix[0] = xs as f32;
                pix[1] = ys as f32;
            }
        });

        let coords = Array3::from_shape_vec((side, side, 2), buf)
            .expect("coordinate buffer matches grid shape");
        Self { coords }
    }

    pub fn side(&self) -> usize {
        self.coords.shape()[0]
    }

    pub fn coords(&self) -> ArrayView3<'_, f32> {
        self.coords.view()
    }

    /// Source coordinate `(x, y)` for the destination pixel at `(row, col)`.
    pub fn source_at(&self, row: usize, col: usize) -> (f32, f32) {
        (self.coords[[row, col, 0]], self.coords[[row, col, 1]])
    }

    #[cfg(test)]
    pub(crate) fn from_coords(coords: Array3<f32>) -> Self {
        Self { coords }
    }
}
