//! Square working frame derived from the source dimensions and overrides.

use crate::error::{DefishError, Result};
use crate::params::LensParameters;

/// Resolved per-conversion geometry.
///
/// All coordinates are in cropped-frame pixels: column `x` grows right, row
/// `y` grows down, both starting at the top-left corner of the centered
/// square crop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameGeometry {
    /// Column offset of the crop inside the source image.
    pub x0: usize,
    /// Row offset of the crop inside the source image.
    pub y0: usize,
    /// Side length of the square crop, `min(width, height)`.
    pub side: usize,
    /// Effective optical center, column.
    pub cx: f64,
    /// Effective optical center, row.
    pub cy: f64,
    /// Effective lens-circle radius in pixels.
    pub radius: f64,
}

impl FrameGeometry {
    /// Derive the working frame for a `width` x `height` source.
    ///
    /// Overrides in `params` are validated against the crop here; the
    /// image-independent fields are assumed already validated.
    pub fn derive(width: usize, height: usize, params: &LensParameters) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(DefishError::EmptyImage);
        }

        let side = width.min(height);
        let x0 = (width - side) / 2;
        let y0 = (height - side) / 2;

        let cx = match params.effective_xcenter() {
            Some(v) if (v as usize) < side => v as f64,
            Some(v) => {
                return Err(DefishError::CenterOutOfBounds {
                    axis: 'x',
                    value: v,
                    side,
                });
            }
            None => ((side - 1) / 2) as f64,
        };
        let cy = match params.effective_ycenter() {
            Some(v) if (v as usize) < side => v as f64,
            Some(v) => {
                return Err(DefishError::CenterOutOfBounds {
                    axis: 'y',
                    value: v,
                    side,
                });
            }
            None => ((side - 1) / 2) as f64,
        };

        let radius = match params.effective_radius() {
            Some(v) if v >= 1 && (v as usize) <= side => v as f64,
            Some(v) => return Err(DefishError::RadiusOutOfBounds { radius: v, side }),
            None => side as f64 / 2.0,
        };

        Ok(Self {
            x0,
            y0,
            side,
            cx,
            cy,
            radius,
        })
    }

    /// Linear extent of the lens circle, twice the effective radius.
    ///
    /// This is the `dim` scale the projection focal formulas expect; without
    /// a radius override it equals the crop side.
    pub fn span(&self) -> f64 {
        2.0 * self.radius
    }
}
