//! End-to-end conversion of a single frame.

use ndarray::{Array3, ArrayView3, s};

use crate::error::{DefishError, Result};
use crate::format::format_frame;
use crate::geometry::FrameGeometry;
use crate::params::LensParameters;
use crate::remap::RemapGrid;
use crate::resample::resample;

/// Re-project one source frame through the configured lens model.
///
/// `src` is a `[height, width, channels]` array. Parameters are validated
/// before any pixel work; on error nothing is produced. The output is the
/// centered square crop re-projected, masked, padded, and rotated per the
/// parameters, `side + 2 * pad` pixels on each axis.
pub fn convert(src: ArrayView3<'_, u8>, params: &LensParameters) -> Result<Array3<u8>> {
    params.validate()?;

    let (height, width, channels) = src.dim();
    if channels == 0 {
        return Err(DefishError::EmptyImage);
    }
    let geom = FrameGeometry::derive(width, height, params)?;
    tracing::debug!(
        "frame {}x{}: side={} center=({}, {}) radius={}",
        width,
        height,
        geom.side,
        geom.cx,
        geom.cy,
        geom.radius
    );

    let crop = src.slice(s![
        geom.y0..geom.y0 + geom.side,
        geom.x0..geom.x0 + geom.side,
        ..
    ]);
    let grid = RemapGrid::build(&geom, params);
    let out = resample(crop, &grid, params.background);
    tracing::debug!(
        "resampled {} px through {} projection (fov={} pfov={})",
        geom.side * geom.side,
        params.dtype,
        params.fov,
        params.pfov
    );

    Ok(format_frame(out, &geom, params))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{Background, FrameFormat, Projection};
    use ndarray::Array3;

    fn gradient(height: usize, width: usize, ch: usize) -> Array3<u8> {
        Array3::from_shape_fn((height, width, ch), |(y, x, c)| {
            (x * 3 + y * 5 + c * 11) as u8
        })
    }

    #[test]
    fn output_has_crop_side_plus_padding() {
        let params = LensParameters {
            pad: 10,
            ..Default::default()
        };
        let out = convert(gradient(480, 640, 3).view(), &params).unwrap();
        assert_eq!(out.dim(), (500, 500, 3));
    }

    #[test]
    fn channel_depth_is_preserved() {
        let params = LensParameters::default();
        for ch in [1, 3, 4] {
            let out = convert(gradient(64, 64, ch).view(), &params).unwrap();
            assert_eq!(out.dim().2, ch);
        }
    }

    #[test]
    fn invalid_parameters_fail_before_pixel_work() {
        let params = LensParameters {
            fov: -1.0,
            ..Default::default()
        };
        let err = convert(gradient(8, 8, 3).view(), &params).unwrap_err();
        assert!(matches!(err, DefishError::InvalidFov(_)));
    }

    #[test]
    fn zero_channel_image_is_rejected() {
        let src = Array3::<u8>::zeros((8, 8, 0));
        let err = convert(src.view(), &LensParameters::default()).unwrap_err();
        assert!(matches!(err, DefishError::EmptyImage));
    }

    #[test]
    fn center_pixel_survives_for_every_model() {
        let src = gradient(101, 101, 3);
        for dtype in [
            Projection::Linear,
            Projection::EqualArea,
            Projection::Orthographic,
            Projection::Stereographic,
        ] {
            let params = LensParameters {
                dtype,
                format: FrameFormat::FullFrame,
                ..Default::default()
            };
            let out = convert(src.view(), &params).unwrap();
            // Center index (101 - 1) / 2 = 50 maps to itself.
            for c in 0..3 {
                assert_eq!(out[[50, 50, c]], src[[50, 50, c]], "{dtype}");
            }
        }
    }

    #[test]
    fn landscape_frame_is_cropped_centered() {
        let mut src = Array3::<u8>::zeros((4, 8, 1));
        // Distinct column values to locate the crop window.
        for x in 0..8 {
            for y in 0..4 {
                src[[y, x, 0]] = (x * 10) as u8;
            }
        }
        let params = LensParameters {
            background: Background::Clamp,
            format: FrameFormat::FullFrame,
            ..Default::default()
        };
        let out = convert(src.view(), &params).unwrap();
        assert_eq!(out.dim(), (4, 4, 1));
        // Center pixel comes from the cropped window columns 2..6.
        assert_eq!(out[[1, 1, 0]], src[[1, 3, 0]]);
    }

    #[test]
    fn conversion_is_deterministic() {
        let src = gradient(120, 90, 4);
        let params = LensParameters {
            angle: 30.0,
            pad: 4,
            ..Default::default()
        };
        let a = convert(src.view(), &params).unwrap();
        let b = convert(src.view(), &params).unwrap();
        assert_eq!(a, b);
    }
}
