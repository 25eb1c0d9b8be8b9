//! Raster decoding into pixel arrays and atomic encoding back to disk.

use image::{DynamicImage, ImageFormat, RgbImage, RgbaImage};
use ndarray::{Array3, ArrayView3};
use std::path::Path;
use tempfile::NamedTempFile;

use crate::error::{IoError, Result};

/// Decode the image at `path` into a `[height, width, channels]` array.
///
/// Sources with an alpha channel decode to 4 channels, everything else is
/// promoted to RGB, so the result always has 3 or 4 channels of 8 bits.
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<Array3<u8>> {
    let path = path.as_ref();
    let img = image::open(path).map_err(|e| IoError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;

    let (buf, width, height, channels) = if img.color().has_alpha() {
        let rgba = img.to_rgba8();
        let (w, h) = rgba.dimensions();
        (rgba.into_raw(), w, h, 4)
    } else {
        let rgb = img.to_rgb8();
        let (w, h) = rgb.dimensions();
        (rgb.into_raw(), w, h, 3)
    };

    Ok(
        Array3::from_shape_vec((height as usize, width as usize, channels), buf)
            .expect("decoded buffer matches image dimensions"),
    )
}

/// Encode `img` at `path`, picking the format from the file extension.
///
/// The encoder writes to a temporary sibling file which is renamed over
/// `path` only after a complete encode, so a failed save leaves no partial
/// output behind. Alpha is dropped when the target format is JPEG.
pub fn save_image<P: AsRef<Path>>(path: P, img: ArrayView3<'_, u8>) -> Result<()> {
    let path = path.as_ref();
    let (h, w, ch) = img.dim();

    let buf: Vec<u8> = img.iter().copied().collect();
    let out = match ch {
        3 => DynamicImage::ImageRgb8(
            RgbImage::from_raw(w as u32, h as u32, buf)
                .expect("pixel buffer matches image dimensions"),
        ),
        4 => DynamicImage::ImageRgba8(
            RgbaImage::from_raw(w as u32, h as u32, buf)
                .expect("pixel buffer matches image dimensions"),
        ),
        other => return Err(IoError::UnsupportedChannels(other)),
    };

    let format = ImageFormat::from_path(path).map_err(|e| IoError::Write {
        path: path.to_path_buf(),
        source: e,
    })?;
    let out = if format == ImageFormat::Jpeg && ch == 4 {
        DynamicImage::ImageRgb8(out.to_rgb8())
    } else {
        out
    };

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| IoError::TempFile {
        dir: dir.to_path_buf(),
        source: e,
    })?;
    out.write_to(&mut tmp, format).map_err(|e| IoError::Write {
        path: path.to_path_buf(),
        source: e,
    })?;
    tmp.persist(path).map_err(|e| IoError::Persist {
        path: path.to_path_buf(),
        source: e.error,
    })?;

    Ok(())
}
