//! File-to-file conversion.

use std::path::Path;

use defish_core::LensParameters;

use crate::error::Result;
use crate::raster::{load_image, save_image};

/// Convert the image at `src` and write the result to `dst`.
///
/// Parameters are checked before the source file is opened and the output is
/// written atomically, so a failing call leaves the filesystem untouched.
pub fn convert_file<P: AsRef<Path>, Q: AsRef<Path>>(
    src: P,
    dst: Q,
    params: &LensParameters,
) -> Result<()> {
    let src = src.as_ref();
    let dst = dst.as_ref();
    params.validate()?;

    let input = load_image(src)?;
    let (h, w, ch) = input.dim();
    tracing::debug!("loaded {} ({w}x{h}, {ch} channels)", src.display());

    let output = defish_core::convert(input.view(), params)?;
    save_image(dst, output.view())?;
    tracing::debug!("wrote {}", dst.display());

    Ok(())
}
