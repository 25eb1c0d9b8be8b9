//! Image file I/O around the conversion pipeline.

pub mod convert;
pub mod error;
pub mod raster;

pub use convert::convert_file;
pub use defish_core::LensParameters;
pub use error::{IoError, Result};
pub use raster::{load_image, save_image};
