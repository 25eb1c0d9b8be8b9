use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IoError {
    #[error("failed to read image {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("failed to encode image {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("failed to create temporary file in {}: {source}", dir.display())]
    TempFile {
        dir: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to move output into place at {}: {source}", path.display())]
    Persist {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("unsupported channel count {0}, expected 3 or 4")]
    UnsupportedChannels(usize),

    #[error("invalid parameters: {0}")]
    Config(#[from] defish_core::DefishError),
}

pub type Result<T> = std::result::Result<T, IoError>;
