use thiserror::Error;

/// Errors raised by the correction engine.
///
/// Every variant is a configuration problem detected before any per-pixel
/// work starts; geometric edge cases inside the remap (center pixel,
/// out-of-bounds samples) are handled, not reported.
#[derive(Error, Debug)]
pub enum DefishError {
    #[error("source field of view must be finite and in (0, 360] degrees, got {0}")]
    InvalidFov(f64),

    #[error("output field of view must be finite and in (0, 360] degrees, got {0}")]
    InvalidPfov(f64),

    #[error("rotation angle must be finite, got {0}")]
    InvalidAngle(f64),

    #[error("{axis}-center override {value} outside the cropped frame (side {side})")]
    CenterOutOfBounds {
        axis: char,
        value: i32,
        side: usize,
    },

    #[error("radius override {radius} outside the cropped frame (side {side})")]
    RadiusOutOfBounds { radius: i32, side: usize },

    #[error("image has zero width, height, or channels")]
    EmptyImage,

    #[error("unknown projection model '{0}' (expected linear, equalarea, orthographic, or stereographic)")]
    UnknownProjection(String),

    #[error("unknown frame format '{0}' (expected fullframe or circular)")]
    UnknownFormat(String),

    #[error("unknown background policy '{0}' (expected zero or clamp)")]
    UnknownBackground(String),
}

pub type Result<T> = std::result::Result<T, DefishError>;
