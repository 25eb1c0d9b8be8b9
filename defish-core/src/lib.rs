pub mod error;
pub mod format;
pub mod geometry;
pub mod params;
pub mod pipeline;
pub mod projection;
pub mod remap;
pub mod resample;

pub use error::{DefishError, Result};
pub use geometry::FrameGeometry;
pub use params::{Background, FrameFormat, LensParameters, Projection};
pub use pipeline::convert;
pub use remap::RemapGrid;
pub use resample::resample;
