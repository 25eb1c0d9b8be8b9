use std::f64::consts::PI;

use crate::params::Projection;

/// Focal length of the ideal output perspective, in pixels, for a frame of
/// linear extent `span` covering `pfov_deg` degrees.
pub fn perspective_focal(pfov_deg: f64, span: f64) -> f64 {
    span / (2.0 * (pfov_deg * PI / 360.0).tan())
}

impl Projection {
    /// Effective focal length, in pixels, of a lens with this projection
    /// covering `fov_deg` degrees over a frame of linear extent `span`.
    ///
    /// Normalized so a look angle of half the field of view lands exactly on
    /// the lens-circle edge at `span / 2`, whichever model is chosen.
    pub fn focal(self, fov_deg: f64, span: f64) -> f64 {
        match self {
            Projection::Linear => span * 180.0 / (fov_deg * PI),
            Projection::EqualArea => span / (2.0 * (fov_deg * PI / 720.0).sin()),
            Projection::Orthographic => span / (2.0 * (fov_deg * PI / 360.0).sin()),
            Projection::Stereographic => span / (2.0 * (fov_deg * PI / 720.0).tan()),
        }
    }

    /// Radial distance on the source image, in pixels, at which a ray with
    /// look angle `phi` (radians from the optical axis) lands.
    pub fn source_radius(self, focal: f64, phi: f64) -> f64 {
        match self {
            Projection::Linear => focal * phi,
            Projection::EqualArea => focal * (phi / 2.0).sin(),
            Projection::Orthographic => focal * phi.sin(),
            Projection::Stereographic => focal * (phi / 2.0).tan(),
        }
    }
}
