//! Conversion parameters and the closed option enums.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{DefishError, Result};

/// Lens projection model relating look angle to image radius.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Projection {
    /// Equidistant mapping, radius proportional to angle.
    Linear,
    /// Equisolid-angle mapping, the most common fisheye construction.
    #[default]
    EqualArea,
    Orthographic,
    Stereographic,
}

impl Projection {
    pub fn as_str(self) -> &'static str {
        match self {
            Projection::Linear => "linear",
            Projection::EqualArea => "equalarea",
            Projection::Orthographic => "orthographic",
            Projection::Stereographic => "stereographic",
        }
    }
}

impl FromStr for Projection {
    type Err = DefishError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "linear" => Ok(Projection::Linear),
            "equalarea" => Ok(Projection::EqualArea),
            "orthographic" => Ok(Projection::Orthographic),
            "stereographic" => Ok(Projection::Stereographic),
            other => Err(DefishError::UnknownProjection(other.to_string())),
        }
    }
}

impl fmt::Display for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output framing: keep the whole square, or vignette to the lens circle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameFormat {
    FullFrame,
    #[default]
    Circular,
}

impl FrameFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            FrameFormat::FullFrame => "fullframe",
            FrameFormat::Circular => "circular",
        }
    }
}

impl FromStr for FrameFormat {
    type Err = DefishError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "fullframe" => Ok(FrameFormat::FullFrame),
            "circular" => Ok(FrameFormat::Circular),
            other => Err(DefishError::UnknownFormat(other.to_string())),
        }
    }
}

impl fmt::Display for FrameFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fill policy for samples that fall outside the source frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Background {
    /// All-zero pixel: black, or fully transparent when the image has alpha.
    #[default]
    Zero,
    /// Clamp the sample coordinate to the nearest edge pixel.
    Clamp,
}

impl Background {
    pub fn as_str(self) -> &'static str {
        match self {
            Background::Zero => "zero",
            Background::Clamp => "clamp",
        }
    }
}

impl FromStr for Background {
    type Err = DefishError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "zero" => Ok(Background::Zero),
            "clamp" => Ok(Background::Clamp),
            other => Err(DefishError::UnknownBackground(other.to_string())),
        }
    }
}

impl fmt::Display for Background {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User-supplied optical parameters for one conversion.
///
/// Center and radius overrides are in square-cropped-frame pixels. Negative
/// override values are the legacy "unset" sentinel and behave exactly like
/// `None`; prefer `None` in new code.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LensParameters {
    /// Source lens field of view in degrees.
    pub fov: f64,
    /// Output perspective field of view in degrees.
    pub pfov: f64,
    /// Optical center x override.
    pub xcenter: Option<i32>,
    /// Optical center y override.
    pub ycenter: Option<i32>,
    /// Usable lens-circle radius override.
    pub radius: Option<i32>,
    /// Output rotation in degrees, counterclockwise, taken modulo 360.
    pub angle: f64,
    /// Uniform border width added around the formatted output.
    pub pad: u32,
    /// Lens projection model.
    pub dtype: Projection,
    /// Masking behavior of the output frame.
    pub format: FrameFormat,
    /// Out-of-bounds fill policy.
    pub background: Background,
}

impl Default for LensParameters {
    fn default() -> Self {
        Self {
            fov: 180.0,
            pfov: 120.0,
            xcenter: None,
            ycenter: None,
            radius: None,
            angle: 0.0,
            pad: 0,
            dtype: Projection::default(),
            format: FrameFormat::default(),
            background: Background::default(),
        }
    }
}

impl LensParameters {
    /// Check the image-independent invariants.
    ///
    /// Bounds of the center/radius overrides depend on the image and are
    /// checked when the frame geometry is derived.
    pub fn validate(&self) -> Result<()> {
        if !self.fov.is_finite() || self.fov <= 0.0 || self.fov > 360.0 {
            return Err(DefishError::InvalidFov(self.fov));
        }
        if !self.pfov.is_finite() || self.pfov <= 0.0 || self.pfov > 360.0 {
            return Err(DefishError::InvalidPfov(self.pfov));
        }
        if !self.angle.is_finite() {
            return Err(DefishError::InvalidAngle(self.angle));
        }
        Ok(())
    }

    /// X-center override with the negative sentinel treated as unset.
    pub fn effective_xcenter(&self) -> Option<i32> {
        self.xcenter.filter(|v| *v >= 0)
    }

    /// Y-center override with the negative sentinel treated as unset.
    pub fn effective_ycenter(&self) -> Option<i32> {
        self.ycenter.filter(|v| *v >= 0)
    }

    /// Radius override with the negative sentinel treated as unset.
    pub fn effective_radius(&self) -> Option<i32> {
        self.radius.filter(|v| *v >= 0)
    }
}
