//! Style specification for a volumetric render.

use glam::Vec3;
use serde::{Deserialize, Deserializer, Serialize};

use crate::color::ColorSpec;
use crate::error::Result;

/// Default number of samples taken per voxel along a ray.
pub const DEFAULT_SUBSAMPLES: f32 = 5.0;

/// Default selection distance around reference coordinates.
pub const DEFAULT_SELECTION_DISTANCE: f32 = 2.0;

/// One control point of a transfer function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferControlPoint {
    /// Field value this point is anchored at.
    pub value: f32,
    /// Color at this value.
    #[serde(default)]
    pub color: ColorSpec,
    /// Opacity at this value, in `[0, 1]`.
    #[serde(default)]
    pub opacity: f32,
}

impl TransferControlPoint {
    /// Creates a control point.
    pub fn new(value: f32, color: impl Into<ColorSpec>, opacity: f32) -> Self {
        Self {
            value,
            color: color.into(),
            opacity,
        }
    }
}

/// Style specification of a volumetric render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumetricRenderSpec {
    /// Transfer function control points, in any order.
    pub transferfn: Vec<TransferControlPoint>,

    /// Approximate number of samples per voxel.
    pub subsamples: f32,

    /// Reference coordinates around which data is kept. `None` keeps everything.
    #[serde(deserialize_with = "deserialize_coords")]
    pub coords: Option<Vec<Vec3>>,

    /// Distance around `coords` within which voxels are kept.
    pub seldist: f32,

    /// Whether the render is hidden (no GPU resources are created).
    pub hidden: bool,
}

impl Default for VolumetricRenderSpec {
    fn default() -> Self {
        Self {
            transferfn: Vec::new(),
            subsamples: DEFAULT_SUBSAMPLES,
            coords: None,
            seldist: DEFAULT_SELECTION_DISTANCE,
            hidden: false,
        }
    }
}

impl VolumetricRenderSpec {
    /// Creates a specification with the given control points and default settings.
    pub fn new(transferfn: Vec<TransferControlPoint>) -> Self {
        Self {
            transferfn,
            ..Self::default()
        }
    }

    /// Parses a specification from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Restricts rendering to voxels within `seldist` of `coords`.
    #[must_use]
    pub fn with_selection(mut self, coords: Vec<Vec3>, seldist: f32) -> Self {
        self.coords = Some(coords);
        self.seldist = seldist;
        self
    }
}

/// Coordinates as they appear in JSON: `[x, y, z]` or `{x, y, z}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum CoordSpec {
    Array([f32; 3]),
    Object { x: f32, y: f32, z: f32 },
}

impl From<CoordSpec> for Vec3 {
    fn from(c: CoordSpec) -> Self {
        match c {
            CoordSpec::Array(a) => Vec3::from_array(a),
            CoordSpec::Object { x, y, z } => Vec3::new(x, y, z),
        }
    }
}

fn deserialize_coords<'de, D>(deserializer: D) -> std::result::Result<Option<Vec<Vec3>>, D::Error>
where
    D: Deserializer<'de>,
{
    let coords: Option<Vec<CoordSpec>> = Option::deserialize(deserializer)?;
    Ok(coords.map(|c| c.into_iter().map(Vec3::from).collect()))
}
