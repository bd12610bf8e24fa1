//! Core computations for volren-rs.
//!
//! This crate turns a scalar 3D grid and a style specification into the data a
//! volumetric renderer needs:
//! - [`TransferFunctionTable`] - a fixed-size RGBA lookup table built from control points
//! - [`GridTransform`] - world to texture space mapping, extent, diagonal and sampling step
//! - [`BoundingSphere`] - a culling sphere derived from the extent
//! - [`spatial_mask`] - restriction of the rendered voxels to neighborhoods of reference points

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]

pub mod bounding;
pub mod color;
pub mod error;
pub mod grid;
pub mod grid_transform;
pub mod options;
pub mod resample;
pub mod spatial_mask;
pub mod transfer_function;

pub use bounding::{BoundingSphere, Extent};
pub use color::ColorSpec;
pub use error::{Result, VolrenError};
pub use grid::{GridPlacement, VolumetricGrid};
pub use grid_transform::GridTransform;
pub use options::{TransferControlPoint, VolumetricRenderSpec};
pub use resample::resample;
pub use spatial_mask::EXCLUDED_VALUE;
pub use transfer_function::{TransferFunctionTable, TABLE_SIZE};

// Re-export glam types for convenience
pub use glam::{Mat4, UVec3, Vec3, Vec4};
