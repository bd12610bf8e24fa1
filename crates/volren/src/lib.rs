//! volren: preparation of scalar 3D grids for volumetric rendering.
//!
//! A [`VolumetricRender`] is built once from a [`VolumetricGrid`] and a
//! [`VolumetricRenderSpec`]. Construction bakes the transfer function into a
//! lookup table, derives the world-to-texture transform and bounding volume,
//! and optionally drops voxels far from a set of reference coordinates. The
//! result is an immutable [`RenderDescriptor`] that a [`VolumeBackend`] turns
//! into GPU resources.
//!
//! # Quick Start
//!
//! ```no_run
//! use volren::*;
//!
//! fn main() -> Result<()> {
//!     init_logging();
//!
//!     let grid = VolumetricGrid::axis_aligned(
//!         UVec3::splat(16),
//!         Vec3::ZERO,
//!         Vec3::splat(0.5),
//!         vec![0.0; 16 * 16 * 16],
//!     )?;
//!     let spec = VolumetricRenderSpec::from_json_str(
//!         r#"{"transferfn": [
//!             {"value": 0.0, "color": "blue", "opacity": 0.0},
//!             {"value": 1.0, "color": "red", "opacity": 1.0}
//!         ]}"#,
//!     )?;
//!
//!     let render = VolumetricRender::new(grid, &spec)?;
//!     println!("render centered at {}", render.position());
//!     Ok(())
//! }
//! ```

mod backend;
mod render;
mod uniforms;

pub use backend::VolumeBackend;
pub use render::{RenderDescriptor, VolumetricRender};
pub use uniforms::VolumeUniforms;

// Re-export core types
pub use volren_core::{
    error::{Result, VolrenError},
    spatial_mask, BoundingSphere, ColorSpec, Extent, GridPlacement, GridTransform,
    TransferControlPoint, TransferFunctionTable, VolumetricGrid, VolumetricRenderSpec,
    EXCLUDED_VALUE, TABLE_SIZE,
};
pub use volren_core::{Mat4, UVec3, Vec3, Vec4};

/// Installs the `env_logger` backend for the `log` macros used by volren.
///
/// Safe to call more than once; only the first call has an effect.
pub fn init_logging() {
    let _ = env_logger::try_init();
}

/// Builds a render from a grid and a JSON style specification.
pub fn build_from_json(grid: VolumetricGrid, spec_json: &str) -> Result<VolumetricRender> {
    let spec = VolumetricRenderSpec::from_json_str(spec_json)?;
    VolumetricRender::new(grid, &spec)
}
