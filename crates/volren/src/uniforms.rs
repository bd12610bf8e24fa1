//! GPU uniform block of a volumetric render.

use crate::render::RenderDescriptor;

/// Uniforms for the volumetric ray-marching shader.
/// A [`crate::VolumeBackend`] binds these bytes as-is, so its shader must
/// declare the same field order and 16-byte padding.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[allow(clippy::pub_underscore_fields)]
pub struct VolumeUniforms {
    /// World to texture space matrix (column major).
    pub texture_matrix: [[f32; 4]; 4],
    /// Minimum corner of the world extent (w unused).
    pub extent_min: [f32; 4],
    /// Maximum corner of the world extent (w unused).
    pub extent_max: [f32; 4],
    /// Field value mapped to the first transfer table entry.
    pub transfer_min: f32,
    /// Field value mapped past the last transfer table entry.
    pub transfer_max: f32,
    /// Longest distance a ray travels through the extent.
    pub max_depth: f32,
    /// Smallest grid spacing, the base marching step.
    pub min_unit: f32,
    /// Samples per voxel.
    pub subsamples: f32,
    /// Padding to 16-byte alignment.
    pub _pad: [f32; 3],
}

impl From<&RenderDescriptor> for VolumeUniforms {
    fn from(descriptor: &RenderDescriptor) -> Self {
        let transform = descriptor.transform();
        Self {
            texture_matrix: transform.texture_matrix.to_cols_array_2d(),
            extent_min: transform.extent.min.extend(0.0).to_array(),
            extent_max: transform.extent.max.extend(0.0).to_array(),
            transfer_min: descriptor.transfer().value_min(),
            transfer_max: descriptor.transfer().value_max(),
            max_depth: transform.max_depth,
            min_unit: transform.min_unit,
            subsamples: descriptor.subsamples(),
            _pad: [0.0; 3],
        }
    }
}

impl VolumeUniforms {
    /// The uniform block as bytes, ready for a buffer write.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}
