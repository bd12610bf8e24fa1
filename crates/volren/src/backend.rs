//! Seam between render descriptors and a GPU backend.

use volren_core::{Result, VolumetricGrid};

use crate::render::RenderDescriptor;

/// Creates and destroys the GPU resources of a volumetric render.
///
/// Implementations upload the transfer table and grid values as textures and
/// bind the descriptor's uniforms. The handle owns whatever the backend
/// allocated; it is handed back to [`VolumeBackend::release`] on teardown.
pub trait VolumeBackend {
    /// Backend-specific resources of one uploaded render.
    type Handle;

    /// Allocates resources for a descriptor and its grid.
    fn upload(&mut self, descriptor: &RenderDescriptor, grid: &VolumetricGrid)
        -> Result<Self::Handle>;

    /// Frees resources previously returned by [`VolumeBackend::upload`].
    fn release(&mut self, handle: Self::Handle);
}
