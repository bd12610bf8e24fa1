//! Volumetric render shape: a grid plus everything needed to draw it.

use glam::Vec3;
use volren_core::{
    spatial_mask, BoundingSphere, Extent, GridTransform, Result, TransferFunctionTable,
    VolumetricGrid, VolumetricRenderSpec,
};

use crate::backend::VolumeBackend;
use crate::uniforms::VolumeUniforms;

/// Immutable data derived from a grid and a style specification.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderDescriptor {
    transfer: TransferFunctionTable,
    transform: GridTransform,
    bounding_sphere: BoundingSphere,
    subsamples: f32,
}

impl RenderDescriptor {
    /// Derives the descriptor of `grid` styled by `spec`.
    pub fn new(grid: &VolumetricGrid, spec: &VolumetricRenderSpec) -> Result<Self> {
        let transform = GridTransform::for_grid(grid)?;
        let transfer = TransferFunctionTable::build(&spec.transferfn)?;
        Ok(Self {
            bounding_sphere: transform.bounding_sphere(),
            transfer,
            transform,
            subsamples: spec.subsamples,
        })
    }

    /// The baked transfer function.
    pub fn transfer(&self) -> &TransferFunctionTable {
        &self.transfer
    }

    /// World/texture transform, extent, depth and step.
    pub fn transform(&self) -> &GridTransform {
        &self.transform
    }

    /// Culling sphere.
    pub fn bounding_sphere(&self) -> &BoundingSphere {
        &self.bounding_sphere
    }

    /// Samples per voxel.
    pub fn subsamples(&self) -> f32 {
        self.subsamples
    }

    /// Uniform block for the shader.
    pub fn uniforms(&self) -> VolumeUniforms {
        VolumeUniforms::from(self)
    }
}

/// A grid prepared for volumetric rendering.
///
/// Owns the grid (with unselected voxels already excluded) and its
/// [`RenderDescriptor`]. Changing the style means building a new render.
#[derive(Debug, Clone)]
pub struct VolumetricRender {
    grid: VolumetricGrid,
    descriptor: RenderDescriptor,
    hidden: bool,
}

impl VolumetricRender {
    /// Prepares `grid` for rendering with `spec`.
    ///
    /// When `spec.coords` is set, voxels farther than `spec.seldist` from all
    /// coordinates are replaced by [`volren_core::EXCLUDED_VALUE`] before the
    /// render takes ownership of the grid.
    pub fn new(mut grid: VolumetricGrid, spec: &VolumetricRenderSpec) -> Result<Self> {
        let descriptor = RenderDescriptor::new(&grid, spec)?;

        if let Some(coords) = &spec.coords {
            spatial_mask::apply_in_place(&mut grid, coords, spec.seldist);
        }

        log::info!(
            "built volumetric render: {} voxels, extent {:?} to {:?}",
            grid.voxel_count(),
            descriptor.transform.extent.min,
            descriptor.transform.extent.max
        );

        Ok(Self {
            grid,
            descriptor,
            hidden: spec.hidden,
        })
    }

    /// The derived render data.
    pub fn descriptor(&self) -> &RenderDescriptor {
        &self.descriptor
    }

    /// The grid as it will be sampled.
    pub fn grid(&self) -> &VolumetricGrid {
        &self.grid
    }

    /// Uniform block for the shader.
    pub fn uniforms(&self) -> VolumeUniforms {
        self.descriptor.uniforms()
    }

    /// Returns whether the render is hidden.
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Sets whether the render is hidden.
    pub fn set_hidden(&mut self, hidden: bool) -> &mut Self {
        self.hidden = hidden;
        self
    }

    /// Center of the bounding sphere.
    pub fn position(&self) -> Vec3 {
        self.descriptor.bounding_sphere.center
    }

    /// X coordinate of [`Self::position`].
    pub fn x(&self) -> f32 {
        self.position().x
    }

    /// Y coordinate of [`Self::position`].
    pub fn y(&self) -> f32 {
        self.position().y
    }

    /// Z coordinate of [`Self::position`].
    pub fn z(&self) -> f32 {
        self.position().z
    }

    /// The 8 corners of the world extent, for drawing the proxy box.
    pub fn bounding_box_corners(&self) -> [Vec3; 8] {
        self.descriptor.transform.extent.corners()
    }

    /// Index pairs into [`Self::bounding_box_corners`] for the box's 12 edges.
    pub fn bounding_box_edges(&self) -> [[u32; 2]; 12] {
        Extent::edges()
    }

    /// Uploads the render to `backend`.
    ///
    /// Returns `None` without touching the backend when the render is hidden.
    pub fn attach<B: VolumeBackend>(&self, backend: &mut B) -> Result<Option<B::Handle>> {
        if self.hidden {
            log::debug!("volumetric render is hidden, nothing uploaded");
            return Ok(None);
        }
        let handle = backend.upload(&self.descriptor, &self.grid)?;
        log::info!("uploaded volumetric render ({} voxels)", self.grid.voxel_count());
        Ok(Some(handle))
    }

    /// Releases resources returned by [`Self::attach`].
    pub fn detach<B: VolumeBackend>(&self, backend: &mut B, handle: B::Handle) {
        backend.release(handle);
        log::info!("released volumetric render");
    }

    /// Releases `current` (if any) and uploads again.
    pub fn reattach<B: VolumeBackend>(
        &self,
        backend: &mut B,
        current: Option<B::Handle>,
    ) -> Result<Option<B::Handle>> {
        if let Some(handle) = current {
            self.detach(backend, handle);
        }
        self.attach(backend)
    }
}
