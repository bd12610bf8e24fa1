//! Scalar fields sampled on a 3D lattice.

#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]

use glam::{Mat4, UVec3, Vec3};

use crate::error::{Result, VolrenError};

/// How a grid's lattice is placed in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GridPlacement {
    /// Lattice point `(i, j, k)` sits at `origin + unit * (i, j, k)`.
    AxisAligned { origin: Vec3, unit: Vec3 },
    /// Lattice point `(i, j, k)` sits at `matrix * (i, j, k, 1)`.
    Affine { matrix: Mat4 },
}

impl GridPlacement {
    /// Matrix taking lattice coordinates to world coordinates.
    pub fn lattice_to_world(&self) -> Mat4 {
        match *self {
            Self::AxisAligned { origin, unit } => {
                Mat4::from_scale_rotation_translation(unit, glam::Quat::IDENTITY, origin)
            }
            Self::Affine { matrix } => matrix,
        }
    }
}

/// A scalar field over a 3D lattice.
///
/// Values are stored x-major: lattice point `(x, y, z)` lives at
/// `x * size.y * size.z + y * size.z + z`.
#[derive(Debug, Clone, PartialEq)]
pub struct VolumetricGrid {
    size: UVec3,
    placement: GridPlacement,
    data: Vec<f32>,
    world_to_lattice: Mat4,
}

impl VolumetricGrid {
    /// Creates a grid, validating its size, spacing and data length.
    pub fn new(size: UVec3, placement: GridPlacement, data: Vec<f32>) -> Result<Self> {
        if size.min_element() == 0 {
            return Err(VolrenError::EmptyGrid {
                x: size.x,
                y: size.y,
                z: size.z,
            });
        }
        let expected = voxel_count(size);
        if data.len() != expected {
            return Err(VolrenError::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }

        let world_to_lattice = match placement {
            GridPlacement::AxisAligned { unit, .. } => {
                let smallest = unit.min_element();
                if smallest <= 0.0 || !unit.is_finite() {
                    return Err(VolrenError::NonPositiveSpacing(smallest));
                }
                placement.lattice_to_world().inverse()
            }
            GridPlacement::Affine { matrix } => {
                let determinant = matrix.determinant();
                if !determinant.is_finite() || determinant.abs() <= f32::EPSILON * f32::EPSILON {
                    return Err(VolrenError::SingularTransform { determinant });
                }
                matrix.inverse()
            }
        };

        Ok(Self {
            size,
            placement,
            data,
            world_to_lattice,
        })
    }

    /// Creates an axis-aligned grid from an origin and per-axis spacing.
    pub fn axis_aligned(size: UVec3, origin: Vec3, unit: Vec3, data: Vec<f32>) -> Result<Self> {
        Self::new(size, GridPlacement::AxisAligned { origin, unit }, data)
    }

    /// Creates a grid placed by an arbitrary affine matrix.
    pub fn affine(size: UVec3, matrix: Mat4, data: Vec<f32>) -> Result<Self> {
        Self::new(size, GridPlacement::Affine { matrix }, data)
    }

    /// Returns a grid with the same geometry and different values.
    pub fn with_data(&self, data: Vec<f32>) -> Result<Self> {
        let expected = self.voxel_count();
        if data.len() != expected {
            return Err(VolrenError::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            size: self.size,
            placement: self.placement,
            data,
            world_to_lattice: self.world_to_lattice,
        })
    }

    /// Number of lattice points along each axis.
    #[must_use]
    pub fn size(&self) -> UVec3 {
        self.size
    }

    /// Placement of the lattice in world space.
    #[must_use]
    pub fn placement(&self) -> &GridPlacement {
        &self.placement
    }

    /// Total number of lattice points.
    #[must_use]
    pub fn voxel_count(&self) -> usize {
        voxel_count(self.size)
    }

    /// The scalar values.
    #[must_use]
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Consumes the grid and returns its values.
    #[must_use]
    pub fn into_data(self) -> Vec<f32> {
        self.data
    }

    /// Flattens a lattice index to a position in [`Self::data`].
    #[must_use]
    pub fn flatten_index(&self, i: u32, j: u32, k: u32) -> usize {
        let (sy, sz) = (self.size.y as usize, self.size.z as usize);
        i as usize * sy * sz + j as usize * sz + k as usize
    }

    /// Continuous lattice coordinates of a world position.
    #[must_use]
    pub fn lattice_coords(&self, world: Vec3) -> Vec3 {
        self.world_to_lattice.transform_point3(world)
    }

    /// World position of lattice point `(i, j, k)`.
    #[must_use]
    pub fn lattice_position(&self, i: u32, j: u32, k: u32) -> Vec3 {
        self.placement
            .lattice_to_world()
            .transform_point3(UVec3::new(i, j, k).as_vec3())
    }

    /// Index of the lattice point nearest to a world position.
    ///
    /// Coordinates round half up. Returns `None` when the nearest lattice
    /// point is outside the grid.
    #[must_use]
    pub fn index(&self, world: Vec3) -> Option<usize> {
        let rounded = (self.lattice_coords(world) + Vec3::splat(0.5)).floor();
        if !rounded.is_finite() || rounded.min_element() < 0.0 {
            return None;
        }
        let upper = self.size.as_vec3();
        if rounded.x >= upper.x || rounded.y >= upper.y || rounded.z >= upper.z {
            return None;
        }
        Some(self.flatten_index(rounded.x as u32, rounded.y as u32, rounded.z as u32))
    }
}

fn voxel_count(size: UVec3) -> usize {
    size.x as usize * size.y as usize * size.z as usize
}
