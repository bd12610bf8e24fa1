//! Mapping between world space and normalized texture space.
//!
//! A renderer samples the field in texture space, where the grid occupies the
//! unit cube `[0, 1]^3`. [`GridTransform`] bundles the world-to-texture matrix
//! with the world-space quantities a ray marcher needs: the bounding box to
//! intersect rays with, the longest distance a ray can travel through it, and
//! a conservative step length.

use glam::{Mat3, Mat4, Quat, UVec3, Vec3};

use crate::bounding::{BoundingSphere, Extent};
use crate::error::{Result, VolrenError};
use crate::grid::{GridPlacement, VolumetricGrid};

/// World/texture transform and derived extents of a grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridTransform {
    /// Maps world coordinates into `[0, 1]^3` sampling space.
    pub texture_matrix: Mat4,
    /// World-space bounding box of the grid.
    pub extent: Extent,
    /// Length of the extent's space diagonal.
    pub max_depth: f32,
    /// Smallest per-axis grid spacing.
    pub min_unit: f32,
}

impl GridTransform {
    /// Computes the transform for a grid, whatever its placement.
    pub fn for_grid(grid: &VolumetricGrid) -> Result<Self> {
        match *grid.placement() {
            GridPlacement::AxisAligned { origin, unit } => {
                Self::axis_aligned(grid.size(), origin, unit)
            }
            GridPlacement::Affine { matrix } => Self::affine(grid.size(), matrix),
        }
    }

    /// Transform of a grid with `origin` and per-axis spacing `unit`.
    pub fn axis_aligned(size: UVec3, origin: Vec3, unit: Vec3) -> Result<Self> {
        check_size(size)?;
        let min_unit = unit.min_element();
        if min_unit <= 0.0 || !unit.is_finite() {
            return Err(VolrenError::NonPositiveSpacing(min_unit));
        }

        let span = unit * size.as_vec3();
        // Scale does not apply to the translation, so it is divided in up front.
        let texture_matrix =
            Mat4::from_scale_rotation_translation(span.recip(), Quat::IDENTITY, -origin / span);
        let extent = Extent::new(origin, origin + span);

        let result = Self {
            texture_matrix,
            extent,
            max_depth: span.length(),
            min_unit,
        };
        log::debug!("axis-aligned grid transform: {result:?}");
        Ok(result)
    }

    /// Transform of a grid placed by an affine `matrix` (lattice to world).
    pub fn affine(size: UVec3, matrix: Mat4) -> Result<Self> {
        check_size(size)?;

        let grid_to_world = matrix * Mat4::from_scale(size.as_vec3());
        let determinant = grid_to_world.determinant();
        if !determinant.is_finite() || determinant.abs() <= f32::EPSILON * f32::EPSILON {
            return Err(VolrenError::SingularTransform { determinant });
        }
        let texture_matrix = grid_to_world.inverse();
        if !texture_matrix.is_finite() {
            return Err(VolrenError::SingularTransform { determinant });
        }

        // The unit cube corners cover all 8 corners of the lattice box.
        let corners = Extent::new(Vec3::ZERO, Vec3::ONE)
            .corners()
            .map(|c| grid_to_world.transform_point3(c));
        let extent = Extent::from_points(corners)
            .ok_or(VolrenError::SingularTransform { determinant })?;

        let linear = Mat3::from_mat4(matrix);
        let min_unit = linear
            .x_axis
            .length()
            .min(linear.y_axis.length())
            .min(linear.z_axis.length());
        if min_unit <= 0.0 {
            return Err(VolrenError::NonPositiveSpacing(min_unit));
        }

        let result = Self {
            texture_matrix,
            extent,
            max_depth: extent.diagonal(),
            min_unit,
        };
        log::debug!("affine grid transform: {result:?}");
        Ok(result)
    }

    /// Maps a world position into texture space.
    pub fn to_texture(&self, world: Vec3) -> Vec3 {
        self.texture_matrix.transform_point3(world)
    }

    /// Culling sphere around the extent.
    pub fn bounding_sphere(&self) -> BoundingSphere {
        BoundingSphere::from_extent(&self.extent, self.max_depth)
    }
}

fn check_size(size: UVec3) -> Result<()> {
    if size.min_element() == 0 {
        return Err(VolrenError::EmptyGrid {
            x: size.x,
            y: size.y,
            z: size.z,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Vec3, b: Vec3) {
        assert!((a - b).abs().max_element() < 1e-4, "{a:?} != {b:?}");
    }

    #[test]
    fn test_axis_aligned_corners_map_to_unit_cube() {
        let origin = Vec3::new(-3.0, 1.5, 10.0);
        let unit = Vec3::new(0.5, 0.25, 2.0);
        let size = UVec3::new(10, 20, 4);
        let t = GridTransform::axis_aligned(size, origin, unit).unwrap();

        let far = origin + unit * size.as_vec3();
        assert_close(t.to_texture(origin), Vec3::ZERO);
        assert_close(t.to_texture(far), Vec3::ONE);
        assert_close(t.to_texture((origin + far) * 0.5), Vec3::splat(0.5));

        assert_eq!(t.extent.min, origin);
        assert_eq!(t.extent.max, far);
        assert_eq!(t.min_unit, 0.25);
        assert!((t.max_depth - (far - origin).length()).abs() < 1e-5);
    }

    #[test]
    fn test_axis_aligned_rejects_bad_spacing() {
        assert!(matches!(
            GridTransform::axis_aligned(UVec3::ONE, Vec3::ZERO, Vec3::new(1.0, -1.0, 1.0)),
            Err(VolrenError::NonPositiveSpacing(_))
        ));
        assert!(matches!(
            GridTransform::axis_aligned(UVec3::new(0, 1, 1), Vec3::ZERO, Vec3::ONE),
            Err(VolrenError::EmptyGrid { .. })
        ));
    }

    /// Translated, rotated and sheared placement.
    fn sheared_matrix() -> Mat4 {
        Mat4::from_translation(Vec3::new(1.0, -2.0, 0.5))
            * Mat4::from_rotation_y(0.7)
            * Mat4::from_cols(
                glam::Vec4::new(1.5, 0.0, 0.0, 0.0),
                glam::Vec4::new(0.3, 0.8, 0.0, 0.0),
                glam::Vec4::new(0.0, 0.2, 1.1, 0.0),
                glam::Vec4::W,
            )
    }

    #[test]
    fn test_affine_round_trip() {
        let size = UVec3::new(8, 5, 3);
        let matrix = sheared_matrix();
        let t = GridTransform::affine(size, matrix).unwrap();

        let placement = matrix * Mat4::from_scale(size.as_vec3());
        for p in [
            Vec3::ZERO,
            Vec3::ONE,
            Vec3::new(0.25, 0.5, 0.75),
            Vec3::new(-1.0, 2.0, 0.3),
        ] {
            assert_close(t.to_texture(placement.transform_point3(p)), p);
        }
    }

    #[test]
    fn test_affine_extent_covers_all_corners() {
        let size = UVec3::new(4, 6, 2);
        let matrix = Mat4::from_rotation_z(std::f32::consts::FRAC_PI_4);
        let t = GridTransform::affine(size, matrix).unwrap();

        let s = size.as_vec3();
        for corner in Extent::new(Vec3::ZERO, s).corners() {
            let w = matrix.transform_point3(corner);
            assert!(w.cmpge(t.extent.min - 1e-4).all());
            assert!(w.cmple(t.extent.max + 1e-4).all());
        }
        // Rotation about z: x spans [-6 sin45, 4 cos45], y spans [0, (4 + 6) sin45].
        let h = std::f32::consts::FRAC_1_SQRT_2;
        assert_close(t.extent.min, Vec3::new(-6.0 * h, 0.0, 0.0));
        assert_close(t.extent.max, Vec3::new(4.0 * h, 10.0 * h, 2.0));
        assert!((t.max_depth - t.extent.diagonal()).abs() < 1e-6);
        assert!((t.min_unit - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_affine_min_unit_is_smallest_axis_spacing() {
        let matrix = Mat4::from_scale(Vec3::new(2.0, 0.5, 3.0));
        let t = GridTransform::affine(UVec3::splat(2), matrix).unwrap();
        assert!((t.min_unit - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_affine_min_unit_of_sheared_grid() {
        // Shortest lattice axis is (0.3, 0.8, 0); the rotation keeps its length.
        let t = GridTransform::affine(UVec3::splat(2), sheared_matrix()).unwrap();
        assert!((t.min_unit - 0.73_f32.sqrt()).abs() < 1e-5, "{}", t.min_unit);
        // Smallest component of the transformed (1, 1, 1) would differ.
        let diagonal = Mat3::from_mat4(sheared_matrix()) * Vec3::ONE;
        assert!((diagonal.min_element() - t.min_unit).abs() > 0.1);
    }

    #[test]
    fn test_affine_singular() {
        let flat = Mat4::from_scale(Vec3::new(1.0, 1.0, 0.0));
        assert!(matches!(
            GridTransform::affine(UVec3::splat(3), flat),
            Err(VolrenError::SingularTransform { .. })
        ));
    }

    #[test]
    fn test_for_grid_matches_direct() {
        let grid = VolumetricGrid::axis_aligned(
            UVec3::new(2, 3, 4),
            Vec3::ONE,
            Vec3::splat(0.5),
            vec![0.0; 24],
        )
        .unwrap();
        assert_eq!(
            GridTransform::for_grid(&grid).unwrap(),
            GridTransform::axis_aligned(UVec3::new(2, 3, 4), Vec3::ONE, Vec3::splat(0.5)).unwrap()
        );
    }

    #[test]
    fn test_bounding_sphere() {
        let t = GridTransform::axis_aligned(UVec3::new(2, 4, 6), Vec3::ZERO, Vec3::ONE).unwrap();
        let sphere = t.bounding_sphere();
        assert_eq!(sphere.radius, t.max_depth / 2.0);
        assert_eq!(sphere.center, (t.extent.min + t.extent.max) / 2.0);
    }
}
