//! Restriction of a grid to the neighborhood of reference points.
//!
//! Voxels farther than a selection distance from every reference point are
//! overwritten with [`EXCLUDED_VALUE`], which the transfer function lookup
//! treats as empty space.

#![allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]

use glam::Vec3;

use crate::bounding::Extent;
use crate::grid::VolumetricGrid;

/// Value written into excluded voxels.
pub const EXCLUDED_VALUE: f32 = f32::INFINITY;

/// Marks every voxel whose lattice position is strictly closer than
/// `distance` to at least one of `coords`.
///
/// A reference point is only considered when one of the two extreme corners
/// of its query box `[c - distance, c + distance]` resolves to a grid voxel.
/// Boxes that overlap the grid with both corners outside are skipped.
#[must_use]
pub fn selection_mask(grid: &VolumetricGrid, coords: &[Vec3], distance: f32) -> Vec<bool> {
    let mut mask = vec![false; grid.voxel_count()];
    let distance_sq = distance * distance;
    let lattice_to_world = grid.placement().lattice_to_world();
    let last = grid.size() - 1;
    let mut skipped = 0_usize;

    for &c in coords {
        let lo = c - Vec3::splat(distance);
        let hi = c + Vec3::splat(distance);
        if grid.index(lo).is_none() && grid.index(hi).is_none() {
            skipped += 1;
            continue;
        }

        // Lattice points whose world position can lie inside the query box.
        let Some(range) =
            Extent::from_points(Extent::new(lo, hi).corners().map(|p| grid.lattice_coords(p)))
        else {
            continue;
        };
        let start = range.min.ceil().max(Vec3::ZERO);
        let end = range.max.floor().min(last.as_vec3());
        if start.cmpgt(end).any() {
            continue;
        }
        let (start, end) = (start.as_uvec3(), end.as_uvec3());

        for i in start.x..=end.x {
            for j in start.y..=end.y {
                for k in start.z..=end.z {
                    let idx = grid.flatten_index(i, j, k);
                    if mask[idx] {
                        continue;
                    }
                    let p = lattice_to_world.transform_point3(Vec3::new(
                        i as f32, j as f32, k as f32,
                    ));
                    if p.distance_squared(c) < distance_sq {
                        mask[idx] = true;
                    }
                }
            }
        }
    }

    if skipped > 0 {
        log::warn!(
            "{skipped} of {} selection coordinates have no query box corner inside the grid, skipped",
            coords.len()
        );
    }
    mask
}

/// Returns a copy of the grid's values with unselected voxels excluded.
#[must_use]
pub fn masked_data(grid: &VolumetricGrid, coords: &[Vec3], distance: f32) -> Vec<f32> {
    let mask = selection_mask(grid, coords, distance);
    let data: Vec<f32> = grid
        .data()
        .iter()
        .zip(&mask)
        .map(|(&value, &keep)| if keep { value } else { EXCLUDED_VALUE })
        .collect();
    log_exclusions(&mask);
    data
}

/// Excludes unselected voxels directly in the grid's values.
///
/// This destroys the excluded values; applying it twice with different
/// coordinates only keeps voxels selected by both.
pub fn apply_in_place(grid: &mut VolumetricGrid, coords: &[Vec3], distance: f32) {
    let mask = selection_mask(grid, coords, distance);
    for (value, keep) in grid.data_mut().iter_mut().zip(&mask) {
        if !keep {
            *value = EXCLUDED_VALUE;
        }
    }
    log_exclusions(&mask);
}

fn log_exclusions(mask: &[bool]) {
    let kept = mask.iter().filter(|&&keep| keep).count();
    log::debug!(
        "selection kept {kept} of {} voxels, excluded {}",
        mask.len(),
        mask.len() - kept
    );
}
