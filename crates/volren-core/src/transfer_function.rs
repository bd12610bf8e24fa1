//! Transfer function lookup tables.
//!
//! A transfer function maps a scalar field value to a color and opacity. It is
//! specified as a handful of control points and baked into a fixed-size RGBA
//! byte table that a renderer uploads as a 1D texture.

#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]

use glam::Vec4;

use crate::error::Result;
use crate::options::TransferControlPoint;
use crate::resample::resample;

/// Number of RGBA entries in a transfer function table.
pub const TABLE_SIZE: usize = 256;

/// A baked transfer function.
///
/// Always holds exactly [`TABLE_SIZE`] entries. Entry `i` covers field values
/// starting at `value_min + i * (value_max - value_min) / TABLE_SIZE`.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferFunctionTable {
    entries: Vec<[u8; 4]>,
    value_min: f32,
    value_max: f32,
}

/// A control point with its color resolved, scaled to byte range.
#[derive(Clone, Copy)]
struct ResolvedPoint {
    value: f32,
    rgba: Vec4,
}

impl TransferFunctionTable {
    /// Builds the table from control points given in any order.
    ///
    /// Fewer than two points are padded into a flat ramp; an empty list
    /// yields a fully transparent black table. When every point shares the
    /// same value, or the value range is not finite, the table is filled with
    /// the color of the last point.
    pub fn build(points: &[TransferControlPoint]) -> Result<Self> {
        let mut resolved = points
            .iter()
            .map(|p| {
                let rgb = p.color.to_rgb()?;
                Ok(ResolvedPoint {
                    value: p.value,
                    rgba: rgb.extend(p.opacity) * 255.0,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        resolved.sort_by(|a, b| a.value.total_cmp(&b.value));

        match resolved.len() {
            0 => {
                log::warn!("transfer function has no control points, using a transparent table");
                let empty = ResolvedPoint {
                    value: 0.0,
                    rgba: Vec4::ZERO,
                };
                resolved.extend([empty, empty]);
            }
            1 => {
                log::warn!("transfer function has a single control point, duplicating it");
                resolved.push(resolved[0]);
            }
            _ => {}
        }

        let value_min = resolved[0].value;
        let value_max = resolved[resolved.len() - 1].value;
        let range = value_max - value_min;

        let mut entries: Vec<[u8; 4]> = Vec::with_capacity(TABLE_SIZE);
        if range > 0.0 && range.is_finite() {
            for pair in resolved.windows(2) {
                let (a, b) = (&pair[0], &pair[1]);
                let pos1 = table_position(a.value, value_min, range);
                let pos2 = table_position(b.value, value_min, range);
                if pos1 >= pos2 {
                    continue;
                }
                append_interval(&mut entries, a.rgba, b.rgba, pos2 - pos1);
            }
        } else {
            log::warn!("transfer function control points all share value {value_min}, using a constant table");
            let last = resolved[resolved.len() - 1].rgba;
            entries.push(quantize(last));
        }

        normalize_length(&mut entries);
        log::debug!(
            "built transfer function table over [{value_min}, {value_max}] from {} control points",
            points.len()
        );

        Ok(Self {
            entries,
            value_min,
            value_max,
        })
    }

    /// Returns the table entries.
    pub fn entries(&self) -> &[[u8; 4]] {
        &self.entries
    }

    /// Returns the table as raw interleaved RGBA bytes.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.entries)
    }

    /// Field value mapped to the first entry.
    pub fn value_min(&self) -> f32 {
        self.value_min
    }

    /// Field value mapped past the last entry.
    pub fn value_max(&self) -> f32 {
        self.value_max
    }

    /// Looks up the entry for a field value, clamping to the table ends.
    ///
    /// Returns `None` for non-finite values, which mark excluded voxels.
    pub fn lookup(&self, value: f32) -> Option<[u8; 4]> {
        if !value.is_finite() {
            return None;
        }
        let range = self.value_max - self.value_min;
        if range <= 0.0 {
            return Some(self.entries[TABLE_SIZE - 1]);
        }
        let t = ((value - self.value_min) / range).clamp(0.0, 1.0);
        let idx = ((t * TABLE_SIZE as f32) as usize).min(TABLE_SIZE - 1);
        Some(self.entries[idx])
    }
}

/// Table slot of `value`, clamped to `0..=TABLE_SIZE`.
///
/// Normalizing by `range` first keeps huge but finite ranges from overflowing.
fn table_position(value: f32, value_min: f32, range: f32) -> usize {
    let t = ((value - value_min) / range * TABLE_SIZE as f32).floor();
    if t.is_nan() {
        return 0;
    }
    t.clamp(0.0, TABLE_SIZE as f32) as usize
}

/// Appends `count` entries interpolated from `from` (inclusive) to `to`.
///
/// A single-entry interval takes the color of `to`, as the resampler's last
/// output always equals its last input.
fn append_interval(entries: &mut Vec<[u8; 4]>, from: Vec4, to: Vec4, count: usize) {
    if count == 1 {
        entries.push(quantize(to));
        return;
    }
    let channels: [Vec<f32>; 4] =
        std::array::from_fn(|c| resample(&[from[c], to[c]], count));
    for i in 0..count {
        entries.push(quantize(Vec4::new(
            channels[0][i],
            channels[1][i],
            channels[2][i],
            channels[3][i],
        )));
    }
}

fn quantize(rgba: Vec4) -> [u8; 4] {
    let q = rgba.round().clamp(Vec4::ZERO, Vec4::splat(255.0));
    [q.x as u8, q.y as u8, q.z as u8, q.w as u8]
}

/// Forces the table to exactly [`TABLE_SIZE`] entries.
///
/// A short table is padded by repeating its last entry (transparent black if
/// empty); a long one is truncated.
fn normalize_length(entries: &mut Vec<[u8; 4]>) {
    if entries.len() < TABLE_SIZE {
        let fill = entries.last().copied().unwrap_or([0; 4]);
        entries.resize(TABLE_SIZE, fill);
    } else {
        entries.truncate(TABLE_SIZE);
    }
}
