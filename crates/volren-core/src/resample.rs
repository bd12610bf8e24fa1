//! Linear resampling of short numeric sequences.

#![allow(clippy::cast_precision_loss)]

/// Linearly resamples `source` to exactly `target_len` values.
///
/// The first and last outputs equal the first and last inputs. Interior output
/// `i` reads the source at the continuous position `i * (n - 1) / (m - 1)` and
/// interpolates between the two neighboring samples.
///
/// # Panics
/// Panics if `source` has fewer than 2 values or `target_len` is less than 2.
#[must_use]
pub fn resample(source: &[f32], target_len: usize) -> Vec<f32> {
    assert!(
        source.len() >= 2,
        "resample source needs at least 2 values, got {}",
        source.len()
    );
    assert!(
        target_len >= 2,
        "resample target length must be >= 2, got {target_len}"
    );

    let last = source.len() - 1;
    let spring = last as f32 / (target_len - 1) as f32;

    let mut out = Vec::with_capacity(target_len);
    out.push(source[0]);
    for i in 1..target_len - 1 {
        let t = i as f32 * spring;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let lo = (t.floor() as usize).min(last);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let hi = (t.ceil() as usize).min(last);
        let frac = t - lo as f32;
        out.push(source[lo] + (source[hi] - source[lo]) * frac);
    }
    out.push(source[last]);
    out
}
