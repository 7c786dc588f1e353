//! Amplitude normalization for clip visualization.

/// Map raw downsampled amplitudes to bar heights in `[0, 100]`.
///
/// Each sample becomes `|s| / max_abs * 100` where `max_abs` is the largest
/// absolute amplitude in the clip, so the loudest point always reaches full
/// height. A silent or empty clip normalizes to zeros of the same length
/// instead of dividing by zero. Sign is discarded.
pub fn normalize(samples: &[f32]) -> Vec<f32> {
    let max_abs = samples.iter().fold(0.0f32, |acc, s| acc.max(s.abs()));

    if max_abs == 0.0 {
        return vec![0.0; samples.len()];
    }

    samples.iter().map(|s| s.abs() / max_abs * 100.0).collect()
}
