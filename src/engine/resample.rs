//! Mono sample-rate conversion for playback.
//!
//! Takes are captured at the input device's rate and may need converting to
//! the output device's rate before playback.

use crate::{LoopdeckError, Result};
use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};
use tracing::debug;

const CHUNK_SIZE: usize = 1024;

/// Resample a mono buffer from `input_rate` to `output_rate`.
///
/// Equal rates (or an empty buffer) pass through unchanged. The final chunk
/// is zero-padded to the resampler's fixed input size, so the tail carries a
/// short stretch of silence.
pub fn resample_mono(input: &[f32], input_rate: u32, output_rate: u32) -> Result<Vec<f32>> {
    if input_rate == output_rate || input.is_empty() {
        return Ok(input.to_vec());
    }

    let ratio = output_rate as f64 / input_rate as f64;

    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };

    let mut resampler = SincFixedIn::<f32>::new(ratio, 2.0, params, CHUNK_SIZE, 1)
        .map_err(|e| LoopdeckError::AudioProcessing(format!("Failed to create resampler: {}", e)))?;

    debug!(
        "Resampling {} samples: {} Hz -> {} Hz",
        input.len(),
        input_rate,
        output_rate
    );

    let mut output = Vec::with_capacity((input.len() as f64 * ratio * 1.1) as usize);

    for chunk in input.chunks(CHUNK_SIZE) {
        let frame = if chunk.len() == CHUNK_SIZE {
            chunk.to_vec()
        } else {
            let mut padded = chunk.to_vec();
            padded.resize(CHUNK_SIZE, 0.0);
            padded
        };

        let resampled = resampler
            .process(&[frame], None)
            .map_err(|e| LoopdeckError::AudioProcessing(format!("Resampling failed: {}", e)))?;
        output.extend_from_slice(&resampled[0]);
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_rates_pass_through() {
        let input: Vec<f32> = (0..2048).map(|i| (i as f32 * 0.01).sin()).collect();
        let output = resample_mono(&input, 48000, 48000).unwrap();
        assert_eq!(output, input);
    }

    #[test]
    fn test_empty_input() {
        assert!(resample_mono(&[], 16000, 48000).unwrap().is_empty());
    }

    #[test]
    fn test_upsampling_grows_the_buffer() {
        let input: Vec<f32> = (0..4096).map(|i| (i as f32 * 0.01).sin()).collect();
        let output = resample_mono(&input, 16000, 32000).unwrap();
        assert!(output.len() > input.len());
    }
}
