//! Configuration for the audio engine.

use crate::{LoopdeckError, Result};
use serde::{Deserialize, Serialize};

/// Tunable parameters for the engine side of the bridge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Length of each recorded take, in seconds.
    pub record_secs: f32,

    /// Number of amplitude points returned per take for visualization.
    pub downsample_len: usize,

    /// Metronome tempo in beats per minute.
    pub bpm: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            record_secs: 3.0,
            downsample_len: 256,
            bpm: 120,
        }
    }
}

impl EngineConfig {
    pub fn with_record_secs(mut self, secs: f32) -> Self {
        self.record_secs = secs;
        self
    }

    pub fn with_downsample_len(mut self, len: usize) -> Self {
        self.downsample_len = len;
        self
    }

    pub fn with_bpm(mut self, bpm: u32) -> Self {
        self.bpm = bpm;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if !self.record_secs.is_finite() || self.record_secs <= 0.0 {
            return Err(LoopdeckError::Config(format!(
                "Take length must be positive, got {}",
                self.record_secs
            )));
        }

        if self.downsample_len == 0 {
            return Err(LoopdeckError::Config(
                "Downsample length must be greater than 0".into(),
            ));
        }

        if self.bpm == 0 {
            return Err(LoopdeckError::Config("BPM must be greater than 0".into()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.bpm, 120);
    }

    #[test]
    fn test_config_builder() {
        let config = EngineConfig::default()
            .with_record_secs(1.5)
            .with_downsample_len(128)
            .with_bpm(90);

        assert_eq!(config.record_secs, 1.5);
        assert_eq!(config.downsample_len, 128);
        assert_eq!(config.bpm, 90);
    }

    #[test]
    fn test_validate_rejects_degenerate_values() {
        assert!(EngineConfig::default()
            .with_record_secs(0.0)
            .validate()
            .is_err());
        assert!(EngineConfig::default()
            .with_downsample_len(0)
            .validate()
            .is_err());
        assert!(EngineConfig::default().with_bpm(0).validate().is_err());
    }
}
