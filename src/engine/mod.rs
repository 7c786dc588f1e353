pub mod bridge;
pub mod config;
#[cfg(feature = "audio-io")]
pub mod native;
#[cfg(feature = "audio-io")]
pub mod resample;

pub use bridge::{channel, EngineBridge, EngineEndpoint, EngineEvent, EngineRequest};
pub use config::EngineConfig;
#[cfg(feature = "audio-io")]
pub use native::NativeEngine;
#[cfg(feature = "audio-io")]
pub use resample::resample_mono;
