pub mod clips;
pub mod engine;
pub mod transport;
pub mod ui;
pub mod viz;

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum LoopdeckError {
    #[error("Audio device error: {0}")]
    AudioDevice(String),

    #[error("Engine channel error: {0}")]
    Channel(String),

    #[error("Audio processing error: {0}")]
    AudioProcessing(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, LoopdeckError>;
