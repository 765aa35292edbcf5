//! Error type shared by every analysis stage

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpectrumError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Band [{start} Hz, {end} Hz] is outside the spectrum range [0 Hz, {max} Hz]")]
    OutOfRange { start: f64, end: f64, max: f64 },

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("No spectrum stored for timestamp '{0}'")]
    NotFound(String),

    #[error("Storage backend failure: {0}")]
    Storage(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to (de)serialize spectrum: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SpectrumError>;
