//! Sampled sensor signals and the physical quantity they carry

use crate::error::{Result, SpectrumError};
use serde::{Deserialize, Serialize};

/// Physical quantity measured by a vibration sensor
///
/// Ordered by frequency-domain integration: one integration step moves
/// Acceleration → Velocity → Displacement, one differentiation step moves
/// the other way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Quantity {
    Acceleration,
    Velocity,
    Displacement,
}

impl Quantity {
    /// Quantity reached by one integration step, if any
    pub fn integrated(self) -> Option<Quantity> {
        match self {
            Quantity::Acceleration => Some(Quantity::Velocity),
            Quantity::Velocity => Some(Quantity::Displacement),
            Quantity::Displacement => None,
        }
    }

    /// Quantity reached by one differentiation step, if any
    pub fn differentiated(self) -> Option<Quantity> {
        match self {
            Quantity::Acceleration => None,
            Quantity::Velocity => Some(Quantity::Acceleration),
            Quantity::Displacement => Some(Quantity::Velocity),
        }
    }
}

/// Time-domain samples from one sensor channel
#[derive(Debug, Clone, PartialEq)]
pub struct TimeWaveform {
    /// Samples at a constant rate
    pub data: Vec<f64>,

    /// Sample rate in Hz
    pub sample_rate: f64,

    /// Quantity the samples represent
    pub quantity: Quantity,
}

impl TimeWaveform {
    pub fn new(data: Vec<f64>, sample_rate: f64, quantity: Quantity) -> Self {
        Self {
            data,
            sample_rate,
            quantity,
        }
    }

    /// Check the sample rate and length invariants
    pub fn validate(&self) -> Result<()> {
        if !self.sample_rate.is_finite() || self.sample_rate <= 0.0 {
            return Err(SpectrumError::InvalidInput(format!(
                "sample rate must be positive, got {} Hz",
                self.sample_rate
            )));
        }
        if self.data.len() < 2 {
            return Err(SpectrumError::InvalidInput(format!(
                "waveform needs at least 2 samples, got {}",
                self.data.len()
            )));
        }
        if self.data.iter().any(|s| !s.is_finite()) {
            return Err(SpectrumError::InvalidInput(
                "waveform contains non-finite samples".to_string(),
            ));
        }
        Ok(())
    }

    /// Nyquist frequency in Hz
    pub fn nyquist(&self) -> f64 {
        self.sample_rate / 2.0
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
