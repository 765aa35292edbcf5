//! Spectral analysis with FFT

pub mod fft;
pub mod windowing;
pub mod result;
pub mod analysis;

pub use fft::FftEngine;
pub use windowing::{apply_window, WindowCache, WindowType};
pub use result::{BandKey, SpectrumResult};
pub use analysis::{calculate_spectrum, SpectrumConfig, SpectrumEstimator};
