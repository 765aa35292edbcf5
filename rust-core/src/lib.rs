//! Vibration Spectrum - Condition-Monitoring Spectral Core
//! 
//! Windowed FFT spectra of vibration waveforms, frequency-domain integration,
//! band peaks, trends over stored results, and shaft speed estimation.

pub mod error;
pub mod waveform;
pub mod spectrum;
pub mod integration;
pub mod bands;
pub mod speed;
pub mod storage;
pub mod trend;

pub use error::{Result, SpectrumError};
pub use waveform::{Quantity, TimeWaveform};
pub use spectrum::{BandKey, SpectrumConfig, SpectrumEstimator, SpectrumResult, WindowType};
pub use integration::{differentiate_spectrum, integrate_spectrum};
pub use bands::{calculate_peak_in_band, peak_in_band, BandPeak};
pub use speed::{SpeedConfig, SpeedEstimator};
pub use storage::{InMemorySpectrumStore, JsonDirectoryStore, SpectrumStore};
pub use trend::{get_peak_in_band_trend, machine_speed_for_date};
