//! Spectrum estimator
//! 
//! Turns a sampled waveform into a block-averaged amplitude spectrum with a
//! fixed number of lines between 0 Hz and the configured maximum frequency

use super::fft::FftEngine;
use super::result::SpectrumResult;
use super::windowing::{amplitude_correction_factor, WindowCache, WindowType};
use crate::error::{Result, SpectrumError};
use crate::waveform::TimeWaveform;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Spectrum estimator configuration
/// 
/// A plain value: the estimator copies it at the start of every calculation,
/// so changing settings never affects a calculation already running.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpectrumConfig {
    /// Number of spectral lines, DC included (≥ 2)
    pub number_of_lines: usize,
    
    /// Window applied to each block before the FFT
    pub window_type: WindowType,
    
    /// Lower edge of the analysis range in Hz
    pub min_frequency: f64,
    
    /// Frequency of the last line in Hz (≤ Nyquist of the waveform)
    pub max_frequency: f64,
}

impl Default for SpectrumConfig {
    fn default() -> Self {
        Self {
            number_of_lines: 401,
            window_type: WindowType::Hanning,
            min_frequency: 0.0,
            max_frequency: 1000.0,
        }
    }
}

impl SpectrumConfig {
    pub fn with_number_of_lines(mut self, lines: usize) -> Self {
        self.number_of_lines = lines;
        self
    }

    pub fn with_window_type(mut self, window_type: WindowType) -> Self {
        self.window_type = window_type;
        self
    }

    pub fn with_min_frequency(mut self, frequency: f64) -> Self {
        self.min_frequency = frequency;
        self
    }

    pub fn with_max_frequency(mut self, frequency: f64) -> Self {
        self.max_frequency = frequency;
        self
    }

    /// Check line count and frequency bounds
    pub fn validate(&self) -> Result<()> {
        if self.number_of_lines < 2 {
            return Err(SpectrumError::InvalidConfiguration(format!(
                "number of lines must be at least 2, got {}",
                self.number_of_lines
            )));
        }
        if !self.min_frequency.is_finite() || !self.max_frequency.is_finite() {
            return Err(SpectrumError::InvalidConfiguration(
                "frequency bounds must be finite".to_string(),
            ));
        }
        if self.min_frequency < 0.0 || self.max_frequency <= self.min_frequency {
            return Err(SpectrumError::InvalidConfiguration(format!(
                "need 0 <= min < max frequency, got min {} Hz, max {} Hz",
                self.min_frequency, self.max_frequency
            )));
        }
        Ok(())
    }

    /// Line spacing implied by lines and max frequency
    pub fn requested_resolution(&self) -> f64 {
        self.max_frequency / (self.number_of_lines - 1) as f64
    }
}

/// Block layout for one waveform
#[derive(Debug, Clone, PartialEq)]
struct BlockPlan {
    fft_size: usize,
    starts: Vec<usize>,
}

impl BlockPlan {
    /// Choose FFT size from the requested resolution and spread blocks over
    /// the whole record. The first block starts at sample 0, the last ends
    /// at the final sample, and neighbours overlap when the length is not a
    /// multiple of the FFT size.
    fn new(config: &SpectrumConfig, waveform: &TimeWaveform) -> Result<Self> {
        let fft_size = (waveform.sample_rate / config.requested_resolution()).round() as usize;
        let len = waveform.len();

        // A 2-point Hanning window is all zeros and carries no signal
        let min_block = config.window_type.min_block_length();
        if fft_size < min_block {
            return Err(SpectrumError::InvalidConfiguration(format!(
                "{:?} window needs blocks of at least {} samples, {} lines up to {} Hz give {}",
                config.window_type, min_block, config.number_of_lines, config.max_frequency, fft_size
            )));
        }

        if len < fft_size {
            warn!(
                samples = len,
                required = fft_size,
                "waveform too short for requested resolution"
            );
            return Err(SpectrumError::InvalidInput(format!(
                "{} lines up to {} Hz at {} Hz sampling need {} samples, got {}",
                config.number_of_lines, config.max_frequency, waveform.sample_rate, fft_size, len
            )));
        }

        let blocks = len.div_ceil(fft_size);
        let starts = if blocks == 1 {
            vec![0]
        } else {
            let span = len - fft_size;
            (0..blocks).map(|i| i * span / (blocks - 1)).collect()
        };

        Ok(Self { fft_size, starts })
    }
}

/// Spectrum estimator holding the current configuration
#[derive(Debug, Clone, Default)]
pub struct SpectrumEstimator {
    config: SpectrumConfig,
}

impl SpectrumEstimator {
    pub fn new(config: SpectrumConfig) -> Self {
        Self { config }
    }

    pub fn set_number_of_lines(&mut self, lines: usize) {
        self.config.number_of_lines = lines;
    }

    pub fn set_window_type(&mut self, window_type: WindowType) {
        self.config.window_type = window_type;
    }

    pub fn set_min_frequency(&mut self, frequency: f64) {
        self.config.min_frequency = frequency;
    }

    pub fn set_max_frequency(&mut self, frequency: f64) {
        self.config.max_frequency = frequency;
    }

    /// Get current configuration
    pub fn config(&self) -> &SpectrumConfig {
        &self.config
    }

    /// Calculate the amplitude spectrum of a waveform
    pub fn calculate_spectrum(&self, waveform: &TimeWaveform) -> Result<SpectrumResult> {
        calculate_spectrum(self.config, waveform)
    }

    /// Calculate spectra for several waveforms in parallel with one config snapshot
    /// 
    /// Fails as a whole if any waveform fails.
    pub fn calculate_spectra(&self, waveforms: &[TimeWaveform]) -> Result<Vec<SpectrumResult>> {
        let config = self.config;
        waveforms
            .par_iter()
            .map(|waveform| calculate_spectrum(config, waveform))
            .collect()
    }
}

/// Calculate an amplitude spectrum with an explicit configuration
/// 
/// Lines are spaced `sample_rate / fft_size` Hz apart, where the FFT size is
/// the nearest integer to `sample_rate / requested_resolution`. The reported
/// max frequency follows that effective spacing. Magnitudes are averaged over
/// all blocks of the record.
pub fn calculate_spectrum(config: SpectrumConfig, waveform: &TimeWaveform) -> Result<SpectrumResult> {
    config.validate()?;
    waveform.validate()?;

    if config.max_frequency > waveform.nyquist() {
        return Err(SpectrumError::InvalidConfiguration(format!(
            "max frequency {} Hz exceeds Nyquist frequency {} Hz",
            config.max_frequency,
            waveform.nyquist()
        )));
    }

    let plan = BlockPlan::new(&config, waveform)?;
    let lines = config.number_of_lines;
    let mut engine = FftEngine::new(plan.fft_size)?;
    let resolution = engine.bin_spacing_hz(waveform.sample_rate);

    debug!(
        fft_size = plan.fft_size,
        blocks = plan.starts.len(),
        resolution,
        lines,
        "calculating spectrum"
    );

    let mut windows = WindowCache::new();
    let correction = amplitude_correction_factor(windows.coefficients(config.window_type, plan.fft_size)?);

    let mut block = vec![0.0; plan.fft_size];
    let mut averaged = vec![0.0; lines];

    for &start in &plan.starts {
        block.copy_from_slice(&waveform.data[start..start + plan.fft_size]);
        windows.apply_inplace(&mut block, config.window_type)?;

        let amplitude = engine.compute_amplitude(&block, correction)?;
        for (acc, &a) in averaged.iter_mut().zip(amplitude.iter().take(lines)) {
            *acc += a;
        }
    }

    let block_count = plan.starts.len() as f64;
    for acc in averaged.iter_mut() {
        *acc /= block_count;
    }

    let result = SpectrumResult::from_lines(averaged, resolution, waveform.quantity)?;
    if config.min_frequency > 0.0 {
        result.with_min_frequency(config.min_frequency)
    } else {
        Ok(result)
    }
}
