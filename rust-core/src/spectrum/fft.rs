//! FFT engine using realfft for real-valued signals
//! 
//! Produces single-sided amplitude spectra of windowed blocks

use crate::error::{Result, SpectrumError};
use num_complex::Complex;
use realfft::{RealFftPlanner, RealToComplex};
use std::sync::Arc;

/// FFT engine for real-valued signals
pub struct FftEngine {
    /// FFT size (number of samples)
    fft_size: usize,
    
    /// Real FFT processor
    r2c: Arc<dyn RealToComplex<f64>>,
    
    /// Reusable input buffer
    input_buffer: Vec<f64>,
    
    /// Reusable output buffer (complex spectrum)
    output_buffer: Vec<Complex<f64>>,
}

impl FftEngine {
    /// Create new FFT engine
    /// 
    /// # Arguments
    /// * `fft_size` - FFT size (number of samples, any length ≥ 2)
    pub fn new(fft_size: usize) -> Result<Self> {
        if fft_size < 2 {
            return Err(SpectrumError::InvalidInput(format!(
                "FFT size must be at least 2, got {}",
                fft_size
            )));
        }

        let mut planner = RealFftPlanner::<f64>::new();
        let r2c = planner.plan_fft_forward(fft_size);
        
        let input_buffer = r2c.make_input_vec();
        let output_buffer = r2c.make_output_vec();
        
        Ok(Self {
            fft_size,
            r2c,
            input_buffer,
            output_buffer,
        })
    }
    
    /// Compute the single-sided amplitude spectrum of a windowed block
    /// 
    /// # Arguments
    /// * `windowed` - Block already multiplied by the window
    /// * `correction` - Window amplitude correction factor (N / Σw)
    /// 
    /// # Returns
    /// Peak amplitude per bin: a sinusoid of amplitude A centred on a bin
    /// reads A. DC and Nyquist have no mirrored half and are not doubled.
    pub fn compute_amplitude(&mut self, windowed: &[f64], correction: f64) -> Result<Vec<f64>> {
        if !correction.is_finite() || correction <= 0.0 {
            return Err(SpectrumError::InvalidInput(format!(
                "window correction must be finite and positive, got {}",
                correction
            )));
        }

        self.transform(windowed)?;

        let scale = correction / self.fft_size as f64;
        let last = self.output_buffer.len() - 1;
        let nyquist_bin = if self.fft_size % 2 == 0 { Some(last) } else { None };

        Ok(self
            .output_buffer
            .iter()
            .enumerate()
            .map(|(k, c)| {
                let single_sided = if k == 0 || Some(k) == nyquist_bin { 1.0 } else { 2.0 };
                single_sided * c.norm() * scale
            })
            .collect())
    }

    fn transform(&mut self, signal: &[f64]) -> Result<()> {
        if signal.len() != self.fft_size {
            return Err(SpectrumError::InvalidInput(format!(
                "FFT block must have {} samples, got {}",
                self.fft_size,
                signal.len()
            )));
        }

        self.input_buffer.copy_from_slice(signal);
        self.r2c
            .process(&mut self.input_buffer, &mut self.output_buffer)
            .map_err(|e| SpectrumError::InvalidInput(format!("FFT processing failed: {}", e)))
    }
    
    /// Bin spacing in Hz for the given sample rate
    pub fn bin_spacing_hz(&self, sample_rate: f64) -> f64 {
        sample_rate / self.fft_size as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;
    
    #[test]
    fn test_fft_dc_signal() {
        let mut fft = FftEngine::new(128).unwrap();
        
        let signal = vec![1.0; 128];
        let spectrum = fft.compute_amplitude(&signal, 1.0).unwrap();
        
        // DC is not doubled
        assert!((spectrum[0] - 1.0).abs() < 1e-12);
        
        // Other bins should be near zero
        assert!(spectrum[10] < 1e-12);
    }
    
    #[test]
    fn test_amplitude_scaling() {
        let n = 1024;
        let mut fft = FftEngine::new(n).unwrap();
        
        // Bin-centred sine (bin 100) with amplitude 3 plus DC offset 0.5
        let signal: Vec<f64> = (0..n)
            .map(|i| 0.5 + 3.0 * (2.0 * PI * 100.0 * i as f64 / n as f64).sin())
            .collect();
        
        let amplitude = fft.compute_amplitude(&signal, 1.0).unwrap();
        
        assert_eq!(amplitude.len(), 513);
        assert!((amplitude[0] - 0.5).abs() < 1e-9);
        assert!((amplitude[100] - 3.0).abs() < 1e-9);
        assert!(amplitude[200] < 1e-9);
    }
    
    #[test]
    fn test_block_length_mismatch() {
        let mut fft = FftEngine::new(64).unwrap();
        assert!(matches!(
            fft.compute_amplitude(&[0.0; 32], 1.0),
            Err(SpectrumError::InvalidInput(_))
        ));
        assert!(matches!(
            fft.compute_amplitude(&[0.0; 64], f64::INFINITY),
            Err(SpectrumError::InvalidInput(_))
        ));
        assert!(FftEngine::new(1).is_err());
    }
    
    #[test]
    fn test_bin_spacing() {
        let fft = FftEngine::new(1000).unwrap();
        assert!((fft.bin_spacing_hz(2000.0) - 2.0).abs() < 1e-12);
    }
}
