//! Spectrum results and their band-peak table

use crate::error::{Result, SpectrumError};
use crate::waveform::Quantity;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Inclusive range of line indices identifying a frequency band
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BandKey {
    pub start: usize,
    pub end: usize,
}

impl BandKey {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// Amplitude spectrum of one physical quantity
/// 
/// Lines are spaced `resolution` Hz apart starting at 0 Hz, so
/// `max_frequency == resolution * (line_count - 1)`. Lines below
/// `min_frequency` are kept for bookkeeping but skipped by peak searches.
/// Only the band-peak table changes after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SpectrumRecord", into = "SpectrumRecord")]
pub struct SpectrumResult {
    max_frequency: f64,
    resolution: f64,
    min_frequency: f64,
    quantity: Quantity,
    magnitudes: Vec<f64>,
    band_peaks: BTreeMap<BandKey, f64>,
}

impl SpectrumResult {
    /// Build a spectrum from amplitude lines spaced `resolution` Hz apart
    pub fn from_lines(magnitudes: Vec<f64>, resolution: f64, quantity: Quantity) -> Result<Self> {
        if magnitudes.len() < 2 {
            return Err(SpectrumError::InvalidInput(format!(
                "spectrum needs at least 2 lines, got {}",
                magnitudes.len()
            )));
        }
        if !resolution.is_finite() || resolution <= 0.0 {
            return Err(SpectrumError::InvalidInput(format!(
                "resolution must be positive, got {} Hz",
                resolution
            )));
        }
        if magnitudes.iter().any(|m| !m.is_finite() || *m < 0.0) {
            return Err(SpectrumError::InvalidInput(
                "spectrum lines must be finite and non-negative".to_string(),
            ));
        }

        let max_frequency = resolution * (magnitudes.len() - 1) as f64;
        Ok(Self {
            max_frequency,
            resolution,
            min_frequency: 0.0,
            quantity,
            magnitudes,
            band_peaks: BTreeMap::new(),
        })
    }

    /// Set the lower analysis frequency; lines below it are excluded from peak search
    pub fn with_min_frequency(mut self, min_frequency: f64) -> Result<Self> {
        if !min_frequency.is_finite() || min_frequency < 0.0 || min_frequency >= self.max_frequency {
            return Err(SpectrumError::InvalidConfiguration(format!(
                "minimum frequency {} Hz must lie in [0, {}) Hz",
                min_frequency, self.max_frequency
            )));
        }
        self.min_frequency = min_frequency;
        Ok(self)
    }

    /// Same grid and analysis floor, new lines and quantity, empty band table
    pub(crate) fn derive(&self, magnitudes: Vec<f64>, quantity: Quantity) -> Self {
        Self {
            max_frequency: self.max_frequency,
            resolution: self.resolution,
            min_frequency: self.min_frequency,
            quantity,
            magnitudes,
            band_peaks: BTreeMap::new(),
        }
    }

    pub fn max_frequency(&self) -> f64 {
        self.max_frequency
    }

    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    pub fn min_frequency(&self) -> f64 {
        self.min_frequency
    }

    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    /// Amplitude per line
    pub fn magnitudes(&self) -> &[f64] {
        &self.magnitudes
    }

    pub fn line_count(&self) -> usize {
        self.magnitudes.len()
    }

    /// Frequency in Hz of line `index`
    pub fn frequency_of(&self, index: usize) -> f64 {
        index as f64 * self.resolution
    }

    /// Nearest line to `frequency`, clamped to the spectrum
    pub fn index_of(&self, frequency: f64) -> usize {
        let index = (frequency / self.resolution).round();
        if index <= 0.0 {
            0
        } else {
            (index as usize).min(self.magnitudes.len() - 1)
        }
    }

    /// First line at or above the analysis floor
    pub fn first_analysis_index(&self) -> usize {
        // Tolerate rounding when min_frequency sits exactly on a line
        ((self.min_frequency / self.resolution) - 1e-9).ceil().max(0.0) as usize
    }

    /// Cached peak for a band, if one was recorded
    pub fn band_peak(&self, key: BandKey) -> Option<f64> {
        self.band_peaks.get(&key).copied()
    }

    /// All recorded band peaks, ordered by key
    pub fn band_peaks(&self) -> &BTreeMap<BandKey, f64> {
        &self.band_peaks
    }

    /// Insert or overwrite a band-peak entry
    pub fn record_band_peak(&mut self, key: BandKey, peak: f64) -> Result<()> {
        let last = self.magnitudes.len() - 1;
        if key.start > key.end || key.end > last {
            return Err(SpectrumError::InvalidInput(format!(
                "band key ({}, {}) outside line range [0, {}]",
                key.start, key.end, last
            )));
        }
        self.band_peaks.insert(key, peak);
        Ok(())
    }
}

/// Serialized layout: band keys flattened into a list since JSON maps need string keys
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SpectrumRecord {
    resolution: f64,
    min_frequency: f64,
    quantity: Quantity,
    magnitudes: Vec<f64>,
    band_peaks: Vec<BandPeakRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct BandPeakRecord {
    start: usize,
    end: usize,
    peak: f64,
}

impl From<SpectrumResult> for SpectrumRecord {
    fn from(result: SpectrumResult) -> Self {
        Self {
            resolution: result.resolution,
            min_frequency: result.min_frequency,
            quantity: result.quantity,
            band_peaks: result
                .band_peaks
                .iter()
                .map(|(key, &peak)| BandPeakRecord {
                    start: key.start,
                    end: key.end,
                    peak,
                })
                .collect(),
            magnitudes: result.magnitudes,
        }
    }
}

impl TryFrom<SpectrumRecord> for SpectrumResult {
    type Error = SpectrumError;

    fn try_from(record: SpectrumRecord) -> Result<Self> {
        let mut result = SpectrumResult::from_lines(record.magnitudes, record.resolution, record.quantity)?;
        if record.min_frequency > 0.0 {
            result = result.with_min_frequency(record.min_frequency)?;
        }
        for entry in record.band_peaks {
            result.record_band_peak(BandKey::new(entry.start, entry.end), entry.peak)?;
        }
        Ok(result)
    }
}
