//! Machine speed estimation from spectral content
//! 
//! The running-speed line is the strongest local maximum in a shaft-frequency
//! search band. Lines of nearly the same strength are told apart by how much
//! harmonic content they carry, then the winner's refined frequency is
//! converted to RPM.

use crate::error::{Result, SpectrumError};
use crate::spectrum::SpectrumResult;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Speed estimator configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedConfig {
    /// Lowest shaft frequency considered (Hz)
    pub min_shaft_frequency: f64,

    /// Highest shaft frequency considered (Hz)
    pub max_shaft_frequency: f64,

    /// Order of the detected line relative to shaft speed (1 = 1×)
    pub order: f64,

    /// A candidate line must exceed this amplitude
    pub noise_floor: f64,

    /// Harmonics summed when scoring a candidate, the fundamental included
    pub harmonics: usize,

    /// Candidates weaker than this fraction of the strongest line never win
    pub dominance_ratio: f64,
}

impl Default for SpeedConfig {
    fn default() -> Self {
        Self {
            min_shaft_frequency: 1.0,
            max_shaft_frequency: 200.0,
            order: 1.0,
            noise_floor: 1e-3,
            harmonics: 3,
            dominance_ratio: 0.9,
        }
    }
}

impl SpeedConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.min_shaft_frequency >= 0.0 && self.max_shaft_frequency > self.min_shaft_frequency)
            || !self.max_shaft_frequency.is_finite()
        {
            return Err(SpectrumError::InvalidConfiguration(format!(
                "shaft search band [{}, {}] Hz is invalid",
                self.min_shaft_frequency, self.max_shaft_frequency
            )));
        }
        if !self.order.is_finite() || self.order <= 0.0 {
            return Err(SpectrumError::InvalidConfiguration(format!(
                "order must be positive, got {}",
                self.order
            )));
        }
        if !self.noise_floor.is_finite() || self.noise_floor < 0.0 {
            return Err(SpectrumError::InvalidConfiguration(format!(
                "noise floor must be non-negative, got {}",
                self.noise_floor
            )));
        }
        if !(self.dominance_ratio > 0.0 && self.dominance_ratio <= 1.0) {
            return Err(SpectrumError::InvalidConfiguration(format!(
                "dominance ratio must lie in (0, 1], got {}",
                self.dominance_ratio
            )));
        }
        if self.harmonics == 0 {
            return Err(SpectrumError::InvalidConfiguration(
                "at least one harmonic must be scored".to_string(),
            ));
        }
        Ok(())
    }
}

/// Winning running-speed line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedPeak {
    /// Interpolated frequency of the detected line (Hz)
    pub frequency: f64,

    /// Amplitude of the detected line
    pub magnitude: f64,

    /// Amplitude of the line plus its harmonics that stand above the noise floor
    pub score: f64,
}

/// Order-based speed estimator
#[derive(Debug, Clone, Default)]
pub struct SpeedEstimator {
    config: SpeedConfig,
}

impl SpeedEstimator {
    pub fn new(config: SpeedConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SpeedConfig {
        &self.config
    }

    /// Estimate shaft speed in RPM from the spectra recorded on `date`
    /// 
    /// Fails with `InsufficientData` when no line in the search band rises
    /// above the noise floor in any of the spectra.
    pub fn calculate_machine_speed(&self, date: &str, spectral_data: &[SpectrumResult]) -> Result<f64> {
        let peak = self.dominant_peak(date, spectral_data)?;
        let rpm = 60.0 * peak.frequency / self.config.order;

        debug!(
            date,
            frequency = peak.frequency,
            magnitude = peak.magnitude,
            rpm,
            "machine speed estimated"
        );

        Ok(rpm)
    }

    /// Running-speed line across all spectra for a date
    /// 
    /// Only candidates within `dominance_ratio` of the strongest line compete;
    /// among those the highest harmonic score wins.
    pub fn dominant_peak(&self, date: &str, spectral_data: &[SpectrumResult]) -> Result<SpeedPeak> {
        self.config.validate()?;

        let candidates: Vec<SpeedPeak> = spectral_data
            .iter()
            .flat_map(|spectrum| self.candidates(spectrum))
            .collect();
        let strongest = candidates.iter().map(|c| c.magnitude).fold(0.0, f64::max);
        let threshold = self.config.dominance_ratio * strongest;

        let best = candidates
            .into_iter()
            .filter(|c| c.magnitude >= threshold)
            .fold(None::<SpeedPeak>, |best, candidate| match best {
                Some(b) if b.score >= candidate.score => Some(b),
                _ => Some(candidate),
            });

        best.ok_or_else(|| {
            warn!(date, spectra = spectral_data.len(), "no speed line above noise floor");
            SpectrumError::InsufficientData(format!(
                "no line above noise floor {} in [{}, {}] Hz for {} ({} spectra)",
                self.config.noise_floor,
                self.config.min_shaft_frequency,
                self.config.max_shaft_frequency,
                date,
                spectral_data.len()
            ))
        })
    }

    /// Local maxima above the noise floor inside the search band
    fn candidates(&self, spectrum: &SpectrumResult) -> Vec<SpeedPeak> {
        let mags = spectrum.magnitudes();
        let last = mags.len() - 1;

        if self.config.min_shaft_frequency > spectrum.max_frequency() {
            return Vec::new();
        }

        let first = spectrum
            .index_of(self.config.min_shaft_frequency)
            .max(spectrum.first_analysis_index())
            .max(1);
        let end = spectrum.index_of(self.config.max_shaft_frequency).min(last);

        (first..=end)
            .filter(|&k| self.is_peak(mags, k))
            .map(|k| SpeedPeak {
                frequency: interpolate_peak(mags, k) * spectrum.resolution(),
                magnitude: mags[k],
                score: self.harmonic_score(spectrum, k),
            })
            .collect()
    }

    fn is_peak(&self, mags: &[f64], k: usize) -> bool {
        let m = mags[k];
        m > self.config.noise_floor
            && k > 0
            && m >= mags[k - 1]
            && (k + 1 == mags.len() || m >= mags[k + 1])
    }

    /// Fundamental plus each higher harmonic that is itself a peak above the floor
    /// 
    /// A harmonic may land one line either side of `h·f` after rounding.
    fn harmonic_score(&self, spectrum: &SpectrumResult, line: usize) -> f64 {
        let mags = spectrum.magnitudes();
        let fundamental = spectrum.frequency_of(line);

        let overtones: f64 = (2..=self.config.harmonics)
            .map(|h| fundamental * h as f64)
            .take_while(|&f| f <= spectrum.max_frequency())
            .filter_map(|f| {
                let centre = spectrum.index_of(f);
                let lo = centre.saturating_sub(1);
                let hi = (centre + 1).min(mags.len() - 1);
                (lo..=hi)
                    .filter(|&k| self.is_peak(mags, k))
                    .map(|k| mags[k])
                    .reduce(f64::max)
            })
            .sum();

        mags[line] + overtones
    }
}

/// Three-point parabolic interpolation of a peak line
/// 
/// ν = k + ½(α − γ)/(α − 2β + γ), limited to half a line either side.
fn interpolate_peak(mags: &[f64], k: usize) -> f64 {
    if k == 0 || k + 1 >= mags.len() {
        return k as f64;
    }

    let (alpha, beta, gamma) = (mags[k - 1], mags[k], mags[k + 1]);
    let denom = alpha - 2.0 * beta + gamma;
    if denom.abs() < f64::EPSILON {
        return k as f64;
    }

    k as f64 + (0.5 * (alpha - gamma) / denom).clamp(-0.5, 0.5)
}
