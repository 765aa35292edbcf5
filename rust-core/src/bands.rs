//! Band-limited peak extraction
//! 
//! Frequencies map to lines by rounding to the nearest line and clamping to
//! the spectrum. Lines below the spectrum's analysis floor never win.

use crate::error::{Result, SpectrumError};
use crate::spectrum::{BandKey, SpectrumResult};
use tracing::trace;

/// Largest line inside a band
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandPeak {
    /// Line range searched
    pub key: BandKey,

    /// Line holding the peak, `None` when the band lies below the analysis floor
    pub line: Option<usize>,

    /// Peak amplitude (0.0 when no line qualified)
    pub magnitude: f64,
}

/// Map a closed frequency interval to a line range
/// 
/// Fails with `OutOfRange` when the bounds are reversed, not finite, or the
/// band misses [0, max_frequency] entirely.
pub fn band_key(spectrum: &SpectrumResult, start_freq: f64, end_freq: f64) -> Result<BandKey> {
    let max = spectrum.max_frequency();
    let out_of_range = || SpectrumError::OutOfRange {
        start: start_freq,
        end: end_freq,
        max,
    };

    if !start_freq.is_finite() || !end_freq.is_finite() || start_freq > end_freq {
        return Err(out_of_range());
    }
    if end_freq < 0.0 || start_freq > max {
        return Err(out_of_range());
    }

    Ok(BandKey::new(spectrum.index_of(start_freq), spectrum.index_of(end_freq)))
}

/// Find the peak in a band without touching the band-peak table
pub fn peak_in_band(spectrum: &SpectrumResult, start_freq: f64, end_freq: f64) -> Result<BandPeak> {
    let key = band_key(spectrum, start_freq, end_freq)?;
    let first = key.start.max(spectrum.first_analysis_index());

    let mut best: Option<(usize, f64)> = None;
    if first <= key.end {
        for (line, &m) in spectrum.magnitudes()[first..=key.end].iter().enumerate() {
            if best.map_or(true, |(_, b)| m > b) {
                best = Some((first + line, m));
            }
        }
    }

    Ok(BandPeak {
        key,
        line: best.map(|(line, _)| line),
        magnitude: best.map_or(0.0, |(_, m)| m),
    })
}

/// Find the peak in a band and record it in the spectrum's band-peak table
/// 
/// Repeated calls with the same bounds overwrite the entry with the same value.
pub fn calculate_peak_in_band(
    spectrum: &mut SpectrumResult,
    start_freq: f64,
    end_freq: f64,
) -> Result<f64> {
    let peak = peak_in_band(spectrum, start_freq, end_freq)?;
    spectrum.record_band_peak(peak.key, peak.magnitude)?;

    trace!(
        start = peak.key.start,
        end = peak.key.end,
        magnitude = peak.magnitude,
        "band peak"
    );

    Ok(peak.magnitude)
}
