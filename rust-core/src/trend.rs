//! Date-driven glue over a spectrum store
//! 
//! Trends re-run band-peak extraction on stored spectra; nothing is written
//! back to the store.

use crate::bands::peak_in_band;
use crate::error::Result;
use crate::speed::SpeedEstimator;
use crate::storage::SpectrumStore;
use std::collections::BTreeMap;
use tracing::debug;

/// Peak in a fixed band for every stored spectrum between two dates
/// 
/// Dates are inclusive store keys. Dates without data are absent from the
/// result. A band that is out of range for any stored spectrum fails the
/// whole call.
pub fn get_peak_in_band_trend(
    store: &dyn SpectrumStore,
    start_date: &str,
    end_date: &str,
    start_freq: f64,
    end_freq: f64,
) -> Result<BTreeMap<String, f64>> {
    let mut trend = BTreeMap::new();

    for date in store.timestamps_between(start_date, end_date)? {
        let spectrum = store.retrieve(&date)?;
        let peak = peak_in_band(&spectrum, start_freq, end_freq)?;
        trend.insert(date, peak.magnitude);
    }

    debug!(
        backend = store.backend_name(),
        start_date,
        end_date,
        points = trend.len(),
        "peak-in-band trend"
    );

    Ok(trend)
}

/// Estimate machine speed from the spectrum stored at `date`
pub fn machine_speed_for_date(
    store: &dyn SpectrumStore,
    estimator: &SpeedEstimator,
    date: &str,
) -> Result<f64> {
    let spectrum = store.retrieve(date)?;
    estimator.calculate_machine_speed(date, std::slice::from_ref(&spectrum))
}
