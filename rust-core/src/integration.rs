//! Frequency-domain integration and differentiation
//! 
//! One integration step divides each line by 2πf, one differentiation step
//! multiplies by it. The DC line has no finite integral and is set to zero
//! in both directions, so it is lost after a round trip.

use crate::error::{Result, SpectrumError};
use crate::spectrum::SpectrumResult;
use std::f64::consts::PI;
use tracing::debug;

/// Integrate a spectrum one step (Acceleration → Velocity → Displacement)
/// 
/// The result has an empty band-peak table since the old peaks belong to
/// the previous quantity.
pub fn integrate_spectrum(spectrum: &SpectrumResult) -> Result<SpectrumResult> {
    let quantity = spectrum.quantity().integrated().ok_or_else(|| {
        SpectrumError::InvalidOperation(format!(
            "cannot integrate a {:?} spectrum",
            spectrum.quantity()
        ))
    })?;

    debug!(from = ?spectrum.quantity(), to = ?quantity, "integrating spectrum");

    let magnitudes = spectrum
        .magnitudes()
        .iter()
        .enumerate()
        .map(|(k, &m)| {
            let omega = 2.0 * PI * spectrum.frequency_of(k);
            if k == 0 {
                0.0
            } else {
                m / omega
            }
        })
        .collect();

    Ok(spectrum.derive(magnitudes, quantity))
}

/// Differentiate a spectrum one step (Displacement → Velocity → Acceleration)
pub fn differentiate_spectrum(spectrum: &SpectrumResult) -> Result<SpectrumResult> {
    let quantity = spectrum.quantity().differentiated().ok_or_else(|| {
        SpectrumError::InvalidOperation(format!(
            "cannot differentiate a {:?} spectrum",
            spectrum.quantity()
        ))
    })?;

    debug!(from = ?spectrum.quantity(), to = ?quantity, "differentiating spectrum");

    let magnitudes = spectrum
        .magnitudes()
        .iter()
        .enumerate()
        .map(|(k, &m)| {
            if k == 0 {
                0.0
            } else {
                m * 2.0 * PI * spectrum.frequency_of(k)
            }
        })
        .collect();

    Ok(spectrum.derive(magnitudes, quantity))
}
