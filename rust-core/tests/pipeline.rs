//! End-to-end: waveform → spectrum → velocity → band peaks → store → trend/speed

use std::f64::consts::PI;
use vibration_spectrum::{
    calculate_peak_in_band, get_peak_in_band_trend, integrate_spectrum, machine_speed_for_date,
    InMemorySpectrumStore, JsonDirectoryStore, Quantity, SpectrumConfig, SpectrumEstimator,
    SpectrumStore, SpeedEstimator, TimeWaveform, WindowType,
};

const SAMPLE_RATE: f64 = 2048.0;

/// Acceleration from a machine turning at `shaft_hz` with a 2× component
fn machine_waveform(shaft_hz: f64, amplitude: f64) -> TimeWaveform {
    let data = (0..8192)
        .map(|n| {
            let t = n as f64 / SAMPLE_RATE;
            amplitude * (2.0 * PI * shaft_hz * t).sin()
                + 0.25 * amplitude * (2.0 * PI * 2.0 * shaft_hz * t).sin()
        })
        .collect();
    TimeWaveform::new(data, SAMPLE_RATE, Quantity::Acceleration)
}

fn estimator() -> SpectrumEstimator {
    // 0.5 Hz lines up to 500 Hz → FFT size 4096, two blocks per record
    let mut estimator = SpectrumEstimator::new(SpectrumConfig::default());
    estimator.set_number_of_lines(1001);
    estimator.set_max_frequency(500.0);
    estimator.set_min_frequency(2.0);
    estimator.set_window_type(WindowType::Hanning);
    estimator
}

#[test]
fn velocity_band_peak_matches_integrated_amplitude() {
    let acc = estimator().calculate_spectrum(&machine_waveform(50.0, 9.81)).unwrap();
    let mut vel = integrate_spectrum(&acc).unwrap();
    assert_eq!(vel.quantity(), Quantity::Velocity);

    let peak = calculate_peak_in_band(&mut vel, 40.0, 60.0).unwrap();
    let expected = 9.81 / (2.0 * PI * 50.0);
    assert!((peak - expected).abs() < 0.01 * expected, "{} vs {}", peak, expected);
    assert_eq!(vel.band_peaks().len(), 1);
}

#[test]
fn stored_history_drives_trend_and_speed() {
    let store = InMemorySpectrumStore::new();
    let estimator = estimator();

    let history = [
        ("2024-04-01", 24.5, 1.0),
        ("2024-04-08", 24.5, 1.4),
        ("2024-04-15", 25.0, 2.1),
    ];
    for (date, shaft_hz, amplitude) in history {
        let spectrum = estimator.calculate_spectrum(&machine_waveform(shaft_hz, amplitude)).unwrap();
        store.store(date, &spectrum).unwrap();
    }

    let trend = get_peak_in_band_trend(&store, "2024-04-01", "2024-04-30", 20.0, 30.0).unwrap();
    let values: Vec<f64> = trend.values().copied().collect();
    assert_eq!(trend.len(), 3);
    assert!(values.windows(2).all(|w| w[0] < w[1]), "{:?}", values);
    assert!((values[2] - 2.1).abs() < 0.03);

    let rpm = machine_speed_for_date(&store, &SpeedEstimator::default(), "2024-04-15").unwrap();
    assert!((rpm - 1500.0).abs() < 2.0, "rpm = {}", rpm);
}

#[test]
fn json_store_round_trips_computed_spectra() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonDirectoryStore::open(dir.path()).unwrap();

    let mut spectrum = estimator().calculate_spectrum(&machine_waveform(30.0, 3.0)).unwrap();
    calculate_peak_in_band(&mut spectrum, 25.0, 35.0).unwrap();
    store.store("2024-04-20T10:15:00", &spectrum).unwrap();

    assert_eq!(store.retrieve("2024-04-20T10:15:00").unwrap(), spectrum);
}
