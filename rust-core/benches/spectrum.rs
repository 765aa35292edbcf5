use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::f64::consts::PI;
use vibration_spectrum::{
    integrate_spectrum, Quantity, SpectrumConfig, SpectrumEstimator, TimeWaveform, WindowType,
};

fn waveform(len: usize, sample_rate: f64) -> TimeWaveform {
    let data = (0..len)
        .map(|n| {
            let t = n as f64 / sample_rate;
            (2.0 * PI * 49.8 * t).sin() + 0.3 * (2.0 * PI * 1234.5 * t).sin()
        })
        .collect();
    TimeWaveform::new(data, sample_rate, Quantity::Acceleration)
}

fn bench_calculate_spectrum(c: &mut Criterion) {
    let signal = waveform(65536, 25600.0);

    for (name, lines) in [("1601_lines", 1601), ("6401_lines", 6401)] {
        let estimator = SpectrumEstimator::new(
            SpectrumConfig::default()
                .with_number_of_lines(lines)
                .with_max_frequency(10000.0)
                .with_window_type(WindowType::Hanning),
        );
        c.bench_function(&format!("calculate_spectrum_{}", name), |b| {
            b.iter(|| estimator.calculate_spectrum(black_box(&signal)).unwrap())
        });
    }
}

fn bench_integrate(c: &mut Criterion) {
    let estimator = SpectrumEstimator::new(
        SpectrumConfig::default()
            .with_number_of_lines(6401)
            .with_max_frequency(10000.0),
    );
    let spectrum = estimator.calculate_spectrum(&waveform(65536, 25600.0)).unwrap();

    c.bench_function("integrate_spectrum_6401_lines", |b| {
        b.iter(|| integrate_spectrum(black_box(&spectrum)).unwrap())
    });
}

criterion_group!(benches, bench_calculate_spectrum, bench_integrate);
criterion_main!(benches);
