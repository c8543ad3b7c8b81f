//! Benchmarks for waveform generation.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use juno_synth::dsp::{oscillator, seconds_to_samples};

use crate::{DURATIONS, SAMPLE_RATE};

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");
    let freq = 220.0;

    for &duration in DURATIONS {
        let size = seconds_to_samples(duration, SAMPLE_RATE);

        group.bench_with_input(BenchmarkId::new("sawtooth", size), &duration, |b, &d| {
            b.iter(|| oscillator::sawtooth(black_box(freq), black_box(d), SAMPLE_RATE))
        });

        group.bench_with_input(BenchmarkId::new("pulse", size), &duration, |b, &d| {
            b.iter(|| oscillator::pulse(black_box(freq), black_box(d), 0.5, SAMPLE_RATE))
        });

        group.bench_with_input(BenchmarkId::new("raw_mix", size), &duration, |b, &d| {
            b.iter(|| oscillator::raw_mix(black_box(freq), black_box(d), 0.5, 0.5, SAMPLE_RATE))
        });
    }

    group.finish();
}
