//! Benchmarks for gain and normalization.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use juno_synth::dsp::{amplify, seconds_to_samples};

use crate::{DURATIONS, SAMPLE_RATE};

pub fn bench_amplify(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/amplify");

    for &duration in DURATIONS {
        let size = seconds_to_samples(duration, SAMPLE_RATE);
        let signal: Vec<f32> = (0..size)
            .map(|i| (i as f32 / size as f32) * 2.0 - 1.0)
            .collect();
        let envelope: Vec<f32> = (0..size).map(|i| i as f32 / size as f32).collect();
        let mut work = signal.clone();

        group.bench_with_input(BenchmarkId::new("apply_gain", size), &size, |b, _| {
            b.iter(|| {
                work.copy_from_slice(&signal);
                amplify::apply_gain(black_box(&mut work), black_box(&envelope))
            })
        });

        group.bench_with_input(BenchmarkId::new("normalize", size), &size, |b, _| {
            b.iter(|| {
                work.copy_from_slice(&signal);
                amplify::normalize(black_box(&mut work))
            })
        });
    }

    group.finish();
}
