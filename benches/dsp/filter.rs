//! Benchmarks for the low-pass filters.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use juno_synth::dsp::{oscillator, seconds_to_samples, FilterKind};

use crate::{DURATIONS, SAMPLE_RATE};

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");

    for &duration in DURATIONS {
        let size = seconds_to_samples(duration, SAMPLE_RATE);
        let input = oscillator::sawtooth(110.0, duration, SAMPLE_RATE);
        let mut buffer = input.clone();

        for order in [2usize, 4, 8] {
            let mut filter = FilterKind::Butterworth.build(2000.0, SAMPLE_RATE, order, 0.0);
            group.bench_with_input(
                BenchmarkId::new(format!("butterworth_{order}"), size),
                &size,
                |b, _| {
                    b.iter(|| {
                        buffer.copy_from_slice(&input);
                        filter.reset();
                        filter.process(black_box(&mut buffer));
                    })
                },
            );
        }

        let mut svf = FilterKind::StateVariable.build(2000.0, SAMPLE_RATE, 2, 0.5);
        group.bench_with_input(BenchmarkId::new("state_variable", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                svf.reset();
                svf.process(black_box(&mut buffer));
            })
        });
    }

    group.finish();
}
