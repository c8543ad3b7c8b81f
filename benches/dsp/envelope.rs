//! Benchmarks for envelope rendering.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use juno_synth::dsp::{envelope, seconds_to_samples, EnvelopeShape};

use crate::{DURATIONS, SAMPLE_RATE};

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");

    for &duration in DURATIONS {
        let size = seconds_to_samples(duration, SAMPLE_RATE);

        for (name, shape) in [
            ("clamp", EnvelopeShape::Clamp),
            ("overwrite", EnvelopeShape::Overwrite),
        ] {
            group.bench_with_input(BenchmarkId::new(name, size), &duration, |b, &d| {
                b.iter(|| {
                    envelope::adsr(black_box(d), 0.1, 0.2, 0.6, 0.5, SAMPLE_RATE, shape)
                })
            });
        }
    }

    group.finish();
}
