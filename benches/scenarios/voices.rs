//! Benchmarks for rendering a complete voice, as a note-on does.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use juno_synth::{
    dsp::{seconds_to_samples, FilterKind},
    synth::Voice,
    Normalization, VoiceParams,
};

use crate::{DURATIONS, SAMPLE_RATE};

pub fn bench_voices(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/voices");

    for &duration in DURATIONS {
        let size = seconds_to_samples(duration, SAMPLE_RATE);
        let params = VoiceParams::default().with_duration(duration);

        let default_voice = Voice::new(57, params, SAMPLE_RATE).expect("valid voice");
        group.bench_with_input(BenchmarkId::new("default", size), &size, |b, _| {
            b.iter(|| black_box(&default_voice).render())
        });

        group.bench_with_input(BenchmarkId::new("bus", size), &size, |b, _| {
            b.iter(|| black_box(&default_voice).render_with(Normalization::Bus))
        });

        let steep = params.with_filter_order(8).with_resonance(0.7);
        let steep_voice = Voice::new(57, steep, SAMPLE_RATE).expect("valid voice");
        group.bench_with_input(BenchmarkId::new("order8_resonant", size), &size, |b, _| {
            b.iter(|| black_box(&steep_voice).render())
        });

        let svf = params.with_filter_kind(FilterKind::StateVariable);
        let svf_voice = Voice::new(57, svf, SAMPLE_RATE).expect("valid voice");
        group.bench_with_input(BenchmarkId::new("state_variable", size), &size, |b, _| {
            b.iter(|| black_box(&svf_voice).render())
        });
    }

    group.finish();
}
