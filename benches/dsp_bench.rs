//! Benchmarks for voice rendering and session operations.
//!
//! Run with: cargo bench
//!
//! A note-on renders its whole buffer before returning, so these numbers are
//! the latency a player hears between pressing a key and the note sounding.
//!
//! Benchmark groups:
//!   - dsp/*        Buffer primitives (oscillators, envelope, filters, gain)
//!   - scenarios/*  Full voices and a busy session

use criterion::{criterion_group, criterion_main};

mod dsp;
mod scenarios;

pub const SAMPLE_RATE: u32 = 44_100;

/// Rendered note lengths in seconds.
pub const DURATIONS: &[f32] = &[0.1, 0.5, 1.0];

criterion_group!(
    benches,
    dsp::bench_amplify,
    dsp::bench_oscillator,
    dsp::bench_filter,
    dsp::bench_envelope,
    scenarios::bench_voices,
    scenarios::bench_session,
);
criterion_main!(benches);
