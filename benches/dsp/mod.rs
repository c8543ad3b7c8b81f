//! Benchmarks for buffer-level DSP primitives.

mod amplify;
mod envelope;
mod filter;
mod oscillator;

pub use amplify::bench_amplify;
pub use envelope::bench_envelope;
pub use filter::bench_filter;
pub use oscillator::bench_oscillator;
