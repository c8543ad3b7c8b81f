//! Buffer-oriented DSP primitives used to render a voice.
//!
//! Everything in here works on whole buffers: a voice is rendered once, in
//! full, when its note starts. The functions are deterministic so rendering
//! the same parameters twice yields identical audio.

/// Gain, normalization and summing helpers.
pub mod amplify;
/// Attack/decay/sustain/release envelope generator.
pub mod envelope;
/// Resonant low-pass filters.
pub mod filter;
/// Sawtooth, pulse and sub-oscillator waveforms.
pub mod oscillator;

pub use envelope::{EnvelopePhases, EnvelopeShape};
pub use filter::{FilterKind, LowPass};

/// Convert a duration to a whole number of samples (rounded to nearest).
#[inline]
pub fn seconds_to_samples(seconds: f32, sample_rate: u32) -> usize {
    (seconds.max(0.0) as f64 * sample_rate as f64).round() as usize
}
