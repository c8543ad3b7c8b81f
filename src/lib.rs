//! Polyphonic subtractive synthesizer that renders each note to a finished
//! buffer: sawtooth, pulse and sub oscillators through an ADSR envelope and a
//! resonant low-pass filter, peak-normalized and handed to an output sink.

pub mod config; // Voice and session parameters
pub mod dsp; // Buffer-level oscillators, envelopes, filters
pub mod error;
pub mod io; // Sinks, note conversion, audio buffers
pub mod synth; // Voice management and polyphony

pub use config::{NoteOffPolicy, Normalization, SynthConfig, VoiceParams};
pub use error::{Result, SynthError};
pub use io::{AudioBuffer, CollectSink, NullSink, OutputSink, VoiceId};
pub use synth::{NoteEvent, NoteOn, Synthesizer};

pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;
pub const DEFAULT_POLYPHONY: usize = 6;
