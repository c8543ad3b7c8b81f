//! Session and per-voice configuration.
//!
//! Every value here used to be a hardcoded constant of the instrument. They
//! are now plain data with `Default` impls matching those constants, `with_*`
//! builders for overriding them, and a `validate` step that runs before any
//! voice is rendered.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    dsp::{envelope::EnvelopeShape, filter::FilterKind},
    error::{Result, SynthError},
    DEFAULT_POLYPHONY, DEFAULT_SAMPLE_RATE,
};

/// Where peak normalization happens.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Normalization {
    /// Every voice is scaled to peak 1.0 before it reaches the sink.
    /// Simultaneous quiet and loud voices end up equally loud.
    #[default]
    PerVoice,
    /// Voices keep their natural level; the summed bus is normalized in
    /// `Synthesizer::mixdown`.
    Bus,
}

/// What a note-off does to the voices it matches.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NoteOffPolicy {
    /// Drop the voice from the active set; submitted playback runs to its end.
    #[default]
    Detach,
    /// Drop the voice from the active set and stop its playback in the sink.
    Cut,
    /// Move the voice into its release stage and fade it out over the release
    /// time. It stays in the active set until the fade has elapsed.
    Release,
}

/// Parameters fixed at voice creation.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoiceParams {
    /// Length of every rendered voice in seconds.
    pub duration: f32,
    pub attack: f32,
    pub decay: f32,
    /// Sustain level (0.0 - 1.0).
    pub sustain: f32,
    pub release: f32,
    /// Fraction of each pulse period spent low (0.0 - 1.0).
    pub pulse_width: f32,
    /// Gain of the square one octave below the note (0.0 - 1.0).
    pub sub_level: f32,
    pub cutoff_hz: f32,
    /// 0.0 is a flat passband, values towards 1.0 add a peak at the cutoff.
    pub resonance: f32,
    /// Butterworth order, even, 2 to 8.
    pub filter_order: usize,
    pub filter_kind: FilterKind,
    pub envelope_shape: EnvelopeShape,
}

impl Default for VoiceParams {
    fn default() -> Self {
        Self {
            duration: 1.0,
            attack: 0.1,
            decay: 0.2,
            sustain: 0.6,
            release: 0.5,
            pulse_width: 0.5,
            sub_level: 0.5,
            cutoff_hz: 2000.0,
            resonance: 0.0,
            filter_order: 4,
            filter_kind: FilterKind::Butterworth,
            envelope_shape: EnvelopeShape::Clamp,
        }
    }
}

impl VoiceParams {
    pub fn with_duration(mut self, seconds: f32) -> Self {
        self.duration = seconds;
        self
    }

    pub fn with_adsr(mut self, attack: f32, decay: f32, sustain: f32, release: f32) -> Self {
        self.attack = attack;
        self.decay = decay;
        self.sustain = sustain;
        self.release = release;
        self
    }

    pub fn with_pulse_width(mut self, width: f32) -> Self {
        self.pulse_width = width;
        self
    }

    pub fn with_sub_level(mut self, level: f32) -> Self {
        self.sub_level = level;
        self
    }

    pub fn with_cutoff(mut self, cutoff_hz: f32) -> Self {
        self.cutoff_hz = cutoff_hz;
        self
    }

    pub fn with_resonance(mut self, resonance: f32) -> Self {
        self.resonance = resonance;
        self
    }

    pub fn with_filter_order(mut self, order: usize) -> Self {
        self.filter_order = order;
        self
    }

    pub fn with_filter_kind(mut self, kind: FilterKind) -> Self {
        self.filter_kind = kind;
        self
    }

    pub fn with_envelope_shape(mut self, shape: EnvelopeShape) -> Self {
        self.envelope_shape = shape;
        self
    }

    /// Check every parameter against `sample_rate`.
    pub fn validate(&self, sample_rate: u32) -> Result<()> {
        if sample_rate == 0 {
            return Err(SynthError::invalid("sample_rate", 0.0, "must be positive"));
        }
        if !self.duration.is_finite() || self.duration <= 0.0 {
            return Err(SynthError::invalid(
                "duration",
                self.duration,
                "must be a positive number of seconds",
            ));
        }

        for (name, value) in [
            ("attack", self.attack),
            ("decay", self.decay),
            ("release", self.release),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(SynthError::invalid(
                    name,
                    value,
                    "must be a non-negative number of seconds",
                ));
            }
        }

        for (name, value) in [
            ("sustain", self.sustain),
            ("pulse_width", self.pulse_width),
            ("sub_level", self.sub_level),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(SynthError::invalid(name, value, "must be within 0.0..=1.0"));
            }
        }

        let nyquist = sample_rate as f32 * 0.5;
        if !self.cutoff_hz.is_finite() || self.cutoff_hz <= 0.0 {
            return Err(SynthError::invalid("cutoff_hz", self.cutoff_hz, "must be positive"));
        }
        if self.cutoff_hz >= nyquist {
            return Err(SynthError::invalid(
                "cutoff_hz",
                self.cutoff_hz,
                "must be below the Nyquist frequency",
            ));
        }

        if !(0.0..1.0).contains(&self.resonance) {
            return Err(SynthError::invalid(
                "resonance",
                self.resonance,
                "must be within 0.0..1.0",
            ));
        }

        if self.filter_order % 2 != 0 || !(2..=8).contains(&self.filter_order) {
            return Err(SynthError::invalid(
                "filter_order",
                self.filter_order as f64,
                "must be an even order between 2 and 8",
            ));
        }

        Ok(())
    }
}

/// Configuration of a `Synthesizer` session.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynthConfig {
    pub sample_rate: u32,
    /// Maximum number of simultaneously sounding voices.
    pub polyphony: usize,
    pub normalization: Normalization,
    pub note_off: NoteOffPolicy,
    pub voice: VoiceParams,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            polyphony: DEFAULT_POLYPHONY,
            normalization: Normalization::PerVoice,
            note_off: NoteOffPolicy::Detach,
            voice: VoiceParams::default(),
        }
    }
}

impl SynthConfig {
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn with_polyphony(mut self, voices: usize) -> Self {
        self.polyphony = voices;
        self
    }

    pub fn with_normalization(mut self, normalization: Normalization) -> Self {
        self.normalization = normalization;
        self
    }

    pub fn with_note_off(mut self, policy: NoteOffPolicy) -> Self {
        self.note_off = policy;
        self
    }

    pub fn with_voice(mut self, voice: VoiceParams) -> Self {
        self.voice = voice;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.polyphony == 0 {
            return Err(SynthError::invalid("polyphony", 0.0, "must allow at least one voice"));
        }
        self.voice.validate(self.sample_rate)
    }
}
