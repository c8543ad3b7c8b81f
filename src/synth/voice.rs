use crate::{
    config::{Normalization, VoiceParams},
    dsp::{amplify, envelope::EnvelopePhases, oscillator},
    error::{Result, SynthError},
    io::converter::{note_to_freq, MAX_NOTE},
};

/// One note with its parameters frozen at creation.
///
/// A voice knows how to render itself; it never changes after `new`. Where it
/// is in its lifecycle is tracked by the synthesizer, not here.
#[derive(Debug, Clone, PartialEq)]
pub struct Voice {
    note: u8,
    frequency: f32,
    sample_rate: u32,
    params: VoiceParams,
    phases: EnvelopePhases,
}

impl Voice {
    /// Validate `params` and build a voice for `note`.
    ///
    /// Every parameter error surfaces here, before any rendering work.
    pub fn new(note: u8, params: VoiceParams, sample_rate: u32) -> Result<Self> {
        if note > MAX_NOTE {
            return Err(SynthError::invalid("note", note, "must be within 0..=127"));
        }
        params.validate(sample_rate)?;

        let phases = EnvelopePhases::new(
            params.duration,
            params.attack,
            params.decay,
            params.release,
            sample_rate,
            params.envelope_shape,
        );

        Ok(Self {
            note,
            frequency: note_to_freq(note),
            sample_rate,
            params,
            phases,
        })
    }

    pub fn note(&self) -> u8 {
        self.note
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn params(&self) -> &VoiceParams {
        &self.params
    }

    pub fn phases(&self) -> &EnvelopePhases {
        &self.phases
    }

    /// Length of the rendered buffer in samples.
    pub fn len(&self) -> usize {
        self.phases.total
    }

    pub fn is_empty(&self) -> bool {
        self.phases.total == 0
    }

    /// The amplitude envelope this voice applies.
    pub fn envelope(&self) -> Vec<f32> {
        self.phases.render(self.params.sustain)
    }

    /// Render the finished, peak-normalized buffer.
    pub fn render(&self) -> Vec<f32> {
        self.render_with(Normalization::PerVoice)
    }

    /// Render with an explicit normalization mode.
    ///
    /// oscillators → envelope → low-pass → envelope applied → normalize.
    /// With `Normalization::Bus` the last step is skipped and the buffer keeps
    /// its natural level.
    pub fn render_with(&self, normalization: Normalization) -> Vec<f32> {
        let p = &self.params;

        let mut buffer = oscillator::raw_mix(
            self.frequency,
            p.duration,
            p.pulse_width,
            p.sub_level,
            self.sample_rate,
        );
        let envelope = self.envelope();

        let mut filter = p
            .filter_kind
            .build(p.cutoff_hz, self.sample_rate, p.filter_order, p.resonance);
        filter.process(&mut buffer);

        amplify::apply_gain(&mut buffer, &envelope);

        if normalization == Normalization::PerVoice {
            amplify::normalize(&mut buffer);
        }

        buffer
    }
}
