#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::seconds_to_samples;

/*
ADSR Envelope Generator
=======================

A voice has a fixed duration, so its envelope is rendered up front as one
gain buffer the same length as the waveform.

Vocabulary
----------

  total       Samples in the whole voice: round(duration * sample_rate).

  attack      Samples spent ramping 0 → 1, starting at sample 0.

  decay       Samples spent ramping 1 → sustain, right after attack.

  sustain     A LEVEL, not a time. Held over whatever interior remains.

  release     Samples spent ramping sustain → 0, at the very END of the
              buffer. The last sample of a release is always exactly 0.


The Shape
---------

  Level
    1.0 ┐    ╱╲
        │   ╱  ╲_________
    S   │  ╱             ╲
        │ ╱               ╲
    0.0 └╱─────────────────╲──→ sample
        0   a    a+d   total-r  total

Ramps include both endpoints: an n-sample ramp from x to y takes the values
x + (y - x) * i / (n - 1). A one-sample ramp holds its start value.


When The Phases Don't Fit
-------------------------

If a + d + r > total, the phases collide. Two policies:

  Clamp      (default) Scale a, d and r down proportionally (flooring each)
             until they fit. Phases never overlap; sustain may vanish.

  Overwrite  Write the phases in order attack → decay → sustain → release
             at their full computed lengths, truncated to the buffer. Later
             writes win, so release stamps over the tail of decay (or even
             attack). This reproduces the historical behavior bit-for-bit.

For the default patch (0.1 + 0.2 + 0.5 s of a 1 s voice) both produce the
same buffer.
*/

/// How colliding envelope phases are resolved.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnvelopeShape {
    #[default]
    Clamp,
    Overwrite,
}

/// The stage an envelope is in at a given sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeStage {
    Attack,
    Decay,
    Sustain,
    Release,
    /// Past the end of the buffer.
    Done,
}

/// Phase lengths of a rendered envelope, in samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvelopePhases {
    pub total: usize,
    pub attack: usize,
    pub decay: usize,
    pub release: usize,
}

impl EnvelopePhases {
    pub fn new(
        duration: f32,
        attack: f32,
        decay: f32,
        release: f32,
        sample_rate: u32,
        shape: EnvelopeShape,
    ) -> Self {
        let total = seconds_to_samples(duration, sample_rate);
        let mut attack = seconds_to_samples(attack, sample_rate);
        let mut decay = seconds_to_samples(decay, sample_rate);
        let mut release = seconds_to_samples(release, sample_rate);

        // Sample counts saturate for absurd times, so sum and scale wide.
        let requested = attack as u128 + decay as u128 + release as u128;
        if shape == EnvelopeShape::Clamp && requested > total as u128 {
            let scale = |phase: usize| (phase as u128 * total as u128 / requested) as usize;
            let wanted_release = release > 0;
            attack = scale(attack);
            decay = scale(decay);
            release = scale(release);

            // Flooring can starve a short release; it needs two samples to
            // ramp down to silence.
            if wanted_release && release < 2 {
                let mut missing = 2usize.min(total).saturating_sub(release);

                let slack = total - (attack + decay + release);
                let taken = missing.min(slack);
                release += taken;
                missing -= taken;

                for len in [&mut attack, &mut decay] {
                    let taken = missing.min(*len);
                    *len -= taken;
                    release += taken;
                    missing -= taken;
                }
            }
        }

        Self {
            total,
            attack,
            decay,
            release,
        }
    }

    /// First sample after the attack ramp.
    pub fn attack_end(&self) -> usize {
        self.attack.min(self.total)
    }

    /// First sample after the decay ramp.
    pub fn decay_end(&self) -> usize {
        self.attack.saturating_add(self.decay).min(self.total)
    }

    /// First sample of the release ramp.
    pub fn release_start(&self) -> usize {
        self.total.saturating_sub(self.release)
    }

    /// Which stage the envelope is in at `index`.
    ///
    /// Release is checked first because it is written last.
    pub fn stage_at(&self, index: usize) -> EnvelopeStage {
        if index >= self.total {
            EnvelopeStage::Done
        } else if self.release > 0 && index >= self.release_start() {
            EnvelopeStage::Release
        } else if index < self.attack_end() {
            EnvelopeStage::Attack
        } else if index < self.decay_end() {
            EnvelopeStage::Decay
        } else {
            EnvelopeStage::Sustain
        }
    }

    /// Render the gain buffer for these phases.
    pub fn render(&self, sustain: f32) -> Vec<f32> {
        let total = self.total;
        let mut envelope = vec![0.0f32; total];

        for i in 0..self.attack.min(total) {
            envelope[i] = ramp(0.0, 1.0, self.attack, i);
        }

        for i in 0..self.decay {
            let index = self.attack.saturating_add(i);
            if index >= total {
                break;
            }
            envelope[index] = ramp(1.0, sustain, self.decay, i);
        }

        let sustain_start = self.decay_end();
        let sustain_end = self.release_start().max(sustain_start);
        envelope[sustain_start..sustain_end].fill(sustain);

        // A release longer than the buffer only keeps its tail.
        let skipped = self.release.saturating_sub(total);
        for i in skipped..self.release {
            envelope[total + i - self.release] = ramp(sustain, 0.0, self.release, i);
        }
        if self.release > 0 {
            if let Some(last) = envelope.last_mut() {
                *last = 0.0;
            }
        }

        envelope
    }
}

#[inline]
fn ramp(start: f32, end: f32, len: usize, i: usize) -> f32 {
    if len <= 1 {
        start
    } else {
        start + (end - start) * (i as f32 / (len - 1) as f32)
    }
}

/// Render a full ADSR gain buffer of `duration` seconds.
pub fn adsr(
    duration: f32,
    attack: f32,
    decay: f32,
    sustain: f32,
    release: f32,
    sample_rate: u32,
    shape: EnvelopeShape,
) -> Vec<f32> {
    EnvelopePhases::new(duration, attack, decay, release, sample_rate, shape).render(sustain)
}
