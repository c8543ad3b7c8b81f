use std::f64::consts::PI;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Low-Pass Filters
================

A voice's raw waveform is filtered once, front to back, starting from silent
filter state. Nothing streams between buffers, so every call to `process` on
a fresh filter is a pure function of its input.

| kind           | order          | poles         | resonance                     |
| -------------- | -------------- | ------------- | ----------------------------- |
| Butterworth    | 2, 4, 6 or 8   | order         | lowers damping of one section |
| StateVariable  | always 2       | 2             | lowers damping of the SVF     |

Butterworth as cascaded biquads
-------------------------------

An order-N Butterworth low-pass is built from N/2 second-order sections.
Bilinear transform with pre-warping, following the classic cascade design:

    a   = tan(π · cutoff / sample_rate)      (= tan(π/2 · normalized cutoff))
    r_i = sin(π · (2i + 1) / (2N))           i = 0 .. N/2
    s   = a² + 2·a·r_i + 1

    gain = a² / s
    d1   = 2 · (1 - a²) / s
    d2   = -(a² - 2·a·r_i + 1) / s

    w0 = d1·w1 + d2·w2 + x
    y  = gain · (w0 + 2·w1 + w2)

Each section's DC gain is exactly 1, whatever r_i is. At the cutoff the
sections multiply to 1/√2 (-3 dB).

Resonance
---------

2·r_i is the damping of section i. Section 0 has the smallest damping (the
highest Q) and sets the shape of the knee. Resonance scales it down:

    r_0' = r_0 · (1 - resonance)

resonance = 0 is the textbook Butterworth. Approaching 1 the poles move
towards the unit circle and a peak grows at the cutoff; the filter stays
stable for any resonance below 1.
*/

/// Which low-pass design a voice uses.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterKind {
    #[default]
    Butterworth,
    StateVariable,
}

impl FilterKind {
    /// Build a filter of this kind.
    ///
    /// `order` only applies to Butterworth designs.
    pub fn build(
        self,
        cutoff_hz: f32,
        sample_rate: u32,
        order: usize,
        resonance: f32,
    ) -> Box<dyn LowPass> {
        match self {
            FilterKind::Butterworth => {
                Box::new(Butterworth::new(cutoff_hz, sample_rate, order, resonance))
            }
            FilterKind::StateVariable => {
                Box::new(StateVariable::new(cutoff_hz, sample_rate, resonance))
            }
        }
    }
}

/// A resonant low-pass filter run over whole buffers.
pub trait LowPass: Send {
    /// Filter `buffer` in place, continuing from the current state.
    fn process(&mut self, buffer: &mut [f32]);

    /// Clear the filter memory.
    fn reset(&mut self);

    fn cutoff_hz(&self) -> f32;

    fn resonance(&self) -> f32;
}

#[derive(Debug, Clone, Copy, Default)]
struct Section {
    gain: f64,
    d1: f64,
    d2: f64,
    w1: f64,
    w2: f64,
}

impl Section {
    fn design(a: f64, r: f64) -> Self {
        let a2 = a * a;
        let s = a2 + 2.0 * a * r + 1.0;
        Self {
            gain: a2 / s,
            d1: 2.0 * (1.0 - a2) / s,
            d2: -(a2 - 2.0 * a * r + 1.0) / s,
            w1: 0.0,
            w2: 0.0,
        }
    }

    #[inline]
    fn run(&mut self, x: f64) -> f64 {
        let w0 = self.d1 * self.w1 + self.d2 * self.w2 + x;
        let y = self.gain * (w0 + 2.0 * self.w1 + self.w2);
        self.w2 = self.w1;
        self.w1 = w0;
        y
    }
}

/// Butterworth low-pass as a cascade of biquad sections.
pub struct Butterworth {
    sections: Vec<Section>,
    cutoff_hz: f32,
    resonance: f32,
}

impl Butterworth {
    /// `order` is rounded down to an even number of at least 2.
    pub fn new(cutoff_hz: f32, sample_rate: u32, order: usize, resonance: f32) -> Self {
        let half = (order / 2).max(1);
        let n = (half * 2) as f64;
        let a = (PI * cutoff_hz as f64 / sample_rate as f64).tan();
        let resonance = resonance.clamp(0.0, 0.999);

        let sections = (0..half)
            .map(|i| {
                let mut r = (PI * (2.0 * i as f64 + 1.0) / (2.0 * n)).sin();
                if i == 0 {
                    r *= 1.0 - resonance as f64;
                }
                Section::design(a, r)
            })
            .collect();

        Self {
            sections,
            cutoff_hz,
            resonance,
        }
    }

    pub fn order(&self) -> usize {
        self.sections.len() * 2
    }
}

impl LowPass for Butterworth {
    fn process(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            let mut x = *sample as f64;
            for section in self.sections.iter_mut() {
                x = section.run(x);
            }
            *sample = x as f32;
        }
    }

    fn reset(&mut self) {
        for section in self.sections.iter_mut() {
            section.w1 = 0.0;
            section.w2 = 0.0;
        }
    }

    fn cutoff_hz(&self) -> f32 {
        self.cutoff_hz
    }

    fn resonance(&self) -> f32 {
        self.resonance
    }
}

/// Two-pole topology-preserving state-variable low-pass.
pub struct StateVariable {
    ic1eq: f32, // First integrator's memory
    ic2eq: f32, // Second integrator's memory
    g: f32,
    k: f32,
    cutoff_hz: f32,
    resonance: f32,
}

impl StateVariable {
    pub fn new(cutoff_hz: f32, sample_rate: u32, resonance: f32) -> Self {
        let resonance = resonance.clamp(0.0, 0.999);
        // Pre-warped integrator gain: tan(π · fc / fs)
        let g = (std::f32::consts::PI * cutoff_hz / sample_rate as f32).tan();

        Self {
            ic1eq: 0.0,
            ic2eq: 0.0,
            g,
            k: 2.0 - 2.0 * resonance,
            cutoff_hz,
            resonance,
        }
    }

    #[inline]
    fn next_sample(&mut self, sample: f32) -> f32 {
        let h = 1.0 / (1.0 + self.g * (self.g + self.k));
        let v3 = sample - self.ic2eq;
        let v1 = h * (self.ic1eq + self.g * v3);
        let v2 = self.ic2eq + self.g * v1;

        self.ic1eq = 2.0 * v1 - self.ic1eq;
        self.ic2eq = 2.0 * v2 - self.ic2eq;

        v2
    }
}

impl LowPass for StateVariable {
    fn process(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample(*sample);
        }
    }

    fn reset(&mut self) {
        self.ic1eq = 0.0;
        self.ic2eq = 0.0;
    }

    fn cutoff_hz(&self) -> f32 {
        self.cutoff_hz
    }

    fn resonance(&self) -> f32 {
        self.resonance
    }
}

/// Run a fresh Butterworth low-pass over `signal` in place.
pub fn low_pass(signal: &mut [f32], cutoff_hz: f32, sample_rate: u32, order: usize, resonance: f32) {
    Butterworth::new(cutoff_hz, sample_rate, order, resonance).process(signal);
}
