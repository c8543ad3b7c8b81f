use super::seconds_to_samples;

/*
Oscillator Bank
===============

Each function renders a whole buffer of one waveform. There is no phase
carried between calls: sample n is evaluated at t = n / sample_rate, so the
same inputs always produce the same buffer.

Sawtooth
--------

    phase(t) = f * t
    saw(t)   = 2 * (phase - floor(0.5 + phase))

  1.0 ┐    ╱│    ╱│    ╱│
      │   ╱ │   ╱ │   ╱ │
  0.0 ┼──╱──┼──╱──┼──╱──┼──→ t
      │ ╱   │ ╱   │ ╱   │
 -1.0 └╱    │╱    │╱    │

The ramp crosses zero at whole periods and wraps from +1 to -1 half a period
later. No band-limiting is applied; the low-pass filter downstream tames the
aliasing well enough for a 2 kHz default cutoff.

Pulse
-----

A pulse is the sawtooth pushed through a comparator:

    pulse(t) = -1  if saw(t) < 2 * width - 1
               +1  otherwise

Because the ramp is linear, `width` is exactly the fraction of each period
spent low. width = 0.5 gives a square wave (threshold at zero).

Sub-oscillator
--------------

A square one octave below the note, scaled by `level`. On a Juno-style voice
this thickens the bottom end without touching the harmonics of the main
oscillators.
*/

#[inline]
fn saw_at(freq: f64, t: f64) -> f64 {
    let phase = freq * t;
    2.0 * (phase - (0.5 + phase).floor())
}

/// Render `duration` seconds of a sawtooth in `[-1, 1]`.
pub fn sawtooth(freq: f32, duration: f32, sample_rate: u32) -> Vec<f32> {
    let len = seconds_to_samples(duration, sample_rate);
    let freq = freq as f64;
    let sr = sample_rate as f64;

    (0..len)
        .map(|n| saw_at(freq, n as f64 / sr) as f32)
        .collect()
}

/// Render a pulse wave derived from the sawtooth.
pub fn pulse(freq: f32, duration: f32, width: f32, sample_rate: u32) -> Vec<f32> {
    let threshold = 2.0 * width.clamp(0.0, 1.0) - 1.0;
    let mut buffer = sawtooth(freq, duration, sample_rate);

    for sample in buffer.iter_mut() {
        *sample = if *sample < threshold { -1.0 } else { 1.0 };
    }

    buffer
}

/// Render a square at half of `freq`, scaled by `level`.
pub fn sub_oscillator(freq: f32, duration: f32, level: f32, sample_rate: u32) -> Vec<f32> {
    let mut buffer = pulse(freq * 0.5, duration, 0.5, sample_rate);
    for sample in buffer.iter_mut() {
        *sample *= level;
    }
    buffer
}

/// Unweighted sum of sawtooth, pulse and sub-oscillator.
///
/// The result peaks well outside `[-1, 1]`; the voice normalizes it after
/// filtering and enveloping.
pub fn raw_mix(
    freq: f32,
    duration: f32,
    pulse_width: f32,
    sub_level: f32,
    sample_rate: u32,
) -> Vec<f32> {
    let mut mix = sawtooth(freq, duration, sample_rate);
    let pulse = pulse(freq, duration, pulse_width, sample_rate);
    let sub = sub_oscillator(freq, duration, sub_level, sample_rate);

    for ((out, p), s) in mix.iter_mut().zip(&pulse).zip(&sub) {
        *out += p + s;
    }

    mix
}
