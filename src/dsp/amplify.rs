//! Signal multiplication, peak normalization and summing.

/*
Gain Staging
============

  amplitude     The "height" of a signal, nominally within [-1.0, +1.0].

  gain          A multiplier applied to amplitude. An envelope is a gain
                curve: multiplying a waveform by it sample-for-sample shapes
                the note's loudness over time.

  peak          max(|x|) over the whole buffer.

  normalize     Divide every sample by the peak, so the loudest sample lands
                exactly on ±1.0. A buffer whose peak is 0.0 is silent and is
                returned untouched (there is nothing to scale, and dividing
                would produce NaN).

Summing several normalized buffers can exceed ±1.0. That is why the synth
offers bus normalization: sum first, normalize once.
*/

/// Multiply `signal` by `gain` sample-for-sample, in place.
///
/// Only the overlapping prefix is processed if the lengths differ.
pub fn apply_gain(signal: &mut [f32], gain: &[f32]) {
    for (sample, g) in signal.iter_mut().zip(gain) {
        *sample *= g;
    }
}

/// Largest absolute sample value, or 0.0 for an empty buffer.
pub fn peak(buffer: &[f32]) -> f32 {
    buffer.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()))
}

/// Scale `buffer` so its peak is 1.0. Returns the peak found before scaling.
pub fn normalize(buffer: &mut [f32]) -> f32 {
    let peak = peak(buffer);
    if peak > 0.0 && peak.is_finite() {
        let scale = 1.0 / peak;
        for sample in buffer.iter_mut() {
            *sample *= scale;
        }
    }
    peak
}

/// Add `source` into `dest`, starting at `dest[0]`.
pub fn sum_into(dest: &mut [f32], source: &[f32]) {
    for (out, s) in dest.iter_mut().zip(source) {
        *out += s;
    }
}
