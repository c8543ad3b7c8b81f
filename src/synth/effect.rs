use crate::io::AudioBuffer;

/// Post-mix processing stage, the slot where a chorus/ensemble effect plugs in.
///
/// Contract for implementations:
/// - the returned buffer has the same number of frames and the same sample
///   rate as the input;
/// - the channel count is the effect's own configuration (a mono-to-stereo
///   ensemble may return two channels);
/// - the output peak never exceeds the input peak, so a normalized mix stays
///   normalized.
pub trait Effect: Send {
    fn apply(&mut self, audio: AudioBuffer) -> AudioBuffer;
}

/// Passes audio through untouched. The default effect of a session.
#[derive(Debug, Default, Clone, Copy)]
pub struct Bypass;

impl Effect for Bypass {
    fn apply(&mut self, audio: AudioBuffer) -> AudioBuffer {
        audio
    }
}

impl<E: Effect + ?Sized> Effect for Box<E> {
    fn apply(&mut self, audio: AudioBuffer) -> AudioBuffer {
        (**self).apply(audio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bypass_honors_the_contract() {
        let input = AudioBuffer::mono(vec![0.0, 0.5, -1.0, 0.25], 44_100);
        let output = Bypass.apply(input.clone());

        assert_eq!(output.frames(), input.frames());
        assert_eq!(output.sample_rate, input.sample_rate);
        assert_eq!(output.channels, 1);
        assert!(output.peak() <= input.peak());
        assert_eq!(output, input);
    }
}
