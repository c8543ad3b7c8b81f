// Purpose - external interfaces, format conversions

pub mod converter;
pub mod sink;

pub use sink::{CollectSink, NullSink, OutputSink, SinkEvent, VoiceId};

/// A finished block of interleaved audio.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AudioBuffer {
    pub samples: Vec<f32>,
    pub channels: u16,
    pub sample_rate: u32,
}

impl AudioBuffer {
    pub fn mono(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            channels: 1,
            sample_rate,
        }
    }

    /// Number of sample frames (samples per channel).
    pub fn frames(&self) -> usize {
        if self.channels == 0 {
            0
        } else {
            self.samples.len() / self.channels as usize
        }
    }

    pub fn peak(&self) -> f32 {
        crate::dsp::amplify::peak(&self.samples)
    }
}
