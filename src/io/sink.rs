//! Playback destinations for rendered voices.
//!
//! The synthesizer never streams samples itself. Each accepted note-on
//! produces one finished buffer, which is handed to an `OutputSink` that
//! starts playing it asynchronously and returns immediately.

use std::{fmt, sync::Arc};

/// Identifies one accepted note-on for the lifetime of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VoiceId(pub u64);

impl fmt::Display for VoiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Consumer of rendered voice buffers.
///
/// `play` must not block: it queues the buffer and returns. `release` and
/// `stop` are only issued by the `Release` and `Cut` note-off policies; sinks
/// that cannot shorten playback may ignore them.
pub trait OutputSink {
    fn play(&mut self, voice: VoiceId, buffer: Arc<[f32]>, sample_rate: u32);

    /// Fade the voice out linearly over `fade_samples`, starting now.
    fn release(&mut self, _voice: VoiceId, _fade_samples: usize) {}

    /// Silence the voice immediately.
    fn stop(&mut self, _voice: VoiceId) {}
}

impl<S: OutputSink + ?Sized> OutputSink for Box<S> {
    fn play(&mut self, voice: VoiceId, buffer: Arc<[f32]>, sample_rate: u32) {
        (**self).play(voice, buffer, sample_rate)
    }

    fn release(&mut self, voice: VoiceId, fade_samples: usize) {
        (**self).release(voice, fade_samples)
    }

    fn stop(&mut self, voice: VoiceId) {
        (**self).stop(voice)
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl OutputSink for NullSink {
    fn play(&mut self, _voice: VoiceId, _buffer: Arc<[f32]>, _sample_rate: u32) {}
}

/// Something a sink was asked to do.
#[derive(Debug, Clone)]
pub enum SinkEvent {
    Play {
        voice: VoiceId,
        buffer: Arc<[f32]>,
        sample_rate: u32,
    },
    Release {
        voice: VoiceId,
        fade_samples: usize,
    },
    Stop {
        voice: VoiceId,
    },
}

/// Records every request in order. Useful for offline rendering and tests.
#[derive(Debug, Default, Clone)]
pub struct CollectSink {
    pub events: Vec<SinkEvent>,
}

impl CollectSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffers submitted through `play`, in submission order.
    pub fn played(&self) -> impl Iterator<Item = (VoiceId, &Arc<[f32]>)> + '_ {
        self.events.iter().filter_map(|event| match event {
            SinkEvent::Play { voice, buffer, .. } => Some((*voice, buffer)),
            _ => None,
        })
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl OutputSink for CollectSink {
    fn play(&mut self, voice: VoiceId, buffer: Arc<[f32]>, sample_rate: u32) {
        self.events.push(SinkEvent::Play {
            voice,
            buffer,
            sample_rate,
        });
    }

    fn release(&mut self, voice: VoiceId, fade_samples: usize) {
        self.events.push(SinkEvent::Release {
            voice,
            fade_samples,
        });
    }

    fn stop(&mut self, voice: VoiceId) {
        self.events.push(SinkEvent::Stop { voice });
    }
}
