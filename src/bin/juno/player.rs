//! Realtime playback of rendered voices through cpal.
//!
//! The synthesizer lives on the UI thread and talks to the audio callback
//! only through lock-free queues. The callback owns every playing buffer and
//! mixes them sample by sample. Finished buffers travel back to the UI thread
//! to be freed there, so the callback never deallocates.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use rtrb::{Consumer, Producer, RingBuffer};

use juno_synth::{OutputSink, VoiceId};

/// Queue depth for commands from the synthesizer to the callback.
const COMMAND_CAPACITY: usize = 256;
/// Buffers that can play at once in the callback. Voices detached from the
/// synthesizer keep playing here, so this is larger than the polyphony.
const MAX_PLAYBACKS: usize = 64;
/// Finished buffers in flight back to the UI thread.
const RETURN_CAPACITY: usize = 2 * MAX_PLAYBACKS;

#[derive(Debug)]
pub enum SinkCommand {
    Play { voice: VoiceId, buffer: Arc<[f32]> },
    Release { voice: VoiceId, fade_samples: usize },
    Stop { voice: VoiceId },
}

/// Producer half, handed to the synthesizer as its output sink.
pub struct CpalSink {
    tx: Producer<SinkCommand>,
    returned: Consumer<Arc<[f32]>>,
    lost: Arc<AtomicU64>,
    sample_rate: u32,
}

impl CpalSink {
    fn send(&mut self, command: SinkCommand) {
        if let Err(err) = self.tx.push(command) {
            self.lost.fetch_add(1, Ordering::Relaxed);
            log::warn!("playback queue full, dropping {err:?}");
        }
    }

    /// Free buffers the callback has finished with. Returns how many.
    pub fn collect_finished(&mut self) -> usize {
        let mut freed = 0;
        while let Ok(buffer) = self.returned.pop() {
            drop(buffer);
            freed += 1;
        }
        freed
    }

    /// Buffers that never reached the speaker: the command queue was full or
    /// every playback slot was taken.
    pub fn lost_playbacks(&self) -> u64 {
        self.lost.load(Ordering::Relaxed)
    }
}

impl OutputSink for CpalSink {
    fn play(&mut self, voice: VoiceId, buffer: Arc<[f32]>, sample_rate: u32) {
        // Buffers are played as-is; there is no resampler.
        if sample_rate != self.sample_rate {
            log::warn!(
                "voice {voice} rendered at {sample_rate} Hz, device runs at {} Hz",
                self.sample_rate
            );
        }
        self.send(SinkCommand::Play { voice, buffer });
    }

    fn release(&mut self, voice: VoiceId, fade_samples: usize) {
        self.send(SinkCommand::Release {
            voice,
            fade_samples,
        });
    }

    fn stop(&mut self, voice: VoiceId) {
        self.send(SinkCommand::Stop { voice });
    }
}

struct Playback {
    voice: VoiceId,
    buffer: Arc<[f32]>,
    pos: usize,
    fade: Option<(usize, usize)>, // (start, len)
}

impl Playback {
    fn next_sample(&mut self) -> f32 {
        let Some(&sample) = self.buffer.get(self.pos) else {
            return 0.0;
        };

        let gain = match self.fade {
            Some((start, len)) if len > 0 => {
                1.0 - (self.pos - start).min(len) as f32 / len as f32
            }
            Some(_) => 0.0,
            None => 1.0,
        };

        self.pos += 1;
        sample * gain
    }

    fn finished(&self) -> bool {
        match self.fade {
            Some((start, len)) if self.pos >= start + len => true,
            _ => self.pos >= self.buffer.len(),
        }
    }
}

/// Consumer half, owned by the audio callback.
pub struct Mixer {
    rx: Consumer<SinkCommand>,
    playing: Vec<Playback>,
    finished: Producer<Arc<[f32]>>,
    lost: Arc<AtomicU64>,
    scope: Producer<f32>,
}

impl Mixer {
    /// Hand a buffer back to the UI thread. Only if that queue is full does
    /// the callback free it itself.
    fn retire(&mut self, buffer: Arc<[f32]>) {
        let _ = self.finished.push(buffer);
    }

    fn remove(&mut self, index: usize) {
        let playback = self.playing.swap_remove(index);
        self.retire(playback.buffer);
    }

    fn apply(&mut self, command: SinkCommand) {
        match command {
            SinkCommand::Play { voice, buffer } => {
                if self.playing.len() >= MAX_PLAYBACKS {
                    self.lost.fetch_add(1, Ordering::Relaxed);
                    self.retire(buffer);
                    return;
                }
                self.playing.push(Playback {
                    voice,
                    buffer,
                    pos: 0,
                    fade: None,
                });
            }
            SinkCommand::Release {
                voice,
                fade_samples,
            } => {
                if let Some(p) = self.playing.iter_mut().find(|p| p.voice == voice) {
                    p.fade = Some((p.pos, fade_samples));
                }
            }
            SinkCommand::Stop { voice } => {
                if let Some(index) = self.playing.iter().position(|p| p.voice == voice) {
                    self.remove(index);
                }
            }
        }
    }

    /// Fill an interleaved output block, mono to every channel.
    pub fn render(&mut self, data: &mut [f32], channels: usize) {
        while let Ok(command) = self.rx.pop() {
            self.apply(command);
        }

        for frame in data.chunks_mut(channels.max(1)) {
            let mut sum = 0.0f32;
            for playback in self.playing.iter_mut() {
                sum += playback.next_sample();
            }
            let out = sum.clamp(-1.0, 1.0);
            frame.fill(out);
            let _ = self.scope.push(out);
        }

        let mut index = 0;
        while index < self.playing.len() {
            if self.playing[index].finished() {
                self.remove(index);
            } else {
                index += 1;
            }
        }
    }

    #[cfg(test)]
    fn playing(&self) -> usize {
        self.playing.len()
    }
}

/// Build a connected sink/mixer pair for a device running at `sample_rate`.
/// `scope_tx` receives every mixed sample.
pub fn channel(sample_rate: u32, scope_tx: Producer<f32>) -> (CpalSink, Mixer) {
    let (tx, rx) = RingBuffer::new(COMMAND_CAPACITY);
    let (finished, returned) = RingBuffer::new(RETURN_CAPACITY);
    let lost = Arc::new(AtomicU64::new(0));
    (
        CpalSink {
            tx,
            returned,
            lost: Arc::clone(&lost),
            sample_rate,
        },
        Mixer {
            rx,
            playing: Vec::with_capacity(MAX_PLAYBACKS),
            finished,
            lost,
            scope: scope_tx,
        },
    )
}
