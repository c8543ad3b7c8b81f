use std::sync::Arc;

use crate::{
    config::{NoteOffPolicy, Normalization, SynthConfig, VoiceParams},
    dsp::{amplify, envelope::EnvelopeStage, seconds_to_samples},
    error::Result,
    io::{AudioBuffer, OutputSink, VoiceId},
    synth::{
        effect::{Bypass, Effect},
        message::{MessageReceiver, NoteEvent},
        voice::Voice,
    },
};

/// Outcome of a note-on request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteOn {
    /// A voice was rendered and submitted to the sink.
    Started(VoiceId),
    /// The polyphony ceiling was reached; the note was discarded.
    Dropped,
}

/// Snapshot of one sounding voice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoiceInfo {
    pub id: VoiceId,
    pub note: u8,
    pub frequency: f32,
    pub stage: EnvelopeStage,
    /// Samples of the buffer already played.
    pub playhead: usize,
    pub len: usize,
}

#[derive(Debug, Clone, Copy)]
struct Fade {
    start: usize,
    len: usize,
}

struct ActiveVoice {
    id: VoiceId,
    voice: Voice,
    buffer: Arc<[f32]>,
    playhead: usize,
    fade: Option<Fade>, // Set by a note-off under the Release policy
}

impl ActiveVoice {
    fn stage(&self) -> EnvelopeStage {
        if self.playhead >= self.buffer.len() {
            return EnvelopeStage::Done;
        }

        match self.fade {
            Some(fade) if self.playhead >= fade.start + fade.len => EnvelopeStage::Done,
            Some(_) => EnvelopeStage::Release,
            None => self.voice.phases().stage_at(self.playhead),
        }
    }

    /// Gain of the release fade at buffer position `index`.
    fn fade_gain(&self, index: usize) -> f32 {
        match self.fade {
            Some(fade) if index >= fade.start => {
                let elapsed = index - fade.start;
                if elapsed >= fade.len {
                    0.0
                } else {
                    1.0 - elapsed as f32 / fade.len as f32
                }
            }
            _ => 1.0,
        }
    }

    /// Samples still to be heard from the playhead on.
    fn remaining(&self) -> usize {
        let end = match self.fade {
            Some(fade) => (fade.start + fade.len).min(self.buffer.len()),
            None => self.buffer.len(),
        };
        end.saturating_sub(self.playhead)
    }

    fn info(&self) -> VoiceInfo {
        VoiceInfo {
            id: self.id,
            note: self.voice.note(),
            frequency: self.voice.frequency(),
            stage: self.stage(),
            playhead: self.playhead,
            len: self.buffer.len(),
        }
    }
}

/// Polyphonic voice manager and mixing point.
///
/// A session owns its configuration, the set of sounding voices and the sink
/// rendered voices are submitted to. All mutation goes through `&mut self`,
/// so the voice set is only ever touched by the thread driving the session;
/// other threads feed it through a `MessageReceiver` queue.
pub struct Synthesizer<S: OutputSink> {
    config: SynthConfig,
    voices: Vec<ActiveVoice>,
    sink: S,
    effect: Box<dyn Effect>,
    next_id: u64,
    dropped: u64,
}

impl<S: OutputSink> Synthesizer<S> {
    pub fn new(config: SynthConfig, sink: S) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            voices: Vec::with_capacity(config.polyphony),
            config,
            sink,
            effect: Box::new(Bypass),
            next_id: 0,
            dropped: 0,
        })
    }

    /// Replace the post-mix effect (a bypass by default).
    pub fn with_effect<E: Effect + 'static>(mut self, effect: E) -> Self {
        self.effect = Box::new(effect);
        self
    }

    pub fn config(&self) -> &SynthConfig {
        &self.config
    }

    /// Change the parameters used for voices started from now on.
    pub fn set_voice_params(&mut self, params: VoiceParams) -> Result<()> {
        params.validate(self.config.sample_rate)?;
        self.config.voice = params;
        Ok(())
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Start a voice for `note`, if the polyphony ceiling allows it.
    ///
    /// The buffer is rendered synchronously and submitted to the sink before
    /// this returns. Invalid parameters are rejected without touching the
    /// voice set.
    pub fn note_on(&mut self, note: u8) -> Result<NoteOn> {
        let voice = Voice::new(note, self.config.voice, self.config.sample_rate)?;

        if self.voices.len() >= self.config.polyphony {
            self.dropped += 1;
            log::debug!(
                "note {note} dropped: {}/{} voices sounding",
                self.voices.len(),
                self.config.polyphony
            );
            return Ok(NoteOn::Dropped);
        }

        let buffer: Arc<[f32]> = Arc::from(voice.render_with(self.config.normalization));
        let id = VoiceId(self.next_id);
        self.next_id += 1;

        log::trace!(
            "voice {id} started: note {note} ({:.2} Hz), {} samples",
            voice.frequency(),
            buffer.len()
        );

        self.voices.push(ActiveVoice {
            id,
            voice,
            buffer: Arc::clone(&buffer),
            playhead: 0,
            fade: None,
        });
        self.sink.play(id, buffer, self.config.sample_rate);

        Ok(NoteOn::Started(id))
    }

    /// End every voice playing `note`. Returns how many voices matched.
    ///
    /// What "end" means depends on the session's `NoteOffPolicy`. A note-off
    /// that matches nothing is a no-op.
    pub fn note_off(&mut self, note: u8) -> usize {
        let matched = self.end_voices(|voice| voice.note() == note);
        if matched == 0 {
            log::trace!("note-off {note} matched no voice");
        }
        matched
    }

    /// End every sounding voice.
    pub fn all_notes_off(&mut self) -> usize {
        self.end_voices(|_| true)
    }

    fn end_voices(&mut self, matches: impl Fn(&Voice) -> bool) -> usize {
        match self.config.note_off {
            NoteOffPolicy::Detach => self.remove_voices(matches, false),
            NoteOffPolicy::Cut => self.remove_voices(matches, true),
            NoteOffPolicy::Release => self.release_voices(matches),
        }
    }

    fn remove_voices(&mut self, matches: impl Fn(&Voice) -> bool, stop: bool) -> usize {
        let before = self.voices.len();
        let sink = &mut self.sink;

        self.voices.retain(|active| {
            if !matches(&active.voice) {
                return true;
            }
            if stop {
                sink.stop(active.id);
            }
            log::trace!("voice {} removed", active.id);
            false
        });

        before - self.voices.len()
    }

    fn release_voices(&mut self, matches: impl Fn(&Voice) -> bool) -> usize {
        let mut matched = 0;

        for active in self.voices.iter_mut().filter(|a| matches(&a.voice)) {
            matched += 1;

            // Already fading, or inside its own release tail.
            if active.fade.is_some()
                || matches!(
                    active.stage(),
                    EnvelopeStage::Release | EnvelopeStage::Done
                )
            {
                continue;
            }

            let params = active.voice.params();
            let remaining = active.buffer.len().saturating_sub(active.playhead);
            let len = seconds_to_samples(params.release, active.voice.sample_rate()).min(remaining);

            active.fade = Some(Fade {
                start: active.playhead,
                len,
            });
            self.sink.release(active.id, len);
            log::trace!("voice {} releasing over {len} samples", active.id);
        }

        self.prune();
        matched
    }

    /// Move the session clock forward by `frames` samples.
    ///
    /// Voices whose buffer (or release fade) has fully played are removed.
    pub fn advance(&mut self, frames: usize) {
        for active in self.voices.iter_mut() {
            active.playhead = active.playhead.saturating_add(frames);
        }
        self.prune();
    }

    fn prune(&mut self) {
        self.voices.retain(|active| {
            let done = active.stage() == EnvelopeStage::Done;
            if done {
                log::trace!("voice {} finished", active.id);
            }
            !done
        });
    }

    /// Apply a single event.
    pub fn handle(&mut self, event: NoteEvent) -> Result<()> {
        match event {
            NoteEvent::NoteOn { note } => {
                self.note_on(note)?;
            }
            NoteEvent::NoteOff { note } => {
                self.note_off(note);
            }
            NoteEvent::AllNotesOff => {
                self.all_notes_off();
            }
        }
        Ok(())
    }

    /// Drain queued events in arrival order. Returns the number handled.
    ///
    /// A rejected event is logged and skipped; the rest of the queue is still
    /// processed.
    pub fn process_events<R: MessageReceiver + ?Sized>(&mut self, rx: &mut R) -> usize {
        let mut handled = 0;
        while let Some(event) = rx.pop() {
            if let Err(err) = self.handle(event) {
                log::warn!("rejected {event:?}: {err}");
            }
            handled += 1;
        }
        handled
    }

    /// Mix the remainder of every sounding voice into one mono buffer.
    ///
    /// In `Normalization::Bus` mode the sum is normalized to peak 1.0. The
    /// mix then passes through the session's effect.
    pub fn mixdown(&mut self) -> AudioBuffer {
        let len = self
            .voices
            .iter()
            .map(ActiveVoice::remaining)
            .max()
            .unwrap_or(0);
        let mut mix = vec![0.0f32; len];

        for active in &self.voices {
            let remaining = active.remaining();
            for (i, out) in mix.iter_mut().take(remaining).enumerate() {
                let index = active.playhead + i;
                *out += active.buffer[index] * active.fade_gain(index);
            }
        }

        if self.config.normalization == Normalization::Bus {
            amplify::normalize(&mut mix);
        }

        let audio = AudioBuffer::mono(mix, self.config.sample_rate);
        self.apply_chorus(audio)
    }

    /// Run a finished mix through the ensemble effect slot.
    pub fn apply_chorus(&mut self, audio: AudioBuffer) -> AudioBuffer {
        self.effect.apply(audio)
    }

    pub fn active_voices(&self) -> usize {
        self.voices.len()
    }

    pub fn capacity(&self) -> usize {
        self.config.polyphony
    }

    pub fn is_sounding(&self, note: u8) -> bool {
        self.voices.iter().any(|active| active.voice.note() == note)
    }

    pub fn voices(&self) -> impl Iterator<Item = VoiceInfo> + '_ {
        self.voices.iter().map(ActiveVoice::info)
    }

    /// Note-ons discarded at the polyphony ceiling since the session began.
    pub fn dropped_notes(&self) -> u64 {
        self.dropped
    }
}
