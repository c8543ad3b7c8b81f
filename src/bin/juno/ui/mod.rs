//! Terminal front end: plays the synthesizer from the computer keyboard and
//! shows what it is doing.

mod spectrum;
mod transport;
mod voices;
mod waveform;

use std::{
    collections::HashSet,
    io,
    time::{Duration, Instant},
};

use color_eyre::eyre::Result as EyreResult;
use crossterm::{
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute, terminal,
};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};
use rtrb::Consumer;

use juno_synth::{io::converter::note_name, synth::VoiceInfo, Synthesizer};

use crate::{
    keymap::{Keymap, RepeatGuard, REPEAT_WINDOW},
    player::CpalSink,
};

use spectrum::{render_spectrum, SpectrumAnalyzer};
use transport::{render_transport, AudioStats, Status};
use voices::render_voices;
use waveform::render_waveform;

/// Samples kept for the scope and the spectrum.
const SCOPE_LEN: usize = 2048;
const CUTOFF_STEP: f32 = 1.25;

pub struct UiApp {
    synth: Synthesizer<CpalSink>,
    scope_rx: Consumer<f32>,
    scope: Vec<f32>,
    spectrum: SpectrumAnalyzer,
    keymap: Keymap,
    /// Keys currently down, when the terminal reports releases.
    held: HashSet<u8>,
    key_releases: bool,
    /// Stands in for release events when the terminal has none.
    repeats: RepeatGuard,
    last_tick: Instant,
    pending_frames: f64,
    should_quit: bool,
}

impl UiApp {
    pub fn new(synth: Synthesizer<CpalSink>, scope_rx: Consumer<f32>) -> Self {
        let sample_rate = synth.config().sample_rate;
        Self {
            synth,
            scope_rx,
            scope: vec![0.0; SCOPE_LEN],
            spectrum: SpectrumAnalyzer::new(SCOPE_LEN, sample_rate),
            keymap: Keymap::default(),
            held: HashSet::new(),
            key_releases: false,
            repeats: RepeatGuard::new(REPEAT_WINDOW),
            last_tick: Instant::now(),
            pending_frames: 0.0,
            should_quit: false,
        }
    }

    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        // Without release events keys only ever start notes; voices then end
        // on their own when their buffer runs out.
        self.key_releases = terminal::supports_keyboard_enhancement().unwrap_or(false);
        if self.key_releases {
            execute!(
                io::stdout(),
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
        }
        log::info!("key release events: {}", self.key_releases);

        let result = self.event_loop(terminal);

        if self.key_releases {
            execute!(io::stdout(), PopKeyboardEnhancementFlags)?;
        }
        result
    }

    fn event_loop(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.tick();
            self.poll_scope();

            terminal.draw(|frame| self.render(frame))?;

            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key(key);
                }
            }
        }

        self.synth.all_notes_off();
        Ok(())
    }

    /// Advance the session clock by the wall time since the last tick.
    fn tick(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_tick);
        self.last_tick = now;

        self.pending_frames += elapsed.as_secs_f64() * self.synth.config().sample_rate as f64;
        let frames = self.pending_frames.floor();
        self.pending_frames -= frames;
        self.synth.advance(frames as usize);
        self.synth.sink_mut().collect_finished();
    }

    fn poll_scope(&mut self) {
        let mut fresh = false;
        while let Ok(sample) = self.scope_rx.pop() {
            self.scope.push(sample);
            fresh = true;
        }

        if self.scope.len() > SCOPE_LEN {
            let excess = self.scope.len() - SCOPE_LEN;
            self.scope.drain(..excess);
        }
        if fresh {
            self.spectrum.update(&self.scope);
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        match key.kind {
            KeyEventKind::Press => self.key_down(key.code),
            KeyEventKind::Release => self.key_up(key.code),
            KeyEventKind::Repeat => {}
        }
    }

    fn key_down(&mut self, code: KeyCode) {
        if let Some(note) = self.keymap.note_for(code) {
            let fresh = if self.key_releases {
                self.held.insert(note)
            } else {
                self.repeats.accept(note, Instant::now())
            };
            if !fresh {
                return;
            }
            match self.synth.note_on(note) {
                Ok(outcome) => log::debug!("{} -> {outcome:?}", note_name(note)),
                Err(err) => log::warn!("note {note}: {err}"),
            }
            return;
        }

        match code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Char(' ') => {
                self.held.clear();
                self.repeats.clear();
                self.synth.all_notes_off();
            }
            KeyCode::Left | KeyCode::Char('-') => self.keymap.octave_down(),
            KeyCode::Right | KeyCode::Char('=') => self.keymap.octave_up(),
            KeyCode::Up => self.scale_cutoff(CUTOFF_STEP),
            KeyCode::Down => self.scale_cutoff(1.0 / CUTOFF_STEP),
            _ => {}
        }
    }

    fn key_up(&mut self, code: KeyCode) {
        if let Some(note) = self.keymap.note_for(code) {
            self.held.remove(&note);
            self.synth.note_off(note);
        }
    }

    fn scale_cutoff(&mut self, factor: f32) {
        let voice = self.synth.config().voice;
        let params = voice.with_cutoff(voice.cutoff_hz * factor);
        // Out-of-range cutoffs are refused and the old value kept.
        if let Err(err) = self.synth.set_voice_params(params) {
            log::debug!("cutoff unchanged: {err}");
        }
    }

    fn render(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Status
                Constraint::Length(8), // Voices
                Constraint::Min(6),    // Scope + spectrum
                Constraint::Length(1), // Help
            ])
            .split(frame.area());

        let config = self.synth.config();
        let status = Status {
            sample_rate: config.sample_rate,
            voices: self.synth.active_voices(),
            capacity: self.synth.capacity(),
            dropped: self.synth.dropped_notes(),
            lost: self.synth.sink().lost_playbacks(),
            base_note: note_name(self.keymap.base()),
            cutoff_hz: config.voice.cutoff_hz,
        };
        render_transport(frame, chunks[0], &status, &AudioStats::from_buffer(&self.scope));

        let voices: Vec<VoiceInfo> = self.synth.voices().collect();
        render_voices(frame, chunks[1], &voices);

        let scopes = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[2]);
        render_waveform(frame, scopes[0], &self.scope);
        render_spectrum(frame, scopes[1], self.spectrum.data());

        let help = Paragraph::new(
            " [Z..M / Q..I] Play  [-/=] Octave  [Up/Down] Cutoff  [Space] All off  [Esc] Quit",
        )
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[3]);
    }
}
