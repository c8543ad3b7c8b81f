//! Computer keyboard to MIDI note mapping.
//!
//! Two tracker-style rows: `z`..`,` plays one octave from the base note,
//! `q`..`i` the octave above it. Sharps sit on the row above each white key.

use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

use crossterm::event::KeyCode;

use juno_synth::io::converter::MAX_NOTE;

/// Base note of the lower row at startup (middle C).
pub const DEFAULT_BASE: u8 = 60;

const LOWER_ROW: [char; 13] = [
    'z', 's', 'x', 'd', 'c', 'v', 'g', 'b', 'h', 'n', 'j', 'm', ',',
];
const UPPER_ROW: [char; 13] = [
    'q', '2', 'w', '3', 'e', 'r', '5', 't', '6', 'y', '7', 'u', 'i',
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Keymap {
    base: u8,
}

impl Keymap {
    pub fn new(base: u8) -> Self {
        Self { base }
    }

    pub fn base(&self) -> u8 {
        self.base
    }

    /// The note a key plays, if it is a note key and in MIDI range.
    pub fn note_for(&self, code: KeyCode) -> Option<u8> {
        let KeyCode::Char(c) = code else {
            return None;
        };
        let c = c.to_ascii_lowercase();

        let offset = LOWER_ROW
            .iter()
            .position(|&k| k == c)
            .or_else(|| UPPER_ROW.iter().position(|&k| k == c).map(|i| i + 12))?;

        let note = self.base as usize + offset;
        (note <= MAX_NOTE as usize).then_some(note as u8)
    }

    pub fn octave_up(&mut self) {
        if self.base as usize + 12 <= MAX_NOTE as usize {
            self.base += 12;
        }
    }

    pub fn octave_down(&mut self) {
        self.base = self.base.saturating_sub(12).max(self.base % 12);
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new(DEFAULT_BASE)
    }
}

/// Long enough to bridge a typical auto-repeat start delay.
pub const REPEAT_WINDOW: Duration = Duration::from_millis(600);

/// Filters keyboard auto-repeat on terminals that report it as fresh presses.
///
/// A press for a note seen less than `window` ago is a repeat. Every repeat
/// pushes the window forward, so a held key stays one note; a key pressed
/// again after a pause starts a new one.
#[derive(Debug)]
pub struct RepeatGuard {
    window: Duration,
    last_press: HashMap<u8, Instant>,
}

impl RepeatGuard {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_press: HashMap::new(),
        }
    }

    /// Whether a press of `note` at `now` should start a voice.
    pub fn accept(&mut self, note: u8, now: Instant) -> bool {
        let fresh = match self.last_press.insert(note, now) {
            Some(previous) => now.saturating_duration_since(previous) >= self.window,
            None => true,
        };
        self.last_press
            .retain(|_, &mut pressed| now.saturating_duration_since(pressed) < self.window);
        fresh
    }

    pub fn clear(&mut self) {
        self.last_press.clear();
    }
}
