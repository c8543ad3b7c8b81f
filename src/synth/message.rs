use std::collections::VecDeque;

#[cfg(feature = "rtrb")]
use rtrb::Consumer;

/// A discrete note event, as produced by a keyboard or controller mapping.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum NoteEvent {
    NoteOn { note: u8 },
    NoteOff { note: u8 },
    AllNotesOff,
}

/// Source of queued note events.
///
/// Producers on other threads push into the queue; the control thread drains
/// it through `Synthesizer::process_events`, which keeps every mutation of the
/// voice set on a single thread.
pub trait MessageReceiver {
    fn pop(&mut self) -> Option<NoteEvent>;
}

#[cfg(feature = "rtrb")]
impl MessageReceiver for Consumer<NoteEvent> {
    fn pop(&mut self) -> Option<NoteEvent> {
        Consumer::pop(self).ok()
    }
}

impl MessageReceiver for VecDeque<NoteEvent> {
    fn pop(&mut self) -> Option<NoteEvent> {
        self.pop_front()
    }
}
