// Voice lifecycle, polyphony and the post-mix effect slot.
// Rendering of a single note lives in `voice`; `poly` owns the session.

pub mod effect;
pub mod message;
pub mod poly;
pub mod voice;

pub use effect::{Bypass, Effect};
pub use message::{MessageReceiver, NoteEvent};
pub use poly::{NoteOn, Synthesizer, VoiceInfo};
pub use voice::Voice;
