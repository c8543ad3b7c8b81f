//! Offline walk through a session: a player thread queues a chord and a few
//! extra notes, the control thread drains the queue and mixes the result.
//!
//! Run with: RUST_LOG=debug cargo run --example polyphony_demo

use std::thread;

use juno_synth::{
    io::converter::note_name, CollectSink, NoteEvent, NoteOffPolicy, Normalization, SynthConfig,
    Synthesizer,
};
use rtrb::RingBuffer;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let (mut tx, mut rx) = RingBuffer::new(64);

    let player = thread::spawn(move || {
        // Cmaj9 plus two notes beyond the six-voice ceiling.
        let notes = [48u8, 52, 55, 59, 62, 64, 67, 71];
        for note in notes {
            if tx.push(NoteEvent::NoteOn { note }).is_err() {
                log::warn!("queue full, note {note} lost");
            }
        }
        let _ = tx.push(NoteEvent::NoteOff { note: 52 });
        let _ = tx.push(NoteEvent::NoteOff { note: 99 });
    });
    player.join().map_err(|_| "player thread panicked")?;

    let config = SynthConfig::default()
        .with_normalization(Normalization::Bus)
        .with_note_off(NoteOffPolicy::Release);
    let mut synth = Synthesizer::new(config, CollectSink::new())?;

    let handled = synth.process_events(&mut rx);
    log::info!(
        "handled {handled} events: {} voices sounding, {} dropped",
        synth.active_voices(),
        synth.dropped_notes()
    );

    for voice in synth.voices() {
        log::info!(
            "  {} {:<4} {:>8.2} Hz  {:?}",
            voice.id,
            note_name(voice.note),
            voice.frequency,
            voice.stage
        );
    }

    synth.advance(4_410);
    let mix = synth.mixdown();
    log::info!(
        "mixdown: {} frames at {} Hz, peak {:.3}",
        mix.frames(),
        mix.sample_rate,
        mix.peak()
    );

    synth.advance(mix.frames());
    log::info!("after the mix has played: {} voices", synth.active_voices());

    Ok(())
}
