//! Audio device setup and session wiring

use std::env;

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rtrb::RingBuffer;

use juno_synth::{NoteOffPolicy, Normalization, SynthConfig, Synthesizer};

use crate::{player, ui::UiApp};

/// Samples buffered between the callback and the scope.
const SCOPE_CAPACITY: usize = 8192;

/// Session options read from the environment.
///
/// `JUNO_NOTE_OFF` is one of `detach`, `cut`, `release`;
/// `JUNO_NORMALIZATION` is `voice` or `bus`.
fn config_from_env(sample_rate: u32) -> EyreResult<SynthConfig> {
    let mut config = SynthConfig::default().with_sample_rate(sample_rate);

    if let Ok(value) = env::var("JUNO_NOTE_OFF") {
        let policy = match value.to_ascii_lowercase().as_str() {
            "detach" => NoteOffPolicy::Detach,
            "cut" => NoteOffPolicy::Cut,
            "release" => NoteOffPolicy::Release,
            other => return Err(eyre!("unknown JUNO_NOTE_OFF value {other:?}")),
        };
        config = config.with_note_off(policy);
    }

    if let Ok(value) = env::var("JUNO_NORMALIZATION") {
        let normalization = match value.to_ascii_lowercase().as_str() {
            "voice" => Normalization::PerVoice,
            "bus" => Normalization::Bus,
            other => return Err(eyre!("unknown JUNO_NORMALIZATION value {other:?}")),
        };
        config = config.with_normalization(normalization);
    }

    Ok(config)
}

pub fn run() -> EyreResult<()> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| eyre!("no default output device available"))?;
    let supported = device
        .default_output_config()
        .wrap_err("failed to fetch default output config")?;

    let sample_rate = supported.sample_rate().0;
    let channels = supported.channels() as usize;

    let config = config_from_env(sample_rate)?;
    log::info!(
        "output: {} Hz, {channels} channels, {:?} note-off, {:?} normalization",
        sample_rate,
        config.note_off,
        config.normalization
    );

    let (scope_tx, scope_rx) = RingBuffer::new(SCOPE_CAPACITY);
    let (sink, mut mixer) = player::channel(sample_rate, scope_tx);
    let synth = Synthesizer::new(config, sink).wrap_err("invalid synthesizer configuration")?;

    let stream = device.build_output_stream(
        &supported.into(),
        move |data: &mut [f32], _| mixer.render(data, channels),
        |err| log::error!("audio stream error: {err}"),
        None,
    )?;
    stream.play()?;

    let mut app = UiApp::new(synth, scope_rx);
    let mut terminal = ratatui::init();
    let result = app.run(&mut terminal);
    ratatui::restore();

    result
}
