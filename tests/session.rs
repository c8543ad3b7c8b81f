use std::collections::VecDeque;

use juno_synth::{
    dsp::{amplify::peak, envelope::EnvelopeStage, oscillator},
    io::SinkEvent,
    synth::{Effect, MessageReceiver, Voice},
    AudioBuffer, CollectSink, NoteEvent, NoteOffPolicy, NoteOn, Normalization, SynthConfig,
    SynthError, Synthesizer, VoiceId, VoiceParams,
};

fn session(config: SynthConfig) -> Synthesizer<CollectSink> {
    Synthesizer::new(config, CollectSink::new()).expect("valid config")
}

fn sounding_notes(synth: &Synthesizer<CollectSink>) -> Vec<u8> {
    let mut notes: Vec<u8> = synth.voices().map(|v| v.note).collect();
    notes.sort_unstable();
    notes
}

#[test]
fn seventh_note_is_dropped_at_default_capacity() {
    let mut synth = session(SynthConfig::default());

    for note in 60..66 {
        assert!(matches!(synth.note_on(note), Ok(NoteOn::Started(_))));
    }
    assert_eq!(synth.note_on(66).unwrap(), NoteOn::Dropped);

    assert_eq!(synth.active_voices(), 6);
    assert_eq!(synth.capacity(), 6);
    assert_eq!(synth.dropped_notes(), 1);
    assert!(!synth.is_sounding(66));
    assert_eq!(sounding_notes(&synth), vec![60, 61, 62, 63, 64, 65]);
    assert_eq!(synth.sink().played().count(), 6);
}

#[test]
fn note_off_for_untouched_note_changes_nothing() {
    let mut synth = session(SynthConfig::default());
    synth.note_on(60).unwrap();
    synth.note_on(64).unwrap();

    assert_eq!(synth.note_off(72), 0);
    assert_eq!(sounding_notes(&synth), vec![60, 64]);
}

#[test]
fn repeated_note_is_freed_by_one_note_off() {
    let mut synth = session(SynthConfig::default());
    synth.note_on(60).unwrap();
    synth.note_on(60).unwrap();
    assert_eq!(synth.active_voices(), 2);

    assert_eq!(synth.note_off(60), 2);
    assert_eq!(synth.active_voices(), 0);
    assert!(!synth.is_sounding(60));
}

#[test]
fn a4_voice_has_the_documented_shape() {
    let mut synth = session(SynthConfig::default());
    synth.note_on(69).unwrap();

    let (_, buffer) = synth.sink().played().next().expect("one buffer");
    assert_eq!(buffer.len(), 44_100);
    assert!((peak(buffer) - 1.0).abs() < 1e-5);

    let voice = Voice::new(69, VoiceParams::default(), 44_100).unwrap();
    let envelope = voice.envelope();
    let mid_attack = envelope[4410 / 2];
    assert!(mid_attack > 0.0 && mid_attack < 1.0);
    assert_eq!(envelope[44_099], 0.0);
    assert!((voice.frequency() - 440.0).abs() < 1e-3);
}

#[test]
fn oscillator_lengths_and_range() {
    let saw = oscillator::sawtooth(440.0, 1.0, 44_100);
    assert_eq!(saw.len(), 44_100);
    assert!(saw.iter().all(|s| (-1.0..=1.0).contains(s)));
}

#[test]
fn rejected_note_on_leaves_session_intact() {
    let mut synth = session(SynthConfig::default());
    synth.note_on(60).unwrap();

    let err = synth.note_on(128).unwrap_err();
    assert!(matches!(err, SynthError::InvalidParameter { name: "note", .. }));
    assert!(err.to_string().contains("note"));
    assert_eq!(sounding_notes(&synth), vec![60]);
}

#[test]
fn config_validation_covers_every_parameter() {
    let bad = [
        VoiceParams::default().with_duration(0.0),
        VoiceParams::default().with_adsr(-0.1, 0.2, 0.6, 0.5),
        VoiceParams::default().with_adsr(0.1, f32::NAN, 0.6, 0.5),
        VoiceParams::default().with_adsr(0.1, 0.2, 1.5, 0.5),
        VoiceParams::default().with_pulse_width(1.2),
        VoiceParams::default().with_sub_level(-0.5),
        VoiceParams::default().with_cutoff(0.0),
        VoiceParams::default().with_cutoff(22_050.0),
        VoiceParams::default().with_resonance(1.0),
        VoiceParams::default().with_filter_order(3),
        VoiceParams::default().with_filter_order(10),
    ];
    for params in bad {
        let config = SynthConfig::default().with_voice(params);
        assert!(
            Synthesizer::new(config, CollectSink::new()).is_err(),
            "{params:?} should be rejected"
        );
    }

    assert!(SynthConfig::default().with_sample_rate(0).validate().is_err());
    assert!(SynthConfig::default().with_polyphony(0).validate().is_err());
}

#[test]
fn release_policy_walks_the_stage_machine() {
    let config = SynthConfig::default().with_note_off(NoteOffPolicy::Release);
    let mut synth = session(config);
    let NoteOn::Started(id) = synth.note_on(62).unwrap() else {
        panic!("voice should start");
    };

    let stage = |s: &Synthesizer<CollectSink>| s.voices().next().map(|v| v.stage);
    assert_eq!(stage(&synth), Some(EnvelopeStage::Attack));

    synth.advance(6000);
    assert_eq!(stage(&synth), Some(EnvelopeStage::Decay));

    synth.advance(9000);
    assert_eq!(stage(&synth), Some(EnvelopeStage::Sustain));

    assert_eq!(synth.note_off(62), 1);
    assert_eq!(stage(&synth), Some(EnvelopeStage::Release));
    assert!(synth.is_sounding(62), "releasing voices still occupy a slot");

    let fade = synth.sink().events.iter().find_map(|e| match e {
        SinkEvent::Release {
            voice,
            fade_samples,
        } if *voice == id => Some(*fade_samples),
        _ => None,
    });
    assert_eq!(fade, Some(22_050));

    synth.advance(22_050);
    assert_eq!(stage(&synth), None);
    assert_eq!(synth.active_voices(), 0);
}

#[test]
fn cut_policy_stops_every_match() {
    let mut synth = session(SynthConfig::default().with_note_off(NoteOffPolicy::Cut));
    synth.note_on(60).unwrap();
    synth.note_on(60).unwrap();
    synth.all_notes_off();

    let stops = synth
        .sink()
        .events
        .iter()
        .filter(|e| matches!(e, SinkEvent::Stop { .. }))
        .count();
    assert_eq!(stops, 2);
    assert_eq!(synth.active_voices(), 0);
}

#[test]
fn bus_mode_submits_raw_voices_and_normalizes_the_mix() {
    let mut synth = session(SynthConfig::default().with_normalization(Normalization::Bus));
    for note in [48, 52, 55, 60] {
        synth.note_on(note).unwrap();
    }

    for (_, buffer) in synth.sink().played() {
        assert!(peak(buffer) > 0.0);
        assert!((peak(buffer) - 1.0).abs() > 1e-4, "voice should not be normalized");
    }

    let mix = synth.mixdown();
    assert_eq!(mix.frames(), 44_100);
    assert_eq!(mix.channels, 1);
    assert!((mix.peak() - 1.0).abs() < 1e-5);
}

#[test]
fn mixdown_follows_the_clock() {
    let mut synth = session(SynthConfig::default());
    synth.note_on(60).unwrap();
    synth.advance(11_025);
    synth.note_on(67).unwrap();

    // The later voice extends past the first one.
    assert_eq!(synth.mixdown().frames(), 44_100);

    synth.advance(33_075);
    assert_eq!(synth.active_voices(), 1);
    assert_eq!(synth.mixdown().frames(), 11_025);
}

struct Halve;

impl Effect for Halve {
    fn apply(&mut self, mut audio: AudioBuffer) -> AudioBuffer {
        for sample in &mut audio.samples {
            *sample *= 0.5;
        }
        audio
    }
}

#[test]
fn mix_passes_through_the_effect() {
    let mut plain = session(SynthConfig::default().with_normalization(Normalization::Bus));
    let mut effected = session(SynthConfig::default().with_normalization(Normalization::Bus))
        .with_effect(Halve);

    for synth in [&mut plain, &mut effected] {
        synth.note_on(57).unwrap();
    }

    let dry = plain.mixdown();
    let wet = effected.mixdown();
    assert_eq!(dry.frames(), wet.frames());
    assert!((wet.peak() - 0.5).abs() < 1e-5);
}

#[test]
fn events_from_a_queue_apply_in_order() {
    let mut synth = session(SynthConfig::default());
    let mut queue = VecDeque::from(vec![
        NoteEvent::NoteOn { note: 60 },
        NoteEvent::NoteOn { note: 64 },
        NoteEvent::NoteOn { note: 67 },
        NoteEvent::NoteOff { note: 64 },
        NoteEvent::AllNotesOff,
        NoteEvent::NoteOn { note: 72 },
    ]);

    assert_eq!(synth.process_events(&mut queue), 6);
    assert_eq!(queue.pop(), None);
    assert_eq!(sounding_notes(&synth), vec![72]);
    assert_eq!(synth.sink().played().map(|(id, _)| id).last(), Some(VoiceId(3)));
}

#[cfg(feature = "rtrb")]
#[test]
fn events_from_another_thread() {
    let (mut tx, mut rx) = rtrb::RingBuffer::new(16);

    std::thread::spawn(move || {
        for note in [48u8, 55, 60] {
            tx.push(NoteEvent::NoteOn { note }).unwrap();
        }
    })
    .join()
    .unwrap();

    let mut synth = session(SynthConfig::default());
    assert_eq!(synth.process_events(&mut rx), 3);
    assert_eq!(sounding_notes(&synth), vec![48, 55, 60]);
}
