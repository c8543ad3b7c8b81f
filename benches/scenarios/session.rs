//! Benchmarks for a session with every voice in use.

use std::hint::black_box;

use criterion::Criterion;
use juno_synth::{NullSink, SynthConfig, Synthesizer};

const CHORD: [u8; 6] = [48, 55, 60, 64, 67, 72];

pub fn bench_session(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/session");
    group.sample_size(20);

    group.bench_function("full_chord", |b| {
        b.iter(|| {
            let mut synth =
                Synthesizer::new(SynthConfig::default(), NullSink).expect("valid config");
            for note in CHORD {
                let _ = synth.note_on(black_box(note));
            }
            synth.all_notes_off()
        })
    });

    group.bench_function("chord_mixdown", |b| {
        let mut synth = Synthesizer::new(SynthConfig::default(), NullSink).expect("valid config");
        for note in CHORD {
            let _ = synth.note_on(note);
        }
        b.iter(|| synth.mixdown())
    });

    group.bench_function("dropped_note", |b| {
        let mut synth = Synthesizer::new(SynthConfig::default(), NullSink).expect("valid config");
        for note in CHORD {
            let _ = synth.note_on(note);
        }
        b.iter(|| synth.note_on(black_box(80)))
    });

    group.finish();
}
