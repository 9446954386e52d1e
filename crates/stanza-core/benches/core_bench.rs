//! Criterion benchmarks for stanza-core DSP primitives
//!
//! Run with: cargo bench -p stanza-core
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use stanza_core::{
    AllpassFilter, Butterworth, CombFilter, DampingFilter, DampingKind, DelayLine, Interpolation,
    Lfo,
};

const SAMPLE_RATE: f32 = 48000.0;
const BLOCK_SIZES: &[usize] = &[64, 128, 256, 512, 1024];

fn generate_test_signal(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE;
            (2.0 * std::f32::consts::PI * 440.0 * t).sin() * 0.5
        })
        .collect()
}

fn bench_delay(c: &mut Criterion) {
    let mut group = c.benchmark_group("DelayLine");

    for interp in [Interpolation::None, Interpolation::Linear, Interpolation::Cubic] {
        let input = generate_test_signal(512);

        group.bench_with_input(
            BenchmarkId::new("read_write", format!("{interp:?}")),
            &interp,
            |b, &interp| {
                let mut delay = DelayLine::new(100.0, SAMPLE_RATE);
                delay.set_interpolation(interp);
                b.iter(|| {
                    for &sample in &input {
                        black_box(delay.read_write(black_box(sample), 1234.5));
                    }
                });
            },
        );
    }

    group.finish();
}

fn bench_comb(c: &mut Criterion) {
    let mut group = c.benchmark_group("CombFilter");

    for &block_size in BLOCK_SIZES {
        let input = generate_test_signal(block_size);

        group.bench_with_input(
            BenchmarkId::new("process", block_size),
            &block_size,
            |b, _| {
                let mut comb = CombFilter::new(100.0, SAMPLE_RATE);
                comb.set_delay_ms(29.7);
                comb.set_feedback_from_decay(2.0);
                comb.set_cutoff(6000.0);
                b.iter(|| {
                    for &sample in &input {
                        black_box(comb.process(black_box(sample)));
                    }
                });
            },
        );
    }

    group.finish();
}

fn bench_allpass(c: &mut Criterion) {
    let input = generate_test_signal(512);

    c.bench_function("AllpassFilter/process", |b| {
        let mut allpass = AllpassFilter::new(12.0, SAMPLE_RATE);
        allpass.set_feedback(0.7);
        b.iter(|| {
            for &sample in &input {
                black_box(allpass.process(black_box(sample)));
            }
        });
    });
}

fn bench_damping(c: &mut Criterion) {
    let mut group = c.benchmark_group("DampingFilter");
    let input = generate_test_signal(512);

    for kind in [DampingKind::OnePole, DampingKind::Vicanek, DampingKind::Shelving] {
        group.bench_with_input(
            BenchmarkId::new("process", format!("{kind:?}")),
            &kind,
            |b, &kind| {
                let mut damp = DampingFilter::new(SAMPLE_RATE, 6000.0, kind);
                b.iter(|| {
                    for &sample in &input {
                        black_box(damp.process(black_box(sample)));
                    }
                });
            },
        );
    }

    group.finish();
}

fn bench_butterworth(c: &mut Criterion) {
    let input = generate_test_signal(512);

    c.bench_function("Butterworth/lowpass", |b| {
        let mut lpf = Butterworth::lowpass(SAMPLE_RATE, 8000.0);
        b.iter(|| {
            for &sample in &input {
                black_box(lpf.process(black_box(sample)));
            }
        });
    });
}

fn bench_lfo(c: &mut Criterion) {
    c.bench_function("Lfo/next", |b| {
        let mut lfo = Lfo::new(SAMPLE_RATE, 1.0);
        b.iter(|| {
            for _ in 0..512 {
                black_box(lfo.next());
            }
        });
    });
}

criterion_group!(
    benches,
    bench_delay,
    bench_comb,
    bench_allpass,
    bench_damping,
    bench_butterworth,
    bench_lfo
);
criterion_main!(benches);
