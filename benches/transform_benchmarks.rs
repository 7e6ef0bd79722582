//! Transform Benchmarks
//!
//! Performance benchmarks for the buffer transforms and the WAV codec.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use audioforge::dsp::{self, FadeOptions, GainOptions, NormalizeOptions, SpeedOptions};
use audioforge::engine::{encode, AudioDecoder, SampleBuffer, WavDecoder};

fn sine_buffer(secs: f64, sample_rate: u32, channels: usize) -> SampleBuffer {
    let frames = (secs * sample_rate as f64) as usize;
    let data: Vec<f32> = (0..frames)
        .map(|i| {
            let t = i as f64 / sample_rate as f64;
            (0.5 * (2.0 * std::f64::consts::PI * 440.0 * t).sin()) as f32
        })
        .collect();
    SampleBuffer::from_channels(vec![data; channels], sample_rate).unwrap()
}

fn benchmark_gain(c: &mut Criterion) {
    let buffer = sine_buffer(10.0, 44100, 2);
    let options = GainOptions::decibels(-6.0);

    c.bench_function("gain_10s_stereo", |b| {
        b.iter(|| dsp::gain(black_box(&buffer), &options))
    });
}

fn benchmark_fade_normalize(c: &mut Criterion) {
    let buffer = sine_buffer(10.0, 44100, 2);
    let fade = FadeOptions::new(1.0, 1.0);
    let normalize = NormalizeOptions::default();

    c.bench_function("fade_10s_stereo", |b| {
        b.iter(|| dsp::fade(black_box(&buffer), &fade))
    });
    c.bench_function("normalize_10s_stereo", |b| {
        b.iter(|| dsp::normalize(black_box(&buffer), &normalize))
    });
}

fn benchmark_speed(c: &mut Criterion) {
    let buffer = sine_buffer(10.0, 44100, 2);
    let natural = SpeedOptions::new(1.5, false);
    let preserved = SpeedOptions::new(1.5, true);

    c.bench_function("speed_interpolated_10s", |b| {
        b.iter(|| dsp::speed_change(black_box(&buffer), &natural).unwrap())
    });
    c.bench_function("speed_nearest_10s", |b| {
        b.iter(|| dsp::speed_change(black_box(&buffer), &preserved).unwrap())
    });
}

fn benchmark_codec(c: &mut Criterion) {
    let buffer = sine_buffer(10.0, 44100, 2);
    let bytes = encode(&buffer).unwrap().into_bytes();

    c.bench_function("encode_wav_10s_stereo", |b| {
        b.iter(|| encode(black_box(&buffer)).unwrap())
    });
    c.bench_function("decode_wav_10s_stereo", |b| {
        b.iter(|| WavDecoder.decode(black_box(&bytes)).unwrap())
    });
}

criterion_group!(
    benches,
    benchmark_gain,
    benchmark_fade_normalize,
    benchmark_speed,
    benchmark_codec
);
criterion_main!(benches);
