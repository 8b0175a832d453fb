//! Performance benchmarks for the frame codec and the chunk/assembly path.
//!
//! Run benchmarks with:
//! ```sh
//! cargo bench --bench codec_bench
//! ```

use bytes::Bytes;
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use slotlink_protocol::{Chunker, Frame, MessageAssembler};
use std::hint::black_box;

/// A full-size Data frame for a 1024-byte block transport.
fn full_data_frame() -> Frame {
    let payload = vec![b'p'; 1024 - 13];
    Frame::data(true, 0x5a, 42, 3, Bytes::from(payload))
}

/// Benchmark encoding a payload-bearing frame.
fn bench_encode_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_frame");
    group.throughput(Throughput::Elements(1));

    let frame = full_data_frame();

    group.bench_function("encode_full_data_frame", |b| {
        b.iter(|| black_box(black_box(&frame).encode()));
    });

    group.finish();
}

/// Benchmark decoding a payload-bearing frame.
fn bench_decode_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_frame");
    group.throughput(Throughput::Elements(1));

    let wire = full_data_frame().encode();

    group.bench_function("decode_full_data_frame", |b| {
        b.iter(|| Frame::decode(black_box(&wire)).unwrap());
    });

    group.finish();
}

/// Benchmark the chunk → encode → decode → assemble cycle for messages of
/// increasing size.
fn bench_chunk_and_assemble(c: &mut Criterion) {
    let mut group = c.benchmark_group("chunk_and_assemble");
    let chunker = Chunker::new(1024 - 13);

    for size in [1usize * 1024, 16 * 1024, 128 * 1024] {
        let message: Vec<u8> = (0u8..=255).cycle().take(size).collect();
        group.throughput(Throughput::Bytes(size as u64));

        group.bench_with_input(BenchmarkId::from_parameter(size), &message, |b, message| {
            b.iter(|| {
                let mut assembler = MessageAssembler::new();
                let mut seq = 0u8;
                let mut delivered = None;
                for chunk in chunker.split(black_box(message)).unwrap() {
                    let wire =
                        Frame::data(chunk.first, chunk.checksum, chunk.remaining, seq, chunk.payload)
                            .encode();
                    seq = (seq + 1) % 10;
                    let frame = Frame::decode(&wire).unwrap();
                    if frame.new {
                        assembler.begin_new(frame.checksum);
                    }
                    let remaining = frame.remaining;
                    assembler.append(frame.payload);
                    if let Some(message) = assembler.try_complete(remaining) {
                        delivered = Some(message);
                    }
                }
                black_box(delivered).unwrap()
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_encode_frame,
    bench_decode_frame,
    bench_chunk_and_assemble
);
criterion_main!(benches);
