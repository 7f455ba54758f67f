use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use lwnx::{Direction, ResponsePacket, crc16, decode, encode};

const SIZES: [usize; 3] = [0, 16, 1016];

fn bench_crc(c: &mut Criterion) {
    let mut group = c.benchmark_group("crc16");

    for size in [16usize, 256, 1022] {
        let data = vec![0x5Au8; size];
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &data, |b, data| {
            b.iter(|| black_box(crc16(black_box(data))));
        });
    }

    group.finish();
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");

    for size in SIZES {
        let data = vec![0u8; size];
        group.throughput(Throughput::Bytes(size as u64 + 6));
        group.bench_with_input(BenchmarkId::from_parameter(size), &data, |b, data| {
            b.iter(|| black_box(encode(27, Direction::Write, data).unwrap()));
        });
    }

    group.finish();
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    for size in SIZES {
        let frame = encode(44, Direction::Read, &vec![0u8; size]).unwrap();
        let mut packet = ResponsePacket::new();
        group.throughput(Throughput::Bytes(frame.len() as u64));

        // Byte-at-a-time feed, as from a serial port
        group.bench_with_input(BenchmarkId::new("feed", size), &frame, |b, frame| {
            b.iter(|| {
                let mut complete = false;
                for &byte in frame {
                    complete |= packet.feed(byte).is_complete();
                }
                black_box(complete)
            });
        });

        group.bench_with_input(BenchmarkId::new("decode", size), &frame, |b, frame| {
            b.iter(|| black_box(decode(frame).unwrap()));
        });
    }

    group.finish();
}

fn bench_resync(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    // Line noise ahead of a short frame
    let mut stream: Vec<u8> = (0..256u32).map(|i| (i * 7) as u8 & 0x7F).collect();
    stream.extend(encode(44, Direction::Read, &[0x10, 0x27]).unwrap());
    let mut packet = ResponsePacket::new();

    group.throughput(Throughput::Bytes(stream.len() as u64));
    group.bench_function("resync_256b_noise", |b| {
        b.iter(|| {
            packet.reset();
            black_box(packet.feed_slice(&stream))
        });
    });

    group.finish();
}

criterion_group!(benches, bench_crc, bench_encode, bench_parse, bench_resync);
criterion_main!(benches);
