use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use serial_lineconf::termios::{self, snapshot};
use serial_lineconf::{FlowControl, LineConfig, Mode, Parity, PlatformBitfield, StopBits};
use std::time::Duration;

fn sample_config() -> LineConfig {
    LineConfig::new(115200)
        .unwrap()
        .with_parity(Parity::Even)
        .with_stop_bits(StopBits::Two)
        .with_flow_control(FlowControl::Software)
        .with_mode(Mode::Canonical)
}

pub fn bench_encode(c: &mut Criterion) {
    let baseline = PlatformBitfield::zeroed();
    let cfg = sample_config();
    c.bench_function("encode_over_zeroed", |b| {
        b.iter(|| {
            let bits = termios::encode(black_box(&baseline), black_box(&cfg)).unwrap();
            black_box(bits);
        })
    });
}

pub fn bench_decode(c: &mut Criterion) {
    let bits = termios::encode(&PlatformBitfield::zeroed(), &sample_config()).unwrap();
    c.bench_function("decode", |b| {
        b.iter(|| {
            let cfg = termios::decode(black_box(&bits)).unwrap();
            black_box(cfg);
        })
    });
}

pub fn bench_snapshot(c: &mut Criterion) {
    let bits = termios::encode(&PlatformBitfield::zeroed(), &sample_config()).unwrap();
    let bytes = snapshot::to_bytes(&bits);
    c.bench_function("snapshot_from_bytes", |b| {
        b.iter(|| {
            let restored = snapshot::from_bytes(black_box(&bytes)).unwrap();
            black_box(restored);
        })
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default()
        .warm_up_time(Duration::from_millis(300))
        .measurement_time(Duration::from_secs(2));
    targets = bench_encode, bench_decode, bench_snapshot
}
criterion_main!(benches);
