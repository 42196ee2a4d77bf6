use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use ppsdiff_core::{decode, find_rising_edges};

// Square-ish pulse train with a little noise, encoded the way the scope sends it
fn synth_payload(n: usize, period: usize, seed: u32) -> String {
    let mut state = seed.max(1);
    let mut next_u8 = || {
        let mut x = state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        state = x;
        (x >> 29) as u8
    };
    let mut hex = String::with_capacity(n * 2);
    for i in 0..n {
        let base: u8 = if (i / period) % 2 == 0 { 0x10 } else { 0xe0 };
        let sample = base.wrapping_add(next_u8());
        hex.push_str(&format!("{sample:02x}"));
    }
    hex
}

pub fn bench_decode_and_edges(c: &mut Criterion) {
    let mut g = c.benchmark_group("waveform");
    //   BENCH_SAMPLE_SIZE=10 BENCH_MEAS_MS=50 cargo bench -p ppsdiff_core --bench edges
    if let Ok(ss) = std::env::var("BENCH_SAMPLE_SIZE") {
        if let Ok(n) = ss.parse::<usize>() {
            g.sample_size(n.max(1));
        }
    } else {
        g.sample_size(50);
    }
    if let Ok(ms) = std::env::var("BENCH_MEAS_MS")
        && let Ok(ms_u64) = ms.parse::<u64>()
    {
        g.measurement_time(std::time::Duration::from_millis(ms_u64));
    }

    for &depth in &[1_200usize, 12_000, 120_000] {
        let payload = synth_payload(depth, depth / 2, 0xC0FFEE);
        g.bench_function(format!("decode_{depth}"), |b| {
            b.iter(|| {
                let v = decode(black_box(&payload), 0.04, 0.0, 0.0);
                black_box(v)
            })
        });

        let volts = decode(&payload, 0.04, 0.0, 0.0).unwrap_or_default();
        g.bench_function(format!("edges_{depth}"), |b| {
            b.iter_batched(
                || volts.clone(),
                |v| {
                    let e = find_rising_edges(black_box(&v), black_box(4.0));
                    black_box(e);
                },
                BatchSize::SmallInput,
            )
        });
    }
    g.finish();
}

criterion_group!(benches, bench_decode_and_edges);
criterion_main!(benches);
