use std::fmt::Write;
use std::path::Path;

use character_property_map::Attribute;
use character_property_map::{join, source, table};
use criterion::{Criterion, Throughput, criterion_group, criterion_main};

// Something shaped like EastAsianWidth.txt: lots of short runs.
fn synthetic_source(values: &[&str]) -> String {
    let mut buf = String::new();
    let mut cp = 0u32;
    let mut i = 0;
    while cp < 0x30000 {
        let len = 1 + (i * 7919) % 97;
        let value = values[i as usize % values.len()];
        _ = writeln!(buf, "{:04X}..{:04X} ; {} # filler", cp, cp + len - 1, value);
        cp += len + (i % 3);
        i += 1;
    }
    buf
}

fn bench(c: &mut Criterion) {
    let eaw = synthetic_source(&["Na", "W", "A", "H"]);
    let gcb = synthetic_source(&["Extend", "Control", "SpacingMark"]);

    let mut group = c.benchmark_group("source::load_str");
    group.throughput(Throughput::Bytes(eaw.len() as u64));
    group.bench_function("east_asian_width", |b| {
        b.iter(|| source::load_str(&eaw, Attribute::east_asian_width(), Path::new("bench")))
    });
    group.finish();

    let loaded = [
        source::load_str(&eaw, Attribute::east_asian_width(), Path::new("eaw")).unwrap(),
        source::load_str(&gcb, Attribute::grapheme_cluster_break(), Path::new("gcb")).unwrap(),
    ];

    let mut group = c.benchmark_group("pipeline");
    group.bench_function("join", |b| b.iter(|| join::join(&loaded)));
    let joined = join::join(&loaded);
    group.bench_function("encode", |b| b.iter(|| table::encode(&joined)));
    let encoded = table::encode(&joined);
    group.bench_function("to_text", |b| b.iter(|| encoded.to_text()));
    group.bench_function("lookup", |b| {
        b.iter(|| (0..0x110000u32).step_by(257).filter_map(|cp| encoded.lookup(cp)).count())
    });
    group.finish();
}

criterion_group!(benches, bench);
criterion_main!(benches);
