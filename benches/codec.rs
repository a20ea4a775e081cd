#![allow(clippy::unwrap_used)]

use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

use bindoc::{decode, encode_value, view, Object, Value};

fn sample_small() -> Vec<u8> {
    vec![0xa1, 0x61, 0x61, 0x01] // {"a":1}
}

fn sample_medium() -> Vec<u8> {
    let mut obj = Object::sorted();
    for i in 0..64_i64 {
        obj.insert(format!("k{i:03}"), Value::Int(i));
    }
    encode_value(&Value::Object(obj))
}

fn bench_codec(c: &mut Criterion) {
    let small = sample_small();
    c.bench_function("decode_small", |b| {
        b.iter(|| decode(black_box(&small)).unwrap())
    });

    let medium = sample_medium();
    c.bench_function("decode_medium", |b| {
        b.iter(|| decode(black_box(&medium)).unwrap())
    });

    c.bench_function("encode_medium", |b| {
        let v = decode(&medium).unwrap();
        b.iter(|| encode_value(black_box(&v)))
    });

    c.bench_function("view_lookup_last_key", |b| {
        b.iter(|| {
            view(black_box(&medium))
                .at_key("k063")
                .unwrap()
                .unwrap()
                .int()
                .unwrap()
        })
    });
}

criterion_group!(benches, bench_codec);
criterion_main!(benches);
