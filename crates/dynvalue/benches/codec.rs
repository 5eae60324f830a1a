use codspeed_criterion_compat::{criterion_group, criterion_main, BenchmarkId, Criterion};
use dynvalue::{EncodeOptions, GenericValue, Value};

fn document(width: usize, depth: usize) -> GenericValue {
    if depth == 0 {
        return GenericValue::seq((0..width).map(|idx| {
            if idx % 2 == 0 {
                GenericValue::from(idx)
            } else {
                GenericValue::from(format!("item-{idx}"))
            }
        }));
    }
    GenericValue::map((0..width).map(|idx| (format!("key-{idx}"), document(width, depth - 1))))
}

fn bench_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");
    for (width, depth) in [(4, 2), (8, 3), (16, 2)] {
        let name = format!("{width}x{depth}");
        let generic = document(width, depth);
        let value = Value::from_generic(generic.clone()).expect("Valid document");
        let encoded = value.to_json().expect("Encodable");
        let pretty = EncodeOptions::new().indent("  ");

        group.bench_with_input(BenchmarkId::new("from_generic", &name), &generic, |b, generic| {
            b.iter_with_large_drop(|| Value::from_generic(generic.clone()).expect("Valid document"));
        });
        group.bench_with_input(BenchmarkId::new("to_generic", &name), &value, |b, value| {
            b.iter_with_large_drop(|| value.to_generic());
        });
        group.bench_with_input(BenchmarkId::new("to_json", &name), &value, |b, value| {
            b.iter_with_large_drop(|| value.to_json().expect("Encodable"));
        });
        group.bench_with_input(BenchmarkId::new("to_json_pretty", &name), &value, |b, value| {
            b.iter_with_large_drop(|| value.to_json_with(&pretty).expect("Encodable"));
        });
        group.bench_with_input(BenchmarkId::new("from_json", &name), &encoded, |b, encoded| {
            b.iter_with_large_drop(|| Value::from_json(encoded).expect("Valid JSON"));
        });
    }
    group.finish();
}

criterion_group!(codec, bench_codec);
criterion_main!(codec);
