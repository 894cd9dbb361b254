//! Native call benchmarks
//!
//! Measures bridge overhead against calling the host body directly.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pyhost::interop::{arg, IntoDynamic};
use pyhost::{
    DynamicValue, HostMethod, InteropConfig, Invoke, KeywordArguments, PyResult,
    StaticNativeCallable,
};

fn add(args: &[DynamicValue], _kwargs: &KeywordArguments) -> PyResult<DynamicValue> {
    let a: i64 = arg(args, 0)?;
    let b: i64 = arg(args, 1)?;
    Ok(a.wrapping_add(b).into_dynamic())
}

fn bench_invoke(c: &mut Criterion) {
    let args = [DynamicValue::from_int(2), DynamicValue::from_int(3)];
    let kwargs = KeywordArguments::new();

    c.bench_function("direct_call", |b| {
        b.iter(|| add(black_box(&args), black_box(&kwargs)))
    });

    let mut group = c.benchmark_group("static_native_invoke");
    for (label, config) in [
        ("default", InteropConfig::default()),
        ("no_stats", InteropConfig { track_stats: false, ..InteropConfig::default() }),
        ("no_panic_capture", InteropConfig { catch_panics: false, track_stats: false }),
    ] {
        let callable =
            StaticNativeCallable::with_config(HostMethod::new("bench.Math", "add", add), config)
                .unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(label), &callable, |b, callable| {
            b.iter(|| callable.invoke(black_box(&args), black_box(&kwargs)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_invoke);
criterion_main!(benches);
