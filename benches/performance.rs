use criterion::{criterion_group, criterion_main, Criterion};
use strider_core::config::TraversalConfig;
use strider_core::value::Value;
use strider_exec::Traversal;
use strider_steps::filter::FilterStep;
use strider_steps::map::MapStep;
use strider_steps::start::StartStep;

/// Long runs of repeated values, the case bulk compression targets.
fn make_values(len: usize) -> Vec<Value> {
    (0..len).map(|i| Value::from((i / 64) as i64)).collect()
}

fn build(values: &[Value], config: TraversalConfig) -> Traversal {
    let mut t = Traversal::new().with_config(config);
    t.add_step(StartStep::values(values.to_vec())).unwrap();
    t.add_step(MapStep::new(|v| Ok(Value::from(v.as_int().unwrap_or(0) % 97))))
        .unwrap();
    t.add_step(FilterStep::new(|v| v.as_int() != Some(13))).unwrap();
    t
}

fn bench_pull(c: &mut Criterion) {
    let values = make_values(16 * 1024);

    c.bench_function("pull_plain", |b| {
        b.iter(|| {
            let mut t = build(&values, TraversalConfig::default());
            t.iterate().unwrap();
        })
    });

    c.bench_function("pull_coalesced", |b| {
        b.iter(|| {
            let mut t = build(&values, TraversalConfig::default().with_coalesce(u64::MAX));
            t.iterate().unwrap();
        })
    });
}

fn bench_clone(c: &mut Criterion) {
    let values = make_values(1024);
    let template = build(&values, TraversalConfig::default());
    c.bench_function("clone_and_drain", |b| {
        b.iter(|| {
            let mut t = template.try_clone().unwrap();
            let _ = t.to_list().unwrap();
        })
    });
}

criterion_group!(benches, bench_pull, bench_clone);
criterion_main!(benches);
