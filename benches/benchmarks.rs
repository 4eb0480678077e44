use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use std::sync::Arc;

use serde_json::{json, Value};

use canister::{Action, Registry, Select, StoreConfig, UseSelect};

fn counter_config() -> StoreConfig {
    StoreConfig::new(|state, action| match action.kind() {
        "INCREMENT" => json!(state.as_i64().unwrap_or(0) + 1),
        _ => {
            if state.is_null() {
                json!(0)
            } else {
                state
            }
        }
    })
    .selector("value", |state, _| state.clone())
    .action("increment", |_| Action::bare("INCREMENT"))
}

fn store_registration_benchmark(c: &mut Criterion) {
    c.bench_function("store_registration", |b| {
        let mut n = 0u64;
        let registry = Registry::new();
        b.iter(|| {
            n += 1;
            registry
                .register_store(&format!("store-{n}"), counter_config())
                .unwrap()
        });
    });
}

fn live_select_benchmark(c: &mut Criterion) {
    let registry = Registry::new();
    registry.register_store("counter", counter_config()).unwrap();
    let selectors = registry.select("counter").unwrap();

    c.bench_function("live_select", |b| {
        b.iter(|| black_box(selectors.call("value", &[]).unwrap()));
    });
}

fn dispatch_notify_benchmark(c: &mut Criterion) {
    let registry = Registry::new();
    registry.register_store("counter", counter_config()).unwrap();

    let subscriptions: Vec<_> = (0..8).map(|_| registry.subscribe(|| {})).collect();
    let dispatcher = registry.dispatch("counter").unwrap();

    c.bench_function("dispatch_with_8_listeners", |b| {
        b.iter(|| dispatcher.call("increment", &[]).unwrap());
    });

    drop(subscriptions);
}

fn hook_render_memoized_benchmark(c: &mut Criterion) {
    let registry = Registry::new();
    registry.register_store("counter", counter_config()).unwrap();

    let hook = UseSelect::<Value>::mount_in(
        registry,
        |select| select.store("counter")?.call("value", &[]),
        Some(vec![json!("dep")]),
        || {},
    )
    .unwrap();

    c.bench_function("hook_render_memoized", |b| {
        b.iter(|| {
            black_box(
                hook.render(
                    |select: &Select| select.store("counter")?.call("value", &[]),
                    Some(vec![json!("dep")]),
                )
                .unwrap(),
            )
        });
    });
}

fn hook_notification_benchmark(c: &mut Criterion) {
    let registry = Registry::new();
    registry.register_store("counter", counter_config()).unwrap();

    let hook = UseSelect::<Value>::mount_in(
        Arc::clone(&registry),
        |select| select.store("counter")?.call("value", &[]),
        Some(vec![]),
        || {},
    )
    .unwrap();
    let dispatcher = registry.dispatch("counter").unwrap();

    c.bench_function("hook_notification_recompute", |b| {
        b.iter(|| dispatcher.call("increment", &[]).unwrap());
    });

    hook.unmount();
}

criterion_group!(
    benches,
    store_registration_benchmark,
    live_select_benchmark,
    dispatch_notify_benchmark,
    hook_render_memoized_benchmark,
    hook_notification_benchmark
);
criterion_main!(benches);
