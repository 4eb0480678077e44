//! Property tests for the memoization contract.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use proptest::prelude::*;
use serde_json::{json, Value};

use canister::{Registry, Select, StoreConfig, UseSelect};

fn lookup_config() -> StoreConfig {
    StoreConfig::new(|_, _| json!({ "fixed": "value" })).selector("get", |state, args| {
        let key = args.first().and_then(Value::as_str).unwrap_or_default();
        state.get(key).cloned().unwrap_or(Value::Null)
    })
}

fn counting_map_select(
    calls: &Arc<AtomicUsize>,
) -> impl Fn(&Select) -> canister::DataResult<Value> + Send + Sync + 'static {
    let calls = Arc::clone(calls);
    move |select| {
        calls.fetch_add(1, Ordering::SeqCst);
        select.store("lookup")?.call("get", &[json!("fixed")])
    }
}

proptest! {
    /// Across any sequence of renders, map_select runs exactly once per
    /// dependency-list change (plus the mount-time computation).
    #[test]
    fn recomputation_count_equals_dependency_changes(deps in prop::collection::vec(0u8..4, 1..32)) {
        Registry::scope(|| {
            Registry::current().register_store("lookup", lookup_config()).unwrap();

            let calls = Arc::new(AtomicUsize::new(0));
            let hook = UseSelect::mount_in(
                Registry::current(),
                counting_map_select(&calls),
                Some(vec![json!(deps[0])]),
                || {},
            )
            .unwrap();

            let mut expected = 1;
            let mut previous = deps[0];
            for &dep in &deps[1..] {
                hook.render(counting_map_select(&calls), Some(vec![json!(dep)])).unwrap();
                if dep != previous {
                    expected += 1;
                }
                previous = dep;
            }

            assert_eq!(calls.load(Ordering::SeqCst), expected);
        });
    }

    /// With no dependency list, every render recomputes.
    #[test]
    fn absent_dependency_list_recomputes_each_render(renders in 1usize..16) {
        Registry::scope(|| {
            Registry::current().register_store("lookup", lookup_config()).unwrap();

            let calls = Arc::new(AtomicUsize::new(0));
            let hook = UseSelect::mount_in(
                Registry::current(),
                counting_map_select(&calls),
                None,
                || {},
            )
            .unwrap();

            for _ in 0..renders {
                hook.render(counting_map_select(&calls), None).unwrap();
            }

            assert_eq!(calls.load(Ordering::SeqCst), renders + 1);
        });
    }

    /// The memoized value returned on a dependency hit is the same value
    /// the previous computation produced.
    #[test]
    fn memo_hits_return_the_previous_value(key in "[a-z]{1,8}") {
        Registry::scope(|| {
            Registry::current().register_store("lookup", lookup_config()).unwrap();

            let calls = Arc::new(AtomicUsize::new(0));
            let hook = UseSelect::mount_in(
                Registry::current(),
                counting_map_select(&calls),
                Some(vec![json!(key)]),
                || {},
            )
            .unwrap();

            let first = hook.current();
            let second = hook.render(counting_map_select(&calls), Some(vec![json!(key)])).unwrap();

            assert_eq!(Some(second), first);
            assert_eq!(calls.load(Ordering::SeqCst), 1);
        });
    }
}
