//! Complete counter application demonstrating stores, dispatch, and a
//! selector subscription together

use serde_json::{json, Value};

use canister::{Action, Registry, StoreConfig, UseSelect};

fn counter_store() -> StoreConfig {
    StoreConfig::new(|state, action| {
        let count = state["count"].as_i64().unwrap_or(0);
        let step = state["step"].as_i64().unwrap_or(1);
        match action.kind() {
            "INCREMENT" => json!({ "count": count + step, "step": step }),
            "DECREMENT" => json!({ "count": count - step, "step": step }),
            "SET_STEP" => json!({ "count": count, "step": action.payload() }),
            "RESET" => json!({ "count": 0, "step": step }),
            _ => {
                if state.is_null() {
                    json!({ "count": 0, "step": 1 })
                } else {
                    state
                }
            }
        }
    })
    .selector("count", |state, _| state["count"].clone())
    .selector("isPositive", |state, _| {
        json!(state["count"].as_i64().unwrap_or(0) > 0)
    })
    .action("increment", |_| Action::bare("INCREMENT"))
    .action("decrement", |_| Action::bare("DECREMENT"))
    .action("setStep", |args| {
        Action::new("SET_STEP", args.first().cloned().unwrap_or(json!(1)))
    })
    .action("reset", |_| Action::bare("RESET"))
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== Complete Counter Application ===\n");

    println!("1. Registering the counter store");
    let registry = Registry::current();
    registry.register_store("counter", counter_store()).unwrap();

    println!("\n2. Mounting a selector subscription");
    let hook = UseSelect::<Value>::mount_in(
        registry.clone(),
        |select| select.store("counter")?.call("count", &[]),
        Some(vec![]),
        || println!("   [Render] count changed, component re-renders"),
    )
    .unwrap();
    println!("   Initial count: {}", hook.current().unwrap());

    let dispatcher = registry.dispatch("counter").unwrap();

    println!("\n3. Incrementing...");
    dispatcher.call("increment", &[]).unwrap();
    dispatcher.call("increment", &[]).unwrap();
    println!("   Count: {}", hook.current().unwrap());

    println!("\n4. Changing step size to 5");
    dispatcher.call("setStep", &[json!(5)]).unwrap();

    println!("\n5. Incrementing with new step...");
    dispatcher.call("increment", &[]).unwrap();
    println!("   Count: {}", hook.current().unwrap());

    println!("\n6. Decrementing...");
    dispatcher.call("decrement", &[]).unwrap();
    dispatcher.call("decrement", &[]).unwrap();
    println!("   Count: {}", hook.current().unwrap());

    println!("\n7. Reading a derived flag through the selector table");
    let is_positive = registry
        .select("counter")
        .unwrap()
        .call("isPositive", &[])
        .unwrap();
    println!("   isPositive: {is_positive}");

    println!("\n8. Resetting...");
    dispatcher.call("reset", &[]).unwrap();
    println!("   Count: {}", hook.current().unwrap());

    println!("\n9. Unmounting; further dispatches are ignored");
    hook.unmount();
    dispatcher.call("increment", &[]).unwrap();

    println!("\n✓ Counter application complete!");
}
