//! Store example with list-shaped state and parameterized selectors

use serde_json::{json, Value};

use canister::{Action, Registry, StoreConfig};

fn todos_store() -> StoreConfig {
    StoreConfig::new(|state, action| match action.kind() {
        "ADD" => {
            let mut todos = state.as_array().cloned().unwrap_or_default();
            todos.push(json!({
                "text": action.payload()["text"],
                "completed": false,
            }));
            Value::Array(todos)
        }
        "COMPLETE" => {
            let index = action.payload().as_u64().unwrap_or(0) as usize;
            let mut todos = state.as_array().cloned().unwrap_or_default();
            if let Some(todo) = todos.get_mut(index) {
                todo["completed"] = json!(true);
            }
            Value::Array(todos)
        }
        _ => {
            if state.is_null() {
                json!([])
            } else {
                state
            }
        }
    })
    .selector("all", |state, _| state.clone())
    .selector("active", |state, _| {
        let active: Vec<Value> = state
            .as_array()
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .filter(|todo| todo["completed"] == json!(false))
            .collect();
        Value::Array(active)
    })
    .action("add", |args| {
        Action::new("ADD", json!({ "text": args.first().cloned().unwrap_or(Value::Null) }))
    })
    .action("complete", |args| {
        Action::new("COMPLETE", args.first().cloned().unwrap_or(json!(0)))
    })
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== Todo Store Example ===\n");

    let registry = Registry::current();
    registry.register_store("todos", todos_store()).unwrap();

    // Subscribe to state changes
    let store = registry.store("todos").unwrap();
    let _subscription = registry.subscribe(move || {
        let active = store.with_state(|state| {
            state
                .as_array()
                .map(|todos| {
                    todos
                        .iter()
                        .filter(|todo| todo["completed"] == json!(false))
                        .count()
                })
                .unwrap_or(0)
        });
        println!("State updated! Active todos: {active}");
    });

    let dispatcher = registry.dispatch("todos").unwrap();

    println!("Adding todos...");
    dispatcher.call("add", &[json!("Learn Canister")]).unwrap();
    dispatcher.call("add", &[json!("Ship the editor")]).unwrap();

    println!("\nCompleting the first todo...");
    dispatcher.call("complete", &[json!(0)]).unwrap();

    println!("\nRemaining active todos:");
    let active = registry.select("todos").unwrap().call("active", &[]).unwrap();
    println!("{active:#}");
}
