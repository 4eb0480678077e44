//! Scoped registries: isolating stores from the global registry

use serde_json::json;

use canister::{Registry, StoreConfig};

fn main() {
    println!("=== Scoped Registry Example ===\n");

    // Stores registered on the global registry are visible everywhere.
    Registry::global()
        .register_store(
            "settings",
            StoreConfig::new(|_, _| json!({ "theme": "dark" }))
                .selector("theme", |state, _| state["theme"].clone()),
        )
        .unwrap();

    println!("1. Global registry sees `settings`:");
    let theme = Registry::current()
        .select("settings")
        .unwrap()
        .call("theme", &[])
        .unwrap();
    println!("   theme = {theme}");

    // A scope gets a fresh registry: the global stores are not there, and
    // anything registered inside disappears when the scope ends.
    println!("\n2. Inside a scope, `settings` is gone:");
    Registry::scope(|| {
        assert!(Registry::current().select("settings").is_err());
        println!("   select(\"settings\") -> UnknownStore");

        Registry::current()
            .register_store(
                "scratch",
                StoreConfig::new(|_, _| json!(0)).selector("value", |state, _| state.clone()),
            )
            .unwrap();
        println!("   registered `scratch` in the scope");
    });

    println!("\n3. Back outside, the scoped store is gone again:");
    assert!(Registry::current().select("scratch").is_err());
    println!("   select(\"scratch\") -> UnknownStore");

    println!("\n✓ Scoped registry example complete!");
}
