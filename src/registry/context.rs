use std::cell::RefCell;
use std::sync::Arc;

use super::registry::Registry;

// Thread-local stack for scoped registries
thread_local! {
    static REGISTRY_STACK: RefCell<Vec<Arc<Registry>>> = RefCell::new(vec![]);
}

/// Ambient registry context.
///
/// The default registry is a process-wide singleton, but any dynamic extent
/// can override it with its own instance — nested components see the
/// innermost override. This is how tests isolate their stores from the rest
/// of the process.
impl Registry {
    /// Get or create the global registry (fallback).
    ///
    /// This is used as the default registry when no scoped registry is
    /// active.
    pub fn global() -> Arc<Self> {
        use std::sync::OnceLock;
        static REGISTRY: OnceLock<Arc<Registry>> = OnceLock::new();
        Arc::clone(REGISTRY.get_or_init(Self::new))
    }

    /// Get the current registry (scoped or global fallback).
    ///
    /// Returns the registry from the top of the thread-local stack, or the
    /// global registry if no scoped registry is active.
    pub fn current() -> Arc<Self> {
        REGISTRY_STACK.with(|stack| {
            stack
                .borrow()
                .last()
                .cloned()
                .unwrap_or_else(Self::global)
        })
    }

    /// Run a function with a fresh isolated registry as the current context.
    ///
    /// The registry and all its stores are dropped when the function
    /// returns.
    ///
    /// # Examples
    ///
    /// ```
    /// use canister::{Registry, StoreConfig};
    /// use serde_json::json;
    ///
    /// Registry::scope(|| {
    ///     let registry = Registry::current();
    ///     registry
    ///         .register_store("scratch", StoreConfig::new(|_, _| json!({})))
    ///         .unwrap();
    ///     assert!(registry.select("scratch").is_ok());
    /// });
    /// // The scoped registry and its stores are gone here
    /// assert!(Registry::current().select("scratch").is_err());
    /// ```
    pub fn scope<F, R>(f: F) -> R
    where
        F: FnOnce() -> R,
    {
        Self::with_registry(Self::new(), f)
    }

    /// Run a function with a specific registry as the current context.
    ///
    /// This pushes the registry onto the thread-local stack for the
    /// duration of the function execution.
    ///
    /// # Examples
    ///
    /// ```
    /// use canister::{Registry, StoreConfig};
    /// use serde_json::json;
    ///
    /// let registry = Registry::new();
    /// registry
    ///     .register_store("prefs", StoreConfig::new(|_, _| json!({ "theme": "dark" })))
    ///     .unwrap();
    ///
    /// Registry::with_registry(registry.clone(), || {
    ///     assert!(Registry::current().select("prefs").is_ok());
    /// });
    /// ```
    pub fn with_registry<F, R>(registry: Arc<Self>, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        REGISTRY_STACK.with(|stack| {
            stack.borrow_mut().push(registry);
        });

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(f));

        REGISTRY_STACK.with(|stack| {
            stack.borrow_mut().pop();
        });

        match result {
            Ok(r) => r,
            Err(e) => std::panic::resume_unwind(e),
        }
    }
}
