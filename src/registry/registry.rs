use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde_json::Value;
use tracing::{debug, trace};

use crate::error::{DataError, DataResult};
use crate::store::{Action, Store, StoreConfig};

use super::listeners::{ListenerSet, SubscriptionHandle};

/// Aggregate of named stores with unified select, dispatch, and subscribe.
///
/// A registry owns its stores and the ordered listener set; consumers never
/// mutate either directly. Every dispatched action notifies every listener
/// exactly once, synchronously, after the state has settled — dispatches are
/// not coalesced here, that is a scheduler concern.
///
/// # Examples
///
/// ```
/// use canister::{Action, Registry, StoreConfig};
/// use serde_json::json;
///
/// let registry = Registry::new();
/// registry
///     .register_store(
///         "counter",
///         StoreConfig::new(|state, action| match action.kind() {
///             "INCREMENT" => json!(state.as_i64().unwrap_or(0) + 1),
///             _ => {
///                 if state.is_null() {
///                     json!(0)
///                 } else {
///                     state
///                 }
///             }
///         })
///         .selector("value", |state, _| state.clone()),
///     )
///     .unwrap();
///
/// registry
///     .dispatch("counter")
///     .unwrap()
///     .dispatch(Action::bare("INCREMENT"));
///
/// let value = registry
///     .select("counter")
///     .unwrap()
///     .call("value", &[])
///     .unwrap();
/// assert_eq!(value, json!(1));
/// ```
pub struct Registry {
    stores: RwLock<HashMap<String, Arc<Store>>>,
    listeners: Arc<ListenerSet>,
}

impl Registry {
    /// Create a new, empty registry.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            stores: RwLock::new(HashMap::new()),
            listeners: ListenerSet::new(),
        })
    }

    /// Register a store under a unique name.
    ///
    /// Fails with [`DataError::DuplicateStore`] if the name is taken.
    pub fn register_store(&self, name: &str, config: StoreConfig) -> DataResult<Arc<Store>> {
        let mut stores = self.stores.write().unwrap();
        if stores.contains_key(name) {
            return Err(DataError::DuplicateStore(name.to_string()));
        }

        let store = Arc::new(Store::new(name, config));
        stores.insert(name.to_string(), Arc::clone(&store));
        debug!(store = name, "registered store");
        Ok(store)
    }

    /// Look up a registered store by name.
    pub fn store(&self, name: &str) -> DataResult<Arc<Store>> {
        self.stores
            .read()
            .unwrap()
            .get(name)
            .cloned()
            .ok_or_else(|| DataError::UnknownStore(name.to_string()))
    }

    /// Get the selector table of a named store.
    ///
    /// The table is bound to the live store, not a snapshot: every call
    /// reads the state current at call time.
    pub fn select(&self, name: &str) -> DataResult<SelectorTable> {
        Ok(SelectorTable {
            store: self.store(name)?,
        })
    }

    /// Get the action-dispatcher table of a named store.
    pub fn dispatch(&self, name: &str) -> DataResult<Dispatcher> {
        Ok(Dispatcher {
            store: self.store(name)?,
            listeners: Arc::clone(&self.listeners),
        })
    }

    /// Subscribe to state changes across all stores in this registry.
    ///
    /// The listener fires synchronously after any store's dispatch settles.
    /// The returned handle unsubscribes on [`SubscriptionHandle::unsubscribe`]
    /// or on drop.
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionHandle
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.listeners.add(Arc::new(listener))
    }
}

/// A store's selectors, bound to its live state.
pub struct SelectorTable {
    store: Arc<Store>,
}

impl std::fmt::Debug for SelectorTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectorTable")
            .field("store", &self.store)
            .finish()
    }
}

impl SelectorTable {
    /// Invoke a named selector with the given arguments.
    pub fn call(&self, selector: &str, args: &[Value]) -> DataResult<Value> {
        self.store.select(selector, args)
    }
}

/// A store's action creators, bound so that dispatching notifies the
/// owning registry's listeners.
pub struct Dispatcher {
    store: Arc<Store>,
    listeners: Arc<ListenerSet>,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    /// Build an action from a named creator and dispatch it.
    pub fn call(&self, action: &str, args: &[Value]) -> DataResult<()> {
        let action = self.store.action(action, args)?;
        self.dispatch(action);
        Ok(())
    }

    /// Dispatch an action directly to the store's reducer.
    ///
    /// Listeners are notified after the new state is in place, in
    /// subscription order, before this call returns.
    pub fn dispatch(&self, action: Action) {
        trace!(store = self.store.name(), kind = action.kind(), "dispatching");
        self.store.apply(&action);
        self.listeners.notify();
    }
}
