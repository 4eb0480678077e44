use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde_json::Value;
use tracing::trace;

use crate::error::{DataError, DataResult};

use super::action::Action;

/// Store state. Each store owns a single JSON document, replaced atomically
/// on every dispatched action.
pub type State = Value;

type Reducer = Arc<dyn Fn(State, &Action) -> State + Send + Sync>;
type SelectorFn = Arc<dyn Fn(&State, &[Value]) -> Value + Send + Sync>;
type ActionCreator = Arc<dyn Fn(&[Value]) -> Action + Send + Sync>;

/// Configuration for a store: a reducer plus named selectors and action
/// creators.
///
/// The selector and action tables are fixed at registration time; invoking
/// a name that was never configured is a usage error, not a silent miss.
pub struct StoreConfig {
    reducer: Reducer,
    selectors: HashMap<String, SelectorFn>,
    actions: HashMap<String, ActionCreator>,
    initial_state: Option<State>,
}

impl StoreConfig {
    /// Create a config with the given reducer.
    ///
    /// The reducer must be pure: given the previous state and an action, it
    /// returns the next state without side effects.
    pub fn new<R>(reducer: R) -> Self
    where
        R: Fn(State, &Action) -> State + Send + Sync + 'static,
    {
        Self {
            reducer: Arc::new(reducer),
            selectors: HashMap::new(),
            actions: HashMap::new(),
            initial_state: None,
        }
    }

    /// Add a named selector: a pure read of the store's state.
    pub fn selector<F>(mut self, name: impl Into<String>, selector: F) -> Self
    where
        F: Fn(&State, &[Value]) -> Value + Send + Sync + 'static,
    {
        self.selectors.insert(name.into(), Arc::new(selector));
        self
    }

    /// Add a named action creator.
    pub fn action<F>(mut self, name: impl Into<String>, creator: F) -> Self
    where
        F: Fn(&[Value]) -> Action + Send + Sync + 'static,
    {
        self.actions.insert(name.into(), Arc::new(creator));
        self
    }

    /// Seed the store with an explicit initial state instead of `Null`.
    ///
    /// The reducer still runs once over this state with the init action.
    pub fn initial_state(mut self, state: State) -> Self {
        self.initial_state = Some(state);
        self
    }
}

/// An isolated unit of state: a pure reducer, named selectors, and the
/// current state document.
///
/// Stores never notify anyone themselves. Dispatch goes through the
/// registry, which applies the reducer here and then notifies its
/// subscribers once the state has settled.
pub struct Store {
    name: String,
    reducer: Reducer,
    selectors: HashMap<String, SelectorFn>,
    actions: HashMap<String, ActionCreator>,
    state: RwLock<State>,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("name", &self.name)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl Store {
    pub(crate) fn new(name: &str, config: StoreConfig) -> Self {
        let seed = config.initial_state.unwrap_or(Value::Null);
        // Prime the state by running the reducer once with the init action.
        let state = (config.reducer)(seed, &Action::init());

        Self {
            name: name.to_string(),
            reducer: config.reducer,
            selectors: config.selectors,
            actions: config.actions,
            state: RwLock::new(state),
        }
    }

    /// The name this store is registered under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invoke a named selector against the current state.
    pub fn select(&self, selector: &str, args: &[Value]) -> DataResult<Value> {
        let selector_fn = self
            .selectors
            .get(selector)
            .ok_or_else(|| DataError::UnknownSelector {
                store: self.name.clone(),
                selector: selector.to_string(),
            })?;

        let state = self.state.read().unwrap();
        Ok(selector_fn(&state, args))
    }

    /// Build an action from a named creator.
    pub(crate) fn action(&self, name: &str, args: &[Value]) -> DataResult<Action> {
        let creator = self
            .actions
            .get(name)
            .ok_or_else(|| DataError::UnknownAction {
                store: self.name.clone(),
                action: name.to_string(),
            })?;

        Ok(creator(args))
    }

    /// Apply an action through the reducer, replacing the state atomically.
    ///
    /// A panicking reducer unwinds to the dispatch caller with the previous
    /// state still in place.
    pub(crate) fn apply(&self, action: &Action) {
        let current = self.state.read().unwrap().clone();
        let next = (self.reducer)(current, action);
        *self.state.write().unwrap() = next;
        trace!(store = %self.name, kind = action.kind(), "applied action");
    }

    /// Get a clone of the current state.
    pub fn state(&self) -> State {
        self.state.read().unwrap().clone()
    }

    /// Read the current state without cloning.
    pub fn with_state<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&State) -> R,
    {
        let state = self.state.read().unwrap();
        f(&state)
    }
}
