use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use serde_json::Value;
use tracing::trace;

use crate::error::{DataError, DataResult};
use crate::registry::{Registry, SelectorTable, SubscriptionHandle};

use super::deps;
use super::latest::Latest;

/// Consumer-supplied derivation over registry state.
pub type MapSelect<T> = Arc<dyn Fn(&Select) -> DataResult<T> + Send + Sync>;

/// Callback invoked when a subscribed hook needs its consumer re-rendered.
pub type RenderScheduler = Arc<dyn Fn() + Send + Sync>;

type EqFn<T> = Arc<dyn Fn(&T, &T) -> bool + Send + Sync>;

/// The read capability handed to a `map_select` function.
///
/// Wraps the registry the hook is mounted in and exposes live-bound
/// selector tables.
pub struct Select {
    registry: Arc<Registry>,
}

impl Select {
    pub(crate) fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    /// Get the selector table of a named store.
    pub fn store(&self, name: &str) -> DataResult<SelectorTable> {
        self.registry.select(name)
    }
}

struct Shared<T> {
    registry: Arc<Registry>,
    map_select: Latest<MapSelect<T>>,
    last: RwLock<Option<T>>,
    pending_error: Mutex<Option<DataError>>,
    mounted: AtomicBool,
    eq: EqFn<T>,
    schedule_render: RenderScheduler,
}

impl<T: Clone + Send + Sync + 'static> Shared<T> {
    /// Registry notification path: recompute with the latest `map_select`
    /// and schedule a render only if the derived value actually changed.
    fn on_store_change(&self) {
        if !self.mounted.load(Ordering::Acquire) {
            return;
        }

        let map_select = self.map_select.get();
        let select = Select::new(Arc::clone(&self.registry));

        match map_select(&select) {
            Ok(next) => {
                let mut last = self.last.write().unwrap();
                let unchanged = match last.as_ref() {
                    Some(prev) => (self.eq)(prev, &next),
                    None => false,
                };
                if unchanged {
                    trace!("derived value unchanged, render suppressed");
                    return;
                }
                *last = Some(next);
                drop(last);
                (self.schedule_render)();
            }
            Err(err) => {
                // Errors cannot unwind through the registry's notification
                // loop; park them for the next render to surface.
                *self.pending_error.lock().unwrap() = Some(err);
                (self.schedule_render)();
            }
        }
    }
}

/// A memoized selector subscription: the `useSelect` contract as an
/// explicit object.
///
/// A hook instance belongs to one consuming component instance. It computes
/// a derived value from registry state at mount, re-renders the consumer
/// through a scheduler callback when a store change makes the derived value
/// differ, and memoizes against an explicit dependency list across
/// re-renders.
///
/// Lifecycle: mount (eager synchronous compute, then subscribe) →
/// subscribed (dependency compare on [`render`](Self::render), equality
/// compare on store change) → unmount (unsubscribe exactly once; late
/// notifications are no-ops).
///
/// # Examples
///
/// ```
/// use canister::{Registry, StoreConfig, UseSelect};
/// use serde_json::{json, Value};
///
/// Registry::scope(|| {
///     let registry = Registry::current();
///     registry
///         .register_store(
///             "prefs",
///             StoreConfig::new(|_, _| json!({ "theme": "dark" })).selector(
///                 "get",
///                 |state, args| {
///                     let key = args[0].as_str().unwrap_or_default();
///                     state.get(key).cloned().unwrap_or(Value::Null)
///                 },
///             ),
///         )
///         .unwrap();
///
///     let hook = UseSelect::mount_in(
///         registry,
///         |select| select.store("prefs")?.call("get", &[json!("theme")]),
///         Some(vec![json!("theme")]),
///         || {},
///     )
///     .unwrap();
///
///     assert_eq!(hook.current(), Some(json!("dark")));
/// });
/// ```
pub struct UseSelect<T> {
    shared: Arc<Shared<T>>,
    deps: Mutex<Option<Vec<Value>>>,
    subscription: SubscriptionHandle,
}

impl<T> std::fmt::Debug for UseSelect<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UseSelect")
            .field("deps", &self.deps)
            .finish_non_exhaustive()
    }
}

impl<T: Clone + PartialEq + Send + Sync + 'static> UseSelect<T> {
    /// Mount a hook in the current ambient registry.
    pub fn mount<F, S>(
        map_select: F,
        dependencies: Option<Vec<Value>>,
        schedule_render: S,
    ) -> DataResult<Self>
    where
        F: Fn(&Select) -> DataResult<T> + Send + Sync + 'static,
        S: Fn() + Send + Sync + 'static,
    {
        Self::mount_in(Registry::current(), map_select, dependencies, schedule_render)
    }

    /// Mount a hook in an explicit registry.
    ///
    /// The derived value is computed eagerly, before this returns, and the
    /// registry subscription is established in the same synchronous step.
    /// Results are compared with `PartialEq`; use
    /// [`mount_in_with_eq`](Self::mount_in_with_eq) to override.
    pub fn mount_in<F, S>(
        registry: Arc<Registry>,
        map_select: F,
        dependencies: Option<Vec<Value>>,
        schedule_render: S,
    ) -> DataResult<Self>
    where
        F: Fn(&Select) -> DataResult<T> + Send + Sync + 'static,
        S: Fn() + Send + Sync + 'static,
    {
        Self::mount_in_with_eq(registry, map_select, dependencies, schedule_render, |a, b| {
            a == b
        })
    }
}

impl<T: Clone + Send + Sync + 'static> UseSelect<T> {
    /// Mount with a custom equality check for derived values.
    ///
    /// The check gates the notification path: a recomputed value the check
    /// deems equal to the memoized one does not schedule a render.
    pub fn mount_in_with_eq<F, S, E>(
        registry: Arc<Registry>,
        map_select: F,
        dependencies: Option<Vec<Value>>,
        schedule_render: S,
        eq: E,
    ) -> DataResult<Self>
    where
        F: Fn(&Select) -> DataResult<T> + Send + Sync + 'static,
        S: Fn() + Send + Sync + 'static,
        E: Fn(&T, &T) -> bool + Send + Sync + 'static,
    {
        let map_select: MapSelect<T> = Arc::new(map_select);

        // Eager mount-time computation. If it fails, nothing was subscribed
        // and the error propagates to the caller.
        let value = map_select(&Select::new(Arc::clone(&registry)))?;

        let shared = Arc::new(Shared {
            registry: Arc::clone(&registry),
            map_select: Latest::new(Arc::clone(&map_select)),
            last: RwLock::new(Some(value)),
            pending_error: Mutex::new(None),
            mounted: AtomicBool::new(true),
            eq: Arc::new(eq),
            schedule_render: Arc::new(schedule_render),
        });

        let subscription = registry.subscribe({
            let shared = Arc::clone(&shared);
            move || shared.on_store_change()
        });

        Ok(Self {
            shared,
            deps: Mutex::new(dependencies),
            subscription,
        })
    }

    /// Per-render entry point.
    ///
    /// Installs `map_select` as the latest derivation, then decides whether
    /// to recompute: an unchanged dependency list returns the memoized
    /// value without invoking `map_select` — the dependency list, not the
    /// closure's identity, is the sole arbiter. A changed list (or no list
    /// at all) recomputes synchronously.
    ///
    /// An error parked by the notification path is returned here, once.
    pub fn render<F>(&self, map_select: F, dependencies: Option<Vec<Value>>) -> DataResult<T>
    where
        F: Fn(&Select) -> DataResult<T> + Send + Sync + 'static,
    {
        let map_select: MapSelect<T> = Arc::new(map_select);
        self.shared.map_select.set(Arc::clone(&map_select));

        if let Some(err) = self.shared.pending_error.lock().unwrap().take() {
            return Err(err);
        }

        let mut deps = self.deps.lock().unwrap();
        if deps::memo_hit(deps.as_deref(), dependencies.as_deref()) {
            if let Some(value) = self.shared.last.read().unwrap().clone() {
                trace!("dependencies unchanged, returning memoized value");
                return Ok(value);
            }
        }

        let value = map_select(&Select::new(Arc::clone(&self.shared.registry)))?;
        *self.shared.last.write().unwrap() = Some(value.clone());
        *deps = dependencies;
        Ok(value)
    }

    /// The most recently derived value.
    pub fn current(&self) -> Option<T> {
        self.shared.last.read().unwrap().clone()
    }
}

impl<T> UseSelect<T> {
    /// Whether the hook is still mounted.
    pub fn is_mounted(&self) -> bool {
        self.shared.mounted.load(Ordering::Acquire)
    }

    /// Tear down the subscription.
    ///
    /// Unsubscribes exactly once; later calls are no-ops, and a
    /// notification already in flight when this runs is silently dropped
    /// by the mounted guard. Dropping the hook unmounts as well.
    pub fn unmount(&self) {
        if self.shared.mounted.swap(false, Ordering::AcqRel) {
            self.subscription.unsubscribe();
            trace!("selector subscription torn down");
        }
    }
}

impl<T> Drop for UseSelect<T> {
    fn drop(&mut self) {
        self.unmount();
    }
}

/// Mount a [`UseSelect`] hook in the current ambient registry.
///
/// Free-function form of [`UseSelect::mount`].
pub fn use_select<T, F, S>(
    map_select: F,
    dependencies: Option<Vec<Value>>,
    schedule_render: S,
) -> DataResult<UseSelect<T>>
where
    T: Clone + PartialEq + Send + Sync + 'static,
    F: Fn(&Select) -> DataResult<T> + Send + Sync + 'static,
    S: Fn() + Send + Sync + 'static,
{
    UseSelect::mount(map_select, dependencies, schedule_render)
}
