//! # Canister
//!
//! Registry-based state management with memoized selector subscriptions.
//!
//! Canister provides three layers for wiring UI components to application
//! state:
//!
//! ## Stores (isolated state units)
//!
//! - `Store` - A pure reducer over a JSON state document
//! - `StoreConfig` - Named selectors and action creators, fixed at
//!   registration
//!
//! ## Registry (aggregation and notification)
//!
//! - `Registry` - Unified select/dispatch/subscribe over named stores
//! - Ambient context: a global default registry, overridable per scope
//!   for test isolation
//!
//! ## Selector subscriptions (the `useSelect` contract)
//!
//! - `UseSelect` - Derives data from stores through a `map_select`
//!   function, memoized against an explicit dependency list
//! - Re-renders its consumer only when a store change makes the derived
//!   value differ

pub mod error;
pub mod registry;
pub mod select;
pub mod store;

// Re-export main types for convenience
pub use error::{DataError, DataResult};
pub use registry::{Dispatcher, Registry, SelectorTable, SubscriptionHandle};
pub use select::{use_select, Latest, MapSelect, RenderScheduler, Select, UseSelect};
pub use store::{Action, State, Store, StoreConfig};
