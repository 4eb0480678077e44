//! Store registry and subscription plumbing.
//!
//! The registry aggregates named stores behind a unified
//! select/dispatch/subscribe surface and owns the ordered listener set.
//! An ambient registry (global by default, overridable per scope) is
//! available through [`Registry::current`].

mod context;
mod listeners;
mod registry;

pub use listeners::SubscriptionHandle;
pub use registry::{Dispatcher, Registry, SelectorTable};
