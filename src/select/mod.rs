//! The selector-subscription core.
//!
//! This module provides the `useSelect` contract: a consumer derives data
//! from one or more stores through a `map_select` function, memoized
//! against an explicit dependency list, and is re-rendered only when a
//! store change makes the derived value differ.

mod deps;
mod hook;
mod latest;

pub use hook::{use_select, MapSelect, RenderScheduler, Select, UseSelect};
pub use latest::Latest;
