use thiserror::Error;

/// Result type for registry and store operations.
pub type DataResult<T> = std::result::Result<T, DataError>;

/// Errors surfaced by registry lookups and store registration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataError {
    #[error("store `{0}` is already registered")]
    DuplicateStore(String),

    #[error("no store named `{0}` is registered")]
    UnknownStore(String),

    #[error("store `{store}` has no selector `{selector}`")]
    UnknownSelector { store: String, selector: String },

    #[error("store `{store}` has no action creator `{action}`")]
    UnknownAction { store: String, action: String },
}
