use serde_json::Value;

/// Element-wise shallow comparison of two dependency lists.
///
/// A length difference counts as a change.
pub(crate) fn changed(prev: &[Value], next: &[Value]) -> bool {
    prev.len() != next.len() || prev.iter().zip(next).any(|(a, b)| a != b)
}

/// Whether a render may reuse the memoized value.
///
/// Only an unchanged, explicitly supplied dependency list is a hit; with no
/// list at all the consumer asked to recompute on every render.
pub(crate) fn memo_hit(prev: Option<&[Value]>, next: Option<&[Value]>) -> bool {
    match (prev, next) {
        (Some(prev), Some(next)) => !changed(prev, next),
        _ => false,
    }
}
