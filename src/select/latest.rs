use std::sync::RwLock;

/// A shared cell holding the most recent value of something that changes
/// every render.
///
/// The subscription callback of [`UseSelect`](crate::UseSelect) is created
/// once, at mount, but the consumer's `map_select` closure is replaced on
/// every render. Reading the closure out of this cell at notification time
/// — instead of capturing it when the subscription was created — is what
/// keeps the callback from going stale.
pub struct Latest<T> {
    cell: RwLock<T>,
}

impl<T: Clone> Latest<T> {
    /// Create a cell holding the given value.
    pub fn new(value: T) -> Self {
        Self {
            cell: RwLock::new(value),
        }
    }

    /// Replace the held value.
    pub fn set(&self, value: T) {
        *self.cell.write().unwrap() = value;
    }

    /// Get a clone of the most recently set value.
    pub fn get(&self) -> T {
        self.cell.read().unwrap().clone()
    }
}
