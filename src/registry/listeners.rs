use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Weak};

use tracing::trace;

pub(crate) type Listener = Arc<dyn Fn() + Send + Sync>;

/// Ordered set of registry subscribers.
///
/// Listeners are invoked in subscription order, exactly once per
/// notification. Removal is keyed by the id handed out at insertion, so
/// unsubscribing one listener never disturbs the others.
pub(crate) struct ListenerSet {
    entries: Mutex<Vec<(usize, Listener)>>,
    next_id: AtomicUsize,
}

impl ListenerSet {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            entries: Mutex::new(Vec::new()),
            next_id: AtomicUsize::new(0),
        })
    }

    pub(crate) fn add(self: &Arc<Self>, listener: Listener) -> SubscriptionHandle {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.entries.lock().unwrap().push((id, listener));
        trace!(listener = id, "subscribed");

        SubscriptionHandle {
            id,
            set: Arc::downgrade(self),
            active: AtomicBool::new(true),
        }
    }

    pub(crate) fn remove(&self, id: usize) {
        let mut entries = self.entries.lock().unwrap();
        entries.retain(|(entry_id, _)| *entry_id != id);
        trace!(listener = id, "unsubscribed");
    }

    /// Invoke every listener, in subscription order.
    ///
    /// The list is snapshotted first, so a listener may subscribe or
    /// unsubscribe mid-notification without poisoning the iteration; a
    /// removal only takes effect from the next notification onward.
    pub(crate) fn notify(&self) {
        let snapshot: Vec<Listener> = self
            .entries
            .lock()
            .unwrap()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in snapshot {
            listener();
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }
}

/// Handle returned by [`Registry::subscribe`](crate::Registry::subscribe).
///
/// `unsubscribe` removes exactly the listener this handle was created for
/// and is idempotent. Dropping the handle unsubscribes as well.
pub struct SubscriptionHandle {
    id: usize,
    set: Weak<ListenerSet>,
    active: AtomicBool,
}

impl SubscriptionHandle {
    /// Remove the listener from the registry. Calling this a second time is
    /// a no-op.
    pub fn unsubscribe(&self) {
        if self.active.swap(false, Ordering::AcqRel) {
            if let Some(set) = self.set.upgrade() {
                set.remove(self.id);
            }
        }
    }

    /// Whether the listener is still registered through this handle.
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }
}

impl Drop for SubscriptionHandle {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notifies_in_subscription_order() {
        let set = ListenerSet::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        let handles: Vec<_> = (0..3)
            .map(|n| {
                let order = Arc::clone(&order);
                set.add(Arc::new(move || order.lock().unwrap().push(n)))
            })
            .collect();

        set.notify();
        set.notify();

        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2, 0, 1, 2]);
        drop(handles);
    }

    #[test]
    fn unsubscribe_removes_exactly_one_listener() {
        let set = ListenerSet::new();
        let first = set.add(Arc::new(|| {}));
        let _second = set.add(Arc::new(|| {}));

        first.unsubscribe();
        assert_eq!(set.len(), 1);
        assert!(!first.is_active());
    }

    #[test]
    fn unsubscribe_twice_is_a_no_op() {
        let set = ListenerSet::new();
        let handle = set.add(Arc::new(|| {}));
        let _other = set.add(Arc::new(|| {}));

        handle.unsubscribe();
        handle.unsubscribe();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn dropping_the_handle_unsubscribes() {
        let set = ListenerSet::new();
        {
            let _handle = set.add(Arc::new(|| {}));
            assert_eq!(set.len(), 1);
        }
        assert_eq!(set.len(), 0);
    }

    #[test]
    fn unsubscribing_mid_notification_is_safe() {
        let set = ListenerSet::new();
        let count = Arc::new(AtomicUsize::new(0));

        let handle: Arc<Mutex<Option<SubscriptionHandle>>> = Arc::new(Mutex::new(None));
        let listener = {
            let count = Arc::clone(&count);
            let handle = Arc::clone(&handle);
            set.add(Arc::new(move || {
                count.fetch_add(1, Ordering::SeqCst);
                if let Some(handle) = handle.lock().unwrap().take() {
                    handle.unsubscribe();
                }
            }))
        };
        *handle.lock().unwrap() = Some(listener);

        set.notify();
        set.notify();

        // The listener removed itself during the first notification.
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
