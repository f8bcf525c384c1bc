//! Shared state container with change notification.

use tokio::sync::watch;

/// A shared, observable state container.
///
/// `StateCell` holds a single value behind a [`watch`] channel. Handles are
/// cheap to clone and all point at the same value; every mutation publishes
/// the new value to subscribers. This is the injection point for state that
/// several components read and one component owns: the cart items, the
/// product list, the current identity.
///
/// Reads return clones (or run a closure against a borrow); writers mutate
/// in place under the channel's internal lock. There is no async locking:
/// mutations are synchronous and subscribers observe them via
/// [`StateCell::subscribe`].
#[derive(Debug)]
pub struct StateCell<T> {
    tx: watch::Sender<T>,
}

impl<T> Clone for StateCell<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<T: Default> Default for StateCell<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> StateCell<T> {
    /// Creates a cell holding `initial`.
    pub fn new(initial: T) -> Self {
        Self {
            tx: watch::Sender::new(initial),
        }
    }

    /// Runs `f` against the current value without cloning it.
    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.tx.borrow())
    }

    /// Replaces the value, notifying subscribers.
    pub fn set(&self, value: T) {
        self.tx.send_replace(value);
    }

    /// Mutates the value in place, notifying subscribers.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        self.tx.send_modify(f);
    }

    /// Returns a receiver that observes every subsequent change.
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }
}

impl<T: Clone> StateCell<T> {
    /// Returns a clone of the current value.
    pub fn get(&self) -> T {
        self.tx.borrow().clone()
    }
}
