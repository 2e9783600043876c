//! Synchronous value-cell publish/subscribe primitive.
//!
//! # Responsibility
//! - Hold one observable value per cell and notify listeners on every write.
//! - Serve as the substrate for derived state: a derived cell subscribes to
//!   its named dependency cells and recomputes on any dependency write.
//!
//! # Invariants
//! - Writes are atomic: a listener observes either the previous value or the
//!   fully written new value, never a partial mix.
//! - Listeners run synchronously on the writing thread, after the internal
//!   locks are released, so they may freely read or write other cells
//!   (including this one).

use std::sync::{Arc, Mutex};

type Listener<T> = Arc<dyn Fn(&T) + Send + Sync + 'static>;

/// Handle returned by [`Cell::subscribe`]; pass to [`Cell::unsubscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

struct CellState<T> {
    value: T,
    listeners: Vec<(u64, Listener<T>)>,
    next_listener_id: u64,
}

/// Observable value cell.
///
/// Cloning a `Cell` clones the handle, not the value; all clones share one
/// state and one listener set.
pub struct Cell<T> {
    state: Arc<Mutex<CellState<T>>>,
}

impl<T> Clone for Cell<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<T: Clone> Cell<T> {
    /// Creates a cell holding `value` with no listeners.
    pub fn new(value: T) -> Self {
        Self {
            state: Arc::new(Mutex::new(CellState {
                value,
                listeners: Vec::new(),
                next_listener_id: 0,
            })),
        }
    }

    /// Returns a clone of the current value.
    pub fn get(&self) -> T {
        self.lock().value.clone()
    }

    /// Replaces the value and notifies every listener with the new value.
    pub fn set(&self, value: T) {
        let listeners = {
            let mut state = self.lock();
            state.value = value.clone();
            state.listeners.clone()
        };
        for (_, listener) in listeners {
            listener(&value);
        }
    }

    /// Mutates the value in place, then notifies listeners.
    pub fn update(&self, mutate: impl FnOnce(&mut T)) {
        let (value, listeners) = {
            let mut state = self.lock();
            mutate(&mut state.value);
            (state.value.clone(), state.listeners.clone())
        };
        for (_, listener) in listeners {
            listener(&value);
        }
    }

    /// Registers a listener invoked on every subsequent write.
    pub fn subscribe(&self, listener: impl Fn(&T) + Send + Sync + 'static) -> SubscriptionId {
        let mut state = self.lock();
        let id = state.next_listener_id;
        state.next_listener_id += 1;
        state.listeners.push((id, Arc::new(listener)));
        SubscriptionId(id)
    }

    /// Removes a listener; unknown ids are ignored.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.lock().listeners.retain(|(lid, _)| *lid != id.0);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, CellState<T>> {
        // A poisoned cell only means a listener panicked mid-notification;
        // the stored value itself is always complete.
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::Cell;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn set_replaces_value_and_notifies_synchronously() {
        let cell = Cell::new(1);
        let seen = Arc::new(AtomicUsize::new(0));
        let sink = Arc::clone(&seen);
        cell.subscribe(move |value| sink.store(*value, Ordering::SeqCst));

        cell.set(42);
        assert_eq!(cell.get(), 42);
        assert_eq!(seen.load(Ordering::SeqCst), 42);
    }

    #[test]
    fn listener_may_read_the_cell_it_observes() {
        let cell = Cell::new(0);
        let mirror = Cell::new(0);
        let observed = cell.clone();
        let target = mirror.clone();
        cell.subscribe(move |_| target.set(observed.get()));

        cell.set(7);
        assert_eq!(mirror.get(), 7);
    }

    #[test]
    fn derived_cell_recomputes_from_two_dependencies() {
        let left = Cell::new(2);
        let right = Cell::new(3);
        let sum = Cell::new(5);

        let recompute = {
            let (left, right, sum) = (left.clone(), right.clone(), sum.clone());
            Arc::new(move || sum.set(left.get() + right.get()))
        };
        let hook = Arc::clone(&recompute);
        left.subscribe(move |_| hook());
        let hook = Arc::clone(&recompute);
        right.subscribe(move |_| hook());

        left.set(10);
        assert_eq!(sum.get(), 13);
        right.set(30);
        assert_eq!(sum.get(), 40);
    }

    #[test]
    fn unsubscribe_stops_notifications() {
        let cell = Cell::new(0);
        let count = Arc::new(AtomicUsize::new(0));
        let sink = Arc::clone(&count);
        let id = cell.subscribe(move |_| {
            sink.fetch_add(1, Ordering::SeqCst);
        });

        cell.set(1);
        cell.unsubscribe(id);
        cell.set(2);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn update_mutates_in_place() {
        let cell = Cell::new(vec![1, 2]);
        cell.update(|values| values.push(3));
        assert_eq!(cell.get(), vec![1, 2, 3]);
    }
}
