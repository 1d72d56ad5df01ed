//! Observable state cells.
//!
//! A [`MutableState`] is a value plus a list of subscribers. Writers call
//! [`MutableState::set`]; subscribers run synchronously after the write with
//! no borrow held, so they are free to read or write other state.

use smallvec::SmallVec;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

type Subscriber<T> = Rc<dyn Fn(&T)>;

struct StateCell<T> {
    value: RefCell<T>,
    subscribers: RefCell<SmallVec<[(u64, Subscriber<T>); 2]>>,
    next_subscriber_id: Cell<u64>,
}

/// Shared, observable value. Cloning yields another handle to the same cell.
pub struct MutableState<T: 'static> {
    cell: Rc<StateCell<T>>,
}

impl<T: Clone + 'static> MutableState<T> {
    pub fn new(value: T) -> Self {
        Self {
            cell: Rc::new(StateCell {
                value: RefCell::new(value),
                subscribers: RefCell::new(SmallVec::new()),
                next_subscriber_id: Cell::new(1),
            }),
        }
    }

    pub fn get(&self) -> T {
        self.cell.value.borrow().clone()
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.cell.value.borrow())
    }

    /// Writes unconditionally and notifies subscribers.
    pub fn set_value(&self, value: T) {
        self.cell.value.replace(value.clone());
        self.notify(&value);
    }

    /// Read-modify-write. Subscribers are notified once.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        let value = {
            let mut value = self.cell.value.borrow_mut();
            f(&mut value);
            value.clone()
        };
        self.notify(&value);
    }

    pub fn as_state(&self) -> State<T> {
        State {
            cell: self.cell.clone(),
        }
    }

    pub fn subscribe(&self, subscriber: impl Fn(&T) + 'static) -> Subscription {
        subscribe(&self.cell, subscriber)
    }

    fn notify(&self, value: &T) {
        let subscribers: SmallVec<[Subscriber<T>; 2]> = self
            .cell
            .subscribers
            .borrow()
            .iter()
            .map(|(_, subscriber)| subscriber.clone())
            .collect();
        for subscriber in subscribers {
            subscriber(value);
        }
    }
}

impl<T: Clone + PartialEq + 'static> MutableState<T> {
    /// Writes `value` and notifies subscribers only if it differs from the current value.
    ///
    /// Returns whether the value changed.
    pub fn set(&self, value: T) -> bool {
        if *self.cell.value.borrow() == value {
            return false;
        }
        self.set_value(value);
        true
    }
}

impl<T: 'static> Clone for MutableState<T> {
    fn clone(&self) -> Self {
        Self {
            cell: self.cell.clone(),
        }
    }
}

impl<T: Clone + std::fmt::Debug + 'static> std::fmt::Debug for MutableState<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("MutableState")
            .field(&*self.cell.value.borrow())
            .finish()
    }
}

/// Read-only view of a [`MutableState`].
pub struct State<T: 'static> {
    cell: Rc<StateCell<T>>,
}

impl<T: Clone + 'static> State<T> {
    pub fn get(&self) -> T {
        self.cell.value.borrow().clone()
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.cell.value.borrow())
    }

    pub fn subscribe(&self, subscriber: impl Fn(&T) + 'static) -> Subscription {
        subscribe(&self.cell, subscriber)
    }
}

impl<T: 'static> Clone for State<T> {
    fn clone(&self) -> Self {
        Self {
            cell: self.cell.clone(),
        }
    }
}

fn subscribe<T: 'static>(cell: &Rc<StateCell<T>>, subscriber: impl Fn(&T) + 'static) -> Subscription {
    let id = cell.next_subscriber_id.get();
    cell.next_subscriber_id.set(id + 1);
    cell.subscribers
        .borrow_mut()
        .push((id, Rc::new(subscriber)));

    let weak: Weak<StateCell<T>> = Rc::downgrade(cell);
    Subscription {
        unsubscribe: Some(Box::new(move || {
            if let Some(cell) = weak.upgrade() {
                cell.subscribers
                    .borrow_mut()
                    .retain(|(subscriber_id, _)| *subscriber_id != id);
            }
        })),
    }
}

/// Keeps a subscriber registered. Dropping it unsubscribes.
pub struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Keeps the subscriber alive for as long as the state itself.
    pub fn detach(mut self) {
        self.unsubscribe.take();
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

#[cfg(test)]
#[path = "tests/state_tests.rs"]
mod tests;
