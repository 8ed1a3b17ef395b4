//! Observable setting values.
//!
//! A `Bindable` is a shared handle: every clone reads and writes the same
//! value, and every subscriber hears about changes made through any clone.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

#[derive(Debug, Clone, PartialEq)]
pub struct ValueChanged<T> {
    pub old: T,
    pub new: T,
}

type Listener<T> = Rc<dyn Fn(&ValueChanged<T>)>;

struct Shared<T> {
    value: RefCell<T>,
    listeners: RefCell<Vec<(u64, Listener<T>)>>,
    next_id: Cell<u64>,
}

pub struct Bindable<T> {
    shared: Rc<Shared<T>>,
}

impl<T: Clone + PartialEq + 'static> Bindable<T> {
    pub fn new(value: T) -> Self {
        Self {
            shared: Rc::new(Shared {
                value: RefCell::new(value),
                listeners: RefCell::new(Vec::new()),
                next_id: Cell::new(0),
            }),
        }
    }

    pub fn get(&self) -> T {
        self.shared.value.borrow().clone()
    }

    /// Stores `value` and notifies subscribers if it differs from the
    /// current one. Listeners run synchronously, once per call.
    pub fn set(&self, value: T) {
        let old = {
            let mut current = self.shared.value.borrow_mut();
            if *current == value {
                return;
            }
            std::mem::replace(&mut *current, value.clone())
        };

        let event = ValueChanged { old, new: value };
        // Snapshot so listeners may subscribe or unsubscribe while running.
        let listeners: Vec<Listener<T>> = self
            .shared
            .listeners
            .borrow()
            .iter()
            .map(|(_, l)| l.clone())
            .collect();
        for listener in listeners {
            listener(&event);
        }
    }

    /// Registers `callback` until the returned `Subscription` is dropped.
    #[must_use = "dropping the subscription unregisters the callback"]
    pub fn subscribe(&self, callback: impl Fn(&ValueChanged<T>) + 'static) -> Subscription {
        let id = self.shared.next_id.get();
        self.shared.next_id.set(id + 1);
        self.shared
            .listeners
            .borrow_mut()
            .push((id, Rc::new(callback)));

        let weak: Weak<Shared<T>> = Rc::downgrade(&self.shared);
        Subscription {
            unsubscribe: Some(Box::new(move || {
                if let Some(shared) = weak.upgrade() {
                    shared.listeners.borrow_mut().retain(|(i, _)| *i != id);
                }
            })),
        }
    }

    #[cfg(test)]
    pub fn listener_count(&self) -> usize {
        self.shared.listeners.borrow().len()
    }
}

impl<T> Clone for Bindable<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Bindable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Bindable")
            .field(&*self.shared.value.borrow())
            .finish()
    }
}

/// Keeps a listener registered; unregisters it on drop.
pub struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce()>>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.unsubscribe.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_value() {
        let a = Bindable::new(0.5f64);
        let b = a.clone();
        b.set(0.8);
        assert_eq!(a.get(), 0.8);
    }

    #[test]
    fn notifies_on_change_only() {
        let flag = Bindable::new(false);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let _sub = flag.subscribe(move |e| sink.borrow_mut().push(e.clone()));

        flag.set(false);
        flag.set(true);
        flag.set(true);

        assert_eq!(*seen.borrow(), vec![ValueChanged { old: false, new: true }]);
    }

    #[test]
    fn dropping_subscription_unregisters() {
        let level = Bindable::new(0.0f64);
        let hits = Rc::new(Cell::new(0));
        let counter = hits.clone();
        let sub = level.subscribe(move |_| counter.set(counter.get() + 1));
        assert_eq!(level.listener_count(), 1);

        level.set(1.0);
        drop(sub);
        level.set(2.0);

        assert_eq!(hits.get(), 1);
        assert_eq!(level.listener_count(), 0);
    }

    #[test]
    fn listener_can_read_new_value() {
        let level = Bindable::new(1);
        let reader = level.clone();
        let observed = Rc::new(Cell::new(0));
        let out = observed.clone();
        let _sub = level.subscribe(move |_| out.set(reader.get()));

        level.set(7);
        assert_eq!(observed.get(), 7);
    }

    #[test]
    fn subscription_outliving_bindable_is_harmless() {
        let sub = {
            let b = Bindable::new(0u8);
            b.subscribe(|_| {})
        };
        drop(sub);
    }
}
