//! Scoped event subscriptions.
//!
//! Listeners registered on an [`EventHub`] stay active only while the
//! returned [`Subscription`] is alive; dropping the guard removes them.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

type Listener<E> = Rc<RefCell<dyn FnMut(&E)>>;

struct Registry<E> {
    next_id: u64,
    listeners: BTreeMap<u64, Listener<E>>,
}

/// Single-threaded fan-out of events of type `E`
pub struct EventHub<E> {
    registry: Rc<RefCell<Registry<E>>>,
}

impl<E: 'static> EventHub<E> {
    pub fn new() -> Self {
        Self {
            registry: Rc::new(RefCell::new(Registry {
                next_id: 0,
                listeners: BTreeMap::new(),
            })),
        }
    }

    /// Register `listener`; it is removed when the returned guard drops
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, listener: impl FnMut(&E) + 'static) -> Subscription {
        let id = {
            let mut registry = self.registry.borrow_mut();
            let id = registry.next_id;
            registry.next_id += 1;
            let listener: Listener<E> = Rc::new(RefCell::new(listener));
            registry.listeners.insert(id, listener);
            id
        };

        let weak: Weak<RefCell<Registry<E>>> = Rc::downgrade(&self.registry);
        Subscription {
            unsubscribe: Some(Box::new(move || {
                if let Some(registry) = weak.upgrade() {
                    registry.borrow_mut().listeners.remove(&id);
                }
            })),
        }
    }

    /// Deliver `event` to every live listener in subscription order
    ///
    /// Listeners may subscribe or unsubscribe while the event is delivered;
    /// a listener unsubscribed mid-delivery is skipped. Re-emitting on the
    /// same hub from inside a listener is not supported.
    pub fn emit(&self, event: &E) {
        let snapshot: Vec<(u64, Listener<E>)> = self
            .registry
            .borrow()
            .listeners
            .iter()
            .map(|(id, listener)| (*id, Rc::clone(listener)))
            .collect();

        for (id, listener) in snapshot {
            let live = self.registry.borrow().listeners.contains_key(&id);
            if live {
                (*listener.borrow_mut())(event);
            }
        }
    }

    pub fn listener_count(&self) -> usize {
        self.registry.borrow().listeners.len()
    }
}

impl<E: 'static> Default for EventHub<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Guard keeping a listener registered
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_listener_receives_events() {
        let hub = EventHub::<u32>::new();
        let total = Rc::new(Cell::new(0));
        let seen = Rc::clone(&total);
        let _sub = hub.subscribe(move |v| seen.set(seen.get() + *v));

        hub.emit(&3);
        hub.emit(&4);
        assert_eq!(total.get(), 7);
    }

    #[test]
    fn test_drop_unsubscribes() {
        let hub = EventHub::<u32>::new();
        let calls = Rc::new(Cell::new(0));
        let seen = Rc::clone(&calls);
        let sub = hub.subscribe(move |_| seen.set(seen.get() + 1));
        assert_eq!(hub.listener_count(), 1);

        hub.emit(&0);
        drop(sub);
        hub.emit(&0);

        assert_eq!(calls.get(), 1);
        assert_eq!(hub.listener_count(), 0);
    }

    #[test]
    fn test_subscription_outliving_hub() {
        let hub = EventHub::<()>::new();
        let sub = hub.subscribe(|_| {});
        drop(hub);
        drop(sub);
    }

    #[test]
    fn test_unsubscribe_during_emit() {
        let hub = EventHub::<()>::new();
        let second_calls = Rc::new(Cell::new(0));

        let victim: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
        let victim_handle = Rc::clone(&victim);
        let _first = hub.subscribe(move |_| {
            victim_handle.borrow_mut().take();
        });

        let counter = Rc::clone(&second_calls);
        *victim.borrow_mut() = Some(hub.subscribe(move |_| counter.set(counter.get() + 1)));

        hub.emit(&());
        assert_eq!(second_calls.get(), 0);
        assert_eq!(hub.listener_count(), 1);
    }
}
