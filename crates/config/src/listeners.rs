//! Ordered listener list with identity-keyed removal
//!
//! Listeners are notified in subscription order. `notify` snapshots the list
//! before calling anything, so listeners may subscribe or unsubscribe (even
//! themselves) while a notification is in progress.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

type Callback<T> = Rc<RefCell<dyn FnMut(&T)>>;

struct Entry<T> {
    id: u64,
    callback: Callback<T>,
}

struct Registry<T> {
    next_id: u64,
    entries: Vec<Entry<T>>,
}

impl<T> Registry<T> {
    fn contains(&self, id: u64) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }
}

pub struct ListenerList<T> {
    registry: Rc<RefCell<Registry<T>>>,
}

impl<T: 'static> ListenerList<T> {
    pub fn new() -> Self {
        Self {
            registry: Rc::new(RefCell::new(Registry { next_id: 0, entries: Vec::new() })),
        }
    }

    /// Register a listener. It stays registered until `unsubscribe` is called
    /// on the returned handle (dropping the handle does not unsubscribe).
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: FnMut(&T) + 'static,
    {
        let mut registry = self.registry.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.entries.push(Entry { id, callback: Rc::new(RefCell::new(listener)) });

        let weak: Weak<RefCell<Registry<T>>> = Rc::downgrade(&self.registry);
        Subscription {
            remove: Rc::new(move || {
                if let Some(registry) = weak.upgrade() {
                    registry.borrow_mut().entries.retain(|e| e.id != id);
                }
            }),
        }
    }

    /// Call every listener with `value`, in subscription order.
    ///
    /// A listener removed by an earlier listener during this pass is skipped.
    /// A listener that re-enters `notify` from its own callback is not called
    /// recursively.
    pub fn notify(&self, value: &T) {
        let snapshot: Vec<(u64, Callback<T>)> = self
            .registry
            .borrow()
            .entries
            .iter()
            .map(|e| (e.id, Rc::clone(&e.callback)))
            .collect();

        for (id, callback) in snapshot {
            if !self.registry.borrow().contains(id) {
                continue;
            }
            match callback.try_borrow_mut() {
                Ok(mut f) => f(value),
                Err(_) => log::warn!("skipping re-entrant listener {}", id),
            }
        }
    }

    pub fn len(&self) -> usize {
        self.registry.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: 'static> Default for ListenerList<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle returned by `subscribe`.
///
/// Cloneable so a listener can hold its own handle; `unsubscribe` is
/// idempotent and safe to call from inside a notification.
#[derive(Clone)]
pub struct Subscription {
    remove: Rc<dyn Fn()>,
}

impl Subscription {
    pub fn unsubscribe(&self) {
        (self.remove)();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_notify_in_subscription_order() {
        let list = ListenerList::<u32>::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        for tag in ["a", "b", "c"] {
            let seen = Rc::clone(&seen);
            list.subscribe(move |v: &u32| seen.borrow_mut().push(format!("{}{}", tag, v)));
        }

        list.notify(&1);
        assert_eq!(*seen.borrow(), vec!["a1", "b1", "c1"]);
    }

    #[test]
    fn test_unsubscribe_removes_by_identity() {
        let list = ListenerList::<u32>::new();
        let hits = Rc::new(Cell::new(0));

        let first = {
            let hits = Rc::clone(&hits);
            list.subscribe(move |_| hits.set(hits.get() + 1))
        };
        let _second = {
            let hits = Rc::clone(&hits);
            list.subscribe(move |_| hits.set(hits.get() + 10))
        };

        first.unsubscribe();
        first.unsubscribe();
        assert_eq!(list.len(), 1);

        list.notify(&0);
        assert_eq!(hits.get(), 10);
    }

    #[test]
    fn test_self_unsubscribe_during_notify_keeps_later_listeners() {
        let list = ListenerList::<u32>::new();
        let first_calls = Rc::new(Cell::new(0));
        let second_calls = Rc::new(Cell::new(0));

        let handle: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
        let sub = {
            let handle = Rc::clone(&handle);
            let first_calls = Rc::clone(&first_calls);
            list.subscribe(move |_| {
                first_calls.set(first_calls.get() + 1);
                if let Some(sub) = handle.borrow().as_ref() {
                    sub.unsubscribe();
                }
            })
        };
        *handle.borrow_mut() = Some(sub);

        {
            let second_calls = Rc::clone(&second_calls);
            list.subscribe(move |_| second_calls.set(second_calls.get() + 1));
        }

        list.notify(&1);
        assert_eq!(first_calls.get(), 1);
        assert_eq!(second_calls.get(), 1);

        list.notify(&2);
        assert_eq!(first_calls.get(), 1);
        assert_eq!(second_calls.get(), 2);
    }

    #[test]
    fn test_listener_removed_mid_pass_is_skipped() {
        let list = ListenerList::<u32>::new();
        let later_calls = Rc::new(Cell::new(0));

        let later_handle: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
        {
            let later_handle = Rc::clone(&later_handle);
            list.subscribe(move |_| {
                if let Some(sub) = later_handle.borrow().as_ref() {
                    sub.unsubscribe();
                }
            });
        }
        let later = {
            let later_calls = Rc::clone(&later_calls);
            list.subscribe(move |_| later_calls.set(later_calls.get() + 1))
        };
        *later_handle.borrow_mut() = Some(later);

        list.notify(&1);
        assert_eq!(later_calls.get(), 0);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_subscribe_during_notify_waits_for_next_pass() {
        let list = Rc::new(ListenerList::<u32>::new());
        let added_calls = Rc::new(Cell::new(0));

        {
            let list_ref = Rc::downgrade(&list);
            let added_calls = Rc::clone(&added_calls);
            let done = Cell::new(false);
            list.subscribe(move |_| {
                if done.replace(true) {
                    return;
                }
                if let Some(list) = list_ref.upgrade() {
                    let added_calls = Rc::clone(&added_calls);
                    list.subscribe(move |_| added_calls.set(added_calls.get() + 1));
                }
            });
        }

        list.notify(&1);
        assert_eq!(added_calls.get(), 0);
        list.notify(&2);
        assert_eq!(added_calls.get(), 1);
    }

    #[test]
    fn test_unsubscribe_after_list_dropped_is_noop() {
        let list = ListenerList::<u32>::new();
        let sub = list.subscribe(|_| {});
        drop(list);
        sub.unsubscribe();
    }
}
