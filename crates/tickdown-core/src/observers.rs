//! Explicit observer lists for store change notification.
//!
//! Each store owns one `Observers` and notifies it synchronously after a
//! mutation has been persisted. There is no ambient global registry;
//! subscription and teardown are explicit.

/// Handle returned by `subscribe`, used to unsubscribe later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

pub(crate) struct Observers<T: ?Sized> {
    next_id: u64,
    entries: Vec<(SubscriberId, Box<dyn FnMut(&T)>)>,
}

impl<T: ?Sized> Observers<T> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&T) + 'static) -> SubscriberId {
        let id = SubscriberId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, Box::new(callback)));
        id
    }

    /// Returns whether the subscriber was present.
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    pub fn notify(&mut self, value: &T) {
        for (_, callback) in &mut self.entries {
            callback(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn subscribers_receive_notifications_in_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut observers: Observers<u32> = Observers::new();

        let first = Rc::clone(&seen);
        observers.subscribe(move |n| first.borrow_mut().push(("first", *n)));
        let second = Rc::clone(&seen);
        observers.subscribe(move |n| second.borrow_mut().push(("second", *n)));

        observers.notify(&7);
        assert_eq!(*seen.borrow(), vec![("first", 7), ("second", 7)]);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let count = Rc::new(RefCell::new(0));
        let mut observers: Observers<u32> = Observers::new();

        let counter = Rc::clone(&count);
        let id = observers.subscribe(move |_| *counter.borrow_mut() += 1);

        observers.notify(&1);
        assert!(observers.unsubscribe(id));
        observers.notify(&2);

        assert_eq!(*count.borrow(), 1);
        assert!(!observers.unsubscribe(id));
    }
}
