//! Typed single-threaded event subjects.
//!
//! Every emitting component (adaptors, the rig, control schemes) owns a
//! [`Subject`] over its own closed event enum. Listeners hold a
//! [`Subscription`] and drain it whenever convenient, usually once per
//! frame after the emitter's `update`.
//!
//! ```
//! use camera_controls::event::Subject;
//!
//! let mut subject = Subject::new();
//! let sub = subject.subscribe();
//! subject.emit(7_u32);
//! assert_eq!(sub.drain(), vec![7]);
//! ```

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::{Rc, Weak};

type Queue<E> = RefCell<VecDeque<E>>;

/// Fan-out point for events of type `E`.
pub struct Subject<E> {
    subscribers: Vec<Weak<Queue<E>>>,
}

impl<E: Clone> Subject<E> {
    /// Subject with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            subscribers: Vec::new(),
        }
    }

    /// Register a new listener. Only events emitted after this call are
    /// delivered to it.
    pub fn subscribe(&mut self) -> Subscription<E> {
        let queue = Rc::new(RefCell::new(VecDeque::new()));
        self.subscribers.push(Rc::downgrade(&queue));
        Subscription { queue }
    }

    /// Deliver `event` to every live subscription. Dropped subscriptions
    /// are pruned.
    pub fn emit(&mut self, event: E) {
        self.subscribers.retain(|weak| match weak.upgrade() {
            Some(queue) => {
                queue.borrow_mut().push_back(event.clone());
                true
            }
            None => false,
        });
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .iter()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }
}

impl<E: Clone> Default for Subject<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for Subject<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subject")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

/// Receiving end of a [`Subject`]. Dropping it unsubscribes.
pub struct Subscription<E> {
    queue: Rc<Queue<E>>,
}

impl<E> Subscription<E> {
    /// Take every pending event, oldest first.
    #[must_use]
    pub fn drain(&self) -> Vec<E> {
        self.queue.borrow_mut().drain(..).collect()
    }

    /// Take the oldest pending event, if any.
    #[must_use]
    pub fn try_next(&self) -> Option<E> {
        self.queue.borrow_mut().pop_front()
    }

    /// Whether no events are pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.borrow().is_empty()
    }
}

impl<E> fmt::Debug for Subscription<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("pending", &self.queue.borrow().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delivers_to_every_subscriber_in_order() {
        let mut subject = Subject::new();
        let a = subject.subscribe();
        let b = subject.subscribe();
        subject.emit(1);
        subject.emit(2);
        assert_eq!(a.drain(), vec![1, 2]);
        assert_eq!(b.try_next(), Some(1));
        assert_eq!(b.try_next(), Some(2));
        assert!(b.is_empty());
    }

    #[test]
    fn late_subscriber_misses_earlier_events() {
        let mut subject = Subject::new();
        subject.emit("early");
        let sub = subject.subscribe();
        subject.emit("late");
        assert_eq!(sub.drain(), vec!["late"]);
    }

    #[test]
    fn dropped_subscription_is_pruned() {
        let mut subject = Subject::new();
        let keep = subject.subscribe();
        let gone = subject.subscribe();
        drop(gone);
        assert_eq!(subject.subscriber_count(), 1);
        subject.emit(3);
        assert_eq!(subject.subscribers.len(), 1);
        assert_eq!(keep.drain(), vec![3]);
    }
}
