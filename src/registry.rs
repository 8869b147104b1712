//! Registry of gene keys that have announced themselves as active.
//!
//! DESIGN
//! ======
//! Membership is append-only and keeps insertion order, so snapshots list
//! genes in the order they mounted. Registering a key twice is a no-op and
//! does not notify. Observers receive the full key list after each new key.
//! An observer that registers another key starts a nested pass with the
//! longer list; the outer pass stops there, so no observer ends on a stale
//! list.

#[cfg(test)]
#[path = "registry_test.rs"]
mod registry_test;

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use indexmap::IndexSet;

use crate::GeneId;

/// Handle returned by [`Registry::subscribe`]. Distinct from slot
/// subscription ids, so one can't be used to remove the other.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegistrySubscriptionId(u64);

type KeysObserver = Rc<dyn Fn(&[GeneId])>;

/// Insertion-ordered set of registered keys.
#[derive(Default)]
pub struct Registry {
    keys: RefCell<IndexSet<GeneId>>,
    observers: RefCell<Vec<(RegistrySubscriptionId, KeysObserver)>>,
    next_subscription: Cell<u64>,
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("keys", &*self.keys.borrow())
            .field("observers", &self.observers.borrow().len())
            .finish()
    }
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `key` if absent. Returns true only when the key is new.
    pub fn register(&self, key: &str) -> bool {
        let keys = {
            let mut keys = self.keys.borrow_mut();
            if !keys.insert(key.to_owned()) {
                return false;
            }
            keys.iter().cloned().collect::<Vec<_>>()
        };
        let observers = self.observers.borrow().iter().map(|(_, o)| Rc::clone(o)).collect::<Vec<_>>();
        for observer in observers {
            // Membership only grows, so a longer set means a nested pass ran.
            if self.keys.borrow().len() != keys.len() {
                tracing::trace!(key, "registry grew during notification; newer pass took over");
                break;
            }
            observer(&keys);
        }
        true
    }

    /// Registered keys in registration order.
    #[must_use]
    pub fn keys(&self) -> Vec<GeneId> {
        self.keys.borrow().iter().cloned().collect()
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.keys.borrow().contains(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.borrow().is_empty()
    }

    /// Observe membership changes.
    pub fn subscribe(&self, observer: impl Fn(&[GeneId]) + 'static) -> RegistrySubscriptionId {
        let id = self.next_subscription.get();
        self.next_subscription.set(id + 1);
        let id = RegistrySubscriptionId(id);
        self.observers.borrow_mut().push((id, Rc::new(observer)));
        id
    }

    /// Remove a membership observer. Returns false if `id` is unknown.
    pub fn unsubscribe(&self, id: RegistrySubscriptionId) -> bool {
        let mut observers = self.observers.borrow_mut();
        let before = observers.len();
        observers.retain(|(sub, _)| *sub != id);
        observers.len() != before
    }
}
