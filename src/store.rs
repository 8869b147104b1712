//! Keyed value store: one lazily created, observable slot per key.
//!
//! DESIGN
//! ======
//! `KeyedStore` maps keys to `Slot` handles. A slot is created on first
//! reference at `V::default()` and lives as long as the store; there is no
//! removal path. Handles are `Rc`-shared, so every lookup of the same key
//! sees the same underlying value.
//!
//! Observers run synchronously inside `set`/`update`, in subscription order.
//! No `RefCell` borrow is held while they run, so an observer may read or
//! write any slot (including its own) without a borrow panic.
//!
//! Every change bumps the slot's version. If an observer writes the slot
//! again, the nested pass delivers the newer value to every observer and the
//! outer pass stops, so the last value each observer sees is the slot's
//! current one.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Handle returned by `subscribe`, used to remove the observer again.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Take the next id from a per-owner counter.
    pub(crate) fn next(counter: &Cell<u64>) -> Self {
        let id = counter.get();
        counter.set(id + 1);
        Self(id)
    }
}

type Observer<V> = Rc<dyn Fn(&V)>;

struct SlotInner<V> {
    value: V,
    observers: Vec<(SubscriptionId, Observer<V>)>,
    next_subscription: Cell<u64>,
    version: u64,
}

// =============================================================================
// SLOT
// =============================================================================

/// A shared handle to one mutable value and its observers.
///
/// Cloning the handle does not copy the value; all clones read and write the
/// same slot.
pub struct Slot<V> {
    key: Rc<str>,
    inner: Rc<RefCell<SlotInner<V>>>,
}

impl<V> Clone for Slot<V> {
    fn clone(&self) -> Self {
        Self { key: Rc::clone(&self.key), inner: Rc::clone(&self.inner) }
    }
}

impl<V: fmt::Debug> fmt::Debug for Slot<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Slot")
            .field("key", &self.key)
            .field("value", &inner.value)
            .field("observers", &inner.observers.len())
            .finish()
    }
}

impl<V: Clone + PartialEq> Slot<V> {
    fn new(key: &str, value: V) -> Self {
        Self {
            key: Rc::from(key),
            inner: Rc::new(RefCell::new(SlotInner {
                value,
                observers: Vec::new(),
                next_subscription: Cell::new(0),
                version: 0,
            })),
        }
    }

    /// Key this slot was created for.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Current value.
    #[must_use]
    pub fn get(&self) -> V {
        self.inner.borrow().value.clone()
    }

    /// Replace the value and notify observers.
    ///
    /// Writing a value equal to the current one is a no-op and notifies
    /// nobody. Returns whether the value changed.
    pub fn set(&self, value: V) -> bool {
        let version = {
            let mut inner = self.inner.borrow_mut();
            if inner.value == value {
                return false;
            }
            inner.value = value;
            inner.version += 1;
            inner.version
        };
        self.notify(version);
        true
    }

    /// Reducer-style write: replace the value with `f(&current)`.
    pub fn update(&self, f: impl FnOnce(&V) -> V) -> bool {
        let current = self.get();
        self.set(f(&current))
    }

    /// Register an observer called with the new value after every change.
    pub fn subscribe(&self, observer: impl Fn(&V) + 'static) -> SubscriptionId {
        let mut inner = self.inner.borrow_mut();
        let id = SubscriptionId::next(&inner.next_subscription);
        inner.observers.push((id, Rc::new(observer)));
        id
    }

    /// Remove an observer. Returns false if `id` was not subscribed here.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut inner = self.inner.borrow_mut();
        let before = inner.observers.len();
        inner.observers.retain(|(sub, _)| *sub != id);
        inner.observers.len() != before
    }

    /// Number of live observers.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.inner.borrow().observers.len()
    }

    /// Whether two handles refer to the same slot.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    fn notify(&self, version: u64) {
        // Clone the value and the observer list out first so observers can
        // re-enter this slot.
        let (value, observers) = {
            let inner = self.inner.borrow();
            let observers = inner.observers.iter().map(|(_, o)| Rc::clone(o)).collect::<Vec<_>>();
            (inner.value.clone(), observers)
        };
        tracing::trace!(key = %self.key, observers = observers.len(), "notifying slot observers");
        for observer in observers {
            if self.inner.borrow().version != version {
                tracing::trace!(key = %self.key, "slot changed during notification; newer pass took over");
                return;
            }
            observer(&value);
        }
    }
}

// =============================================================================
// KEYED STORE
// =============================================================================

/// Lazy map from key to [`Slot`].
pub struct KeyedStore<V> {
    slots: RefCell<HashMap<String, Slot<V>>>,
}

impl<V> Default for KeyedStore<V> {
    fn default() -> Self {
        Self { slots: RefCell::new(HashMap::new()) }
    }
}

impl<V> fmt::Debug for KeyedStore<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyedStore").field("slots", &self.slots.borrow().len()).finish()
    }
}

impl<V: Clone + Default + PartialEq> KeyedStore<V> {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the slot for `key`, creating it at `V::default()` if absent.
    pub fn slot(&self, key: &str) -> Slot<V> {
        if let Some(slot) = self.slots.borrow().get(key) {
            return slot.clone();
        }
        tracing::debug!(key, "creating slot");
        let slot = Slot::new(key, V::default());
        self.slots.borrow_mut().insert(key.to_owned(), slot.clone());
        slot
    }

    /// Current value for `key`.
    pub fn read(&self, key: &str) -> V {
        self.slot(key).get()
    }

    /// Set the value for `key`. Returns whether it changed.
    pub fn write(&self, key: &str, value: V) -> bool {
        self.slot(key).set(value)
    }

    /// Reducer-style write for `key`.
    pub fn update(&self, key: &str, f: impl FnOnce(&V) -> V) -> bool {
        self.slot(key).update(f)
    }

    /// Observe changes to `key`'s value, creating the slot if absent.
    pub fn subscribe(&self, key: &str, observer: impl Fn(&V) + 'static) -> SubscriptionId {
        self.slot(key).subscribe(observer)
    }

    /// Remove an observer from `key`'s slot. Never creates the slot.
    pub fn unsubscribe(&self, key: &str, id: SubscriptionId) -> bool {
        let slot = self.slots.borrow().get(key).cloned();
        slot.is_some_and(|slot| slot.unsubscribe(id))
    }

    /// Whether a slot exists for `key`. Never creates one.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.slots.borrow().contains_key(key)
    }

    /// Number of slots created so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.borrow().is_empty()
    }
}
