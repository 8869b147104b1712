//! Isolated gene context: one keyed store plus one registry.
//!
//! DESIGN
//! ======
//! A `GeneContext` replaces module-level atoms with an explicit handle that
//! every consumer receives by reference. Clones share state; separately
//! created contexts share nothing, so two dashboards on one page never see
//! each other's genes.
//!
//! Registration and lookup are deliberately asymmetric:
//! - `get_all_values` lists registered keys only.
//! - `get_value_by_id` reads any key, lazily creating its slot, but never
//!   registers it.
//!
//! `subscribe_all` is the derived "all values" view: it watches the registry
//! and the slot of every registered key, including keys registered later,
//! and hands the observer a fresh snapshot after each change.
//!
//! `ContextCell` memoizes construction for an owner that re-renders.

#[cfg(test)]
#[path = "context_test.rs"]
mod context_test;

use std::cell::{Cell, OnceCell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

use uuid::Uuid;

use crate::config::ContextConfig;
use crate::registry::{Registry, RegistrySubscriptionId};
use crate::snapshot::Snapshot;
use crate::store::{KeyedStore, Slot, SubscriptionId};
use crate::{Allele, GeneId};

/// Identifier attached to a context's log events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ContextId(Uuid);

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Handle returned by [`GeneContext::subscribe_all`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SnapshotSubscriptionId(u64);

/// One `subscribe_all` observer and the subscriptions feeding it.
struct SnapshotWatch {
    observer: Rc<dyn Fn(&Snapshot)>,
    slots: RefCell<Vec<(GeneId, SubscriptionId)>>,
    registry: Cell<Option<RegistrySubscriptionId>>,
}

impl SnapshotWatch {
    fn watches(&self, key: &str) -> bool {
        self.slots.borrow().iter().any(|(k, _)| k == key)
    }
}

struct ContextInner {
    id: ContextId,
    config: ContextConfig,
    store: KeyedStore<Allele>,
    registry: Registry,
    watches: RefCell<HashMap<SnapshotSubscriptionId, Rc<SnapshotWatch>>>,
    next_watch: Cell<u64>,
}

// =============================================================================
// GENE CONTEXT
// =============================================================================

/// Shared handle to one isolated {store, registry} pair.
#[derive(Clone)]
pub struct GeneContext {
    inner: Rc<ContextInner>,
}

impl fmt::Debug for GeneContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneContext")
            .field("id", &self.inner.id)
            .field("label", &self.inner.config.label)
            .field("registry", &self.inner.registry)
            .field("store", &self.inner.store)
            .finish()
    }
}

impl Default for GeneContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a fresh, isolated context with default settings.
#[must_use]
pub fn create_context() -> GeneContext {
    GeneContext::new()
}

impl GeneContext {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ContextConfig::default())
    }

    #[must_use]
    pub fn with_config(config: ContextConfig) -> Self {
        let id = ContextId(Uuid::new_v4());
        tracing::debug!(context = %id, label = %config.label, "gene context created");
        Self {
            inner: Rc::new(ContextInner {
                id,
                config,
                store: KeyedStore::new(),
                registry: Registry::new(),
                watches: RefCell::new(HashMap::new()),
                next_watch: Cell::new(0),
            }),
        }
    }

    #[must_use]
    pub fn id(&self) -> ContextId {
        self.inner.id
    }

    #[must_use]
    pub fn config(&self) -> &ContextConfig {
        &self.inner.config
    }

    /// Whether two handles refer to the same context.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    // -------------------------------------------------------------------------
    // Store
    // -------------------------------------------------------------------------

    /// Slot for `key`, created at `""` if absent.
    pub fn slot(&self, key: &str) -> Slot<Allele> {
        self.inner.store.slot(key)
    }

    /// Current value for `key`, creating the slot at `""` if absent.
    pub fn read(&self, key: &str) -> Allele {
        self.inner.store.read(key)
    }

    /// Set `key` to `value`. Observers have run by the time this returns.
    pub fn write(&self, key: &str, value: impl Into<Allele>) -> bool {
        let value = value.into();
        if self.inner.config.log_values {
            tracing::trace!(context = %self.inner.id, key, value = %value, "write");
        } else {
            tracing::trace!(context = %self.inner.id, key, len = value.len(), "write");
        }
        self.inner.store.write(key, value)
    }

    /// Reducer-style write: set `key` to `f(&current)`.
    pub fn update(&self, key: &str, f: impl FnOnce(&Allele) -> Allele) -> bool {
        tracing::trace!(context = %self.inner.id, key, "update");
        self.inner.store.update(key, f)
    }

    /// Observe changes to one key's value.
    pub fn subscribe(&self, key: &str, observer: impl Fn(&Allele) + 'static) -> SubscriptionId {
        self.inner.store.subscribe(key, observer)
    }

    /// Remove a value observer from `key`. Returns false if `id` is unknown.
    pub fn unsubscribe(&self, key: &str, id: SubscriptionId) -> bool {
        self.inner.store.unsubscribe(key, id)
    }

    // -------------------------------------------------------------------------
    // Registry
    // -------------------------------------------------------------------------

    /// Announce `key` as active. Idempotent; never resets the slot's value.
    pub fn register(&self, key: &str) -> bool {
        // A registered key always has a slot.
        self.inner.store.slot(key);
        let added = self.inner.registry.register(key);
        if added {
            tracing::debug!(context = %self.inner.id, key, "gene registered");
        }
        added
    }

    /// Registered keys in registration order.
    #[must_use]
    pub fn list_keys(&self) -> Vec<GeneId> {
        self.inner.registry.keys()
    }

    #[must_use]
    pub fn is_registered(&self, key: &str) -> bool {
        self.inner.registry.contains(key)
    }

    /// Observe registry growth. Called with the full key list.
    pub fn subscribe_registry(&self, observer: impl Fn(&[GeneId]) + 'static) -> RegistrySubscriptionId {
        self.inner.registry.subscribe(observer)
    }

    /// Remove a registry observer. Returns false if `id` is unknown.
    pub fn unsubscribe_registry(&self, id: RegistrySubscriptionId) -> bool {
        self.inner.registry.unsubscribe(id)
    }

    // -------------------------------------------------------------------------
    // External read helpers
    // -------------------------------------------------------------------------

    /// Fresh snapshot of every registered key's current value.
    #[must_use]
    pub fn get_all_values(&self) -> Snapshot {
        self.list_keys()
            .into_iter()
            .map(|key| {
                let value = self.read(&key);
                (key, value)
            })
            .collect()
    }

    /// Value for `key`, registered or not. Creates the slot but does not
    /// register the key.
    pub fn get_value_by_id(&self, key: &str) -> Allele {
        self.read(key)
    }

    /// Snapshot restricted to `keys`, read through [`Self::get_value_by_id`].
    pub fn snapshot_of<I, K>(&self, keys: I) -> Snapshot
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        keys.into_iter()
            .map(|key| {
                let key = key.as_ref();
                (key.to_owned(), self.get_value_by_id(key))
            })
            .collect()
    }

    // -------------------------------------------------------------------------
    // Derived "all values" subscription
    // -------------------------------------------------------------------------

    /// Observe [`Self::get_all_values`]. The observer gets a fresh snapshot
    /// whenever a key is registered or any registered key's value changes.
    pub fn subscribe_all(&self, observer: impl Fn(&Snapshot) + 'static) -> SnapshotSubscriptionId {
        let watch = Rc::new(SnapshotWatch {
            observer: Rc::new(observer),
            slots: RefCell::new(Vec::new()),
            registry: Cell::new(None),
        });
        for key in self.list_keys() {
            self.watch_slot(&watch, &key);
        }

        // Weak handles: the observers live inside this context.
        let weak_ctx = Rc::downgrade(&self.inner);
        let weak_watch = Rc::downgrade(&watch);
        let registry_id = self.inner.registry.subscribe(move |keys| {
            let Some((ctx, watch)) = upgrade(&weak_ctx, &weak_watch) else {
                return;
            };
            for key in keys {
                if !watch.watches(key) {
                    ctx.watch_slot(&watch, key);
                }
            }
            (watch.observer)(&ctx.get_all_values());
        });
        watch.registry.set(Some(registry_id));

        let id = SnapshotSubscriptionId(self.inner.next_watch.get());
        self.inner.next_watch.set(id.0 + 1);
        self.inner.watches.borrow_mut().insert(id, watch);
        tracing::debug!(context = %self.inner.id, "all-values observer added");
        id
    }

    /// Remove a [`Self::subscribe_all`] observer and everything feeding it.
    pub fn unsubscribe_all(&self, id: SnapshotSubscriptionId) -> bool {
        let Some(watch) = self.inner.watches.borrow_mut().remove(&id) else {
            return false;
        };
        for (key, sub) in watch.slots.borrow_mut().drain(..) {
            self.inner.store.unsubscribe(&key, sub);
        }
        if let Some(registry_id) = watch.registry.take() {
            self.inner.registry.unsubscribe(registry_id);
        }
        true
    }

    fn watch_slot(&self, watch: &Rc<SnapshotWatch>, key: &str) {
        let weak_ctx = Rc::downgrade(&self.inner);
        let weak_watch = Rc::downgrade(watch);
        let sub = self.inner.store.subscribe(key, move |_| {
            if let Some((ctx, watch)) = upgrade(&weak_ctx, &weak_watch) {
                (watch.observer)(&ctx.get_all_values());
            }
        });
        watch.slots.borrow_mut().push((key.to_owned(), sub));
    }
}

fn upgrade(ctx: &Weak<ContextInner>, watch: &Weak<SnapshotWatch>) -> Option<(GeneContext, Rc<SnapshotWatch>)> {
    Some((GeneContext { inner: ctx.upgrade()? }, watch.upgrade()?))
}

// =============================================================================
// CONTEXT CELL
// =============================================================================

/// Builds a context on first use and hands back the same one afterwards.
///
/// Owners that re-render keep a `ContextCell` in their long-lived state and
/// call `get_or_create` on every pass.
#[derive(Debug, Default)]
pub struct ContextCell {
    config: ContextConfig,
    cell: OnceCell<GeneContext>,
}

impl ContextCell {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: ContextConfig) -> Self {
        Self { config, cell: OnceCell::new() }
    }

    pub fn get_or_create(&self) -> &GeneContext {
        self.cell.get_or_init(|| GeneContext::with_config(self.config.clone()))
    }

    /// The context, if it has been created.
    #[must_use]
    pub fn get(&self) -> Option<&GeneContext> {
        self.cell.get()
    }
}
