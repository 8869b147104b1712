//! Mount/edit behavior of a single gene field.
//!
//! DESIGN
//! ======
//! A field is described by `(key, label)` and does nothing until mounted.
//! `GeneField::mount` registers the key exactly once and binds to the slot,
//! returning a `MountedGene`; edits are only possible on the mounted value,
//! so "edit before mount" cannot be expressed.
//!
//! Unmounting (dropping, or `unmount`) removes the field's own change
//! observers but leaves the key registered and the value in place. Values
//! live as long as the context.

#[cfg(test)]
#[path = "field_test.rs"]
mod field_test;

use crate::context::GeneContext;
use crate::store::SubscriptionId;
use crate::{Allele, GeneId};

/// Lifecycle of a field instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldState {
    Uninitialized,
    Mounted,
}

/// An unmounted gene field: a key and the question shown to the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneField {
    key: GeneId,
    label: String,
}

impl GeneField {
    #[must_use]
    pub fn new(key: impl Into<GeneId>, label: impl Into<String>) -> Self {
        Self { key: key.into(), label: label.into() }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn state(&self) -> FieldState {
        FieldState::Uninitialized
    }

    /// Register the key in `ctx` and bind to its slot.
    #[must_use]
    pub fn mount(self, ctx: &GeneContext) -> MountedGene {
        ctx.register(&self.key);
        let initial = ctx.read(&self.key);
        tracing::debug!(context = %ctx.id(), key = %self.key, label = %self.label, "gene mounted");
        MountedGene {
            key: self.key,
            label: self.label,
            initial,
            context: ctx.clone(),
            subscriptions: Vec::new(),
            released: false,
        }
    }
}

/// A gene field bound to a context.
#[derive(Debug)]
pub struct MountedGene {
    key: GeneId,
    label: String,
    initial: Allele,
    context: GeneContext,
    subscriptions: Vec<SubscriptionId>,
    released: bool,
}

impl MountedGene {
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn state(&self) -> FieldState {
        FieldState::Mounted
    }

    #[must_use]
    pub fn context(&self) -> &GeneContext {
        &self.context
    }

    /// Value read from the slot when the field mounted.
    #[must_use]
    pub fn initial_value(&self) -> &str {
        &self.initial
    }

    /// Current value of the bound slot.
    #[must_use]
    pub fn value(&self) -> Allele {
        self.context.read(&self.key)
    }

    /// Handle a user edit.
    pub fn on_input(&self, value: impl Into<Allele>) -> bool {
        self.context.write(&self.key, value)
    }

    /// Re-render hook, called with the new value whenever the slot changes.
    /// Dropped together with the field.
    pub fn on_change(&mut self, observer: impl Fn(&Allele) + 'static) -> SubscriptionId {
        let id = self.context.subscribe(&self.key, observer);
        self.subscriptions.push(id);
        id
    }

    /// Debug caption shown under the input.
    #[must_use]
    pub fn debug_line(&self) -> String {
        format!("Gene ID: {} | Allele: \"{}\"", self.key, self.value())
    }

    /// Detach from the context and return the unmounted description.
    #[must_use]
    pub fn unmount(mut self) -> GeneField {
        self.release();
        GeneField { key: std::mem::take(&mut self.key), label: std::mem::take(&mut self.label) }
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        for id in self.subscriptions.drain(..) {
            self.context.unsubscribe(&self.key, id);
        }
        tracing::debug!(context = %self.context.id(), key = %self.key, "gene unmounted");
    }
}

impl Drop for MountedGene {
    fn drop(&mut self) {
        self.release();
    }
}
