//! Reactive keyed state and registry for reusable "gene" form fields.
//!
//! A gene is a form-field component instantiated with an externally supplied
//! key. On mount it registers that key in a [`registry::Registry`] and binds to
//! the matching slot in a [`store::KeyedStore`]. Code that never sees the field
//! can later enumerate the registry and read every value by key.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`store`] | Lazy key → slot map with per-slot observers |
//! | [`registry`] | Append-only, insertion-ordered set of registered keys |
//! | [`context`] | Isolated {store, registry} pair and its read helpers |
//! | [`field`] | Mount/edit behavior of a single gene field |
//! | [`snapshot`] | Point-in-time key → value readouts |
//! | [`config`] | Per-context settings |
//! | [`error`] | Errors for the few fallible edges (JSON, config) |

pub mod config;
pub mod context;
pub mod error;
pub mod field;
pub mod registry;
pub mod snapshot;
pub mod store;

pub use config::ContextConfig;
pub use context::{ContextCell, ContextId, GeneContext, SnapshotSubscriptionId, create_context};
pub use error::HelixiumError;
pub use field::{FieldState, GeneField, MountedGene};
pub use registry::{Registry, RegistrySubscriptionId};
pub use snapshot::Snapshot;
pub use store::{KeyedStore, Slot, SubscriptionId};

/// Externally assigned identifier of one gene slot.
pub type GeneId = String;

/// The answer value held by a gene slot.
pub type Allele = String;
