//! Error type for the crate's few fallible edges.
//!
//! Store, registry, and context operations are total. Only rendering a
//! snapshot and parsing configuration overrides can fail.

/// Error returned by [`crate::Snapshot::to_json_pretty`] and config parsing.
#[derive(Debug, thiserror::Error)]
pub enum HelixiumError {
    /// The snapshot could not be serialized to JSON.
    #[error("failed to encode snapshot: {0}")]
    Encode(#[from] serde_json::Error),
    /// A configuration override did not parse.
    #[error("invalid value for {key}: {value:?}")]
    InvalidConfig { key: String, value: String },
}
