//! Point-in-time key → value readouts.
//!
//! A `Snapshot` owns its strings. Editing it never reaches back into the
//! store, and a later snapshot reflects whatever the slots hold then.

#[cfg(test)]
#[path = "snapshot_test.rs"]
mod snapshot_test;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::HelixiumError;
use crate::{Allele, GeneId};

/// Insertion-ordered mapping from gene key to value.
///
/// Equality ignores order, so `{a, b}` equals `{b, a}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot(IndexMap<GeneId, Allele>);

impl Snapshot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace one entry, returning the previous value.
    pub fn insert(&mut self, key: impl Into<GeneId>, value: impl Into<Allele>) -> Option<Allele> {
        self.0.insert(key.into(), value.into())
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn into_inner(self) -> IndexMap<GeneId, Allele> {
        self.0
    }

    /// Render as indented JSON, e.g. for a debug readout panel.
    ///
    /// # Errors
    ///
    /// Returns [`HelixiumError::Encode`] if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, HelixiumError> {
        Ok(serde_json::to_string_pretty(&self.0)?)
    }
}

impl<K: Into<GeneId>, V: Into<Allele>> FromIterator<(K, V)> for Snapshot {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl IntoIterator for Snapshot {
    type Item = (GeneId, Allele);
    type IntoIter = indexmap::map::IntoIter<GeneId, Allele>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
