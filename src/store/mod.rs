//! Persistence of flat translation records.
mod file;
mod memory;
mod snapshot;

use std::collections::BTreeSet;
use std::fmt;

use serde::{
    Deserialize,
    Serialize,
};

pub use file::JsonFileStore;
pub use memory::MemoryStore;

use crate::error::StoreError;
use crate::types::Value;

/// A persisted translation entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationRecord {
    pub locale: String,
    /// Flat key (see [`crate::key`]).
    pub key: String,
    /// `None` marks a stub awaiting translation.
    #[serde(default)]
    pub value: Option<Value>,
    /// Placeholder names translators may use in `value`.
    #[serde(default)]
    pub interpolations: Vec<String>,
}

impl TranslationRecord {
    #[must_use]
    pub fn new(locale: impl Into<String>, key: impl Into<String>, value: Option<Value>) -> Self {
        Self { locale: locale.into(), key: key.into(), value, interpolations: Vec::new() }
    }

    #[must_use]
    pub fn with_interpolations(mut self, interpolations: Vec<String>) -> Self {
        self.interpolations = interpolations;
        self
    }

    #[must_use]
    pub const fn is_stub(&self) -> bool {
        self.value.is_none()
    }

    /// Returns true if `name` is a recorded placeholder.
    #[must_use]
    pub fn interpolates(&self, name: &str) -> bool {
        self.interpolations.iter().any(|interpolation| interpolation == name)
    }
}

/// Storage contract for translation records.
///
/// Every method is atomic with respect to the other methods of the same store.
pub trait TranslationStore: Send + Sync + fmt::Debug {
    /// Returns the record at `key` (first, if present) followed by all records below it.
    fn find_by_key_prefix(
        &self,
        locale: &str,
        key: &str,
    ) -> Result<Vec<TranslationRecord>, StoreError>;

    /// Deletes every record whose key is in `keys`, and every record below the last of `keys`.
    fn delete_key_or_prefix(&self, locale: &str, keys: &[String]) -> Result<(), StoreError>;

    /// Inserts a record, replacing a record with the same locale and key.
    fn insert(&self, record: TranslationRecord) -> Result<(), StoreError>;

    /// Retracts the record's key, all of its ancestors and its subtree, then inserts it.
    fn replace(&self, record: TranslationRecord) -> Result<(), StoreError>;

    /// Inserts `records` only if nothing is stored at `key`, above it or below it.
    ///
    /// Returns whether the records were inserted.
    fn insert_if_absent(
        &self,
        locale: &str,
        key: &str,
        records: Vec<TranslationRecord>,
    ) -> Result<bool, StoreError>;

    /// Returns every locale with at least one record.
    fn list_locales(&self) -> Result<BTreeSet<String>, StoreError>;

    /// Returns the record stored exactly at `key`.
    fn find_by_key(&self, locale: &str, key: &str) -> Result<Option<TranslationRecord>, StoreError> {
        Ok(self.find_by_key_prefix(locale, key)?.into_iter().next().filter(|record| record.key == key))
    }
}
