//! Process-local translation store.

use std::collections::BTreeSet;
use std::sync::{
    RwLock,
    RwLockReadGuard,
    RwLockWriteGuard,
};

use super::snapshot::Snapshot;
use super::{
    TranslationRecord,
    TranslationStore,
};
use crate::error::StoreError;

/// A [`TranslationStore`] kept in memory behind a single lock.
#[derive(Debug, Default)]
pub struct MemoryStore {
    /// All records; one lock so every operation is atomic.
    snapshot: RwLock<Snapshot>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-filled with `records`.
    #[must_use]
    pub fn with_records(records: impl IntoIterator<Item = TranslationRecord>) -> Self {
        Self { snapshot: RwLock::new(Snapshot::from_records(records)) }
    }

    /// Returns a copy of every record, ordered by locale and key.
    pub fn records(&self) -> Result<Vec<TranslationRecord>, StoreError> {
        Ok(self.read()?.records())
    }

    /// Returns the number of stored records.
    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.read()?.len())
    }

    /// Removes every record.
    pub fn clear(&self) -> Result<(), StoreError> {
        *self.write()? = Snapshot::default();
        Ok(())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Snapshot>, StoreError> {
        self.snapshot
            .read()
            .map_err(|_| StoreError::Unavailable("translation store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Snapshot>, StoreError> {
        self.snapshot
            .write()
            .map_err(|_| StoreError::Unavailable("translation store lock poisoned".to_string()))
    }
}

impl TranslationStore for MemoryStore {
    fn find_by_key_prefix(
        &self,
        locale: &str,
        key: &str,
    ) -> Result<Vec<TranslationRecord>, StoreError> {
        Ok(self.read()?.find_by_key_prefix(locale, key))
    }

    fn delete_key_or_prefix(&self, locale: &str, keys: &[String]) -> Result<(), StoreError> {
        self.write()?.delete_key_or_prefix(locale, keys);
        Ok(())
    }

    fn insert(&self, record: TranslationRecord) -> Result<(), StoreError> {
        self.write()?.insert(record);
        Ok(())
    }

    fn replace(&self, record: TranslationRecord) -> Result<(), StoreError> {
        self.write()?.replace(record);
        Ok(())
    }

    fn insert_if_absent(
        &self,
        locale: &str,
        key: &str,
        records: Vec<TranslationRecord>,
    ) -> Result<bool, StoreError> {
        Ok(self.write()?.insert_if_absent(locale, key, records))
    }

    fn list_locales(&self) -> Result<BTreeSet<String>, StoreError> {
        Ok(self.read()?.locales())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;

    use super::*;
    use crate::types::Value;

    #[googletest::test]
    fn insert_if_absent_is_idempotent() {
        let store = MemoryStore::new();
        let stub = || vec![TranslationRecord::new("en", "foo.bar", None)];

        expect_that!(store.insert_if_absent("en", "foo.bar", stub()).unwrap(), eq(true));
        expect_that!(store.insert_if_absent("en", "foo.bar", stub()).unwrap(), eq(false));
        expect_that!(store.len().unwrap(), eq(1));
    }

    #[googletest::test]
    fn find_by_key_only_matches_exact_key() {
        let store = MemoryStore::with_records([TranslationRecord::new(
            "en",
            "foo.bar",
            Some(Value::text("bar")),
        )]);

        expect_that!(store.find_by_key("en", "foo").unwrap(), none());
        expect_that!(
            store.find_by_key("en", "foo.bar").unwrap().and_then(|r| r.value),
            some(eq(&Value::text("bar")))
        );
    }

    #[googletest::test]
    fn clear_removes_all_locales() {
        let store = MemoryStore::with_records([
            TranslationRecord::new("en", "a", None),
            TranslationRecord::new("es", "a", None),
        ]);

        store.clear().unwrap();

        expect_that!(store.list_locales().unwrap(), is_empty());
    }
}
