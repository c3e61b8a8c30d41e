//! Translation store persisted as a JSON file.

use std::collections::BTreeSet;
use std::path::{
    Path,
    PathBuf,
};
use std::sync::{
    RwLock,
    RwLockReadGuard,
};

use super::snapshot::Snapshot;
use super::{
    TranslationRecord,
    TranslationStore,
};
use crate::error::StoreError;

/// A [`TranslationStore`] that writes every change through to a JSON file.
///
/// The file holds a JSON array of [`TranslationRecord`]s. Each write is applied
/// to a copy of the current records, flushed, and only then made visible, so a
/// failed flush leaves the store unchanged.
#[derive(Debug)]
pub struct JsonFileStore {
    /// Location of the JSON file.
    path: PathBuf,
    /// Records as of the last successful flush.
    snapshot: RwLock<Snapshot>,
}

impl JsonFileStore {
    /// Opens the store at `path`; a missing file is an empty store.
    ///
    /// # Errors
    /// - File read error
    /// - JSON parse error
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let snapshot = if path.exists() {
            tracing::debug!("Loading translation store from: {:?}", path);
            let content = std::fs::read_to_string(&path)?;
            let records: Vec<TranslationRecord> = serde_json::from_str(&content)?;
            Snapshot::from_records(records)
        } else {
            tracing::debug!("Translation store file not found, starting empty: {:?}", path);
            Snapshot::default()
        };

        Ok(Self { path, snapshot: RwLock::new(snapshot) })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Snapshot>, StoreError> {
        self.snapshot
            .read()
            .map_err(|_| StoreError::Unavailable("translation store lock poisoned".to_string()))
    }

    /// Applies `change` to a copy; flushes and publishes it if `change` reports a modification.
    fn update<T>(&self, change: impl FnOnce(&mut Snapshot) -> (bool, T)) -> Result<T, StoreError> {
        let mut guard = self
            .snapshot
            .write()
            .map_err(|_| StoreError::Unavailable("translation store lock poisoned".to_string()))?;

        let mut next = guard.clone();
        let (changed, output) = change(&mut next);
        if changed {
            self.flush(&next)?;
            *guard = next;
        }
        Ok(output)
    }

    fn flush(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&snapshot.records())?;
        std::fs::write(&self.path, content)?;
        tracing::debug!(path = %self.path.display(), records = snapshot.len(), "Flushed translation store");
        Ok(())
    }
}

impl TranslationStore for JsonFileStore {
    fn find_by_key_prefix(
        &self,
        locale: &str,
        key: &str,
    ) -> Result<Vec<TranslationRecord>, StoreError> {
        Ok(self.read()?.find_by_key_prefix(locale, key))
    }

    fn delete_key_or_prefix(&self, locale: &str, keys: &[String]) -> Result<(), StoreError> {
        self.update(|snapshot| (snapshot.delete_key_or_prefix(locale, keys) > 0, ()))
    }

    fn insert(&self, record: TranslationRecord) -> Result<(), StoreError> {
        self.update(|snapshot| {
            snapshot.insert(record);
            (true, ())
        })
    }

    fn replace(&self, record: TranslationRecord) -> Result<(), StoreError> {
        self.update(|snapshot| {
            snapshot.replace(record);
            (true, ())
        })
    }

    fn insert_if_absent(
        &self,
        locale: &str,
        key: &str,
        records: Vec<TranslationRecord>,
    ) -> Result<bool, StoreError> {
        self.update(|snapshot| {
            let inserted = snapshot.insert_if_absent(locale, key, records);
            (inserted, inserted)
        })
    }

    fn list_locales(&self) -> Result<BTreeSet<String>, StoreError> {
        Ok(self.read()?.locales())
    }
}
