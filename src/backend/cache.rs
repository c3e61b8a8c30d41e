//! Memoized lookups.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::types::{
    Lookup,
    Value,
};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(super) struct CacheKey {
    locale: String,
    flat_key: String,
    default: Option<Value>,
}

impl CacheKey {
    pub(super) fn new(locale: &str, flat_key: &str, default: Option<&Value>) -> Self {
        Self { locale: locale.to_string(), flat_key: flat_key.to_string(), default: default.cloned() }
    }
}

/// Lookup results keyed by locale, flat key and default.
///
/// Misses are never cached, so a later store is seen without invalidation.
/// A poisoned lock disables the cache instead of failing lookups.
#[derive(Debug, Default)]
pub(super) struct LookupCache {
    entries: RwLock<HashMap<CacheKey, Lookup>>,
}

impl LookupCache {
    pub(super) fn get(&self, key: &CacheKey) -> Option<Lookup> {
        self.entries.read().ok()?.get(key).cloned()
    }

    pub(super) fn insert(&self, key: CacheKey, lookup: Lookup) {
        if lookup.is_miss() {
            return;
        }
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(key, lookup);
        }
    }

    pub(super) fn clear(&self) {
        if let Ok(mut entries) = self.entries.write() {
            entries.clear();
        }
    }
}
