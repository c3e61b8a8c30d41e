//! Resolver backed by a [`TranslationStore`].

use std::collections::BTreeSet;
use std::sync::Arc;

use super::cache::{
    CacheKey,
    LookupCache,
};
use super::resolve::{
    resolve_default,
    resolve_links,
};
use super::{
    Context,
    MissCapturer,
    Resolver,
};
use crate::config::I18nSettings;
use crate::error::I18nError;
use crate::key::{
    flatten_translations,
    relative_key,
};
use crate::store::{
    TranslationRecord,
    TranslationStore,
};
use crate::types::{
    Lookup,
    Options,
    StoreOptions,
    Tree,
};

/// Resolves translations from flat records in a [`TranslationStore`].
///
/// A key holds either a value or a subtree, never both: storing a key retracts
/// its ancestors and its subtree first. Stubs (records without a value) read
/// as misses but keep the key occupied.
#[derive(Debug)]
pub struct StoreBackend {
    /// Backing records.
    store: Arc<dyn TranslationStore>,
    /// `None` when memoization is off.
    cache: Option<LookupCache>,
    /// Store stubs in every other known locale when a key is stored.
    stub_other_locales: bool,
}

impl StoreBackend {
    /// Creates a memoizing backend over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn TranslationStore>) -> Self {
        Self { store, cache: Some(LookupCache::default()), stub_other_locales: false }
    }

    #[must_use]
    pub fn from_settings(store: Arc<dyn TranslationStore>, settings: &I18nSettings) -> Self {
        Self::new(store)
            .with_memoize(settings.memoize)
            .with_stub_other_locales(settings.stub_other_locales)
    }

    #[must_use]
    pub fn with_memoize(mut self, memoize: bool) -> Self {
        self.cache = memoize.then(LookupCache::default);
        self
    }

    #[must_use]
    pub const fn with_stub_other_locales(mut self, stub_other_locales: bool) -> Self {
        self.stub_other_locales = stub_other_locales;
        self
    }

    #[must_use]
    pub fn store(&self) -> &Arc<dyn TranslationStore> {
        &self.store
    }

    /// Forgets memoized lookups.
    pub fn reload(&self) {
        if let Some(cache) = &self.cache {
            cache.clear();
        }
    }

    /// Builds the lookup result from the records at and below `flat_key`.
    fn lookup_records(
        &self,
        ctx: &Context<'_>,
        locale: &str,
        flat_key: &str,
        options: &Options,
    ) -> Result<Lookup, I18nError> {
        let mut records = self.store.find_by_key_prefix(locale, flat_key)?.into_iter().peekable();

        let Some(first) = records.peek() else {
            return Ok(Lookup::Miss);
        };

        if first.key == flat_key {
            return match records.next().and_then(|record| record.value) {
                None => Ok(Lookup::Miss),
                Some(value) if options.default.as_ref() == Some(&value) => {
                    Ok(resolve_default(ctx, locale, &value, options)?.into())
                }
                Some(value) => Ok(Lookup::Hit(value)),
            };
        }

        Ok(Lookup::Namespace(
            records
                .filter_map(|record| {
                    let sub_key = relative_key(&record.key, flat_key)?.to_string();
                    Some((sub_key, record.value))
                })
                .collect(),
        ))
    }

    /// Stores every leaf of `data`, without touching the cache.
    fn write_translations(
        &self,
        locale: &str,
        data: &Tree,
        options: StoreOptions,
    ) -> Result<(), I18nError> {
        let other_locales: Vec<String> = if self.stub_other_locales {
            self.available_locales().into_iter().filter(|other| other != locale).collect()
        } else {
            Vec::new()
        };

        for (key, value) in flatten_translations(data, options.escape) {
            self.store.replace(TranslationRecord::new(locale, key.as_str(), value))?;

            for other in &other_locales {
                let stub = TranslationRecord::new(other.as_str(), key.as_str(), None);
                if self.store.insert_if_absent(other, &key, vec![stub])? {
                    tracing::debug!(locale = %other, key = %key, "Stored stub for other locale");
                }
            }
        }
        Ok(())
    }
}

impl Resolver for StoreBackend {
    fn lookup(
        &self,
        ctx: &Context<'_>,
        locale: &str,
        key: &str,
        options: &Options,
    ) -> Result<Lookup, I18nError> {
        let flat_key = ctx.flat_key(key, options);
        let cache_key = CacheKey::new(locale, &flat_key, options.default.as_ref());

        if let Some(cache) = &self.cache
            && let Some(cached) = cache.get(&cache_key)
        {
            return Ok(cached);
        }

        let result = self.lookup_records(ctx, locale, &flat_key, options)?;

        if let Some(cache) = &self.cache {
            cache.insert(cache_key, result.clone());
        }
        Ok(result)
    }

    fn resolve_entry(
        &self,
        ctx: &Context<'_>,
        locale: &str,
        key: &str,
        options: &Options,
    ) -> Result<Lookup, I18nError> {
        // Misses are reported as is so that a chain can record them.
        let entry = self.lookup(ctx, locale, key, options)?;
        resolve_links(ctx, locale, entry, options)
    }

    fn store_translations(
        &self,
        locale: &str,
        data: &Tree,
        options: StoreOptions,
    ) -> Result<(), I18nError> {
        let result = self.write_translations(locale, data, options);
        self.reload();
        result
    }

    fn available_locales(&self) -> BTreeSet<String> {
        match self.store.list_locales() {
            Ok(locales) => locales,
            Err(error) => {
                tracing::warn!("Failed to list locales: {}", error);
                BTreeSet::new()
            }
        }
    }

    fn miss_capturer(&self) -> Option<&dyn MissCapturer> {
        Some(self)
    }
}
