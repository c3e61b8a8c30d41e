//! Ordered chain of resolvers with write-back of misses.

use std::collections::BTreeSet;
use std::sync::Arc;

use super::resolve::resolve_default;
use super::{
    Context,
    Resolver,
};
use crate::error::I18nError;
use crate::plural::PLURAL_RULE_KEY;
use crate::types::{
    Lookup,
    Namespace,
    Options,
    StoreOptions,
    Translated,
    Tree,
    Value,
};

/// Resolvers consulted in order; the first one is the primary.
///
/// The first value found wins. Namespaces are merged, earlier resolvers taking
/// precedence. When the primary misses, the key is recorded as a stub in the
/// primary (if it can record misses), seeded with the caller's default or the
/// last resolver's value.
#[derive(Debug, Clone)]
pub struct Chain {
    /// Receives stores and miss write-back.
    primary: Arc<dyn Resolver>,
    /// Consulted after the primary, in order.
    fallbacks: Vec<Arc<dyn Resolver>>,
}

impl Chain {
    #[must_use]
    pub fn new(
        primary: Arc<dyn Resolver>,
        fallbacks: impl IntoIterator<Item = Arc<dyn Resolver>>,
    ) -> Self {
        Self { primary, fallbacks: fallbacks.into_iter().collect() }
    }

    #[must_use]
    pub fn primary(&self) -> &Arc<dyn Resolver> {
        &self.primary
    }

    /// Every resolver, primary first.
    pub fn backends(&self) -> impl Iterator<Item = &Arc<dyn Resolver>> {
        std::iter::once(&self.primary).chain(self.fallbacks.iter())
    }

    /// The resolver whose data seeds write-back stubs.
    fn last(&self) -> &Arc<dyn Resolver> {
        self.fallbacks.last().unwrap_or(&self.primary)
    }

    /// Applies the caller's default rules to a value found in some resolver.
    fn found(
        ctx: &Context<'_>,
        locale: &str,
        value: Value,
        options: &Options,
    ) -> Result<Option<Translated>, I18nError> {
        if options.default.is_some() {
            resolve_default(ctx, locale, &value, options)
        } else {
            Ok(Some(Translated::Value(value)))
        }
    }

    /// Records `key` as missing in the primary. Failures are logged, never returned.
    fn write_back(&self, ctx: &Context<'_>, locale: &str, key: &str, options: &Options) {
        let Some(capturer) = self.primary.miss_capturer() else {
            return;
        };

        let mut stub_options = options.clone();
        if stub_options.default.is_none() {
            stub_options.default = self.fallback_value(ctx, locale, key, options);
        }

        match capturer.record_miss(ctx, locale, key, &stub_options) {
            Ok(true) => tracing::debug!(locale, key, "Recorded missing translation in primary"),
            Ok(false) => {}
            Err(error) => {
                tracing::warn!(locale, key, "Failed to record missing translation: {}", error);
            }
        }
    }

    /// Raw value of `key` in the last resolver, if it holds a single value.
    fn fallback_value(
        &self,
        ctx: &Context<'_>,
        locale: &str,
        key: &str,
        options: &Options,
    ) -> Option<Value> {
        match self.last().lookup(ctx, locale, key, &options.without_default()) {
            Ok(Lookup::Hit(value)) => Some(value),
            Ok(Lookup::Namespace(_) | Lookup::Miss) => None,
            Err(error) => {
                tracing::warn!(locale, key, "Failed to look up fallback value: {}", error);
                None
            }
        }
    }
}

impl Resolver for Chain {
    fn lookup(
        &self,
        ctx: &Context<'_>,
        locale: &str,
        key: &str,
        options: &Options,
    ) -> Result<Lookup, I18nError> {
        let mut namespace: Option<Namespace> = None;
        for backend in self.backends() {
            match backend.lookup(ctx, locale, key, options)? {
                Lookup::Hit(value) => return Ok(Lookup::Hit(value)),
                Lookup::Namespace(found) => {
                    namespace.get_or_insert_with(Namespace::new).merge_missing(found);
                }
                Lookup::Miss => {}
            }
        }
        Ok(namespace.map_or(Lookup::Miss, Lookup::Namespace))
    }

    fn resolve_entry(
        &self,
        ctx: &Context<'_>,
        locale: &str,
        key: &str,
        options: &Options,
    ) -> Result<Lookup, I18nError> {
        let without_default = options.without_default();
        let last_index = self.fallbacks.len();

        let mut namespace: Option<Namespace> = None;
        let mut translation: Option<Translated> = None;
        let mut primary_missed = false;
        let mut last_missed = false;

        // The caller's default is applied here, after every resolver had its turn.
        for (index, backend) in self.backends().enumerate() {
            match backend.resolve_entry(ctx, locale, key, &without_default)? {
                Lookup::Miss => {
                    primary_missed |= index == 0;
                    last_missed = index == last_index;
                }
                Lookup::Namespace(found) => match options.count {
                    None => namespace.get_or_insert_with(Namespace::new).merge_missing(found),
                    Some(count) => match ctx.pluralizer().pluralize(locale, &found, count)? {
                        Some(value) => {
                            translation = Self::found(ctx, locale, value, options)?;
                            break;
                        }
                        // An untranslated plural form counts as a miss for the default.
                        None => last_missed = index == last_index,
                    },
                },
                Lookup::Hit(value) => {
                    translation = Self::found(ctx, locale, value, options)?;
                    break;
                }
            }
        }

        if translation.is_none()
            && last_missed
            && let Some(default) = &options.default
        {
            translation = resolve_default(ctx, locale, default, options)?;
        }

        if primary_missed && !key.contains(PLURAL_RULE_KEY) {
            self.write_back(ctx, locale, key, options);
        }

        Ok(match translation {
            Some(translated) => Some(translated).into(),
            None => namespace.map_or(Lookup::Miss, Lookup::Namespace),
        })
    }

    fn store_translations(
        &self,
        locale: &str,
        data: &Tree,
        options: StoreOptions,
    ) -> Result<(), I18nError> {
        self.primary.store_translations(locale, data, options)
    }

    fn available_locales(&self) -> BTreeSet<String> {
        self.backends().flat_map(|backend| backend.available_locales()).collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use googletest::prelude::*;
    use serde_json::json;

    use super::*;
    use crate::interpolate::PercentInterpolator;
    use crate::plural::ConfiguredPluralizer;
    use crate::store::{
        MemoryStore,
        TranslationStore,
    };
    use crate::test_utils::{
        static_backend,
        store_backend,
    };

    fn resolve(chain: &Chain, key: &str, options: &Options) -> Lookup {
        let pluralizer = ConfiguredPluralizer::default();
        let ctx = Context::new(chain, &pluralizer, &PercentInterpolator, '.');
        chain.resolve_entry(&ctx, "en", key, options).unwrap()
    }

    fn chain(primary: serde_json::Value, fallback: serde_json::Value) -> (Arc<MemoryStore>, Chain) {
        let (store, backend) = store_backend("en", primary);
        let fallback: Arc<dyn Resolver> = static_backend("en", fallback);
        (store, Chain::new(backend, [fallback]))
    }

    #[googletest::test]
    fn primary_value_wins_without_write_back() {
        let (store, chain) = chain(json!({ "greeting": "Hi" }), json!({ "greeting": "Hello" }));

        expect_that!(resolve(&chain, "greeting", &Options::new()), eq(&Lookup::Hit(Value::text("Hi"))));
        expect_that!(store.len().unwrap(), eq(1));
    }

    #[googletest::test]
    fn fallback_value_is_written_back() {
        let (store, chain) = chain(json!({}), json!({ "greeting": "Hello" }));

        expect_that!(
            resolve(&chain, "greeting", &Options::new()),
            eq(&Lookup::Hit(Value::text("Hello")))
        );
        expect_that!(
            store.find_by_key("en", "greeting").unwrap().and_then(|r| r.value),
            some(eq(&Value::text("Hello")))
        );
    }

    #[googletest::test]
    fn namespaces_merge_with_primary_precedence() {
        let (_, chain) = chain(
            json!({ "menu": { "open": "Open!" } }),
            json!({ "menu": { "open": "Open", "close": "Close" } }),
        );

        let Lookup::Namespace(namespace) = resolve(&chain, "menu", &Options::new()) else {
            panic!("expected a namespace");
        };

        expect_that!(namespace.get("open"), some(eq(&Value::text("Open!"))));
        expect_that!(namespace.get("close"), some(eq(&Value::text("Close"))));
    }

    #[googletest::test]
    fn plural_stubs_fall_through_to_fallback() {
        let (store, chain) = chain(
            json!({}),
            json!({ "apples": { "one": "an apple", "other": "%{count} apples" } }),
        );
        let options = Options::new().with_count(2);

        expect_that!(
            resolve(&chain, "apples", &options),
            eq(&Lookup::Hit(Value::text("%{count} apples")))
        );
        expect_that!(store.find_by_key("en", "apples.other").unwrap().map(|r| r.is_stub()), some(eq(true)));
        expect_that!(
            resolve(&chain, "apples", &options),
            eq(&Lookup::Hit(Value::text("%{count} apples")))
        );
    }

    #[googletest::test]
    fn caller_default_is_applied_after_every_miss() {
        let (store, chain) = chain(json!({}), json!({}));
        let options = Options::new().with_default(Value::text("Fallback"));

        expect_that!(resolve(&chain, "nowhere", &options), eq(&Lookup::Hit(Value::text("Fallback"))));
        expect_that!(
            store.find_by_key("en", "nowhere").unwrap().and_then(|r| r.value),
            some(eq(&Value::text("Fallback")))
        );
    }

    #[googletest::test]
    fn lone_primary_records_the_caller_default() {
        let (store, backend) = store_backend("en", json!({}));
        let chain = Chain::new(backend, []);
        let options = Options::new().with_default(Value::text("Welcome"));

        expect_that!(resolve(&chain, "title", &options), eq(&Lookup::Hit(Value::text("Welcome"))));
        expect_that!(
            store.find_by_key("en", "title").unwrap().and_then(|r| r.value),
            some(eq(&Value::text("Welcome")))
        );
        expect_that!(
            resolve(&chain, "title", &Options::new()),
            eq(&Lookup::Hit(Value::text("Welcome")))
        );
    }

    #[googletest::test]
    fn default_wins_over_primary_namespace_when_last_misses() {
        let (_, chain) = chain(json!({ "menu": { "open": "Open" } }), json!({}));
        let options = Options::new().with_default(Value::text("No menu"));

        expect_that!(resolve(&chain, "menu", &options), eq(&Lookup::Hit(Value::text("No menu"))));
    }

    #[googletest::test]
    fn plural_rule_keys_are_never_recorded() {
        let (store, chain) = chain(json!({}), json!({}));

        expect_that!(resolve(&chain, "i18n.plural.rule", &Options::new()).is_miss(), eq(true));
        expect_that!(store.len().unwrap(), eq(0));
    }

    #[googletest::test]
    fn locales_are_the_union() {
        let (_, backend) = store_backend("de", json!({ "a": "A" }));
        let fallback: Arc<dyn Resolver> = static_backend("fr", json!({ "b": "B" }));
        let chain = Chain::new(backend, [fallback]);

        expect_that!(chain.available_locales(), elements_are![eq("de"), eq("fr")]);
    }
}
