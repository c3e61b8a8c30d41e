//! Plural form selection.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::I18nError;
use crate::types::{
    Namespace,
    Value,
};

/// Keys under which plural rule data is stored; never captured as missing.
pub const PLURAL_RULE_KEY: &str = "i18n.plural.rule";

/// Plural forms used when a locale has none configured.
pub const DEFAULT_PLURAL_KEYS: &[&str] = &["one", "other"];

/// Plural rules for locales.
pub trait Pluralizer: Send + Sync + fmt::Debug {
    /// Returns the plural form names of `locale`, e.g. `["zero", "one", "other"]`.
    fn plural_keys(&self, locale: &str) -> Vec<String>;

    /// Picks the form of `namespace` that matches `count`.
    ///
    /// Returns `Ok(None)` if the form exists but is untranslated.
    ///
    /// # Errors
    /// `InvalidPluralizationData` if the selected form is not in `namespace`.
    fn pluralize(
        &self,
        _locale: &str,
        namespace: &Namespace,
        count: i64,
    ) -> Result<Option<Value>, I18nError> {
        let key = pluralization_key(namespace, count);
        if !namespace.contains_key(key) {
            return Err(I18nError::InvalidPluralizationData { key: key.to_string(), count });
        }
        Ok(namespace.get(key).cloned())
    }
}

/// Returns the form to use for `count`: `zero` only when the namespace defines it.
#[must_use]
pub fn pluralization_key(namespace: &Namespace, count: i64) -> &'static str {
    match count {
        0 if namespace.contains_key("zero") => "zero",
        1 => "one",
        _ => "other",
    }
}

/// A [`Pluralizer`] with per-locale plural form lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfiguredPluralizer {
    /// Forms for locales without an entry in `locales`.
    default_keys: Vec<String>,
    /// locale → forms
    locales: BTreeMap<String, Vec<String>>,
}

impl ConfiguredPluralizer {
    #[must_use]
    pub fn new(default_keys: Vec<String>, locales: BTreeMap<String, Vec<String>>) -> Self {
        Self { default_keys, locales }
    }

    /// Sets the forms of a single locale.
    #[must_use]
    pub fn with_locale(mut self, locale: impl Into<String>, keys: &[&str]) -> Self {
        self.locales.insert(locale.into(), keys.iter().map(ToString::to_string).collect());
        self
    }
}

impl Default for ConfiguredPluralizer {
    fn default() -> Self {
        Self::new(DEFAULT_PLURAL_KEYS.iter().map(ToString::to_string).collect(), BTreeMap::new())
    }
}

impl Pluralizer for ConfiguredPluralizer {
    fn plural_keys(&self, locale: &str) -> Vec<String> {
        self.locales.get(locale).unwrap_or(&self.default_keys).clone()
    }
}
