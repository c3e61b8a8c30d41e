//! Translation facade.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::backend::{
    Context,
    Resolver,
};
use crate::config::I18nSettings;
use crate::error::I18nError;
use crate::interpolate::{
    Interpolator,
    PercentInterpolator,
    interpolate_value,
};
use crate::key::FLATTEN_SEPARATOR;
use crate::plural::{
    ConfiguredPluralizer,
    Pluralizer,
};
use crate::types::{
    Lookup,
    Options,
    StoreOptions,
    Translated,
    Tree,
};

/// Entry point for translation calls.
///
/// Owns the resolver (usually a [`Chain`](crate::backend::Chain)) together with
/// the plural and interpolation rules applied to what it returns.
#[derive(Debug)]
pub struct I18n {
    /// Root resolver of every call.
    resolver: Arc<dyn Resolver>,
    pluralizer: Box<dyn Pluralizer>,
    interpolator: Box<dyn Interpolator>,
    /// Key separator when a call sets none.
    default_separator: char,
    /// Locale used by [`I18n::t`].
    default_locale: String,
}

impl I18n {
    #[must_use]
    pub fn new(resolver: Arc<dyn Resolver>) -> Self {
        Self {
            resolver,
            pluralizer: Box::new(ConfiguredPluralizer::default()),
            interpolator: Box::new(PercentInterpolator),
            default_separator: FLATTEN_SEPARATOR,
            default_locale: "en".to_string(),
        }
    }

    #[must_use]
    pub fn from_settings(resolver: Arc<dyn Resolver>, settings: &I18nSettings) -> Self {
        Self::new(resolver)
            .with_pluralizer(settings.pluralizer())
            .with_default_separator(settings.separator())
            .with_default_locale(settings.default_locale.clone())
    }

    #[must_use]
    pub fn with_pluralizer(mut self, pluralizer: impl Pluralizer + 'static) -> Self {
        self.pluralizer = Box::new(pluralizer);
        self
    }

    #[must_use]
    pub fn with_interpolator(mut self, interpolator: impl Interpolator + 'static) -> Self {
        self.interpolator = Box::new(interpolator);
        self
    }

    #[must_use]
    pub const fn with_default_separator(mut self, separator: char) -> Self {
        self.default_separator = separator;
        self
    }

    #[must_use]
    pub fn with_default_locale(mut self, locale: impl Into<String>) -> Self {
        self.default_locale = locale.into();
        self
    }

    #[must_use]
    pub fn resolver(&self) -> &Arc<dyn Resolver> {
        &self.resolver
    }

    #[must_use]
    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }

    /// Context for a call rooted at this facade's resolver.
    fn context(&self) -> Context<'_> {
        Context::new(
            self.resolver.as_ref(),
            self.pluralizer.as_ref(),
            self.interpolator.as_ref(),
            self.default_separator,
        )
    }

    /// Translates `key` in `locale`.
    ///
    /// With `count`, a namespace result is pluralized. Text is interpolated
    /// with the values of `options` (and `count`).
    ///
    /// # Errors
    /// - `InvalidLocale` if `locale` is `None`
    /// - `EmptyKey`
    /// - `MissingTranslation` if nothing resolves, including an untranslated plural form
    /// - `InvalidPluralizationData`, `MissingInterpolationArgument`
    /// - `Store` if the backing store fails
    pub fn translate(
        &self,
        locale: Option<&str>,
        key: &str,
        options: &Options,
    ) -> Result<Translated, I18nError> {
        let locale = locale.ok_or(I18nError::InvalidLocale)?;
        if key.is_empty() {
            return Err(I18nError::EmptyKey);
        }

        let ctx = self.context();
        let missing = || I18nError::MissingTranslation {
            locale: locale.to_string(),
            key: ctx.flat_key(key, options),
        };

        let entry = self.resolver.resolve_entry(&ctx, locale, key, options)?;
        let translated = match (entry, options.count) {
            (Lookup::Miss, _) => return Err(missing()),
            (Lookup::Namespace(namespace), Some(count)) => {
                match self.pluralizer.pluralize(locale, &namespace, count)? {
                    Some(value) => Translated::Value(value),
                    None => return Err(missing()),
                }
            }
            (Lookup::Namespace(namespace), None) => Translated::Namespace(namespace),
            (Lookup::Hit(value), _) => Translated::Value(value),
        };

        match translated {
            Translated::Value(value) => Ok(Translated::Value(interpolate_value(
                self.interpolator.as_ref(),
                value,
                &options.interpolation_values(),
            )?)),
            namespace @ Translated::Namespace(_) => Ok(namespace),
        }
    }

    /// Translates `key` in the default locale.
    pub fn t(&self, key: &str, options: &Options) -> Result<Translated, I18nError> {
        self.translate(Some(&self.default_locale), key, options)
    }

    /// Raw lookup without links, defaults, pluralization or interpolation.
    pub fn lookup(&self, locale: &str, key: &str, options: &Options) -> Result<Lookup, I18nError> {
        self.resolver.lookup(&self.context(), locale, key, options)
    }

    pub fn store_translations(
        &self,
        locale: &str,
        data: &Tree,
        options: StoreOptions,
    ) -> Result<(), I18nError> {
        tracing::debug!(locale, "Storing translations");
        self.resolver.store_translations(locale, data, options)
    }

    #[must_use]
    pub fn available_locales(&self) -> BTreeSet<String> {
        self.resolver.available_locales()
    }
}
