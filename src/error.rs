//! Error types for translation resolution and persistence.

use thiserror::Error;

/// Errors raised by a [`TranslationStore`](crate::store::TranslationStore).
#[derive(Error, Debug)]
pub enum StoreError {
    /// The store cannot be reached (e.g., a poisoned lock or an uninitialized backend).
    #[error("Translation store is unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to access translation store file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to (de)serialize translation store: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Errors surfaced by translation calls.
#[derive(Error, Debug)]
pub enum I18nError {
    /// No locale was given for the call.
    #[error("Invalid locale: a locale is required")]
    InvalidLocale,

    #[error("Translation key must not be empty")]
    EmptyKey,

    /// No value was found along the requested path.
    ///
    /// Resolvers report misses as [`Lookup::Miss`](crate::types::Lookup::Miss);
    /// this variant only appears once a miss reaches the caller.
    #[error("Translation missing: {locale}.{key}")]
    MissingTranslation { locale: String, key: String },

    #[error("Missing interpolation argument '{key}' in \"{template}\"")]
    MissingInterpolationArgument { key: String, template: String },

    #[error("Invalid pluralization data: count {count} selects '{key}', which is not defined")]
    InvalidPluralizationData { key: String, count: i64 },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl I18nError {
    /// Returns true if this error only signals that no translation was found.
    #[must_use]
    pub const fn is_missing_translation(&self) -> bool {
        matches!(self, Self::MissingTranslation { .. })
    }
}
