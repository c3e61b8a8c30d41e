use std::collections::BTreeMap;

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

use crate::key::{
    FLATTEN_SEPARATOR,
    SEPARATOR_ESCAPE_CHAR,
};
use crate::plural::{
    ConfiguredPluralizer,
    DEFAULT_PLURAL_KEYS,
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "pluralization.locales.pl")
    pub field_path: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    #[error("Failed to load configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct I18nSettings {
    /// Locale used when a call names none.
    pub default_locale: String,

    /// Separator between key segments when a call does not set one.
    pub default_separator: String,

    /// Memoize store lookups until the next store or stub capture.
    pub memoize: bool,

    /// Stub a stored key in every other known locale.
    pub stub_other_locales: bool,

    pub pluralization: PluralizationConfig,
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PluralizationConfig {
    /// Plural forms for locales without an entry in `locales`.
    pub default_keys: Vec<String>,

    /// Plural forms per locale, e.g. `{"pl": ["zero", "one", "few", "other"]}`.
    pub locales: BTreeMap<String, Vec<String>>,
}

impl Default for PluralizationConfig {
    fn default() -> Self {
        Self {
            default_keys: DEFAULT_PLURAL_KEYS.iter().map(ToString::to_string).collect(),
            locales: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreConfig {
    /// JSON file holding the translation records, relative to the workspace.
    /// If unset, records are kept in memory only.
    pub path: Option<String>,
}

impl I18nSettings {
    /// # Errors
    /// - Required field is empty
    /// - Invalid separator
    /// - Invalid plural form list
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.default_locale.is_empty() {
            errors.push(ValidationError::new(
                "defaultLocale",
                "The locale cannot be empty. Example: \"en\"",
            ));
        }

        let mut separator = self.default_separator.chars();
        match (separator.next(), separator.next()) {
            (None, _) => errors.push(ValidationError::new(
                "defaultSeparator",
                "The separator cannot be empty. Please specify a separator, for example: \".\" (dot)",
            )),
            (Some(_), Some(_)) => errors.push(ValidationError::new(
                "defaultSeparator",
                format!("The separator must be a single character, got '{}'", self.default_separator),
            )),
            (Some(SEPARATOR_ESCAPE_CHAR), None) => errors.push(ValidationError::new(
                "defaultSeparator",
                "The separator \\u0001 is reserved for escaped dots",
            )),
            (Some(_), None) => {}
        }

        validate_plural_keys("pluralization.defaultKeys", &self.pluralization.default_keys, &mut errors);
        for (locale, keys) in &self.pluralization.locales {
            validate_plural_keys(&format!("pluralization.locales.{locale}"), keys, &mut errors);
        }

        if let Some(path) = &self.store.path
            && path.is_empty()
        {
            errors.push(ValidationError::new(
                "store.path",
                "The path cannot be empty. Please specify a file (e.g., \"translations.json\"), or remove this field",
            ));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// The configured separator as a character.
    #[must_use]
    pub fn separator(&self) -> char {
        self.default_separator.chars().next().unwrap_or(FLATTEN_SEPARATOR)
    }

    #[must_use]
    pub fn pluralizer(&self) -> ConfiguredPluralizer {
        ConfiguredPluralizer::new(
            self.pluralization.default_keys.clone(),
            self.pluralization.locales.clone(),
        )
    }
}

fn validate_plural_keys(field_path: &str, keys: &[String], errors: &mut Vec<ValidationError>) {
    if keys.is_empty() {
        errors.push(ValidationError::new(
            field_path,
            "At least one plural form is required. Example: [\"one\", \"other\"]",
        ));
    } else if !keys.iter().any(|key| key == "other") {
        errors.push(ValidationError::new(field_path, "The plural forms must include \"other\""));
    }
}

impl Default for I18nSettings {
    fn default() -> Self {
        Self {
            default_locale: "en".to_string(),
            default_separator: FLATTEN_SEPARATOR.to_string(),
            memoize: true,
            stub_other_locales: false,
            pluralization: PluralizationConfig::default(),
            store: StoreConfig::default(),
        }
    }
}
