//! Placeholder substitution.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use regex::{
    Captures,
    Regex,
};

use crate::error::I18nError;
use crate::types::Value;

/// Matches `%%` and `%{name}`.
#[allow(clippy::expect_used)]
static INTERPOLATION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"%%|%\{(\w+)\}").expect("interpolation pattern is valid"));

/// Substitutes named placeholders in translated text.
pub trait Interpolator: Send + Sync + fmt::Debug {
    /// # Errors
    /// `MissingInterpolationArgument` if `template` references a name missing from `values`.
    fn interpolate(
        &self,
        template: &str,
        values: &BTreeMap<String, String>,
    ) -> Result<String, I18nError>;
}

/// `%{name}` placeholders; `%%` renders a literal `%`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PercentInterpolator;

impl Interpolator for PercentInterpolator {
    fn interpolate(
        &self,
        template: &str,
        values: &BTreeMap<String, String>,
    ) -> Result<String, I18nError> {
        let mut missing = None;
        let result = INTERPOLATION_PATTERN.replace_all(template, |captures: &Captures<'_>| {
            let Some(name) = captures.get(1) else {
                return "%".to_string();
            };
            values.get(name.as_str()).cloned().unwrap_or_else(|| {
                missing.get_or_insert_with(|| name.as_str().to_string());
                String::new()
            })
        });

        match missing {
            Some(key) => {
                Err(I18nError::MissingInterpolationArgument { key, template: template.to_string() })
            }
            None => Ok(result.into_owned()),
        }
    }
}

/// Interpolates text values, and each element of lists. Links pass through.
///
/// Nothing is substituted when `values` is empty.
pub fn interpolate_value(
    interpolator: &dyn Interpolator,
    value: Value,
    values: &BTreeMap<String, String>,
) -> Result<Value, I18nError> {
    if values.is_empty() {
        return Ok(value);
    }
    match value {
        Value::Text(text) => Ok(Value::Text(interpolator.interpolate(&text, values)?)),
        Value::List(items) => Ok(Value::List(
            items
                .into_iter()
                .map(|item| interpolate_value(interpolator, item, values))
                .collect::<Result<_, _>>()?,
        )),
        link @ Value::Key(_) => Ok(link),
    }
}
