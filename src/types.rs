//! Core types used throughout the project.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use serde::{
    Deserialize,
    Serialize,
};

use crate::key::{
    FLATTEN_SEPARATOR,
    unescape_segment,
};

/// Option names that never count as interpolation placeholders.
pub const RESERVED_KEYS: &[&str] = &[
    "scope",
    "default",
    "separator",
    "resolve",
    "object",
    "fallback",
    "format",
    "cascade",
    "throw",
    "raise",
    "rescue_format",
    "locale",
];

/// Interpolation argument implicitly supplied by `count`.
pub const COUNT_KEY: &str = "count";

/// A stored translation value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Value {
    /// Translated text, possibly containing `%{name}` placeholders.
    Text(String),
    /// A link to another translation key, resolved on read.
    Key(String),
    /// An ordered list of values (array entries or default chains).
    List(Vec<Value>),
}

impl Value {
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    #[must_use]
    pub fn key(key: impl Into<String>) -> Self {
        Self::Key(key.into())
    }

    #[must_use]
    pub fn list(items: impl IntoIterator<Item = Self>) -> Self {
        Self::List(items.into_iter().collect())
    }

    /// Returns the text if this is a [`Value::Text`].
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Key(_) | Self::List(_) => None,
        }
    }

    /// Converts a JSON value; `null` has no value and yields `None`.
    ///
    /// Numbers and booleans keep their JSON text, nested objects inside arrays
    /// are kept as serialized JSON.
    #[must_use]
    pub fn from_json(json: &serde_json::Value) -> Option<Self> {
        match json {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) => Some(Self::Text(s.clone())),
            serde_json::Value::Array(items) => {
                Some(Self::List(items.iter().filter_map(Self::from_json).collect()))
            }
            other => Some(Self::Text(other.to_string())),
        }
    }

    /// Renders the value for display. Links are shown as `:key`.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Text(text) => serde_json::Value::String(text.clone()),
            Self::Key(key) => serde_json::Value::String(format!(":{key}")),
            Self::List(items) => serde_json::Value::Array(items.iter().map(Self::to_json).collect()),
        }
    }
}

/// Nested translation data accepted by `store_translations`.
///
/// Branch children keep insertion order, so later entries win when two
/// entries address the same key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tree {
    /// A leaf; `None` stores a stub awaiting translation.
    Leaf(Option<Value>),
    Branch(Vec<(String, Tree)>),
}

impl Tree {
    #[must_use]
    pub const fn leaf(value: Value) -> Self {
        Self::Leaf(Some(value))
    }

    #[must_use]
    pub fn branch<K: Into<String>>(children: impl IntoIterator<Item = (K, Self)>) -> Self {
        Self::Branch(children.into_iter().map(|(key, child)| (key.into(), child)).collect())
    }
}

impl From<&serde_json::Value> for Tree {
    fn from(json: &serde_json::Value) -> Self {
        match json {
            serde_json::Value::Object(map) => {
                Self::Branch(map.iter().map(|(key, value)| (key.clone(), Self::from(value))).collect())
            }
            other => Self::Leaf(Value::from_json(other)),
        }
    }
}

impl From<serde_json::Value> for Tree {
    fn from(json: serde_json::Value) -> Self {
        Self::from(&json)
    }
}

/// A reconstructed subtree: relative flat sub-key to value.
///
/// Absent values are stubs that have not been translated yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Namespace(BTreeMap<String, Option<Value>>);

impl Namespace {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Option<Value>) {
        self.0.insert(key.into(), value);
    }

    /// Returns the value stored under `key`, if it is present and translated.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key).and_then(Option::as_ref)
    }

    /// Returns true if `key` is part of the namespace, translated or not.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&Value>)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value.as_ref()))
    }

    /// Merges `other` into `self`, keeping every value already present.
    ///
    /// Entries of `self` that are absent (stubs) are filled from `other`.
    pub fn merge_missing(&mut self, other: Self) {
        for (key, value) in other.0 {
            match self.0.entry(key) {
                Entry::Vacant(entry) => {
                    entry.insert(value);
                }
                Entry::Occupied(mut entry) => {
                    if entry.get().is_none() && value.is_some() {
                        entry.insert(value);
                    }
                }
            }
        }
    }

    /// Renders the namespace as nested JSON, splitting sub-keys on the flat separator.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        let mut root = serde_json::Map::new();
        for (key, value) in &self.0 {
            let segments: Vec<String> = key.split(FLATTEN_SEPARATOR).map(unescape_segment).collect();
            insert_nested(
                &mut root,
                &segments,
                value.as_ref().map_or(serde_json::Value::Null, Value::to_json),
            );
        }
        serde_json::Value::Object(root)
    }
}

fn insert_nested(
    map: &mut serde_json::Map<String, serde_json::Value>,
    segments: &[String],
    value: serde_json::Value,
) {
    match segments {
        [] => {}
        [last] => {
            map.insert(last.clone(), value);
        }
        [first, rest @ ..] => {
            let child = map
                .entry(first.clone())
                .or_insert_with(|| serde_json::Value::Object(serde_json::Map::new()));
            if let serde_json::Value::Object(child_map) = child {
                insert_nested(child_map, rest, value);
            }
        }
    }
}

impl<K: Into<String>> FromIterator<(K, Option<Value>)> for Namespace {
    fn from_iter<I: IntoIterator<Item = (K, Option<Value>)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(key, value)| (key.into(), value)).collect())
    }
}

/// The result of a single resolver call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// A single value stored at the requested key.
    Hit(Value),
    /// A subtree stored under the requested key.
    Namespace(Namespace),
    /// Nothing usable along the requested path.
    Miss,
}

impl Lookup {
    #[must_use]
    pub const fn is_miss(&self) -> bool {
        matches!(self, Self::Miss)
    }

    #[must_use]
    pub fn into_translated(self) -> Option<Translated> {
        match self {
            Self::Hit(value) => Some(Translated::Value(value)),
            Self::Namespace(namespace) => Some(Translated::Namespace(namespace)),
            Self::Miss => None,
        }
    }
}

impl From<Option<Translated>> for Lookup {
    fn from(translated: Option<Translated>) -> Self {
        match translated {
            Some(Translated::Value(value)) => Self::Hit(value),
            Some(Translated::Namespace(namespace)) => Self::Namespace(namespace),
            None => Self::Miss,
        }
    }
}

/// A successfully resolved translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Translated {
    Value(Value),
    Namespace(Namespace),
}

impl Translated {
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Value(value) => value.as_text(),
            Self::Namespace(_) => None,
        }
    }

    #[must_use]
    pub const fn as_namespace(&self) -> Option<&Namespace> {
        match self {
            Self::Namespace(namespace) => Some(namespace),
            Self::Value(_) => None,
        }
    }

    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Value(value) => value.to_json(),
            Self::Namespace(namespace) => namespace.to_json(),
        }
    }
}

/// Per-call translation options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    /// Segments prepended to the key.
    pub scope: Vec<String>,
    /// Separator used in `key` and `scope`; the configured default when unset.
    pub separator: Option<char>,
    /// Selects a plural form and is available as the `count` placeholder.
    pub count: Option<i64>,
    /// Fallback used when nothing is found.
    pub default: Option<Value>,
    /// Interpolation arguments.
    pub values: BTreeMap<String, String>,
}

impl Options {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_scope<S: Into<String>>(mut self, scope: impl IntoIterator<Item = S>) -> Self {
        self.scope = scope.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub const fn with_separator(mut self, separator: char) -> Self {
        self.separator = Some(separator);
        self
    }

    #[must_use]
    pub const fn with_count(mut self, count: i64) -> Self {
        self.count = Some(count);
        self
    }

    #[must_use]
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    #[must_use]
    pub fn with_value(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    /// Returns a copy without the `default` option.
    #[must_use]
    pub fn without_default(&self) -> Self {
        Self { default: None, ..self.clone() }
    }

    /// Interpolation arguments: every non-reserved value plus `count`.
    #[must_use]
    pub fn interpolation_values(&self) -> BTreeMap<String, String> {
        let mut values: BTreeMap<String, String> = self
            .values
            .iter()
            .filter(|(name, _)| !RESERVED_KEYS.contains(&name.as_str()))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
        if let Some(count) = self.count {
            values.insert(COUNT_KEY.to_string(), count.to_string());
        }
        values
    }

    /// Placeholder names persisted alongside stubs for translators.
    #[must_use]
    pub fn placeholder_names(&self) -> Vec<String> {
        self.interpolation_values().into_keys().collect()
    }
}

/// Options for `store_translations`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOptions {
    /// Escape literal dots in input key segments so they are not read as nesting.
    pub escape: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self { escape: true }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    #[rstest]
    #[case::string(json!("Hello"), Some(Value::text("Hello")))]
    #[case::number(json!(42), Some(Value::text("42")))]
    #[case::boolean(json!(true), Some(Value::text("true")))]
    #[case::null(json!(null), None)]
    #[case::array(json!(["a", null, 1]), Some(Value::list([Value::text("a"), Value::text("1")])))]
    fn test_value_from_json(#[case] json: serde_json::Value, #[case] expected: Option<Value>) {
        assert_that!(Value::from_json(&json), eq(&expected));
    }

    #[googletest::test]
    fn test_tree_from_json_keeps_insertion_order() {
        let tree = Tree::from(json!({ "zeta": "z", "alpha": { "beta": null } }));

        expect_that!(
            tree,
            eq(&Tree::branch([
                ("zeta", Tree::leaf(Value::text("z"))),
                ("alpha", Tree::branch([("beta", Tree::Leaf(None))])),
            ]))
        );
    }

    #[googletest::test]
    fn test_namespace_merge_missing_keeps_existing_values() {
        let mut namespace: Namespace =
            [("one", Some(Value::text("first"))), ("other", None)].into_iter().collect();
        let lower: Namespace = [
            ("one", Some(Value::text("second"))),
            ("other", Some(Value::text("others"))),
            ("zero", Some(Value::text("none"))),
        ]
        .into_iter()
        .collect();

        namespace.merge_missing(lower);

        expect_that!(namespace.get("one"), some(eq(&Value::text("first"))));
        expect_that!(namespace.get("other"), some(eq(&Value::text("others"))));
        expect_that!(namespace.get("zero"), some(eq(&Value::text("none"))));
        expect_that!(namespace.len(), eq(3));
    }

    #[googletest::test]
    fn test_namespace_to_json_nests_and_unescapes() {
        let namespace: Namespace = [
            ("bar.baz", Some(Value::text("deep"))),
            ("qux\u{1}quux", Some(Value::text("dotted"))),
            ("stub", None),
        ]
        .into_iter()
        .collect();

        expect_that!(
            namespace.to_json(),
            eq(&json!({ "bar": { "baz": "deep" }, "qux.quux": "dotted", "stub": null }))
        );
    }

    #[googletest::test]
    fn test_interpolation_values_skip_reserved_and_add_count() {
        let options = Options::new()
            .with_count(3)
            .with_value("name", "Lucy")
            .with_value("scope", "ignored");

        let values = options.interpolation_values();

        expect_that!(values.get("name"), some(eq("Lucy")));
        expect_that!(values.get("count"), some(eq("3")));
        expect_that!(values.contains_key("scope"), eq(false));
        expect_that!(options.placeholder_names(), elements_are![eq("count"), eq("name")]);
    }

    #[googletest::test]
    fn test_without_default_keeps_other_options() {
        let options = Options::new().with_scope(["a"]).with_default(Value::text("x")).with_count(1);

        let stripped = options.without_default();

        expect_that!(stripped.default, none());
        expect_that!(stripped.scope, elements_are![eq("a")]);
        expect_that!(stripped.count, some(eq(1)));
    }

    #[googletest::test]
    fn test_value_serde_is_tagged() {
        let value = Value::list([Value::key("also_missing"), Value::text("Not here")]);

        let json = serde_json::to_value(&value).unwrap();
        let decoded: Value = serde_json::from_str(&json.to_string()).unwrap();

        assert_eq!(json, json!({ "list": [{ "key": "also_missing" }, { "text": "Not here" }] }));
        assert_eq!(decoded, value);
    }
}
