//! Flat translation key handling.
//!
//! Keys are stored flat, with path segments joined by [`FLATTEN_SEPARATOR`].
//! A literal dot inside a single segment is stored as [`SEPARATOR_ESCAPE_CHAR`]
//! so it never reads as a path boundary.

use crate::types::{
    Tree,
    Value,
};

/// Separator between segments of a flat key.
pub const FLATTEN_SEPARATOR: char = '.';

/// Stands in for a literal dot inside a single key segment.
pub const SEPARATOR_ESCAPE_CHAR: char = '\u{1}';

/// Joins `scope` and `key` into a flat key.
///
/// With a custom `separator`, literal dots are escaped and the custom
/// separator becomes the flat separator, in one pass.
///
/// # Examples
/// ```
/// use i18n_store_backend::key::normalize_flat_keys;
///
/// assert_eq!(normalize_flat_keys("bar", &["foo".to_string()], '.'), "foo.bar");
/// assert_eq!(normalize_flat_keys("foo|baz.zab", &[], '|'), "foo.baz\u{1}zab");
/// ```
#[must_use]
pub fn normalize_flat_keys(key: &str, scope: &[String], separator: char) -> String {
    let parts = scope.iter().map(String::as_str).chain(std::iter::once(key));

    if separator == FLATTEN_SEPARATOR {
        return parts.collect::<Vec<_>>().join(".");
    }

    parts
        .map(|part| {
            part.chars()
                .map(|c| match c {
                    FLATTEN_SEPARATOR => SEPARATOR_ESCAPE_CHAR,
                    c if c == separator => FLATTEN_SEPARATOR,
                    c => c,
                })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join(".")
}

/// Returns every prefix path of `flat_key`, root first.
///
/// For `foo.bar.baz` this is `["foo", "foo.bar", "foo.bar.baz"]`.
#[must_use]
pub fn expand_keys(flat_key: &str) -> Vec<String> {
    let mut keys: Vec<String> = Vec::new();
    for segment in flat_key.split(FLATTEN_SEPARATOR) {
        let next = keys.last().map_or_else(
            || segment.to_string(),
            |last| format!("{last}{FLATTEN_SEPARATOR}{segment}"),
        );
        keys.push(next);
    }
    keys
}

/// Escapes literal dots in a single segment.
#[must_use]
pub fn escape_default_separator(segment: &str) -> String {
    segment.replace(FLATTEN_SEPARATOR, &SEPARATOR_ESCAPE_CHAR.to_string())
}

/// Restores literal dots in a single segment.
#[must_use]
pub fn unescape_segment(segment: &str) -> String {
    segment.replace(SEPARATOR_ESCAPE_CHAR, &FLATTEN_SEPARATOR.to_string())
}

/// Checks if `child_key` lies strictly below `parent_key`.
#[must_use]
pub fn is_child_key(child_key: &str, parent_key: &str) -> bool {
    relative_key(child_key, parent_key).is_some()
}

/// Returns the sub-key of `child_key` relative to `parent_key`.
///
/// `relative_key("foo.bar.baz", "foo")` is `Some("bar.baz")`.
#[must_use]
pub fn relative_key<'a>(child_key: &'a str, parent_key: &str) -> Option<&'a str> {
    child_key
        .strip_prefix(parent_key)?
        .strip_prefix(FLATTEN_SEPARATOR)
        .filter(|remainder| !remainder.is_empty())
}

/// Flattens nested translation data into `(flat key, value)` pairs.
///
/// Only leaves are produced, in input order. With `escape`, dots inside a
/// segment are escaped; otherwise they split the segment into nested paths.
#[must_use]
pub fn flatten_translations(tree: &Tree, escape: bool) -> Vec<(String, Option<Value>)> {
    let mut result = Vec::new();
    flatten_tree(tree, escape, None, &mut result);
    result
}

fn flatten_tree(
    tree: &Tree,
    escape: bool,
    prefix: Option<&str>,
    result: &mut Vec<(String, Option<Value>)>,
) {
    match tree {
        Tree::Branch(children) => {
            for (key, child) in children {
                let segment = if escape { escape_default_separator(key) } else { key.clone() };
                let full_key =
                    prefix.map_or_else(|| segment.clone(), |p| format!("{p}{FLATTEN_SEPARATOR}{segment}"));
                flatten_tree(child, escape, Some(&full_key), result);
            }
        }
        Tree::Leaf(value) => {
            if let Some(key) = prefix {
                result.push((key.to_string(), value.clone()));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;
    use rstest::*;
    use serde_json::json;

    use super::*;

    #[rstest]
    #[case::plain("foo", &[], '.', "foo")]
    #[case::nested("foo.bar", &[], '.', "foo.bar")]
    #[case::scoped("baz", &["foo", "bar"], '.', "foo.bar.baz")]
    #[case::custom_separator("foo|baz", &[], '|', "foo.baz")]
    #[case::custom_separator_with_dot("foo|baz.zab", &[], '|', "foo.baz\u{1}zab")]
    #[case::custom_separator_scope("bar", &["foo|x"], '|', "foo.x.bar")]
    fn normalize_flat_keys_cases(
        #[case] key: &str,
        #[case] scope: &[&str],
        #[case] separator: char,
        #[case] expected: &str,
    ) {
        let scope: Vec<String> = scope.iter().map(ToString::to_string).collect();
        assert_that!(normalize_flat_keys(key, &scope, separator), eq(expected));
    }

    #[rstest]
    fn expand_keys_returns_root_to_leaf_prefixes() {
        assert_that!(
            expand_keys("foo.bar.baz"),
            elements_are![eq("foo"), eq("foo.bar"), eq("foo.bar.baz")]
        );
        assert_that!(expand_keys("foo"), elements_are![eq("foo")]);
    }

    #[rstest]
    #[case("foo.bar", "foo", Some("bar"))]
    #[case("foo.bar.baz", "foo", Some("bar.baz"))]
    #[case("foo.bar.baz", "foo.bar", Some("baz"))]
    #[case("foo", "foo", None)]
    #[case("foobar", "foo", None)]
    #[case("foo.", "foo", None)]
    #[case("other.key", "foo", None)]
    fn relative_key_cases(#[case] child: &str, #[case] parent: &str, #[case] expected: Option<&str>) {
        assert_eq!(relative_key(child, parent), expected);
        assert_eq!(is_child_key(child, parent), expected.is_some());
    }

    #[rstest]
    fn flatten_translations_keeps_input_order() {
        let tree = Tree::from(json!({
            "foo": "x",
            "nested": { "b": "B", "a": "A" },
            "stub": null
        }));

        let flattened = flatten_translations(&tree, true);

        assert_eq!(
            flattened,
            vec![
                ("foo".to_string(), Some(Value::text("x"))),
                ("nested.b".to_string(), Some(Value::text("B"))),
                ("nested.a".to_string(), Some(Value::text("A"))),
                ("stub".to_string(), None),
            ]
        );
    }

    #[rstest]
    fn flatten_translations_escapes_dotted_segments() {
        let tree = Tree::from(json!({ "foo": { "baz.zab": "dotted" } }));

        let escaped = flatten_translations(&tree, true);
        let unescaped = flatten_translations(&tree, false);

        assert_that!(escaped.first().map(|(key, _)| key.as_str()), some(eq("foo.baz\u{1}zab")));
        assert_that!(unescaped.first().map(|(key, _)| key.as_str()), some(eq("foo.baz.zab")));
    }

    #[rstest]
    fn escape_round_trip() {
        let escaped = escape_default_separator("Pagina's.v2");
        assert_that!(escaped.contains(FLATTEN_SEPARATOR), eq(false));
        assert_that!(unescape_segment(&escaped), eq("Pagina's.v2"));
    }
}
