//! In-memory record table shared by the store implementations.

use std::collections::{
    BTreeMap,
    BTreeSet,
};

use super::TranslationRecord;
use crate::key::{
    FLATTEN_SEPARATOR,
    expand_keys,
};

/// Records indexed by locale, then by flat key.
#[derive(Debug, Clone, Default)]
pub(super) struct Snapshot {
    /// locale → flat key → record
    locales: BTreeMap<String, BTreeMap<String, TranslationRecord>>,
}

impl Snapshot {
    pub(super) fn from_records(records: impl IntoIterator<Item = TranslationRecord>) -> Self {
        let mut snapshot = Self::default();
        for record in records {
            snapshot.insert(record);
        }
        snapshot
    }

    pub(super) fn records(&self) -> Vec<TranslationRecord> {
        self.locales.values().flat_map(BTreeMap::values).cloned().collect()
    }

    pub(super) fn len(&self) -> usize {
        self.locales.values().map(BTreeMap::len).sum()
    }

    pub(super) fn find_by_key_prefix(&self, locale: &str, key: &str) -> Vec<TranslationRecord> {
        let Some(table) = self.locales.get(locale) else {
            return Vec::new();
        };

        let prefix = format!("{key}{FLATTEN_SEPARATOR}");
        table
            .get(key)
            .into_iter()
            .chain(
                table
                    .range(prefix.clone()..)
                    .take_while(|(candidate, _)| candidate.starts_with(&prefix))
                    .map(|(_, record)| record),
            )
            .cloned()
            .collect()
    }

    /// Returns the number of deleted records.
    pub(super) fn delete_key_or_prefix(&mut self, locale: &str, keys: &[String]) -> usize {
        let Some(table) = self.locales.get_mut(locale) else {
            return 0;
        };

        let mut doomed: Vec<String> =
            keys.iter().filter(|key| table.contains_key(key.as_str())).cloned().collect();
        if let Some(last) = keys.last() {
            let prefix = format!("{last}{FLATTEN_SEPARATOR}");
            doomed.extend(
                table
                    .range(prefix.clone()..)
                    .take_while(|(candidate, _)| candidate.starts_with(&prefix))
                    .map(|(candidate, _)| candidate.clone()),
            );
        }

        for key in &doomed {
            table.remove(key);
        }
        if table.is_empty() {
            self.locales.remove(locale);
        }
        doomed.len()
    }

    pub(super) fn insert(&mut self, record: TranslationRecord) {
        self.locales
            .entry(record.locale.clone())
            .or_default()
            .insert(record.key.clone(), record);
    }

    pub(super) fn replace(&mut self, record: TranslationRecord) {
        self.delete_key_or_prefix(&record.locale, &expand_keys(&record.key));
        self.insert(record);
    }

    /// Returns true if anything is stored at `key`, at one of its ancestors, or below it.
    pub(super) fn occupied(&self, locale: &str, key: &str) -> bool {
        let Some(table) = self.locales.get(locale) else {
            return false;
        };
        expand_keys(key).iter().any(|candidate| table.contains_key(candidate))
            || !self.find_by_key_prefix(locale, key).is_empty()
    }

    pub(super) fn insert_if_absent(
        &mut self,
        locale: &str,
        key: &str,
        records: Vec<TranslationRecord>,
    ) -> bool {
        if self.occupied(locale, key) {
            return false;
        }
        for record in records {
            self.insert(record);
        }
        true
    }

    pub(super) fn locales(&self) -> BTreeSet<String> {
        self.locales.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;
    use rstest::*;

    use super::*;
    use crate::types::Value;

    fn record(locale: &str, key: &str, value: &str) -> TranslationRecord {
        TranslationRecord::new(locale, key, Some(Value::text(value)))
    }

    #[fixture]
    fn snapshot() -> Snapshot {
        Snapshot::from_records([
            record("en", "foo", "scalar"),
            record("en", "foo.bar", "bar"),
            record("en", "foo.baz.qux", "qux"),
            record("en", "foobar", "sibling"),
            record("es", "foo", "es scalar"),
        ])
    }

    #[rstest]
    fn find_by_key_prefix_returns_exact_match_first(snapshot: Snapshot) {
        let keys: Vec<String> =
            snapshot.find_by_key_prefix("en", "foo").into_iter().map(|r| r.key).collect();

        assert_that!(keys, elements_are![eq("foo"), eq("foo.bar"), eq("foo.baz.qux")]);
    }

    #[rstest]
    fn find_by_key_prefix_unknown_locale_is_empty(snapshot: Snapshot) {
        assert_that!(snapshot.find_by_key_prefix("fr", "foo"), is_empty());
    }

    #[rstest]
    fn delete_key_or_prefix_removes_listed_keys_and_last_subtree(mut snapshot: Snapshot) {
        let deleted = snapshot.delete_key_or_prefix("en", &["foo".to_string()]);

        assert_that!(deleted, eq(3));
        assert_that!(snapshot.find_by_key_prefix("en", "foobar"), len(eq(1)));
        assert_that!(snapshot.find_by_key_prefix("es", "foo"), len(eq(1)));
    }

    #[rstest]
    fn replace_retracts_ancestors(mut snapshot: Snapshot) {
        snapshot.replace(record("en", "foo.bar.deep", "deep"));

        let keys: Vec<String> =
            snapshot.find_by_key_prefix("en", "foo").into_iter().map(|r| r.key).collect();
        assert_that!(keys, elements_are![eq("foo.bar.deep"), eq("foo.baz.qux")]);
    }

    #[rstest]
    #[case::exact("foo", true)]
    #[case::ancestor_stored("foo.bar.new", true)]
    #[case::descendant_stored("foo.baz", true)]
    #[case::free("other", false)]
    #[case::sibling_prefix("foob", false)]
    fn occupied_cases(snapshot: Snapshot, #[case] key: &str, #[case] expected: bool) {
        assert_that!(snapshot.occupied("en", key), eq(expected));
    }

    #[rstest]
    fn empty_locales_disappear(mut snapshot: Snapshot) {
        snapshot.delete_key_or_prefix("es", &["foo".to_string()]);

        assert_that!(snapshot.locales(), elements_are![eq("en")]);
        assert_that!(snapshot.len(), eq(4));
    }
}
