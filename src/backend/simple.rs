//! In-memory resolver over nested translation data.

use std::collections::{
    BTreeMap,
    BTreeSet,
};
use std::sync::RwLock;

use super::resolve::resolve_found;
use super::{
    Context,
    Resolver,
};
use crate::error::{
    I18nError,
    StoreError,
};
use crate::key::{
    FLATTEN_SEPARATOR,
    flatten_translations,
};
use crate::types::{
    Lookup,
    Namespace,
    Options,
    StoreOptions,
    Tree,
    Value,
};

/// A node of the nested translation tree.
#[derive(Debug, Clone)]
enum Node {
    /// `None` is an untranslated stub.
    Leaf(Option<Value>),
    /// segment → child
    Branch(BTreeMap<String, Node>),
}

impl Node {
    /// Sets the leaf at `path`, turning any leaf along the way into a branch.
    fn set<'a>(&mut self, mut path: impl Iterator<Item = &'a str>, value: Option<Value>) {
        let Some(segment) = path.next() else {
            *self = Self::Leaf(value);
            return;
        };
        if !matches!(self, Self::Branch(_)) {
            *self = Self::Branch(BTreeMap::new());
        }
        if let Self::Branch(children) = self {
            children
                .entry(segment.to_string())
                .or_insert_with(|| Self::Branch(BTreeMap::new()))
                .set(path, value);
        }
    }

    /// Collects the leaves below this node as relative flat keys.
    fn collect_leaves(&self, prefix: Option<&str>, namespace: &mut Namespace) {
        match self {
            Self::Leaf(value) => {
                if let Some(key) = prefix {
                    namespace.insert(key, value.clone());
                }
            }
            Self::Branch(children) => {
                for (segment, child) in children {
                    let key = prefix.map_or_else(
                        || segment.clone(),
                        |p| format!("{p}{FLATTEN_SEPARATOR}{segment}"),
                    );
                    child.collect_leaves(Some(&key), namespace);
                }
            }
        }
    }
}

/// Resolves translations from nested data held in memory.
///
/// Storing deep-merges into what is already there. Used as a fallback behind
/// a [`StoreBackend`](super::StoreBackend) in a [`Chain`](super::Chain).
#[derive(Debug, Default)]
pub struct StaticBackend {
    /// locale → root node
    translations: RwLock<BTreeMap<String, Node>>,
}

impl StaticBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `data` for `locale`, for chained construction.
    pub fn with_translations(self, locale: &str, data: &Tree) -> Result<Self, I18nError> {
        self.store_translations(locale, data, StoreOptions::default())?;
        Ok(self)
    }
}

impl Resolver for StaticBackend {
    fn lookup(
        &self,
        ctx: &Context<'_>,
        locale: &str,
        key: &str,
        options: &Options,
    ) -> Result<Lookup, I18nError> {
        let flat_key = ctx.flat_key(key, options);
        let translations = self
            .translations
            .read()
            .map_err(|_| StoreError::Unavailable("static translations lock poisoned".to_string()))?;

        let Some(mut node) = translations.get(locale) else {
            return Ok(Lookup::Miss);
        };
        for segment in flat_key.split(FLATTEN_SEPARATOR) {
            match node {
                Node::Branch(children) => match children.get(segment) {
                    Some(child) => node = child,
                    None => return Ok(Lookup::Miss),
                },
                Node::Leaf(_) => return Ok(Lookup::Miss),
            }
        }

        Ok(match node {
            Node::Leaf(Some(value)) => Lookup::Hit(value.clone()),
            Node::Leaf(None) => Lookup::Miss,
            Node::Branch(_) => {
                let mut namespace = Namespace::new();
                node.collect_leaves(None, &mut namespace);
                Lookup::Namespace(namespace)
            }
        })
    }

    fn resolve_entry(
        &self,
        ctx: &Context<'_>,
        locale: &str,
        key: &str,
        options: &Options,
    ) -> Result<Lookup, I18nError> {
        let entry = self.lookup(ctx, locale, key, options)?;
        resolve_found(ctx, locale, entry, options)
    }

    fn store_translations(
        &self,
        locale: &str,
        data: &Tree,
        options: StoreOptions,
    ) -> Result<(), I18nError> {
        let mut translations = self
            .translations
            .write()
            .map_err(|_| StoreError::Unavailable("static translations lock poisoned".to_string()))?;

        let root = translations
            .entry(locale.to_string())
            .or_insert_with(|| Node::Branch(BTreeMap::new()));
        for (key, value) in flatten_translations(data, options.escape) {
            root.set(key.split(FLATTEN_SEPARATOR), value);
        }
        Ok(())
    }

    fn available_locales(&self) -> BTreeSet<String> {
        self.translations
            .read()
            .map(|translations| {
                translations
                    .iter()
                    .filter(|(_, node)| !matches!(node, Node::Branch(children) if children.is_empty()))
                    .map(|(locale, _)| locale.clone())
                    .collect()
            })
            .unwrap_or_default()
    }
}
