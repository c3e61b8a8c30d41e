//! Translation resolvers.
//!
//! Every resolver answers with a [`Lookup`]: a single value, a namespace, or a
//! miss. Misses are ordinary results; only the [`I18n`](crate::I18n) facade
//! turns a final miss into an error.

mod cache;
mod chain;
mod missing;
mod record;
mod resolve;
mod simple;

use std::collections::BTreeSet;
use std::fmt;

pub use chain::Chain;
pub use record::StoreBackend;
pub use simple::StaticBackend;

use crate::error::I18nError;
use crate::interpolate::Interpolator;
use crate::key::normalize_flat_keys;
use crate::plural::Pluralizer;
use crate::types::{
    Lookup,
    Options,
    StoreOptions,
    Tree,
};

/// Nesting limit for link and default resolution.
pub const MAX_LINK_DEPTH: usize = 32;

/// Collaborators and settings shared by every resolver taking part in one call.
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    /// Resolver that links and defaults are translated against.
    root: &'a dyn Resolver,
    /// Plural rules.
    pluralizer: &'a dyn Pluralizer,
    /// Placeholder substitution.
    interpolator: &'a dyn Interpolator,
    /// Separator used when a call does not set one.
    default_separator: char,
    /// Current link nesting.
    depth: usize,
}

impl<'a> Context<'a> {
    #[must_use]
    pub const fn new(
        root: &'a dyn Resolver,
        pluralizer: &'a dyn Pluralizer,
        interpolator: &'a dyn Interpolator,
        default_separator: char,
    ) -> Self {
        Self { root, pluralizer, interpolator, default_separator, depth: 0 }
    }

    #[must_use]
    pub const fn root(&self) -> &'a dyn Resolver {
        self.root
    }

    #[must_use]
    pub const fn pluralizer(&self) -> &'a dyn Pluralizer {
        self.pluralizer
    }

    #[must_use]
    pub const fn interpolator(&self) -> &'a dyn Interpolator {
        self.interpolator
    }

    #[must_use]
    pub const fn default_separator(&self) -> char {
        self.default_separator
    }

    /// Flat key addressed by `key` under the scope and separator of `options`.
    #[must_use]
    pub fn flat_key(&self, key: &str, options: &Options) -> String {
        normalize_flat_keys(key, &options.scope, options.separator.unwrap_or(self.default_separator))
    }

    /// Context for one more level of link resolution, or `None` past [`MAX_LINK_DEPTH`].
    #[must_use]
    pub const fn descend(&self) -> Option<Self> {
        if self.depth >= MAX_LINK_DEPTH {
            return None;
        }
        Some(Self { depth: self.depth + 1, ..*self })
    }
}

/// A source of translations.
pub trait Resolver: Send + Sync + fmt::Debug {
    /// Looks up the raw entry for `key`, without resolving links.
    fn lookup(
        &self,
        ctx: &Context<'_>,
        locale: &str,
        key: &str,
        options: &Options,
    ) -> Result<Lookup, I18nError>;

    /// Resolves `key` to its entry, following links and this resolver's default rules.
    ///
    /// Pluralization and interpolation are left to the caller.
    fn resolve_entry(
        &self,
        ctx: &Context<'_>,
        locale: &str,
        key: &str,
        options: &Options,
    ) -> Result<Lookup, I18nError>;

    fn store_translations(
        &self,
        locale: &str,
        data: &Tree,
        options: StoreOptions,
    ) -> Result<(), I18nError>;

    /// Locales with translations. Never fails; an unreachable source has none.
    fn available_locales(&self) -> BTreeSet<String>;

    /// Write-back capability, for resolvers that can record misses.
    fn miss_capturer(&self) -> Option<&dyn MissCapturer> {
        None
    }
}

/// Records missing keys as stubs awaiting translation.
pub trait MissCapturer: Send + Sync {
    /// Stores stubs for `key` unless something is already stored there.
    ///
    /// With `count`, one stub per plural form of `locale` is stored instead of
    /// one at `key`. Stubs carry `options.default` as their value and the
    /// placeholder names of `options`.
    ///
    /// Returns whether stubs were stored.
    fn record_miss(
        &self,
        ctx: &Context<'_>,
        locale: &str,
        key: &str,
        options: &Options,
    ) -> Result<bool, I18nError>;
}
