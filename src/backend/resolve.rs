//! Link and default resolution shared by the resolvers.

use super::Context;
use crate::error::I18nError;
use crate::types::{
    Lookup,
    Options,
    Translated,
    Value,
};

/// Resolves a default: each list item is tried in order, the first hit wins.
pub(super) fn resolve_default(
    ctx: &Context<'_>,
    locale: &str,
    subject: &Value,
    options: &Options,
) -> Result<Option<Translated>, I18nError> {
    match subject {
        Value::List(items) => {
            for item in items {
                if let Some(resolved) = resolve_link(ctx, locale, item.clone(), options)? {
                    return Ok(Some(resolved));
                }
            }
            Ok(None)
        }
        other => resolve_link(ctx, locale, other.clone(), options),
    }
}

/// Translates a [`Value::Key`] through the root resolver; other values resolve to themselves.
pub(super) fn resolve_link(
    ctx: &Context<'_>,
    locale: &str,
    subject: Value,
    options: &Options,
) -> Result<Option<Translated>, I18nError> {
    let Value::Key(key) = subject else {
        return Ok(Some(Translated::Value(subject)));
    };

    let Some(nested) = ctx.descend() else {
        tracing::warn!(locale, key = %key, "Link nesting too deep, treating as missing");
        return Ok(None);
    };

    let entry = ctx.root().resolve_entry(&nested, locale, &key, &options.without_default())?;
    Ok(entry.into_translated())
}

/// Applies the default to a miss, or follows a link stored as a hit.
pub(super) fn resolve_found(
    ctx: &Context<'_>,
    locale: &str,
    entry: Lookup,
    options: &Options,
) -> Result<Lookup, I18nError> {
    match (&entry, &options.default) {
        (Lookup::Miss, Some(default)) => Ok(resolve_default(ctx, locale, default, options)?.into()),
        _ => resolve_links(ctx, locale, entry, options),
    }
}

/// Follows a link stored as a hit.
pub(super) fn resolve_links(
    ctx: &Context<'_>,
    locale: &str,
    entry: Lookup,
    options: &Options,
) -> Result<Lookup, I18nError> {
    match entry {
        Lookup::Hit(link @ Value::Key(_)) => Ok(resolve_link(ctx, locale, link, options)?.into()),
        other => Ok(other),
    }
}
