//! Missing-key capture for [`StoreBackend`].

use super::{
    Context,
    MissCapturer,
    StoreBackend,
};
use crate::error::I18nError;
use crate::key::FLATTEN_SEPARATOR;
use crate::store::TranslationRecord;
use crate::types::Options;

impl MissCapturer for StoreBackend {
    fn record_miss(
        &self,
        ctx: &Context<'_>,
        locale: &str,
        key: &str,
        options: &Options,
    ) -> Result<bool, I18nError> {
        let flat_key = ctx.flat_key(key, options);
        let interpolations = options.placeholder_names();

        let stub_keys: Vec<String> = if options.count.is_some() {
            ctx.pluralizer()
                .plural_keys(locale)
                .iter()
                .map(|form| format!("{flat_key}{FLATTEN_SEPARATOR}{form}"))
                .collect()
        } else {
            vec![flat_key.clone()]
        };

        let records = stub_keys
            .into_iter()
            .map(|stub_key| {
                TranslationRecord::new(locale, stub_key, options.default.clone())
                    .with_interpolations(interpolations.clone())
            })
            .collect();

        let inserted = self.store().insert_if_absent(locale, &flat_key, records)?;
        if inserted {
            self.reload();
            tracing::debug!(locale, key = %flat_key, "Stored stub for missing translation");
        }
        Ok(inserted)
    }
}
